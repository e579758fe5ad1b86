//! Raw scrape persistence.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use datacat_core::RawScrapeResult;
use regex::Regex;
use url::Url;

const DEFAULT_BASE: &str = "dataset";
const MAX_BASE_CHARS: usize = 120;

static UNSAFE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_-]+").unwrap());

/// File stem for a page: its last path segment with unsafe runs collapsed to `_`.
pub fn base_name(url: &str) -> String {
    let segment = Url::parse(url)
        .ok()
        .and_then(|u| u.path().trim_matches('/').rsplit('/').next().map(str::to_string))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE.to_string());

    UNSAFE_RUN.replace_all(&segment, "_").chars().take(MAX_BASE_CHARS).collect()
}

async fn write_raw(path: &Path, raw: &RawScrapeResult) -> anyhow::Result<()> {
    let json = raw.to_json_string(true)?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Write `raw` to `<dir>/<base>.json`.
///
/// Failures are logged and reported as `None`; they never fail the request.
pub async fn persist_raw(dir: &Path, url: &str, raw: &RawScrapeResult) -> Option<PathBuf> {
    let path = dir.join(format!("{}.json", base_name(url)));

    match write_raw(&path, raw).await {
        Ok(()) => {
            tracing::debug!(path = %path.display(), "raw scrape persisted");
            Some(path)
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to persist raw scrape");
            None
        }
    }
}
