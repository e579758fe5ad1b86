use crate::{DatacatError, Result};

/// Tunable heuristics for distribution discovery.
///
/// The defaults mirror what the supported catalog templates need; callers can
/// widen the extension lists or window size without touching the scanners.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Extensions the generic anchor, attribute and script scanners accept.
    pub extensions: Vec<String>,
    /// Extensions the kaggle script and storage-host scanners accept.
    pub kaggle_extensions: Vec<String>,
    /// Characters searched on each side of an extension hit in script text.
    pub script_window: usize,
    /// JSON keys whose quoted values may hold a download URL.
    pub script_keys: Vec<String>,
    /// Attributes that carry download targets on arbitrary elements.
    pub download_attributes: Vec<String>,
    /// Host fragments of cloud object storage serving dataset files.
    pub storage_hosts: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions: strings(&["csv", "zip", "json", "geojson", "xlsx", "xls", "parquet", "xml", "tgz", "tar", "gz"]),
            kaggle_extensions: strings(&["csv", "zip", "json", "xlsx", "parquet", "geojson"]),
            script_window: 100,
            script_keys: strings(&["downloadUrl", "fileUrl", "url", "path", "rawUrl", "archiveUrl"]),
            download_attributes: strings(&["data-download", "data-href", "data-url", "data-resource", "data-link"]),
            storage_hosts: strings(&["kaggleusercontent", "storage.googleapis", "s3.amazonaws", "azureedge"]),
        }
    }
}

impl DiscoveryConfig {
    /// Reject lists that would compile to an empty alternation.
    ///
    /// The extension and storage-host lists must be non-empty, and no list
    /// may hold a blank entry.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("extensions", &self.extensions),
            ("kaggle_extensions", &self.kaggle_extensions),
            ("storage_hosts", &self.storage_hosts),
        ];
        for (name, items) in required {
            if items.is_empty() {
                return Err(DatacatError::InvalidConfig(format!("`{}` must not be empty", name)));
            }
        }

        let all = [
            ("extensions", &self.extensions),
            ("kaggle_extensions", &self.kaggle_extensions),
            ("script_keys", &self.script_keys),
            ("download_attributes", &self.download_attributes),
            ("storage_hosts", &self.storage_hosts),
        ];
        for (name, items) in all {
            if items.iter().any(|item| item.trim().is_empty()) {
                return Err(DatacatError::InvalidConfig(format!("`{}` holds a blank entry", name)));
            }
        }
        Ok(())
    }
}
