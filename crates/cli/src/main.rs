mod echo;

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use datacat_core::{
    Converter, DatacatConfig, JsonConfig, JsonFormatter, ReturnFormat, SiteVariant, fetch_file, fetch_stdin, fetch_url,
};
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::echo::{
    format_size, print_banner, print_info, print_record_details, print_step, print_success, print_timing_summary,
    print_warning,
};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Source URL assumed for files and stdin when `--url` is not given.
const DEFAULT_SOURCE_URL: &str = "https://localhost/";

/// Convert open-dataset pages into DCAT records
#[derive(Parser, Debug)]
#[command(name = "datacat")]
#[command(author = "Datacat Contributors")]
#[command(version)]
#[command(about = "Convert open-dataset pages into DCAT records", long_about = None)]
struct Args {
    /// URL to fetch, local HTML file, or "-" for stdin
    #[arg(value_name = "INPUT")]
    input: String,

    /// Page URL for file or stdin input (site detection and relative links)
    #[arg(long, default_value = DEFAULT_SOURCE_URL, value_name = "URL")]
    url: Url,

    /// Site template (aikosh, kaggle, unknown); detected from the URL when omitted
    #[arg(long, value_name = "SITE")]
    site: Option<SiteVariant>,

    /// Output format (jsonld, ttl, both)
    #[arg(short, long, default_value = "jsonld", value_name = "FORMAT")]
    format: ReturnFormat,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Also write the intermediate scrape as JSON
    #[arg(long, value_name = "FILE")]
    raw_output: Option<PathBuf>,

    /// Emit single-line JSON
    #[arg(long)]
    compact: bool,

    /// HTTP timeout in seconds
    #[arg(long, default_value = "30", value_name = "SECS")]
    timeout: u64,

    /// Custom User-Agent for HTTP requests
    #[arg(long, value_name = "UA")]
    user_agent: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn is_remote(&self) -> bool {
        self.input.starts_with("http://") || self.input.starts_with("https://")
    }

    /// The URL the page is attributed to.
    fn source_url(&self) -> &str {
        if self.is_remote() { &self.input } else { self.url.as_str() }
    }

    fn converter(&self) -> Converter {
        let mut builder = DatacatConfig::builder()
            .maybe_site_hint(self.site)
            .timeout(self.timeout);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent.as_str());
        }
        Converter::with_config(builder.build())
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("datacat_core=debug"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let converter = args.converter();
    let mut timings: Vec<(String, Duration)> = Vec::new();
    let started = Instant::now();

    if args.verbose {
        init_tracing();
        print_banner();
        print_info("Debug logging enabled");
        eprintln!();
    }

    let html = if args.input == "-" {
        if args.verbose {
            print_step(1, 4, "Reading from stdin");
        }
        fetch_stdin().context("Failed to read from stdin")?
    } else if args.is_remote() {
        if args.verbose {
            print_step(1, 4, &format!("Fetching from {}", args.input.bright_white().underline()));
        }
        fetch_url(&args.input, &converter.config().fetch)
            .await
            .context("Failed to fetch URL")?
    } else {
        if args.verbose {
            print_step(1, 4, &format!("Reading from file {}", args.input.bright_white()));
        }
        fetch_file(&args.input).with_context(|| format!("Failed to read file: {}", args.input))?
    };
    timings.push(("Read".to_string(), started.elapsed()));

    if args.verbose {
        eprintln!("  {} {}", "Size:".dimmed(), format_size(html.len()).bright_white());
        eprintln!();
        print_step(2, 4, &format!("Converting as {}", args.source_url().bright_white()));
    }

    let converting = Instant::now();
    let conversion = converter
        .convert_html(&html, args.source_url())
        .context("Failed to convert page")?;
    timings.push(("Convert".to_string(), converting.elapsed()));

    if args.verbose {
        print_record_details(&conversion);
        let dataset = &conversion.record.dataset;
        if dataset.distributions.iter().all(|d| d.access_url == args.source_url()) {
            print_warning("No downloadable files found; the page itself is the only distribution");
        }
        if dataset.license.is_none() {
            print_warning("No license found");
        }
        print_step(3, 4, &format!("Rendering {}", args.format.to_string().bright_white()));
    }

    let rendering = Instant::now();
    let pretty = !args.compact;
    let formatter = JsonFormatter::new(JsonConfig { pretty });
    let output = match args.format {
        ReturnFormat::JsonLd => formatter.convert(&conversion.record),
        ReturnFormat::Turtle => conversion.record.to_turtle(),
        ReturnFormat::Both => formatter.both(&conversion.record, started.elapsed().as_secs_f64()),
    }
    .context("Failed to render record")?;
    timings.push(("Render".to_string(), rendering.elapsed()));

    if args.verbose {
        print_step(4, 4, "Writing output");
        eprintln!();
    }

    if let Some(path) = &args.raw_output {
        let raw = conversion.raw.to_json_string(pretty).context("Failed to encode raw scrape")?;
        fs::write(path, raw).with_context(|| format!("Failed to write to file: {}", path.display()))?;
        if args.verbose {
            print_success(&format!("Raw scrape written to {}", path.display().bright_white()));
        }
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write to file: {}", path.display()))?;
            print_success(&format!("Output written to {}", path.display().bright_white()));
        }
        None if output.ends_with('\n') => print!("{}", output),
        None => println!("{}", output),
    }

    if args.verbose {
        print_timing_summary(started.elapsed(), &timings);
    }

    Ok(())
}
