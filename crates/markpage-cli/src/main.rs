//! # markpage CLI
//!
//! Converts a saved web page to Markdown the same way the interactive
//! surface does: the page (and any frame documents supplied alongside it)
//! is opened as the active target, its main content is extracted and the
//! result is rendered, stored and optionally downloaded.
//!
//! - `convert`: convert a page, print or write the Markdown
//! - `last`: show the most recently stored conversion

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use markpage::export::NoClipboard;
use markpage::{
    ConversionStore, Converter, ExtractOptions, JsonFileStore, LocalBoundary, MemoryStore, Page,
    Session,
};
use tokio::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(author, version, about = "Convert the main content of a web page to Markdown", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a saved HTML page to Markdown
    Convert(ConvertArgs),

    /// Print the last stored conversion
    Last(LastArgs),
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Saved HTML page
    #[arg(value_name = "PAGE")]
    page: PathBuf,

    /// Location the page was loaded from (default: file URL of PAGE)
    #[arg(long)]
    url: Option<String>,

    /// Document loaded by an embedded frame, as SRC=PATH
    #[arg(long = "frame", value_name = "SRC=PATH", value_parser = parse_frame)]
    frames: Vec<(String, PathBuf)>,

    /// Leave out the content of embedded frames
    #[arg(long)]
    no_frames: bool,

    /// Write the Markdown here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also save the Markdown as webpage-<timestamp>.md in this directory
    #[arg(short, long, value_name = "DIR")]
    download: Option<PathBuf>,

    /// JSON file holding the last conversion
    #[arg(long, env = "MARKPAGE_STORE")]
    store: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LastArgs {
    /// JSON file holding the last conversion
    #[arg(long, env = "MARKPAGE_STORE")]
    store: PathBuf,

    /// Print the whole record as JSON
    #[arg(long)]
    json: bool,
}

fn parse_frame(value: &str) -> Result<(String, PathBuf), String> {
    let (src, path) = value
        .split_once('=')
        .ok_or_else(|| format!("expected SRC=PATH, got `{value}`"))?;
    if src.is_empty() || path.is_empty() {
        return Err(format!("expected SRC=PATH, got `{value}`"));
    }
    Ok((src.to_string(), PathBuf::from(path)))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn read_html(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))
}

fn file_url(path: &Path) -> anyhow::Result<String> {
    let absolute = std::fs::canonicalize(path)
        .with_context(|| format!("failed to resolve {}", path.display()))?;
    Url::from_file_path(&absolute)
        .map(String::from)
        .map_err(|_| anyhow!("cannot express {} as a URL", absolute.display()))
}

async fn convert(args: ConvertArgs) -> anyhow::Result<()> {
    let url = match args.url {
        Some(url) => url,
        None => file_url(&args.page)?,
    };

    let mut page = Page::parse(&url, &read_html(&args.page).await?)
        .with_context(|| format!("invalid page location {url}"))?;
    for (src, path) in &args.frames {
        page = page
            .with_frame(src, &read_html(path).await?)
            .with_context(|| format!("invalid frame source {src}"))?;
    }

    let boundary = LocalBoundary::new();
    boundary.open(page).await;

    let store: Arc<dyn ConversionStore> = match &args.store {
        Some(path) => Arc::new(JsonFileStore::new(path)?),
        None => Arc::new(MemoryStore::new()),
    };
    let converter = Converter::new(Arc::new(boundary), store).with_options(ExtractOptions {
        include_frames: !args.no_frames,
    });

    let download_dir = args.download.clone().unwrap_or_else(|| PathBuf::from("."));
    let mut session = Session::new(Arc::new(converter), Arc::new(NoClipboard), download_dir);

    let record = session.convert().await?;
    if let Some(status) = session.status() {
        info!("{}", status.message);
    }

    if args.download.is_some() {
        if let Some(path) = session.download(Utc::now()).await? {
            info!(path = %path.display(), "Downloaded successfully!");
        }
    }

    match &args.output {
        Some(path) => {
            fs::write(path, &record.markdown)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "wrote markdown");
        }
        None => println!("{}", record.markdown),
    }

    Ok(())
}

async fn last(args: LastArgs) -> anyhow::Result<()> {
    let store = JsonFileStore::new(&args.store)?;
    let record = store
        .get()
        .await
        .with_context(|| format!("failed to read {}", args.store.display()))?
        .ok_or_else(|| anyhow!("no conversion stored in {}", args.store.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", record.markdown);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    match Cli::parse().command {
        Commands::Convert(args) => convert(args).await,
        Commands::Last(args) => last(args).await,
    }
}
