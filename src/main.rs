use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use feedsmith::config::{Config, SortOrder};
use feedsmith::export::{self, ExportOptions, FeedFormat};
use feedsmith::source;

/// Get the config file path (~/.config/feedsmith/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("feedsmith")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "feedsmith",
    about = "Render a feed definition as Atom, RSS 2.0, or JSON Feed"
)]
struct Args {
    /// Feed definition file (TOML, or JSON with a .json extension)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output format (overrides config)
    #[arg(short, long, value_enum)]
    format: Option<FeedFormat>,

    /// Write to FILE instead of stdout
    #[arg(short, long, value_name = "FILE", conflicts_with = "out_dir")]
    output: Option<PathBuf>,

    /// Write feed.atom, feed.rss and feed.json into DIR
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Item ordering applied before rendering (overrides config)
    #[arg(long, value_enum)]
    sort: Option<SortOrder>,

    /// Config file (defaults to ~/.config/feedsmith/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Renders every format from one shared feed, one blocking task per format.
async fn render_all(
    feed: Arc<feedsmith::Feed>,
    options: ExportOptions,
    out_dir: PathBuf,
) -> Result<()> {
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

    let tasks: Vec<_> = FeedFormat::ALL
        .into_iter()
        .map(|format| {
            let feed = Arc::clone(&feed);
            let options = options.clone();
            let path = out_dir.join(format!("feed.{}", format.extension()));
            tokio::task::spawn_blocking(move || -> Result<PathBuf> {
                let content = export::render(&feed, format, &options)
                    .with_context(|| format!("Failed to render {format:?}"))?;
                export::export_to_file(&content, &path)?;
                Ok(path)
            })
        })
        .collect();

    for task in tasks {
        let path = task.await.context("Render task panicked")??;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;

    let mut feed = source::load_feed(&args.input)
        .await
        .with_context(|| format!("Failed to load feed definition {}", args.input.display()))?;

    args.sort.unwrap_or(config.sort).apply(&mut feed);
    let options = config.export_options();

    if let Some(out_dir) = args.out_dir {
        return render_all(Arc::new(feed), options, out_dir).await;
    }

    let format = args.format.unwrap_or(config.format);
    let content = export::render(&feed, format, &options).context("Failed to render feed")?;

    match args.output {
        Some(path) => {
            export::export_to_file(&content, &path)?;
            tracing::info!(path = %path.display(), ?format, "Feed written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")?;
        }
    }

    Ok(())
}
