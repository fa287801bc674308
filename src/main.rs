use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use rate_pro_dropdowns::cache::CacheSource;
use rate_pro_dropdowns::config::Config;
use rate_pro_dropdowns::{CachedSettingsClient, DropdownOptions, SettingsClient};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rate-pro-dropdowns")]
#[command(about = "Resolve Rate Pro dropdown options from the settings API")]
#[command(version)]
struct Args {
  /// Path to config file (default: $XDG_CONFIG_HOME/rate-pro/config.yaml)
  #[arg(short, long)]
  config: Option<PathBuf>,

  /// Write logs to this file instead of stderr
  #[arg(long)]
  log_file: Option<PathBuf>,

  /// Fetch from the backend even when a fresh cached list exists
  #[arg(long)]
  no_cache: bool,

  /// Print selectable options as JSON
  #[arg(long)]
  json: bool,

  /// Dropdown types to resolve (e.g. industry priority)
  #[arg(required = true)]
  types: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
  color_eyre::install()?;

  let args = Args::parse();
  let _guard = init_logging(args.log_file.as_deref())?;

  let config = Config::load(args.config.as_deref())?;
  let client = CachedSettingsClient::new(SettingsClient::new(&config)?);

  let mut failed = false;
  let mut results = serde_json::Map::new();

  for dropdown_type in &args.types {
    let mut resolver =
      DropdownOptions::new(client.clone(), Some(dropdown_type.as_str()), !args.no_cache);
    resolver.wait().await;

    if let Some(error) = resolver.error() {
      eprintln!("{}: {}", dropdown_type, error);
      failed = true;
      continue;
    }

    let source = resolver.source().unwrap_or(CacheSource::Network);
    info!(%dropdown_type, %source, count = resolver.options().len(), "resolved dropdown options");

    if args.json {
      results.insert(
        dropdown_type.clone(),
        serde_json::json!({
          "source": source,
          "options": resolver.select_options(),
        }),
      );
    } else {
      match resolver.cached_at() {
        Some(at) => println!(
          "{} ({}, cached at {}):",
          dropdown_type,
          source,
          at.with_timezone(&chrono::Local).format("%H:%M:%S")
        ),
        None => println!("{} ({}):", dropdown_type, source),
      }
      for option in resolver.options() {
        println!("  {:<24} {}", option.key, option.label);
      }
    }
  }

  if args.json {
    println!("{}", serde_json::to_string_pretty(&results)?);
  }

  if failed {
    return Err(eyre!("Some dropdown types could not be loaded"));
  }
  Ok(())
}

/// Install the tracing subscriber. Logs go to stderr, or to `log_file`
/// through a non-blocking writer whose guard must be held until exit.
fn init_logging(
  log_file: Option<&std::path::Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

  match log_file {
    Some(path) => {
      let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| std::path::Path::new("."));
      let name = path
        .file_name()
        .ok_or_else(|| eyre!("Invalid log file path: {}", path.display()))?;

      let appender = tracing_appender::rolling::never(dir, name);
      let (writer, guard) = tracing_appender::non_blocking(appender);
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
      Ok(Some(guard))
    }
    None => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
      Ok(None)
    }
  }
}
