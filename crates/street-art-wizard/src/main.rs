/*
[INPUT]:  CLI arguments, optional YAML configuration file, STREET_ART__* environment
[OUTPUT]: Interactive submission wizard in the terminal, or a generated config
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or gateway selection
*/

mod cli;
mod tui;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex as StdMutex};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use street_art_adapter::{BlobStoreGateway, InMemoryGateway, PersistenceGateway, SupabaseClient};
use street_art_wizard::{WizardConfig, WizardSession};

use crate::tui::{LOG_BUFFER_CAPACITY, LogBuffer, LogBufferHandle, LogWriterFactory};

const APP_DIR: &str = "street-art-wizard";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Parser, Debug)]
#[command(name = "street-art-wizard", version, about = "Street art submission wizard")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Configuration file; defaults to the user config directory when present
    #[arg(long = "config", value_name = "PATH", global = true)]
    config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info", global = true)]
    log_level: String,
    /// Also write logs to a daily rolling file
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Keep submissions in memory instead of talking to Supabase
    #[arg(long)]
    offline: bool,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a configuration file interactively
    Init {
        #[arg(long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if let Some(Command::Init { output }) = args.command {
        let output = match output {
            Some(path) => path,
            None => default_config_path().context("cannot locate a config directory; pass --output")?,
        };
        return cli::init::run_init(output);
    }

    let config_path = args.config_path.clone().or_else(|| {
        default_config_path().filter(|path| path.is_file())
    });
    let config = load_config(config_path.as_deref(), args.offline)?;

    if args.dry_run {
        let _guard = init_tracing(&args.log_level, None, args.log_file.as_deref())?;
        build_gateways(&config, args.offline)?;
        info!(
            config_path = ?config_path,
            offline = args.offline,
            table = %config.table,
            "dry-run requested; configuration validated"
        );
        return Ok(());
    }

    let log_buffer: LogBufferHandle = Arc::new(StdMutex::new(LogBuffer::new(LOG_BUFFER_CAPACITY)));
    let _guard = init_tracing(&args.log_level, Some(log_buffer.clone()), args.log_file.as_deref())?;
    info!(
        config_path = ?config_path,
        offline = args.offline,
        "starting street-art-wizard"
    );

    let (persistence, blobs) = build_gateways(&config, args.offline)?;
    let session = WizardSession::new(persistence, blobs, config.session_options());
    tui::run_tui_with_log(session, log_buffer).await
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
}

fn load_config(path: Option<&Path>, offline: bool) -> Result<WizardConfig> {
    let config = WizardConfig::load(path).context("load config")?;
    config.validate(offline).context("invalid configuration")?;
    Ok(config)
}

fn build_gateways(
    config: &WizardConfig,
    offline: bool,
) -> Result<(Arc<dyn PersistenceGateway>, Arc<dyn BlobStoreGateway>)> {
    if offline {
        let gateway = Arc::new(InMemoryGateway::new());
        return Ok((gateway.clone(), gateway));
    }

    let client = Arc::new(
        SupabaseClient::with_config(
            config.client_config(),
            &config.supabase.url,
            &config.supabase.anon_key,
        )
        .context("create supabase client")?,
    );
    Ok((client.clone(), client))
}

/// Logs go to the TUI buffer when one is given, stderr otherwise, and to a
/// rolling file when `log_file` is set. The returned guard flushes the file.
fn init_tracing(
    log_level: &str,
    buffer: Option<LogBufferHandle>,
    log_file: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;

    let console_layer = match buffer {
        Some(buffer) => tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(LogWriterFactory::new(buffer))
            .boxed(),
        None => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let file_name = path
                .file_name()
                .context("log file path must name a file")?;
            let dir = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let appender = tracing_appender::rolling::daily(dir, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(guard)
}
