use clap::{Parser, Subcommand};
use eyre::format_err;
use log::{error, info, warn};
use std::process::exit;

use netpol_form::{Kind, form, resource};

pub mod config;

/// NetworkPolicy form conversions
#[derive(Parser)]
#[command(version, long_version = LONG_VERSION, about, long_about = ABOUT)]
struct Cli {
    /// log filters (see https://docs.rs/env_logger/latest/env_logger/index.html#enabling-logging)
    #[arg(long, default_value = "info", env = "NETPOL_FORM_LOG")]
    log: String,
    /// log style (see https://docs.rs/env_logger/latest/env_logger/index.html#disabling-colors)
    #[arg(long, default_value = "auto", env = "NETPOL_FORM_LOG_STYLE")]
    log_style: String,

    /// Config file path.
    #[arg(long, short = 'c')]
    config: Option<String>,

    /// Reject constructs the form can't represent instead of dropping them.
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a NetworkPolicy (YAML or JSON) to its form (JSON).
    ToForm { file: String },
    /// Convert a form (JSON) to a NetworkPolicy.
    ToWire { file: String },
    /// Check that a NetworkPolicy can be edited in the form without loss.
    Check { file: String },
}

const ABOUT: &str = r#"
NetworkPolicy form conversions

Convert Kubernetes NetworkPolicy resources to and from a flat, editable form,
and detect resources the form can't represent without loss.
"#;

const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("GIT_COMMIT"), ")");

const EXIT_LOSSY: i32 = 2;

fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    env_logger::builder()
        .parse_filters(cli.log.as_str())
        .parse_write_style(cli.log_style.as_str())
        .format_timestamp_millis()
        .init();

    use config::*;
    let config: Config = match cli.config {
        None => Config::default(),
        Some(ref path) => {
            let config = std::fs::read(path)
                .map_err(|e| format_err!("read config failed: {path}: {e}"))?;
            serde_yaml::from_slice(&config).map_err(|e| format_err!("parse config failed: {e}"))?
        }
    };

    let mut opts = config.options();
    opts.strict |= cli.strict;

    match cli.command {
        Command::ToForm { file } => {
            let loaded = load(&file, &opts)?;
            if loaded.lossy {
                warn!("{file}: some elements are not supported in the form and would be lost");
            }
            println!("{}", serde_json::to_string_pretty(&loaded.policy)?);
        }
        Command::ToWire { file } => {
            let policy: form::Policy = serde_json::from_str(&read(&file)?)
                .map_err(|e| format_err!("parse form failed: {file}: {e}"))?;
            let resource = resource::to_wire(&policy).unwrap_or_else(|e| fail(&file, e));
            match config.output {
                Output::Yaml => print!("{}", serde_yaml::to_string(&resource)?),
                Output::Json => println!("{}", serde_json::to_string_pretty(&resource)?),
            }
        }
        Command::Check { file } => {
            let loaded = load(&file, &opts)?;
            if loaded.lossy {
                println!("lossy");
                exit(EXIT_LOSSY);
            }
            info!("{file}: fully supported");
            println!("ok");
        }
    }

    Ok(())
}

fn read(file: &str) -> eyre::Result<String> {
    std::fs::read_to_string(file).map_err(|e| format_err!("read failed: {file}: {e}"))
}

fn load(file: &str, opts: &netpol_form::Options) -> eyre::Result<netpol_form::Loaded> {
    Ok(netpol_form::load_yaml(&read(file)?, opts).unwrap_or_else(|e| fail(file, e)))
}

fn fail(file: &str, e: netpol_form::Error) -> ! {
    match e.kind() {
        Kind::Invalid => error!("{file}: invalid: {e}"),
        Kind::Unsupported => error!("{file}: unsupported: {e}"),
    }
    exit(1);
}
