//! cfgbind-inspect - merges configuration sources and dumps the raw entries

use anyhow::{Context, Result};
use cfgbind::{environment, Configuration, SourceLoader};
use options::{InspectOptions, LogFormat};
use serde_json::{Map, Value as JsonValue};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod options;

fn main() -> Result<()> {
    // Load .env file if it exists
    let dotenv_result = dotenv::dotenv();

    let arguments: Vec<String> = std::env::args().skip(1).collect();

    // Options come from the command line alone
    let mut bootstrap = Configuration::new();
    bootstrap
        .add_tokens(&arguments)
        .context("Failed to parse arguments")?;
    let options: InspectOptions = bootstrap.bind();

    let logging = options.logging();
    init_logging(&logging.level()?, logging.format()?)?;

    match dotenv_result {
        Ok(path) => info!("Loaded environment variables from {}", path.display()),
        Err(e) if !e.not_found() => warn!("Could not load .env file: {}", e),
        Err(_) => {}
    }

    let config_file = options.config_file()?;
    let env_prefix = options.env_prefix()?;
    let keys = options.keys()?;

    // Sources are merged lowest precedence first; the command line wins
    let mut config = Configuration::new();
    if options.system_properties()? {
        config.add_properties(environment());
        info!("Merged process environment");
    }
    if !config_file.is_empty() {
        SourceLoader::yaml_file(&mut config, &config_file)
            .with_context(|| format!("Failed to load configuration file {}", config_file))?;
        info!("Configuration loaded from: {}", config_file);
    }
    if !env_prefix.is_empty() {
        SourceLoader::env_prefixed(&mut config, &env_prefix)
            .context("Failed to load environment variables")?;
        info!("Environment variables merged with prefix {}", env_prefix);
    }
    config
        .add_tokens(&arguments)
        .context("Failed to parse arguments")?;
    info!(entries = config.entries().len(), "Configuration assembled");

    let dump = if keys.is_empty() {
        serde_json::to_value(config.entries()).context("Failed to serialize entries")?
    } else {
        let mut selected = Map::new();
        for key in &keys {
            match config.entries().get(key) {
                Some(raw) => {
                    let value = serde_json::to_value(raw).context("Failed to serialize entry")?;
                    selected.insert(key.clone(), value);
                }
                None => warn!(key = %key, "No entry for requested key"),
            }
        }
        JsonValue::Object(selected)
    };

    println!(
        "{}",
        serde_json::to_string_pretty(&dump).context("Failed to format entries")?
    );
    Ok(())
}

/// Initialize logging on stderr, keeping stdout for the dump
fn init_logging(log_level: &str, log_format: LogFormat) -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        LogFormat::Pretty => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        LogFormat::Json => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    info!("Logging initialized");
    info!("Log level: {}", log_level);
    info!("Log format: {}", log_format.literal());

    Ok(())
}
