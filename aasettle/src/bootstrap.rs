use crate::{
    console::{StdoutReplySink, read_messages},
    session::ChatSession,
};
use aasettle_application::{BillLedger, LedgerConfig, MessageProcessor};
use aasettle_domain::{Identity, RoundingMode};
use aasettle_infrastructure::{
    AaCommandParser, JsonFileStore, SystemClock, UuidBillIdGenerator,
};
use aasettle_presentation::ReplyPresenter;
use std::{env, path::PathBuf, process::ExitCode};
use tracing_subscriber::EnvFilter;

const DEFAULT_DATA_DIR: &str = "./data";
const DEFAULT_PREFIX: &str = "/aa";
const DEFAULT_LIST_LIMIT: usize = 10;
const DEFAULT_SENDER_ID: &str = "console";

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("AASETTLE_ROUNDING must be 'half-up' or 'half-even' (got '{0}')")]
    InvalidRounding(String),
    #[error("AASETTLE_LIST_LIMIT must be a whole number of at least 1 (got '{0}')")]
    InvalidListLimit(String),
    #[error("AASETTLE_PREFIX must not be empty or contain whitespace")]
    InvalidPrefix,
}

/// Application configuration read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub prefix: String,
    pub rounding_mode: RoundingMode,
    pub list_limit: usize,
    pub sender: Identity,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let prefix = var("AASETTLE_PREFIX").unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        if prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::InvalidPrefix);
        }

        let rounding_mode = match var("AASETTLE_ROUNDING") {
            None => RoundingMode::default(),
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "half-up" | "half_up" => RoundingMode::HalfUp,
                "half-even" | "half_even" => RoundingMode::HalfEven,
                _ => return Err(ConfigError::InvalidRounding(value)),
            },
        };

        let list_limit = match var("AASETTLE_LIST_LIMIT") {
            None => DEFAULT_LIST_LIMIT,
            Some(value) => match value.trim().parse::<usize>() {
                Ok(limit) if limit >= 1 => limit,
                _ => return Err(ConfigError::InvalidListLimit(value)),
            },
        };

        let sender_id = var("AASETTLE_SENDER_ID").unwrap_or_else(|| DEFAULT_SENDER_ID.to_string());
        let sender_name = var("AASETTLE_SENDER_NAME").unwrap_or_default();

        Ok(Self {
            data_dir: var("AASETTLE_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            prefix,
            rounding_mode,
            list_limit,
            sender: crate::session::sender_identity(&sender_id, &sender_name),
        })
    }
}

/// Initialize logging and tracing; stdout is left to the chat transcript.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Run the console host over `script`, or stdin when absent.
pub fn run(script: Option<PathBuf>) -> ExitCode {
    init_logging();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!(
        data_dir = %config.data_dir.display(),
        prefix = %config.prefix,
        rounding = ?config.rounding_mode,
        "Starting aasettle"
    );

    let messages = match read_messages(script.as_deref()) {
        Ok(messages) => messages,
        Err(e) => {
            tracing::error!(error = %e, "Failed to open input");
            return ExitCode::FAILURE;
        }
    };

    let store = JsonFileStore::new(&config.data_dir);
    let parser = AaCommandParser::new(config.prefix.as_str());
    let ledger = BillLedger::open(
        &store,
        &SystemClock,
        &UuidBillIdGenerator,
        LedgerConfig {
            rounding_mode: config.rounding_mode,
            default_description: aasettle_i18n::DEFAULT_DESCRIPTION.to_string(),
        },
    );
    let processor = MessageProcessor::new(&parser, &ledger, config.list_limit);
    let mut session = ChatSession::new(
        processor,
        ReplyPresenter::new(config.prefix.as_str()),
        StdoutReplySink,
        config.sender.clone(),
    );

    for line in messages {
        match line {
            Ok(line) => session.handle_line(&line),
            Err(e) => {
                tracing::error!(error = %e, "Failed to read input");
                break;
            }
        }
    }

    if let Err(e) = ledger.flush() {
        tracing::error!(error = %e, "Final save failed");
        return ExitCode::FAILURE;
    }
    tracing::info!("Ledger saved, shutting down");
    ExitCode::SUCCESS
}
