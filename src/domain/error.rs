//! Domain error types.

/// Top-level error type for tickerlens.
#[derive(Debug, thiserror::Error)]
pub enum TickerlensError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no data available for {symbol}: {reason}")]
    UnavailableData { symbol: String, reason: String },

    #[error("malformed data in {source_name}: {reason}")]
    MalformedData { source_name: String, reason: String },

    #[error("unknown control: {0}")]
    UnknownControl(String),

    #[error("invalid value for {control}: {reason}")]
    InvalidEventValue { control: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TickerlensError {
    pub fn unavailable(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        TickerlensError::UnavailableData {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

impl From<&TickerlensError> for std::process::ExitCode {
    fn from(err: &TickerlensError) -> Self {
        let code: u8 = match err {
            TickerlensError::Io(_) => 1,
            TickerlensError::ConfigParse { .. }
            | TickerlensError::ConfigMissing { .. }
            | TickerlensError::ConfigInvalid { .. } => 2,
            TickerlensError::Database { .. } | TickerlensError::DatabaseQuery { .. } => 3,
            TickerlensError::UnknownControl(_) | TickerlensError::InvalidEventValue { .. } => 4,
            TickerlensError::UnavailableData { .. } | TickerlensError::MalformedData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
