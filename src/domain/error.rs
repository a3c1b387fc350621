//! Domain error types.

/// Top-level error type for helios.
#[derive(Debug, thiserror::Error)]
pub enum HeliosError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("knowledge base error: {reason}")]
    KnowledgeBase { reason: String },

    #[error("unknown entity: {name}")]
    UnknownEntity { name: String },

    #[error("link strength {strength} outside [0, 1]")]
    StrengthOutOfRange { strength: f64 },

    #[error("invalid trade: {reason}")]
    InvalidTicket { reason: String },

    #[error("insufficient cash for BUY {symbol}: notional {notional:.2} exceeds cash {cash:.2}")]
    InsufficientFunds {
        symbol: String,
        notional: f64,
        cash: f64,
    },

    #[error("insufficient position for SELL {symbol}: holding {held}, requested {requested}")]
    InsufficientPosition {
        symbol: String,
        held: i64,
        requested: i64,
    },

    #[error("position limit for BUY {symbol}: holding {held}, adding {requested} overflows")]
    PositionLimit {
        symbol: String,
        held: i64,
        requested: i64,
    },

    #[error("{field} is required")]
    MissingInput { field: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HeliosError {
    pub(crate) fn invalid_ticket(reason: impl Into<String>) -> Self {
        HeliosError::InvalidTicket {
            reason: reason.into(),
        }
    }

    /// True for rejections caused by the caller's request rather than by the system:
    /// malformed requests and trades the ledger cannot cover.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HeliosError::InvalidTicket { .. }
                | HeliosError::InsufficientFunds { .. }
                | HeliosError::InsufficientPosition { .. }
                | HeliosError::PositionLimit { .. }
                | HeliosError::MissingInput { .. }
        )
    }
}

impl From<&HeliosError> for std::process::ExitCode {
    fn from(err: &HeliosError) -> Self {
        let code: u8 = match err {
            HeliosError::Io(_) => 1,
            HeliosError::ConfigParse { .. } | HeliosError::ConfigInvalid { .. } => 2,
            HeliosError::KnowledgeBase { .. }
            | HeliosError::UnknownEntity { .. }
            | HeliosError::StrengthOutOfRange { .. }
            | HeliosError::Json(_) => 3,
            HeliosError::InvalidTicket { .. }
            | HeliosError::InsufficientFunds { .. }
            | HeliosError::InsufficientPosition { .. }
            | HeliosError::PositionLimit { .. } => 4,
            HeliosError::MissingInput { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}
