//! Domain error types.

use chrono::NaiveDate;

/// Top-level error type for portfolio-eval.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("invalid weights: {reason}")]
    InvalidWeights { reason: String },

    #[error("no usable price data for {symbol}")]
    MissingSymbolData { symbol: String },

    #[error("price series for {symbol} is not ascending by date at {date}")]
    UnorderedInput { symbol: String, date: NaiveDate },

    #[error("invalid price for {symbol} on {date}: {price}")]
    InvalidPrice {
        symbol: String,
        date: NaiveDate,
        price: f64,
    },

    #[error("degenerate return series ({observations} observations): need at least 2 points with non-zero variance")]
    DegenerateSeries { observations: usize },

    #[error("portfolio parse error in {file}: {reason}")]
    PortfolioParse { file: String, reason: String },

    #[error("price data error: {reason}")]
    PriceData { reason: String },

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

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl EvalError {
    pub(crate) fn invalid_weights(reason: impl Into<String>) -> Self {
        EvalError::InvalidWeights {
            reason: reason.into(),
        }
    }
}

impl From<&EvalError> for std::process::ExitCode {
    fn from(err: &EvalError) -> Self {
        let code: u8 = match err {
            EvalError::Io(_) | EvalError::Report { .. } => 1,
            EvalError::ConfigParse { .. }
            | EvalError::ConfigMissing { .. }
            | EvalError::ConfigInvalid { .. } => 2,
            EvalError::PortfolioParse { .. } | EvalError::PriceData { .. } => 3,
            EvalError::InvalidWeights { .. } => 4,
            EvalError::MissingSymbolData { .. }
            | EvalError::UnorderedInput { .. }
            | EvalError::InvalidPrice { .. } => 5,
            EvalError::DegenerateSeries { .. } => 6,
        };
        std::process::ExitCode::from(code)
    }
}
