//! Domain error types.

/// Failure of a single indicator computation.
///
/// The signal evaluator never propagates these; it treats them as "no signal".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("insufficient data: need {needed} points, have {got}")]
    InsufficientData { needed: usize, got: usize },

    #[error("period must be at least 1")]
    InvalidPeriod,
}

/// Price history validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeriesError {
    #[error("price series is empty")]
    Empty,

    #[error("timestamp {current} at index {index} does not follow {previous}")]
    NonMonotonic {
        index: usize,
        previous: i64,
        current: i64,
    },
}

/// Parameter grid construction failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    #[error("no candidate values for {0}")]
    EmptyDimension(String),

    #[error("parameter {0} declared more than once")]
    DuplicateDimension(String),

    #[error("required parameter {0} missing from grid")]
    MissingDimension(String),

    #[error("incomplete {group} parameters: {missing} is missing")]
    IncompleteGroup { group: String, missing: String },
}

/// Failure of an `optimize` call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptimizeError {
    #[error("price series is empty")]
    EmptySeries,

    #[error("no parameter combination satisfies the validity constraints")]
    EmptyGrid,
}

/// Top-level error type for tradegrid.
#[derive(Debug, thiserror::Error)]
pub enum TradegridError {
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

    #[error("data source error: {reason}")]
    DataSource { reason: String },

    #[error("invalid price series for {symbol}: {source}")]
    Series {
        symbol: String,
        #[source]
        source: SeriesError,
    },

    #[error(transparent)]
    Grid(#[from] GridError),

    #[error(transparent)]
    Optimize(#[from] OptimizeError),
}

impl From<&TradegridError> for std::process::ExitCode {
    fn from(err: &TradegridError) -> Self {
        let code: u8 = match err {
            TradegridError::ConfigParse { .. }
            | TradegridError::ConfigMissing { .. }
            | TradegridError::ConfigInvalid { .. } => 2,
            TradegridError::DataSource { .. } => 3,
            TradegridError::Grid(_) => 4,
            TradegridError::Series { .. } | TradegridError::Optimize(_) => 5,
        };
        std::process::ExitCode::from(code)
    }
}
