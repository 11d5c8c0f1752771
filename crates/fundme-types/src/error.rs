//! Error types for the FundMe custody ledger.
//!
//! All errors use the `FM_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Contribution errors
//! - 2xx: Access control errors
//! - 3xx: Query errors
//! - 4xx: Oracle errors
//! - 5xx: Withdrawal errors
//! - 6xx: Arithmetic / invariant errors
//! - 7xx: Deployment errors
//! - 9xx: General / internal errors

use rust_decimal::Decimal;
use thiserror::Error;

use crate::Address;

/// Central error enum for all FundMe operations.
#[derive(Debug, Error)]
pub enum FundMeError {
    // =================================================================
    // Contribution Errors (1xx)
    // =================================================================
    /// The contribution's USD equivalent is below the configured minimum.
    #[error("FM_ERR_100: Contribution too low: need {required_usd} USD, offered {offered_usd} USD")]
    InsufficientContribution {
        required_usd: Decimal,
        offered_usd: Decimal,
    },

    // =================================================================
    // Access Control Errors (2xx)
    // =================================================================
    /// A privileged operation was attempted by someone other than the owner.
    #[error("FM_ERR_200: Caller {caller} is not the owner")]
    NotOwner { caller: Address },

    // =================================================================
    // Query Errors (3xx)
    // =================================================================
    /// Funder index beyond the current funder count.
    #[error("FM_ERR_300: Funder index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    // =================================================================
    // Oracle Errors (4xx)
    // =================================================================
    /// The price read failed or returned unusable data.
    #[error("FM_ERR_400: Price oracle unavailable: {reason}")]
    OracleUnavailable { reason: String },

    // =================================================================
    // Withdrawal Errors (5xx)
    // =================================================================
    /// The outgoing withdrawal transfer was rejected.
    #[error("FM_ERR_500: Transfer failed: {reason}")]
    TransferFailed { reason: String },

    /// A call re-entered a shared ledger from the thread already inside it.
    #[error("FM_ERR_501: Re-entrant ledger call")]
    ReentrantCall,

    // =================================================================
    // Arithmetic / Invariant Errors (6xx)
    // =================================================================
    /// A balance or conversion would exceed the integer width.
    #[error("FM_ERR_600: Arithmetic overflow")]
    ArithmeticOverflow,

    /// Sum of contributor balances no longer matches custodied value.
    #[error("FM_ERR_601: Custody invariant violation: {reason}")]
    CustodyInvariantViolation { reason: String },

    // =================================================================
    // Deployment Errors (7xx)
    // =================================================================
    /// No configuration exists for the requested network.
    #[error("FM_ERR_700: Unknown network: {0}")]
    UnknownNetwork(String),

    /// Contract verification was rejected by the registry.
    #[error("FM_ERR_701: Verification failed: {0}")]
    VerificationFailed(String),

    /// An address string could not be parsed.
    #[error("FM_ERR_702: Invalid address: {0}")]
    InvalidAddress(String),

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("FM_ERR_900: Internal error: {0}")]
    Internal(String),

    /// Serialization / deserialization error.
    #[error("FM_ERR_901: Serialization error: {0}")]
    Serialization(String),

    /// Configuration error (invalid config file, missing fields, etc.).
    #[error("FM_ERR_902: Configuration error: {0}")]
    Configuration(String),

    /// I/O error.
    #[error("FM_ERR_903: I/O error: {0}")]
    Io(String),
}

impl FundMeError {
    /// Whether the caller can reasonably retry (with different input or as
    /// a different identity). Overflow and invariant violations are fatal.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            Self::ArithmeticOverflow | Self::CustodyInvariantViolation { .. } | Self::Internal(_)
        )
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, FundMeError>;

impl From<std::io::Error> for FundMeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for FundMeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
