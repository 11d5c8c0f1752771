//! # fundme-types
//!
//! Shared types, errors, and configuration for the **FundMe** custody ledger.
//!
//! This crate is the leaf dependency of the workspace. Every other crate
//! depends on it. It defines:
//!
//! - **Identities**: [`Address`]
//! - **Amounts**: [`Wei`] (native unit and 18-decimal USD fixed point)
//! - **Oracle model**: [`PriceData`]
//! - **Records**: [`Contribution`], [`WithdrawalReceipt`], [`WithdrawStrategy`], [`StorageCost`]
//! - **Configuration**: [`LedgerConfig`], [`NetworkConfig`], [`NetworksConfig`]
//! - **Errors**: [`FundMeError`] with `FM_ERR_` prefix codes
//! - **Constants**: thresholds, mock feed parameters, defaults

pub mod address;
pub mod amount;
pub mod config;
pub mod constants;
pub mod error;
pub mod price;
pub mod receipt;

// Re-export all primary types at crate root for ergonomic imports:
//   use fundme_types::{Address, Wei, FundMeError, ...};

pub use address::*;
pub use amount::*;
pub use config::*;
pub use error::*;
pub use price::*;
pub use receipt::*;

// Constants are accessed via `fundme_types::constants::FOO`
// (not re-exported to avoid name collisions).
