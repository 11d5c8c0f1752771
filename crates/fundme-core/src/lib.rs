//! # fundme-core
//!
//! **Custody plane**: accepts contributions priced through an oracle and
//! pays the whole balance out to the owner on request.
//!
//! ## Architecture
//!
//! A [`Ledger`] holds:
//! 1. An [`OwnerGuard`] fixed at construction
//! 2. A bound [`PriceSource`] used to enforce the USD minimum
//! 3. [`Books`]: per-funder balances plus the contribution-order list
//! 4. A [`CustodyAudit`] checked against the books after every change
//!
//! ## Withdrawal strategies
//!
//! - **Straightforward**: re-reads the funder list on every iteration
//! - **Optimized**: copies the list once and walks the copy
//!
//! Both produce identical end states; only the reported [`StorageCost`]
//! differs.
//!
//! [`StorageCost`]: fundme_types::StorageCost

pub mod access;
pub mod books;
pub mod custody_audit;
pub mod ledger;
pub mod oracle;
pub mod price_converter;
pub mod shared;
pub mod transfer;

pub use access::OwnerGuard;
pub use books::Books;
pub use custody_audit::CustodyAudit;
pub use ledger::Ledger;
pub use oracle::{MockV3Aggregator, PriceSource};
pub use shared::SharedLedger;
pub use transfer::{AccountBook, Transfer, ValueSink};
