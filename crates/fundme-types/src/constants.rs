//! System-wide constants for the FundMe custody ledger.

/// Decimal places of the native unit (wei per ether = 10^18).
pub const NATIVE_DECIMALS: u32 = 18;

/// Decimal places of USD values produced by the price converter.
pub const USD_DECIMALS: u32 = 18;

/// Minimum contribution: 50 USD in 18-decimal fixed point.
pub const MINIMUM_USD: u128 = 50 * 10u128.pow(USD_DECIMALS);

/// Largest oracle precision the converter accepts.
pub const MAX_FEED_DECIMALS: u8 = 18;

/// Default maximum age of an oracle answer before it is treated as stale
/// (one hour, the ETH/USD heartbeat on public feeds).
pub const DEFAULT_MAX_PRICE_AGE_SECS: u64 = 3600;

/// Decimals used by the mock aggregator on development chains.
pub const MOCK_DECIMALS: u8 = 8;

/// Initial answer of the mock aggregator: 2000 USD per ether at 8 decimals.
pub const MOCK_INITIAL_ANSWER: i128 = 2000 * 100_000_000;

/// Version reported by the mock aggregator.
pub const MOCK_FEED_VERSION: u64 = 4;

/// Default number of confirmations waited for after a deployment.
pub const DEFAULT_BLOCK_CONFIRMATIONS: u64 = 1;

/// Contract name used in deployment records.
pub const LEDGER_CONTRACT_NAME: &str = "FundMe";

/// Contract name of the development-chain price feed mock.
pub const MOCK_CONTRACT_NAME: &str = "MockV3Aggregator";
