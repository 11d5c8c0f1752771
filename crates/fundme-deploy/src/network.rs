//! Target network selection.
//!
//! Resolves a network name against [`NetworksConfig`] and carries the
//! facts a deployment needs: whether it is a development chain, which feed
//! to bind, and whether verification credentials are present.

use fundme_types::{Address, FundMeError, NetworkConfig, NetworksConfig, Result};

/// Environment variable naming the target network.
pub const NETWORK_ENV: &str = "FUNDME_NETWORK";
/// Environment variable pointing at a JSON networks file.
pub const NETWORKS_CONFIG_ENV: &str = "FUNDME_NETWORKS_CONFIG";
/// Environment variable holding the contract registry API key.
pub const VERIFY_API_KEY_ENV: &str = "FUNDME_VERIFY_API_KEY";

/// Network used when none is named.
pub const DEFAULT_NETWORK: &str = "hardhat";

/// A resolved deployment target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkContext {
    pub config: NetworkConfig,
    pub development: bool,
    /// Registry API key; verification is skipped without one.
    pub verify_api_key: Option<String>,
}

impl NetworkContext {
    /// Select `name` from `networks`.
    ///
    /// # Errors
    /// [`FundMeError::UnknownNetwork`] if the name is not configured.
    pub fn select(networks: &NetworksConfig, name: &str) -> Result<Self> {
        let config = networks.network(name)?.clone();
        let development = networks.is_development(name);
        tracing::debug!(
            network = %config.name,
            chain_id = config.chain_id,
            development,
            "Network selected"
        );
        Ok(Self {
            config,
            development,
            verify_api_key: None,
        })
    }

    /// Select the network from the environment.
    ///
    /// Reads [`NETWORKS_CONFIG_ENV`] (falling back to the built-in
    /// networks), [`NETWORK_ENV`] (falling back to [`DEFAULT_NETWORK`]) and
    /// [`VERIFY_API_KEY_ENV`].
    pub fn from_env() -> Result<Self> {
        let networks = match std::env::var(NETWORKS_CONFIG_ENV) {
            Ok(path) => {
                tracing::info!(path = %path, "Loading networks config");
                NetworksConfig::from_file(&path)?
            }
            Err(_) => NetworksConfig::default(),
        };
        let name = std::env::var(NETWORK_ENV).unwrap_or_else(|_| DEFAULT_NETWORK.to_string());
        let api_key = std::env::var(VERIFY_API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty());
        Ok(Self::select(&networks, &name)?.with_verify_api_key(api_key))
    }

    #[must_use]
    pub fn with_verify_api_key(mut self, api_key: Option<String>) -> Self {
        self.verify_api_key = api_key;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    #[must_use]
    pub fn block_confirmations(&self) -> u64 {
        self.config.block_confirmations
    }

    /// Configured live feed. Only meaningful off development chains.
    ///
    /// # Errors
    /// [`FundMeError::Configuration`] if no feed is configured.
    pub fn configured_price_feed(&self) -> Result<Address> {
        self.config.eth_usd_price_feed.ok_or_else(|| {
            FundMeError::Configuration(format!(
                "network {} has no eth_usd_price_feed",
                self.config.name
            ))
        })
    }

    /// Whether a deployment here should be submitted for verification.
    #[must_use]
    pub fn should_verify(&self) -> bool {
        !self.development && self.verify_api_key.is_some()
    }
}
