use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::exchanges::huobi::connector::{HuobiConnector, HuobiOptions};
use crate::exchanges::huobi::rest::HuobiRestClient;
use crate::exchanges::huobi::router;
use crate::exchanges::huobi::signer::HuobiSigner;
use std::sync::Arc;

/// Builder for Huobi connectors.
///
/// Two kernel clients come out of a build: one against the spot host
/// (overridable through the config) and one against the fixed contract
/// host. Each gets its own signer because the hostname is part of the
/// signed payload.
pub struct HuobiBuilder {
    config: ExchangeConfig,
    options: HuobiOptions,
    rest_timeout: u64,
    rest_max_retries: u32,
}

impl HuobiBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::read_only(),
            options: HuobiOptions::default(),
            rest_timeout: 30,
            rest_max_retries: 3,
        }
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set API credentials
    pub fn with_credentials(mut self, api_key: String, secret_key: String) -> Self {
        let testnet = self.config.testnet;
        let hostname = self.config.hostname.clone();
        let mut config = ExchangeConfig::new(api_key, secret_key).testnet(testnet);
        if let Some(hostname) = hostname {
            config = config.hostname(hostname);
        }
        self.config = config;
        self
    }

    /// Set testnet mode (spot only; contracts have no testnet host)
    pub fn with_testnet(mut self, testnet: bool) -> Self {
        self.config.testnet = testnet;
        self
    }

    /// Override the spot API hostname
    pub fn with_hostname(mut self, hostname: String) -> Self {
        self.config.hostname = Some(hostname);
        self
    }

    /// Set the behavior switches
    pub fn with_options(mut self, options: HuobiOptions) -> Self {
        self.options = options;
        self
    }

    /// Set REST client timeout in seconds
    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.rest_timeout = timeout;
        self
    }

    /// Set REST client maximum retries
    pub fn with_rest_max_retries(mut self, retries: u32) -> Self {
        self.rest_max_retries = retries;
        self
    }

    /// Build the connector
    pub fn build(self) -> Result<HuobiConnector<ReqwestRest>, ExchangeError> {
        let spot_host = router::spot_host(&self.config);
        let spot = self.rest_client(&spot_host)?;
        let contract = self.rest_client(router::CONTRACT_HOST)?;
        Ok(HuobiConnector::new(
            HuobiRestClient::new(spot, contract),
            self.options,
        ))
    }

    fn rest_client(&self, host: &str) -> Result<ReqwestRest, ExchangeError> {
        let rest_config = RestClientConfig::new(format!("https://{host}"), "huobi".to_string())
            .with_timeout(self.rest_timeout)
            .with_max_retries(self.rest_max_retries);
        let mut builder = RestClientBuilder::new(rest_config);
        if self.config.has_credentials() {
            let signer = Arc::new(HuobiSigner::new(
                self.config.api_key().to_string(),
                self.config.secret_key().to_string(),
                host.to_string(),
            ));
            builder = builder.with_signer(signer);
        }
        builder.build()
    }
}

impl Default for HuobiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a connector from a prepared configuration
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<HuobiConnector<ReqwestRest>, ExchangeError> {
    HuobiBuilder::new().with_config(config).build()
}

/// Create a credential-free connector for public market data
pub fn build_read_only_connector() -> Result<HuobiConnector<ReqwestRest>, ExchangeError> {
    HuobiBuilder::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_without_credentials() {
        let result = build_read_only_connector();
        assert!(result.is_ok());
    }

    #[test]
    fn builds_with_credentials() {
        let result = HuobiBuilder::new()
            .with_credentials("key".to_string(), "secret".to_string())
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn credentials_survive_testnet_ordering() {
        let builder = HuobiBuilder::new()
            .with_testnet(true)
            .with_credentials("key".to_string(), "secret".to_string());
        assert!(builder.config.testnet);
        assert!(builder.config.has_credentials());
    }

    #[test]
    fn builds_against_a_custom_hostname() {
        let result = HuobiBuilder::new()
            .with_hostname("api.huobi.de.com".to_string())
            .build();
        assert!(result.is_ok());
    }
}
