/// `Huobix` Kernel - Unified transport layer
///
/// This module provides the exchange-agnostic REST transport. The kernel
/// follows strict separation of concerns, containing only transport logic
/// and generic interfaces.
///
/// # Architecture
///
/// ## Transport Layer
/// - `RestClient`: Unified HTTP client interface
/// - `ReqwestRest`: Production implementation backed by reqwest
///
/// ## Authentication
/// - `Signer`: Pluggable authentication interface. The venue-specific
///   implementation lives with the exchange module; the kernel only knows
///   how to hand a request to a signer and merge the signed output back in.
///
/// # Key Principles
///
/// 1. **Transport Only**: The kernel contains NO exchange-specific logic
/// 2. **Pluggable**: All components are trait-based and configurable
/// 3. **Type Safe**: Strong typing throughout with proper error handling
/// 4. **Observable**: Comprehensive tracing support
/// 5. **Testable**: Dependency injection for easy testing
///
/// # Usage
///
/// ```rust,no_run
/// use huobix::core::kernel::{RestClientBuilder, RestClientConfig, RestClient};
/// use huobix::core::types::Market;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let rest_config = RestClientConfig::new(
///     "https://api.huobi.pro".to_string(),
///     "huobi".to_string(),
/// );
/// let rest = RestClientBuilder::new(rest_config).build()?;
///
/// // Typed responses deserialize straight into your DTOs
/// let value: serde_json::Value = rest
///     .get_json("/v1/common/symbols", &[], false)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub mod rest;
pub mod signer;

// Re-export key types for convenience
pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{NoopSigner, SignatureResult, Signer};
