use crate::core::types::{Account, Market};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Cache of the venue's market catalogue, indexed by canonical symbol
/// with a venue-id reverse index. Loaded once per connector and shared
/// by every component that needs symbol resolution.
#[derive(Debug, Default)]
pub struct MarketRegistry {
    inner: RwLock<MarketIndex>,
}

#[derive(Debug, Default)]
struct MarketIndex {
    by_symbol: HashMap<String, Market>,
    symbol_by_id: HashMap<String, String>,
}

impl MarketRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached catalogue with a fresh listing
    pub async fn store(&self, markets: &[Market]) {
        let mut index = self.inner.write().await;
        index.by_symbol.clear();
        index.symbol_by_id.clear();
        for market in markets {
            index
                .symbol_by_id
                .insert(market.id.clone(), market.symbol.clone());
            index.by_symbol.insert(market.symbol.clone(), market.clone());
        }
    }

    pub async fn is_loaded(&self) -> bool {
        !self.inner.read().await.by_symbol.is_empty()
    }

    /// Look up a market by canonical symbol, e.g. `BTC/USDT` or `BTC-USD`
    pub async fn resolve(&self, symbol: &str) -> Option<Market> {
        self.inner.read().await.by_symbol.get(symbol).cloned()
    }

    /// Reverse lookup by venue id, e.g. `btcusdt`
    pub async fn by_id(&self, id: &str) -> Option<Market> {
        let index = self.inner.read().await;
        index
            .symbol_by_id
            .get(id)
            .and_then(|symbol| index.by_symbol.get(symbol))
            .cloned()
    }

    pub async fn symbols(&self) -> Vec<String> {
        self.inner.read().await.by_symbol.keys().cloned().collect()
    }
}

/// Cache of the spot account listing. Spot order placement and balance
/// reads key off the numeric account id, so it is fetched once and
/// reused.
#[derive(Debug, Default)]
pub struct AccountRegistry {
    inner: RwLock<Option<Vec<Account>>>,
}

impl AccountRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn store(&self, accounts: Vec<Account>) {
        *self.inner.write().await = Some(accounts);
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.is_some()
    }

    pub async fn accounts(&self) -> Option<Vec<Account>> {
        self.inner.read().await.clone()
    }

    /// The account id spot endpoints key off: the account typed `spot`,
    /// falling back to the first listed account
    pub async fn spot_account_id(&self) -> Option<String> {
        let accounts = self.inner.read().await;
        let accounts = accounts.as_ref()?;
        accounts
            .iter()
            .find(|account| account.account_type.as_deref() == Some("spot"))
            .or_else(|| accounts.first())
            .map(|account| account.id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MarketKind, MarketLimits, MarketPrecision};
    use rust_decimal::Decimal;

    fn market(id: &str, symbol: &str, kind: MarketKind) -> Market {
        Market {
            id: id.to_string(),
            symbol: symbol.to_string(),
            base: "BTC".to_string(),
            quote: "USDT".to_string(),
            base_id: "btc".to_string(),
            quote_id: "usdt".to_string(),
            kind,
            active: true,
            precision: MarketPrecision {
                amount: 4,
                price: 2,
            },
            limits: MarketLimits::default(),
            taker: Decimal::new(2, 3),
            maker: Decimal::new(2, 3),
        }
    }

    #[tokio::test]
    async fn resolves_by_symbol_and_venue_id() {
        let registry = MarketRegistry::new();
        assert!(!registry.is_loaded().await);

        registry
            .store(&[
                market("btcusdt", "BTC/USDT", MarketKind::Spot),
                market("BTC-USDT", "BTC-USDT", MarketKind::UsdtSwap),
            ])
            .await;

        assert!(registry.is_loaded().await);
        assert_eq!(
            registry.resolve("BTC/USDT").await.unwrap().id,
            "btcusdt"
        );
        assert_eq!(
            registry.by_id("btcusdt").await.unwrap().symbol,
            "BTC/USDT"
        );
        assert_eq!(
            registry.by_id("BTC-USDT").await.unwrap().kind,
            MarketKind::UsdtSwap
        );
        assert!(registry.resolve("ETH/USDT").await.is_none());
    }

    #[tokio::test]
    async fn restore_replaces_previous_catalogue() {
        let registry = MarketRegistry::new();
        registry
            .store(&[market("btcusdt", "BTC/USDT", MarketKind::Spot)])
            .await;
        registry
            .store(&[market("ethusdt", "ETH/USDT", MarketKind::Spot)])
            .await;

        assert!(registry.resolve("BTC/USDT").await.is_none());
        assert_eq!(registry.symbols().await, vec!["ETH/USDT".to_string()]);
    }

    #[tokio::test]
    async fn spot_account_is_preferred() {
        let registry = AccountRegistry::new();
        assert_eq!(registry.spot_account_id().await, None);

        registry
            .store(vec![
                Account {
                    id: "1".to_string(),
                    account_type: Some("point".to_string()),
                    state: Some("working".to_string()),
                    subtype: None,
                },
                Account {
                    id: "2".to_string(),
                    account_type: Some("spot".to_string()),
                    state: Some("working".to_string()),
                    subtype: None,
                },
            ])
            .await;

        assert_eq!(registry.spot_account_id().await, Some("2".to_string()));
    }

    #[tokio::test]
    async fn first_account_is_the_fallback() {
        let registry = AccountRegistry::new();
        registry
            .store(vec![Account {
                id: "7".to_string(),
                account_type: Some("margin".to_string()),
                state: None,
                subtype: None,
            }])
            .await;

        assert_eq!(registry.spot_account_id().await, Some("7".to_string()));
    }
}
