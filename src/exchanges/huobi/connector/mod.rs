use crate::core::errors::{ExchangeError, VenueError};
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer};
use crate::core::types::{
    Account, Balance, Currency, DepositAddress, KlineInterval, Market, MarketKind, Ohlcv, Order,
    OrderBook, OrderRequest, Ticker, Trade, TradingLimits, Transaction,
};
use crate::exchanges::huobi::conversions;
use crate::exchanges::huobi::registry::{AccountRegistry, MarketRegistry};
use crate::exchanges::huobi::rest::HuobiRestClient;
use crate::exchanges::huobi::router::Operation;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::warn;

pub mod market_data;
pub mod trading;
pub mod wallet;

pub use market_data::MarketData;
pub use trading::Trading;
pub use wallet::Wallet;

/// Which route serves spot open orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenOrdersMethod {
    /// Query the states route with the open state set.
    #[default]
    StatesQuery,
    /// Query the dedicated `order/openOrders` route, keyed by account id.
    Dedicated,
}

/// Which spot route serves orders-by-states queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpotStatesEndpoint {
    /// `order/orders`, the default.
    #[default]
    Orders,
    /// `order/history`, a larger window with fewer filters.
    History,
}

impl SpotStatesEndpoint {
    pub(crate) fn operation(self) -> Operation {
        match self {
            Self::Orders => Operation::OrdersByStates,
            Self::History => Operation::OrderHistory,
        }
    }
}

/// Behavior switches the venue leaves to the integrator.
#[derive(Debug, Clone)]
pub struct HuobiOptions {
    /// When true, spot market buys must carry a `price` so the quote cost
    /// can be computed as `amount * price`. When false, `amount` is taken
    /// as the quote cost directly.
    pub create_market_buy_order_requires_price: bool,
    pub open_orders_method: OpenOrdersMethod,
    pub spot_states_endpoint: SpotStatesEndpoint,
    /// Language code sent to the currency directory route.
    pub language: String,
}

impl Default for HuobiOptions {
    fn default() -> Self {
        Self {
            create_market_buy_order_requires_price: true,
            open_orders_method: OpenOrdersMethod::default(),
            spot_states_endpoint: SpotStatesEndpoint::default(),
            language: "en-US".to_string(),
        }
    }
}

/// Fetches every market family and converts each listing, skipping rows
/// the venue ships malformed.
pub(crate) async fn load_markets<R: RestClient>(
    rest: &HuobiRestClient<R>,
) -> Result<Vec<Market>, ExchangeError> {
    let spot = rest.spot_symbols().await?;
    let futures = rest.contract_info(MarketKind::Futures).await?;
    let swaps = rest.contract_info(MarketKind::Swap).await?;
    let usdt_swaps = rest.contract_info(MarketKind::UsdtSwap).await?;

    let mut markets =
        Vec::with_capacity(spot.len() + futures.len() + swaps.len() + usdt_swaps.len());
    for entry in &spot {
        match conversions::convert_huobi_spot_market(entry) {
            Ok(market) => markets.push(market),
            Err(error) => warn!(%error, "skipping malformed spot symbol"),
        }
    }
    for entry in futures.iter().chain(&swaps).chain(&usdt_swaps) {
        match conversions::convert_huobi_contract_market(entry) {
            Ok(market) => markets.push(market),
            Err(error) => warn!(%error, "skipping malformed contract listing"),
        }
    }
    Ok(markets)
}

/// Resolves a canonical symbol against the market registry, loading the
/// registry on first use.
pub(crate) async fn resolve_market<R: RestClient>(
    rest: &HuobiRestClient<R>,
    markets: &MarketRegistry,
    symbol: &str,
) -> Result<Market, ExchangeError> {
    if !markets.is_loaded().await {
        let loaded = load_markets(rest).await?;
        markets.store(&loaded).await;
    }
    markets.resolve(symbol).await.ok_or_else(|| {
        ExchangeError::BadSymbol(VenueError::new(
            "resolve_symbol",
            None,
            Some(format!("{symbol} is not a listed market")),
        ))
    })
}

/// Returns the venue accounts, loading and caching them on first use.
pub(crate) async fn load_accounts<R: RestClient>(
    rest: &HuobiRestClient<R>,
    accounts: &AccountRegistry,
) -> Result<Vec<Account>, ExchangeError> {
    if let Some(known) = accounts.accounts().await {
        return Ok(known);
    }
    let rows = rest.accounts().await?;
    let mut converted = Vec::with_capacity(rows.len());
    for row in &rows {
        converted.push(conversions::convert_huobi_account(row)?);
    }
    accounts.store(converted.clone()).await;
    Ok(converted)
}

/// The spot account id every spot private request keys off.
pub(crate) async fn spot_account_id<R: RestClient>(
    rest: &HuobiRestClient<R>,
    accounts: &AccountRegistry,
) -> Result<String, ExchangeError> {
    load_accounts(rest, accounts).await?;
    accounts.spot_account_id().await.ok_or_else(|| {
        ExchangeError::ConfigurationError("credentials have no spot account attached".to_string())
    })
}

/// Huobi connector composing the per-concern implementations.
pub struct HuobiConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub wallet: Wallet<R>,
}

impl<R: RestClient> HuobiConnector<R> {
    pub fn new(rest: HuobiRestClient<R>, options: HuobiOptions) -> Self {
        let rest = Arc::new(rest);
        let markets = Arc::new(MarketRegistry::new());
        let accounts = Arc::new(AccountRegistry::new());
        Self {
            market: MarketData::new(Arc::clone(&rest), Arc::clone(&markets), options.clone()),
            trading: Trading::new(
                Arc::clone(&rest),
                Arc::clone(&markets),
                Arc::clone(&accounts),
                options,
            ),
            wallet: Wallet::new(rest, accounts),
        }
    }

    /// Fills of one order by id. The contract APIs only report fills per
    /// order, so this is the derivative counterpart of `get_my_trades`.
    pub async fn get_order_trades(
        &self,
        id: &str,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.trading.get_order_trades(id, symbol, limit).await
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for HuobiConnector<R> {
    async fn get_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        self.market.get_markets().await
    }

    async fn get_ticker(&self, symbol: &str) -> Result<Ticker, ExchangeError> {
        self.market.get_ticker(symbol).await
    }

    async fn get_tickers(&self) -> Result<Vec<Ticker>, ExchangeError> {
        self.market.get_tickers().await
    }

    async fn get_order_book(&self, symbol: &str) -> Result<OrderBook, ExchangeError> {
        self.market.get_order_book(symbol).await
    }

    async fn get_trades(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.market.get_trades(symbol, limit).await
    }

    async fn get_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Ohlcv>, ExchangeError> {
        self.market.get_klines(symbol, interval, since, limit).await
    }

    async fn get_currencies(&self) -> Result<Vec<Currency>, ExchangeError> {
        self.market.get_currencies().await
    }

    async fn get_trading_limits(&self, symbol: &str) -> Result<TradingLimits, ExchangeError> {
        self.market.get_trading_limits(symbol).await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for HuobiConnector<R> {
    async fn place_order(&self, order: OrderRequest) -> Result<Order, ExchangeError> {
        self.trading.place_order(order).await
    }

    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<Order, ExchangeError> {
        self.trading.cancel_order(id, symbol).await
    }

    async fn get_order(&self, id: &str, symbol: &str) -> Result<Order, ExchangeError> {
        self.trading.get_order(id, symbol).await
    }

    async fn get_orders_by_states(
        &self,
        states: &str,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.trading
            .get_orders_by_states(states, symbol, since, limit)
            .await
    }

    async fn get_orders(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.trading.get_orders(symbol, since, limit).await
    }

    async fn get_open_orders(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.trading.get_open_orders(symbol, since, limit).await
    }

    async fn get_closed_orders(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        self.trading.get_closed_orders(symbol, since, limit).await
    }

    async fn get_my_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        self.trading.get_my_trades(symbol, since, limit).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for HuobiConnector<R> {
    async fn get_account_balance(&self, kind: MarketKind) -> Result<Vec<Balance>, ExchangeError> {
        self.wallet.get_account_balance(kind).await
    }

    async fn get_accounts(&self) -> Result<Vec<Account>, ExchangeError> {
        self.wallet.get_accounts().await
    }

    async fn get_deposit_address(&self, currency: &str) -> Result<DepositAddress, ExchangeError> {
        self.wallet.get_deposit_address(currency).await
    }

    async fn get_deposits(
        &self,
        currency: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        self.wallet.get_deposits(currency, limit).await
    }

    async fn get_withdrawals(
        &self,
        currency: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        self.wallet.get_withdrawals(currency, limit).await
    }

    async fn withdraw(
        &self,
        currency: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Transaction, ExchangeError> {
        self.wallet.withdraw(currency, amount, address, tag).await
    }
}

impl<R: RestClient> ExchangeConnector for HuobiConnector<R> {}
