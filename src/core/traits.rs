use crate::core::{
    errors::ExchangeError,
    types::{
        Account, Balance, Currency, DepositAddress, KlineInterval, Market, MarketKind, Ohlcv,
        Order, OrderBook, OrderRequest, Ticker, Trade, TradingLimits, Transaction,
    },
};
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait MarketDataSource {
    /// Get all available markets across spot, futures and both swap flavors
    async fn get_markets(&self) -> Result<Vec<Market>, ExchangeError>;

    /// Get a 24h ticker snapshot for one symbol (spot only on this venue)
    async fn get_ticker(&self, symbol: &str) -> Result<Ticker, ExchangeError>;

    /// Get 24h tickers for every spot market
    async fn get_tickers(&self) -> Result<Vec<Ticker>, ExchangeError>;

    /// Get the aggregated order book for a spot symbol
    async fn get_order_book(&self, symbol: &str) -> Result<OrderBook, ExchangeError>;

    /// Get recent public trades for a spot symbol
    async fn get_trades(&self, symbol: &str, limit: Option<u32>)
        -> Result<Vec<Trade>, ExchangeError>;

    /// Get candles for any market kind
    async fn get_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Ohlcv>, ExchangeError>;

    /// Get the venue currency directory
    async fn get_currencies(&self) -> Result<Vec<Currency>, ExchangeError>;

    /// Get venue-enforced limit-order amount bounds for a spot symbol
    async fn get_trading_limits(&self, symbol: &str) -> Result<TradingLimits, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Place a new order
    async fn place_order(&self, order: OrderRequest) -> Result<Order, ExchangeError>;

    /// Cancel an order by id
    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<Order, ExchangeError>;

    /// Fetch a single order by id
    async fn get_order(&self, id: &str, symbol: &str) -> Result<Order, ExchangeError>;

    /// Fetch orders in the given venue states (comma-separated state set)
    async fn get_orders_by_states(
        &self,
        states: &str,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError>;

    /// Fetch orders in every queryable state
    async fn get_orders(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError>;

    /// Fetch open orders
    async fn get_open_orders(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError>;

    /// Fetch filled and canceled orders
    async fn get_closed_orders(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError>;

    /// Fetch the account's own fills
    async fn get_my_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    /// Get balances for the given market family
    async fn get_account_balance(&self, kind: MarketKind) -> Result<Vec<Balance>, ExchangeError>;

    /// List the venue accounts attached to the credentials
    async fn get_accounts(&self) -> Result<Vec<Account>, ExchangeError>;

    /// Get the deposit address for a currency
    async fn get_deposit_address(&self, currency: &str)
        -> Result<DepositAddress, ExchangeError>;

    /// Fetch deposit history, optionally filtered by currency
    async fn get_deposits(
        &self,
        currency: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ExchangeError>;

    /// Fetch withdrawal history, optionally filtered by currency
    async fn get_withdrawals(
        &self,
        currency: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ExchangeError>;

    /// Request a withdrawal
    async fn withdraw(
        &self,
        currency: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Transaction, ExchangeError>;
}

// Optional: Keep a composite trait for convenience when you need all functionality
#[async_trait]
pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {}
