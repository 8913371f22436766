use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TypesError {
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    #[error("Invalid decimal: {0}")]
    InvalidDecimal(#[from] rust_decimal::Error),
}

/// Market family a unified operation targets. Exactly one applies to any
/// given market; routing and request assembly match on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarketKind {
    Spot,
    Futures,
    Swap,
    UsdtSwap,
}

impl MarketKind {
    /// Coarse canonical market type. Both margin flavors of perpetual swap
    /// render as `"swap"`.
    pub fn market_type(self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::Futures => "futures",
            Self::Swap | Self::UsdtSwap => "swap",
        }
    }

    pub fn is_derivative(self) -> bool {
        !matches!(self, Self::Spot)
    }
}

impl fmt::Display for MarketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Spot => "spot",
            Self::Futures => "futures",
            Self::Swap => "swap",
            Self::UsdtSwap => "usdtSwap",
        };
        write!(f, "{label}")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MinMax {
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketLimits {
    pub amount: MinMax,
    pub price: MinMax,
    pub cost: MinMax,
}

/// Decimal-place counts, not tick sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketPrecision {
    pub amount: u32,
    pub price: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    /// Venue identifier, e.g. `btcusdt`, `BTC-USD`, `BTC201225`.
    pub id: String,
    /// Canonical symbol: `BASE/QUOTE` for spot, the contract code otherwise.
    pub symbol: String,
    pub base: String,
    pub quote: String,
    pub base_id: String,
    pub quote_id: String,
    pub kind: MarketKind,
    pub active: bool,
    pub precision: MarketPrecision,
    pub limits: MarketLimits,
    pub taker: Decimal,
    pub maker: Decimal,
}

impl Market {
    /// Truncates (never rounds) to the market's amount precision.
    /// Idempotent: applying it twice equals applying it once.
    pub fn amount_to_precision(&self, amount: Decimal) -> Decimal {
        amount.trunc_with_scale(self.precision.amount).normalize()
    }

    pub fn price_to_precision(&self, price: Decimal) -> Decimal {
        price.trunc_with_scale(self.precision.price).normalize()
    }

    /// Quote-denominated cost truncates with the price precision rule.
    /// The venue encodes cost-denominated market buys this way, so the
    /// asymmetry is deliberate.
    pub fn cost_to_precision(&self, cost: Decimal) -> Decimal {
        cost.trunc_with_scale(self.precision.price).normalize()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "buy" => Some(Self::Buy),
            "sell" => Some(Self::Sell),
            _ => None,
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderType {
    Limit,
    Market,
    Ioc,
    LimitMaker,
}

impl OrderType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Limit => "limit",
            Self::Market => "market",
            Self::Ioc => "ioc",
            Self::LimitMaker => "limit-maker",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "limit" => Some(Self::Limit),
            "market" => Some(Self::Market),
            "ioc" => Some(Self::Ioc),
            "limit-maker" => Some(Self::LimitMaker),
            _ => None,
        }
    }

    /// Limit-flavored types carry a price on the wire.
    pub fn is_priced(self) -> bool {
        matches!(self, Self::Limit | Self::Ioc | Self::LimitMaker)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TakerOrMaker {
    Taker,
    Maker,
}

impl TakerOrMaker {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Taker => "taker",
            Self::Maker => "maker",
        }
    }

    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "taker" => Some(Self::Taker),
            "maker" => Some(Self::Maker),
            _ => None,
        }
    }
}

/// Canonical order lifecycle state. Venue states with no canonical
/// counterpart pass through unchanged in `Other`; parsing never fails.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
    Canceling,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Canceled => "canceled",
            Self::Canceling => "canceling",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for OrderStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for OrderStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "open" => Self::Open,
            "closed" => Self::Closed,
            "canceled" => Self::Canceled,
            "canceling" => Self::Canceling,
            _ => Self::Other(raw),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub cost: Option<Decimal>,
    pub currency: Option<String>,
    pub rate: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub symbol: Option<String>,
    pub timestamp: Option<i64>,
    pub bid: Option<Decimal>,
    pub bid_volume: Option<Decimal>,
    pub ask: Option<Decimal>,
    pub ask_volume: Option<Decimal>,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Option<Decimal>,
    pub last: Option<Decimal>,
    pub change: Option<Decimal>,
    pub percentage: Option<Decimal>,
    pub average: Option<Decimal>,
    pub vwap: Option<Decimal>,
    pub base_volume: Option<Decimal>,
    pub quote_volume: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrderBookEntry {
    pub price: Decimal,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub symbol: Option<String>,
    pub bids: Vec<OrderBookEntry>,
    pub asks: Vec<OrderBookEntry>,
    pub timestamp: Option<i64>,
    pub nonce: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub id: Option<String>,
    pub order: Option<String>,
    pub symbol: Option<String>,
    pub timestamp: Option<i64>,
    pub side: Option<OrderSide>,
    pub order_type: Option<OrderType>,
    pub taker_or_maker: Option<TakerOrMaker>,
    pub price: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub fee: Option<Fee>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<String>,
    pub client_order_id: Option<String>,
    pub symbol: Option<String>,
    pub timestamp: Option<i64>,
    pub side: Option<OrderSide>,
    pub order_type: Option<OrderType>,
    pub status: Option<OrderStatus>,
    pub price: Option<Decimal>,
    pub average: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub filled: Option<Decimal>,
    pub remaining: Option<Decimal>,
    pub cost: Option<Decimal>,
    pub fee: Option<Fee>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    pub asset: String,
    pub free: Option<Decimal>,
    pub used: Option<Decimal>,
    pub total: Option<Decimal>,
}

impl Balance {
    /// Fills in whichever of free/used/total is absent when the other two
    /// are known.
    pub fn with_derived(mut self) -> Self {
        match (self.free, self.used, self.total) {
            (Some(free), Some(used), None) => self.total = Some(free + used),
            (Some(free), None, Some(total)) => self.used = Some(total - free),
            (None, Some(used), Some(total)) => self.free = Some(total - used),
            _ => {}
        }
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
}

impl TransactionType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
        }
    }
}

/// Deposit/withdrawal lifecycle state, same passthrough rule as
/// `OrderStatus`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransactionStatus {
    Pending,
    Ok,
    Failed,
    Canceled,
    Other(String),
}

impl TransactionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Ok => "ok",
            Self::Failed => "failed",
            Self::Canceled => "canceled",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for TransactionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TransactionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "pending" => Self::Pending,
            "ok" => Self::Ok,
            "failed" => Self::Failed,
            "canceled" => Self::Canceled,
            _ => Self::Other(raw),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Option<String>,
    pub txid: Option<String>,
    pub timestamp: Option<i64>,
    pub updated: Option<i64>,
    pub currency: Option<String>,
    pub amount: Option<Decimal>,
    pub address: Option<String>,
    pub tag: Option<String>,
    pub transaction_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub fee: Option<Fee>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Currency {
    pub id: String,
    pub code: String,
    pub name: Option<String>,
    pub active: bool,
    pub precision: Option<u32>,
    pub deposit_min: Option<Decimal>,
    pub withdraw_min: Option<Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub account_type: Option<String>,
    pub state: Option<String>,
    pub subtype: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepositAddress {
    pub currency: Option<String>,
    pub address: Option<String>,
    pub tag: Option<String>,
    pub chain: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradingLimits {
    pub symbol: Option<String>,
    pub amount: MinMax,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Ohlcv {
    pub timestamp: i64,
    pub open: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub close: Option<Decimal>,
    pub volume: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub amount: Decimal,
    pub price: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KlineInterval {
    Minutes1,
    Minutes5,
    Minutes15,
    Minutes30,
    Hours1,
    Hours4,
    Days1,
    Weeks1,
    Months1,
    Years1,
}

impl KlineInterval {
    /// Canonical timeframe code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Minutes1 => "1m",
            Self::Minutes5 => "5m",
            Self::Minutes15 => "15m",
            Self::Minutes30 => "30m",
            Self::Hours1 => "1h",
            Self::Hours4 => "4h",
            Self::Days1 => "1d",
            Self::Weeks1 => "1w",
            Self::Months1 => "1M",
            Self::Years1 => "1y",
        }
    }

    /// The venue's `period` encoding for the candle endpoints.
    pub fn to_huobi_period(self) -> &'static str {
        match self {
            Self::Minutes1 => "1min",
            Self::Minutes5 => "5min",
            Self::Minutes15 => "15min",
            Self::Minutes30 => "30min",
            Self::Hours1 => "60min",
            Self::Hours4 => "4hour",
            Self::Days1 => "1day",
            Self::Weeks1 => "1week",
            Self::Months1 => "1mon",
            Self::Years1 => "1year",
        }
    }
}

impl FromStr for KlineInterval {
    type Err = TypesError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "1m" => Ok(Self::Minutes1),
            "5m" => Ok(Self::Minutes5),
            "15m" => Ok(Self::Minutes15),
            "30m" => Ok(Self::Minutes30),
            "1h" => Ok(Self::Hours1),
            "4h" => Ok(Self::Hours4),
            "1d" => Ok(Self::Days1),
            "1w" => Ok(Self::Weeks1),
            "1M" => Ok(Self::Months1),
            "1y" => Ok(Self::Years1),
            other => Err(TypesError::InvalidInterval(other.to_string())),
        }
    }
}

impl fmt::Display for KlineInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spot_market() -> Market {
        Market {
            id: "btcusdt".to_string(),
            symbol: "BTC/USDT".to_string(),
            base: "BTC".to_string(),
            quote: "USDT".to_string(),
            base_id: "btc".to_string(),
            quote_id: "usdt".to_string(),
            kind: MarketKind::Spot,
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

    #[test]
    fn amount_precision_truncates_and_is_idempotent() {
        let market = spot_market();
        let raw = Decimal::from_str("1.23456789").unwrap();
        let once = market.amount_to_precision(raw);
        assert_eq!(once, Decimal::from_str("1.2345").unwrap());
        assert_eq!(market.amount_to_precision(once), once);
    }

    #[test]
    fn cost_precision_follows_price_rule() {
        let market = spot_market();
        let cost = Decimal::from_str("20.129")
            .map(|value| market.cost_to_precision(value))
            .unwrap();
        assert_eq!(cost.to_string(), "20.12");
    }

    #[test]
    fn precision_strips_trailing_zeros() {
        let market = spot_market();
        let amount = market.amount_to_precision(Decimal::from_str("2.5000").unwrap());
        assert_eq!(amount.to_string(), "2.5");
        let whole = market.cost_to_precision(Decimal::from_str("20").unwrap());
        assert_eq!(whole.to_string(), "20");
    }

    #[test]
    fn balance_derives_missing_component() {
        let balance = Balance {
            asset: "BTC".to_string(),
            free: Some(Decimal::new(15, 1)),
            used: Some(Decimal::new(5, 1)),
            total: None,
        }
        .with_derived();
        assert_eq!(balance.total, Some(Decimal::new(20, 1)));

        let balance = Balance {
            asset: "BTC".to_string(),
            free: Some(Decimal::new(15, 1)),
            used: None,
            total: Some(Decimal::new(20, 1)),
        }
        .with_derived();
        assert_eq!(balance.used, Some(Decimal::new(5, 1)));
    }

    #[test]
    fn interval_round_trips_and_maps_to_venue_period() {
        for (code, period) in [
            ("1m", "1min"),
            ("30m", "30min"),
            ("1h", "60min"),
            ("4h", "4hour"),
            ("1d", "1day"),
            ("1w", "1week"),
            ("1M", "1mon"),
            ("1y", "1year"),
        ] {
            let interval: KlineInterval = code.parse().unwrap();
            assert_eq!(interval.as_str(), code);
            assert_eq!(interval.to_huobi_period(), period);
        }
        assert!("2h".parse::<KlineInterval>().is_err());
    }

    #[test]
    fn market_kind_renders_canonical_type() {
        assert_eq!(MarketKind::Spot.market_type(), "spot");
        assert_eq!(MarketKind::Futures.market_type(), "futures");
        assert_eq!(MarketKind::Swap.market_type(), "swap");
        assert_eq!(MarketKind::UsdtSwap.market_type(), "swap");
        assert_eq!(MarketKind::UsdtSwap.to_string(), "usdtSwap");
    }

    #[test]
    fn status_passthrough_preserves_unknown_values() {
        let status: OrderStatus = serde_json::from_str("\"pre-submitted\"").unwrap();
        assert_eq!(status, OrderStatus::Other("pre-submitted".to_string()));
        assert_eq!(status.as_str(), "pre-submitted");

        let status: TransactionStatus = serde_json::from_str("\"verifying\"").unwrap();
        assert_eq!(status.as_str(), "verifying");
    }
}
