use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Spot symbol entry from `/v1/common/symbols`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiSpotSymbol {
    pub symbol: Option<String>, // e.g. btcusdt
    #[serde(rename = "base-currency")]
    pub base_currency: Option<String>,
    #[serde(rename = "quote-currency")]
    pub quote_currency: Option<String>,
    #[serde(rename = "price-precision")]
    pub price_precision: Option<u32>,
    #[serde(rename = "amount-precision")]
    pub amount_precision: Option<u32>,
    #[serde(rename = "symbol-partition")]
    pub symbol_partition: Option<String>,
    pub state: Option<String>, // online, offline, suspend
    #[serde(rename = "min-order-amt")]
    pub min_order_amt: Option<Decimal>,
    #[serde(rename = "max-order-amt")]
    pub max_order_amt: Option<Decimal>,
    #[serde(rename = "min-order-value")]
    pub min_order_value: Option<Decimal>,
}

/// Contract entry shared by `/api/v1/contract_contract_info` and both
/// `swap_contract_info` endpoints. Futures rows carry `contract_type` and
/// a delivery date; perpetual rows do not.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiContractInfo {
    pub symbol: Option<String>, // base currency id, e.g. BTC
    pub contract_code: Option<String>, // BTC201225, BTC-USD, BTC-USDT
    pub contract_type: Option<String>, // this_week, next_week, quarter
    pub contract_size: Option<Decimal>,
    pub price_tick: Option<Decimal>,
    pub delivery_date: Option<String>,
    pub create_date: Option<String>,
    pub contract_status: Option<i32>, // 1 = trading
}

/// Best bid/ask encoding: the merged-detail endpoint sends `[price, size]`
/// arrays while the bulk-tickers endpoint sends a scalar price with
/// `bidSize`/`askSize` alongside.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(untagged)]
pub enum HuobiBidAsk {
    Level(Vec<Decimal>),
    Price(Decimal),
}

impl HuobiBidAsk {
    pub fn price(&self) -> Option<Decimal> {
        match self {
            Self::Level(level) => level.first().copied(),
            Self::Price(price) => Some(*price),
        }
    }

    /// Size is only carried inline in the array encoding.
    pub fn size(&self) -> Option<Decimal> {
        match self {
            Self::Level(level) => level.get(1).copied(),
            Self::Price(_) => None,
        }
    }
}

/// Ticker payload, shared by `/market/detail/merged` (under `tick`) and
/// `/market/tickers` rows (with `symbol` set)
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiTicker {
    pub symbol: Option<String>,
    pub open: Option<Decimal>,
    pub close: Option<Decimal>,
    pub high: Option<Decimal>,
    pub low: Option<Decimal>,
    pub amount: Option<Decimal>, // base volume
    pub vol: Option<Decimal>,    // quote volume
    pub count: Option<i64>,
    pub bid: Option<HuobiBidAsk>,
    pub ask: Option<HuobiBidAsk>,
    #[serde(rename = "bidSize")]
    pub bid_size: Option<Decimal>,
    #[serde(rename = "askSize")]
    pub ask_size: Option<Decimal>,
    pub ts: Option<i64>,
    pub version: Option<i64>,
}

/// Depth payload from `/market/depth` (under `tick`)
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiDepth {
    pub bids: Vec<Vec<Decimal>>, // [price, amount]
    pub asks: Vec<Vec<Decimal>>,
    pub ts: Option<i64>,
    pub version: Option<i64>,
}

/// Candle row, shared by the spot and contract kline endpoints
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiKline {
    pub id: Option<i64>, // bucket open time in seconds
    pub open: Option<Decimal>,
    pub close: Option<Decimal>,
    pub low: Option<Decimal>,
    pub high: Option<Decimal>,
    pub amount: Option<Decimal>, // base volume
    pub vol: Option<Decimal>,
    pub count: Option<i64>,
}

/// Public trade bucket from `/market/history/trade`: each row wraps the
/// actual fills in a nested `data` array
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiTradeBucket {
    pub id: Option<u64>,
    pub ts: Option<i64>,
    pub data: Vec<HuobiTrade>,
}

/// Trade/fill payload. One shape serves public trades, spot match
/// results (hyphenated keys) and contract order-detail fills
/// (underscored keys); absent keys stay `None`.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiTrade {
    pub id: Option<u64>,
    #[serde(rename = "trade-id")]
    pub trade_id: Option<u64>,
    #[serde(rename = "tradeId")]
    pub trade_id_alt: Option<u64>,
    pub symbol: Option<String>,
    pub contract_code: Option<String>,
    pub ts: Option<i64>,
    #[serde(rename = "created-at")]
    pub created_at: Option<i64>,
    #[serde(rename = "created_at")]
    pub created_at_contract: Option<i64>,
    #[serde(rename = "order-id")]
    pub order_id: Option<u64>,
    #[serde(rename = "order_id")]
    pub order_id_contract: Option<u64>,
    pub direction: Option<String>, // buy, sell
    #[serde(rename = "type")]
    pub order_type: Option<String>, // e.g. sell-limit
    pub role: Option<String>, // taker, maker
    pub price: Option<Decimal>,
    pub trade_price: Option<Decimal>,
    pub amount: Option<Decimal>,
    #[serde(rename = "filled-amount")]
    pub filled_amount: Option<Decimal>,
    pub trade_volume: Option<Decimal>,
    pub trade_turnover: Option<Decimal>, // contract cost
    #[serde(rename = "filled-fees")]
    pub filled_fees: Option<Decimal>,
    pub trade_fee: Option<Decimal>,
    #[serde(rename = "filled-points")]
    pub filled_points: Option<Decimal>,
    #[serde(rename = "fee-deduct-currency")]
    pub fee_deduct_currency: Option<String>,
}

/// Order payload. One shape serves spot orders (hyphenated keys, a
/// combined `type` like `buy-limit`, string `state`) and contract orders
/// (underscored keys, `direction` + `order_price_type`, numeric `status`).
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiOrder {
    pub id: Option<u64>,
    pub order_id: Option<u64>,
    pub order_id_str: Option<String>,
    pub client_order_id: Option<Value>, // number or string on contract rows
    #[serde(rename = "client-order-id")]
    pub client_order_id_spot: Option<String>,
    pub symbol: Option<String>,
    pub contract_code: Option<String>,
    #[serde(rename = "account-id")]
    pub account_id: Option<u64>,
    pub amount: Option<Decimal>,
    pub volume: Option<Decimal>, // contract size in contracts
    pub price: Option<Decimal>,
    #[serde(rename = "created-at")]
    pub created_at: Option<i64>,
    pub create_date: Option<i64>,
    #[serde(rename = "created_at")]
    pub created_at_contract: Option<i64>,
    #[serde(rename = "type")]
    pub order_type: Option<String>, // spot: side-type combination
    pub order_price_type: Option<Value>, // contract: 1, 2, 9 or a string
    pub direction: Option<String>,
    pub offset: Option<String>,
    pub state: Option<String>,
    pub status: Option<Value>, // contract: numeric state
    #[serde(rename = "filled-amount")]
    pub filled_amount: Option<Decimal>,
    #[serde(rename = "field-amount")]
    pub field_amount: Option<Decimal>, // venue misspelling, kept verbatim
    pub trade_volume: Option<Decimal>,
    #[serde(rename = "filled-cash-amount")]
    pub filled_cash_amount: Option<Decimal>,
    #[serde(rename = "field-cash-amount")]
    pub field_cash_amount: Option<Decimal>,
    pub trade_turnover: Option<Decimal>,
    #[serde(rename = "filled-fees")]
    pub filled_fees: Option<Decimal>,
    #[serde(rename = "field-fees")]
    pub field_fees: Option<Decimal>,
    pub fee: Option<Decimal>,
    pub trade_avg_price: Option<Decimal>,
}

/// Contract order listing wrapper: `hisorders` nests rows under `orders`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiContractOrders {
    pub orders: Option<Vec<HuobiOrder>>,
    pub total_page: Option<i64>,
    pub current_page: Option<i64>,
    pub total_size: Option<i64>,
}

/// Contract fill listing wrapper: `order_detail` nests rows under `trades`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiContractTrades {
    pub trades: Option<Vec<HuobiTrade>>,
    pub total_page: Option<i64>,
    pub current_page: Option<i64>,
    pub total_size: Option<i64>,
}

/// Contract order placement acknowledgement
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiContractOrderId {
    pub order_id: Option<u64>,
    pub order_id_str: Option<String>,
}

/// Account entry from `/v1/account/accounts`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiAccount {
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub account_type: Option<String>, // spot, margin, otc, point
    pub subtype: Option<String>,
    pub state: Option<String>, // working, lock
}

/// Spot balance envelope body: per-currency line items split into
/// `trade` and `frozen` rows
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiSpotBalance {
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub state: Option<String>,
    pub list: Option<Vec<HuobiBalanceItem>>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiBalanceItem {
    pub currency: Option<String>,
    #[serde(rename = "type")]
    pub balance_type: Option<String>, // trade, frozen
    pub balance: Option<Decimal>,
}

/// Contract account row from the `*_account_info` endpoints
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiContractAccount {
    pub symbol: Option<String>,
    pub contract_code: Option<String>, // present on linear swap rows
    pub margin_balance: Option<Decimal>,
    pub margin_available: Option<Decimal>,
    pub margin_frozen: Option<Decimal>,
    pub margin_position: Option<Decimal>,
    pub profit_real: Option<Decimal>,
    pub profit_unreal: Option<Decimal>,
    pub risk_rate: Option<Decimal>,
}

/// Currency entry from `/v1/settings/currencys`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiCurrency {
    pub name: Option<String>, // venue currency id
    #[serde(rename = "display-name")]
    pub display_name: Option<String>,
    #[serde(rename = "withdraw-precision")]
    pub withdraw_precision: Option<u32>,
    pub visible: Option<bool>,
    #[serde(rename = "deposit-enabled")]
    pub deposit_enabled: Option<bool>,
    #[serde(rename = "withdraw-enabled")]
    pub withdraw_enabled: Option<bool>,
    #[serde(rename = "deposit-min-amount")]
    pub deposit_min_amount: Option<Decimal>,
    #[serde(rename = "withdraw-min-amount")]
    pub withdraw_min_amount: Option<Decimal>,
}

/// Deposit address row from the v2 endpoint
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiDepositAddress {
    pub currency: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "addressTag")]
    pub address_tag: Option<String>,
    pub chain: Option<String>,
}

/// Deposit/withdrawal row from `/v1/query/deposit-withdraw`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiTransaction {
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub transaction_type: Option<String>, // deposit, withdraw
    pub currency: Option<String>,
    #[serde(rename = "tx-hash")]
    pub tx_hash: Option<String>,
    pub chain: Option<String>,
    pub amount: Option<Decimal>,
    pub address: Option<String>,
    #[serde(rename = "address-tag")]
    pub address_tag: Option<String>,
    pub fee: Option<Decimal>, // can be reported negative
    pub state: Option<String>,
    #[serde(rename = "created-at")]
    pub created_at: Option<i64>,
    #[serde(rename = "updated-at")]
    pub updated_at: Option<i64>,
}

/// Limit-order bounds from `/v1/common/exchange`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct HuobiTradingLimits {
    pub symbol: Option<String>,
    #[serde(rename = "limit-order-must-greater-than")]
    pub limit_order_must_greater_than: Option<Decimal>,
    #[serde(rename = "limit-order-must-less-than")]
    pub limit_order_must_less_than: Option<Decimal>,
}
