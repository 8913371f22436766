use super::codec::value_to_string;
use super::types::{
    HuobiAccount, HuobiBalanceItem, HuobiBidAsk, HuobiContractAccount, HuobiContractInfo,
    HuobiCurrency, HuobiDepositAddress, HuobiDepth, HuobiKline, HuobiOrder, HuobiSpotBalance,
    HuobiSpotSymbol, HuobiTicker, HuobiTrade, HuobiTradingLimits, HuobiTransaction,
};
use crate::core::errors::ExchangeError;
use crate::core::types::{
    Account, Balance, Currency, DepositAddress, Fee, Market, MarketKind, MarketLimits,
    MarketPrecision, MinMax, Ohlcv, Order, OrderBook, OrderBookEntry, OrderSide, OrderStatus,
    OrderType, TakerOrMaker, Ticker, Trade, TradingLimits, Transaction, TransactionStatus,
    TransactionType,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Upper-case a venue currency id and apply the code overrides the venue
/// is known for.
pub fn safe_currency_code(currency_id: &str) -> String {
    let code = currency_id.to_uppercase();
    match code.as_str() {
        "GET" => "Themis".to_string(),
        "HOT" => "Hydro Protocol".to_string(),
        _ => code,
    }
}

fn default_fee(base: &str) -> Decimal {
    if base == "OMG" {
        Decimal::ZERO
    } else {
        // 0.2% flat on both sides
        Decimal::new(2, 3)
    }
}

/// Convert a spot symbol listing row to the canonical market
pub fn convert_huobi_spot_market(entry: &HuobiSpotSymbol) -> Result<Market, ExchangeError> {
    let base_id = entry.base_currency.as_deref().ok_or_else(|| {
        ExchangeError::DeserializationError("spot symbol row missing base-currency".to_string())
    })?;
    let quote_id = entry.quote_currency.as_deref().ok_or_else(|| {
        ExchangeError::DeserializationError("spot symbol row missing quote-currency".to_string())
    })?;

    let base = safe_currency_code(base_id);
    let quote = safe_currency_code(quote_id);
    let precision = MarketPrecision {
        amount: entry.amount_precision.unwrap_or(8),
        price: entry.price_precision.unwrap_or(8),
    };
    let fee = default_fee(&base);

    Ok(Market {
        id: format!("{base_id}{quote_id}"),
        symbol: format!("{base}/{quote}"),
        base,
        quote,
        base_id: base_id.to_string(),
        quote_id: quote_id.to_string(),
        kind: MarketKind::Spot,
        active: entry.state.as_deref() == Some("online"),
        precision,
        limits: MarketLimits {
            amount: MinMax {
                min: Some(
                    entry
                        .min_order_amt
                        .unwrap_or_else(|| Decimal::new(1, precision.amount)),
                ),
                max: entry.max_order_amt,
            },
            price: MinMax {
                min: Some(Decimal::new(1, precision.price)),
                max: None,
            },
            cost: MinMax {
                min: Some(entry.min_order_value.unwrap_or(Decimal::ZERO)),
                max: None,
            },
        },
        taker: fee,
        maker: fee,
    })
}

/// Convert a contract listing row to the canonical market. Rows with a
/// `contract_type` are dated futures; the rest are perpetual swaps told
/// apart by the quote leg of the hyphenated contract code.
pub fn convert_huobi_contract_market(entry: &HuobiContractInfo) -> Result<Market, ExchangeError> {
    let code = entry.contract_code.as_deref().ok_or_else(|| {
        ExchangeError::DeserializationError("contract row missing contract_code".to_string())
    })?;

    let (kind, base_id, quote_id) = if entry.contract_type.is_some() {
        // Dated futures are coin-margined and settle against USD
        let base = entry.symbol.as_deref().unwrap_or(code);
        (MarketKind::Futures, base.to_string(), "USD".to_string())
    } else {
        match code.split_once('-') {
            Some((base, quote)) => {
                let kind = if quote.eq_ignore_ascii_case("USDT") {
                    MarketKind::UsdtSwap
                } else {
                    MarketKind::Swap
                };
                (kind, base.to_string(), quote.to_string())
            }
            None => {
                return Err(ExchangeError::DeserializationError(format!(
                    "perpetual contract code is not hyphenated: {code}"
                )))
            }
        }
    };

    let base = safe_currency_code(&base_id);
    let quote = safe_currency_code(&quote_id);
    let price_precision = entry
        .price_tick
        .map(|tick| tick.normalize().scale())
        .unwrap_or(8);
    let fee = default_fee(&base);

    Ok(Market {
        id: code.to_string(),
        symbol: code.to_string(),
        base,
        quote,
        base_id,
        quote_id,
        kind,
        active: entry.contract_status == Some(1),
        // Contracts trade in whole lots
        precision: MarketPrecision {
            amount: 0,
            price: price_precision,
        },
        limits: MarketLimits {
            amount: MinMax {
                min: Some(Decimal::ONE),
                max: None,
            },
            price: MinMax {
                min: Some(Decimal::new(1, price_precision)),
                max: None,
            },
            cost: MinMax {
                min: Some(Decimal::ZERO),
                max: None,
            },
        },
        taker: fee,
        maker: fee,
    })
}

/// Convert a ticker payload. Works for both the single merged-detail tick
/// and the bulk tickers rows; the envelope timestamp fills in when the
/// payload has none.
pub fn convert_huobi_ticker(
    ticker: &HuobiTicker,
    symbol: Option<&str>,
    envelope_ts: Option<i64>,
) -> Ticker {
    let bid = ticker.bid.as_ref().and_then(HuobiBidAsk::price);
    let bid_volume = ticker
        .bid
        .as_ref()
        .and_then(HuobiBidAsk::size)
        .or(ticker.bid_size);
    let ask = ticker.ask.as_ref().and_then(HuobiBidAsk::price);
    let ask_volume = ticker
        .ask
        .as_ref()
        .and_then(HuobiBidAsk::size)
        .or(ticker.ask_size);

    let open = ticker.open;
    let close = ticker.close;
    let (change, average) = match (open, close) {
        (Some(open), Some(close)) => (
            Some(close - open),
            Some((open + close) / Decimal::TWO),
        ),
        _ => (None, None),
    };
    let percentage = match (change, open, close) {
        (Some(change), Some(open), Some(close))
            if close > Decimal::ZERO && !open.is_zero() =>
        {
            Some(change / open * Decimal::ONE_HUNDRED)
        }
        _ => None,
    };
    let vwap = match (ticker.vol, ticker.amount) {
        (Some(quote_volume), Some(base_volume)) if base_volume > Decimal::ZERO => {
            Some(quote_volume / base_volume)
        }
        _ => None,
    };

    Ticker {
        symbol: symbol.map(ToString::to_string),
        timestamp: ticker.ts.or(envelope_ts),
        bid,
        bid_volume,
        ask,
        ask_volume,
        open,
        high: ticker.high,
        low: ticker.low,
        close,
        last: close,
        change,
        percentage,
        average,
        vwap,
        base_volume: ticker.amount,
        quote_volume: ticker.vol,
    }
}

/// Convert a depth tick. Rows shorter than `[price, amount]` are skipped;
/// the venue `version` becomes the book nonce.
pub fn convert_huobi_order_book(
    depth: &HuobiDepth,
    symbol: Option<&str>,
    envelope_ts: Option<i64>,
) -> OrderBook {
    let convert_side = |levels: &[Vec<Decimal>]| {
        levels
            .iter()
            .filter(|level| level.len() >= 2)
            .map(|level| OrderBookEntry {
                price: level[0],
                amount: level[1],
            })
            .collect()
    };

    OrderBook {
        symbol: symbol.map(ToString::to_string),
        bids: convert_side(&depth.bids),
        asks: convert_side(&depth.asks),
        timestamp: depth.ts.or(envelope_ts),
        nonce: depth.version,
    }
}

/// Convert a trade or fill row. One parser serves public trades, spot
/// match results and contract order-detail fills.
pub fn convert_huobi_trade(trade: &HuobiTrade, market: Option<&Market>) -> Trade {
    let mut side = None;
    let mut order_type = None;
    if let Some(combined) = trade.order_type.as_deref() {
        if let Some((side_part, type_part)) = combined.split_once('-') {
            side = OrderSide::from_wire(side_part);
            order_type = OrderType::from_wire(type_part);
        }
    }
    if side.is_none() {
        side = trade.direction.as_deref().and_then(OrderSide::from_wire);
    }

    let price = trade.price.or(trade.trade_price);
    let amount = trade.filled_amount.or(trade.amount).or(trade.trade_volume);
    // Contract fills report the venue's own turnover; spot cost is derived
    let cost = trade.trade_turnover.or_else(|| match (amount, price) {
        (Some(amount), Some(price)) => Some(amount * price),
        _ => None,
    });

    let mut fee_cost = trade.filled_fees.or(trade.trade_fee);
    let mut fee_currency = market.map(|market| {
        if side == Some(OrderSide::Buy) {
            market.base.clone()
        } else {
            market.quote.clone()
        }
    });
    // Point-card discounts replace a zero fee entirely
    if let Some(points) = trade.filled_points {
        if fee_cost.map_or(true, |cost| cost.is_zero()) && !points.is_zero() {
            fee_cost = Some(points);
            fee_currency = trade.fee_deduct_currency.as_deref().map(safe_currency_code);
        }
    }
    let fee = fee_cost.map(|cost| Fee {
        cost: Some(cost),
        currency: fee_currency,
        rate: None,
    });

    Trade {
        id: trade
            .id
            .or(trade.trade_id)
            .or(trade.trade_id_alt)
            .map(|id| id.to_string()),
        order: trade
            .order_id
            .or(trade.order_id_contract)
            .map(|id| id.to_string()),
        symbol: market.map(|market| market.symbol.clone()),
        timestamp: trade
            .ts
            .or(trade.created_at)
            .or(trade.created_at_contract),
        side,
        order_type,
        taker_or_maker: trade.role.as_deref().and_then(TakerOrMaker::from_wire),
        price,
        amount,
        cost,
        fee,
    }
}

/// Canonical order state for a venue state string, spot names and
/// contract numerics alike. Unknown states pass through unchanged.
pub fn parse_order_status(state: &str) -> OrderStatus {
    match state {
        "partial-filled" | "submitted" | "1" | "2" | "3" | "4" => OrderStatus::Open,
        "filled" | "6" => OrderStatus::Closed,
        "partial-canceled" | "canceled" | "5" | "7" => OrderStatus::Canceled,
        "11" => OrderStatus::Canceling,
        other => OrderStatus::Other(other.to_string()),
    }
}

fn contract_order_type(raw: &str) -> Option<OrderType> {
    match raw {
        "1" | "limit" => Some(OrderType::Limit),
        "2" | "9" | "market" | "opponent" | "optimal_20" => Some(OrderType::Market),
        "ioc" => Some(OrderType::Ioc),
        "post_only" => Some(OrderType::LimitMaker),
        _ => None,
    }
}

/// Convert an order row, spot or contract.
pub fn convert_huobi_order(order: &HuobiOrder, market: Option<&Market>) -> Order {
    let mut side = None;
    let mut order_type = None;
    if let Some(combined) = order.order_type.as_deref() {
        if let Some((side_part, type_part)) = combined.split_once('-') {
            side = OrderSide::from_wire(side_part);
            order_type = OrderType::from_wire(type_part);
        }
    }
    if side.is_none() {
        side = order.direction.as_deref().and_then(OrderSide::from_wire);
    }
    if order_type.is_none() {
        order_type = order
            .order_price_type
            .as_ref()
            .and_then(value_to_string)
            .as_deref()
            .and_then(contract_order_type);
    }

    let raw_status = order
        .state
        .clone()
        .or_else(|| order.status.as_ref().and_then(value_to_string));
    let status = raw_status.as_deref().map(parse_order_status);

    let filled = order
        .filled_amount
        .or(order.field_amount)
        .or(order.trade_volume);
    let mut amount = order.amount.or(order.volume);
    // A market buy is amount-by-cost on the wire: the requested quantity
    // only becomes known once the order has fully executed
    if order_type == Some(OrderType::Market) && side == Some(OrderSide::Buy) {
        amount = if status == Some(OrderStatus::Closed) {
            filled
        } else {
            None
        };
    }

    let cost = order
        .filled_cash_amount
        .or(order.field_cash_amount)
        .or(order.trade_turnover);
    let remaining = match (amount, filled) {
        (Some(amount), Some(filled)) => Some(amount - filled),
        _ => None,
    };
    let average = order
        .trade_avg_price
        .filter(|avg| !avg.is_zero())
        .or_else(|| match (cost, filled) {
            (Some(cost), Some(filled)) if !filled.is_zero() => Some(cost / filled),
            _ => None,
        });

    let fee_cost = order.filled_fees.or(order.field_fees).or(order.fee);
    let fee = fee_cost.map(|cost| Fee {
        cost: Some(cost),
        currency: market.map(|market| {
            if side == Some(OrderSide::Sell) {
                market.quote.clone()
            } else {
                market.base.clone()
            }
        }),
        rate: None,
    });

    Order {
        id: order
            .id
            .map(|id| id.to_string())
            .or_else(|| order.order_id_str.clone())
            .or_else(|| order.order_id.map(|id| id.to_string())),
        client_order_id: order
            .client_order_id_spot
            .clone()
            .or_else(|| order.client_order_id.as_ref().and_then(value_to_string)),
        symbol: market.map(|market| market.symbol.clone()),
        timestamp: order
            .created_at
            .or(order.create_date)
            .or(order.created_at_contract),
        side,
        order_type,
        status,
        price: order.price.filter(|price| !price.is_zero()),
        average,
        amount,
        filled,
        remaining,
        cost,
        fee,
    }
}

/// Merge the spot balance line items into per-currency balances. The
/// venue splits each currency into a `trade` and a `frozen` row; the last
/// row per tag wins and the missing third component is derived.
pub fn convert_huobi_spot_balances(account: &HuobiSpotBalance) -> Vec<Balance> {
    let mut merged: BTreeMap<String, Balance> = BTreeMap::new();
    let items: &[HuobiBalanceItem] = account.list.as_deref().unwrap_or(&[]);

    for item in items {
        let code = match item.currency.as_deref() {
            Some(currency) => safe_currency_code(currency),
            None => continue,
        };
        let entry = merged.entry(code.clone()).or_insert_with(|| Balance {
            asset: code,
            ..Balance::default()
        });
        match item.balance_type.as_deref() {
            Some("trade") => entry.free = item.balance,
            Some("frozen") => entry.used = item.balance,
            _ => {}
        }
    }

    merged.into_values().map(Balance::with_derived).collect()
}

/// Convert contract account rows. Linear swap rows key by contract code,
/// coin-margined rows by the settlement currency.
pub fn convert_huobi_contract_balances(
    rows: &[HuobiContractAccount],
    kind: MarketKind,
) -> Vec<Balance> {
    let mut balances = Vec::new();
    for row in rows {
        let asset = if kind == MarketKind::UsdtSwap {
            row.contract_code.clone()
        } else {
            row.symbol.as_deref().map(safe_currency_code)
        };
        let asset = match asset {
            Some(asset) => asset,
            None => continue,
        };
        balances.push(
            Balance {
                asset,
                free: row.margin_available,
                used: None,
                total: row.margin_balance,
            }
            .with_derived(),
        );
    }
    balances
}

/// Canonical state for a deposit/withdrawal state string, unknown states
/// passed through.
pub fn parse_transaction_status(state: &str) -> TransactionStatus {
    match state {
        "confirming" | "submitted" | "reexamine" | "pass" | "wallet-transfer"
        | "pre-transfer" => TransactionStatus::Pending,
        "confirmed" | "safe" => TransactionStatus::Ok,
        "unknown" | "orphan" | "reject" | "wallet-reject" | "confirm-error" | "repealed" => {
            TransactionStatus::Failed
        }
        "canceled" => TransactionStatus::Canceled,
        other => TransactionStatus::Other(other.to_string()),
    }
}

/// Convert a deposit/withdrawal history row
pub fn convert_huobi_transaction(tx: &HuobiTransaction) -> Transaction {
    let currency = tx.currency.as_deref().map(safe_currency_code);
    let transaction_type = match tx.transaction_type.as_deref() {
        Some("deposit") => Some(TransactionType::Deposit),
        Some("withdraw") | Some("withdrawal") => Some(TransactionType::Withdrawal),
        _ => None,
    };
    // Withdrawal rows report the fee with a negative sign
    let fee = tx.fee.map(|fee| Fee {
        cost: Some(fee.abs()),
        currency: currency.clone(),
        rate: None,
    });

    Transaction {
        id: tx.id.map(|id| id.to_string()),
        txid: tx.tx_hash.clone(),
        timestamp: tx.created_at,
        updated: tx.updated_at,
        currency,
        amount: tx.amount,
        address: tx.address.clone(),
        tag: tx.address_tag.clone(),
        transaction_type,
        status: tx.state.as_deref().map(parse_transaction_status),
        fee,
    }
}

/// Convert a candle row; the venue keys buckets by their open second
pub fn convert_huobi_ohlcv(kline: &HuobiKline) -> Ohlcv {
    Ohlcv {
        timestamp: kline.id.unwrap_or(0) * 1000,
        open: kline.open,
        high: kline.high,
        low: kline.low,
        close: kline.close,
        volume: kline.amount,
    }
}

/// Convert a currency settings row
pub fn convert_huobi_currency(entry: &HuobiCurrency) -> Result<Currency, ExchangeError> {
    let id = entry.name.as_deref().ok_or_else(|| {
        ExchangeError::DeserializationError("currency row missing name".to_string())
    })?;

    Ok(Currency {
        id: id.to_string(),
        code: safe_currency_code(id),
        name: entry.display_name.clone(),
        active: entry.visible.unwrap_or(true)
            && entry.deposit_enabled.unwrap_or(true)
            && entry.withdraw_enabled.unwrap_or(true),
        precision: entry.withdraw_precision,
        deposit_min: entry.deposit_min_amount,
        withdraw_min: entry.withdraw_min_amount,
    })
}

pub fn convert_huobi_account(row: &HuobiAccount) -> Result<Account, ExchangeError> {
    let id = row.id.ok_or_else(|| {
        ExchangeError::DeserializationError("account row missing id".to_string())
    })?;

    Ok(Account {
        id: id.to_string(),
        account_type: row.account_type.clone(),
        state: row.state.clone(),
        subtype: row.subtype.clone(),
    })
}

pub fn convert_huobi_deposit_address(row: &HuobiDepositAddress) -> DepositAddress {
    DepositAddress {
        currency: row.currency.as_deref().map(safe_currency_code),
        address: row.address.clone(),
        tag: row.address_tag.clone(),
        chain: row.chain.clone(),
    }
}

pub fn convert_huobi_trading_limits(
    row: &HuobiTradingLimits,
    symbol: Option<&str>,
) -> TradingLimits {
    TradingLimits {
        symbol: symbol.map(ToString::to_string),
        amount: MinMax {
            min: row.limit_order_must_greater_than,
            max: row.limit_order_must_less_than,
        },
    }
}

/// Spot order type wire encoding: side and type joined with a hyphen
pub fn spot_order_type(side: OrderSide, order_type: OrderType) -> String {
    format!("{}-{}", side.as_str(), order_type.as_str())
}

/// Contract `order_price_type` wire encoding; market orders execute
/// against the best twenty levels
pub fn contract_price_type(order_type: OrderType) -> &'static str {
    match order_type {
        OrderType::Limit => "limit",
        OrderType::Market => "optimal_20",
        OrderType::Ioc => "ioc",
        OrderType::LimitMaker => "post_only",
    }
}
