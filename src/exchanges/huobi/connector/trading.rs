use super::{resolve_market, spot_account_id, HuobiOptions, OpenOrdersMethod};
use crate::core::errors::{ExchangeError, VenueError};
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::{
    Market, MarketKind, Order, OrderRequest, OrderSide, OrderStatus, OrderType, Trade,
};
use crate::exchanges::huobi::conversions;
use crate::exchanges::huobi::registry::{AccountRegistry, MarketRegistry};
use crate::exchanges::huobi::rest::HuobiRestClient;
use crate::exchanges::huobi::router::Operation;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::instrument;

/// Venue state sets for the orders-by-states routes. Spot states are
/// names; contract states are the venue's numeric codes.
const SPOT_OPEN_STATES: &str = "pre-submitted,submitted,partial-filled";
const SPOT_CLOSED_STATES: &str = "filled,partial-canceled,canceled";
const SPOT_ALL_STATES: &str =
    "pre-submitted,submitted,partial-filled,filled,partial-canceled,canceled";
const CONTRACT_OPEN_STATES: &str = "3,4";
const CONTRACT_CLOSED_STATES: &str = "5,6,7";
const CONTRACT_ALL_STATES: &str = "0";

/// Order entry and order/fill history.
pub struct Trading<R: RestClient> {
    rest: Arc<HuobiRestClient<R>>,
    markets: Arc<MarketRegistry>,
    accounts: Arc<AccountRegistry>,
    options: HuobiOptions,
}

impl<R: RestClient> Trading<R> {
    pub(crate) fn new(
        rest: Arc<HuobiRestClient<R>>,
        markets: Arc<MarketRegistry>,
        accounts: Arc<AccountRegistry>,
        options: HuobiOptions,
    ) -> Self {
        Self {
            rest,
            markets,
            accounts,
            options,
        }
    }

    async fn market(&self, symbol: &str) -> Result<Market, ExchangeError> {
        resolve_market(&self.rest, &self.markets, symbol).await
    }

    async fn place_spot_order(
        &self,
        market: &Market,
        request: &OrderRequest,
    ) -> Result<Order, ExchangeError> {
        let account_id = spot_account_id(&self.rest, &self.accounts).await?;
        let amount = spot_order_amount(
            market,
            request,
            self.options.create_market_buy_order_requires_price,
        )?;
        let mut body = json!({
            "account-id": account_id,
            "symbol": market.id,
            "type": conversions::spot_order_type(request.side, request.order_type),
            "amount": amount.to_string(),
        });
        if request.order_type.is_priced() {
            let price = required_price(request)?;
            body["price"] = json!(market.price_to_precision(price).to_string());
        }
        let id = self.rest.place_spot_order(&body).await?;
        Ok(acknowledged_order(Some(id), market, request))
    }

    async fn place_contract_order(
        &self,
        market: &Market,
        request: &OrderRequest,
    ) -> Result<Order, ExchangeError> {
        let volume = market
            .amount_to_precision(request.amount)
            .to_i64()
            .ok_or_else(|| {
                ExchangeError::InvalidOrder(VenueError::new(
                    Operation::PlaceOrder.as_str(),
                    None,
                    Some("contract volume must be a whole contract count".to_string()),
                ))
            })?;
        let mut body = contract_keys(market);
        body["volume"] = json!(volume);
        body["direction"] = json!(request.side.as_str());
        body["order_price_type"] = json!(conversions::contract_price_type(request.order_type));
        if request.order_type.is_priced() {
            let price = required_price(request)?;
            body["price"] = json!(market.price_to_precision(price).to_string());
        }
        let ack = self.rest.place_contract_order(market.kind, &body).await?;
        let id = ack
            .order_id_str
            .clone()
            .or_else(|| ack.order_id.map(|id| id.to_string()));
        Ok(acknowledged_order(id, market, request))
    }

    /// Fills of one order. Spot serves them under the order id path;
    /// contract kinds post the id to the order-detail endpoint, the only
    /// fill query the contract APIs offer.
    #[instrument(skip(self), fields(exchange = "huobi", order_id = %id, symbol = %symbol))]
    pub async fn get_order_trades(
        &self,
        id: &str,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let market = self.market(symbol).await?;
        if market.kind == MarketKind::Spot {
            let rows = self.rest.spot_order_match_results(id).await?;
            return Ok(rows
                .iter()
                .map(|row| conversions::convert_huobi_trade(row, Some(&market)))
                .collect());
        }
        let mut body = contract_keys(&market);
        body["order_id"] = json!(id);
        if let Some(limit) = limit {
            body["page_size"] = json!(limit);
        }
        let page = self.rest.contract_order_detail(market.kind, &body).await?;
        Ok(page
            .trades
            .unwrap_or_default()
            .iter()
            .map(|row| conversions::convert_huobi_trade(row, Some(&market)))
            .collect())
    }
}

/// Encodes the spot order amount field. Market buys are denominated in
/// quote cost and truncated with the price precision rule; everything
/// else is a base amount.
fn spot_order_amount(
    market: &Market,
    request: &OrderRequest,
    requires_price: bool,
) -> Result<Decimal, ExchangeError> {
    if request.order_type == OrderType::Market && request.side == OrderSide::Buy {
        if requires_price {
            let price = request.price.ok_or_else(|| {
                ExchangeError::InvalidOrder(VenueError::new(
                    Operation::PlaceOrder.as_str(),
                    None,
                    Some(
                        "market buy orders send a quote cost computed as amount * price; \
                         supply a price, or disable create_market_buy_order_requires_price \
                         to pass the cost in the amount argument"
                            .to_string(),
                    ),
                ))
            })?;
            Ok(market.cost_to_precision(request.amount * price))
        } else {
            Ok(market.cost_to_precision(request.amount))
        }
    } else {
        Ok(market.amount_to_precision(request.amount))
    }
}

fn required_price(request: &OrderRequest) -> Result<Decimal, ExchangeError> {
    request.price.ok_or_else(|| {
        ExchangeError::InvalidOrder(VenueError::new(
            Operation::PlaceOrder.as_str(),
            None,
            Some(format!("{} orders require a price", request.order_type)),
        ))
    })
}

/// Body keys every derivative request starts from. Futures contracts
/// additionally carry the base currency as `symbol`.
fn contract_keys(market: &Market) -> Value {
    let mut body = json!({ "contract_code": market.id });
    if market.kind == MarketKind::Futures {
        body["symbol"] = json!(market.base);
    }
    body
}

/// Placement acknowledgements echo the request; the venue reports no
/// state or fills until the order is queried.
fn acknowledged_order(id: Option<String>, market: &Market, request: &OrderRequest) -> Order {
    Order {
        id,
        symbol: Some(market.symbol.clone()),
        timestamp: Some(Utc::now().timestamp_millis()),
        side: Some(request.side),
        order_type: Some(request.order_type),
        price: request.price,
        amount: Some(request.amount),
        ..Order::default()
    }
}

fn filter_by_since_limit<T>(
    mut rows: Vec<T>,
    since: Option<i64>,
    limit: Option<u32>,
    timestamp: impl Fn(&T) -> Option<i64>,
) -> Vec<T> {
    if let Some(since) = since {
        rows.retain(|row| timestamp(row).map_or(false, |ts| ts >= since));
    }
    if let Some(limit) = limit {
        rows.truncate(limit as usize);
    }
    rows
}

#[async_trait]
impl<R: RestClient> OrderPlacer for Trading<R> {
    #[instrument(skip(self, order), fields(exchange = "huobi", symbol = %order.symbol))]
    async fn place_order(&self, order: OrderRequest) -> Result<Order, ExchangeError> {
        let market = self.market(&order.symbol).await?;
        if market.kind == MarketKind::Spot {
            self.place_spot_order(&market, &order).await
        } else {
            self.place_contract_order(&market, &order).await
        }
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %symbol, order_id = %id))]
    async fn cancel_order(&self, id: &str, symbol: &str) -> Result<Order, ExchangeError> {
        let market = self.market(symbol).await?;
        if market.kind == MarketKind::Spot {
            self.rest.cancel_spot_order(id).await?;
        } else {
            let mut body = contract_keys(&market);
            body["order_id"] = json!(id);
            self.rest.cancel_contract_order(market.kind, &body).await?;
        }
        Ok(Order {
            id: Some(id.to_string()),
            symbol: Some(market.symbol.clone()),
            status: Some(OrderStatus::Canceled),
            ..Order::default()
        })
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %symbol, order_id = %id))]
    async fn get_order(&self, id: &str, symbol: &str) -> Result<Order, ExchangeError> {
        let market = self.market(symbol).await?;
        if market.kind == MarketKind::Spot {
            let row = self.rest.spot_order(id).await?;
            return Ok(conversions::convert_huobi_order(&row, Some(&market)));
        }
        let mut body = contract_keys(&market);
        body["order_id"] = json!(id);
        let rows = self.rest.contract_order_info(market.kind, &body).await?;
        let row = rows.first().ok_or_else(|| {
            ExchangeError::OrderNotFound(VenueError::new(
                Operation::OrderInfo.as_str(),
                None,
                Some(format!("order {id} not found for {}", market.symbol)),
            ))
        })?;
        Ok(conversions::convert_huobi_order(row, Some(&market)))
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %symbol, states = %states))]
    async fn get_orders_by_states(
        &self,
        states: &str,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        let market = self.market(symbol).await?;
        let orders: Vec<Order> = if market.kind == MarketKind::Spot {
            let params = [("symbol", market.id.as_str()), ("states", states)];
            let rows = self
                .rest
                .spot_orders(self.options.spot_states_endpoint.operation(), &params)
                .await?;
            rows.iter()
                .map(|row| conversions::convert_huobi_order(row, Some(&market)))
                .collect()
        } else {
            let mut body = contract_keys(&market);
            body["trade_type"] = json!(0);
            body["type"] = json!(1);
            body["create_date"] = json!(90);
            body["page_size"] = json!(50);
            body["status"] = json!(states);
            let page = self.rest.contract_hisorders(market.kind, &body).await?;
            page.orders
                .unwrap_or_default()
                .iter()
                .map(|row| conversions::convert_huobi_order(row, Some(&market)))
                .collect()
        };
        Ok(filter_by_since_limit(orders, since, limit, |order| {
            order.timestamp
        }))
    }

    async fn get_orders(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        let market = self.market(symbol).await?;
        let states = if market.kind.is_derivative() {
            CONTRACT_ALL_STATES
        } else {
            SPOT_ALL_STATES
        };
        self.get_orders_by_states(states, symbol, since, limit)
            .await
    }

    async fn get_open_orders(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        let market = self.market(symbol).await?;
        if market.kind.is_derivative() {
            return self
                .get_orders_by_states(CONTRACT_OPEN_STATES, symbol, since, limit)
                .await;
        }
        match self.options.open_orders_method {
            OpenOrdersMethod::StatesQuery => {
                self.get_orders_by_states(SPOT_OPEN_STATES, symbol, since, limit)
                    .await
            }
            OpenOrdersMethod::Dedicated => {
                let account_id = spot_account_id(&self.rest, &self.accounts).await?;
                let mut params = vec![
                    ("account-id", account_id.as_str()),
                    ("symbol", market.id.as_str()),
                ];
                let size;
                if let Some(limit) = limit {
                    size = limit.to_string();
                    params.push(("size", &size));
                }
                let rows = self.rest.spot_open_orders(&params).await?;
                let orders = rows
                    .iter()
                    .map(|row| conversions::convert_huobi_order(row, Some(&market)))
                    .collect();
                Ok(filter_by_since_limit(orders, since, None, |order: &Order| {
                    order.timestamp
                }))
            }
        }
    }

    async fn get_closed_orders(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Order>, ExchangeError> {
        let market = self.market(symbol).await?;
        let states = if market.kind.is_derivative() {
            CONTRACT_CLOSED_STATES
        } else {
            SPOT_CLOSED_STATES
        };
        self.get_orders_by_states(states, symbol, since, limit)
            .await
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %symbol))]
    async fn get_my_trades(
        &self,
        symbol: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let market = self.market(symbol).await?;
        let trades: Vec<Trade> = if market.kind == MarketKind::Spot {
            let mut params = vec![("symbol", market.id.as_str())];
            let size;
            if let Some(limit) = limit {
                size = limit.to_string();
                params.push(("size", &size));
            }
            let start_date;
            if let Some(since) = since {
                if let Some(date) = DateTime::from_timestamp_millis(since) {
                    start_date = date.format("%Y-%m-%d").to_string();
                    params.push(("start-date", &start_date));
                }
            }
            let rows = self.rest.spot_match_results(&params).await?;
            rows.iter()
                .map(|row| conversions::convert_huobi_trade(row, Some(&market)))
                .collect()
        } else {
            // Contract fill queries are per order; without an id the
            // order-detail endpoint rejects the request outright.
            return Err(ExchangeError::Unsupported(format!(
                "{} markets only report fills per order; use get_order_trades",
                market.kind
            )));
        };
        Ok(filter_by_since_limit(trades, since, limit, |trade| {
            trade.timestamp
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{MarketLimits, MarketPrecision};
    use serde::de::DeserializeOwned;
    use std::str::FromStr;
    use std::sync::Mutex;

    fn eth_usdt() -> Market {
        Market {
            id: "ethusdt".to_string(),
            symbol: "ETH/USDT".to_string(),
            base: "ETH".to_string(),
            quote: "USDT".to_string(),
            base_id: "eth".to_string(),
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

    fn market_buy(amount: &str, price: Option<&str>) -> OrderRequest {
        OrderRequest {
            symbol: "ETH/USDT".to_string(),
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            amount: Decimal::from_str(amount).unwrap(),
            price: price.map(|p| Decimal::from_str(p).unwrap()),
        }
    }

    #[test]
    fn market_buy_encodes_cost_from_amount_and_price() {
        let market = eth_usdt();
        let amount = spot_order_amount(&market, &market_buy("10", Some("2")), true).unwrap();
        assert_eq!(amount.to_string(), "20");
    }

    #[test]
    fn market_buy_without_requirement_passes_cost_through() {
        let market = eth_usdt();
        let amount = spot_order_amount(&market, &market_buy("10", None), false).unwrap();
        assert_eq!(amount.to_string(), "10");
    }

    #[test]
    fn market_buy_missing_price_fails_before_any_request() {
        let market = eth_usdt();
        let err = spot_order_amount(&market, &market_buy("10", None), true).unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidOrder(_)));
    }

    #[test]
    fn limit_orders_encode_a_truncated_base_amount() {
        let market = eth_usdt();
        let request = OrderRequest {
            symbol: "ETH/USDT".to_string(),
            side: OrderSide::Sell,
            order_type: OrderType::Limit,
            amount: Decimal::from_str("1.23456789").unwrap(),
            price: Some(Decimal::from_str("2000").unwrap()),
        };
        let amount = spot_order_amount(&market, &request, true).unwrap();
        assert_eq!(amount.to_string(), "1.2345");
    }

    #[test]
    fn futures_bodies_carry_the_base_symbol() {
        let mut market = eth_usdt();
        market.kind = MarketKind::Futures;
        market.id = "ETH201225".to_string();
        let body = contract_keys(&market);
        assert_eq!(body["contract_code"], "ETH201225");
        assert_eq!(body["symbol"], "ETH");

        market.kind = MarketKind::UsdtSwap;
        market.id = "ETH-USDT".to_string();
        let body = contract_keys(&market);
        assert!(body.get("symbol").is_none());
    }

    #[test]
    fn since_and_limit_filter_client_side() {
        let orders = vec![
            Order {
                timestamp: Some(100),
                ..Order::default()
            },
            Order {
                timestamp: Some(200),
                ..Order::default()
            },
            Order {
                timestamp: None,
                ..Order::default()
            },
            Order {
                timestamp: Some(300),
                ..Order::default()
            },
        ];
        let filtered = filter_by_since_limit(orders, Some(150), Some(1), |order| order.timestamp);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].timestamp, Some(200));
    }

    #[derive(Debug, Clone)]
    struct Recorded {
        endpoint: String,
        params: Vec<(String, String)>,
        body: Option<Value>,
    }

    #[derive(Clone)]
    struct MockRest {
        response: Value,
        calls: Arc<Mutex<Vec<Recorded>>>,
    }

    impl MockRest {
        fn new(response: Value) -> Self {
            Self {
                response,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn last_call(&self) -> Recorded {
            self.calls.lock().unwrap().last().unwrap().clone()
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl RestClient for MockRest {
        async fn get(
            &self,
            endpoint: &str,
            query_params: &[(&str, &str)],
            _authenticated: bool,
        ) -> Result<Value, ExchangeError> {
            self.calls.lock().unwrap().push(Recorded {
                endpoint: endpoint.to_string(),
                params: query_params
                    .iter()
                    .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                    .collect(),
                body: None,
            });
            Ok(self.response.clone())
        }

        async fn get_json<T: DeserializeOwned>(
            &self,
            endpoint: &str,
            query_params: &[(&str, &str)],
            authenticated: bool,
        ) -> Result<T, ExchangeError> {
            let value = self.get(endpoint, query_params, authenticated).await?;
            serde_json::from_value(value)
                .map_err(|e| ExchangeError::DeserializationError(e.to_string()))
        }

        async fn post(
            &self,
            endpoint: &str,
            body: &Value,
            _authenticated: bool,
        ) -> Result<Value, ExchangeError> {
            self.calls.lock().unwrap().push(Recorded {
                endpoint: endpoint.to_string(),
                params: Vec::new(),
                body: Some(body.clone()),
            });
            Ok(self.response.clone())
        }

        async fn post_json<T: DeserializeOwned>(
            &self,
            endpoint: &str,
            body: &Value,
            authenticated: bool,
        ) -> Result<T, ExchangeError> {
            let value = self.post(endpoint, body, authenticated).await?;
            serde_json::from_value(value)
                .map_err(|e| ExchangeError::DeserializationError(e.to_string()))
        }
    }

    fn eth_swap() -> Market {
        let mut market = eth_usdt();
        market.kind = MarketKind::Swap;
        market.id = "ETH-USD".to_string();
        market.symbol = "ETH-USD".to_string();
        market.quote = "USD".to_string();
        market.quote_id = "usd".to_string();
        market
    }

    async fn trading_over(mock: &MockRest, markets: &[Market]) -> Trading<MockRest> {
        let rest = Arc::new(HuobiRestClient::new(mock.clone(), mock.clone()));
        let registry = Arc::new(MarketRegistry::new());
        registry.store(markets).await;
        Trading::new(
            rest,
            registry,
            Arc::new(AccountRegistry::new()),
            HuobiOptions::default(),
        )
    }

    #[tokio::test]
    async fn spot_my_trades_send_symbol_size_and_start_date() {
        let mock = MockRest::new(json!({"status": "ok", "data": []}));
        let trading = trading_over(&mock, &[eth_usdt()]).await;

        let trades = trading
            .get_my_trades("ETH/USDT", Some(1_583_497_692_182), Some(25))
            .await
            .unwrap();
        assert!(trades.is_empty());

        let call = mock.last_call();
        assert_eq!(call.endpoint, "/v1/order/matchresults");
        let params: Vec<(&str, &str)> = call
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert!(params.contains(&("symbol", "ethusdt")));
        assert!(params.contains(&("size", "25")));
        assert!(params.contains(&("start-date", "2020-03-06")));
    }

    #[tokio::test]
    async fn derivative_my_trades_fail_before_any_request() {
        let mock = MockRest::new(json!({"status": "ok", "data": {}}));
        let trading = trading_over(&mock, &[eth_swap()]).await;

        let err = trading.get_my_trades("ETH-USD", None, None).await.unwrap_err();
        assert!(matches!(err, ExchangeError::Unsupported(_)));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn derivative_order_trades_post_the_order_id() {
        let mock = MockRest::new(json!({
            "status": "ok",
            "data": {
                "trades": [{
                    "id": 113_891_764_710u64,
                    "trade_volume": 2,
                    "trade_price": 100.5,
                    "trade_fee": -0.02,
                    "trade_turnover": 201,
                    "role": "taker",
                    "created_at": 1_603_703_614_107i64
                }],
                "total_page": 1,
                "current_page": 1,
                "total_size": 1
            }
        }));
        let trading = trading_over(&mock, &[eth_swap()]).await;

        let trades = trading
            .get_order_trades("770323133537685504", "ETH-USD", Some(50))
            .await
            .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].price, Some(Decimal::from_str("100.5").unwrap()));
        assert_eq!(trades[0].cost, Some(Decimal::from_str("201").unwrap()));

        let call = mock.last_call();
        assert_eq!(call.endpoint, "/swap-api/v1/swap_order_detail");
        let body = call.body.unwrap();
        assert_eq!(body["contract_code"], "ETH-USD");
        assert_eq!(body["order_id"], "770323133537685504");
        assert_eq!(body["page_size"], 50);
        assert!(body.get("symbol").is_none());
    }

    #[tokio::test]
    async fn spot_order_trades_ride_the_order_id_path() {
        let mock = MockRest::new(json!({
            "status": "ok",
            "data": [{
                "id": 29_553u64,
                "order-id": 59_378u64,
                "match-id": 59_335,
                "filled-amount": "0.5",
                "filled-fees": "0.0005",
                "price": "100.1",
                "created-at": 1_494_901_400_487i64,
                "type": "buy-limit",
                "role": "maker"
            }]
        }));
        let trading = trading_over(&mock, &[eth_usdt()]).await;

        let trades = trading
            .get_order_trades("59378", "ETH/USDT", None)
            .await
            .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].order.as_deref(), Some("59378"));
        assert_eq!(trades[0].side, Some(OrderSide::Buy));

        let call = mock.last_call();
        assert_eq!(call.endpoint, "/v1/order/orders/59378/matchresults");
        assert!(call.params.is_empty());
    }
}
