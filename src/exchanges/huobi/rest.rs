use super::codec::{HuobiResponse, HuobiTickResponse, HuobiV2Response};
use super::router::{self, ApiGroup, Operation};
use super::types::{
    HuobiAccount, HuobiContractAccount, HuobiContractInfo, HuobiContractOrderId,
    HuobiContractOrders, HuobiContractTrades, HuobiCurrency, HuobiDepositAddress, HuobiDepth,
    HuobiKline, HuobiOrder, HuobiSpotBalance, HuobiSpotSymbol, HuobiTicker, HuobiTrade,
    HuobiTradeBucket, HuobiTradingLimits, HuobiTransaction,
};
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::types::MarketKind;
use serde_json::Value;
use tracing::instrument;

// Endpoints served by exactly one group sit outside the route table
const ACCOUNTS_ENDPOINT: &str = "/v1/account/accounts";
const OPEN_ORDERS_ENDPOINT: &str = "/v1/order/openOrders";
const DEPOSIT_WITHDRAW_ENDPOINT: &str = "/v1/query/deposit-withdraw";
const WITHDRAW_CREATE_ENDPOINT: &str = "/v1/dw/withdraw/api/create";
const DEPOSIT_ADDRESS_ENDPOINT: &str = "/v2/account/deposit/address";
const CURRENCIES_ENDPOINT: &str = "/v1/settings/currencys";

/// Typed client over the venue's REST surface.
///
/// Spot groups and contract groups live on different hosts, so two kernel
/// clients are held and picked per resolved route. Error envelopes are
/// classified before any payload leaves this layer.
#[derive(Debug)]
pub struct HuobiRestClient<R: RestClient> {
    spot: R,
    contract: R,
}

impl<R: RestClient> HuobiRestClient<R> {
    pub fn new(spot: R, contract: R) -> Self {
        Self { spot, contract }
    }

    fn client_for(&self, group: ApiGroup) -> &R {
        if group.on_spot_host() {
            &self.spot
        } else {
            &self.contract
        }
    }

    // Market data

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn spot_symbols(&self) -> Result<Vec<HuobiSpotSymbol>, ExchangeError> {
        let route = router::resolve(Operation::Markets, MarketKind::Spot)?;
        let response: HuobiResponse<Vec<HuobiSpotSymbol>> = self
            .client_for(route.group)
            .get_json(&route.full_path(), &[], route.group.is_private())
            .await?;
        response.into_result(Operation::Markets.as_str())
    }

    #[instrument(skip(self), fields(exchange = "huobi", kind = %kind))]
    pub async fn contract_info(
        &self,
        kind: MarketKind,
    ) -> Result<Vec<HuobiContractInfo>, ExchangeError> {
        let route = router::resolve(Operation::Markets, kind)?;
        let response: HuobiResponse<Vec<HuobiContractInfo>> = self
            .client_for(route.group)
            .get_json(&route.full_path(), &[], route.group.is_private())
            .await?;
        response.into_result(Operation::Markets.as_str())
    }

    /// Merged ticker for one market; the envelope timestamp rides along
    /// because the tick itself has none.
    #[instrument(skip(self), fields(exchange = "huobi", symbol = %market_id))]
    pub async fn merged_ticker(
        &self,
        kind: MarketKind,
        market_id: &str,
    ) -> Result<(HuobiTicker, Option<i64>), ExchangeError> {
        let route = router::resolve(Operation::Ticker, kind)?;
        let response: HuobiTickResponse<HuobiTicker> = self
            .client_for(route.group)
            .get_json(
                &route.full_path(),
                &[("symbol", market_id)],
                route.group.is_private(),
            )
            .await?;
        let ts = response.ts;
        Ok((response.into_result(Operation::Ticker.as_str())?, ts))
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn tickers(&self) -> Result<(Vec<HuobiTicker>, Option<i64>), ExchangeError> {
        let route = router::resolve(Operation::Tickers, MarketKind::Spot)?;
        let response: HuobiResponse<Vec<HuobiTicker>> = self
            .client_for(route.group)
            .get_json(&route.full_path(), &[], route.group.is_private())
            .await?;
        let ts = response.ts;
        Ok((response.into_result(Operation::Tickers.as_str())?, ts))
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %market_id))]
    pub async fn depth(
        &self,
        kind: MarketKind,
        market_id: &str,
        step: &str,
    ) -> Result<(HuobiDepth, Option<i64>), ExchangeError> {
        let route = router::resolve(Operation::OrderBook, kind)?;
        let response: HuobiTickResponse<HuobiDepth> = self
            .client_for(route.group)
            .get_json(
                &route.full_path(),
                &[("symbol", market_id), ("type", step)],
                route.group.is_private(),
            )
            .await?;
        let ts = response.ts;
        Ok((response.into_result(Operation::OrderBook.as_str())?, ts))
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %market_id))]
    pub async fn recent_trades(
        &self,
        kind: MarketKind,
        market_id: &str,
        limit: Option<u32>,
    ) -> Result<Vec<HuobiTradeBucket>, ExchangeError> {
        let route = router::resolve(Operation::Trades, kind)?;
        let mut params = vec![("symbol", market_id)];
        let size;
        if let Some(limit) = limit {
            size = limit.to_string();
            params.push(("size", &size));
        }
        let response: HuobiResponse<Vec<HuobiTradeBucket>> = self
            .client_for(route.group)
            .get_json(&route.full_path(), &params, route.group.is_private())
            .await?;
        response.into_result(Operation::Trades.as_str())
    }

    #[instrument(skip(self), fields(exchange = "huobi", kind = %kind, symbol = %market_id, period = %period))]
    pub async fn klines(
        &self,
        kind: MarketKind,
        market_id: &str,
        period: &str,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<HuobiKline>, ExchangeError> {
        let route = router::resolve(Operation::Ohlcv, kind)?;
        let id_key = if kind == MarketKind::Spot {
            "symbol"
        } else {
            "contract_code"
        };
        let size = limit.unwrap_or(1000).to_string();
        let mut params = vec![(id_key, market_id), ("period", period), ("size", &size)];
        let from;
        if let Some(since) = since {
            // the venue keys candle ranges in epoch seconds
            from = (since / 1000).to_string();
            params.push(("from", &from));
        }
        let response: HuobiResponse<Vec<HuobiKline>> = self
            .client_for(route.group)
            .get_json(&route.full_path(), &params, route.group.is_private())
            .await?;
        response.into_result(Operation::Ohlcv.as_str())
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn currencies(&self, language: &str) -> Result<Vec<HuobiCurrency>, ExchangeError> {
        let response: HuobiResponse<Vec<HuobiCurrency>> = self
            .spot
            .get_json(CURRENCIES_ENDPOINT, &[("language", language)], false)
            .await?;
        response.into_result("currencies")
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %market_id))]
    pub async fn trading_limits(
        &self,
        kind: MarketKind,
        market_id: &str,
    ) -> Result<HuobiTradingLimits, ExchangeError> {
        let route = router::resolve(Operation::TradingLimits, kind)?;
        let response: HuobiResponse<HuobiTradingLimits> = self
            .client_for(route.group)
            .get_json(
                &route.full_path(),
                &[("symbols", market_id)],
                route.group.is_private(),
            )
            .await?;
        response.into_result(Operation::TradingLimits.as_str())
    }

    // Account

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn accounts(&self) -> Result<Vec<HuobiAccount>, ExchangeError> {
        let response: HuobiResponse<Vec<HuobiAccount>> =
            self.spot.get_json(ACCOUNTS_ENDPOINT, &[], true).await?;
        response.into_result("accounts")
    }

    #[instrument(skip(self), fields(exchange = "huobi", account_id = %account_id))]
    pub async fn spot_balance(&self, account_id: &str) -> Result<HuobiSpotBalance, ExchangeError> {
        let route = router::resolve(Operation::Balance, MarketKind::Spot)?;
        let response: HuobiResponse<HuobiSpotBalance> = self
            .client_for(route.group)
            .get_json(
                &route.full_path_with_id(account_id),
                &[],
                route.group.is_private(),
            )
            .await?;
        response.into_result(Operation::Balance.as_str())
    }

    #[instrument(skip(self), fields(exchange = "huobi", kind = %kind))]
    pub async fn contract_balance(
        &self,
        kind: MarketKind,
    ) -> Result<Vec<HuobiContractAccount>, ExchangeError> {
        let route = router::resolve(Operation::Balance, kind)?;
        let response: HuobiResponse<Vec<HuobiContractAccount>> = self
            .client_for(route.group)
            .post_json(
                &route.full_path(),
                &Value::Object(serde_json::Map::new()),
                route.group.is_private(),
            )
            .await?;
        response.into_result(Operation::Balance.as_str())
    }

    #[instrument(skip(self), fields(exchange = "huobi", currency = %currency_id))]
    pub async fn deposit_address(
        &self,
        currency_id: &str,
    ) -> Result<Vec<HuobiDepositAddress>, ExchangeError> {
        let response: HuobiV2Response<Vec<HuobiDepositAddress>> = self
            .spot
            .get_json(DEPOSIT_ADDRESS_ENDPOINT, &[("currency", currency_id)], true)
            .await?;
        response.into_result("deposit_address")
    }

    /// Deposit/withdrawal history. The venue caps the page size at 100,
    /// so larger limits are clamped.
    #[instrument(skip(self), fields(exchange = "huobi", transaction_type = %transaction_type))]
    pub async fn transactions(
        &self,
        transaction_type: &str,
        currency_id: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<HuobiTransaction>, ExchangeError> {
        let size = limit.unwrap_or(100).min(100).to_string();
        let mut params = vec![
            ("type", transaction_type),
            ("from", "0"),
            ("size", size.as_str()),
        ];
        if let Some(currency_id) = currency_id {
            params.push(("currency", currency_id));
        }
        let response: HuobiResponse<Vec<HuobiTransaction>> = self
            .spot
            .get_json(DEPOSIT_WITHDRAW_ENDPOINT, &params, true)
            .await?;
        response.into_result("deposits_withdrawals")
    }

    #[instrument(skip(self, body), fields(exchange = "huobi"))]
    pub async fn create_withdrawal(&self, body: &Value) -> Result<u64, ExchangeError> {
        let response: HuobiResponse<u64> = self
            .spot
            .post_json(WITHDRAW_CREATE_ENDPOINT, body, true)
            .await?;
        response.into_result("withdraw")
    }

    // Trading

    /// Spot order placement acknowledges with the order id as a string
    #[instrument(skip(self, body), fields(exchange = "huobi"))]
    pub async fn place_spot_order(&self, body: &Value) -> Result<String, ExchangeError> {
        let route = router::resolve(Operation::PlaceOrder, MarketKind::Spot)?;
        let response: HuobiResponse<String> = self
            .client_for(route.group)
            .post_json(&route.full_path(), body, route.group.is_private())
            .await?;
        response.into_result(Operation::PlaceOrder.as_str())
    }

    #[instrument(skip(self, body), fields(exchange = "huobi", kind = %kind))]
    pub async fn place_contract_order(
        &self,
        kind: MarketKind,
        body: &Value,
    ) -> Result<HuobiContractOrderId, ExchangeError> {
        let route = router::resolve(Operation::PlaceOrder, kind)?;
        let response: HuobiResponse<HuobiContractOrderId> = self
            .client_for(route.group)
            .post_json(&route.full_path(), body, route.group.is_private())
            .await?;
        response.into_result(Operation::PlaceOrder.as_str())
    }

    #[instrument(skip(self), fields(exchange = "huobi", order_id = %order_id))]
    pub async fn cancel_spot_order(&self, order_id: &str) -> Result<String, ExchangeError> {
        let route = router::resolve(Operation::CancelOrder, MarketKind::Spot)?;
        let response: HuobiResponse<String> = self
            .client_for(route.group)
            .post_json(
                &route.full_path_with_id(order_id),
                &Value::Object(serde_json::Map::new()),
                route.group.is_private(),
            )
            .await?;
        response.into_result(Operation::CancelOrder.as_str())
    }

    /// Contract cancels acknowledge with a successes/errors record kept
    /// raw: a cancel that reached the venue but missed the order still
    /// reports through it
    #[instrument(skip(self, body), fields(exchange = "huobi", kind = %kind))]
    pub async fn cancel_contract_order(
        &self,
        kind: MarketKind,
        body: &Value,
    ) -> Result<Value, ExchangeError> {
        let route = router::resolve(Operation::CancelOrder, kind)?;
        let response: HuobiResponse<Value> = self
            .client_for(route.group)
            .post_json(&route.full_path(), body, route.group.is_private())
            .await?;
        response.into_result(Operation::CancelOrder.as_str())
    }

    #[instrument(skip(self), fields(exchange = "huobi", order_id = %order_id))]
    pub async fn spot_order(&self, order_id: &str) -> Result<HuobiOrder, ExchangeError> {
        let route = router::resolve(Operation::OrderInfo, MarketKind::Spot)?;
        let response: HuobiResponse<HuobiOrder> = self
            .client_for(route.group)
            .get_json(
                &route.full_path_with_id(order_id),
                &[],
                route.group.is_private(),
            )
            .await?;
        response.into_result(Operation::OrderInfo.as_str())
    }

    #[instrument(skip(self, body), fields(exchange = "huobi", kind = %kind))]
    pub async fn contract_order_info(
        &self,
        kind: MarketKind,
        body: &Value,
    ) -> Result<Vec<HuobiOrder>, ExchangeError> {
        let route = router::resolve(Operation::OrderInfo, kind)?;
        let response: HuobiResponse<Vec<HuobiOrder>> = self
            .client_for(route.group)
            .post_json(&route.full_path(), body, route.group.is_private())
            .await?;
        response.into_result(Operation::OrderInfo.as_str())
    }

    /// Spot order listing by state set. `operation` picks between the
    /// current-orders and history endpoints.
    #[instrument(skip(self), fields(exchange = "huobi", operation = %operation))]
    pub async fn spot_orders(
        &self,
        operation: Operation,
        params: &[(&str, &str)],
    ) -> Result<Vec<HuobiOrder>, ExchangeError> {
        let route = router::resolve(operation, MarketKind::Spot)?;
        let response: HuobiResponse<Vec<HuobiOrder>> = self
            .client_for(route.group)
            .get_json(&route.full_path(), params, route.group.is_private())
            .await?;
        response.into_result(operation.as_str())
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn spot_open_orders(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Vec<HuobiOrder>, ExchangeError> {
        let response: HuobiResponse<Vec<HuobiOrder>> = self
            .spot
            .get_json(OPEN_ORDERS_ENDPOINT, params, true)
            .await?;
        response.into_result("open_orders")
    }

    #[instrument(skip(self, body), fields(exchange = "huobi", kind = %kind))]
    pub async fn contract_hisorders(
        &self,
        kind: MarketKind,
        body: &Value,
    ) -> Result<HuobiContractOrders, ExchangeError> {
        let route = router::resolve(Operation::OrdersByStates, kind)?;
        let response: HuobiResponse<HuobiContractOrders> = self
            .client_for(route.group)
            .post_json(&route.full_path(), body, route.group.is_private())
            .await?;
        response.into_result(Operation::OrdersByStates.as_str())
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    pub async fn spot_match_results(
        &self,
        params: &[(&str, &str)],
    ) -> Result<Vec<HuobiTrade>, ExchangeError> {
        let route = router::resolve(Operation::MyTrades, MarketKind::Spot)?;
        let response: HuobiResponse<Vec<HuobiTrade>> = self
            .client_for(route.group)
            .get_json(&route.full_path(), params, route.group.is_private())
            .await?;
        response.into_result(Operation::MyTrades.as_str())
    }

    /// Fills of one spot order; spot-only, so addressed directly
    #[instrument(skip(self), fields(exchange = "huobi", order_id = %order_id))]
    pub async fn spot_order_match_results(
        &self,
        order_id: &str,
    ) -> Result<Vec<HuobiTrade>, ExchangeError> {
        let endpoint = format!("/v1/order/orders/{order_id}/matchresults");
        let response: HuobiResponse<Vec<HuobiTrade>> =
            self.spot.get_json(&endpoint, &[], true).await?;
        response.into_result("order_trades")
    }

    #[instrument(skip(self, body), fields(exchange = "huobi", kind = %kind))]
    pub async fn contract_order_detail(
        &self,
        kind: MarketKind,
        body: &Value,
    ) -> Result<HuobiContractTrades, ExchangeError> {
        let route = router::resolve(Operation::MyTrades, kind)?;
        let response: HuobiResponse<HuobiContractTrades> = self
            .client_for(route.group)
            .post_json(&route.full_path(), body, route.group.is_private())
            .await?;
        response.into_result(Operation::MyTrades.as_str())
    }
}
