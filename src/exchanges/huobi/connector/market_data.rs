use super::{load_markets, resolve_market, HuobiOptions};
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::MarketDataSource;
use crate::core::types::{
    Currency, KlineInterval, Market, Ohlcv, OrderBook, Ticker, Trade, TradingLimits,
};
use crate::exchanges::huobi::conversions;
use crate::exchanges::huobi::registry::MarketRegistry;
use crate::exchanges::huobi::rest::HuobiRestClient;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{instrument, warn};

/// Public market data over all four market families.
pub struct MarketData<R: RestClient> {
    rest: Arc<HuobiRestClient<R>>,
    markets: Arc<MarketRegistry>,
    options: HuobiOptions,
}

impl<R: RestClient> MarketData<R> {
    pub(crate) fn new(
        rest: Arc<HuobiRestClient<R>>,
        markets: Arc<MarketRegistry>,
        options: HuobiOptions,
    ) -> Self {
        Self {
            rest,
            markets,
            options,
        }
    }

    async fn market(&self, symbol: &str) -> Result<Market, ExchangeError> {
        resolve_market(&self.rest, &self.markets, symbol).await
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for MarketData<R> {
    /// Fetches the full listing and refreshes the registry other
    /// operations resolve symbols against.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_markets(&self) -> Result<Vec<Market>, ExchangeError> {
        let markets = load_markets(&self.rest).await?;
        self.markets.store(&markets).await;
        Ok(markets)
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %symbol))]
    async fn get_ticker(&self, symbol: &str) -> Result<Ticker, ExchangeError> {
        let market = self.market(symbol).await?;
        let (tick, ts) = self.rest.merged_ticker(market.kind, &market.id).await?;
        Ok(conversions::convert_huobi_ticker(
            &tick,
            Some(&market.symbol),
            ts,
        ))
    }

    /// One snapshot per listed spot market. Rows whose venue id does not
    /// resolve against the registry are skipped.
    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_tickers(&self) -> Result<Vec<Ticker>, ExchangeError> {
        if !self.markets.is_loaded().await {
            let loaded = load_markets(&self.rest).await?;
            self.markets.store(&loaded).await;
        }
        let (rows, ts) = self.rest.tickers().await?;
        let mut tickers = Vec::with_capacity(rows.len());
        for row in &rows {
            let Some(id) = row.symbol.as_deref() else {
                continue;
            };
            let Some(market) = self.markets.by_id(id).await else {
                continue;
            };
            tickers.push(conversions::convert_huobi_ticker(
                row,
                Some(&market.symbol),
                ts,
            ));
        }
        Ok(tickers)
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %symbol))]
    async fn get_order_book(&self, symbol: &str) -> Result<OrderBook, ExchangeError> {
        let market = self.market(symbol).await?;
        let (depth, ts) = self.rest.depth(market.kind, &market.id, "step0").await?;
        Ok(conversions::convert_huobi_order_book(
            &depth,
            Some(&market.symbol),
            ts,
        ))
    }

    /// Recent public trades, flattened from the venue's per-tick buckets
    /// and sorted oldest first.
    #[instrument(skip(self), fields(exchange = "huobi", symbol = %symbol))]
    async fn get_trades(
        &self,
        symbol: &str,
        limit: Option<u32>,
    ) -> Result<Vec<Trade>, ExchangeError> {
        let market = self.market(symbol).await?;
        let buckets = self
            .rest
            .recent_trades(market.kind, &market.id, limit)
            .await?;
        let mut trades = Vec::new();
        for bucket in &buckets {
            for row in &bucket.data {
                trades.push(conversions::convert_huobi_trade(row, Some(&market)));
            }
        }
        trades.sort_by_key(|trade| trade.timestamp);
        Ok(trades)
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %symbol, interval = %interval))]
    async fn get_klines(
        &self,
        symbol: &str,
        interval: KlineInterval,
        since: Option<i64>,
        limit: Option<u32>,
    ) -> Result<Vec<Ohlcv>, ExchangeError> {
        let market = self.market(symbol).await?;
        let rows = self
            .rest
            .klines(
                market.kind,
                &market.id,
                interval.to_huobi_period(),
                since,
                limit,
            )
            .await?;
        let mut candles: Vec<Ohlcv> = rows.iter().map(conversions::convert_huobi_ohlcv).collect();
        candles.sort_by_key(|candle| candle.timestamp);
        Ok(candles)
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_currencies(&self) -> Result<Vec<Currency>, ExchangeError> {
        let rows = self.rest.currencies(&self.options.language).await?;
        let mut currencies = Vec::with_capacity(rows.len());
        for row in &rows {
            match conversions::convert_huobi_currency(row) {
                Ok(currency) => currencies.push(currency),
                Err(error) => warn!(%error, "skipping malformed currency row"),
            }
        }
        Ok(currencies)
    }

    #[instrument(skip(self), fields(exchange = "huobi", symbol = %symbol))]
    async fn get_trading_limits(&self, symbol: &str) -> Result<TradingLimits, ExchangeError> {
        let market = self.market(symbol).await?;
        let row = self.rest.trading_limits(market.kind, &market.id).await?;
        Ok(conversions::convert_huobi_trading_limits(
            &row,
            Some(&market.symbol),
        ))
    }
}
