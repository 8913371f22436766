use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::types::MarketKind;
use reqwest::Method;
use std::fmt;

pub const SPOT_HOST: &str = "api.huobi.pro";
pub const SPOT_TESTNET_HOST: &str = "api.testnet.huobi.pro";
pub const CONTRACT_HOST: &str = "api.hbdm.com";

/// The venue partitions its REST surface into api groups. A group fixes
/// the host, the path prefix and whether requests are signed; the path
/// inside the group comes from the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiGroup {
    Market,
    Public,
    Private,
    V2Public,
    V2Private,
    FuturesPublic,
    FuturesMarket,
    FuturesPrivate,
    SwapPublic,
    SwapMarket,
    SwapPrivate,
    UsdtSwapPublic,
    UsdtSwapMarket,
    UsdtSwapPrivate,
}

impl ApiGroup {
    /// Path prefix the group contributes to the signed URL. Candle data
    /// for coin futures lives at the contract host root, so that group's
    /// prefix is empty.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Market => "/market",
            Self::Public | Self::Private => "/v1",
            Self::V2Public | Self::V2Private => "/v2",
            Self::FuturesPublic | Self::FuturesPrivate => "/api",
            Self::FuturesMarket => "",
            Self::SwapPublic | Self::SwapPrivate => "/swap-api",
            Self::SwapMarket => "/swap-ex",
            Self::UsdtSwapPublic | Self::UsdtSwapPrivate => "/linear-swap-api",
            Self::UsdtSwapMarket => "/linear-swap-ex",
        }
    }

    /// Spot groups ride the configurable spot hostname; everything else
    /// goes to the contract host.
    pub fn on_spot_host(self) -> bool {
        matches!(
            self,
            Self::Market | Self::Public | Self::Private | Self::V2Public | Self::V2Private
        )
    }

    pub fn is_private(self) -> bool {
        matches!(
            self,
            Self::Private
                | Self::V2Private
                | Self::FuturesPrivate
                | Self::SwapPrivate
                | Self::UsdtSwapPrivate
        )
    }
}

/// Unified operations the route table covers. Account-directory style
/// endpoints (accounts, currencies, deposit address, transfers) exist for
/// exactly one group and are addressed directly by the typed client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Markets,
    Ticker,
    Tickers,
    OrderBook,
    Trades,
    Ohlcv,
    Balance,
    PlaceOrder,
    CancelOrder,
    OrderInfo,
    OrdersByStates,
    OrderHistory,
    MyTrades,
    TradingLimits,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markets => "markets",
            Self::Ticker => "ticker",
            Self::Tickers => "tickers",
            Self::OrderBook => "order_book",
            Self::Trades => "trades",
            Self::Ohlcv => "ohlcv",
            Self::Balance => "balance",
            Self::PlaceOrder => "place_order",
            Self::CancelOrder => "cancel_order",
            Self::OrderInfo => "order_info",
            Self::OrdersByStates => "orders_by_states",
            Self::OrderHistory => "order_history",
            Self::MyTrades => "my_trades",
            Self::TradingLimits => "trading_limits",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A resolved route: verb, api group, and the path inside the group.
/// Paths may carry an `{id}` placeholder filled by the typed client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub method: Method,
    pub group: ApiGroup,
    pub path: &'static str,
}

impl EndpointDescriptor {
    const fn new(method: Method, group: ApiGroup, path: &'static str) -> Self {
        Self {
            method,
            group,
            path,
        }
    }

    /// Prefix-joined path as it appears in the URL and in the signature.
    pub fn full_path(&self) -> String {
        format!("{}/{}", self.group.prefix(), self.path)
    }

    pub fn full_path_with_id(&self, id: &str) -> String {
        self.full_path().replace("{id}", id)
    }
}

/// Resolve a unified operation against a market kind.
///
/// The match is exhaustive over both enums; pairs the venue does not serve
/// fail with `Unsupported` here, before any request is assembled.
pub fn resolve(op: Operation, kind: MarketKind) -> Result<EndpointDescriptor, ExchangeError> {
    use ApiGroup as G;
    use MarketKind::{Futures, Spot, Swap, UsdtSwap};
    use Operation as Op;

    let descriptor = match (op, kind) {
        (Op::Markets, Spot) => EndpointDescriptor::new(Method::GET, G::Public, "common/symbols"),
        (Op::Markets, Futures) => {
            EndpointDescriptor::new(Method::GET, G::FuturesPublic, "v1/contract_contract_info")
        }
        (Op::Markets, Swap) => {
            EndpointDescriptor::new(Method::GET, G::SwapPublic, "v1/swap_contract_info")
        }
        (Op::Markets, UsdtSwap) => {
            EndpointDescriptor::new(Method::GET, G::UsdtSwapPublic, "v1/swap_contract_info")
        }

        (Op::Ticker, Spot) => EndpointDescriptor::new(Method::GET, G::Market, "detail/merged"),
        (Op::Tickers, Spot) => EndpointDescriptor::new(Method::GET, G::Market, "tickers"),
        (Op::OrderBook, Spot) => EndpointDescriptor::new(Method::GET, G::Market, "depth"),
        (Op::Trades, Spot) => EndpointDescriptor::new(Method::GET, G::Market, "history/trade"),
        (Op::Ticker | Op::Tickers | Op::OrderBook | Op::Trades, Futures | Swap | UsdtSwap) => {
            return Err(unsupported(op, kind))
        }

        (Op::Ohlcv, Spot) => EndpointDescriptor::new(Method::GET, G::Market, "history/kline"),
        (Op::Ohlcv, Futures) => {
            EndpointDescriptor::new(Method::GET, G::FuturesMarket, "market/history/kline")
        }
        (Op::Ohlcv, Swap) => {
            EndpointDescriptor::new(Method::GET, G::SwapMarket, "market/history/kline")
        }
        (Op::Ohlcv, UsdtSwap) => {
            EndpointDescriptor::new(Method::GET, G::UsdtSwapMarket, "market/history/kline")
        }

        (Op::Balance, Spot) => {
            EndpointDescriptor::new(Method::GET, G::Private, "account/accounts/{id}/balance")
        }
        (Op::Balance, Futures) => {
            EndpointDescriptor::new(Method::POST, G::FuturesPrivate, "v1/contract_account_info")
        }
        (Op::Balance, Swap) => {
            EndpointDescriptor::new(Method::POST, G::SwapPrivate, "v1/swap_account_info")
        }
        (Op::Balance, UsdtSwap) => {
            EndpointDescriptor::new(Method::POST, G::UsdtSwapPrivate, "v1/swap_account_info")
        }

        (Op::PlaceOrder, Spot) => {
            EndpointDescriptor::new(Method::POST, G::Private, "order/orders/place")
        }
        (Op::PlaceOrder, Futures) => {
            EndpointDescriptor::new(Method::POST, G::FuturesPrivate, "v1/contract_order")
        }
        (Op::PlaceOrder, Swap) => {
            EndpointDescriptor::new(Method::POST, G::SwapPrivate, "v1/swap_order")
        }
        (Op::PlaceOrder, UsdtSwap) => {
            EndpointDescriptor::new(Method::POST, G::UsdtSwapPrivate, "v1/swap_order")
        }

        (Op::CancelOrder, Spot) => {
            EndpointDescriptor::new(Method::POST, G::Private, "order/orders/{id}/submitcancel")
        }
        (Op::CancelOrder, Futures) => {
            EndpointDescriptor::new(Method::POST, G::FuturesPrivate, "v1/contract_cancel")
        }
        (Op::CancelOrder, Swap) => {
            EndpointDescriptor::new(Method::POST, G::SwapPrivate, "v1/swap_cancel")
        }
        (Op::CancelOrder, UsdtSwap) => {
            EndpointDescriptor::new(Method::POST, G::UsdtSwapPrivate, "v1/swap_cancel")
        }

        (Op::OrderInfo, Spot) => {
            EndpointDescriptor::new(Method::GET, G::Private, "order/orders/{id}")
        }
        (Op::OrderInfo, Futures) => {
            EndpointDescriptor::new(Method::POST, G::FuturesPrivate, "v1/contract_order_info")
        }
        (Op::OrderInfo, Swap) => {
            EndpointDescriptor::new(Method::POST, G::SwapPrivate, "v1/swap_order_info")
        }
        (Op::OrderInfo, UsdtSwap) => {
            EndpointDescriptor::new(Method::POST, G::UsdtSwapPrivate, "v1/swap_order_info")
        }

        (Op::OrdersByStates, Spot) => {
            EndpointDescriptor::new(Method::GET, G::Private, "order/orders")
        }
        (Op::OrderHistory, Spot) => {
            EndpointDescriptor::new(Method::GET, G::Private, "order/history")
        }
        (Op::OrdersByStates | Op::OrderHistory, Futures) => {
            EndpointDescriptor::new(Method::POST, G::FuturesPrivate, "v1/contract_hisorders")
        }
        (Op::OrdersByStates | Op::OrderHistory, Swap) => {
            EndpointDescriptor::new(Method::POST, G::SwapPrivate, "v1/swap_hisorders")
        }
        (Op::OrdersByStates | Op::OrderHistory, UsdtSwap) => {
            EndpointDescriptor::new(Method::POST, G::UsdtSwapPrivate, "v1/swap_hisorders")
        }

        (Op::MyTrades, Spot) => {
            EndpointDescriptor::new(Method::GET, G::Private, "order/matchresults")
        }
        (Op::MyTrades, Futures) => {
            EndpointDescriptor::new(Method::POST, G::FuturesPrivate, "v1/contract_order_detail")
        }
        (Op::MyTrades, Swap) => {
            EndpointDescriptor::new(Method::POST, G::SwapPrivate, "v1/swap_order_detail")
        }
        (Op::MyTrades, UsdtSwap) => {
            EndpointDescriptor::new(Method::POST, G::UsdtSwapPrivate, "v1/swap_order_detail")
        }

        (Op::TradingLimits, Spot) => {
            EndpointDescriptor::new(Method::GET, G::Public, "common/exchange")
        }
        (Op::TradingLimits, Futures | Swap | UsdtSwap) => return Err(unsupported(op, kind)),
    };

    Ok(descriptor)
}

fn unsupported(op: Operation, kind: MarketKind) -> ExchangeError {
    ExchangeError::Unsupported(format!("{op} is not available for {kind} markets"))
}

/// Spot API host after applying configuration. An explicit hostname
/// override wins over the testnet flag; the contract host has no testnet
/// counterpart.
pub fn spot_host(config: &ExchangeConfig) -> String {
    if let Some(hostname) = &config.hostname {
        hostname.clone()
    } else if config.testnet {
        SPOT_TESTNET_HOST.to_string()
    } else {
        SPOT_HOST.to_string()
    }
}
