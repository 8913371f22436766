pub mod codec;
pub mod conversions;
pub mod registry;
pub mod router;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_connector, build_read_only_connector, HuobiBuilder};
pub use connector::{
    HuobiConnector, HuobiOptions, MarketData, OpenOrdersMethod, SpotStatesEndpoint, Trading, Wallet,
};
pub use rest::HuobiRestClient;
pub use signer::HuobiSigner;
pub use types::{
    HuobiAccount, HuobiContractAccount, HuobiContractInfo, HuobiCurrency, HuobiDepositAddress,
    HuobiDepth, HuobiKline, HuobiOrder, HuobiSpotBalance, HuobiSpotSymbol, HuobiTicker, HuobiTrade,
    HuobiTradingLimits, HuobiTransaction,
};
