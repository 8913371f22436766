pub mod core;
pub mod exchanges;

pub use core::{errors::ExchangeError, traits::ExchangeConnector, types::*};
pub use exchanges::huobi::{build_connector, build_read_only_connector, HuobiBuilder, HuobiConnector};
