use huobix::core::traits::MarketDataSource;
use huobix::exchanges::huobi::build_read_only_connector;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    // Public endpoints only; add credentials via HuobiBuilder for trading
    let huobi = build_read_only_connector()?;

    // Get all markets
    println!("Fetching markets...");
    match huobi.get_markets().await {
        Ok(markets) => {
            println!("Found {} markets", markets.len());
            // Print first 5 markets as example
            for market in markets.iter().take(5) {
                println!(
                    "Market: {} ({}->{}), Kind: {}, Active: {}",
                    market.symbol, market.base, market.quote, market.kind, market.active
                );
            }
        }
        Err(e) => {
            println!("Error fetching markets: {}", e);
        }
    }

    // Get a single ticker
    println!("Fetching BTC/USDT ticker...");
    match huobi.get_ticker("BTC/USDT").await {
        Ok(ticker) => {
            println!(
                "BTC/USDT bid: {:?}, ask: {:?}, last: {:?}",
                ticker.bid, ticker.ask, ticker.last
            );
        }
        Err(e) => {
            println!("Error fetching ticker: {}", e);
        }
    }

    // Example order (commented out for safety)
    /*
    use huobix::core::traits::OrderPlacer;
    use huobix::core::types::{OrderRequest, OrderSide, OrderType};

    let trading = HuobiBuilder::new()
        .with_credentials("your_api_key".to_string(), "your_secret_key".to_string())
        .build()?;

    let order = OrderRequest {
        symbol: "BTC/USDT".to_string(),
        side: OrderSide::Buy,
        order_type: OrderType::Limit,
        amount: "0.001".parse()?,
        price: Some("30000".parse()?),
    };

    match trading.place_order(order).await {
        Ok(response) => {
            println!("Order placed successfully: {:?}", response);
        }
        Err(e) => {
            println!("Error placing order: {}", e);
        }
    }
    */

    Ok(())
}
