#![allow(clippy::match_wild_err_arm)]
#![allow(clippy::explicit_iter_loop)]

use huobix::{
    core::{
        config::ExchangeConfig,
        errors::ExchangeError,
        kernel::ReqwestRest,
        traits::{AccountInfo, MarketDataSource, OrderPlacer},
        types::{KlineInterval, MarketKind},
    },
    exchanges::huobi::{build_read_only_connector, HuobiBuilder, HuobiConnector},
};
use rust_decimal::Decimal;
use std::time::Duration;
use tokio::time::timeout;

/// Helper function to create a public-data connector with no credentials
fn create_huobi_connector() -> HuobiConnector<ReqwestRest> {
    build_read_only_connector().expect("read-only connector should build")
}

/// Helper function to create an authenticated connector from environment
fn create_huobi_from_env() -> Result<HuobiConnector<ReqwestRest>, Box<dyn std::error::Error>> {
    let config = ExchangeConfig::from_env("HUOBI")?;
    Ok(HuobiBuilder::new().with_config(config).build()?)
}

#[cfg(test)]
mod huobi_spot_tests {
    use super::*;

    #[tokio::test]
    async fn test_get_markets() {
        let connector = create_huobi_connector();

        let result = timeout(Duration::from_secs(30), connector.get_markets()).await;

        match result {
            Ok(Ok(markets)) => {
                println!("✅ Successfully fetched {} Huobi markets", markets.len());
                assert!(!markets.is_empty(), "Markets list should not be empty");

                // Verify market structure
                let first_market = &markets[0];
                assert!(
                    !first_market.symbol.is_empty(),
                    "Symbol should not be empty"
                );
                assert!(
                    !first_market.base.is_empty(),
                    "Base currency should not be empty"
                );
                assert!(
                    !first_market.quote.is_empty(),
                    "Quote currency should not be empty"
                );
                assert!(!first_market.id.is_empty(), "Venue id should not be empty");

                println!(
                    "First market: {} ({}/{}), kind: {}",
                    first_market.symbol, first_market.base, first_market.quote, first_market.kind
                );

                // The listing should span spot and derivative families
                let spot_count = markets
                    .iter()
                    .filter(|m| m.kind == MarketKind::Spot)
                    .count();
                let derivative_count = markets.iter().filter(|m| m.kind.is_derivative()).count();
                println!(
                    "Market families - spot: {}, derivative: {}",
                    spot_count, derivative_count
                );
                assert!(spot_count > 0, "Spot markets should be listed");
            }
            Ok(Err(e)) => {
                println!("❌ Failed to fetch Huobi markets: {}", e);
                eprintln!("Huobi market fetch failed: {}", e);
            }
            Err(_) => {
                panic!("❌ Timeout occurred while fetching Huobi markets");
            }
        }
    }

    #[tokio::test]
    async fn test_get_ticker() {
        let connector = create_huobi_connector();

        let result = timeout(Duration::from_secs(30), connector.get_ticker("BTC/USDT")).await;

        match result {
            Ok(Ok(ticker)) => {
                println!("✅ Successfully fetched BTC/USDT ticker");
                assert_eq!(
                    ticker.symbol.as_deref(),
                    Some("BTC/USDT"),
                    "Ticker should echo the unified symbol"
                );
                assert!(ticker.timestamp.is_some(), "Ticker should carry a timestamp");

                if let (Some(bid), Some(ask)) = (ticker.bid, ticker.ask) {
                    assert!(bid > Decimal::ZERO, "Bid should be positive");
                    assert!(ask >= bid, "Ask should not be below bid");
                    println!("BTC/USDT bid: {}, ask: {}", bid, ask);
                }
            }
            Ok(Err(e)) => {
                println!("❌ Failed to fetch ticker: {}", e);
                eprintln!("Ticker fetch failed: {}", e);
            }
            Err(_) => {
                panic!("❌ Timeout occurred while fetching ticker");
            }
        }
    }

    #[tokio::test]
    async fn test_get_order_book() {
        let connector = create_huobi_connector();

        let result = timeout(Duration::from_secs(30), connector.get_order_book("BTC/USDT")).await;

        match result {
            Ok(Ok(book)) => {
                println!(
                    "✅ Successfully fetched order book: {} bids, {} asks",
                    book.bids.len(),
                    book.asks.len()
                );
                assert!(!book.bids.is_empty(), "Bids should not be empty");
                assert!(!book.asks.is_empty(), "Asks should not be empty");

                // Bids descend, asks ascend, and the book must not be crossed
                for pair in book.bids.windows(2) {
                    assert!(pair[0].price >= pair[1].price, "Bids should descend");
                }
                for pair in book.asks.windows(2) {
                    assert!(pair[0].price <= pair[1].price, "Asks should ascend");
                }
                assert!(
                    book.bids[0].price < book.asks[0].price,
                    "Book should not be crossed"
                );

                println!(
                    "Best bid: {}, best ask: {}",
                    book.bids[0].price, book.asks[0].price
                );
            }
            Ok(Err(e)) => {
                println!("❌ Failed to fetch order book: {}", e);
                eprintln!("Order book fetch failed: {}", e);
            }
            Err(_) => {
                panic!("❌ Timeout occurred while fetching order book");
            }
        }
    }

    #[tokio::test]
    async fn test_get_recent_trades() {
        let connector = create_huobi_connector();

        let result = timeout(
            Duration::from_secs(30),
            connector.get_trades("BTC/USDT", Some(10)),
        )
        .await;

        match result {
            Ok(Ok(trades)) => {
                println!("✅ Successfully fetched {} trades", trades.len());
                assert!(!trades.is_empty(), "Trades should not be empty");

                for pair in trades.windows(2) {
                    assert!(
                        pair[0].timestamp <= pair[1].timestamp,
                        "Trades should be ordered oldest first"
                    );
                }

                let first_trade = &trades[0];
                if let Some(price) = first_trade.price {
                    assert!(price > Decimal::ZERO, "Trade price should be positive");
                }
                assert!(first_trade.side.is_some(), "Trade side should be present");
            }
            Ok(Err(e)) => {
                println!("❌ Failed to fetch trades: {}", e);
                eprintln!("Trades fetch failed: {}", e);
            }
            Err(_) => {
                panic!("❌ Timeout occurred while fetching trades");
            }
        }
    }

    #[tokio::test]
    async fn test_klines_data_quality() {
        let connector = create_huobi_connector();

        let result = timeout(
            Duration::from_secs(30),
            connector.get_klines("BTC/USDT", KlineInterval::Hours1, None, Some(5)),
        )
        .await;

        if let Ok(Ok(klines)) = result {
            assert!(!klines.is_empty(), "Should return klines data");

            for (i, kline) in klines.iter().enumerate() {
                assert!(kline.timestamp > 0, "Kline timestamp should be set");

                let (Some(open), Some(high), Some(low), Some(close)) =
                    (kline.open, kline.high, kline.low, kline.close)
                else {
                    continue;
                };

                assert!(
                    high >= open && high >= close && high >= low,
                    "High should be >= open, close, low"
                );
                assert!(
                    low <= open && low <= close,
                    "Low should be <= open and close"
                );
                assert!(
                    open > Decimal::ZERO && close > Decimal::ZERO,
                    "Prices should be positive"
                );

                if i == 0 {
                    println!(
                        "✅ Kline data quality check passed - O:{} H:{} L:{} C:{}",
                        open, high, low, close
                    );
                }
            }

            println!("✅ All {} klines passed quality validation", klines.len());
        } else {
            println!("⚠️ Could not validate klines data quality");
        }
    }

    #[tokio::test]
    async fn test_get_currencies() {
        let connector = create_huobi_connector();

        let result = timeout(Duration::from_secs(30), connector.get_currencies()).await;

        match result {
            Ok(Ok(currencies)) => {
                println!("✅ Successfully fetched {} currencies", currencies.len());
                assert!(!currencies.is_empty(), "Currencies should not be empty");

                let first = &currencies[0];
                assert!(!first.id.is_empty(), "Currency id should not be empty");
                assert!(!first.code.is_empty(), "Currency code should not be empty");
                assert_eq!(
                    first.code,
                    first.code.to_uppercase(),
                    "Unified codes are upper case"
                );
            }
            Ok(Err(e)) => {
                println!("❌ Failed to fetch currencies: {}", e);
                eprintln!("Currencies fetch failed: {}", e);
            }
            Err(_) => {
                panic!("❌ Timeout occurred while fetching currencies");
            }
        }
    }

    #[tokio::test]
    async fn test_get_trading_limits() {
        let connector = create_huobi_connector();

        let result = timeout(
            Duration::from_secs(30),
            connector.get_trading_limits("BTC/USDT"),
        )
        .await;

        match result {
            Ok(Ok(limits)) => {
                println!("✅ Successfully fetched trading limits");
                assert_eq!(limits.symbol.as_deref(), Some("BTC/USDT"));
                if let Some(min) = limits.amount.min {
                    assert!(min > Decimal::ZERO, "Minimum amount should be positive");
                    println!("Minimum order amount: {}", min);
                }
            }
            Ok(Err(e)) => {
                println!("❌ Failed to fetch trading limits: {}", e);
                eprintln!("Trading limits fetch failed: {}", e);
            }
            Err(_) => {
                panic!("❌ Timeout occurred while fetching trading limits");
            }
        }
    }
}

#[cfg(test)]
mod huobi_derivative_tests {
    use super::*;

    #[tokio::test]
    async fn test_derivative_markets_listed() {
        let connector = create_huobi_connector();

        let result = timeout(Duration::from_secs(30), connector.get_markets()).await;

        match result {
            Ok(Ok(markets)) => {
                let futures_count = markets
                    .iter()
                    .filter(|m| m.kind == MarketKind::Futures)
                    .count();
                let swap_count = markets
                    .iter()
                    .filter(|m| m.kind == MarketKind::Swap)
                    .count();
                let usdt_swap_count = markets
                    .iter()
                    .filter(|m| m.kind == MarketKind::UsdtSwap)
                    .count();

                println!(
                    "✅ Derivative listings - futures: {}, coin swaps: {}, usdt swaps: {}",
                    futures_count, swap_count, usdt_swap_count
                );

                if let Some(swap) = markets.iter().find(|m| m.kind == MarketKind::UsdtSwap) {
                    println!("USDT swap example: {} (id {})", swap.symbol, swap.id);
                    assert!(
                        swap.symbol.ends_with("-USDT"),
                        "USDT swap symbols are hyphenated contract codes"
                    );
                    assert_eq!(swap.quote, "USDT");
                }
            }
            Ok(Err(e)) => {
                println!("❌ Failed to fetch markets: {}", e);
                eprintln!("Derivative listing fetch failed: {}", e);
            }
            Err(_) => {
                panic!("❌ Timeout occurred while fetching markets");
            }
        }
    }

    #[tokio::test]
    async fn test_derivative_ticker_is_rejected() {
        let connector = create_huobi_connector();

        let markets = match timeout(Duration::from_secs(30), connector.get_markets()).await {
            Ok(Ok(markets)) => markets,
            _ => {
                println!("⚠️ Skipping derivative ticker test - markets unavailable");
                return;
            }
        };

        let Some(swap) = markets.iter().find(|m| m.kind == MarketKind::UsdtSwap) else {
            println!("⚠️ Skipping derivative ticker test - no usdt swaps listed");
            return;
        };

        // The merged ticker family only exists on the spot host
        let result = timeout(Duration::from_secs(30), connector.get_ticker(&swap.symbol)).await;

        match result {
            Ok(Err(ExchangeError::Unsupported(message))) => {
                println!("✅ Derivative ticker rejected as expected: {}", message);
            }
            Ok(Err(e)) => {
                panic!("Expected an unsupported-operation error, got: {}", e);
            }
            Ok(Ok(_)) => {
                panic!("Derivative ticker unexpectedly succeeded");
            }
            Err(_) => {
                panic!("❌ Timeout occurred while probing derivative ticker");
            }
        }
    }

    #[tokio::test]
    async fn test_derivative_klines() {
        let connector = create_huobi_connector();

        let markets = match timeout(Duration::from_secs(30), connector.get_markets()).await {
            Ok(Ok(markets)) => markets,
            _ => {
                println!("⚠️ Skipping derivative klines test - markets unavailable");
                return;
            }
        };

        let Some(swap) = markets.iter().find(|m| m.kind == MarketKind::UsdtSwap) else {
            println!("⚠️ Skipping derivative klines test - no usdt swaps listed");
            return;
        };

        let result = timeout(
            Duration::from_secs(30),
            connector.get_klines(&swap.symbol, KlineInterval::Minutes1, None, Some(5)),
        )
        .await;

        match result {
            Ok(Ok(klines)) => {
                println!(
                    "✅ Successfully fetched {} klines for {}",
                    klines.len(),
                    swap.symbol
                );
                assert!(!klines.is_empty(), "Derivative klines should not be empty");
            }
            Ok(Err(e)) => {
                println!("❌ Failed to fetch derivative klines: {}", e);
                eprintln!("Derivative klines fetch failed: {}", e);
            }
            Err(_) => {
                panic!("❌ Timeout occurred while fetching derivative klines");
            }
        }
    }
}

#[cfg(test)]
mod huobi_comprehensive_tests {
    use super::*;

    #[tokio::test]
    async fn test_unknown_symbol_is_rejected() {
        let connector = create_huobi_connector();

        let result = timeout(
            Duration::from_secs(30),
            connector.get_ticker("NOPE/NOPE"),
        )
        .await;

        match result {
            Ok(Err(ExchangeError::BadSymbol(venue))) => {
                println!("✅ Unknown symbol rejected: {}", venue);
            }
            Ok(Err(e)) => {
                println!("⚠️ Unknown symbol failed for another reason: {}", e);
            }
            Ok(Ok(_)) => {
                panic!("Unknown symbol unexpectedly resolved");
            }
            Err(_) => {
                println!("⚠️ Unknown symbol lookup timed out");
            }
        }
    }

    #[tokio::test]
    async fn test_error_handling_with_bad_credentials() {
        // Test with completely invalid credentials
        let connector = HuobiBuilder::new()
            .with_credentials(
                "invalid_huobi_key".to_string(),
                "invalid_huobi_secret".to_string(),
            )
            .build()
            .expect("connector should build with any credentials");

        let result = timeout(
            Duration::from_secs(15),
            connector.get_account_balance(MarketKind::Spot),
        )
        .await;

        match result {
            Ok(Err(e)) => {
                println!("✅ Huobi error handled gracefully: {}", e);
                let error_str = e.to_string();
                assert!(error_str.len() > 5, "Error message should be descriptive");
            }
            Ok(Ok(_)) => {
                println!("⚠️ Unexpectedly succeeded with invalid Huobi credentials");
            }
            Err(_) => {
                println!("⚠️ Huobi request timed out");
            }
        }
    }

    #[tokio::test]
    async fn test_missing_credentials_fail_before_any_request() {
        let connector = create_huobi_connector();

        let result = timeout(
            Duration::from_secs(15),
            connector.get_account_balance(MarketKind::UsdtSwap),
        )
        .await;

        match result {
            Ok(Err(ExchangeError::MissingCredentials(operation))) => {
                println!("✅ Missing credentials surfaced for: {}", operation);
            }
            Ok(Err(e)) => {
                println!("⚠️ Balance failed for another reason: {}", e);
            }
            Ok(Ok(_)) => {
                panic!("Balance unexpectedly succeeded without credentials");
            }
            Err(_) => {
                println!("⚠️ Balance request timed out");
            }
        }
    }

    #[tokio::test]
    async fn test_concurrent_huobi_requests() {
        let futures = (0..5).map(|i| {
            let connector = create_huobi_connector();
            async move {
                let result = timeout(Duration::from_secs(30), connector.get_markets()).await;
                (i, result)
            }
        });

        let results = futures::future::join_all(futures).await;

        let mut success_count = 0;
        let mut error_count = 0;

        for (i, result) in results {
            match result {
                Ok(Ok(markets)) => {
                    println!(
                        "✅ Huobi concurrent request {} succeeded: {} markets",
                        i,
                        markets.len()
                    );
                    success_count += 1;
                }
                Ok(Err(e)) => {
                    println!("⚠️ Huobi concurrent request {} failed: {}", i, e);
                    error_count += 1;
                }
                Err(_) => {
                    println!("⚠️ Huobi concurrent request {} timed out", i);
                    error_count += 1;
                }
            }
        }

        println!(
            "Huobi concurrent test: {}/5 succeeded, {}/5 failed",
            success_count, error_count
        );
    }
}

#[cfg(test)]
mod huobi_private_tests {
    use super::*;

    #[tokio::test]
    #[ignore = "Requires valid API credentials"]
    async fn test_get_account_balance_with_credentials() {
        if let Ok(connector) = create_huobi_from_env() {
            let result = timeout(
                Duration::from_secs(30),
                connector.get_account_balance(MarketKind::Spot),
            )
            .await;

            match result {
                Ok(Ok(balances)) => {
                    println!("✅ Successfully fetched Huobi spot balance");
                    println!("Number of balances: {}", balances.len());

                    // Show non-zero balances
                    let non_zero_balances: Vec<_> = balances
                        .iter()
                        .filter(|b| {
                            b.free.unwrap_or(Decimal::ZERO) > Decimal::ZERO
                                || b.used.unwrap_or(Decimal::ZERO) > Decimal::ZERO
                        })
                        .collect();

                    println!("Non-zero balances: {}", non_zero_balances.len());
                    for balance in non_zero_balances.iter().take(5) {
                        println!(
                            "  {}: free={:?}, used={:?}",
                            balance.asset, balance.free, balance.used
                        );
                    }
                }
                Ok(Err(e)) => {
                    println!("❌ Failed to fetch Huobi balance: {}", e);
                    panic!("Huobi balance fetch failed: {}", e);
                }
                Err(_) => {
                    panic!("❌ Timeout occurred while fetching Huobi balance");
                }
            }
        } else {
            println!("⚠️ Skipping Huobi balance test - no valid credentials found");
        }
    }

    #[tokio::test]
    #[ignore = "Requires valid API credentials"]
    async fn test_get_accounts_with_credentials() {
        if let Ok(connector) = create_huobi_from_env() {
            let result = timeout(Duration::from_secs(30), connector.get_accounts()).await;

            match result {
                Ok(Ok(accounts)) => {
                    println!("✅ Successfully fetched {} accounts", accounts.len());
                    assert!(!accounts.is_empty(), "Accounts should not be empty");
                    for account in accounts.iter().take(5) {
                        println!(
                            "  id={}, type={:?}, state={:?}",
                            account.id, account.account_type, account.state
                        );
                    }
                }
                Ok(Err(e)) => {
                    panic!("Huobi accounts fetch failed: {}", e);
                }
                Err(_) => {
                    panic!("❌ Timeout occurred while fetching accounts");
                }
            }
        } else {
            println!("⚠️ Skipping Huobi accounts test - no valid credentials found");
        }
    }

    #[tokio::test]
    #[ignore = "Requires valid API credentials"]
    async fn test_get_open_orders_with_credentials() {
        if let Ok(connector) = create_huobi_from_env() {
            let result = timeout(
                Duration::from_secs(30),
                connector.get_open_orders("BTC/USDT", None, None),
            )
            .await;

            match result {
                Ok(Ok(orders)) => {
                    println!("✅ Successfully fetched {} open orders", orders.len());
                    for order in orders.iter().take(5) {
                        println!(
                            "  id={:?}, side={:?}, price={:?}, amount={:?}",
                            order.id, order.side, order.price, order.amount
                        );
                    }
                }
                Ok(Err(e)) => {
                    println!("❌ Failed to fetch open orders: {}", e);
                }
                Err(_) => {
                    panic!("❌ Timeout occurred while fetching open orders");
                }
            }
        } else {
            println!("⚠️ Skipping Huobi open orders test - no valid credentials found");
        }
    }

    #[tokio::test]
    #[ignore = "Requires valid API credentials"]
    async fn test_get_deposits_with_credentials() {
        if let Ok(connector) = create_huobi_from_env() {
            let result = timeout(
                Duration::from_secs(30),
                connector.get_deposits(None, Some(5)),
            )
            .await;

            match result {
                Ok(Ok(deposits)) => {
                    println!("✅ Successfully fetched {} deposits", deposits.len());
                    for deposit in deposits.iter().take(5) {
                        println!(
                            "  {:?}: amount={:?}, status={:?}",
                            deposit.currency, deposit.amount, deposit.status
                        );
                    }
                }
                Ok(Err(e)) => {
                    println!("❌ Failed to fetch deposits: {}", e);
                }
                Err(_) => {
                    panic!("❌ Timeout occurred while fetching deposits");
                }
            }
        } else {
            println!("⚠️ Skipping Huobi deposits test - no valid credentials found");
        }
    }
}

// Configuration and setup tests
#[cfg(test)]
mod huobi_config_tests {
    use super::*;

    #[test]
    fn test_connector_creation() {
        // Builders should not perform any network traffic
        let read_only = build_read_only_connector();
        assert!(read_only.is_ok(), "Read-only connector should build");

        let testnet = HuobiBuilder::new()
            .with_credentials("test".to_string(), "test".to_string())
            .with_testnet(true)
            .build();
        assert!(testnet.is_ok(), "Testnet connector should build");

        let aws = HuobiBuilder::new()
            .with_hostname("api-aws.huobi.pro".to_string())
            .build();
        assert!(aws.is_ok(), "Hostname override connector should build");

        println!("✅ Huobi connector creation test passed");
    }

    #[test]
    fn test_config_from_env_is_optional() {
        // Absence of credentials must not break public-data construction
        if create_huobi_from_env().is_ok() {
            println!("✅ Environment credentials found and accepted");
        } else {
            println!("⚠️ No environment credentials - public connector still works");
            let _connector = create_huobi_connector();
        }
    }
}
