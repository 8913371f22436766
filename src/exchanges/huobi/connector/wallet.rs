use super::{load_accounts, spot_account_id};
use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{
    Account, Balance, DepositAddress, MarketKind, Transaction, TransactionType,
};
use crate::exchanges::huobi::conversions;
use crate::exchanges::huobi::registry::AccountRegistry;
use crate::exchanges::huobi::rest::HuobiRestClient;
use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use tracing::instrument;

/// Balances, venue accounts and fund movements.
pub struct Wallet<R: RestClient> {
    rest: Arc<HuobiRestClient<R>>,
    accounts: Arc<AccountRegistry>,
}

impl<R: RestClient> Wallet<R> {
    pub(crate) fn new(rest: Arc<HuobiRestClient<R>>, accounts: Arc<AccountRegistry>) -> Self {
        Self { rest, accounts }
    }

    /// The history route spells the withdrawal filter `withdraw`, without
    /// the trailing "al" the canonical type uses.
    async fn transactions(
        &self,
        venue_type: &str,
        currency: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        let currency_id = currency.map(str::to_lowercase);
        let rows = self
            .rest
            .transactions(venue_type, currency_id.as_deref(), limit)
            .await?;
        Ok(rows
            .iter()
            .map(conversions::convert_huobi_transaction)
            .collect())
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for Wallet<R> {
    #[instrument(skip(self), fields(exchange = "huobi", kind = %kind))]
    async fn get_account_balance(&self, kind: MarketKind) -> Result<Vec<Balance>, ExchangeError> {
        if kind == MarketKind::Spot {
            let account_id = spot_account_id(&self.rest, &self.accounts).await?;
            let account = self.rest.spot_balance(&account_id).await?;
            return Ok(conversions::convert_huobi_spot_balances(&account));
        }
        let rows = self.rest.contract_balance(kind).await?;
        Ok(conversions::convert_huobi_contract_balances(&rows, kind))
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_accounts(&self) -> Result<Vec<Account>, ExchangeError> {
        load_accounts(&self.rest, &self.accounts).await
    }

    #[instrument(skip(self), fields(exchange = "huobi", currency = %currency))]
    async fn get_deposit_address(&self, currency: &str) -> Result<DepositAddress, ExchangeError> {
        let currency_id = currency.to_lowercase();
        let rows = self.rest.deposit_address(&currency_id).await?;
        Ok(rows
            .first()
            .map(conversions::convert_huobi_deposit_address)
            .unwrap_or_else(|| DepositAddress {
                currency: Some(conversions::safe_currency_code(currency)),
                ..DepositAddress::default()
            }))
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_deposits(
        &self,
        currency: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        self.transactions("deposit", currency, limit).await
    }

    #[instrument(skip(self), fields(exchange = "huobi"))]
    async fn get_withdrawals(
        &self,
        currency: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Vec<Transaction>, ExchangeError> {
        self.transactions("withdraw", currency, limit).await
    }

    #[instrument(skip(self), fields(exchange = "huobi", currency = %currency))]
    async fn withdraw(
        &self,
        currency: &str,
        amount: Decimal,
        address: &str,
        tag: Option<&str>,
    ) -> Result<Transaction, ExchangeError> {
        let mut body = json!({
            "address": address,
            "amount": amount.to_string(),
            "currency": currency.to_lowercase(),
        });
        if let Some(tag) = tag {
            body["addr-tag"] = json!(tag);
        }
        let id = self.rest.create_withdrawal(&body).await?;
        Ok(Transaction {
            id: Some(id.to_string()),
            currency: Some(conversions::safe_currency_code(currency)),
            amount: Some(amount),
            address: Some(address.to_string()),
            tag: tag.map(str::to_string),
            transaction_type: Some(TransactionType::Withdrawal),
            ..Transaction::default()
        })
    }
}
