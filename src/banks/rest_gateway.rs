use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::BANK_GATEWAY_TIMEOUT_SECS;

use super::bank_errors::BankError;
use super::bank_models::{DepositHolding, FillStatus, FundHolding, FundOrder, FundOrderResult};
use super::bank_traits::BankGateway;

/// REST/JSON adapter for partner banks exposing the uniform IRP interface.
pub struct RestBankGateway {
    client: Client,
    base_url: String,
    bank_code: String,
}

impl RestBankGateway {
    pub fn new(bank_code: impl Into<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(BANK_GATEWAY_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
            bank_code: bank_code.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/irp/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn map_read_error(err: reqwest::Error) -> BankError {
        if err.is_timeout() {
            BankError::Timeout
        } else {
            BankError::Network(err)
        }
    }
}

// Wire DTOs. Every response carries a success flag and an optional message;
// a non-success body maps to BankError::Rejected.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BalanceBody {
    success: bool,
    cash_balance: Option<Decimal>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepositHoldingsBody {
    success: bool,
    holdings: Option<Vec<DepositItem>>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DepositItem {
    product_code: String,
    product_name: String,
    principal_amount: Decimal,
    interest_rate: Decimal,
    maturity_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FundHoldingsBody {
    success: bool,
    holdings: Option<Vec<FundItem>>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FundItem {
    fund_code: String,
    fund_name: String,
    units: Decimal,
    current_nav: Decimal,
    purchase_nav: Decimal,
    current_value: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FundOrderBody<'a> {
    account_number: &'a str,
    order_type: &'a str,
    fund_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FundOrderResponseBody {
    success: bool,
    bank_order_id: Option<String>,
    filled_nav: Option<Decimal>,
    filled_units: Option<Decimal>,
    filled_amount: Option<Decimal>,
    status: Option<String>,
    error_message: Option<String>,
}

fn rejected(message: Option<String>) -> BankError {
    BankError::Rejected(message.unwrap_or_else(|| "no error message".to_string()))
}

#[async_trait]
impl BankGateway for RestBankGateway {
    async fn get_irp_account_balance(&self, account_number: &str) -> Result<Decimal, BankError> {
        let body: BalanceBody = self
            .client
            .get(self.url("balance"))
            .query(&[("accountNumber", account_number)])
            .send()
            .await
            .map_err(Self::map_read_error)?
            .json()
            .await
            .map_err(Self::map_read_error)?;

        if !body.success {
            return Err(rejected(body.error_message));
        }
        body.cash_balance.ok_or_else(|| {
            BankError::InvalidResponse(format!(
                "{}: balance response missing cashBalance",
                self.bank_code
            ))
        })
    }

    async fn get_irp_deposit_holdings(
        &self,
        account_number: &str,
    ) -> Result<Vec<DepositHolding>, BankError> {
        let body: DepositHoldingsBody = self
            .client
            .get(self.url("deposits"))
            .query(&[("accountNumber", account_number)])
            .send()
            .await
            .map_err(Self::map_read_error)?
            .json()
            .await
            .map_err(Self::map_read_error)?;

        if !body.success {
            return Err(rejected(body.error_message));
        }
        Ok(body
            .holdings
            .unwrap_or_default()
            .into_iter()
            .map(|item| DepositHolding {
                product_code: item.product_code,
                product_name: item.product_name,
                principal_amount: item.principal_amount,
                interest_rate: item.interest_rate,
                maturity_date: item.maturity_date,
            })
            .collect())
    }

    async fn get_irp_fund_holdings(
        &self,
        account_number: &str,
    ) -> Result<Vec<FundHolding>, BankError> {
        let body: FundHoldingsBody = self
            .client
            .get(self.url("funds"))
            .query(&[("accountNumber", account_number)])
            .send()
            .await
            .map_err(Self::map_read_error)?
            .json()
            .await
            .map_err(Self::map_read_error)?;

        if !body.success {
            return Err(rejected(body.error_message));
        }
        Ok(body
            .holdings
            .unwrap_or_default()
            .into_iter()
            .map(|item| FundHolding {
                fund_code: item.fund_code,
                fund_name: item.fund_name,
                units: item.units,
                current_nav: item.current_nav,
                purchase_nav: item.purchase_nav,
                current_value: item.current_value,
            })
            .collect())
    }

    async fn submit_fund_order(
        &self,
        account_number: &str,
        order: &FundOrder,
    ) -> Result<FundOrderResult, BankError> {
        let request = FundOrderBody {
            account_number,
            order_type: order.side.as_str(),
            fund_code: &order.fund_code,
            amount: order.amount,
            units: order.units,
        };

        // A timed-out submission may still have executed at the bank. Surface
        // it as ambiguous so the caller reconciles instead of re-submitting.
        let response = self
            .client
            .post(self.url("orders"))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BankError::AmbiguousOutcome(format!(
                        "{}: order submission timed out for fund {}",
                        self.bank_code, order.fund_code
                    ))
                } else {
                    BankError::Network(e)
                }
            })?;

        let body: FundOrderResponseBody = response.json().await.map_err(Self::map_read_error)?;

        if !body.success {
            return Err(rejected(body.error_message));
        }

        let status = match body.status.as_deref() {
            Some("FILLED") => FillStatus::Filled,
            Some("PARTIAL_FILLED") => FillStatus::PartialFilled,
            Some("REJECTED") => FillStatus::Rejected,
            other => {
                return Err(BankError::InvalidResponse(format!(
                    "{}: unknown order status {:?}",
                    self.bank_code, other
                )))
            }
        };

        Ok(FundOrderResult {
            bank_order_id: body.bank_order_id.ok_or_else(|| {
                BankError::InvalidResponse(format!(
                    "{}: order response missing bankOrderId",
                    self.bank_code
                ))
            })?,
            filled_nav: body.filled_nav.unwrap_or_default(),
            filled_units: body.filled_units.unwrap_or_default(),
            filled_amount: body.filled_amount.unwrap_or_default(),
            status,
        })
    }
}

impl std::fmt::Debug for RestBankGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBankGateway")
            .field("bank_code", &self.bank_code)
            .field("base_url", &self.base_url)
            .finish()
    }
}
