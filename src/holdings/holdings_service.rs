use async_trait::async_trait;
use log::warn;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::accounts::{AccountError, AccountRepository, IrpAccount};
use crate::banks::GatewayRegistry;
use crate::constants::DECIMAL_PRECISION;
use crate::Result;

use super::holdings_errors::HoldingError;
use super::holdings_model::{Holding, HoldingStatus, RefreshReport, SleeveType};
use super::holdings_traits::{HoldingRepository, HoldingsService};

pub struct HoldingsServiceImpl {
    repository: Arc<dyn HoldingRepository>,
    accounts: Arc<dyn AccountRepository>,
    gateways: Arc<GatewayRegistry>,
}

impl HoldingsServiceImpl {
    pub fn new(
        repository: Arc<dyn HoldingRepository>,
        accounts: Arc<dyn AccountRepository>,
        gateways: Arc<GatewayRegistry>,
    ) -> Self {
        Self {
            repository,
            accounts,
            gateways,
        }
    }

    async fn account_for(&self, customer_id: &str) -> Result<IrpAccount> {
        self.accounts
            .find_by_customer(customer_id)
            .await?
            .ok_or_else(|| {
                AccountError::NotFound(format!("No active IRP account for customer {}", customer_id))
                    .into()
            })
    }

    /// Closes open holdings of a sleeve the bank no longer reports.
    async fn close_missing(
        &self,
        customer_id: &str,
        sleeve: SleeveType,
        reported_codes: &[String],
        closed_status: HoldingStatus,
    ) -> Result<()> {
        let open = self.repository.list_open(customer_id).await?;
        for mut holding in open.into_iter().filter(|h| h.sleeve == sleeve) {
            let code = holding.instrument_code.clone().unwrap_or_default();
            if !reported_codes.contains(&code) {
                holding.status = closed_status;
                holding.current_value = Decimal::ZERO;
                holding.mark_synced();
                self.repository.save(holding).await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl HoldingsService for HoldingsServiceImpl {
    async fn refresh_cash_balance(&self, customer_id: &str) -> Result<()> {
        let account = self.account_for(customer_id).await?;
        let gateway = self.gateways.for_bank(&account.bank_code).map_err(crate::Error::Bank)?;

        let balance = gateway
            .get_irp_account_balance(&account.account_number)
            .await
            .map_err(crate::Error::Bank)?;

        let holding = match self
            .repository
            .find_open(customer_id, SleeveType::Cash, None)
            .await?
        {
            Some(mut existing) => {
                existing.update_cash(balance)?;
                existing.mark_synced();
                existing
            }
            None => Holding::new_cash(customer_id, &account.id, balance),
        };

        self.repository.upsert(holding).await?;
        Ok(())
    }

    async fn refresh_deposit_holdings(&self, customer_id: &str) -> Result<()> {
        let account = self.account_for(customer_id).await?;
        let gateway = self.gateways.for_bank(&account.bank_code).map_err(crate::Error::Bank)?;

        let reported = gateway
            .get_irp_deposit_holdings(&account.account_number)
            .await
            .map_err(crate::Error::Bank)?;

        let codes: Vec<String> = reported.iter().map(|d| d.product_code.clone()).collect();

        for deposit in reported {
            let holding = match self
                .repository
                .find_open(customer_id, SleeveType::Deposit, Some(&deposit.product_code))
                .await?
            {
                Some(mut existing) => {
                    existing.update_deposit(
                        deposit.principal_amount,
                        deposit.interest_rate,
                        deposit.maturity_date,
                    )?;
                    existing.mark_synced();
                    existing
                }
                None => Holding::new_deposit(
                    customer_id,
                    &account.id,
                    &deposit.product_code,
                    &deposit.product_name,
                    deposit.principal_amount,
                    deposit.interest_rate,
                    deposit.maturity_date,
                ),
            };
            self.repository.upsert(holding).await?;
        }

        self.close_missing(customer_id, SleeveType::Deposit, &codes, HoldingStatus::Matured)
            .await
    }

    async fn refresh_fund_holdings(&self, customer_id: &str) -> Result<()> {
        let account = self.account_for(customer_id).await?;
        let gateway = self.gateways.for_bank(&account.bank_code).map_err(crate::Error::Bank)?;

        let reported = gateway
            .get_irp_fund_holdings(&account.account_number)
            .await
            .map_err(crate::Error::Bank)?;

        let codes: Vec<String> = reported.iter().map(|f| f.fund_code.clone()).collect();

        for fund in reported {
            let holding = match self
                .repository
                .find_open(customer_id, SleeveType::Fund, Some(&fund.fund_code))
                .await?
            {
                Some(mut existing) => {
                    existing.units = Some(fund.units);
                    existing.update_valuation(fund.current_nav)?;
                    existing.mark_synced();
                    existing
                }
                None => Holding::new_fund(
                    customer_id,
                    &account.id,
                    &fund.fund_code,
                    &fund.fund_name,
                    fund.units,
                    fund.current_nav,
                    fund.purchase_nav,
                ),
            };
            self.repository.upsert(holding).await?;
        }

        self.close_missing(customer_id, SleeveType::Fund, &codes, HoldingStatus::Sold)
            .await
    }

    async fn refresh_all(&self, customer_id: &str, require_fresh: bool) -> Result<RefreshReport> {
        let mut report = RefreshReport::default();

        for sleeve in [SleeveType::Cash, SleeveType::Deposit, SleeveType::Fund] {
            let outcome = match sleeve {
                SleeveType::Cash => self.refresh_cash_balance(customer_id).await,
                SleeveType::Deposit => self.refresh_deposit_holdings(customer_id).await,
                SleeveType::Fund => self.refresh_fund_holdings(customer_id).await,
            };

            match outcome {
                Ok(()) => report.refreshed.push(sleeve),
                Err(e) => {
                    warn!(
                        "{} refresh failed for customer {}, keeping prior values: {}",
                        sleeve.as_str(),
                        customer_id,
                        e
                    );
                    report.stale.push((sleeve, e.to_string()));
                }
            }
        }

        if require_fresh {
            if let Some((sleeve, reason)) = report.stale.first() {
                return Err(crate::Error::Holding(HoldingError::StaleData(
                    sleeve.as_str().to_string(),
                    reason.clone(),
                )));
            }
        }

        Ok(report)
    }

    async fn list_open_holdings(&self, customer_id: &str) -> Result<Vec<Holding>> {
        self.repository.list_open(customer_id).await
    }

    async fn record_buy_fill(
        &self,
        customer_id: &str,
        account_id: &str,
        fund_code: &str,
        fund_name: &str,
        units: Decimal,
        amount: Decimal,
        nav: Decimal,
    ) -> Result<Holding> {
        match self
            .repository
            .find_open(customer_id, SleeveType::Fund, Some(fund_code))
            .await?
        {
            Some(mut existing) => {
                existing.apply_buy_fill(units, amount, nav)?;
                self.repository.save(existing).await
            }
            None => {
                let mut holding =
                    Holding::new_fund(customer_id, account_id, fund_code, fund_name, units, nav, nav);
                holding.purchase_amount = amount;
                holding.purchase_nav = if units > Decimal::ZERO {
                    Some((amount / units).round_dp(DECIMAL_PRECISION))
                } else {
                    Some(nav)
                };
                holding.recalculate_returns();
                self.repository.upsert(holding).await
            }
        }
    }

    async fn record_sell_fill(
        &self,
        customer_id: &str,
        fund_code: &str,
        units: Decimal,
        nav: Decimal,
    ) -> Result<Holding> {
        let mut holding = self
            .repository
            .find_open(customer_id, SleeveType::Fund, Some(fund_code))
            .await?
            .ok_or_else(|| {
                crate::Error::Holding(HoldingError::NotFound(format!(
                    "No open fund holding {} for customer {}",
                    fund_code, customer_id
                )))
            })?;

        holding.apply_sell_fill(units, nav)?;
        self.repository.save(holding).await
    }
}
