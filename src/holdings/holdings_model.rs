use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::constants::{DECIMAL_PRECISION, UNIT_PRECISION};
use crate::utils::decimal_serde::{decimal_serde, decimal_serde_option};
use crate::{errors::ValidationError, Error, Result};

pub const UNIT_THRESHOLD: &str = "0.0001";

/// True when a unit count is large enough to keep a fund position open.
pub fn is_units_significant(units: &Decimal) -> bool {
    let threshold = Decimal::from_str(UNIT_THRESHOLD).unwrap_or_else(|_| Decimal::new(1, 4));
    units.abs() >= threshold
}

/// Portfolio bucket a holding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SleeveType {
    Cash,
    Deposit,
    Fund,
}

impl SleeveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleeveType::Cash => "CASH",
            SleeveType::Deposit => "DEPOSIT",
            SleeveType::Fund => "FUND",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            SleeveType::Cash => "Uninvested cash balance",
            SleeveType::Deposit => "Time deposit principal",
            SleeveType::Fund => "Investment fund position",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "CASH" => Ok(SleeveType::Cash),
            "DEPOSIT" => Ok(SleeveType::Deposit),
            "FUND" => Ok(SleeveType::Fund),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown sleeve type: {}",
                other
            )))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldingStatus {
    Active,
    Matured,
    Sold,
    PartialSold,
}

impl HoldingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            HoldingStatus::Active => "ACTIVE",
            HoldingStatus::Matured => "MATURED",
            HoldingStatus::Sold => "SOLD",
            HoldingStatus::PartialSold => "PARTIAL_SOLD",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "ACTIVE" => Ok(HoldingStatus::Active),
            "MATURED" => Ok(HoldingStatus::Matured),
            "SOLD" => Ok(HoldingStatus::Sold),
            "PARTIAL_SOLD" => Ok(HoldingStatus::PartialSold),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown holding status: {}",
                other
            )))),
        }
    }

    /// Open holdings still carry value and participate in snapshots.
    pub fn is_open(&self) -> bool {
        matches!(self, HoldingStatus::Active | HoldingStatus::PartialSold)
    }
}

/// One position: (customer, sleeve, instrument). Cash has no instrument code
/// and is therefore a singleton per customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub customer_id: String,
    pub account_id: String,
    pub sleeve: SleeveType,
    pub instrument_code: Option<String>,
    pub instrument_name: Option<String>,
    #[serde(with = "decimal_serde_option")]
    pub units: Option<Decimal>,
    #[serde(with = "decimal_serde")]
    pub purchase_amount: Decimal,
    #[serde(with = "decimal_serde")]
    pub current_value: Decimal,
    #[serde(with = "decimal_serde_option")]
    pub current_nav: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub purchase_nav: Option<Decimal>,
    #[serde(with = "decimal_serde_option")]
    pub interest_rate: Option<Decimal>,
    pub maturity_date: Option<NaiveDate>,
    #[serde(with = "decimal_serde")]
    pub total_return: Decimal,
    #[serde(with = "decimal_serde")]
    pub return_rate: Decimal,
    pub status: HoldingStatus,
    pub synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Holding {
    pub fn new_cash(customer_id: &str, account_id: &str, amount: Decimal) -> Self {
        let now = Utc::now();
        Holding {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            account_id: account_id.to_string(),
            sleeve: SleeveType::Cash,
            instrument_code: None,
            instrument_name: Some("IRP cash".to_string()),
            units: None,
            purchase_amount: amount,
            current_value: amount,
            current_nav: None,
            purchase_nav: None,
            interest_rate: None,
            maturity_date: None,
            total_return: Decimal::ZERO,
            return_rate: Decimal::ZERO,
            status: HoldingStatus::Active,
            synced_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_deposit(
        customer_id: &str,
        account_id: &str,
        product_code: &str,
        product_name: &str,
        principal: Decimal,
        rate: Decimal,
        maturity: NaiveDate,
    ) -> Self {
        let now = Utc::now();
        Holding {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            account_id: account_id.to_string(),
            sleeve: SleeveType::Deposit,
            instrument_code: Some(product_code.to_string()),
            instrument_name: Some(product_name.to_string()),
            units: None,
            purchase_amount: principal,
            current_value: principal,
            current_nav: None,
            purchase_nav: None,
            interest_rate: Some(rate),
            maturity_date: Some(maturity),
            total_return: Decimal::ZERO,
            return_rate: Decimal::ZERO,
            status: HoldingStatus::Active,
            synced_at: now,
            created_at: now,
            updated_at: now,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn new_fund(
        customer_id: &str,
        account_id: &str,
        fund_code: &str,
        fund_name: &str,
        units: Decimal,
        current_nav: Decimal,
        purchase_nav: Decimal,
    ) -> Self {
        let now = Utc::now();
        let purchase_amount = (units * purchase_nav).round_dp(DECIMAL_PRECISION);
        let mut holding = Holding {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.to_string(),
            account_id: account_id.to_string(),
            sleeve: SleeveType::Fund,
            instrument_code: Some(fund_code.to_string()),
            instrument_name: Some(fund_name.to_string()),
            units: Some(units),
            purchase_amount,
            current_value: (units * current_nav).round_dp(DECIMAL_PRECISION),
            current_nav: Some(current_nav),
            purchase_nav: Some(purchase_nav),
            interest_rate: None,
            maturity_date: None,
            total_return: Decimal::ZERO,
            return_rate: Decimal::ZERO,
            status: HoldingStatus::Active,
            synced_at: now,
            created_at: now,
            updated_at: now,
        };
        holding.recalculate_returns();
        holding
    }

    /// total_return = current_value - purchase_amount;
    /// return_rate = total_return / purchase_amount when purchase_amount > 0.
    pub fn recalculate_returns(&mut self) {
        self.total_return = (self.current_value - self.purchase_amount).round_dp(DECIMAL_PRECISION);
        self.return_rate = if self.purchase_amount > Decimal::ZERO {
            (self.total_return / self.purchase_amount).round_dp(DECIMAL_PRECISION)
        } else {
            Decimal::ZERO
        };
    }

    /// Applies a fresh NAV to a fund holding.
    pub fn update_valuation(&mut self, nav: Decimal) -> Result<()> {
        if self.sleeve != SleeveType::Fund {
            return Err(Error::Holding(super::HoldingError::InvalidState(format!(
                "update_valuation on {} holding {}",
                self.sleeve.as_str(),
                self.id
            ))));
        }
        let units = self.units.unwrap_or(Decimal::ZERO);
        self.current_nav = Some(nav);
        self.current_value = (units * nav).round_dp(DECIMAL_PRECISION);
        self.recalculate_returns();
        self.touch();
        Ok(())
    }

    /// Applies a fresh accrued amount to a deposit holding.
    pub fn update_deposit(&mut self, amount: Decimal, rate: Decimal, maturity: NaiveDate) -> Result<()> {
        if self.sleeve != SleeveType::Deposit {
            return Err(Error::Holding(super::HoldingError::InvalidState(format!(
                "update_deposit on {} holding {}",
                self.sleeve.as_str(),
                self.id
            ))));
        }
        self.current_value = amount;
        self.interest_rate = Some(rate);
        self.maturity_date = Some(maturity);
        self.recalculate_returns();
        self.touch();
        Ok(())
    }

    /// Applies a fresh cash balance. Cash carries no return.
    pub fn update_cash(&mut self, amount: Decimal) -> Result<()> {
        if self.sleeve != SleeveType::Cash {
            return Err(Error::Holding(super::HoldingError::InvalidState(format!(
                "update_cash on {} holding {}",
                self.sleeve.as_str(),
                self.id
            ))));
        }
        self.purchase_amount = amount;
        self.current_value = amount;
        self.total_return = Decimal::ZERO;
        self.return_rate = Decimal::ZERO;
        self.touch();
        Ok(())
    }

    /// Adds a buy fill to a fund holding.
    pub fn apply_buy_fill(&mut self, units: Decimal, amount: Decimal, nav: Decimal) -> Result<()> {
        if self.sleeve != SleeveType::Fund {
            return Err(Error::Holding(super::HoldingError::InvalidState(format!(
                "apply_buy_fill on {} holding {}",
                self.sleeve.as_str(),
                self.id
            ))));
        }
        let new_units = (self.units.unwrap_or(Decimal::ZERO) + units).round_dp(UNIT_PRECISION);
        self.units = Some(new_units);
        self.purchase_amount = (self.purchase_amount + amount).round_dp(DECIMAL_PRECISION);
        self.purchase_nav = if new_units > Decimal::ZERO {
            Some((self.purchase_amount / new_units).round_dp(DECIMAL_PRECISION))
        } else {
            self.purchase_nav
        };
        self.current_nav = Some(nav);
        self.current_value = (new_units * nav).round_dp(DECIMAL_PRECISION);
        self.status = HoldingStatus::Active;
        self.recalculate_returns();
        self.touch();
        Ok(())
    }

    /// Removes a sell fill from a fund holding. Cost is relieved pro-rata;
    /// full liquidation flips the status to SOLD.
    pub fn apply_sell_fill(&mut self, units: Decimal, nav: Decimal) -> Result<()> {
        if self.sleeve != SleeveType::Fund {
            return Err(Error::Holding(super::HoldingError::InvalidState(format!(
                "apply_sell_fill on {} holding {}",
                self.sleeve.as_str(),
                self.id
            ))));
        }
        let held = self.units.unwrap_or(Decimal::ZERO);
        if units > held {
            return Err(Error::Holding(super::HoldingError::InvalidState(format!(
                "sell of {} units exceeds held {} for holding {}",
                units, held, self.id
            ))));
        }

        let remaining = (held - units).round_dp(UNIT_PRECISION);
        if held > Decimal::ZERO {
            let relieved = (self.purchase_amount * units / held).round_dp(DECIMAL_PRECISION);
            self.purchase_amount = (self.purchase_amount - relieved).round_dp(DECIMAL_PRECISION);
        }

        if !is_units_significant(&remaining) {
            self.units = Some(Decimal::ZERO);
            self.purchase_amount = Decimal::ZERO;
            self.current_value = Decimal::ZERO;
            self.status = HoldingStatus::Sold;
        } else {
            self.units = Some(remaining);
            self.current_nav = Some(nav);
            self.current_value = (remaining * nav).round_dp(DECIMAL_PRECISION);
            self.status = HoldingStatus::PartialSold;
        }
        self.recalculate_returns();
        self.touch();
        Ok(())
    }

    pub fn mark_synced(&mut self) {
        self.synced_at = Utc::now();
        self.updated_at = self.synced_at;
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Per-sleeve outcome of a valuation refresh cycle. A stale sleeve kept its
/// prior values after a gateway failure.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshReport {
    pub refreshed: Vec<SleeveType>,
    pub stale: Vec<(SleeveType, String)>,
}

impl RefreshReport {
    pub fn is_fully_fresh(&self) -> bool {
        self.stale.is_empty()
    }
}

// ============================================================================
// Database model (Diesel)
// ============================================================================

#[derive(Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HoldingDB {
    pub id: String,
    pub customer_id: String,
    pub account_id: String,
    pub sleeve: String,
    pub instrument_code: Option<String>,
    pub instrument_name: Option<String>,
    pub units: Option<String>,
    pub purchase_amount: String,
    pub current_value: String,
    pub current_nav: Option<String>,
    pub purchase_nav: Option<String>,
    pub interest_rate: Option<String>,
    pub maturity_date: Option<String>,
    pub total_return: String,
    pub return_rate: String,
    pub status: String,
    pub synced_at: String,
    pub created_at: String,
    pub updated_at: String,
}

fn decimal_opt(value: &Option<String>) -> Option<Decimal> {
    value
        .as_deref()
        .and_then(|s| Decimal::from_str(s).ok())
}

fn datetime_or_now(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

impl From<Holding> for HoldingDB {
    fn from(value: Holding) -> Self {
        HoldingDB {
            id: value.id,
            customer_id: value.customer_id,
            account_id: value.account_id,
            sleeve: value.sleeve.as_str().to_string(),
            instrument_code: value.instrument_code,
            instrument_name: value.instrument_name,
            units: value.units.map(|d| d.round_dp(UNIT_PRECISION).to_string()),
            purchase_amount: value.purchase_amount.round_dp(DECIMAL_PRECISION).to_string(),
            current_value: value.current_value.round_dp(DECIMAL_PRECISION).to_string(),
            current_nav: value.current_nav.map(|d| d.to_string()),
            purchase_nav: value.purchase_nav.map(|d| d.to_string()),
            interest_rate: value.interest_rate.map(|d| d.to_string()),
            maturity_date: value.maturity_date.map(|d| d.to_string()),
            total_return: value.total_return.round_dp(DECIMAL_PRECISION).to_string(),
            return_rate: value.return_rate.round_dp(DECIMAL_PRECISION).to_string(),
            status: value.status.as_str().to_string(),
            synced_at: value.synced_at.to_rfc3339(),
            created_at: value.created_at.to_rfc3339(),
            updated_at: value.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<HoldingDB> for Holding {
    type Error = Error;

    fn try_from(value: HoldingDB) -> Result<Self> {
        Ok(Holding {
            sleeve: SleeveType::parse(&value.sleeve)?,
            status: HoldingStatus::parse(&value.status)?,
            id: value.id,
            customer_id: value.customer_id,
            account_id: value.account_id,
            instrument_code: value.instrument_code,
            instrument_name: value.instrument_name,
            units: decimal_opt(&value.units),
            purchase_amount: Decimal::from_str(&value.purchase_amount).unwrap_or_default(),
            current_value: Decimal::from_str(&value.current_value).unwrap_or_default(),
            current_nav: decimal_opt(&value.current_nav),
            purchase_nav: decimal_opt(&value.purchase_nav),
            interest_rate: decimal_opt(&value.interest_rate),
            maturity_date: value
                .maturity_date
                .as_deref()
                .and_then(|s| NaiveDate::from_str(s).ok()),
            total_return: Decimal::from_str(&value.total_return).unwrap_or_default(),
            return_rate: Decimal::from_str(&value.return_rate).unwrap_or_default(),
            synced_at: datetime_or_now(&value.synced_at),
            created_at: datetime_or_now(&value.created_at),
            updated_at: datetime_or_now(&value.updated_at),
        })
    }
}
