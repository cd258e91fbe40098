use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{errors::ValidationError, Error, Result};

/// Risk profile category derived from the investment questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskProfile {
    Stable,
    Conservative,
    Neutral,
    Growth,
    Aggressive,
}

impl RiskProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskProfile::Stable => "STABLE",
            RiskProfile::Conservative => "CONSERVATIVE",
            RiskProfile::Neutral => "NEUTRAL",
            RiskProfile::Growth => "GROWTH",
            RiskProfile::Aggressive => "AGGRESSIVE",
        }
    }

    pub fn from_str(s: &str) -> Result<Self> {
        match s {
            "STABLE" => Ok(RiskProfile::Stable),
            "CONSERVATIVE" => Ok(RiskProfile::Conservative),
            "NEUTRAL" => Ok(RiskProfile::Neutral),
            "GROWTH" => Ok(RiskProfile::Growth),
            "AGGRESSIVE" => Ok(RiskProfile::Aggressive),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown risk profile: {}",
                other
            )))),
        }
    }
}

/// Domain model for an IRP umbrella account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IrpAccount {
    pub id: String,
    pub customer_id: String,
    pub account_number: String,
    pub bank_code: String,
    pub risk_profile: RiskProfile,
    pub auto_rebalance: bool,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Input model for registering an IRP account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIrpAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub customer_id: String,
    pub account_number: String,
    pub bank_code: String,
    pub risk_profile: RiskProfile,
    pub auto_rebalance: bool,
}

impl NewIrpAccount {
    pub fn validate(&self) -> Result<()> {
        if self.customer_id.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "customerId".to_string(),
            )));
        }
        if self.account_number.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "accountNumber".to_string(),
            )));
        }
        if self.bank_code.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "bankCode".to_string(),
            )));
        }
        Ok(())
    }
}

/// Database model (Diesel)
#[derive(
    Queryable, Identifiable, Insertable, AsChangeset, Selectable, PartialEq, Debug, Clone,
)]
#[diesel(table_name = crate::schema::irp_accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct IrpAccountDB {
    pub id: String,
    pub customer_id: String,
    pub account_number: String,
    pub bank_code: String,
    pub risk_profile: String,
    pub auto_rebalance: i32,
    pub is_active: i32,
    pub created_at: String,
    pub updated_at: String,
}

impl TryFrom<IrpAccountDB> for IrpAccount {
    type Error = Error;

    fn try_from(db: IrpAccountDB) -> Result<Self> {
        Ok(Self {
            id: db.id,
            customer_id: db.customer_id,
            account_number: db.account_number,
            bank_code: db.bank_code,
            risk_profile: RiskProfile::from_str(&db.risk_profile)?,
            auto_rebalance: db.auto_rebalance != 0,
            is_active: db.is_active != 0,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<NewIrpAccount> for IrpAccountDB {
    fn from(domain: NewIrpAccount) -> Self {
        let now = chrono::Utc::now().to_rfc3339();
        Self {
            id: domain.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            customer_id: domain.customer_id,
            account_number: domain.account_number,
            bank_code: domain.bank_code,
            risk_profile: domain.risk_profile.as_str().to_string(),
            auto_rebalance: if domain.auto_rebalance { 1 } else { 0 },
            is_active: 1,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}
