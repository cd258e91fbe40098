/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for sleeve weights (percent)
pub const WEIGHT_PRECISION: u32 = 4;

/// Decimal precision for fund units
pub const UNIT_PRECISION: u32 = 4;

/// Tolerance when checking that a weight vector sums to 100%
pub const WEIGHT_SUM_TOLERANCE: &str = "0.01";

/// Default drift thresholds per sleeve, in percentage points
pub const FUND_DRIFT_THRESHOLD: &str = "5";
pub const DEPOSIT_DRIFT_THRESHOLD: &str = "3";
pub const CASH_DRIFT_THRESHOLD: &str = "2";

/// Days a customer is skipped by the threshold trigger after any job
pub const REBALANCE_COOLDOWN_DAYS: i64 = 7;

/// Orders below this notional are dropped from a plan
pub const MIN_ORDER_AMOUNT: &str = "10000";

/// Default fee policy: basis points on notional, with a floor
pub const DEFAULT_FEE_BPS: &str = "15";
pub const DEFAULT_FEE_MINIMUM: &str = "1000";

/// Timeout for bank gateway calls, in seconds
pub const BANK_GATEWAY_TIMEOUT_SECS: u64 = 10;
