use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::WEIGHT_PRECISION;
use crate::holdings::{Holding, SleeveType};

use super::snapshot_model::{HoldingDetail, PortfolioSnapshot, SleeveAllocation};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Builds a snapshot from open holdings. Pure: the timestamp is injected so
/// identical inputs produce identical snapshots.
pub fn build_snapshot(holdings: &[Holding], generated_at: DateTime<Utc>) -> PortfolioSnapshot {
    let mut totals = [Decimal::ZERO; 3];
    let mut items = Vec::with_capacity(holdings.len());

    for holding in holdings.iter().filter(|h| h.status.is_open()) {
        let idx = match holding.sleeve {
            SleeveType::Cash => 0,
            SleeveType::Deposit => 1,
            SleeveType::Fund => 2,
        };
        totals[idx] += holding.current_value;
        items.push(HoldingDetail {
            sleeve: holding.sleeve,
            instrument_code: holding.instrument_code.clone(),
            instrument_name: holding.instrument_name.clone(),
            current_value: holding.current_value,
            return_rate: holding.return_rate,
        });
    }

    let total_value: Decimal = totals.iter().copied().sum();

    let allocation = |amount: Decimal| SleeveAllocation {
        amount,
        weight: weight_of(amount, total_value),
    };

    PortfolioSnapshot {
        total_value,
        cash: allocation(totals[0]),
        deposit: allocation(totals[1]),
        fund: allocation(totals[2]),
        items,
        generated_at,
    }
}

/// weight% = amount / total * 100, half-up at 4 decimal places; 0 when the
/// portfolio is empty.
fn weight_of(amount: Decimal, total_value: Decimal) -> Decimal {
    if total_value.is_zero() {
        return Decimal::ZERO;
    }
    (amount / total_value * HUNDRED)
        .round_dp_with_strategy(WEIGHT_PRECISION, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn dt() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 2, 9, 0, 0).unwrap()
    }

    fn cash(amount: Decimal) -> Holding {
        Holding::new_cash("CUST1", "ACC1", amount)
    }

    fn deposit(amount: Decimal) -> Holding {
        Holding::new_deposit(
            "CUST1",
            "ACC1",
            "DEP001",
            "1Y Time Deposit",
            amount,
            dec!(3.2),
            chrono::NaiveDate::from_ymd_opt(2027, 5, 2).unwrap(),
        )
    }

    fn fund(units: Decimal, nav: Decimal) -> Holding {
        Holding::new_fund("CUST1", "ACC1", "FND001", "Global Equity", units, nav, nav)
    }

    #[test]
    fn weights_sum_to_hundred() {
        let holdings = vec![
            cash(dec!(2000000)),
            deposit(dec!(3000000)),
            fund(dec!(5000), dec!(1000)),
        ];
        let snapshot = build_snapshot(&holdings, dt());

        assert_eq!(snapshot.total_value, dec!(10000000));
        assert_eq!(snapshot.cash.weight, dec!(20));
        assert_eq!(snapshot.deposit.weight, dec!(30));
        assert_eq!(snapshot.fund.weight, dec!(50));

        let sum = snapshot.cash.weight + snapshot.deposit.weight + snapshot.fund.weight;
        assert!((sum - dec!(100)).abs() <= dec!(0.01));
    }

    #[test]
    fn empty_portfolio_has_zero_weights() {
        let snapshot = build_snapshot(&[], dt());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.cash.weight, Decimal::ZERO);
        assert_eq!(snapshot.deposit.weight, Decimal::ZERO);
        assert_eq!(snapshot.fund.weight, Decimal::ZERO);
    }

    #[test]
    fn uneven_amounts_round_half_up() {
        let holdings = vec![cash(dec!(1)), deposit(dec!(1)), fund(dec!(1), dec!(1))];
        let snapshot = build_snapshot(&holdings, dt());

        // 1/3 = 33.3333...% rounds to 33.3333 at 4dp
        assert_eq!(snapshot.cash.weight, dec!(33.3333));
        let sum = snapshot.cash.weight + snapshot.deposit.weight + snapshot.fund.weight;
        assert!((sum - dec!(100)).abs() <= dec!(0.01));
    }

    #[test]
    fn identical_inputs_build_identical_snapshots() {
        let holdings = vec![cash(dec!(500000)), fund(dec!(300), dec!(1250.5))];
        let a = build_snapshot(&holdings, dt());
        let b = build_snapshot(&holdings, dt());
        assert_eq!(a, b);
    }

    #[test]
    fn closed_holdings_are_excluded() {
        let mut sold = fund(dec!(100), dec!(1000));
        sold.status = crate::holdings::HoldingStatus::Sold;
        sold.current_value = Decimal::ZERO;

        let holdings = vec![cash(dec!(1000000)), sold];
        let snapshot = build_snapshot(&holdings, dt());

        assert_eq!(snapshot.total_value, dec!(1000000));
        assert_eq!(snapshot.cash.weight, dec!(100));
        assert_eq!(snapshot.items.len(), 1);
    }
}
