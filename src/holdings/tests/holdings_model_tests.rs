use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::holdings::{Holding, HoldingStatus, SleeveType};

fn fund_holding(units: Decimal, nav: Decimal) -> Holding {
    Holding::new_fund("CUST1", "ACC1", "FND001", "Global Equity", units, nav, nav)
}

#[test]
fn fund_valuation_invariant_holds() {
    let mut holding = fund_holding(dec!(5000), dec!(1000));
    assert_eq!(holding.current_value, dec!(5000000));

    holding.update_valuation(dec!(1100)).unwrap();

    assert_eq!(holding.current_nav, Some(dec!(1100)));
    assert_eq!(holding.current_value, dec!(5500000));
    assert_eq!(holding.total_return, dec!(500000));
    assert_eq!(holding.return_rate, dec!(0.1));
}

#[test]
fn return_rate_is_zero_without_cost_basis() {
    let mut holding = Holding::new_cash("CUST1", "ACC1", dec!(0));
    holding.update_cash(dec!(0)).unwrap();
    assert_eq!(holding.return_rate, Decimal::ZERO);
}

#[test]
fn valuation_update_rejects_wrong_sleeve() {
    let mut cash = Holding::new_cash("CUST1", "ACC1", dec!(1000000));
    assert!(cash.update_valuation(dec!(1000)).is_err());

    let mut fund = fund_holding(dec!(100), dec!(1000));
    assert!(fund.update_cash(dec!(5)).is_err());
    assert!(fund
        .update_deposit(
            dec!(100),
            dec!(3),
            NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
        )
        .is_err());
}

#[test]
fn deposit_update_accrues_value() {
    let mut deposit = Holding::new_deposit(
        "CUST1",
        "ACC1",
        "DEP001",
        "1Y Time Deposit",
        dec!(3000000),
        dec!(3.2),
        NaiveDate::from_ymd_opt(2027, 5, 2).unwrap(),
    );

    deposit
        .update_deposit(
            dec!(3048000),
            dec!(3.2),
            NaiveDate::from_ymd_opt(2027, 5, 2).unwrap(),
        )
        .unwrap();

    assert_eq!(deposit.current_value, dec!(3048000));
    assert_eq!(deposit.total_return, dec!(48000));
    assert_eq!(deposit.return_rate, dec!(0.016));
}

#[test]
fn buy_fill_blends_purchase_nav() {
    let mut holding = fund_holding(dec!(1000), dec!(1000));
    holding
        .apply_buy_fill(dec!(1000), dec!(1200000), dec!(1200))
        .unwrap();

    assert_eq!(holding.units, Some(dec!(2000)));
    assert_eq!(holding.purchase_amount, dec!(2200000));
    assert_eq!(holding.purchase_nav, Some(dec!(1100)));
    assert_eq!(holding.current_value, dec!(2400000));
    assert_eq!(holding.status, HoldingStatus::Active);
}

#[test]
fn partial_sell_relieves_cost_pro_rata() {
    let mut holding = fund_holding(dec!(2000), dec!(1000));
    holding.apply_sell_fill(dec!(500), dec!(1000)).unwrap();

    assert_eq!(holding.units, Some(dec!(1500)));
    // 25% of units sold relieves 25% of the 2,000,000 cost basis
    assert_eq!(holding.purchase_amount, dec!(1500000));
    assert_eq!(holding.status, HoldingStatus::PartialSold);
    assert_eq!(holding.current_value, dec!(1500000));
}

#[test]
fn full_sell_soft_deletes_to_sold() {
    let mut holding = fund_holding(dec!(800), dec!(1250));
    holding.apply_sell_fill(dec!(800), dec!(1250)).unwrap();

    assert_eq!(holding.status, HoldingStatus::Sold);
    assert_eq!(holding.units, Some(Decimal::ZERO));
    assert_eq!(holding.current_value, Decimal::ZERO);
    assert!(!holding.status.is_open());
}

#[test]
fn sell_beyond_held_units_is_rejected() {
    let mut holding = fund_holding(dec!(100), dec!(1000));
    assert!(holding.apply_sell_fill(dec!(101), dec!(1000)).is_err());
}

#[test]
fn sleeve_and_status_round_trip_through_strings() {
    for sleeve in [SleeveType::Cash, SleeveType::Deposit, SleeveType::Fund] {
        assert_eq!(SleeveType::parse(sleeve.as_str()).unwrap(), sleeve);
    }
    for status in [
        HoldingStatus::Active,
        HoldingStatus::Matured,
        HoldingStatus::Sold,
        HoldingStatus::PartialSold,
    ] {
        assert_eq!(HoldingStatus::parse(status.as_str()).unwrap(), status);
    }
    assert!(SleeveType::parse("BOND").is_err());
}

#[test]
fn db_round_trip_preserves_holding() {
    use crate::holdings::HoldingDB;

    let holding = fund_holding(dec!(123.4567), dec!(1050.25));
    let db: HoldingDB = holding.clone().into();
    let restored: Holding = db.try_into().unwrap();

    assert_eq!(restored.sleeve, holding.sleeve);
    assert_eq!(restored.units, holding.units);
    assert_eq!(restored.current_value, holding.current_value);
    assert_eq!(restored.status, holding.status);
}
