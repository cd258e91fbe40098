use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::allocation::{AllocationDecision, TargetAllocation};
use crate::portfolio::build_snapshot;
use crate::rebalancing::{
    JobStatus, JobType, OrderType, RebalancingJob, RebalancingOrder, TriggerType,
};

fn simulation_job() -> RebalancingJob {
    let snapshot = build_snapshot(&[], Utc::now());
    let decision =
        AllocationDecision::manual(TargetAllocation::new(dec!(10), dec!(30), dec!(60)));
    RebalancingJob::new_simulation(
        "CUST1",
        "110-123-456789",
        TriggerType::Manual,
        snapshot,
        decision,
        serde_json::Value::Null,
        Decimal::ZERO,
    )
}

fn pending_order(job_id: &str) -> RebalancingOrder {
    RebalancingOrder::new(
        job_id,
        OrderType::Buy,
        "FND001",
        "Global Equity",
        None,
        dec!(1000),
        dec!(1000),
        dec!(1000000),
        dec!(1500),
        Some("BASIS_POINTS".to_string()),
        "MANUAL trigger".to_string(),
    )
}

#[test]
fn pending_simulation_can_be_approved_once() {
    let mut job = simulation_job();
    assert!(job.can_be_approved());

    job.approve().unwrap();
    assert_eq!(job.job_type, JobType::Execution);
    assert_eq!(job.status, JobStatus::Approved);
    assert!(job.approved_at.is_some());

    // Second approval is a conflict, not a no-op that mutates.
    assert!(!job.can_be_approved());
    assert!(job.approve().is_err());
}

#[test]
fn execution_requires_approval_first() {
    let mut job = simulation_job();
    // Still a pending simulation
    assert!(!job.can_be_executed());
    assert!(job.start_execution().is_err());

    job.approve().unwrap();
    assert!(job.can_be_executed());
    job.start_execution().unwrap();
    assert_eq!(job.status, JobStatus::Executing);
    assert!(job.executed_at.is_some());
}

#[test]
fn full_lifecycle_reaches_completed() {
    let mut job = simulation_job();
    job.approve().unwrap();
    job.start_execution().unwrap();
    job.complete().unwrap();

    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.status.is_terminal());
    assert!(job.completed_at.is_some());

    // Terminal states are immutable.
    assert!(job.fail("late failure").is_err());
    assert!(job.cancel("too late").is_err());
}

#[test]
fn cancel_is_rejected_once_executing() {
    let mut job = simulation_job();
    job.cancel("customer asked").unwrap();
    assert_eq!(job.status, JobStatus::Cancelled);
    assert_eq!(job.cancel_reason.as_deref(), Some("customer asked"));

    let mut executing = simulation_job();
    executing.approve().unwrap();
    executing.start_execution().unwrap();
    assert!(executing.cancel("mid-flight").is_err());
}

#[test]
fn failure_keeps_reason() {
    let mut job = simulation_job();
    job.approve().unwrap();
    job.start_execution().unwrap();
    job.fail("2 order(s) failed").unwrap();

    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(job.failure_reason.as_deref(), Some("2 order(s) failed"));
}

#[test]
fn order_fill_flow_and_rate_bounds() {
    let mut order = pending_order("JOB1");

    // Cannot fill before submission
    assert!(order.fill(dec!(1000), dec!(1000), dec!(1000000)).is_err());

    order.submit("BNK-001").unwrap();
    assert_eq!(order.bank_order_id.as_deref(), Some("BNK-001"));

    order.fill(dec!(1000), dec!(1000), dec!(1000000)).unwrap();
    assert_eq!(order.fill_rate(), dec!(1));
    assert!(order.filled_at.is_some());
}

#[test]
fn partial_fill_rate_stays_within_bounds() {
    let mut order = pending_order("JOB1");
    order.submit("BNK-002").unwrap();
    order
        .partial_fill(dec!(1000), dec!(400), dec!(400000))
        .unwrap();

    let rate = order.fill_rate();
    assert!(rate >= Decimal::ZERO && rate <= Decimal::ONE);
    assert_eq!(rate, dec!(0.4));
}

#[test]
fn overfill_is_rejected() {
    let mut order = pending_order("JOB1");
    order.submit("BNK-003").unwrap();

    // filled_amount must never exceed order_amount
    assert!(order.fill(dec!(1000), dec!(1100), dec!(1100000)).is_err());
}

#[test]
fn double_submit_is_rejected() {
    let mut order = pending_order("JOB1");
    order.submit("BNK-004").unwrap();
    assert!(order.submit("BNK-005").is_err());
}
