use diesel::result::Error as DieselError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RebalancingError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Job not found: {0}")]
    JobNotFound(String),

    #[error("Job {job_id} cannot {action} from status {status}")]
    InvalidTransition {
        job_id: String,
        status: String,
        action: &'static str,
    },

    #[error("Order {order_id} failed: {reason}")]
    OrderFailed { order_id: String, reason: String },

    #[error("Invalid order state: {0}")]
    InvalidOrderState(String),
}

impl From<DieselError> for RebalancingError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RebalancingError::JobNotFound("Record not found".to_string()),
            _ => RebalancingError::DatabaseError(err.to_string()),
        }
    }
}
