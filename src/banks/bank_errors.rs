use thiserror::Error;

#[derive(Error, Debug)]
pub enum BankError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Gateway timed out")]
    Timeout,

    #[error("Order submission outcome unknown; reconcile before retrying: {0}")]
    AmbiguousOutcome(String),

    #[error("Bank rejected the request: {0}")]
    Rejected(String),

    #[error("Invalid gateway response: {0}")]
    InvalidResponse(String),

    #[error("No gateway registered for bank '{0}'")]
    UnknownBank(String),
}
