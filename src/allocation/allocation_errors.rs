use thiserror::Error;

#[derive(Debug, Error)]
pub enum AllocationError {
    #[error("Invalid target vector: {0}")]
    InvalidVector(String),

    #[error("Peer recommendation unavailable: {0}")]
    PeerUnavailable(String),
}
