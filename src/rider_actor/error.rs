use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RiderError {
    #[error("rider not found: {0}")]
    NotFound(String),
    #[error("rider {id} is not available (status: {status})")]
    NotAvailable { id: String, status: String },
    #[error("no rider available")]
    NoAvailableRider,
    #[error("rider {0} has no active delivery")]
    NotAssigned(String),
    #[error("rider {id} is on an active delivery ({order_id})")]
    CurrentlyAssigned { id: String, order_id: String },
    #[error("actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<crate::actor_framework::ActorError<RiderError>> for RiderError {
    fn from(e: crate::actor_framework::ActorError<RiderError>) -> Self {
        match e {
            crate::actor_framework::ActorError::Domain(e) => e,
            crate::actor_framework::ActorError::Unavailable(msg) => {
                RiderError::ActorCommunicationError(msg.to_string())
            }
        }
    }
}
