use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum SettlementError {
    #[error("settlement not found: {0}")]
    NotFound(String),
    #[error("settlement {0} is already paid")]
    AlreadyPaid(String),
    #[error("order projection failed: {0}")]
    Projection(String),
    #[error("actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<crate::actor_framework::ActorError<SettlementError>> for SettlementError {
    fn from(e: crate::actor_framework::ActorError<SettlementError>) -> Self {
        match e {
            crate::actor_framework::ActorError::Domain(e) => e,
            crate::actor_framework::ActorError::Unavailable(msg) => {
                SettlementError::ActorCommunicationError(msg.to_string())
            }
        }
    }
}
