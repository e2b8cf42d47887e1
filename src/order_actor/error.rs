use thiserror::Error;

use crate::domain::OrderStatus;
use crate::rider_actor::RiderError;

/// Errors that can occur during order operations.
///
/// All of these are local validation failures: the operation is rejected and
/// the order is left unchanged.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("order not found: {0}")]
    NotFound(String),
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
    #[error("rider already assigned to order {0}")]
    AlreadyAssigned(String),
    #[error("no rider available")]
    NoAvailableRider,
    #[error("rider {id} is not available (status: {status})")]
    RiderNotAvailable { id: String, status: String },
    #[error("order {0} has not been delivered")]
    OrderNotDelivered(String),
    #[error("complaint already exists for order {0}")]
    ComplaintAlreadyExists(String),
    #[error("no complaint on order {0}")]
    ComplaintNotFound(String),
    #[error("complaint on order {0} is already resolved")]
    ComplaintAlreadyResolved(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(u64),
    #[error("order validation error: {0}")]
    ValidationError(String),
    #[error("actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<crate::actor_framework::ActorError<OrderError>> for OrderError {
    fn from(e: crate::actor_framework::ActorError<OrderError>) -> Self {
        match e {
            crate::actor_framework::ActorError::Domain(e) => e,
            crate::actor_framework::ActorError::Unavailable(msg) => {
                OrderError::ActorCommunicationError(msg.to_string())
            }
        }
    }
}

/// Rider-side failures surfaced through the assignment workflow.
impl From<RiderError> for OrderError {
    fn from(e: RiderError) -> Self {
        match e {
            RiderError::NoAvailableRider => OrderError::NoAvailableRider,
            RiderError::NotAvailable { id, status } => {
                OrderError::RiderNotAvailable { id, status }
            }
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
