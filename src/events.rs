use serde::Serialize;
use tokio::sync::broadcast;
use tracing::debug;

use crate::domain::{ComplaintStatus, OrderStatus, RiderAssignment};

/// Outbound notifications for real-time consumers (seller dashboard, rider
/// app, admin panel). Fire-and-forget: publishing never blocks a mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    OrderPlaced {
        order_id: String,
        restaurant_id: String,
    },
    OrderStatusChanged {
        order_id: String,
        status: OrderStatus,
    },
    RiderAssigned {
        order_id: String,
        assignment: RiderAssignment,
    },
    PaymentCompleted {
        order_id: String,
    },
    ComplaintSubmitted {
        order_id: String,
        complaint_id: String,
    },
    ComplaintResolved {
        order_id: String,
        status: ComplaintStatus,
        replacement_order_id: Option<String>,
    },
    SettlementFinalized {
        settlement_id: String,
        restaurant_id: String,
        total_due: u64,
    },
}

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DomainEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DomainEvent> {
        self.sender.subscribe()
    }

    /// Dropped silently when nobody is subscribed.
    pub fn publish(&self, event: DomainEvent) {
        debug!(?event, "publishing domain event");
        let _ = self.sender.send(event);
    }
}
