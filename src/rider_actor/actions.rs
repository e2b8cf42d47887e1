use crate::domain::Rider;

/// Custom actions for Rider entities.
#[derive(Debug, Clone)]
pub enum RiderAction {
    /// Claims an available rider for an order: `available -> busy`, with the
    /// order id recorded as the weak back-reference.
    Reserve { order_id: String },
    /// Compensation path when the order-side assignment fails after a reserve.
    Release,
    /// Delivery done: back to `available`, back-reference cleared, stats bumped.
    CompleteDelivery,
    /// Shift toggling. Refused while on an active delivery.
    SetAvailability { available: bool },
}

/// Results from RiderActions - variants match 1:1 with RiderAction.
#[derive(Debug, Clone)]
pub enum RiderActionResult {
    /// Snapshot of the rider at reservation time, for the order's assignment.
    Reserved(Rider),
    Released,
    DeliveryCompleted { total_deliveries: u32 },
    AvailabilityChanged,
}
