use crate::domain::{
    ComplaintCategory, ComplaintDecision, ComplaintStatus, OrderCreate, OrderStatus,
    RiderAssignment,
};

/// Custom actions for Order entities.
///
/// Every mutation after creation goes through one of these, so the transition
/// table is enforced in a single place.
#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Seller accepts: `pending -> confirmed`.
    Accept,
    /// Seller rejects: `pending -> cancelled` (the only cancellation edge).
    Reject,
    /// Optional kitchen step: `confirmed -> preparing`.
    MarkPreparing,
    /// Sets the write-once rider association and advances to `rider_assigned`.
    AssignRider(RiderAssignment),
    MarkOutForDelivery,
    /// Informational, for rider-facing surfaces.
    MarkArrived,
    /// Sets `payment_completed` and `delivered` in one atomic step.
    VerifyPayment,
    /// Customer files a post-delivery dispute.
    SubmitComplaint {
        category: ComplaintCategory,
        description: String,
        evidence: Vec<String>,
    },
    /// Seller/admin decides the pending complaint, one way, exactly once.
    ResolveComplaint { decision: ComplaintDecision },
    /// Admin attaches a monetary penalty to the complaint.
    ApplyPenalty { amount: u64 },
}

/// Results from OrderActions.
#[derive(Debug, Clone)]
pub enum OrderActionResult {
    StatusChanged(OrderStatus),
    RiderAssigned { assignment: RiderAssignment },
    /// Order is delivered and paid; carries the assignment so the caller can
    /// release an own-fleet rider in the same workflow.
    PaymentVerified { rider: Option<RiderAssignment> },
    ComplaintFiled { complaint_id: String },
    /// On `Replaced`, carries the zero-priced remake payload for the caller to
    /// create as a brand-new order linked to this one.
    ComplaintResolved {
        status: ComplaintStatus,
        replacement: Option<OrderCreate>,
    },
    PenaltyApplied { amount: u64 },
}
