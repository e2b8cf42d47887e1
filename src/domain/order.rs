use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of an order across customer, seller and rider surfaces.
///
/// Transitions are strictly forward along [`OrderStatus::allows`]; the only
/// escape is `pending -> cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    RiderAssigned,
    OutForDelivery,
    Arrived,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The transition table. Everything not listed here is an invalid edge.
    pub fn allows(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Preparing)
                | (Confirmed, RiderAssigned)
                | (Preparing, RiderAssigned)
                | (RiderAssigned, OutForDelivery)
                | (OutForDelivery, Arrived)
                | (OutForDelivery, Delivered)
                | (Arrived, Delivered)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::RiderAssigned => "rider_assigned",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Arrived => "arrived",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

/// One line of an order. Prices are whole rupees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub item_id: String,
    pub name: String,
    pub price: u64,
    pub quantity: u32,
    pub is_veg: bool,
}

/// How an order gets delivered once a rider is chosen. Write-once per order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiderAssignment {
    /// A rider from the seller's own fleet; no marginal delivery cost.
    #[serde(rename = "own")]
    OwnFleet {
        rider_id: String,
        name: String,
        phone: String,
    },
    /// Third-party fulfilment at a fixed per-delivery cost.
    #[serde(rename = "api")]
    ApiPartner { partner: String },
}

impl RiderAssignment {
    pub fn is_api_partner(&self) -> bool {
        matches!(self, RiderAssignment::ApiPartner { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintCategory {
    BadFood,
    MissingItem,
    LateDelivery,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintStatus {
    Pending,
    Replaced,
    Rejected,
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ComplaintStatus::Pending => "pending",
            ComplaintStatus::Replaced => "replaced",
            ComplaintStatus::Rejected => "rejected",
        };
        f.write_str(s)
    }
}

/// Post-delivery dispute, attached 1:1 to its order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complaint {
    pub id: String,
    pub category: ComplaintCategory,
    pub description: String,
    pub evidence: Vec<String>,
    pub status: ComplaintStatus,
    /// Admin-imposed deduction, collected through the seller's next settlement.
    pub penalty: Option<u64>,
    pub created_at: DateTime<Utc>,
}

/// The decision a seller or admin takes on a pending complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplaintDecision {
    /// Free remake: a new zero-priced order with the same items. Never a refund.
    Replaced,
    Rejected,
}

/// The central entity. Created `pending` by checkout; mutated only through
/// the order actor's actions; never physically deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub restaurant_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub upi_id: String,
    pub items: Vec<OrderItem>,
    /// Sum of line prices at creation time; immutable afterwards.
    pub total: u64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub rider: Option<RiderAssignment>,
    pub rider_assigned_at: Option<DateTime<Utc>>,
    /// Monotonic: set exactly once, together with the delivered transition.
    pub payment_completed: bool,
    pub complaint: Option<Complaint>,
    /// Audit link from a free-remake order back to the complained-about one.
    pub replacement_of: Option<String>,
}

/// Payload for placing a new order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub restaurant_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub upi_id: String,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub replacement_of: Option<String>,
}

impl Order {
    pub fn total_of(items: &[OrderItem]) -> u64 {
        items.iter().map(|i| i.price * u64::from(i.quantity)).sum()
    }

    /// Pay-at-delivery QR contract. Generation of the QR image is external.
    pub fn upi_payment_uri(&self, payee_name: &str) -> String {
        format!(
            "upi://pay?pa={}&pn={}&am={}&cu=INR",
            self.upi_id, payee_name, self.total
        )
    }
}

/// Read-side filter over the order store. All set fields must match.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub restaurant_id: Option<String>,
    pub customer_phone: Option<String>,
    pub status: Option<OrderStatus>,
    pub placed_since: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price: u64, quantity: u32) -> OrderItem {
        OrderItem {
            item_id: "1-1".into(),
            name: "Hyderabadi Chicken Biryani".into(),
            price,
            quantity,
            is_veg: false,
        }
    }

    #[test]
    fn total_sums_price_times_quantity() {
        let items = vec![item(299, 2), item(49, 2)];
        assert_eq!(Order::total_of(&items), 696);
    }

    #[test]
    fn happy_path_edges_are_allowed() {
        use OrderStatus::*;
        for (from, to) in [
            (Pending, Confirmed),
            (Confirmed, Preparing),
            (Preparing, RiderAssigned),
            (Confirmed, RiderAssigned),
            (RiderAssigned, OutForDelivery),
            (OutForDelivery, Arrived),
            (Arrived, Delivered),
            (OutForDelivery, Delivered),
            (Pending, Cancelled),
        ] {
            assert!(from.allows(to), "{from} -> {to} should be allowed");
        }
    }

    #[test]
    fn no_backward_or_terminal_edges() {
        use OrderStatus::*;
        let all = [
            Pending,
            Confirmed,
            Preparing,
            RiderAssigned,
            OutForDelivery,
            Arrived,
            Delivered,
            Cancelled,
        ];
        for from in [Delivered, Cancelled] {
            for to in all {
                assert!(!from.allows(to), "{from} is terminal, {from} -> {to} leaked");
            }
        }
        // cancellation is only reachable from pending
        for from in [Confirmed, Preparing, RiderAssigned, OutForDelivery, Arrived] {
            assert!(!from.allows(Cancelled), "{from} -> cancelled leaked");
        }
        // no self-loops
        for s in all {
            assert!(!s.allows(s));
        }
    }

    #[test]
    fn upi_uri_follows_contract() {
        let order = Order {
            id: "ORD-1".into(),
            restaurant_id: "1".into(),
            customer_name: "Rahul Sharma".into(),
            customer_phone: "9876543210".into(),
            delivery_address: "123 HSR Layout".into(),
            upi_id: "biryaniblues@upi".into(),
            items: vec![item(299, 2)],
            total: 598,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            rider: None,
            rider_assigned_at: None,
            payment_completed: false,
            complaint: None,
            replacement_of: None,
        };
        assert_eq!(
            order.upi_payment_uri("BiryaniBlues"),
            "upi://pay?pa=biryaniblues@upi&pn=BiryaniBlues&am=598&cu=INR"
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"out_for_delivery\"");
    }
}
