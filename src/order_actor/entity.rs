use chrono::Utc;

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::actor_framework::Entity;
use crate::domain::{
    Complaint, ComplaintCategory, ComplaintDecision, ComplaintStatus, Order, OrderCreate,
    OrderFilter, OrderItem, OrderStatus,
};

impl Order {
    /// Applies one edge of the transition table, or fails leaving the order
    /// untouched.
    fn transition(&mut self, to: OrderStatus) -> Result<(), OrderError> {
        if self.status.allows(to) {
            self.status = to;
            Ok(())
        } else {
            Err(OrderError::InvalidTransition { from: self.status, to })
        }
    }

    fn complaint_mut(&mut self) -> Result<&mut Complaint, OrderError> {
        let id = self.id.clone();
        self.complaint
            .as_mut()
            .ok_or(OrderError::ComplaintNotFound(id))
    }

    /// Same line items at zero price: a free remake, never a refund.
    fn replacement_payload(&self) -> OrderCreate {
        OrderCreate {
            restaurant_id: self.restaurant_id.clone(),
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            delivery_address: self.delivery_address.clone(),
            upi_id: self.upi_id.clone(),
            items: self
                .items
                .iter()
                .map(|i| OrderItem { price: 0, ..i.clone() })
                .collect(),
            replacement_of: Some(self.id.clone()),
        }
    }
}

impl Entity for Order {
    type Id = String;
    type CreatePayload = OrderCreate;
    type Patch = ();
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Filter = OrderFilter;
    type Error = OrderError;

    fn id(&self) -> &String {
        &self.id
    }

    fn not_found(id: &String) -> OrderError {
        OrderError::NotFound(id.clone())
    }

    /// Checkout is the sole producer of `pending`; the total is fixed here and
    /// never re-derived.
    fn from_create(id: String, payload: OrderCreate) -> Result<Self, OrderError> {
        if payload.items.is_empty() {
            return Err(OrderError::ValidationError("order has no items".into()));
        }
        let total = Order::total_of(&payload.items);
        Ok(Self {
            id,
            restaurant_id: payload.restaurant_id,
            customer_name: payload.customer_name,
            customer_phone: payload.customer_phone,
            delivery_address: payload.delivery_address,
            upi_id: payload.upi_id,
            items: payload.items,
            total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
            rider: None,
            rider_assigned_at: None,
            payment_completed: false,
            complaint: None,
            replacement_of: payload.replacement_of,
        })
    }

    /// Orders are mutated exclusively through actions.
    fn on_update(&mut self, _patch: ()) -> Result<(), OrderError> {
        Ok(())
    }

    fn handle_action(&mut self, action: OrderAction) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::Accept => {
                self.transition(OrderStatus::Confirmed)?;
                Ok(OrderActionResult::StatusChanged(self.status))
            }
            OrderAction::Reject => {
                self.transition(OrderStatus::Cancelled)?;
                Ok(OrderActionResult::StatusChanged(self.status))
            }
            OrderAction::MarkPreparing => {
                self.transition(OrderStatus::Preparing)?;
                Ok(OrderActionResult::StatusChanged(self.status))
            }
            OrderAction::AssignRider(assignment) => {
                if self.rider.is_some() {
                    return Err(OrderError::AlreadyAssigned(self.id.clone()));
                }
                self.transition(OrderStatus::RiderAssigned)?;
                self.rider = Some(assignment.clone());
                self.rider_assigned_at = Some(Utc::now());
                Ok(OrderActionResult::RiderAssigned { assignment })
            }
            OrderAction::MarkOutForDelivery => {
                self.transition(OrderStatus::OutForDelivery)?;
                Ok(OrderActionResult::StatusChanged(self.status))
            }
            OrderAction::MarkArrived => {
                self.transition(OrderStatus::Arrived)?;
                Ok(OrderActionResult::StatusChanged(self.status))
            }
            OrderAction::VerifyPayment => {
                self.transition(OrderStatus::Delivered)?;
                self.payment_completed = true;
                Ok(OrderActionResult::PaymentVerified { rider: self.rider.clone() })
            }
            OrderAction::SubmitComplaint { category, description, evidence } => {
                if self.status != OrderStatus::Delivered {
                    return Err(OrderError::OrderNotDelivered(self.id.clone()));
                }
                if self.complaint.is_some() {
                    return Err(OrderError::ComplaintAlreadyExists(self.id.clone()));
                }
                if description.trim().is_empty() {
                    return Err(OrderError::ValidationError(
                        "complaint description is empty".into(),
                    ));
                }
                if category == ComplaintCategory::BadFood && evidence.is_empty() {
                    return Err(OrderError::ValidationError(
                        "bad_food complaints require at least one evidence reference".into(),
                    ));
                }
                let complaint_id = format!("CMP-{}", self.id);
                self.complaint = Some(Complaint {
                    id: complaint_id.clone(),
                    category,
                    description,
                    evidence,
                    status: ComplaintStatus::Pending,
                    penalty: None,
                    created_at: Utc::now(),
                });
                Ok(OrderActionResult::ComplaintFiled { complaint_id })
            }
            OrderAction::ResolveComplaint { decision } => {
                let id = self.id.clone();
                let replacement = match decision {
                    ComplaintDecision::Replaced => Some(self.replacement_payload()),
                    ComplaintDecision::Rejected => None,
                };
                let complaint = self.complaint_mut()?;
                if complaint.status != ComplaintStatus::Pending {
                    return Err(OrderError::ComplaintAlreadyResolved(id));
                }
                complaint.status = match decision {
                    ComplaintDecision::Replaced => ComplaintStatus::Replaced,
                    ComplaintDecision::Rejected => ComplaintStatus::Rejected,
                };
                Ok(OrderActionResult::ComplaintResolved {
                    status: complaint.status,
                    replacement,
                })
            }
            OrderAction::ApplyPenalty { amount } => {
                if amount == 0 {
                    return Err(OrderError::InvalidAmount(amount));
                }
                let complaint = self.complaint_mut()?;
                complaint.penalty = Some(amount);
                Ok(OrderActionResult::PenaltyApplied { amount })
            }
        }
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        if let Some(restaurant_id) = &filter.restaurant_id {
            if &self.restaurant_id != restaurant_id {
                return false;
            }
        }
        if let Some(phone) = &filter.customer_phone {
            if &self.customer_phone != phone {
                return false;
            }
        }
        if let Some(status) = filter.status {
            if self.status != status {
                return false;
            }
        }
        if let Some(since) = filter.placed_since {
            if self.created_at < since {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_order() -> Order {
        Order::from_create(
            "ORD-1".into(),
            OrderCreate {
                restaurant_id: "1".into(),
                customer_name: "Rahul Sharma".into(),
                customer_phone: "9876543210".into(),
                delivery_address: "123 HSR Layout, Sector 2, Bangalore 560102".into(),
                upi_id: "biryaniblues@upi".into(),
                items: vec![
                    OrderItem {
                        item_id: "1-1".into(),
                        name: "Hyderabadi Chicken Biryani".into(),
                        price: 299,
                        quantity: 2,
                        is_veg: false,
                    },
                    OrderItem {
                        item_id: "1-4".into(),
                        name: "Raita".into(),
                        price: 49,
                        quantity: 2,
                        is_veg: true,
                    },
                ],
                replacement_of: None,
            },
        )
        .unwrap()
    }

    fn own_assignment() -> crate::domain::RiderAssignment {
        crate::domain::RiderAssignment::OwnFleet {
            rider_id: "RDR-1".into(),
            name: "Suresh Kumar".into(),
            phone: "9111222333".into(),
        }
    }

    fn delivered_order() -> Order {
        let mut order = new_order();
        order.handle_action(OrderAction::Accept).unwrap();
        order
            .handle_action(OrderAction::AssignRider(own_assignment()))
            .unwrap();
        order.handle_action(OrderAction::MarkOutForDelivery).unwrap();
        order.handle_action(OrderAction::VerifyPayment).unwrap();
        order
    }

    #[test]
    fn creation_computes_total_and_starts_pending() {
        let order = new_order();
        assert_eq!(order.total, 696);
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.payment_completed);
        assert!(order.rider.is_none());
    }

    #[test]
    fn empty_order_is_rejected() {
        let err = Order::from_create(
            "ORD-1".into(),
            OrderCreate {
                restaurant_id: "1".into(),
                customer_name: "x".into(),
                customer_phone: "1".into(),
                delivery_address: "a".into(),
                upi_id: "u@upi".into(),
                items: vec![],
                replacement_of: None,
            },
        )
        .unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(_)));
    }

    #[test]
    fn every_illegal_action_leaves_order_unchanged() {
        // from pending, only Accept and Reject are legal
        for action in [
            OrderAction::MarkPreparing,
            OrderAction::MarkOutForDelivery,
            OrderAction::MarkArrived,
            OrderAction::VerifyPayment,
            OrderAction::AssignRider(own_assignment()),
        ] {
            let mut order = new_order();
            let before = order.clone();
            let err = order.handle_action(action).unwrap_err();
            assert!(matches!(err, OrderError::InvalidTransition { .. }));
            assert_eq!(order, before);
        }
    }

    #[test]
    fn payment_verification_delivers_atomically() {
        let order = delivered_order();
        assert_eq!(order.status, OrderStatus::Delivered);
        assert!(order.payment_completed);
    }

    #[test]
    fn verify_payment_requires_out_for_delivery_or_arrived() {
        let mut order = new_order();
        order.handle_action(OrderAction::Accept).unwrap();
        let err = order.handle_action(OrderAction::VerifyPayment).unwrap_err();
        assert_eq!(
            err,
            OrderError::InvalidTransition {
                from: OrderStatus::Confirmed,
                to: OrderStatus::Delivered
            }
        );
        assert!(!order.payment_completed);
    }

    #[test]
    fn rider_assignment_is_write_once() {
        let mut order = new_order();
        order.handle_action(OrderAction::Accept).unwrap();
        order
            .handle_action(OrderAction::AssignRider(own_assignment()))
            .unwrap();
        let err = order
            .handle_action(OrderAction::AssignRider(own_assignment()))
            .unwrap_err();
        assert_eq!(err, OrderError::AlreadyAssigned("ORD-1".into()));
    }

    #[test]
    fn preparing_step_is_skippable() {
        let mut order = new_order();
        order.handle_action(OrderAction::Accept).unwrap();
        let result = order
            .handle_action(OrderAction::AssignRider(own_assignment()))
            .unwrap();
        assert!(matches!(result, OrderActionResult::RiderAssigned { .. }));
        assert_eq!(order.status, OrderStatus::RiderAssigned);
    }

    #[test]
    fn complaint_requires_delivered_order() {
        let mut order = new_order();
        let err = order
            .handle_action(OrderAction::SubmitComplaint {
                category: ComplaintCategory::Other,
                description: "cold food".into(),
                evidence: vec![],
            })
            .unwrap_err();
        assert_eq!(err, OrderError::OrderNotDelivered("ORD-1".into()));
    }

    #[test]
    fn bad_food_complaint_requires_evidence() {
        let mut order = delivered_order();
        let err = order
            .handle_action(OrderAction::SubmitComplaint {
                category: ComplaintCategory::BadFood,
                description: "stale biryani".into(),
                evidence: vec![],
            })
            .unwrap_err();
        assert!(matches!(err, OrderError::ValidationError(_)));

        order
            .handle_action(OrderAction::SubmitComplaint {
                category: ComplaintCategory::BadFood,
                description: "stale biryani".into(),
                evidence: vec!["img-1".into()],
            })
            .unwrap();
        assert!(order.complaint.is_some());
    }

    #[test]
    fn duplicate_complaint_is_rejected() {
        let mut order = delivered_order();
        order
            .handle_action(OrderAction::SubmitComplaint {
                category: ComplaintCategory::MissingItem,
                description: "no raita".into(),
                evidence: vec![],
            })
            .unwrap();
        let err = order
            .handle_action(OrderAction::SubmitComplaint {
                category: ComplaintCategory::Other,
                description: "again".into(),
                evidence: vec![],
            })
            .unwrap_err();
        assert_eq!(err, OrderError::ComplaintAlreadyExists("ORD-1".into()));
    }

    #[test]
    fn replacement_resolution_yields_zero_priced_remake() {
        let mut order = delivered_order();
        order
            .handle_action(OrderAction::SubmitComplaint {
                category: ComplaintCategory::BadFood,
                description: "stale biryani".into(),
                evidence: vec!["img-1".into()],
            })
            .unwrap();
        order.handle_action(OrderAction::ApplyPenalty { amount: 299 }).unwrap();

        let result = order
            .handle_action(OrderAction::ResolveComplaint {
                decision: ComplaintDecision::Replaced,
            })
            .unwrap();
        let OrderActionResult::ComplaintResolved { status, replacement } = result else {
            panic!("unexpected result");
        };
        assert_eq!(status, ComplaintStatus::Replaced);
        let payload = replacement.expect("replacement payload");
        assert_eq!(payload.replacement_of.as_deref(), Some("ORD-1"));
        assert!(payload.items.iter().all(|i| i.price == 0));
        assert_eq!(payload.items.len(), order.items.len());

        let complaint = order.complaint.as_ref().unwrap();
        assert_eq!(complaint.status, ComplaintStatus::Replaced);
        assert_eq!(complaint.penalty, Some(299));

        // one-way: a second resolution is refused
        let err = order
            .handle_action(OrderAction::ResolveComplaint {
                decision: ComplaintDecision::Rejected,
            })
            .unwrap_err();
        assert_eq!(err, OrderError::ComplaintAlreadyResolved("ORD-1".into()));
    }

    #[test]
    fn rejection_has_no_side_effects() {
        let mut order = delivered_order();
        order
            .handle_action(OrderAction::SubmitComplaint {
                category: ComplaintCategory::LateDelivery,
                description: "2 hours late".into(),
                evidence: vec![],
            })
            .unwrap();
        let result = order
            .handle_action(OrderAction::ResolveComplaint {
                decision: ComplaintDecision::Rejected,
            })
            .unwrap();
        let OrderActionResult::ComplaintResolved { status, replacement } = result else {
            panic!("unexpected result");
        };
        assert_eq!(status, ComplaintStatus::Rejected);
        assert!(replacement.is_none());
    }

    #[test]
    fn zero_penalty_is_invalid() {
        let mut order = delivered_order();
        order
            .handle_action(OrderAction::SubmitComplaint {
                category: ComplaintCategory::Other,
                description: "late".into(),
                evidence: vec![],
            })
            .unwrap();
        let err = order.handle_action(OrderAction::ApplyPenalty { amount: 0 }).unwrap_err();
        assert_eq!(err, OrderError::InvalidAmount(0));
    }

    #[test]
    fn penalty_without_complaint_is_refused() {
        let mut order = delivered_order();
        let err = order.handle_action(OrderAction::ApplyPenalty { amount: 100 }).unwrap_err();
        assert_eq!(err, OrderError::ComplaintNotFound("ORD-1".into()));
    }

    #[test]
    fn filter_matches_on_all_set_fields() {
        let order = new_order();
        assert!(order.matches(&OrderFilter::default()));
        assert!(order.matches(&OrderFilter {
            restaurant_id: Some("1".into()),
            status: Some(OrderStatus::Pending),
            ..Default::default()
        }));
        assert!(!order.matches(&OrderFilter {
            restaurant_id: Some("2".into()),
            ..Default::default()
        }));
        assert!(!order.matches(&OrderFilter {
            customer_phone: Some("0000000000".into()),
            ..Default::default()
        }));
        assert!(!order.matches(&OrderFilter {
            placed_since: Some(Utc::now() + chrono::Duration::hours(1)),
            ..Default::default()
        }));
    }
}
