use chrono::{DateTime, Local, NaiveTime, Utc};
use tracing::{debug, error, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::RiderClient;
use crate::domain::{
    ComplaintCategory, ComplaintDecision, Order, OrderCreate, OrderFilter, OrderStatus,
    RiderAssignment,
};
use crate::events::{DomainEvent, EventBus};
use crate::impl_client_methods;
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};

/// How the seller wants an order fulfilled.
#[derive(Debug, Clone)]
pub enum RiderChoice {
    /// A rider from the seller's own fleet; `None` picks the first available.
    Own { rider_id: Option<String> },
    /// Third-party fulfilment at the configured per-delivery cost.
    ApiPartner,
}

/// Client for interacting with the Order actor.
///
/// This client owns the cross-aggregate workflows: reserving a rider before
/// the assignment lands on the order (with compensation on failure), releasing
/// the rider when payment verification completes the delivery, and creating
/// the replacement order that a `replaced` complaint decision calls for.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
    riders: RiderClient,
    api_partner_label: String,
    events: EventBus,
}

impl_client_methods!(OrderClient, Order, OrderError, order);

impl OrderClient {
    pub fn new(
        inner: ResourceClient<Order>,
        riders: RiderClient,
        api_partner_label: impl Into<String>,
        events: EventBus,
    ) -> Self {
        Self {
            inner,
            riders,
            api_partner_label: api_partner_label.into(),
            events,
        }
    }

    // --- Commands -----------------------------------------------------------

    /// Checkout: the only entry point producing a `pending` order.
    #[instrument(skip(self, payload))]
    pub async fn place_order(&self, payload: OrderCreate) -> Result<String, OrderError> {
        let restaurant_id = payload.restaurant_id.clone();
        let order_id = self.inner.create(payload).await.map_err(OrderError::from)?;
        info!(order_id = %order_id, "Order placed");
        self.events.publish(DomainEvent::OrderPlaced {
            order_id: order_id.clone(),
            restaurant_id,
        });
        Ok(order_id)
    }

    async fn status_action(
        &self,
        order_id: String,
        action: OrderAction,
    ) -> Result<OrderStatus, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(order_id.clone(), action)
            .await
            .map_err(OrderError::from)?
        {
            OrderActionResult::StatusChanged(status) => {
                self.events
                    .publish(DomainEvent::OrderStatusChanged { order_id, status });
                Ok(status)
            }
            other => Err(OrderError::ActorCommunicationError(format!(
                "unexpected result: {other:?}"
            ))),
        }
    }

    #[instrument(skip(self))]
    pub async fn accept_order(&self, order_id: String) -> Result<OrderStatus, OrderError> {
        self.status_action(order_id, OrderAction::Accept).await
    }

    #[instrument(skip(self))]
    pub async fn reject_order(&self, order_id: String) -> Result<OrderStatus, OrderError> {
        self.status_action(order_id, OrderAction::Reject).await
    }

    #[instrument(skip(self))]
    pub async fn mark_preparing(&self, order_id: String) -> Result<OrderStatus, OrderError> {
        self.status_action(order_id, OrderAction::MarkPreparing).await
    }

    #[instrument(skip(self))]
    pub async fn mark_out_for_delivery(&self, order_id: String) -> Result<OrderStatus, OrderError> {
        self.status_action(order_id, OrderAction::MarkOutForDelivery).await
    }

    #[instrument(skip(self))]
    pub async fn mark_arrived(&self, order_id: String) -> Result<OrderStatus, OrderError> {
        self.status_action(order_id, OrderAction::MarkArrived).await
    }

    /// Assigns fulfilment for the order and advances it to `rider_assigned`.
    ///
    /// Own-fleet assignment reserves the rider first and releases it again if
    /// the order refuses the assignment, so the busy flag and the order state
    /// are never observed half-applied.
    #[instrument(skip(self))]
    pub async fn assign_rider(
        &self,
        order_id: String,
        choice: RiderChoice,
    ) -> Result<RiderAssignment, OrderError> {
        let (assignment, reserved_rider_id) = match choice {
            RiderChoice::Own { rider_id } => {
                let rider_id = match rider_id {
                    Some(id) => id,
                    None => self.riders.first_available().await?.id,
                };
                let rider = self.riders.reserve(rider_id.clone(), order_id.clone()).await?;
                info!(rider_id = %rider.id, "Rider reserved");
                (
                    RiderAssignment::OwnFleet {
                        rider_id: rider.id,
                        name: rider.name,
                        phone: rider.phone,
                    },
                    Some(rider_id),
                )
            }
            RiderChoice::ApiPartner => (
                RiderAssignment::ApiPartner {
                    partner: self.api_partner_label.clone(),
                },
                None,
            ),
        };

        let result = self
            .inner
            .perform_action(order_id.clone(), OrderAction::AssignRider(assignment))
            .await
            .map_err(OrderError::from);

        match result {
            Ok(OrderActionResult::RiderAssigned { assignment }) => {
                self.events.publish(DomainEvent::RiderAssigned {
                    order_id,
                    assignment: assignment.clone(),
                });
                Ok(assignment)
            }
            Ok(other) => Err(OrderError::ActorCommunicationError(format!(
                "unexpected result: {other:?}"
            ))),
            Err(e) => {
                if let Some(rider_id) = reserved_rider_id {
                    if let Err(release_err) = self.riders.release(rider_id.clone()).await {
                        error!(rider_id = %rider_id, error = %release_err,
                            "Failed to release rider after assignment failure");
                    }
                }
                Err(e)
            }
        }
    }

    /// Confirms payment and completes delivery in one step; an own-fleet rider
    /// goes back to `available` as part of the same workflow.
    #[instrument(skip(self))]
    pub async fn verify_payment(&self, order_id: String) -> Result<(), OrderError> {
        debug!("Sending request");
        let result = self
            .inner
            .perform_action(order_id.clone(), OrderAction::VerifyPayment)
            .await
            .map_err(OrderError::from)?;
        let OrderActionResult::PaymentVerified { rider } = result else {
            return Err(OrderError::ActorCommunicationError(
                "unexpected result".to_string(),
            ));
        };

        if let Some(RiderAssignment::OwnFleet { rider_id, .. }) = rider {
            match self.riders.complete_delivery(rider_id.clone()).await {
                Ok(total) => info!(rider_id = %rider_id, total_deliveries = total,
                    "Rider released after delivery"),
                // payment already committed; the rider sweep can reconcile
                Err(e) => warn!(rider_id = %rider_id, error = %e,
                    "Rider not released after delivery"),
            }
        }

        self.events.publish(DomainEvent::PaymentCompleted { order_id: order_id.clone() });
        self.events.publish(DomainEvent::OrderStatusChanged {
            order_id,
            status: OrderStatus::Delivered,
        });
        Ok(())
    }

    #[instrument(skip(self, description))]
    pub async fn submit_complaint(
        &self,
        order_id: String,
        category: ComplaintCategory,
        description: String,
        evidence: Vec<String>,
    ) -> Result<String, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(
                order_id.clone(),
                OrderAction::SubmitComplaint { category, description, evidence },
            )
            .await
            .map_err(OrderError::from)?
        {
            OrderActionResult::ComplaintFiled { complaint_id } => {
                self.events.publish(DomainEvent::ComplaintSubmitted {
                    order_id,
                    complaint_id: complaint_id.clone(),
                });
                Ok(complaint_id)
            }
            other => Err(OrderError::ActorCommunicationError(format!(
                "unexpected result: {other:?}"
            ))),
        }
    }

    /// Resolves the complaint; on `Replaced`, places the zero-priced remake
    /// and returns its id.
    #[instrument(skip(self))]
    pub async fn resolve_complaint(
        &self,
        order_id: String,
        decision: ComplaintDecision,
    ) -> Result<Option<String>, OrderError> {
        debug!("Sending request");
        let result = self
            .inner
            .perform_action(order_id.clone(), OrderAction::ResolveComplaint { decision })
            .await
            .map_err(OrderError::from)?;
        let OrderActionResult::ComplaintResolved { status, replacement } = result else {
            return Err(OrderError::ActorCommunicationError(
                "unexpected result".to_string(),
            ));
        };

        let replacement_order_id = match replacement {
            Some(payload) => {
                let id = self.inner.create(payload).await.map_err(OrderError::from)?;
                info!(original = %order_id, replacement = %id, "Replacement order placed");
                Some(id)
            }
            None => None,
        };

        self.events.publish(DomainEvent::ComplaintResolved {
            order_id,
            status,
            replacement_order_id: replacement_order_id.clone(),
        });
        Ok(replacement_order_id)
    }

    #[instrument(skip(self))]
    pub async fn apply_penalty(&self, order_id: String, amount: u64) -> Result<(), OrderError> {
        debug!("Sending request");
        self.inner
            .perform_action(order_id, OrderAction::ApplyPenalty { amount })
            .await
            .map_err(OrderError::from)?;
        Ok(())
    }

    // --- Queries ------------------------------------------------------------

    /// Pure projection over the order store, newest first.
    async fn query(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.inner.find(filter).await.map_err(OrderError::from)?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    #[instrument(skip(self))]
    pub async fn orders_for_restaurant(
        &self,
        restaurant_id: String,
    ) -> Result<Vec<Order>, OrderError> {
        self.query(OrderFilter {
            restaurant_id: Some(restaurant_id),
            ..Default::default()
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn orders_for_customer(
        &self,
        customer_phone: String,
    ) -> Result<Vec<Order>, OrderError> {
        self.query(OrderFilter {
            customer_phone: Some(customer_phone),
            ..Default::default()
        })
        .await
    }

    #[instrument(skip(self))]
    pub async fn orders_with_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderError> {
        self.query(OrderFilter { status: Some(status), ..Default::default() }).await
    }

    /// One seller's orders placed since `since`; the settlement window input.
    #[instrument(skip(self))]
    pub async fn orders_in_window(
        &self,
        restaurant_id: String,
        since: DateTime<Utc>,
    ) -> Result<Vec<Order>, OrderError> {
        self.query(OrderFilter {
            restaurant_id: Some(restaurant_id),
            placed_since: Some(since),
            ..Default::default()
        })
        .await
    }

    /// "Today" is local midnight to now.
    #[instrument(skip(self))]
    pub async fn orders_today(&self, restaurant_id: String) -> Result<Vec<Order>, OrderError> {
        self.orders_in_window(restaurant_id, local_midnight()).await
    }
}

fn local_midnight() -> DateTime<Utc> {
    let now = Local::now();
    now.with_time(NaiveTime::MIN)
        .single()
        .unwrap_or(now)
        .with_timezone(&Utc)
}
