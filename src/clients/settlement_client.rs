use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use crate::actor_framework::ResourceClient;
use crate::clients::OrderClient;
use crate::config::PlatformConfig;
use crate::domain::{
    compute_breakdown, Settlement, SettlementCreate, SettlementFilter, SettlementStatus,
    SubscriptionTier,
};
use crate::events::{DomainEvent, EventBus};
use crate::impl_client_methods;
use crate::settlement_actor::{SettlementAction, SettlementActionResult, SettlementError};

/// Client for interacting with the Settlement actor.
///
/// Settlements are derived: `close_window` projects over the order store and
/// freezes the breakdown; afterwards only the status moves.
#[derive(Clone)]
pub struct SettlementClient {
    inner: ResourceClient<Settlement>,
    orders: OrderClient,
    config: PlatformConfig,
    events: EventBus,
}

impl_client_methods!(SettlementClient, Settlement, SettlementError, settlement);

impl SettlementClient {
    pub fn new(
        inner: ResourceClient<Settlement>,
        orders: OrderClient,
        config: PlatformConfig,
        events: EventBus,
    ) -> Self {
        Self { inner, orders, config, events }
    }

    /// Closes a settlement window for one seller. A zero due means no
    /// settlement is created at all.
    #[instrument(skip(self))]
    pub async fn close_window(
        &self,
        restaurant_id: String,
        tier: SubscriptionTier,
        window_start: DateTime<Utc>,
        subscription_is_due: bool,
    ) -> Result<Option<Settlement>, SettlementError> {
        let orders = self
            .orders
            .orders_in_window(restaurant_id.clone(), window_start)
            .await
            .map_err(|e| SettlementError::Projection(e.to_string()))?;

        let breakdown = compute_breakdown(&orders, tier, subscription_is_due, &self.config);
        info!(
            restaurant_id = %restaurant_id,
            total_due = breakdown.total_due,
            api_orders = breakdown.api_orders_count,
            "Settlement window closed"
        );
        if breakdown.total_due == 0 {
            return Ok(None);
        }

        let total_due = breakdown.total_due;
        let id = self
            .inner
            .create(SettlementCreate {
                restaurant_id: restaurant_id.clone(),
                window_start,
                breakdown,
            })
            .await
            .map_err(SettlementError::from)?;
        let settlement = self
            .inner
            .get(id.clone())
            .await
            .map_err(SettlementError::from)?
            .ok_or(SettlementError::NotFound(id.clone()))?;

        self.events.publish(DomainEvent::SettlementFinalized {
            settlement_id: id,
            restaurant_id,
            total_due,
        });
        Ok(Some(settlement))
    }

    #[instrument(skip(self))]
    pub async fn mark_paid(&self, id: String) -> Result<SettlementStatus, SettlementError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, SettlementAction::MarkPaid)
            .await
            .map_err(SettlementError::from)?
        {
            SettlementActionResult::StatusChanged(status) => Ok(status),
        }
    }

    /// The "11 PM" deadline hook: invoked by an external scheduler, flips every
    /// still-pending settlement to overdue.
    #[instrument(skip(self))]
    pub async fn mark_overdue_if_unpaid(&self) -> Result<usize, SettlementError> {
        let pending = self
            .inner
            .find(SettlementFilter {
                status: Some(SettlementStatus::Pending),
                ..Default::default()
            })
            .await
            .map_err(SettlementError::from)?;

        let mut flipped = 0;
        for settlement in pending {
            self.inner
                .perform_action(settlement.id, SettlementAction::MarkOverdue)
                .await
                .map_err(SettlementError::from)?;
            flipped += 1;
        }
        info!(flipped, "Overdue sweep complete");
        Ok(flipped)
    }

    #[instrument(skip(self))]
    pub async fn settlements_for_restaurant(
        &self,
        restaurant_id: String,
    ) -> Result<Vec<Settlement>, SettlementError> {
        let mut settlements = self
            .inner
            .find(SettlementFilter {
                restaurant_id: Some(restaurant_id),
                ..Default::default()
            })
            .await
            .map_err(SettlementError::from)?;
        settlements.sort_by(|a, b| b.closed_at.cmp(&a.closed_at));
        Ok(settlements)
    }
}
