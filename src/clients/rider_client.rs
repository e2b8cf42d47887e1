use tracing::{debug, instrument};

use crate::actor_framework::ResourceClient;
use crate::domain::{Rider, RiderCreate, RiderFilter, RiderPatch, RiderStatus};
use crate::rider_actor::{RiderAction, RiderActionResult, RiderError};
use crate::{impl_basic_client, impl_client_delete};

/// Client for interacting with the Rider actor.
#[derive(Clone)]
pub struct RiderClient {
    inner: ResourceClient<Rider>,
}

impl_basic_client!(RiderClient, Rider, RiderError, rider);
impl_client_delete!(RiderClient, RiderError, rider);

impl RiderClient {
    #[instrument(skip(self, rider))]
    pub async fn register_rider(&self, rider: RiderCreate) -> Result<String, RiderError> {
        debug!(name = %rider.name, "Sending request");
        self.inner.create(rider).await.map_err(RiderError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_rider(&self, id: String, patch: RiderPatch) -> Result<Rider, RiderError> {
        debug!("Sending request");
        self.inner.update(id, patch).await.map_err(RiderError::from)
    }

    #[instrument(skip(self))]
    pub async fn riders_with_status(&self, status: RiderStatus) -> Result<Vec<Rider>, RiderError> {
        debug!("Sending request");
        let mut riders = self
            .inner
            .find(RiderFilter { status: Some(status) })
            .await
            .map_err(RiderError::from)?;
        riders.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(riders)
    }

    /// Resolves the next free rider of the fleet, lowest id first.
    #[instrument(skip(self))]
    pub async fn first_available(&self) -> Result<Rider, RiderError> {
        self.riders_with_status(RiderStatus::Available)
            .await?
            .into_iter()
            .next()
            .ok_or(RiderError::NoAvailableRider)
    }

    /// Claims the rider for an order; returns a snapshot for the assignment.
    #[instrument(skip(self))]
    pub async fn reserve(&self, id: String, order_id: String) -> Result<Rider, RiderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, RiderAction::Reserve { order_id })
            .await
            .map_err(RiderError::from)?
        {
            RiderActionResult::Reserved(rider) => Ok(rider),
            other => Err(RiderError::ActorCommunicationError(format!(
                "unexpected result: {other:?}"
            ))),
        }
    }

    /// Compensation for a failed assignment after a successful reserve.
    #[instrument(skip(self))]
    pub async fn release(&self, id: String) -> Result<(), RiderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, RiderAction::Release)
            .await
            .map_err(RiderError::from)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn complete_delivery(&self, id: String) -> Result<u32, RiderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, RiderAction::CompleteDelivery)
            .await
            .map_err(RiderError::from)?
        {
            RiderActionResult::DeliveryCompleted { total_deliveries } => Ok(total_deliveries),
            other => Err(RiderError::ActorCommunicationError(format!(
                "unexpected result: {other:?}"
            ))),
        }
    }

    #[instrument(skip(self))]
    pub async fn set_availability(&self, id: String, available: bool) -> Result<(), RiderError> {
        debug!("Sending request");
        self.inner
            .perform_action(id, RiderAction::SetAvailability { available })
            .await
            .map_err(RiderError::from)?;
        Ok(())
    }
}
