use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use crate::actor_framework::ResourceActor;
use crate::clients::{OrderClient, RiderClient, SettlementClient};
use crate::config::PlatformConfig;
use crate::domain::{Order, Rider, Settlement};
use crate::events::EventBus;

fn id_sequence(prefix: &'static str) -> impl Fn() -> String + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(1));
    move || {
        let id = counter.fetch_add(1, Ordering::SeqCst);
        format!("{prefix}-{id}")
    }
}

/// The main application system that orchestrates all actors.
///
/// Constructed once at process start with injected configuration; there is no
/// ambient global state. Each aggregate gets its own actor and therefore its
/// own serialization boundary.
pub struct DeliverySystem {
    pub orders: OrderClient,
    pub riders: RiderClient,
    pub settlements: SettlementClient,
    pub events: EventBus,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl DeliverySystem {
    pub fn new(config: PlatformConfig) -> Self {
        let events = EventBus::new(64);

        // 1. Rider service
        let (rider_actor, rider_resource_client) =
            ResourceActor::<Rider>::new(32, id_sequence("RDR"));
        let riders = RiderClient::new(rider_resource_client);
        let rider_handle = tokio::spawn(rider_actor.run());

        // 2. Order service
        let (order_actor, order_resource_client) =
            ResourceActor::<Order>::new(32, id_sequence("ORD"));
        let orders = OrderClient::new(
            order_resource_client,
            riders.clone(),
            config.api_partner_label.clone(),
            events.clone(),
        );
        let order_handle = tokio::spawn(order_actor.run());

        // 3. Settlement service
        let (settlement_actor, settlement_resource_client) =
            ResourceActor::<Settlement>::new(32, id_sequence("SET"));
        let settlements = SettlementClient::new(
            settlement_resource_client,
            orders.clone(),
            config,
            events.clone(),
        );
        let settlement_handle = tokio::spawn(settlement_actor.run());

        Self {
            orders,
            riders,
            settlements,
            events,
            handles: vec![rider_handle, order_handle, settlement_handle],
        }
    }

    /// Graceful shutdown: dropping every client closes the request channels,
    /// which ends each actor's event loop.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.settlements);
        drop(self.orders);
        drop(self.riders);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
