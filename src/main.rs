mod domain;

mod clients;

mod app_system;
mod config;
mod events;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod order_actor;
mod rider_actor;
mod settlement_actor;

use chrono::{Duration, Utc};
use tracing::{error, info, Instrument};

use crate::app_system::{setup_tracing, DeliverySystem};
use crate::clients::RiderChoice;
use crate::config::PlatformConfig;
use crate::domain::{OrderCreate, OrderItem, RiderCreate, SubscriptionTier, Vehicle, VehicleKind};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => PlatformConfig::from_json_file(&path).map_err(|e| e.to_string())?,
        None => PlatformConfig::default(),
    };

    info!("Starting delivery platform core");

    // Create the entire system (starts all actors)
    let system = DeliverySystem::new(config);

    // Log domain events as any real-time UI subscriber would
    let mut event_rx = system.events.subscribe();
    let event_logger = tokio::spawn(async move {
        while let Ok(event) = event_rx.recv().await {
            info!(?event, "domain event");
        }
    });

    let rider_id = system
        .riders
        .register_rider(RiderCreate {
            name: "Suresh Kumar".into(),
            phone: "9111222333".into(),
            vehicle: Vehicle {
                kind: VehicleKind::Bike,
                registration: "KA-01-AB-1234".into(),
            },
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(rider_id = %rider_id, "Rider registered");

    // Drive one order through its full lifecycle
    let span = tracing::info_span!("order_lifecycle");
    let order_id = async {
        let order_id = system
            .orders
            .place_order(OrderCreate {
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
            })
            .await
            .map_err(|e| e.to_string())?;

        system.orders.accept_order(order_id.clone()).await.map_err(|e| e.to_string())?;
        system
            .orders
            .assign_rider(order_id.clone(), RiderChoice::Own { rider_id: None })
            .await
            .map_err(|e| e.to_string())?;
        system
            .orders
            .mark_out_for_delivery(order_id.clone())
            .await
            .map_err(|e| e.to_string())?;
        system.orders.verify_payment(order_id.clone()).await.map_err(|e| e.to_string())?;

        Ok::<_, String>(order_id)
    }
    .instrument(span)
    .await?;

    info!(order_id = %order_id, "Order delivered and paid");

    // Nightly settlement for the seller
    let window_start = Utc::now() - Duration::hours(24);
    match system
        .settlements
        .close_window("1".into(), SubscriptionTier::Pro, window_start, false)
        .await
    {
        Ok(Some(settlement)) => info!(
            settlement_id = %settlement.id,
            total_due = settlement.breakdown.total_due,
            "Settlement created"
        ),
        Ok(None) => info!("Nothing due for this window"),
        Err(e) => error!(error = %e, "Settlement failed"),
    }

    event_logger.abort();

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Application completed successfully");
    Ok(())
}
