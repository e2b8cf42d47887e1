use super::actions::{RiderAction, RiderActionResult};
use super::error::RiderError;
use crate::actor_framework::Entity;
use crate::domain::{Rider, RiderCreate, RiderFilter, RiderPatch, RiderStatus};

impl Rider {
    /// `busy` and the back-reference always change together, keeping the
    /// cross-entity invariant inside one mutation.
    fn clear_assignment(&mut self) {
        self.status = RiderStatus::Available;
        self.current_order_id = None;
    }
}

impl Entity for Rider {
    type Id = String;
    type CreatePayload = RiderCreate;
    type Patch = RiderPatch;
    type Action = RiderAction;
    type ActionResult = RiderActionResult;
    type Filter = RiderFilter;
    type Error = RiderError;

    fn id(&self) -> &String {
        &self.id
    }

    fn not_found(id: &String) -> RiderError {
        RiderError::NotFound(id.clone())
    }

    fn from_create(id: String, payload: RiderCreate) -> Result<Self, RiderError> {
        Ok(Self {
            id,
            name: payload.name,
            phone: payload.phone,
            status: RiderStatus::Available,
            current_order_id: None,
            total_deliveries: 0,
            rating: 5.0,
            vehicle: payload.vehicle,
        })
    }

    fn on_update(&mut self, patch: RiderPatch) -> Result<(), RiderError> {
        if let Some(phone) = patch.phone {
            self.phone = phone;
        }
        if let Some(rating) = patch.rating {
            self.rating = rating;
        }
        Ok(())
    }

    /// A rider on an active delivery cannot be removed from the fleet.
    fn on_delete(&self) -> Result<(), RiderError> {
        match &self.current_order_id {
            Some(order_id) => Err(RiderError::CurrentlyAssigned {
                id: self.id.clone(),
                order_id: order_id.clone(),
            }),
            None => Ok(()),
        }
    }

    fn handle_action(&mut self, action: RiderAction) -> Result<RiderActionResult, RiderError> {
        match action {
            RiderAction::Reserve { order_id } => {
                if self.status != RiderStatus::Available {
                    return Err(RiderError::NotAvailable {
                        id: self.id.clone(),
                        status: self.status.to_string(),
                    });
                }
                self.status = RiderStatus::Busy;
                self.current_order_id = Some(order_id);
                Ok(RiderActionResult::Reserved(self.clone()))
            }
            RiderAction::Release => {
                if self.current_order_id.is_none() {
                    return Err(RiderError::NotAssigned(self.id.clone()));
                }
                self.clear_assignment();
                Ok(RiderActionResult::Released)
            }
            RiderAction::CompleteDelivery => {
                if self.current_order_id.is_none() {
                    return Err(RiderError::NotAssigned(self.id.clone()));
                }
                self.clear_assignment();
                self.total_deliveries += 1;
                Ok(RiderActionResult::DeliveryCompleted {
                    total_deliveries: self.total_deliveries,
                })
            }
            RiderAction::SetAvailability { available } => {
                if let Some(order_id) = &self.current_order_id {
                    return Err(RiderError::CurrentlyAssigned {
                        id: self.id.clone(),
                        order_id: order_id.clone(),
                    });
                }
                self.status = if available {
                    RiderStatus::Available
                } else {
                    RiderStatus::Offline
                };
                Ok(RiderActionResult::AvailabilityChanged)
            }
        }
    }

    fn matches(&self, filter: &RiderFilter) -> bool {
        filter.status.map_or(true, |s| s == self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Vehicle, VehicleKind};

    fn new_rider() -> Rider {
        Rider::from_create(
            "RDR-1".into(),
            RiderCreate {
                name: "Suresh Kumar".into(),
                phone: "9111222333".into(),
                vehicle: Vehicle {
                    kind: VehicleKind::Bike,
                    registration: "KA-01-AB-1234".into(),
                },
            },
        )
        .unwrap()
    }

    #[test]
    fn busy_iff_back_reference_is_set() {
        let mut rider = new_rider();
        assert_eq!(rider.status, RiderStatus::Available);
        assert!(rider.current_order_id.is_none());

        rider
            .handle_action(RiderAction::Reserve { order_id: "ORD-1".into() })
            .unwrap();
        assert_eq!(rider.status, RiderStatus::Busy);
        assert_eq!(rider.current_order_id.as_deref(), Some("ORD-1"));

        rider.handle_action(RiderAction::CompleteDelivery).unwrap();
        assert_eq!(rider.status, RiderStatus::Available);
        assert!(rider.current_order_id.is_none());
        assert_eq!(rider.total_deliveries, 1);
    }

    #[test]
    fn busy_rider_cannot_be_reserved_again() {
        let mut rider = new_rider();
        rider
            .handle_action(RiderAction::Reserve { order_id: "ORD-1".into() })
            .unwrap();
        let err = rider
            .handle_action(RiderAction::Reserve { order_id: "ORD-2".into() })
            .unwrap_err();
        assert_eq!(
            err,
            RiderError::NotAvailable { id: "RDR-1".into(), status: "busy".into() }
        );
        // unchanged assignment
        assert_eq!(rider.current_order_id.as_deref(), Some("ORD-1"));
    }

    #[test]
    fn offline_rider_cannot_be_reserved() {
        let mut rider = new_rider();
        rider
            .handle_action(RiderAction::SetAvailability { available: false })
            .unwrap();
        let err = rider
            .handle_action(RiderAction::Reserve { order_id: "ORD-1".into() })
            .unwrap_err();
        assert!(matches!(err, RiderError::NotAvailable { .. }));
    }

    #[test]
    fn release_is_the_compensation_path() {
        let mut rider = new_rider();
        rider
            .handle_action(RiderAction::Reserve { order_id: "ORD-1".into() })
            .unwrap();
        rider.handle_action(RiderAction::Release).unwrap();
        assert_eq!(rider.status, RiderStatus::Available);
        // a release does not count as a delivery
        assert_eq!(rider.total_deliveries, 0);
    }

    #[test]
    fn shift_toggle_refused_while_busy() {
        let mut rider = new_rider();
        rider
            .handle_action(RiderAction::Reserve { order_id: "ORD-1".into() })
            .unwrap();
        let err = rider
            .handle_action(RiderAction::SetAvailability { available: false })
            .unwrap_err();
        assert!(matches!(err, RiderError::CurrentlyAssigned { .. }));
    }

    #[test]
    fn busy_rider_cannot_be_deleted() {
        let mut rider = new_rider();
        rider
            .handle_action(RiderAction::Reserve { order_id: "ORD-1".into() })
            .unwrap();
        assert!(rider.on_delete().is_err());
        rider.handle_action(RiderAction::CompleteDelivery).unwrap();
        assert!(rider.on_delete().is_ok());
    }
}
