use chrono::Utc;

use super::actions::{SettlementAction, SettlementActionResult};
use super::error::SettlementError;
use crate::actor_framework::Entity;
use crate::domain::{Settlement, SettlementCreate, SettlementFilter, SettlementStatus};

impl Entity for Settlement {
    type Id = String;
    type CreatePayload = SettlementCreate;
    type Patch = ();
    type Action = SettlementAction;
    type ActionResult = SettlementActionResult;
    type Filter = SettlementFilter;
    type Error = SettlementError;

    fn id(&self) -> &String {
        &self.id
    }

    fn not_found(id: &String) -> SettlementError {
        SettlementError::NotFound(id.clone())
    }

    fn from_create(id: String, payload: SettlementCreate) -> Result<Self, SettlementError> {
        Ok(Self {
            id,
            restaurant_id: payload.restaurant_id,
            window_start: payload.window_start,
            closed_at: Utc::now(),
            breakdown: payload.breakdown,
            status: SettlementStatus::Pending,
        })
    }

    /// Settlement amounts are fixed at window close; only the status moves.
    fn on_update(&mut self, _patch: ()) -> Result<(), SettlementError> {
        Ok(())
    }

    fn handle_action(
        &mut self,
        action: SettlementAction,
    ) -> Result<SettlementActionResult, SettlementError> {
        match action {
            SettlementAction::MarkPaid => match self.status {
                SettlementStatus::Pending | SettlementStatus::Overdue => {
                    self.status = SettlementStatus::Paid;
                    Ok(SettlementActionResult::StatusChanged(self.status))
                }
                SettlementStatus::Paid => Err(SettlementError::AlreadyPaid(self.id.clone())),
            },
            SettlementAction::MarkOverdue => match self.status {
                // idempotent for the scheduler's sweep
                SettlementStatus::Pending | SettlementStatus::Overdue => {
                    self.status = SettlementStatus::Overdue;
                    Ok(SettlementActionResult::StatusChanged(self.status))
                }
                SettlementStatus::Paid => Err(SettlementError::AlreadyPaid(self.id.clone())),
            },
        }
    }

    fn matches(&self, filter: &SettlementFilter) -> bool {
        if let Some(restaurant_id) = &filter.restaurant_id {
            if &self.restaurant_id != restaurant_id {
                return false;
            }
        }
        filter.status.map_or(true, |s| s == self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SettlementBreakdown;

    fn new_settlement() -> Settlement {
        Settlement::from_create(
            "SET-1".into(),
            SettlementCreate {
                restaurant_id: "1".into(),
                window_start: Utc::now(),
                breakdown: SettlementBreakdown {
                    delivery_api_cost: 150,
                    platform_fee: 25,
                    penalties: 0,
                    subscription_due: 0,
                    total_due: 175,
                    api_orders_count: 1,
                    total_orders_count: 1,
                    total_revenue: 500,
                },
            },
        )
        .unwrap()
    }

    #[test]
    fn starts_pending_and_can_be_paid() {
        let mut settlement = new_settlement();
        assert_eq!(settlement.status, SettlementStatus::Pending);
        settlement.handle_action(SettlementAction::MarkPaid).unwrap();
        assert_eq!(settlement.status, SettlementStatus::Paid);
    }

    #[test]
    fn paid_settlement_is_immutable() {
        let mut settlement = new_settlement();
        settlement.handle_action(SettlementAction::MarkPaid).unwrap();
        let before = settlement.clone();

        for action in [SettlementAction::MarkPaid, SettlementAction::MarkOverdue] {
            let err = settlement.handle_action(action).unwrap_err();
            assert_eq!(err, SettlementError::AlreadyPaid("SET-1".into()));
            assert_eq!(settlement, before);
        }
    }

    #[test]
    fn overdue_can_still_be_paid() {
        let mut settlement = new_settlement();
        settlement.handle_action(SettlementAction::MarkOverdue).unwrap();
        assert_eq!(settlement.status, SettlementStatus::Overdue);
        // sweep is idempotent
        settlement.handle_action(SettlementAction::MarkOverdue).unwrap();
        settlement.handle_action(SettlementAction::MarkPaid).unwrap();
        assert_eq!(settlement.status, SettlementStatus::Paid);
    }
}
