use crate::domain::SettlementStatus;

/// Custom actions for Settlement entities.
#[derive(Debug, Clone)]
pub enum SettlementAction {
    /// Explicit admin/seller confirmation. A paid settlement is immutable.
    MarkPaid,
    /// Fired by the external deadline scheduler for settlements still pending.
    MarkOverdue,
}

#[derive(Debug, Clone)]
pub enum SettlementActionResult {
    StatusChanged(SettlementStatus),
}
