use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::PlatformConfig;
use crate::domain::{ComplaintStatus, Order, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    Free,
    Pro,
    Enterprise,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Pending,
    Paid,
    Overdue,
}

impl fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Paid => "paid",
            SettlementStatus::Overdue => "overdue",
        };
        f.write_str(s)
    }
}

/// The components of one seller's nightly due. Derived, never authoritative:
/// recomputing over the same orders yields the same breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementBreakdown {
    pub delivery_api_cost: u64,
    pub platform_fee: u64,
    pub penalties: u64,
    pub subscription_due: u64,
    pub total_due: u64,
    pub api_orders_count: u32,
    pub total_orders_count: u32,
    pub total_revenue: u64,
}

/// Per-seller, per-window financial summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub id: String,
    pub restaurant_id: String,
    pub window_start: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub breakdown: SettlementBreakdown,
    pub status: SettlementStatus,
}

#[derive(Debug, Clone)]
pub struct SettlementCreate {
    pub restaurant_id: String,
    pub window_start: DateTime<Utc>,
    pub breakdown: SettlementBreakdown,
}

#[derive(Debug, Clone, Default)]
pub struct SettlementFilter {
    pub restaurant_id: Option<String>,
    pub status: Option<SettlementStatus>,
}

/// Rounds `revenue * bps / 10_000` to the nearest rupee, half-up.
fn platform_fee(revenue: u64, fee_bps: u64) -> u64 {
    (revenue * fee_bps + 5_000) / 10_000
}

/// Pure settlement calculator over one seller's orders in a window.
///
/// `totalDue = deliveryApiCost + platformFee + penalties + subscriptionDue`.
/// Only delivered orders earn revenue and API delivery cost; penalties come
/// from resolved complaints regardless of decision.
pub fn compute_breakdown(
    orders: &[Order],
    tier: SubscriptionTier,
    subscription_is_due: bool,
    config: &PlatformConfig,
) -> SettlementBreakdown {
    let delivered: Vec<&Order> = orders
        .iter()
        .filter(|o| o.status == OrderStatus::Delivered)
        .collect();

    let api_orders_count = delivered
        .iter()
        .filter(|o| o.rider.as_ref().is_some_and(|r| r.is_api_partner()))
        .count() as u32;
    let total_revenue: u64 = delivered.iter().map(|o| o.total).sum();

    let penalties: u64 = orders
        .iter()
        .filter_map(|o| o.complaint.as_ref())
        .filter(|c| c.status != ComplaintStatus::Pending)
        .filter_map(|c| c.penalty)
        .sum();

    let delivery_api_cost = u64::from(api_orders_count) * config.api_delivery_cost;
    let platform_fee = platform_fee(total_revenue, config.fee_bps(tier));
    let subscription_due = if subscription_is_due {
        config.subscription_fee
    } else {
        0
    };

    SettlementBreakdown {
        delivery_api_cost,
        platform_fee,
        penalties,
        subscription_due,
        total_due: delivery_api_cost + platform_fee + penalties + subscription_due,
        api_orders_count,
        total_orders_count: orders.len() as u32,
        total_revenue,
    }
}
