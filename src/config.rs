use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::domain::SubscriptionTier;

/// Platform fee per subscription tier, in basis points of delivered revenue.
#[derive(Debug, Clone, Deserialize)]
pub struct FeeSchedule {
    #[serde(default = "FeeSchedule::default_free_bps")]
    pub free_bps: u64,
    #[serde(default = "FeeSchedule::default_pro_bps")]
    pub pro_bps: u64,
    #[serde(default = "FeeSchedule::default_enterprise_bps")]
    pub enterprise_bps: u64,
}

impl FeeSchedule {
    fn default_free_bps() -> u64 {
        1000
    }
    fn default_pro_bps() -> u64 {
        500
    }
    fn default_enterprise_bps() -> u64 {
        300
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            free_bps: Self::default_free_bps(),
            pro_bps: Self::default_pro_bps(),
            enterprise_bps: Self::default_enterprise_bps(),
        }
    }
}

/// Externally configurable policy values. Currency amounts are whole rupees.
#[derive(Debug, Clone, Deserialize)]
pub struct PlatformConfig {
    /// Fixed cost charged to the seller per API-partner delivery.
    #[serde(default = "PlatformConfig::default_api_delivery_cost")]
    pub api_delivery_cost: u64,
    #[serde(default)]
    pub fees: FeeSchedule,
    /// Periodic subscription charge, collected via settlement when due.
    #[serde(default = "PlatformConfig::default_subscription_fee")]
    pub subscription_fee: u64,
    /// Display label for API-partner rider assignments.
    #[serde(default = "PlatformConfig::default_api_partner_label")]
    pub api_partner_label: String,
}

impl PlatformConfig {
    fn default_api_delivery_cost() -> u64 {
        150
    }
    fn default_subscription_fee() -> u64 {
        999
    }
    fn default_api_partner_label() -> String {
        "Dunzo Partner".to_string()
    }

    pub fn fee_bps(&self, tier: SubscriptionTier) -> u64 {
        match tier {
            SubscriptionTier::Free => self.fees.free_bps,
            SubscriptionTier::Pro => self.fees.pro_bps,
            SubscriptionTier::Enterprise => self.fees.enterprise_bps,
        }
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            api_delivery_cost: Self::default_api_delivery_cost(),
            fees: FeeSchedule::default(),
            subscription_fee: Self::default_subscription_fee(),
            api_partner_label: Self::default_api_partner_label(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}
