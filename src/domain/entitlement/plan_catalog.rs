use super::model::Plan;
use crate::infrastructure::config::Config;

/// One purchasable tier: what a payment of `price` (minor currency units) buys
#[derive(Debug, Clone, PartialEq)]
pub struct PlanTier {
    pub price: i64,
    pub plan: Plan,
    pub allowed_casts: i32,
}

/// Fixed price to plan lookup used by the payment webhook
#[derive(Debug, Clone)]
pub struct PlanCatalog {
    tiers: Vec<PlanTier>,
}

impl PlanCatalog {
    pub fn new(tiers: Vec<PlanTier>) -> Self {
        Self { tiers }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(vec![
            PlanTier {
                price: config.plan_pro_price,
                plan: Plan::Pro,
                allowed_casts: config.plan_pro_casts,
            },
            PlanTier {
                price: config.plan_enterprise_price,
                plan: Plan::Enterprise,
                allowed_casts: config.plan_enterprise_casts,
            },
        ])
    }

    /// Exact-amount match; any other amount buys nothing
    pub fn tier_for_amount(&self, amount: i64) -> Option<&PlanTier> {
        self.tiers.iter().find(|tier| tier.price == amount)
    }
}

impl Default for PlanCatalog {
    fn default() -> Self {
        Self::new(vec![
            PlanTier {
                price: 2900,
                plan: Plan::Pro,
                allowed_casts: 10,
            },
            PlanTier {
                price: 9900,
                plan: Plan::Enterprise,
                allowed_casts: 20,
            },
        ])
    }
}
