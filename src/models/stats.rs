use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Subscription fields the gateway reads from the upstream `subscriptions` endpoint.
///
/// Values are kept as whatever JSON the upstream sent.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Subscription {
    pub seats_in_use: Option<Value>,
    pub seats_entitled: Option<Value>,
    pub plan_type: Option<Value>,
    pub active_start: Option<Value>,
    pub active_until: Option<Value>,
    pub billing_period: Option<Value>,
    pub billing_currency: Option<Value>,
    pub will_renew: Option<Value>,
    pub is_delinquent: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InvitesPage {
    pub total: Option<Value>,
}

/// Merged view of the subscription and the pending invite total.
///
/// Every field is passed through as the upstream reported it; missing
/// values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionStats {
    pub seats_in_use: Option<Value>,
    pub seats_entitled: Option<Value>,
    pub pending_invites: Option<Value>,
    pub plan_type: Option<Value>,
    pub active_start: Option<Value>,
    pub active_until: Option<Value>,
    pub billing_period: Option<Value>,
    pub billing_currency: Option<Value>,
    pub will_renew: Option<Value>,
    pub is_delinquent: Option<Value>,
}

impl SubscriptionStats {
    pub fn merge(sub: Subscription, pending_invites: Option<Value>) -> Self {
        Self {
            seats_in_use: sub.seats_in_use,
            seats_entitled: sub.seats_entitled,
            pending_invites,
            plan_type: sub.plan_type,
            active_start: sub.active_start,
            active_until: sub.active_until,
            billing_period: sub.billing_period,
            billing_currency: sub.billing_currency,
            will_renew: sub.will_renew,
            is_delinquent: sub.is_delinquent,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub refresh: Option<String>,
}

impl StatsQuery {
    pub fn force_refresh(&self) -> bool {
        self.refresh.as_deref() == Some("1")
    }
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub success: bool,
    pub data: Option<SubscriptionStats>,
    pub expired: bool,
    pub updated_at: Option<Value>,
}
