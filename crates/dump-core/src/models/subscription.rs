//! Subscription tier, usage snapshot, and purchase verification payloads.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Trial,
    Paid,
    PreApproved,
}

impl SubscriptionTier {
    /// Paid and pre-approved accounts must not be offered a purchase.
    pub const fn has_active_subscription(self) -> bool {
        matches!(self, Self::Paid | Self::PreApproved)
    }

    pub const fn can_upgrade(self) -> bool {
        matches!(self, Self::Free | Self::Trial)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Trial => "trial",
            Self::Paid => "paid",
            Self::PreApproved => "pre_approved",
        }
    }
}

impl fmt::Display for SubscriptionTier {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// `GET /api/usage-status`. Server-authoritative; nothing here is derived
/// on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    #[serde(rename = "subscription_tier")]
    pub tier: SubscriptionTier,
    pub tokens_used: i64,
    #[serde(rename = "monthly_token_limit")]
    pub token_limit: i64,
    pub tokens_remaining: i64,
    #[serde(rename = "usage_percentage")]
    pub usage_pct: f64,
    pub is_blocked: bool,
    #[serde(default)]
    pub trial_ends_at: Option<String>,
    pub resets_at: String,
}

impl SubscriptionStatus {
    pub fn formatted_reset_date(&self) -> Option<String> {
        medium_date(&self.resets_at)
    }

    pub fn formatted_trial_end(&self) -> Option<String> {
        self.trial_ends_at.as_deref().and_then(medium_date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct VerifyPurchaseResponse {
    pub success: bool,
    pub subscription_tier: SubscriptionTier,
}

#[derive(Serialize)]
pub(crate) struct VerifyPurchaseRequest<'a> {
    pub signed_transaction: &'a str,
}

/// Store product metadata shown on the paywall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    pub id: String,
    pub display_name: String,
    pub display_price: String,
}

/// Platform transaction, already verified on-device.
#[derive(Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction_id: String,
    pub product_id: String,
    /// Signed representation forwarded to the backend.
    pub jws: String,
    pub revoked: bool,
}

impl fmt::Debug for SignedTransaction {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SignedTransaction")
            .field("transaction_id", &self.transaction_id)
            .field("product_id", &self.product_id)
            .field("jws", &"[REDACTED]")
            .field("revoked", &self.revoked)
            .finish()
    }
}

/// `Oct 19, 2026` style rendering of an RFC 3339 timestamp.
fn medium_date(raw: &str) -> Option<String> {
    DateTime::<FixedOffset>::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|date| date.format("%b %-d, %Y").to_string())
}
