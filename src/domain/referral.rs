use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::loyalty::Settlement;

/// Progress of a referral relationship.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReferralStatus {
    Pending,
    Completed,
}

impl Default for ReferralStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl From<&str> for ReferralStatus {
    fn from(value: &str) -> Self {
        match value {
            "completed" => Self::Completed,
            _ => Self::Pending,
        }
    }
}

impl From<ReferralStatus> for &'static str {
    fn from(value: ReferralStatus) -> Self {
        match value {
            ReferralStatus::Pending => "pending",
            ReferralStatus::Completed => "completed",
        }
    }
}

/// Link between a referrer and the customer they brought in.
///
/// Each customer has at most one active referral pointing at them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Referral {
    pub id: i32,
    /// Customer who made the referral and earned the bonus.
    pub referrer_id: i32,
    /// Customer who was referred.
    pub referred_id: i32,
    pub status: ReferralStatus,
    pub created_at: NaiveDateTime,
}

/// Settlements produced when a customer's referrer link changes.
#[derive(Debug, Serialize, Clone, Copy, Default)]
pub struct ReferralChange {
    /// Reversal applied to the previous referrer, if one was linked.
    pub removed: Option<Settlement>,
    /// Bonus applied to the new referrer, if one was linked.
    pub added: Option<Settlement>,
}

impl ReferralChange {
    /// Whether the edit touched the referral link at all.
    pub fn changed(&self) -> bool {
        self.removed.is_some() || self.added.is_some()
    }
}
