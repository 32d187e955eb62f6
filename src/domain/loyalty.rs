use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Loyalty level assigned to a customer from accumulated points.
///
/// Variants are declared in ascending order so comparisons follow
/// bronze < silver < gold.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum CustomerLevel {
    Bronze,
    Silver,
    Gold,
}

impl Default for CustomerLevel {
    fn default() -> Self {
        Self::Bronze
    }
}

impl CustomerLevel {
    /// Discount percentage granted at this level.
    pub fn discount_percent(self) -> i32 {
        match self {
            Self::Bronze => 0,
            Self::Silver => 5,
            Self::Gold => 10,
        }
    }
}

impl From<&str> for CustomerLevel {
    fn from(value: &str) -> Self {
        match value {
            "silver" => Self::Silver,
            "gold" => Self::Gold,
            _ => Self::Bronze,
        }
    }
}

impl From<CustomerLevel> for &'static str {
    fn from(value: CustomerLevel) -> Self {
        match value {
            CustomerLevel::Bronze => "bronze",
            CustomerLevel::Silver => "silver",
            CustomerLevel::Gold => "gold",
        }
    }
}

/// Kind of event that changed a customer's points balance.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PointEvent {
    /// Points earned by a completed order.
    Order,
    /// Bonus granted to a referrer when their referral registered.
    Referral,
    /// Reversal applied to a referrer when the referral link was removed.
    ReferralRemoved,
    /// Discretionary bonus granted by staff.
    Bonus,
    /// Manual correction, positive or negative.
    Adjustment,
}

impl From<&str> for PointEvent {
    fn from(value: &str) -> Self {
        match value {
            "order" => Self::Order,
            "referral" => Self::Referral,
            "referral_removed" => Self::ReferralRemoved,
            "bonus" => Self::Bonus,
            _ => Self::Adjustment,
        }
    }
}

impl From<PointEvent> for &'static str {
    fn from(value: PointEvent) -> Self {
        match value {
            PointEvent::Order => "order",
            PointEvent::Referral => "referral",
            PointEvent::ReferralRemoved => "referral_removed",
            PointEvent::Bonus => "bonus",
            PointEvent::Adjustment => "adjustment",
        }
    }
}

/// Policy constants driving point awards and level thresholds.
///
/// Passed explicitly into every service and repository operation that
/// settles points; nothing reads these from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoyaltySettings {
    /// Currency units (smallest denomination) that earn one point.
    pub units_per_point: i64,
    /// Flat bonus granted to a referrer when their referral registers.
    pub referral_bonus: i32,
    /// Minimum points for the silver level.
    pub silver_threshold: i32,
    /// Minimum points for the gold level.
    pub gold_threshold: i32,
}

impl Default for LoyaltySettings {
    fn default() -> Self {
        Self {
            units_per_point: 1000,
            referral_bonus: 100,
            silver_threshold: 1000,
            gold_threshold: 5000,
        }
    }
}

impl LoyaltySettings {
    /// Level a customer with the given points balance belongs to.
    pub fn level_for(&self, points: i32) -> CustomerLevel {
        if points >= self.gold_threshold {
            CustomerLevel::Gold
        } else if points >= self.silver_threshold {
            CustomerLevel::Silver
        } else {
            CustomerLevel::Bronze
        }
    }

    /// Points earned by a completed order with the given total, rounded down.
    pub fn points_for_order(&self, total: i64) -> i32 {
        if total <= 0 || self.units_per_point <= 0 {
            return 0;
        }
        (total / self.units_per_point)
            .try_into()
            .unwrap_or(i32::MAX)
    }
}

/// Outcome of applying one point event to a customer.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    /// Customer whose balance was settled.
    pub customer_id: i32,
    /// Requested point delta for the event. History records this value
    /// even when the zero floor absorbed part of a deduction.
    pub delta: i32,
    /// Points balance after the event.
    pub points: i32,
    /// Level before the event.
    pub old_level: CustomerLevel,
    /// Level derived from the new balance.
    pub new_level: CustomerLevel,
}

impl Settlement {
    /// Whether the event moved the customer across a level boundary.
    pub fn level_changed(&self) -> bool {
        self.old_level != self.new_level
    }
}

/// Immutable audit record of one points change.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PointHistoryEntry {
    pub id: i32,
    pub customer_id: i32,
    /// Signed point delta recorded for the event.
    pub points: i32,
    pub event: PointEvent,
    /// Entity the event refers to (order id, referred customer id).
    pub related_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

/// Immutable audit record of one level transition.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LevelHistoryEntry {
    pub id: i32,
    pub customer_id: i32,
    pub old_level: CustomerLevel,
    pub new_level: CustomerLevel,
    /// Points balance at the moment of the transition.
    pub points: i32,
    pub changed_at: NaiveDateTime,
}
