use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::loyalty::PointEvent;

/// Result type returned by the loyalty form helpers.
pub type LoyaltyFormResult<T> = Result<T, LoyaltyFormError>;

/// Errors that can occur while processing loyalty forms.
#[derive(Debug, Error)]
pub enum LoyaltyFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The requested delta would not change the balance.
    #[error("point adjustment cannot be zero")]
    ZeroDelta,
    /// Bonuses only ever add points.
    #[error("bonus points must be positive")]
    NegativeBonus,
}

/// Kinds of manual point events staff may record.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ManualEventKind {
    /// Discretionary gift, always positive.
    Bonus,
    /// Correction, positive or negative.
    Adjustment,
}

impl From<ManualEventKind> for PointEvent {
    fn from(value: ManualEventKind) -> Self {
        match value {
            ManualEventKind::Bonus => Self::Bonus,
            ManualEventKind::Adjustment => Self::Adjustment,
        }
    }
}

/// Validated manual point change ready for settlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointAdjustment {
    /// Customer whose balance is adjusted.
    pub customer_id: i32,
    /// Signed point delta to apply.
    pub delta: i32,
    /// Event kind recorded in the point history.
    pub event: PointEvent,
}

/// Form payload emitted when staff grant or correct points manually.
#[derive(Debug, Deserialize, Validate)]
pub struct AdjustPointsForm {
    /// Customer whose balance is adjusted.
    #[validate(range(min = 1))]
    pub customer_id: i32,
    /// Signed point delta requested by staff.
    pub points: i32,
    /// Whether this is a bonus grant or a correction.
    pub kind: ManualEventKind,
}

impl AdjustPointsForm {
    /// Validates the payload into a point adjustment.
    pub fn into_adjustment(self) -> LoyaltyFormResult<PointAdjustment> {
        self.validate()?;

        if self.points == 0 {
            return Err(LoyaltyFormError::ZeroDelta);
        }

        if self.kind == ManualEventKind::Bonus && self.points < 0 {
            return Err(LoyaltyFormError::NegativeBonus);
        }

        Ok(PointAdjustment {
            customer_id: self.customer_id,
            delta: self.points,
            event: self.kind.into(),
        })
    }
}
