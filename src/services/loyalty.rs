use crate::domain::loyalty::{
    LevelHistoryEntry, LoyaltySettings, PointHistoryEntry, Settlement,
};
use crate::forms::loyalty::AdjustPointsForm;
use crate::repository::{CustomerReader, LoyaltyReader, LoyaltyWriter};
use crate::services::{ServiceError, ServiceResult};

/// Applies a manual point event to a customer.
///
/// The balance is clamped at zero; the audit trail records the delta
/// that was requested, not the clamped movement.
pub fn adjust_points<R>(
    repo: &R,
    form: AdjustPointsForm,
    settings: &LoyaltySettings,
) -> ServiceResult<Settlement>
where
    R: CustomerReader + LoyaltyWriter + ?Sized,
{
    let adjustment = form
        .into_adjustment()
        .map_err(|e| ServiceError::Form(e.to_string()))?;

    repo.get_customer_by_id(adjustment.customer_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let settlement = match repo.apply_point_event(
        adjustment.customer_id,
        adjustment.delta,
        adjustment.event,
        None,
        settings,
    ) {
        Ok(settlement) => settlement,
        Err(err) => {
            log::error!(
                "Failed to adjust points for customer {}: {err}",
                adjustment.customer_id
            );
            return Err(ServiceError::from(err));
        }
    };

    let event: &str = adjustment.event.into();
    log::info!(
        "Manual {event} of {} points for customer {}",
        adjustment.delta,
        adjustment.customer_id
    );
    if settlement.level_changed() {
        let level: &str = settlement.new_level.into();
        log::info!(
            "Customer {} moved to the {level} level",
            settlement.customer_id
        );
    }

    Ok(settlement)
}

/// Returns the point audit trail for a customer, newest first.
pub fn load_point_history<R>(repo: &R, customer_id: i32) -> ServiceResult<Vec<PointHistoryEntry>>
where
    R: CustomerReader + LoyaltyReader + ?Sized,
{
    repo.get_customer_by_id(customer_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    repo.list_point_history(customer_id)
        .map_err(ServiceError::from)
}

/// Returns the level transitions for a customer, newest first.
pub fn load_level_history<R>(repo: &R, customer_id: i32) -> ServiceResult<Vec<LevelHistoryEntry>>
where
    R: CustomerReader + LoyaltyReader + ?Sized,
{
    repo.get_customer_by_id(customer_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    repo.list_level_history(customer_id)
        .map_err(ServiceError::from)
}
