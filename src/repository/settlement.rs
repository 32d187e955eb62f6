use diesel::prelude::*;

use crate::domain::loyalty::{
    CustomerLevel, LevelHistoryEntry as DomainLevelHistoryEntry, LoyaltySettings, PointEvent,
    PointHistoryEntry as DomainPointHistoryEntry, Settlement,
};
use crate::models::customer::Customer as DbCustomer;
use crate::models::loyalty::{
    LevelHistoryEntry as DbLevelHistoryEntry, NewLevelHistoryEntry as DbNewLevelHistoryEntry,
    NewPointHistoryEntry as DbNewPointHistoryEntry, PointHistoryEntry as DbPointHistoryEntry,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, LoyaltyReader, LoyaltyWriter};

/// Applies one point event to a customer inside the caller's transaction.
///
/// Balance change, point-history row and level recomputation commit or
/// roll back together with whatever else the caller does. Deductions
/// clamp the balance at zero; the history row records the requested
/// delta, not the clamped effect.
pub(crate) fn settle(
    conn: &mut SqliteConnection,
    customer_id: i32,
    delta: i32,
    event: PointEvent,
    related_id: Option<i32>,
    settings: &LoyaltySettings,
) -> RepositoryResult<Settlement> {
    use crate::schema::{customers, level_history, point_history};

    let customer = customers::table
        .filter(customers::id.eq(customer_id))
        .first::<DbCustomer>(conn)?;

    let old_level = CustomerLevel::from(customer.level.as_str());
    let points = customer.points.saturating_add(delta).max(0);
    let new_level = settings.level_for(points);

    diesel::update(customers::table.filter(customers::id.eq(customer_id)))
        .set((
            customers::points.eq(points),
            customers::level.eq(<&str>::from(new_level)),
            customers::updated_at.eq(diesel::dsl::now),
        ))
        .execute(conn)?;

    diesel::insert_into(point_history::table)
        .values(&DbNewPointHistoryEntry {
            customer_id,
            points: delta,
            event: event.into(),
            related_id,
        })
        .execute(conn)?;

    if new_level != old_level {
        diesel::insert_into(level_history::table)
            .values(&DbNewLevelHistoryEntry {
                customer_id,
                old_level: old_level.into(),
                new_level: new_level.into(),
                points,
            })
            .execute(conn)?;
    }

    Ok(Settlement {
        customer_id,
        delta,
        points,
        old_level,
        new_level,
    })
}

impl LoyaltyWriter for DieselRepository {
    fn apply_point_event(
        &self,
        customer_id: i32,
        delta: i32,
        event: PointEvent,
        related_id: Option<i32>,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<Settlement> {
        let mut conn = self.conn()?;

        conn.transaction::<Settlement, RepositoryError, _>(|conn| {
            settle(conn, customer_id, delta, event, related_id, settings)
        })
    }
}

impl LoyaltyReader for DieselRepository {
    fn list_point_history(
        &self,
        customer_id: i32,
    ) -> RepositoryResult<Vec<DomainPointHistoryEntry>> {
        use crate::schema::point_history;

        let mut conn = self.conn()?;
        let rows = point_history::table
            .filter(point_history::customer_id.eq(customer_id))
            .order((point_history::created_at.desc(), point_history::id.desc()))
            .load::<DbPointHistoryEntry>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    fn list_level_history(
        &self,
        customer_id: i32,
    ) -> RepositoryResult<Vec<DomainLevelHistoryEntry>> {
        use crate::schema::level_history;

        let mut conn = self.conn()?;
        let rows = level_history::table
            .filter(level_history::customer_id.eq(customer_id))
            .order((level_history::changed_at.desc(), level_history::id.desc()))
            .load::<DbLevelHistoryEntry>(&mut conn)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
