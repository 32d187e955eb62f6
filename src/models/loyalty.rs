use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::loyalty::{
    LevelHistoryEntry as DomainLevelHistoryEntry, PointHistoryEntry as DomainPointHistoryEntry,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::point_history)]
pub struct PointHistoryEntry {
    pub id: i32,
    pub customer_id: i32,
    pub points: i32,
    pub event: String,
    pub related_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::point_history)]
pub struct NewPointHistoryEntry<'a> {
    pub customer_id: i32,
    pub points: i32,
    pub event: &'a str,
    pub related_id: Option<i32>,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::level_history)]
pub struct LevelHistoryEntry {
    pub id: i32,
    pub customer_id: i32,
    pub old_level: String,
    pub new_level: String,
    pub points: i32,
    pub changed_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::level_history)]
pub struct NewLevelHistoryEntry<'a> {
    pub customer_id: i32,
    pub old_level: &'a str,
    pub new_level: &'a str,
    pub points: i32,
}

impl From<PointHistoryEntry> for DomainPointHistoryEntry {
    fn from(value: PointHistoryEntry) -> Self {
        Self {
            id: value.id,
            customer_id: value.customer_id,
            points: value.points,
            event: value.event.as_str().into(),
            related_id: value.related_id,
            created_at: value.created_at,
        }
    }
}

impl From<LevelHistoryEntry> for DomainLevelHistoryEntry {
    fn from(value: LevelHistoryEntry) -> Self {
        Self {
            id: value.id,
            customer_id: value.customer_id,
            old_level: value.old_level.as_str().into(),
            new_level: value.new_level.as_str().into(),
            points: value.points,
            changed_at: value.changed_at,
        }
    }
}
