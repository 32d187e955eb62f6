use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::referral::Referral as DomainReferral;

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::referrals)]
pub struct Referral {
    pub id: i32,
    pub referrer_id: i32,
    pub referred_id: i32,
    pub status: String,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::referrals)]
pub struct NewReferral<'a> {
    pub referrer_id: i32,
    pub referred_id: i32,
    pub status: &'a str,
}

impl From<Referral> for DomainReferral {
    fn from(value: Referral) -> Self {
        Self {
            id: value.id,
            referrer_id: value.referrer_id,
            referred_id: value.referred_id,
            status: value.status.as_str().into(),
            created_at: value.created_at,
        }
    }
}
