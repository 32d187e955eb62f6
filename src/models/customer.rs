use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::customers)]
pub struct Customer {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub note: Option<String>,
    pub points: i32,
    pub level: String,
    pub referred_by: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::customers)]
pub struct NewCustomer<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub birth_date: Option<NaiveDate>,
    pub note: Option<&'a str>,
    pub referred_by: Option<i32>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::customers)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateCustomer<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub birth_date: Option<NaiveDate>,
    pub note: Option<&'a str>,
    pub referred_by: Option<i32>,
    pub updated_at: NaiveDateTime,
}

impl From<Customer> for DomainCustomer {
    fn from(value: Customer) -> Self {
        Self {
            id: value.id,
            first_name: value.first_name,
            last_name: value.last_name,
            phone: value.phone,
            birth_date: value.birth_date,
            note: value.note,
            points: value.points,
            level: value.level.as_str().into(),
            referred_by: value.referred_by,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainNewCustomer> for NewCustomer<'a> {
    fn from(value: &'a DomainNewCustomer) -> Self {
        Self {
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            phone: value.phone.as_str(),
            birth_date: value.birth_date,
            note: value.note.as_deref(),
            referred_by: value.referred_by,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateCustomer> for UpdateCustomer<'a> {
    fn from(value: &'a DomainUpdateCustomer) -> Self {
        Self {
            first_name: value.first_name.as_str(),
            last_name: value.last_name.as_str(),
            phone: value.phone.as_str(),
            birth_date: value.birth_date,
            note: value.note.as_deref(),
            referred_by: value.referred_by,
            updated_at: value.updated_at,
        }
    }
}
