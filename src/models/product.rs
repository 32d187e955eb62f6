use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, UpdateProduct as DomainUpdateProduct,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::products)]
pub struct Product {
    pub id: i32,
    pub code: String,
    pub size: String,
    pub kind: Option<String>,
    pub color: Option<String>,
    pub price: i64,
    pub default_discount: i32,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::products)]
pub struct NewProduct<'a> {
    pub code: &'a str,
    pub size: &'a str,
    pub kind: Option<&'a str>,
    pub color: Option<&'a str>,
    pub price: i64,
    pub default_discount: i32,
    pub description: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProduct<'a> {
    pub size: &'a str,
    pub kind: Option<&'a str>,
    pub color: Option<&'a str>,
    pub price: i64,
    pub default_discount: i32,
    pub description: Option<&'a str>,
    pub updated_at: NaiveDateTime,
}

impl From<Product> for DomainProduct {
    fn from(value: Product) -> Self {
        Self {
            id: value.id,
            code: value.code,
            size: value.size,
            kind: value.kind,
            color: value.color,
            price: value.price,
            default_discount: value.default_discount,
            description: value.description,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}

impl<'a> NewProduct<'a> {
    /// Pair a generated code with the insert payload.
    pub fn from_domain(code: &'a str, value: &'a DomainNewProduct) -> Self {
        Self {
            code,
            size: value.size.as_str(),
            kind: value.kind.as_deref(),
            color: value.color.as_deref(),
            price: value.price,
            default_discount: value.default_discount,
            description: value.description.as_deref(),
            updated_at: value.updated_at,
        }
    }
}

impl<'a> From<&'a DomainUpdateProduct> for UpdateProduct<'a> {
    fn from(value: &'a DomainUpdateProduct) -> Self {
        Self {
            size: value.size.as_str(),
            kind: value.kind.as_deref(),
            color: value.color.as_deref(),
            price: value.price,
            default_discount: value.default_discount,
            description: value.description.as_deref(),
            updated_at: value.updated_at,
        }
    }
}
