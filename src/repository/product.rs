use chrono::NaiveDate;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use rand::Rng;

use crate::domain::product::{
    NewProduct as DomainNewProduct, Product as DomainProduct, ProductListQuery,
    UpdateProduct as DomainUpdateProduct,
};
use crate::models::product::{
    NewProduct as DbNewProduct, Product as DbProduct, UpdateProduct as DbUpdateProduct,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProductReader, ProductWriter};

impl ProductReader for DieselRepository {
    fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<DomainProduct>> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let product = products::table
            .filter(products::id.eq(id))
            .first::<DbProduct>(&mut conn)
            .optional()?;

        Ok(product.map(Into::into))
    }

    fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<DomainProduct>> {
        use crate::schema::products;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = self.conn()?;
        let products = products::table
            .filter(products::id.eq_any(ids))
            .load::<DbProduct>(&mut conn)?;

        Ok(products.into_iter().map(Into::into).collect())
    }

    fn list_products(
        &self,
        query: ProductListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainProduct>)> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        let ProductListQuery { search, pagination } = query;

        let search_pattern = search.as_ref().map(|term| format!("%{}%", term));

        let mut count_query = products::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(
                products::size
                    .like(pattern.clone())
                    .or(products::kind.like(pattern.clone()))
                    .or(products::color.like(pattern.clone()))
                    .or(products::code.like(pattern.clone())),
            );
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = products::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref pattern) = search_pattern {
            items = items.filter(
                products::size
                    .like(pattern.clone())
                    .or(products::kind.like(pattern.clone()))
                    .or(products::color.like(pattern.clone()))
                    .or(products::code.like(pattern.clone())),
            );
        }

        items = items.order(products::created_at.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_products = items.load::<DbProduct>(&mut conn)?;

        Ok((total, db_products.into_iter().map(Into::into).collect()))
    }

    fn product_usage(&self, product_id: i32) -> RepositoryResult<i64> {
        use crate::schema::order_items;

        let mut conn = self.conn()?;
        let usage = order_items::table
            .filter(order_items::product_id.eq(product_id))
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(usage)
    }
}

impl ProductWriter for DieselRepository {
    fn create_product(&self, new_product: &DomainNewProduct) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;

        conn.transaction::<DomainProduct, RepositoryError, _>(|conn| {
            let today = chrono::Utc::now().date_naive();
            let mut rng = rand::thread_rng();

            // Regenerate on collision; the unique index on `code` backs
            // this up if a concurrent insert wins the race.
            let mut code = generate_product_code(&mut rng, today);
            while code_exists(conn, &code)? {
                code = generate_product_code(&mut rng, today);
            }

            let db_new = DbNewProduct::from_domain(&code, new_product);

            let created = diesel::insert_into(products::table)
                .values(&db_new)
                .get_result::<DbProduct>(conn)?;

            Ok(created.into())
        })
    }

    fn update_product(
        &self,
        product_id: i32,
        updates: &DomainUpdateProduct,
    ) -> RepositoryResult<DomainProduct> {
        use crate::schema::products;

        let mut conn = self.conn()?;
        let db_updates = DbUpdateProduct::from(updates);

        let updated = diesel::update(products::table.filter(products::id.eq(product_id)))
            .set(&db_updates)
            .get_result::<DbProduct>(&mut conn)?;

        Ok(updated.into())
    }

    fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
        use crate::schema::{order_items, products};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let product = products::table
                .filter(products::id.eq(product_id))
                .first::<DbProduct>(conn)?;

            let usage = order_items::table
                .filter(order_items::product_id.eq(product_id))
                .count()
                .get_result::<i64>(conn)?;

            if usage > 0 {
                return Err(RepositoryError::Conflict(format!(
                    "product {} is used by {usage} order lines",
                    product.code
                )));
            }

            diesel::delete(products::table.filter(products::id.eq(product_id))).execute(conn)?;

            Ok(())
        })
    }
}

/// Catalog code in the `PRD-YYYYMMDD-NNNN` shape.
fn generate_product_code<R: Rng>(rng: &mut R, today: NaiveDate) -> String {
    format!(
        "PRD-{}-{:04}",
        today.format("%Y%m%d"),
        rng.gen_range(1..=9999)
    )
}

fn code_exists(conn: &mut SqliteConnection, code: &str) -> RepositoryResult<bool> {
    use crate::schema::products;

    let found: bool = select(exists(products::table.filter(products::code.eq(code))))
        .get_result(conn)?;

    Ok(found)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_codes_follow_the_expected_shape() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        let mut rng = rand::thread_rng();

        for _ in 0..50 {
            let code = generate_product_code(&mut rng, today);
            assert!(code.starts_with("PRD-20240501-"));
            assert_eq!(code.len(), "PRD-20240501-0000".len());
            let digits = &code["PRD-20240501-".len()..];
            assert!(digits.chars().all(|ch| ch.is_ascii_digit()));
        }
    }
}
