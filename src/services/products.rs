use serde::Deserialize;

use crate::domain::product::{Product, ProductListQuery};
use crate::forms::products::{AddProductForm, EditProductForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{ProductReader, ProductWriter};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the product list.
#[derive(Debug, Default, Deserialize)]
pub struct ProductsQuery {
    /// Search term matched against code, size, kind and color.
    pub search: Option<String>,
    pub page: Option<usize>,
}

/// Data needed to render the product list.
pub struct ProductsPageData {
    pub products: Paginated<Product>,
    pub search: Option<String>,
}

/// One product together with how many order lines reference it.
pub struct ProductDetails {
    pub product: Product,
    pub usage: i64,
}

/// Registers a catalog product. The repository assigns the code.
pub fn register_product<R>(repo: &R, form: AddProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    let new_product = form
        .into_new_product()
        .map_err(|e| ServiceError::Form(e.to_string()))?;

    match repo.create_product(&new_product) {
        Ok(product) => {
            log::info!("Product {} registered", product.code);
            Ok(product)
        }
        Err(err) => {
            log::error!("Failed to register product: {err}");
            Err(ServiceError::from(err))
        }
    }
}

/// Updates a catalog product. The code never changes.
pub fn modify_product<R>(repo: &R, form: EditProductForm) -> ServiceResult<Product>
where
    R: ProductWriter + ?Sized,
{
    let product_id = form.id;
    let updates = form
        .into_update_product()
        .map_err(|e| ServiceError::Form(e.to_string()))?;

    match repo.update_product(product_id, &updates) {
        Ok(product) => Ok(product),
        Err(err) => {
            log::error!("Failed to update product {product_id}: {err}");
            Err(ServiceError::from(err))
        }
    }
}

/// Deletes a product that no order line references.
pub fn remove_product<R>(repo: &R, product_id: i32) -> ServiceResult<()>
where
    R: ProductWriter + ?Sized,
{
    repo.delete_product(product_id).map_err(ServiceError::from)?;
    log::info!("Product {product_id} deleted");
    Ok(())
}

/// Loads one product with its usage count.
pub fn load_product<R>(repo: &R, product_id: i32) -> ServiceResult<ProductDetails>
where
    R: ProductReader + ?Sized,
{
    let product = repo
        .get_product_by_id(product_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let usage = repo.product_usage(product_id).map_err(ServiceError::from)?;

    Ok(ProductDetails { product, usage })
}

/// Returns one page of products matching the query.
pub fn load_products<R>(repo: &R, query: ProductsQuery) -> ServiceResult<ProductsPageData>
where
    R: ProductReader + ?Sized,
{
    let page = query.page.unwrap_or(1);
    let mut list_query = ProductListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = &query.search {
        list_query = list_query.search(term.as_str());
    }

    let (total, products) = repo.list_products(list_query).map_err(ServiceError::from)?;

    Ok(ProductsPageData {
        products: Paginated::new(products, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search: query.search,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use serde_json::Value;

    use super::*;
    use crate::domain::product::{NewProduct, UpdateProduct};
    use crate::repository::errors::{RepositoryError, RepositoryResult};
    use crate::repository::mock::{MockProductReader, MockProductWriter};

    struct FakeRepo {
        products: MockProductReader,
        writer: MockProductWriter,
    }

    impl FakeRepo {
        fn new() -> Self {
            Self {
                products: MockProductReader::new(),
                writer: MockProductWriter::new(),
            }
        }
    }

    impl ProductReader for FakeRepo {
        fn get_product_by_id(&self, id: i32) -> RepositoryResult<Option<Product>> {
            self.products.get_product_by_id(id)
        }

        fn get_products_by_ids(&self, ids: &[i32]) -> RepositoryResult<Vec<Product>> {
            self.products.get_products_by_ids(ids)
        }

        fn list_products(
            &self,
            query: ProductListQuery,
        ) -> RepositoryResult<(usize, Vec<Product>)> {
            self.products.list_products(query)
        }

        fn product_usage(&self, product_id: i32) -> RepositoryResult<i64> {
            self.products.product_usage(product_id)
        }
    }

    impl ProductWriter for FakeRepo {
        fn create_product(&self, new_product: &NewProduct) -> RepositoryResult<Product> {
            self.writer.create_product(new_product)
        }

        fn update_product(
            &self,
            product_id: i32,
            updates: &UpdateProduct,
        ) -> RepositoryResult<Product> {
            self.writer.update_product(product_id, updates)
        }

        fn delete_product(&self, product_id: i32) -> RepositoryResult<()> {
            self.writer.delete_product(product_id)
        }
    }

    fn datetime() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 10)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    fn sample_product(id: i32) -> Product {
        Product {
            id,
            code: format!("PRD-20240510-{id:04}"),
            size: "9x12".to_string(),
            kind: Some("canvas".to_string()),
            color: None,
            price: 40_000,
            default_discount: 0,
            description: None,
            created_at: datetime(),
            updated_at: datetime(),
        }
    }

    #[test]
    fn register_product_persists_sanitized_form() {
        let mut repo = FakeRepo::new();

        repo.writer
            .expect_create_product()
            .times(1)
            .withf(|new_product| {
                assert_eq!(new_product.size, "9x12");
                assert_eq!(new_product.kind.as_deref(), Some("canvas"));
                assert_eq!(new_product.price, 40_000);
                true
            })
            .returning(|_| Ok(sample_product(3)));

        let form = AddProductForm {
            size: "  9x12 ".to_string(),
            kind: Some(" canvas ".to_string()),
            color: None,
            price: 40_000,
            default_discount: 0,
            description: None,
        };

        let result = register_product(&repo, form);

        assert_eq!(result.expect("product should be created").id, 3);
    }

    #[test]
    fn register_product_rejects_invalid_form() {
        let repo = FakeRepo::new();

        let form = AddProductForm {
            size: "   ".to_string(),
            kind: None,
            color: None,
            price: 40_000,
            default_discount: 0,
            description: None,
        };

        let result = register_product(&repo, form);

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn modify_product_targets_the_given_id() {
        let mut repo = FakeRepo::new();

        repo.writer
            .expect_update_product()
            .times(1)
            .withf(|product_id, updates| {
                assert_eq!(*product_id, 3);
                assert_eq!(updates.price, 45_000);
                true
            })
            .returning(|product_id, _| {
                let mut product = sample_product(product_id);
                product.price = 45_000;
                Ok(product)
            });

        let form = EditProductForm {
            id: 3,
            size: "9x12".to_string(),
            kind: Some("canvas".to_string()),
            color: None,
            price: 45_000,
            default_discount: 0,
            description: None,
        };

        let result = modify_product(&repo, form);

        assert_eq!(result.expect("product should be updated").price, 45_000);
    }

    #[test]
    fn remove_product_maps_usage_conflict() {
        let mut repo = FakeRepo::new();

        repo.writer
            .expect_delete_product()
            .times(1)
            .returning(|_| {
                Err(RepositoryError::Conflict(
                    "product PRD-20240510-0003 is used by 2 order lines".to_string(),
                ))
            });

        let result = remove_product(&repo, 3);

        assert!(matches!(result, Err(ServiceError::Conflict(_))));
    }

    #[test]
    fn load_product_includes_usage() {
        let mut repo = FakeRepo::new();

        repo.products
            .expect_get_product_by_id()
            .times(1)
            .withf(|id| *id == 3)
            .returning(|id| Ok(Some(sample_product(id))));
        repo.products
            .expect_product_usage()
            .times(1)
            .withf(|id| *id == 3)
            .returning(|_| Ok(7));

        let result = load_product(&repo, 3);

        let details = result.expect("product should load");
        assert_eq!(details.product.id, 3);
        assert_eq!(details.usage, 7);
    }

    #[test]
    fn load_products_paginates_results() {
        let mut repo = FakeRepo::new();

        repo.products
            .expect_list_products()
            .times(1)
            .withf(|query| {
                assert_eq!(query.search.as_deref(), Some("canvas"));
                let pagination = query.pagination.expect("list is paginated");
                assert_eq!(pagination.page, 1);
                assert_eq!(pagination.per_page, DEFAULT_ITEMS_PER_PAGE);
                true
            })
            .returning(|_| Ok((1, vec![sample_product(3)])));

        let query = ProductsQuery {
            search: Some("canvas".to_string()),
            page: None,
        };

        let result = load_products(&repo, query);

        let data = result.expect("listing should succeed");
        let value = serde_json::to_value(&data.products).unwrap();
        assert_eq!(value.get("page").and_then(Value::as_u64), Some(1));
        assert_eq!(
            value
                .get("items")
                .and_then(Value::as_array)
                .and_then(|items| items.first())
                .and_then(|item| item.get("code"))
                .and_then(Value::as_str),
            Some("PRD-20240510-0003")
        );
    }
}
