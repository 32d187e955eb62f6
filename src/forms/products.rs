use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::product::{NewProduct, UpdateProduct};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for the size field.
const SIZE_MAX_LEN: usize = 64;
const SIZE_MAX_LEN_VALIDATOR: u64 = SIZE_MAX_LEN as u64;

/// Maximum allowed length for the kind and color fields.
const ATTR_MAX_LEN: usize = 64;
const ATTR_MAX_LEN_VALIDATOR: u64 = ATTR_MAX_LEN as u64;

/// Maximum allowed length for a product description.
const DESCRIPTION_MAX_LEN: usize = 512;
const DESCRIPTION_MAX_LEN_VALIDATOR: u64 = DESCRIPTION_MAX_LEN as u64;

/// Discounts are percentages.
const DISCOUNT_MAX: i32 = 100;

/// Result type returned by the product form helpers.
pub type ProductFormResult<T> = Result<T, ProductFormError>;

/// Errors that can occur while processing product forms.
#[derive(Debug, Error)]
pub enum ProductFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// The provided size is empty after sanitization.
    #[error("product size cannot be empty")]
    EmptySize,
}

/// Form payload emitted when submitting the "Add product" form.
///
/// The unique product code is generated at insert time, never entered
/// by the user.
#[derive(Debug, Deserialize, Validate)]
pub struct AddProductForm {
    /// Size or dimensions entered by the user.
    #[validate(length(min = 1, max = SIZE_MAX_LEN_VALIDATOR))]
    pub size: String,
    /// Optional product kind.
    #[validate(length(max = ATTR_MAX_LEN_VALIDATOR))]
    pub kind: Option<String>,
    /// Optional color.
    #[validate(length(max = ATTR_MAX_LEN_VALIDATOR))]
    pub color: Option<String>,
    /// Price per unit in smallest currency units.
    #[validate(range(min = 0))]
    pub price: i64,
    /// Default discount percentage suggested for this product.
    #[validate(range(min = 0, max = DISCOUNT_MAX))]
    pub default_discount: i32,
    /// Optional longer description.
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    pub description: Option<String>,
}

impl AddProductForm {
    /// Validates and sanitizes the payload into a domain `NewProduct`.
    pub fn into_new_product(self) -> ProductFormResult<NewProduct> {
        self.validate()?;

        let sanitized_size = sanitize_inline_text(&self.size);
        if sanitized_size.is_empty() {
            return Err(ProductFormError::EmptySize);
        }

        let mut new_product =
            NewProduct::new(sanitized_size, self.price).with_default_discount(self.default_discount);

        if let Some(kind) = self
            .kind
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|value| !value.is_empty())
        {
            new_product = new_product.with_kind(kind);
        }

        if let Some(color) = self
            .color
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|value| !value.is_empty())
        {
            new_product = new_product.with_color(color);
        }

        if let Some(description) = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            new_product = new_product.with_description(description);
        }

        Ok(new_product)
    }
}

/// Form payload emitted when editing an existing product.
///
/// The generated code never changes after creation, so it is absent
/// here.
#[derive(Debug, Deserialize, Validate)]
pub struct EditProductForm {
    /// Identifier of the product to update.
    #[validate(range(min = 1))]
    pub id: i32,
    /// Updated size or dimensions.
    #[validate(length(min = 1, max = SIZE_MAX_LEN_VALIDATOR))]
    pub size: String,
    /// Updated kind; empty or missing clears it.
    #[validate(length(max = ATTR_MAX_LEN_VALIDATOR))]
    pub kind: Option<String>,
    /// Updated color; empty or missing clears it.
    #[validate(length(max = ATTR_MAX_LEN_VALIDATOR))]
    pub color: Option<String>,
    /// Updated price per unit in smallest currency units.
    #[validate(range(min = 0))]
    pub price: i64,
    /// Updated default discount percentage.
    #[validate(range(min = 0, max = DISCOUNT_MAX))]
    pub default_discount: i32,
    /// Updated description; empty or missing clears it.
    #[validate(length(max = DESCRIPTION_MAX_LEN_VALIDATOR))]
    pub description: Option<String>,
}

impl EditProductForm {
    /// Validates and sanitizes the payload into a domain `UpdateProduct`.
    pub fn into_update_product(self) -> ProductFormResult<UpdateProduct> {
        self.validate()?;

        let sanitized_size = sanitize_inline_text(&self.size);
        if sanitized_size.is_empty() {
            return Err(ProductFormError::EmptySize);
        }

        let kind = self
            .kind
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|value| !value.is_empty());

        let color = self
            .color
            .as_deref()
            .map(sanitize_inline_text)
            .filter(|value| !value.is_empty());

        let description = self
            .description
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());

        Ok(UpdateProduct {
            size: sanitized_size,
            kind,
            color,
            price: self.price,
            default_discount: self.default_discount,
            description,
            updated_at: chrono::Utc::now().naive_utc(),
        })
    }
}
