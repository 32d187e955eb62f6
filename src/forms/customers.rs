use chrono::NaiveDate;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::customer::{NewCustomer, UpdateCustomer};
use crate::forms::{sanitize_inline_text, sanitize_multiline_text};

/// Maximum allowed length for a name part.
const NAME_MAX_LEN: usize = 64;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length for a staff note.
const NOTE_MAX_LEN: usize = 512;
const NOTE_MAX_LEN_VALIDATOR: u64 = NOTE_MAX_LEN as u64;

/// Phone numbers are `09` followed by nine digits.
const PHONE_LEN: usize = 11;
const PHONE_LEN_VALIDATOR: u64 = PHONE_LEN as u64;

/// Result type returned by the customer form helpers.
pub type CustomerFormResult<T> = Result<T, CustomerFormError>;

/// Errors that can occur while processing customer forms.
#[derive(Debug, Error)]
pub enum CustomerFormError {
    /// Validation failures from the `validator` crate.
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    /// A name part is empty after sanitization.
    #[error("customer name cannot be empty")]
    EmptyName,
    /// The phone number does not match the `09xxxxxxxxx` shape.
    #[error("invalid phone number `{value}`")]
    InvalidPhone { value: String },
    /// The birth date lies in the future.
    #[error("birth date cannot be in the future")]
    BirthDateInFuture,
    /// The edit would make a customer their own referrer.
    #[error("a customer cannot refer themselves")]
    SelfReferral,
}

/// Form payload emitted when registering a new customer.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterCustomerForm {
    /// First name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub first_name: String,
    /// Last name entered by the user.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub last_name: String,
    /// Mobile phone number, `09` followed by nine digits.
    #[validate(length(equal = PHONE_LEN_VALIDATOR))]
    pub phone: String,
    /// Optional birth date.
    pub birth_date: Option<NaiveDate>,
    /// Optional staff note.
    #[validate(length(max = NOTE_MAX_LEN_VALIDATOR))]
    pub note: Option<String>,
    /// Referrer chosen at registration time, already resolved to an id.
    #[validate(range(min = 1))]
    pub referred_by: Option<i32>,
}

impl RegisterCustomerForm {
    /// Validates and sanitizes the payload into a domain `NewCustomer`.
    pub fn into_new_customer(self, today: NaiveDate) -> CustomerFormResult<NewCustomer> {
        self.validate()?;

        let first_name = sanitize_inline_text(&self.first_name);
        let last_name = sanitize_inline_text(&self.last_name);
        if first_name.is_empty() || last_name.is_empty() {
            return Err(CustomerFormError::EmptyName);
        }

        let phone = sanitize_phone(&self.phone)?;

        if let Some(birth_date) = self.birth_date
            && birth_date > today
        {
            return Err(CustomerFormError::BirthDateInFuture);
        }

        let mut new_customer = NewCustomer::new(first_name, last_name, phone);

        if let Some(birth_date) = self.birth_date {
            new_customer = new_customer.with_birth_date(birth_date);
        }

        if let Some(note) = self
            .note
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty())
        {
            new_customer = new_customer.with_note(note);
        }

        if let Some(referrer_id) = self.referred_by {
            new_customer = new_customer.with_referrer(referrer_id);
        }

        Ok(new_customer)
    }
}

/// Form payload emitted when editing an existing customer.
#[derive(Debug, Deserialize, Validate)]
pub struct EditCustomerForm {
    /// Identifier of the customer to update.
    #[validate(range(min = 1))]
    pub id: i32,
    /// Updated first name.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub first_name: String,
    /// Updated last name.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub last_name: String,
    /// Updated phone number.
    #[validate(length(equal = PHONE_LEN_VALIDATOR))]
    pub phone: String,
    /// Updated birth date; `None` clears it.
    pub birth_date: Option<NaiveDate>,
    /// Updated staff note; empty or missing clears it.
    #[validate(length(max = NOTE_MAX_LEN_VALIDATOR))]
    pub note: Option<String>,
    /// Referrer after the edit; `None` clears an existing link.
    #[validate(range(min = 1))]
    pub referred_by: Option<i32>,
}

impl EditCustomerForm {
    /// Validates and sanitizes the payload into a domain `UpdateCustomer`.
    pub fn into_update_customer(self, today: NaiveDate) -> CustomerFormResult<UpdateCustomer> {
        self.validate()?;

        if self.referred_by == Some(self.id) {
            return Err(CustomerFormError::SelfReferral);
        }

        let first_name = sanitize_inline_text(&self.first_name);
        let last_name = sanitize_inline_text(&self.last_name);
        if first_name.is_empty() || last_name.is_empty() {
            return Err(CustomerFormError::EmptyName);
        }

        let phone = sanitize_phone(&self.phone)?;

        if let Some(birth_date) = self.birth_date
            && birth_date > today
        {
            return Err(CustomerFormError::BirthDateInFuture);
        }

        let note = self
            .note
            .as_deref()
            .map(sanitize_multiline_text)
            .filter(|value| !value.is_empty());

        Ok(UpdateCustomer {
            first_name,
            last_name,
            phone,
            birth_date: self.birth_date,
            note,
            referred_by: self.referred_by,
            updated_at: chrono::Utc::now().naive_utc(),
        })
    }
}

fn sanitize_phone(input: &str) -> CustomerFormResult<String> {
    let trimmed = input.trim();
    let valid = trimmed.len() == PHONE_LEN
        && trimmed.starts_with("09")
        && trimmed.chars().all(|ch| ch.is_ascii_digit());

    if !valid {
        return Err(CustomerFormError::InvalidPhone {
            value: trimmed.to_string(),
        });
    }

    Ok(trimmed.to_string())
}
