use chrono::Utc;
use serde::Deserialize;

use crate::domain::customer::{Customer, CustomerListQuery};
use crate::domain::loyalty::{
    CustomerLevel, LevelHistoryEntry, LoyaltySettings, PointHistoryEntry, Settlement,
};
use crate::domain::order::{Order, OrderListQuery};
use crate::domain::referral::{Referral, ReferralChange};
use crate::forms::customers::{EditCustomerForm, RegisterCustomerForm};
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{CustomerReader, CustomerWriter, LoyaltyReader, OrderReader, ReferralReader};
use crate::services::{ServiceError, ServiceResult};

/// Query parameters accepted by the customer list.
#[derive(Debug, Default, Deserialize)]
pub struct CustomersQuery {
    /// Search term matched against names and phone.
    pub search: Option<String>,
    /// Restrict the list to one loyalty level.
    pub level: Option<CustomerLevel>,
    pub page: Option<usize>,
}

/// Data needed to render the customer list.
pub struct CustomersPageData {
    pub customers: Paginated<Customer>,
    pub search: Option<String>,
    pub level: Option<CustomerLevel>,
}

/// Outcome of a successful registration.
pub struct RegistrationOutcome {
    pub customer: Customer,
    /// Bonus settled for the referrer when the registration named one.
    pub referrer_settlement: Option<Settlement>,
}

/// Outcome of a successful customer edit.
pub struct CustomerEditOutcome {
    pub customer: Customer,
    /// Settlements produced when the edit rewired the referral link.
    pub referral_change: ReferralChange,
}

/// Everything the customer profile view shows.
#[derive(Debug)]
pub struct CustomerProfile {
    pub customer: Customer,
    pub orders: Vec<Order>,
    /// Referral that brought this customer in, when one exists.
    pub referred_via: Option<Referral>,
    /// Referrals this customer has made.
    pub referrals: Vec<Referral>,
    pub point_history: Vec<PointHistoryEntry>,
    pub level_history: Vec<LevelHistoryEntry>,
}

/// Lookup key staff supply to identify a referrer at registration time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferrerLookup {
    Phone(String),
    Name {
        first_name: String,
        last_name: String,
    },
}

/// Registers a new customer and settles the referral bonus when a
/// referrer is linked.
pub fn register_customer<R>(
    repo: &R,
    form: RegisterCustomerForm,
    settings: &LoyaltySettings,
) -> ServiceResult<RegistrationOutcome>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    let today = Utc::now().date_naive();
    let new_customer = form
        .into_new_customer(today)
        .map_err(|e| ServiceError::Form(e.to_string()))?;

    if let Some(existing) = repo
        .get_customer_by_phone(&new_customer.phone)
        .map_err(ServiceError::from)?
    {
        return Err(ServiceError::Conflict(format!(
            "phone {} already belongs to customer {}",
            new_customer.phone, existing.id
        )));
    }

    if let Some(referrer_id) = new_customer.referred_by
        && repo
            .get_customer_by_id(referrer_id)
            .map_err(ServiceError::from)?
            .is_none()
    {
        return Err(ServiceError::Form(format!(
            "referrer {referrer_id} does not exist"
        )));
    }

    let (customer, referrer_settlement) = match repo.create_customer(&new_customer, settings) {
        Ok(result) => result,
        Err(err) => {
            log::error!("Failed to register customer {}: {err}", new_customer.phone);
            return Err(ServiceError::from(err));
        }
    };

    if let Some(settlement) = &referrer_settlement {
        log::info!(
            "Referral bonus of {} points settled for customer {}",
            settlement.delta,
            settlement.customer_id
        );
    }

    Ok(RegistrationOutcome {
        customer,
        referrer_settlement,
    })
}

/// Updates a customer, settling referral bonuses when the edit changes
/// who referred them.
pub fn modify_customer<R>(
    repo: &R,
    form: EditCustomerForm,
    settings: &LoyaltySettings,
) -> ServiceResult<CustomerEditOutcome>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    let customer_id = form.id;
    let today = Utc::now().date_naive();
    let updates = form
        .into_update_customer(today)
        .map_err(|e| ServiceError::Form(e.to_string()))?;

    if let Some(existing) = repo
        .get_customer_by_phone(&updates.phone)
        .map_err(ServiceError::from)?
        && existing.id != customer_id
    {
        return Err(ServiceError::Conflict(format!(
            "phone {} already belongs to customer {}",
            updates.phone, existing.id
        )));
    }

    if let Some(referrer_id) = updates.referred_by
        && repo
            .get_customer_by_id(referrer_id)
            .map_err(ServiceError::from)?
            .is_none()
    {
        return Err(ServiceError::Form(format!(
            "referrer {referrer_id} does not exist"
        )));
    }

    let (customer, referral_change) = match repo.update_customer(customer_id, &updates, settings) {
        Ok(result) => result,
        Err(err) => {
            log::error!("Failed to update customer {customer_id}: {err}");
            return Err(ServiceError::from(err));
        }
    };

    if referral_change.changed() {
        log::info!("Referral link for customer {customer_id} was rewired");
    }

    Ok(CustomerEditOutcome {
        customer,
        referral_change,
    })
}

/// Deletes a customer with no orders and no referrals made.
///
/// Points already granted to this customer's referrer stay in place.
pub fn remove_customer<R>(repo: &R, customer_id: i32) -> ServiceResult<()>
where
    R: CustomerReader + CustomerWriter + ?Sized,
{
    let links = repo.customer_links(customer_id).map_err(ServiceError::from)?;
    if links.blocks_delete() {
        return Err(ServiceError::Conflict(format!(
            "customer {customer_id} is linked to {} orders and {} referrals",
            links.orders, links.outgoing_referrals
        )));
    }

    repo.delete_customer(customer_id).map_err(ServiceError::from)?;
    log::info!("Customer {customer_id} deleted");
    Ok(())
}

/// Returns one page of customers matching the query.
pub fn load_customers<R>(repo: &R, query: CustomersQuery) -> ServiceResult<CustomersPageData>
where
    R: CustomerReader + ?Sized,
{
    let page = query.page.unwrap_or(1);
    let mut list_query = CustomerListQuery::new().paginate(page, DEFAULT_ITEMS_PER_PAGE);

    if let Some(term) = &query.search {
        list_query = list_query.search(term.as_str());
    }
    if let Some(level) = query.level {
        list_query = list_query.level(level);
    }

    let (total, customers) = repo.list_customers(list_query).map_err(ServiceError::from)?;

    Ok(CustomersPageData {
        customers: Paginated::new(customers, page, total.div_ceil(DEFAULT_ITEMS_PER_PAGE)),
        search: query.search,
        level: query.level,
    })
}

/// Assembles the full profile for one customer.
pub fn load_customer_profile<R>(repo: &R, customer_id: i32) -> ServiceResult<CustomerProfile>
where
    R: CustomerReader + OrderReader + ReferralReader + LoyaltyReader + ?Sized,
{
    let customer = repo
        .get_customer_by_id(customer_id)
        .map_err(ServiceError::from)?
        .ok_or(ServiceError::NotFound)?;

    let (_, orders) = repo
        .list_orders(OrderListQuery::new().customer_id(customer_id))
        .map_err(ServiceError::from)?;
    let referred_via = repo
        .get_referral_for(customer_id)
        .map_err(ServiceError::from)?;
    let referrals = repo
        .list_referrals_by(customer_id)
        .map_err(ServiceError::from)?;
    let point_history = repo
        .list_point_history(customer_id)
        .map_err(ServiceError::from)?;
    let level_history = repo
        .list_level_history(customer_id)
        .map_err(ServiceError::from)?;

    Ok(CustomerProfile {
        customer,
        orders,
        referred_via,
        referrals,
        point_history,
        level_history,
    })
}

/// Resolves a referrer lookup to exactly one customer.
///
/// Phone lookups are exact. Name lookups fail with a conflict when the
/// name is ambiguous, so staff can fall back to the phone number.
pub fn resolve_referrer<R>(repo: &R, lookup: ReferrerLookup) -> ServiceResult<Customer>
where
    R: CustomerReader + ?Sized,
{
    match lookup {
        ReferrerLookup::Phone(phone) => repo
            .get_customer_by_phone(phone.trim())
            .map_err(ServiceError::from)?
            .ok_or(ServiceError::NotFound),
        ReferrerLookup::Name {
            first_name,
            last_name,
        } => {
            let mut matches = repo
                .find_customers_by_name(first_name.trim(), last_name.trim())
                .map_err(ServiceError::from)?;

            match matches.len() {
                0 => Err(ServiceError::NotFound),
                1 => Ok(matches.remove(0)),
                count => Err(ServiceError::Conflict(format!(
                    "{count} customers are named {} {}",
                    first_name.trim(),
                    last_name.trim()
                ))),
            }
        }
    }
}
