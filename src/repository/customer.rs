use diesel::dsl::{exists, select};
use diesel::prelude::*;

use crate::domain::customer::{
    Customer as DomainCustomer, CustomerLinks, CustomerListQuery, NewCustomer as DomainNewCustomer,
    UpdateCustomer as DomainUpdateCustomer,
};
use crate::domain::loyalty::{LoyaltySettings, PointEvent, Settlement};
use crate::domain::referral::{Referral as DomainReferral, ReferralChange, ReferralStatus};
use crate::models::customer::{
    Customer as DbCustomer, NewCustomer as DbNewCustomer, UpdateCustomer as DbUpdateCustomer,
};
use crate::models::referral::{NewReferral as DbNewReferral, Referral as DbReferral};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::settlement::settle;
use crate::repository::{CustomerReader, CustomerWriter, DieselRepository, ReferralReader};

impl CustomerReader for DieselRepository {
    fn get_customer_by_id(&self, id: i32) -> RepositoryResult<Option<DomainCustomer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::id.eq(id))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn get_customer_by_phone(&self, phone: &str) -> RepositoryResult<Option<DomainCustomer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let customer = customers::table
            .filter(customers::phone.eq(phone))
            .first::<DbCustomer>(&mut conn)
            .optional()?;

        Ok(customer.map(Into::into))
    }

    fn find_customers_by_name(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> RepositoryResult<Vec<DomainCustomer>> {
        use crate::schema::customers;

        let mut conn = self.conn()?;
        let customers = customers::table
            .filter(customers::first_name.eq(first_name))
            .filter(customers::last_name.eq(last_name))
            .order(customers::id.asc())
            .load::<DbCustomer>(&mut conn)?;

        Ok(customers.into_iter().map(Into::into).collect())
    }

    fn list_customers(
        &self,
        query: CustomerListQuery,
    ) -> RepositoryResult<(usize, Vec<DomainCustomer>)> {
        use crate::schema::customers;

        let mut conn = self.conn()?;

        let CustomerListQuery {
            search,
            level,
            pagination,
        } = query;

        let search_pattern = search.as_ref().map(|term| format!("%{}%", term));
        let level_filter = level.map(<&str>::from);

        let mut count_query = customers::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref pattern) = search_pattern {
            count_query = count_query.filter(
                customers::first_name
                    .like(pattern.clone())
                    .or(customers::last_name.like(pattern.clone()))
                    .or(customers::phone.like(pattern.clone())),
            );
        }

        if let Some(level_value) = level_filter {
            count_query = count_query.filter(customers::level.eq(level_value));
        }

        let total = count_query.count().get_result::<i64>(&mut conn)? as usize;

        let mut items = customers::table.into_boxed::<diesel::sqlite::Sqlite>();

        if let Some(ref pattern) = search_pattern {
            items = items.filter(
                customers::first_name
                    .like(pattern.clone())
                    .or(customers::last_name.like(pattern.clone()))
                    .or(customers::phone.like(pattern.clone())),
            );
        }

        if let Some(level_value) = level_filter {
            items = items.filter(customers::level.eq(level_value));
        }

        items = items.order(customers::created_at.desc());

        if let Some(pagination) = pagination {
            let offset = ((pagination.page.max(1) - 1) * pagination.per_page) as i64;
            let limit = pagination.per_page as i64;
            items = items.offset(offset).limit(limit);
        }

        let db_customers = items.load::<DbCustomer>(&mut conn)?;

        Ok((total, db_customers.into_iter().map(Into::into).collect()))
    }

    fn customer_links(&self, customer_id: i32) -> RepositoryResult<CustomerLinks> {
        let mut conn = self.conn()?;
        links_for(&mut conn, customer_id)
    }
}

impl CustomerWriter for DieselRepository {
    fn create_customer(
        &self,
        new_customer: &DomainNewCustomer,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<(DomainCustomer, Option<Settlement>)> {
        use crate::schema::{customers, referrals};

        let mut conn = self.conn()?;

        conn.transaction::<(DomainCustomer, Option<Settlement>), RepositoryError, _>(|conn| {
            if let Some(referrer_id) = new_customer.referred_by {
                ensure_customer_exists(conn, referrer_id)?;
            }

            let db_new = DbNewCustomer::from(new_customer);

            let created = diesel::insert_into(customers::table)
                .values(&db_new)
                .get_result::<DbCustomer>(conn)?;

            let settlement = match new_customer.referred_by {
                Some(referrer_id) => {
                    diesel::insert_into(referrals::table)
                        .values(&DbNewReferral {
                            referrer_id,
                            referred_id: created.id,
                            status: ReferralStatus::default().into(),
                        })
                        .execute(conn)?;

                    Some(settle(
                        conn,
                        referrer_id,
                        settings.referral_bonus,
                        PointEvent::Referral,
                        Some(created.id),
                        settings,
                    )?)
                }
                None => None,
            };

            Ok((created.into(), settlement))
        })
    }

    fn update_customer(
        &self,
        customer_id: i32,
        updates: &DomainUpdateCustomer,
        settings: &LoyaltySettings,
    ) -> RepositoryResult<(DomainCustomer, ReferralChange)> {
        use crate::schema::{customers, referrals};

        let mut conn = self.conn()?;

        conn.transaction::<(DomainCustomer, ReferralChange), RepositoryError, _>(|conn| {
            let current = customers::table
                .filter(customers::id.eq(customer_id))
                .first::<DbCustomer>(conn)?;

            let referrer_changed = current.referred_by != updates.referred_by;

            if referrer_changed {
                if let Some(new_referrer) = updates.referred_by {
                    ensure_customer_exists(conn, new_referrer)?;
                }
            }

            let db_updates = DbUpdateCustomer::from(updates);

            let updated = diesel::update(customers::table.filter(customers::id.eq(customer_id)))
                .set(&db_updates)
                .get_result::<DbCustomer>(conn)?;

            let mut change = ReferralChange::default();

            if referrer_changed {
                if let Some(old_referrer) = current.referred_by {
                    diesel::delete(
                        referrals::table
                            .filter(referrals::referred_id.eq(customer_id))
                            .filter(referrals::referrer_id.eq(old_referrer)),
                    )
                    .execute(conn)?;

                    change.removed = Some(settle(
                        conn,
                        old_referrer,
                        -settings.referral_bonus,
                        PointEvent::ReferralRemoved,
                        Some(customer_id),
                        settings,
                    )?);
                }

                if let Some(new_referrer) = updates.referred_by {
                    diesel::insert_into(referrals::table)
                        .values(&DbNewReferral {
                            referrer_id: new_referrer,
                            referred_id: customer_id,
                            status: ReferralStatus::default().into(),
                        })
                        .execute(conn)?;

                    change.added = Some(settle(
                        conn,
                        new_referrer,
                        settings.referral_bonus,
                        PointEvent::Referral,
                        Some(customer_id),
                        settings,
                    )?);
                }
            }

            Ok((updated.into(), change))
        })
    }

    fn delete_customer(&self, customer_id: i32) -> RepositoryResult<()> {
        use crate::schema::{customers, referrals};

        let mut conn = self.conn()?;

        conn.transaction::<(), RepositoryError, _>(|conn| {
            let links = links_for(conn, customer_id)?;

            if links.orders > 0 {
                return Err(RepositoryError::Conflict(format!(
                    "customer {customer_id} has {} orders",
                    links.orders
                )));
            }

            if links.outgoing_referrals > 0 {
                return Err(RepositoryError::Conflict(format!(
                    "customer {customer_id} has {} referrals",
                    links.outgoing_referrals
                )));
            }

            // Incoming referral rows go with the customer; their referrers
            // keep the points already granted.
            diesel::delete(referrals::table.filter(referrals::referred_id.eq(customer_id)))
                .execute(conn)?;

            let deleted =
                diesel::delete(customers::table.filter(customers::id.eq(customer_id)))
                    .execute(conn)?;

            if deleted == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(())
        })
    }
}

impl ReferralReader for DieselRepository {
    fn get_referral_for(&self, referred_id: i32) -> RepositoryResult<Option<DomainReferral>> {
        use crate::schema::referrals;

        let mut conn = self.conn()?;
        let referral = referrals::table
            .filter(referrals::referred_id.eq(referred_id))
            .first::<DbReferral>(&mut conn)
            .optional()?;

        Ok(referral.map(Into::into))
    }

    fn list_referrals_by(&self, referrer_id: i32) -> RepositoryResult<Vec<DomainReferral>> {
        use crate::schema::referrals;

        let mut conn = self.conn()?;
        let referrals = referrals::table
            .filter(referrals::referrer_id.eq(referrer_id))
            .order(referrals::created_at.desc())
            .load::<DbReferral>(&mut conn)?;

        Ok(referrals.into_iter().map(Into::into).collect())
    }
}

fn links_for(conn: &mut SqliteConnection, customer_id: i32) -> RepositoryResult<CustomerLinks> {
    use crate::schema::{orders, referrals};

    let orders = orders::table
        .filter(orders::customer_id.eq(customer_id))
        .count()
        .get_result::<i64>(conn)?;

    let outgoing_referrals = referrals::table
        .filter(referrals::referrer_id.eq(customer_id))
        .count()
        .get_result::<i64>(conn)?;

    let incoming_referrals = referrals::table
        .filter(referrals::referred_id.eq(customer_id))
        .count()
        .get_result::<i64>(conn)?;

    Ok(CustomerLinks {
        orders,
        outgoing_referrals,
        incoming_referrals,
    })
}

pub(crate) fn ensure_customer_exists(
    conn: &mut SqliteConnection,
    customer_id: i32,
) -> RepositoryResult<()> {
    use crate::schema::customers;

    let found: bool = select(exists(
        customers::table.filter(customers::id.eq(customer_id)),
    ))
    .get_result(conn)?;

    if found {
        Ok(())
    } else {
        Err(RepositoryError::NotFound)
    }
}
