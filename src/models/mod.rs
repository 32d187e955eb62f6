pub mod customer;
pub mod loyalty;
pub mod order;
pub mod product;
pub mod referral;
