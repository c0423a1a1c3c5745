pub mod common;
pub mod prelude;

pub mod customer;
pub mod order;
pub mod order_product;
pub mod product;

pub use common::BaseEntity;
