//! Persistence layer of the ETicaretAPI backend.
//!
//! [`Configuration`] reads the connection string from `appsettings.json`,
//! [`ServiceCollectionExt::add_persistence_services`] connects and registers
//! the [`ETicaretApiDbContext`], and [`Query`] / [`Mutation`] load and save
//! entity graphs through it.

pub mod config;
pub mod connection_string;
pub mod context;
pub mod design_time;
mod error;
mod mutation;
mod query;
pub mod registration;
pub mod services;

pub use config::{ConfigError, Configuration, ConfigurationBuilder};
pub use connection_string::{ConnectionStringError, DbContextOptions, PgConnectionString};
pub use context::{DbContext, ETicaretApiDbContext};
pub use design_time::{DesignTimeDbContextFactory, ETicaretApiDesignTimeFactory};
pub use error::PersistenceError;
pub use mutation::*;
pub use query::*;
pub use registration::ServiceCollectionExt;
pub use services::ServiceCollection;

pub use sea_orm;
