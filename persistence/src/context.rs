//! Database contexts: a connection pool bound to a named connection string.

use std::ops::Deref;

use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};

use crate::config::Configuration;
use crate::connection_string::DbContextOptions;
use crate::error::PersistenceError;

/// A database connection pool tied to a configuration name.
///
/// The pool is shared: clone the [`DatabaseConnection`] to hand it out, and
/// call [`begin`](Self::begin) to open one unit of work.
#[async_trait]
pub trait DbContext: Sized + Send + Sync + 'static {
    /// Key under `ConnectionStrings` holding this context's connection string.
    const NAME: &'static str;

    fn from_parts(connection: DatabaseConnection, options: DbContextOptions) -> Self;

    fn connection(&self) -> &DatabaseConnection;

    fn options(&self) -> &DbContextOptions;

    /// Reads and parses `ConnectionStrings:<NAME>` from `configuration`.
    fn options_from(configuration: &Configuration) -> Result<DbContextOptions, PersistenceError> {
        let connection_string = configuration.get_connection_string(Self::NAME)?;
        DbContextOptions::from_connection_string(connection_string).map_err(|source| {
            PersistenceError::ConnectionString {
                name: Self::NAME.to_owned(),
                source,
            }
        })
    }

    async fn connect(options: DbContextOptions) -> Result<Self, PersistenceError> {
        let connection = Database::connect(options.connect_options().clone()).await?;
        Ok(Self::from_parts(connection, options))
    }

    /// Starts a unit of work. Changes are discarded unless it is committed.
    async fn begin(&self) -> Result<DatabaseTransaction, DbErr> {
        self.connection().begin().await
    }

    async fn ping(&self) -> Result<(), DbErr> {
        self.connection().ping().await
    }
}

/// The application's database context.
#[derive(Debug, Clone)]
pub struct ETicaretApiDbContext {
    connection: DatabaseConnection,
    options: DbContextOptions,
}

impl DbContext for ETicaretApiDbContext {
    const NAME: &'static str = "PostgreSQL";

    fn from_parts(connection: DatabaseConnection, options: DbContextOptions) -> Self {
        Self {
            connection,
            options,
        }
    }

    fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    fn options(&self) -> &DbContextOptions {
        &self.options
    }
}

impl ETicaretApiDbContext {
    pub fn into_connection(self) -> DatabaseConnection {
        self.connection
    }
}

impl Deref for ETicaretApiDbContext {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.connection
    }
}
