//! Registration of db contexts with a [`ServiceCollection`].

use std::any::type_name;

use async_trait::async_trait;

use crate::config::Configuration;
use crate::context::{DbContext, ETicaretApiDbContext};
use crate::error::PersistenceError;
use crate::services::ServiceCollection;

#[async_trait]
pub trait ServiceCollectionExt {
    /// Connects `D` with the connection string named [`DbContext::NAME`] and
    /// registers it.
    async fn add_db_context<D>(
        &mut self,
        configuration: &Configuration,
    ) -> Result<&mut Self, PersistenceError>
    where
        D: DbContext;

    /// Registers everything the persistence layer provides.
    async fn add_persistence_services(
        &mut self,
        configuration: &Configuration,
    ) -> Result<&mut Self, PersistenceError>;
}

#[async_trait]
impl ServiceCollectionExt for ServiceCollection {
    async fn add_db_context<D>(
        &mut self,
        configuration: &Configuration,
    ) -> Result<&mut Self, PersistenceError>
    where
        D: DbContext,
    {
        if self.contains::<D>() {
            return Err(PersistenceError::AlreadyRegistered(type_name::<D>()));
        }

        let options = D::options_from(configuration)?;
        tracing::info!(
            context = type_name::<D>(),
            url = %options.redacted_url(),
            lazy = options.is_lazy(),
            "Registering db context"
        );

        let context = D::connect(options).await?;
        self.add_singleton(context)
    }

    async fn add_persistence_services(
        &mut self,
        configuration: &Configuration,
    ) -> Result<&mut Self, PersistenceError> {
        self.add_db_context::<ETicaretApiDbContext>(configuration)
            .await
    }
}
