//! Creating a db context outside the running host, for tooling such as
//! migrations. The context is configured from the same settings files the
//! host reads.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::config::{Configuration, api_content_root};
use crate::context::{DbContext, ETicaretApiDbContext};
use crate::error::PersistenceError;

#[async_trait]
pub trait DesignTimeDbContextFactory<D>
where
    D: DbContext,
{
    async fn create_db_context(&self) -> Result<D, PersistenceError>;
}

#[derive(Debug, Clone)]
pub struct ETicaretApiDesignTimeFactory {
    content_root: PathBuf,
    environment: Option<String>,
}

impl ETicaretApiDesignTimeFactory {
    pub fn new<P>(content_root: P, environment: Option<String>) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            content_root: content_root.into(),
            environment,
        }
    }

    /// Uses the host's default content root, `<cwd>/../ETicaretAPI.API`.
    pub fn from_current_dir() -> io::Result<Self> {
        Ok(Self::new(api_content_root()?, None))
    }

    pub fn content_root(&self) -> &Path {
        &self.content_root
    }
}

#[async_trait]
impl DesignTimeDbContextFactory<ETicaretApiDbContext> for ETicaretApiDesignTimeFactory {
    /// Tooling needs a live server, so the pool connects eagerly.
    async fn create_db_context(&self) -> Result<ETicaretApiDbContext, PersistenceError> {
        let configuration = Configuration::load(&self.content_root, self.environment.as_deref())?;
        let options = ETicaretApiDbContext::options_from(&configuration)?.eager();
        tracing::debug!(url = %options.redacted_url(), "Creating design-time db context");
        ETicaretApiDbContext::connect(options).await
    }
}
