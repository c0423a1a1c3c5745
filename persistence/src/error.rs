use sea_orm::DbErr;

use crate::config::ConfigError;
use crate::connection_string::ConnectionStringError;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid connection string '{name}': {source}")]
    ConnectionString {
        name: String,
        #[source]
        source: ConnectionStringError,
    },
    #[error(transparent)]
    Db(#[from] DbErr),
    #[error("service `{0}` is already registered")]
    AlreadyRegistered(&'static str),
    #[error("service `{0}` is not registered")]
    NotRegistered(&'static str),
}
