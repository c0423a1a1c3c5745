//! A typed registry of shared services.
//!
//! Each type is registered at most once and resolved as an `Arc<T>`.

use std::any::{Any, TypeId, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::PersistenceError;

type Service = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
pub struct ServiceCollection {
    services: HashMap<TypeId, (&'static str, Service)>,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `service` as the single instance of `T`.
    ///
    /// Fails with [`PersistenceError::AlreadyRegistered`] if `T` is already
    /// present; the existing instance is kept.
    pub fn add_singleton<T>(&mut self, service: T) -> Result<&mut Self, PersistenceError>
    where
        T: Send + Sync + 'static,
    {
        let id = TypeId::of::<T>();
        if self.services.contains_key(&id) {
            return Err(PersistenceError::AlreadyRegistered(type_name::<T>()));
        }
        self.services
            .insert(id, (type_name::<T>(), Arc::new(service)));
        Ok(self)
    }

    pub fn get<T>(&self) -> Option<Arc<T>>
    where
        T: Send + Sync + 'static,
    {
        let (_, service) = self.services.get(&TypeId::of::<T>())?;
        Arc::clone(service).downcast::<T>().ok()
    }

    /// Like [`get`](Self::get), failing with [`PersistenceError::NotRegistered`].
    pub fn resolve<T>(&self) -> Result<Arc<T>, PersistenceError>
    where
        T: Send + Sync + 'static,
    {
        self.get::<T>()
            .ok_or(PersistenceError::NotRegistered(type_name::<T>()))
    }

    pub fn contains<T>(&self) -> bool
    where
        T: Send + Sync + 'static,
    {
        self.services.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Type names of the registered services, sorted.
    pub fn registered(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.services.values().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for ServiceCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceCollection")
            .field("services", &self.registered())
            .finish()
    }
}
