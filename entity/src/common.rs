//! Columns shared by every entity table.
//!
//! SeaORM entities have no inheritance, so the shared identity and audit
//! columns are declared on each model and surfaced through [`BaseEntity`].

use chrono::Utc;
use sea_orm::ActiveValue::{self, Set};
use sea_orm::entity::prelude::DateTimeUtc;

/// Identity and audit columns carried by every model.
///
/// `id` is assigned by the database on insert and never changes afterwards.
pub trait BaseEntity {
    fn id(&self) -> i32;

    fn created_date(&self) -> DateTimeUtc;

    /// `None` until the row is updated for the first time.
    fn updated_date(&self) -> Option<DateTimeUtc>;
}

/// Fills the audit columns of an active model about to be saved.
pub(crate) fn stamp(
    insert: bool,
    created_date: &mut ActiveValue<DateTimeUtc>,
    updated_date: &mut ActiveValue<Option<DateTimeUtc>>,
) {
    let now = Utc::now();
    if insert {
        *created_date = Set(now);
        *updated_date = Set(None);
    } else {
        *updated_date = Set(Some(now));
    }
}

macro_rules! impl_base_entity {
    ($model:ty) => {
        impl $crate::common::BaseEntity for $model {
            fn id(&self) -> i32 {
                self.id
            }

            fn created_date(&self) -> ::sea_orm::entity::prelude::DateTimeUtc {
                self.created_date
            }

            fn updated_date(&self) -> Option<::sea_orm::entity::prelude::DateTimeUtc> {
                self.updated_date
            }
        }
    };
}

pub(crate) use impl_base_entity;
