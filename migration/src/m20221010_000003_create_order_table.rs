use sea_orm_migration::{prelude::*, schema::*};

use super::m20221010_000001_create_customer_table::Customer;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(pk_auto(Order::Id))
                    .col(integer(Order::CustomerId))
                    .col(string(Order::Description))
                    .col(string(Order::Address))
                    .col(timestamp_with_time_zone(Order::CreatedDate))
                    .col(timestamp_with_time_zone_null(Order::UpdatedDate))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order-customer_id")
                            .from(Order::Table, Order::CustomerId)
                            .to(Customer::Table, Customer::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx-order-customer_id")
                    .table(Order::Table)
                    .col(Order::CustomerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Order::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Order {
    Table,
    Id,
    CustomerId,
    Description,
    Address,
    CreatedDate,
    UpdatedDate,
}
