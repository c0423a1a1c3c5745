use sea_orm_migration::{prelude::*, schema::*};

use super::m20221010_000002_create_product_table::Product;
use super::m20221010_000003_create_order_table::Order;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderProduct::Table)
                    .if_not_exists()
                    .col(integer(OrderProduct::OrderId))
                    .col(integer(OrderProduct::ProductId))
                    .primary_key(
                        Index::create()
                            .name("pk-order_product")
                            .col(OrderProduct::OrderId)
                            .col(OrderProduct::ProductId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_product-order_id")
                            .from(OrderProduct::Table, OrderProduct::OrderId)
                            .to(Order::Table, Order::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-order_product-product_id")
                            .from(OrderProduct::Table, OrderProduct::ProductId)
                            .to(Product::Table, Product::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderProduct::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OrderProduct {
    Table,
    OrderId,
    ProductId,
}
