use std::collections::BTreeSet;

use ::entity::prelude::{Order, OrderProduct};
use ::entity::{customer, order, order_product, product};
use sea_orm::*;
use serde::Deserialize;

/// Scalar fields of an order to be created.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NewOrder {
    pub customer_id: i32,
    pub description: String,
    pub address: String,
}

pub struct Mutation;

impl Mutation {
    pub async fn create_customer(db: &DbConn, name: &str) -> Result<customer::Model, DbErr> {
        customer::ActiveModel {
            name: Set(name.to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    pub async fn create_product(db: &DbConn, name: &str) -> Result<product::Model, DbErr> {
        product::ActiveModel {
            name: Set(name.to_owned()),
            ..Default::default()
        }
        .insert(db)
        .await
    }

    /// Inserts the order and attaches the given products in one transaction.
    ///
    /// Repeated product ids are attached once. The customer and products must
    /// exist; the foreign keys reject the whole unit of work otherwise.
    pub async fn create_order(
        db: &DbConn,
        form_data: NewOrder,
        product_ids: &[i32],
    ) -> Result<order::Model, DbErr> {
        let txn = db.begin().await?;

        let order = order::ActiveModel {
            customer_id: Set(form_data.customer_id),
            description: Set(form_data.description),
            address: Set(form_data.address),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        let product_ids: BTreeSet<i32> = product_ids.iter().copied().collect();
        if !product_ids.is_empty() {
            OrderProduct::insert_many(product_ids.into_iter().map(|product_id| {
                order_product::ActiveModel {
                    order_id: Set(order.id),
                    product_id: Set(product_id),
                }
            }))
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;
        tracing::debug!(order_id = order.id, customer_id = order.customer_id, "Order created");

        Ok(order)
    }

    pub async fn update_order_by_id(
        db: &DbConn,
        id: i32,
        description: &str,
        address: &str,
    ) -> Result<order::Model, DbErr> {
        let order: order::ActiveModel = Order::find_by_id(id)
            .one(db)
            .await?
            .ok_or(DbErr::RecordNotFound(format!("order {id}")))
            .map(Into::into)?;

        order::ActiveModel {
            description: Set(description.to_owned()),
            address: Set(address.to_owned()),
            ..order
        }
        .update(db)
        .await
    }

    /// Deletes the order and detaches its products.
    pub async fn delete_order(db: &DbConn, id: i32) -> Result<DeleteResult, DbErr> {
        let txn = db.begin().await?;

        let order: order::ActiveModel = Order::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(DbErr::RecordNotFound(format!("order {id}")))
            .map(Into::into)?;

        OrderProduct::delete_many()
            .filter(order_product::Column::OrderId.eq(id))
            .exec(&txn)
            .await?;
        let result = order.delete(&txn).await?;

        txn.commit().await?;
        Ok(result)
    }
}
