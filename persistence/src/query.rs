use ::entity::prelude::{Customer, Order, OrderProduct, Product};
use ::entity::{customer, order, order_product, product};
use sea_orm::*;

/// An order together with the customer it belongs to and its products.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderGraph {
    pub order: order::Model,
    pub customer: customer::Model,
    pub products: Vec<product::Model>,
}

pub struct Query;

impl Query {
    pub async fn find_customer_by_id(
        db: &DbConn,
        id: i32,
    ) -> Result<Option<customer::Model>, DbErr> {
        Customer::find_by_id(id).one(db).await
    }

    pub async fn find_product_by_id(db: &DbConn, id: i32) -> Result<Option<product::Model>, DbErr> {
        Product::find_by_id(id).one(db).await
    }

    pub async fn find_order_by_id(db: &DbConn, id: i32) -> Result<Option<order::Model>, DbErr> {
        Order::find_by_id(id).one(db).await
    }

    /// Loads an order with its customer and products, ordered by product id.
    pub async fn find_order_graph(db: &DbConn, id: i32) -> Result<Option<OrderGraph>, DbErr> {
        let Some((order, customer)) = Order::find_by_id(id)
            .find_also_related(Customer)
            .one(db)
            .await?
        else {
            return Ok(None);
        };

        let customer = customer.ok_or_else(|| {
            DbErr::RecordNotFound(format!(
                "customer {} of order {}",
                order.customer_id, order.id
            ))
        })?;

        let products = order
            .find_related(Product)
            .order_by_asc(product::Column::Id)
            .all(db)
            .await?;

        Ok(Some(OrderGraph {
            order,
            customer,
            products,
        }))
    }

    pub async fn find_orders_by_customer(
        db: &DbConn,
        customer_id: i32,
    ) -> Result<Vec<order::Model>, DbErr> {
        Order::find()
            .filter(order::Column::CustomerId.eq(customer_id))
            .order_by_asc(order::Column::Id)
            .all(db)
            .await
    }

    pub async fn find_products_in_order(
        db: &DbConn,
        order_id: i32,
    ) -> Result<Vec<product::Model>, DbErr> {
        Product::find()
            .inner_join(OrderProduct)
            .filter(order_product::Column::OrderId.eq(order_id))
            .order_by_asc(product::Column::Id)
            .all(db)
            .await
    }
}
