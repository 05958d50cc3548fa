use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use super::PgRepository;
use crate::{
    models::{CreateOrderEntity, OrderEntity, UpdateOrderEntity},
    schema::orders,
};

#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Newest orders first.
    async fn list_orders(&self) -> Result<Vec<OrderEntity>>;

    async fn find_order(&self, id: &str) -> Result<Option<OrderEntity>>;

    async fn create_order(&self, order: CreateOrderEntity) -> Result<OrderEntity>;

    async fn update_order(&self, id: &str, changes: UpdateOrderEntity) -> Result<usize>;

    async fn delete_order(&self, id: &str) -> Result<usize>;
}

#[async_trait]
impl OrderRepository for PgRepository {
    async fn list_orders(&self) -> Result<Vec<OrderEntity>> {
        let conn = &mut self.connection().await?;

        let orders: Vec<OrderEntity> = orders::table
            .order_by(orders::created_at.desc())
            .select(OrderEntity::as_select())
            .get_results(conn)
            .await
            .context("Failed to get orders")?;

        Ok(orders)
    }

    async fn find_order(&self, id: &str) -> Result<Option<OrderEntity>> {
        let conn = &mut self.connection().await?;

        let order = orders::table
            .find(id)
            .select(OrderEntity::as_select())
            .first(conn)
            .await
            .optional()
            .context("Failed to get order")?;

        Ok(order)
    }

    async fn create_order(&self, order: CreateOrderEntity) -> Result<OrderEntity> {
        let conn = &mut self.connection().await?;

        let order = diesel::insert_into(orders::table)
            .values(order)
            .returning(OrderEntity::as_returning())
            .get_result(conn)
            .await
            .context("Failed to create order")?;

        Ok(order)
    }

    async fn update_order(&self, id: &str, changes: UpdateOrderEntity) -> Result<usize> {
        let conn = &mut self.connection().await?;

        let updated = diesel::update(orders::table.find(id))
            .set(changes)
            .execute(conn)
            .await
            .context("Failed to update order")?;

        Ok(updated)
    }

    async fn delete_order(&self, id: &str) -> Result<usize> {
        let conn = &mut self.connection().await?;

        let deleted = diesel::delete(orders::table.find(id))
            .execute(conn)
            .await
            .context("Failed to delete order")?;

        Ok(deleted)
    }
}
