use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use super::PgRepository;
use crate::{
    models::{CreateProductEntity, ProductEntity, ProductWithCategory, UpdateProductEntity},
    schema::{categories, products},
};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list_products(&self) -> Result<Vec<ProductEntity>>;

    async fn list_products_by_category(&self, category_id: i32) -> Result<Vec<ProductEntity>>;

    /// Looks up a product joined with its category.
    async fn find_product(&self, id: &str) -> Result<Option<ProductWithCategory>>;

    /// Inserts a product. Fails if the id is already taken.
    async fn create_product(&self, product: CreateProductEntity) -> Result<ProductEntity>;

    /// Returns the number of rows updated.
    async fn update_product(&self, id: &str, changes: UpdateProductEntity) -> Result<usize>;

    /// Returns the number of rows deleted.
    async fn delete_product(&self, id: &str) -> Result<usize>;
}

#[async_trait]
impl ProductRepository for PgRepository {
    async fn list_products(&self) -> Result<Vec<ProductEntity>> {
        let conn = &mut self.connection().await?;

        let products: Vec<ProductEntity> = products::table
            .select(ProductEntity::as_select())
            .get_results(conn)
            .await
            .context("Failed to get products")?;

        Ok(products)
    }

    async fn list_products_by_category(&self, category_id: i32) -> Result<Vec<ProductEntity>> {
        let conn = &mut self.connection().await?;

        let products: Vec<ProductEntity> = products::table
            .filter(products::category_id.eq(category_id))
            .select(ProductEntity::as_select())
            .get_results(conn)
            .await
            .context("Failed to get products by category")?;

        Ok(products)
    }

    async fn find_product(&self, id: &str) -> Result<Option<ProductWithCategory>> {
        let conn = &mut self.connection().await?;

        let product: Option<(ProductEntity, String)> = products::table
            .inner_join(categories::table)
            .filter(products::id.eq(id))
            .select((ProductEntity::as_select(), categories::name))
            .first(conn)
            .await
            .optional()
            .context("Failed to get product")?;

        Ok(product.map(|(product, category_name)| ProductWithCategory {
            product,
            category_name,
        }))
    }

    async fn create_product(&self, product: CreateProductEntity) -> Result<ProductEntity> {
        let conn = &mut self.connection().await?;

        let product = diesel::insert_into(products::table)
            .values(product)
            .returning(ProductEntity::as_returning())
            .get_result(conn)
            .await
            .context("Failed to create product")?;

        Ok(product)
    }

    async fn update_product(&self, id: &str, changes: UpdateProductEntity) -> Result<usize> {
        let conn = &mut self.connection().await?;

        let updated = diesel::update(products::table.find(id))
            .set(changes)
            .execute(conn)
            .await
            .context("Failed to update product")?;

        Ok(updated)
    }

    async fn delete_product(&self, id: &str) -> Result<usize> {
        let conn = &mut self.connection().await?;

        let deleted = diesel::delete(products::table.find(id))
            .execute(conn)
            .await
            .context("Failed to delete product")?;

        Ok(deleted)
    }
}
