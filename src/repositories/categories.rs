use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{QueryDsl, SelectableHelper};
use diesel_async::RunQueryDsl;

use super::PgRepository;
use crate::{models::CategoryEntity, schema::categories};

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<CategoryEntity>>;
}

#[async_trait]
impl CategoryRepository for PgRepository {
    async fn list_categories(&self) -> Result<Vec<CategoryEntity>> {
        let conn = &mut self.connection().await?;

        let categories: Vec<CategoryEntity> = categories::table
            .select(CategoryEntity::as_select())
            .get_results(conn)
            .await
            .context("Failed to get categories")?;

        Ok(categories)
    }
}
