//! Data access for the store. Each resource has its own trait so handlers
//! depend on an interface rather than a concrete database; [`PgRepository`]
//! implements all of them on top of a diesel-async connection pool.

use anyhow::{Context, Result};

use crate::db::{DbConnection, DbPool};

pub mod categories;
pub mod orders;
pub mod payments;
pub mod products;

pub use categories::CategoryRepository;
pub use orders::OrderRepository;
pub use payments::PaymentRepository;
pub use products::ProductRepository;

/// Everything the HTTP layer needs from the database.
pub trait Repository:
    CategoryRepository + ProductRepository + OrderRepository + PaymentRepository
{
}

impl<T> Repository for T where
    T: CategoryRepository + ProductRepository + OrderRepository + PaymentRepository
{
}

#[derive(Clone)]
pub struct PgRepository {
    pool: DbPool,
}

impl PgRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn connection(&self) -> Result<DbConnection<'_>> {
        self.pool
            .get()
            .await
            .context("Failed to obtain a DB connection pool")
    }
}
