use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, SelectableHelper};
use diesel_async::{AsyncConnection, RunQueryDsl};

use super::PgRepository;
use crate::{
    models::{
        CreatePaymentEntity, ORDER_STATUS_PAID, PaymentEntity, PaymentWithContact,
        PaymentWithCustomer, UpdatePaymentEntity,
    },
    schema::{orders, payments},
};

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Most recently paid first, each with its order's customer name.
    async fn list_payments(&self) -> Result<Vec<PaymentWithCustomer>>;

    async fn find_payment(&self, id: i32) -> Result<Option<PaymentWithContact>>;

    /// Plain lookup without the order join.
    async fn find_payment_row(&self, id: i32) -> Result<Option<PaymentEntity>>;

    /// Records the payment and marks its order as paid. Both writes commit
    /// together or not at all.
    async fn create_payment(&self, payment: CreatePaymentEntity) -> Result<PaymentEntity>;

    /// Overwrites the payment currently stored under `old_id`, including its id.
    async fn update_payment(&self, old_id: i32, changes: UpdatePaymentEntity) -> Result<usize>;

    async fn delete_payment(&self, id: i32) -> Result<usize>;
}

#[async_trait]
impl PaymentRepository for PgRepository {
    async fn list_payments(&self) -> Result<Vec<PaymentWithCustomer>> {
        let conn = &mut self.connection().await?;

        let rows: Vec<(PaymentEntity, String)> = payments::table
            .inner_join(orders::table)
            .order_by(payments::paid_at.desc())
            .select((PaymentEntity::as_select(), orders::customer_name))
            .get_results(conn)
            .await
            .context("Failed to get payments")?;

        Ok(rows
            .into_iter()
            .map(|(payment, customer_name)| PaymentWithCustomer {
                payment,
                customer_name,
            })
            .collect())
    }

    async fn find_payment(&self, id: i32) -> Result<Option<PaymentWithContact>> {
        let conn = &mut self.connection().await?;

        let row: Option<(PaymentEntity, String, String)> = payments::table
            .inner_join(orders::table)
            .filter(payments::id.eq(id))
            .select((
                PaymentEntity::as_select(),
                orders::customer_name,
                orders::customer_phone,
            ))
            .first(conn)
            .await
            .optional()
            .context("Failed to get payment")?;

        Ok(row.map(
            |(payment, customer_name, customer_phone)| PaymentWithContact {
                payment,
                customer_name,
                customer_phone,
            },
        ))
    }

    async fn find_payment_row(&self, id: i32) -> Result<Option<PaymentEntity>> {
        let conn = &mut self.connection().await?;

        let payment = payments::table
            .find(id)
            .select(PaymentEntity::as_select())
            .first(conn)
            .await
            .optional()
            .context("Failed to get payment")?;

        Ok(payment)
    }

    async fn create_payment(&self, payment: CreatePaymentEntity) -> Result<PaymentEntity> {
        let conn = &mut self.connection().await?;

        let payment = conn
            .transaction(move |conn| {
                Box::pin(async move {
                    let payment = diesel::insert_into(payments::table)
                        .values(payment)
                        .returning(PaymentEntity::as_returning())
                        .get_result(conn)
                        .await
                        .context("Failed to create payment")?;

                    diesel::update(orders::table.find(&payment.order_id))
                        .set(orders::status.eq(ORDER_STATUS_PAID))
                        .execute(conn)
                        .await
                        .context("Failed to mark order as paid")?;

                    Ok::<PaymentEntity, anyhow::Error>(payment)
                })
            })
            .await
            .context("Transaction failed")?;

        Ok(payment)
    }

    async fn update_payment(&self, old_id: i32, changes: UpdatePaymentEntity) -> Result<usize> {
        let conn = &mut self.connection().await?;

        let updated = diesel::update(payments::table.find(old_id))
            .set((
                payments::id.eq(changes.id),
                payments::payment_method.eq(changes.payment_method),
                payments::amount.eq(changes.amount),
                payments::transaction_id.eq(changes.transaction_id),
                payments::status.eq(changes.status),
            ))
            .execute(conn)
            .await
            .context("Failed to update payment")?;

        Ok(updated)
    }

    async fn delete_payment(&self, id: i32) -> Result<usize> {
        let conn = &mut self.connection().await?;

        let deleted = diesel::delete(payments::table.find(id))
            .execute(conn)
            .await
            .context("Failed to delete payment")?;

        Ok(deleted)
    }
}
