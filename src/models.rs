use chrono::{DateTime, Utc};
use diesel::{
    Selectable,
    prelude::{AsChangeset, Identifiable, Insertable, Queryable},
};
use serde::Serialize;
use utoipa::ToSchema;

pub const ORDER_STATUS_PENDING: &str = "pending";
pub const ORDER_STATUS_PAID: &str = "paid";
pub const PAYMENT_STATUS_COMPLETED: &str = "completed";

// Categories

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, ToSchema)]
#[diesel(table_name = crate::schema::categories)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CategoryEntity {
    pub id: i32,
    pub name: String,
}

// Products

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ProductEntity {
    pub id: String,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub image_url: Option<String>,
}

/// A product together with the name of the category it belongs to.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct ProductWithCategory {
    #[serde(flatten)]
    pub product: ProductEntity,
    pub category_name: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreateProductEntity {
    pub id: String,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub image_url: Option<String>,
}

/// Full overwrite of a product row. Optional columns are written as `NULL`
/// when absent rather than skipped.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
pub struct UpdateProductEntity {
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub stock: i32,
    pub image_url: Option<String>,
}

// Orders

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderEntity {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub total: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreateOrderEntity {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub total: f64,
    pub status: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::orders)]
pub struct UpdateOrderEntity {
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub status: String,
    pub total: f64,
}

// Payments

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq, ToSchema)]
#[diesel(table_name = crate::schema::payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PaymentEntity {
    pub id: i32,
    pub order_id: String,
    pub payment_method: String,
    pub amount: f64,
    pub transaction_id: Option<String>,
    pub status: String,
    pub paid_at: DateTime<Utc>,
}

/// A payment listed alongside the customer of its order.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct PaymentWithCustomer {
    #[serde(flatten)]
    pub payment: PaymentEntity,
    pub customer_name: String,
}

/// A single payment with the contact details of its order's customer.
#[derive(Serialize, Debug, Clone, ToSchema)]
pub struct PaymentWithContact {
    #[serde(flatten)]
    pub payment: PaymentEntity,
    pub customer_name: String,
    pub customer_phone: String,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CreatePaymentEntity {
    pub order_id: String,
    pub payment_method: String,
    pub amount: f64,
    pub transaction_id: Option<String>,
    pub status: String,
}

/// Overwrites a payment row, its primary key included. Derived changesets
/// skip `id`, so the repository binds these columns one by one.
#[derive(Debug, Clone)]
pub struct UpdatePaymentEntity {
    pub id: i32,
    pub payment_method: String,
    pub amount: f64,
    pub transaction_id: Option<String>,
    pub status: String,
}
