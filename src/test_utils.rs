//! In-memory stand-in for the database used by router tests. It mimics the
//! constraint behavior handlers rely on: unique ids, foreign keys, inner
//! joins, ordering and a transactional payment insert.

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicBool, Ordering},
};

use anyhow::{Result, anyhow, bail};
use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;
use tower::ServiceExt;

use crate::{
    app_state::AppState,
    models::{
        CategoryEntity, CreateOrderEntity, CreatePaymentEntity, CreateProductEntity,
        ORDER_STATUS_PAID, OrderEntity, PaymentEntity, PaymentWithContact, PaymentWithCustomer,
        ProductEntity, ProductWithCategory, UpdateOrderEntity, UpdatePaymentEntity,
        UpdateProductEntity,
    },
    repositories::{CategoryRepository, OrderRepository, PaymentRepository, ProductRepository},
    routes,
};

#[derive(Default)]
struct Tables {
    categories: Vec<CategoryEntity>,
    products: Vec<ProductEntity>,
    orders: Vec<OrderEntity>,
    payments: Vec<PaymentEntity>,
    next_payment_id: i32,
    ticks: i64,
}

impl Tables {
    /// Strictly increasing timestamps, one per insert.
    fn now(&mut self) -> DateTime<Utc> {
        self.ticks += 1;
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(self.ticks)
    }
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
    fail_order_status_update: AtomicBool,
    lose_payment_delete_race: AtomicBool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_categories(self, categories: &[(i32, &str)]) -> Self {
        self.tables.lock().unwrap().categories = categories
            .iter()
            .map(|(id, name)| CategoryEntity {
                id: *id,
                name: name.to_string(),
            })
            .collect();
        self
    }

    /// Makes the order update inside payment creation fail.
    pub fn fail_order_status_update(&self) {
        self.fail_order_status_update.store(true, Ordering::SeqCst);
    }

    /// Lets another writer remove the payment right before `delete_payment` runs.
    pub fn lose_payment_delete_race(&self) {
        self.lose_payment_delete_race.store(true, Ordering::SeqCst);
    }

    pub fn product(&self, id: &str) -> Option<ProductEntity> {
        self.tables
            .lock()
            .unwrap()
            .products
            .iter()
            .find(|product| product.id == id)
            .cloned()
    }

    pub fn product_count(&self) -> usize {
        self.tables.lock().unwrap().products.len()
    }

    pub fn payment_count(&self) -> usize {
        self.tables.lock().unwrap().payments.len()
    }

    pub fn order(&self, id: &str) -> Option<OrderEntity> {
        self.tables
            .lock()
            .unwrap()
            .orders
            .iter()
            .find(|order| order.id == id)
            .cloned()
    }
}

fn duplicate_key(relation: &str) -> anyhow::Error {
    anyhow!("duplicate key value violates unique constraint \"{}_pkey\"", relation)
}

fn foreign_key(relation: &str, constraint: &str) -> anyhow::Error {
    anyhow!(
        "insert or update on table \"{}\" violates foreign key constraint \"{}\"",
        relation,
        constraint
    )
}

#[async_trait]
impl CategoryRepository for MemoryRepository {
    async fn list_categories(&self) -> Result<Vec<CategoryEntity>> {
        Ok(self.tables.lock().unwrap().categories.clone())
    }
}

#[async_trait]
impl ProductRepository for MemoryRepository {
    async fn list_products(&self) -> Result<Vec<ProductEntity>> {
        Ok(self.tables.lock().unwrap().products.clone())
    }

    async fn list_products_by_category(&self, category_id: i32) -> Result<Vec<ProductEntity>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .products
            .iter()
            .filter(|product| product.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn find_product(&self, id: &str) -> Result<Option<ProductWithCategory>> {
        let tables = self.tables.lock().unwrap();
        let Some(product) = tables.products.iter().find(|product| product.id == id) else {
            return Ok(None);
        };

        Ok(tables
            .categories
            .iter()
            .find(|category| category.id == product.category_id)
            .map(|category| ProductWithCategory {
                product: product.clone(),
                category_name: category.name.clone(),
            }))
    }

    async fn create_product(&self, product: CreateProductEntity) -> Result<ProductEntity> {
        let mut tables = self.tables.lock().unwrap();
        if tables.products.iter().any(|p| p.id == product.id) {
            return Err(duplicate_key("products").context("Failed to create product"));
        }
        if !tables.categories.iter().any(|c| c.id == product.category_id) {
            return Err(foreign_key("products", "products_category_id_fkey"));
        }

        let product = ProductEntity {
            id: product.id,
            category_id: product.category_id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock: product.stock,
            image_url: product.image_url,
        };
        tables.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: &str, changes: UpdateProductEntity) -> Result<usize> {
        let mut tables = self.tables.lock().unwrap();
        let category_exists = tables
            .categories
            .iter()
            .any(|category| category.id == changes.category_id);
        let Some(product) = tables.products.iter_mut().find(|product| product.id == id) else {
            return Ok(0);
        };
        if !category_exists {
            return Err(foreign_key("products", "products_category_id_fkey")
                .context("Failed to update product"));
        }

        product.category_id = changes.category_id;
        product.name = changes.name;
        product.description = changes.description;
        product.price = changes.price;
        product.stock = changes.stock;
        product.image_url = changes.image_url;
        Ok(1)
    }

    async fn delete_product(&self, id: &str) -> Result<usize> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.products.len();
        tables.products.retain(|product| product.id != id);
        Ok(before - tables.products.len())
    }
}

#[async_trait]
impl OrderRepository for MemoryRepository {
    async fn list_orders(&self) -> Result<Vec<OrderEntity>> {
        let mut orders = self.tables.lock().unwrap().orders.clone();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn find_order(&self, id: &str) -> Result<Option<OrderEntity>> {
        Ok(self.order(id))
    }

    async fn create_order(&self, order: CreateOrderEntity) -> Result<OrderEntity> {
        let mut tables = self.tables.lock().unwrap();
        if tables.orders.iter().any(|o| o.id == order.id) {
            return Err(duplicate_key("orders").context("Failed to create order"));
        }

        let order = OrderEntity {
            id: order.id,
            customer_name: order.customer_name,
            customer_phone: order.customer_phone,
            customer_address: order.customer_address,
            total: order.total,
            status: order.status,
            created_at: tables.now(),
        };
        tables.orders.push(order.clone());
        Ok(order)
    }

    async fn update_order(&self, id: &str, changes: UpdateOrderEntity) -> Result<usize> {
        let mut tables = self.tables.lock().unwrap();
        let Some(order) = tables.orders.iter_mut().find(|order| order.id == id) else {
            return Ok(0);
        };

        order.customer_name = changes.customer_name;
        order.customer_phone = changes.customer_phone;
        order.customer_address = changes.customer_address;
        order.status = changes.status;
        order.total = changes.total;
        Ok(1)
    }

    async fn delete_order(&self, id: &str) -> Result<usize> {
        let mut tables = self.tables.lock().unwrap();
        if tables.payments.iter().any(|payment| payment.order_id == id) {
            bail!("update or delete on table \"orders\" violates foreign key constraint \"payments_order_id_fkey\" on table \"payments\"");
        }
        let before = tables.orders.len();
        tables.orders.retain(|order| order.id != id);
        Ok(before - tables.orders.len())
    }
}

#[async_trait]
impl PaymentRepository for MemoryRepository {
    async fn list_payments(&self) -> Result<Vec<PaymentWithCustomer>> {
        let tables = self.tables.lock().unwrap();
        let mut payments: Vec<PaymentWithCustomer> = tables
            .payments
            .iter()
            .filter_map(|payment| {
                let order = tables.orders.iter().find(|o| o.id == payment.order_id)?;
                Some(PaymentWithCustomer {
                    payment: payment.clone(),
                    customer_name: order.customer_name.clone(),
                })
            })
            .collect();
        payments.sort_by(|a, b| b.payment.paid_at.cmp(&a.payment.paid_at));
        Ok(payments)
    }

    async fn find_payment(&self, id: i32) -> Result<Option<PaymentWithContact>> {
        let tables = self.tables.lock().unwrap();
        let Some(payment) = tables.payments.iter().find(|payment| payment.id == id) else {
            return Ok(None);
        };

        Ok(tables
            .orders
            .iter()
            .find(|order| order.id == payment.order_id)
            .map(|order| PaymentWithContact {
                payment: payment.clone(),
                customer_name: order.customer_name.clone(),
                customer_phone: order.customer_phone.clone(),
            }))
    }

    async fn find_payment_row(&self, id: i32) -> Result<Option<PaymentEntity>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.payments.iter().find(|payment| payment.id == id).cloned())
    }

    async fn create_payment(&self, payment: CreatePaymentEntity) -> Result<PaymentEntity> {
        let mut tables = self.tables.lock().unwrap();
        if !tables.orders.iter().any(|order| order.id == payment.order_id) {
            return Err(foreign_key("payments", "payments_order_id_fkey"));
        }

        tables.next_payment_id += 1;
        let payment = PaymentEntity {
            id: tables.next_payment_id,
            order_id: payment.order_id,
            payment_method: payment.payment_method,
            amount: payment.amount,
            transaction_id: payment.transaction_id,
            status: payment.status,
            paid_at: tables.now(),
        };

        // Both writes are applied only once the second one is known to succeed.
        if self.fail_order_status_update.load(Ordering::SeqCst) {
            bail!("Transaction failed: Failed to mark order as paid");
        }
        if let Some(order) = tables.orders.iter_mut().find(|o| o.id == payment.order_id) {
            order.status = ORDER_STATUS_PAID.to_string();
        }
        tables.payments.push(payment.clone());
        Ok(payment)
    }

    async fn update_payment(&self, old_id: i32, changes: UpdatePaymentEntity) -> Result<usize> {
        let mut tables = self.tables.lock().unwrap();
        if changes.id != old_id && tables.payments.iter().any(|p| p.id == changes.id) {
            return Err(duplicate_key("payments"));
        }
        let Some(payment) = tables.payments.iter_mut().find(|p| p.id == old_id) else {
            return Ok(0);
        };

        payment.id = changes.id;
        payment.payment_method = changes.payment_method;
        payment.amount = changes.amount;
        payment.transaction_id = changes.transaction_id;
        payment.status = changes.status;
        Ok(1)
    }

    async fn delete_payment(&self, id: i32) -> Result<usize> {
        let mut tables = self.tables.lock().unwrap();
        if self.lose_payment_delete_race.load(Ordering::SeqCst) {
            tables.payments.retain(|payment| payment.id != id);
        }
        let before = tables.payments.len();
        tables.payments.retain(|payment| payment.id != id);
        Ok(before - tables.payments.len())
    }
}

/// Builds the full application router over `repository`.
pub fn test_app(repository: Arc<MemoryRepository>) -> Router {
    routes::app(AppState::new(repository))
}

/// Sends one request through the router and decodes the JSON body.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
