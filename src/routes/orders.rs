use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, ErrorResponse, MessageResponse, StdResponse},
    app_state::AppState,
    extract::{AppJson, AppPath},
    models::{CreateOrderEntity, ORDER_STATUS_PENDING, OrderEntity, UpdateOrderEntity},
    validation::{Truthy, not_null, truthy},
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/orders",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_orders))
            .routes(utoipa_axum::routes!(create_order))
            .routes(utoipa_axum::routes!(get_order))
            .routes(utoipa_axum::routes!(update_order))
            .routes(utoipa_axum::routes!(delete_order)),
    )
}

/// Fetch all orders, newest first.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Orders"],
    responses(
        (status = 200, description = "List all orders", body = StdResponse<Vec<OrderEntity>>)
    )
)]
async fn get_orders(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let orders = state.repository.list_orders().await?;

    Ok(StdResponse::list(orders))
}

/// Fetch a specific order.
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Orders"],
    params(
        ("id" = String, Path, description = "Order ID to fetch")
    ),
    responses(
        (status = 200, description = "Get order successfully", body = StdResponse<OrderEntity>),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
async fn get_order(
    AppPath(id): AppPath<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let order = state
        .repository
        .find_order(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Order not found".into()))?;

    Ok(StdResponse::data(order))
}

#[derive(Deserialize, ToSchema)]
struct CreateOrderReq {
    id: Option<String>,
    customer_name: Option<String>,
    customer_phone: Option<String>,
    customer_address: Option<String>,
    total: Option<f64>,
    status: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateOrderRes {
    success: bool,
    message: String,
    order_id: String,
}

/// Create an order under a client-chosen ID.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Orders"],
    request_body = CreateOrderReq,
    responses(
        (status = 201, description = "Created order successfully", body = CreateOrderRes),
        (status = 400, description = "A required field is missing", body = ErrorResponse),
        (status = 500, description = "Duplicate ID or database failure", body = ErrorResponse)
    )
)]
async fn create_order(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateOrderReq>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(id), Some(customer_name), Some(customer_phone), Some(customer_address)) = (
        truthy(body.id),
        truthy(body.customer_name),
        truthy(body.customer_phone),
        truthy(body.customer_address),
    ) else {
        return Err(AppError::BadRequest(
            "Required fields: id, customer_name, customer_phone, customer_address".into(),
        ));
    };

    let order = state
        .repository
        .create_order(CreateOrderEntity {
            id,
            customer_name,
            customer_phone,
            customer_address,
            total: truthy(body.total).unwrap_or(0.0),
            status: truthy(body.status).unwrap_or_else(|| ORDER_STATUS_PENDING.into()),
        })
        .await?;

    tracing::info!("Order {} created", order.id);

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderRes {
            success: true,
            message: "Order created successfully".into(),
            order_id: order.id,
        }),
    ))
}

#[derive(Deserialize, ToSchema)]
struct UpdateOrderReq {
    customer_name: Option<String>,
    customer_phone: Option<String>,
    customer_address: Option<String>,
    status: Option<String>,
    total: Option<f64>,
}

impl TryFrom<UpdateOrderReq> for UpdateOrderEntity {
    type Error = AppError;

    fn try_from(req: UpdateOrderReq) -> Result<Self, Self::Error> {
        Ok(Self {
            customer_name: not_null(req.customer_name, "orders", "customer_name")?,
            customer_phone: not_null(req.customer_phone, "orders", "customer_phone")?,
            customer_address: not_null(req.customer_address, "orders", "customer_address")?,
            status: not_null(req.status, "orders", "status")?,
            total: not_null(req.total, "orders", "total")?,
        })
    }
}

/// Overwrite the customer details, status and total of an order.
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Orders"],
    params(
        ("id" = String, Path, description = "Order ID to update")
    ),
    request_body = UpdateOrderReq,
    responses(
        (status = 200, description = "Updated order successfully", body = MessageResponse),
        (status = 400, description = "Customer name is missing", body = ErrorResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
async fn update_order(
    AppPath(id): AppPath<String>,
    State(state): State<AppState>,
    AppJson(body): AppJson<UpdateOrderReq>,
) -> Result<impl IntoResponse, AppError> {
    if !body.customer_name.is_truthy() {
        return Err(AppError::BadRequest("Customer name is required".into()));
    }

    // An UPDATE matching no row never reaches the not-null check.
    let changes = match UpdateOrderEntity::try_from(body) {
        Ok(changes) => changes,
        Err(err) => {
            if state.repository.find_order(&id).await?.is_none() {
                return Err(AppError::NotFound("Order not found".into()));
            }
            return Err(err);
        }
    };

    let updated = state.repository.update_order(&id, changes).await?;

    if updated == 0 {
        return Err(AppError::NotFound("Order not found".into()));
    }

    tracing::info!("Order {} updated", id);

    Ok(MessageResponse::new("Order updated successfully"))
}

/// Delete an order.
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Orders"],
    params(
        ("id" = String, Path, description = "Order ID to delete")
    ),
    responses(
        (status = 200, description = "Deleted order successfully", body = MessageResponse),
        (status = 404, description = "Order not found", body = ErrorResponse)
    )
)]
async fn delete_order(
    AppPath(id): AppPath<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.repository.delete_order(&id).await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Order not found".into()));
    }

    tracing::info!("Order {} deleted", id);

    Ok(MessageResponse::new("Order deleted successfully"))
}
