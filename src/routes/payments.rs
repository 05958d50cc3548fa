use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use utoipa_axum::router::OpenApiRouter;

use crate::{
    app_error::{AppError, ErrorResponse, MessageResponse, StdResponse},
    app_state::AppState,
    extract::{AppJson, AppPath},
    models::{
        CreatePaymentEntity, PAYMENT_STATUS_COMPLETED, PaymentEntity, PaymentWithContact,
        PaymentWithCustomer, UpdatePaymentEntity,
    },
    validation::not_null,
};

/// Defines routes with OpenAPI specs.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/payments",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_payments))
            .routes(utoipa_axum::routes!(create_payment))
            .routes(utoipa_axum::routes!(get_payment))
            .routes(utoipa_axum::routes!(update_payment))
            .routes(utoipa_axum::routes!(delete_payment)),
    )
}

/// Fetch all payments, most recent first, with the paying customer's name.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Payments"],
    responses(
        (status = 200, description = "List all payments", body = StdResponse<Vec<PaymentWithCustomer>>)
    )
)]
async fn get_payments(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let payments = state.repository.list_payments().await?;

    Ok(StdResponse::list(payments))
}

/// Fetch a payment with the customer's name and phone.
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Payments"],
    params(
        ("id" = i32, Path, description = "Payment ID to fetch")
    ),
    responses(
        (status = 200, description = "Get payment successfully", body = StdResponse<PaymentWithContact>),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    )
)]
async fn get_payment(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let payment = state
        .repository
        .find_payment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Payment {} not found", id)))?;

    Ok(StdResponse::data(payment))
}

#[derive(Deserialize, ToSchema)]
struct CreatePaymentReq {
    order_id: Option<String>,
    payment_method: Option<String>,
    amount: Option<f64>,
    transaction_id: Option<String>,
}

/// Record a completed payment and mark its order as paid.
///
/// Both writes run in one transaction: if the order cannot be updated the
/// payment is not kept either.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Payments"],
    request_body = CreatePaymentReq,
    responses(
        (status = 201, description = "Payment received successfully", body = StdResponse<PaymentEntity>),
        (status = 500, description = "Payment or order update failed", body = ErrorResponse)
    )
)]
async fn create_payment(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreatePaymentReq>,
) -> Result<impl IntoResponse, AppError> {
    let payment = state
        .repository
        .create_payment(CreatePaymentEntity {
            order_id: not_null(body.order_id, "payments", "order_id")?,
            payment_method: not_null(body.payment_method, "payments", "payment_method")?,
            amount: not_null(body.amount, "payments", "amount")?,
            transaction_id: body.transaction_id,
            status: PAYMENT_STATUS_COMPLETED.into(),
        })
        .await?;

    tracing::info!(
        "Payment {} recorded, order {} marked as paid",
        payment.id,
        payment.order_id
    );

    Ok((
        StatusCode::CREATED,
        StdResponse::data(payment).with_message("Payment received successfully"),
    ))
}

#[derive(Deserialize, ToSchema)]
struct UpdatePaymentReq {
    id: Option<i32>,
    payment_method: Option<String>,
    amount: Option<f64>,
    transaction_id: Option<String>,
    status: Option<String>,
}

impl TryFrom<UpdatePaymentReq> for UpdatePaymentEntity {
    type Error = AppError;

    fn try_from(req: UpdatePaymentReq) -> Result<Self, Self::Error> {
        Ok(Self {
            id: not_null(req.id, "payments", "id")?,
            payment_method: not_null(req.payment_method, "payments", "payment_method")?,
            amount: not_null(req.amount, "payments", "amount")?,
            transaction_id: req.transaction_id,
            status: not_null(req.status, "payments", "status")?,
        })
    }
}

/// Overwrite a payment. The path holds the current ID; `id` in the body
/// becomes the new one.
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Payments"],
    params(
        ("id" = i32, Path, description = "Current payment ID")
    ),
    request_body = UpdatePaymentReq,
    responses(
        (status = 200, description = "Updated payment successfully", body = MessageResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    )
)]
async fn update_payment(
    AppPath(old_id): AppPath<i32>,
    State(state): State<AppState>,
    AppJson(body): AppJson<UpdatePaymentReq>,
) -> Result<impl IntoResponse, AppError> {
    // An UPDATE matching no row never reaches the not-null check.
    let changes = match UpdatePaymentEntity::try_from(body) {
        Ok(changes) => changes,
        Err(err) => {
            if state.repository.find_payment_row(old_id).await?.is_none() {
                return Err(AppError::NotFound(format!("Payment {} not found", old_id)));
            }
            return Err(err);
        }
    };
    let new_id = changes.id;

    let updated = state.repository.update_payment(old_id, changes).await?;

    if updated == 0 {
        return Err(AppError::NotFound(format!("Payment {} not found", old_id)));
    }

    tracing::info!("Payment {} updated (now {})", old_id, new_id);

    Ok(MessageResponse::new("Payment updated successfully"))
}

/// Delete a payment after checking it exists.
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Payments"],
    params(
        ("id" = i32, Path, description = "Payment ID to delete")
    ),
    responses(
        (status = 200, description = "Deleted payment successfully", body = MessageResponse),
        (status = 404, description = "Payment not found", body = ErrorResponse)
    )
)]
async fn delete_payment(
    AppPath(id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    if state.repository.find_payment_row(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Payment {} not found", id)));
    }

    let deleted = state.repository.delete_payment(id).await?;

    if deleted == 0 {
        return Err(AppError::NotFound(format!("Payment {} not found", id)));
    }

    tracing::info!("Payment {} deleted", id);

    Ok(MessageResponse::new(format!("Payment {} deleted", id)))
}
