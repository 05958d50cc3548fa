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
    models::{CreateProductEntity, ProductEntity, ProductWithCategory, UpdateProductEntity},
    validation::{not_null, truthy},
};

pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    utoipa_axum::router::OpenApiRouter::new().nest(
        "/products",
        OpenApiRouter::new()
            .routes(utoipa_axum::routes!(get_products))
            .routes(utoipa_axum::routes!(create_product))
            .routes(utoipa_axum::routes!(get_products_by_category))
            .routes(utoipa_axum::routes!(get_product))
            .routes(utoipa_axum::routes!(update_product))
            .routes(utoipa_axum::routes!(delete_product)),
    )
}

/// Fetch all products.
#[utoipa::path(
    get,
    path = "/",
    tags = ["Products"],
    responses(
        (status = 200, description = "List all products", body = StdResponse<Vec<ProductEntity>>)
    )
)]
async fn get_products(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let products = state.repository.list_products().await?;

    Ok(StdResponse::list(products))
}

/// Fetch the products of one category. An empty result is reported as not found.
#[utoipa::path(
    get,
    path = "/category/{category_id}",
    tags = ["Products"],
    params(
        ("category_id" = i32, Path, description = "Category ID to filter by")
    ),
    responses(
        (status = 200, description = "Products in the category", body = StdResponse<Vec<ProductEntity>>),
        (status = 404, description = "No products in the category", body = ErrorResponse)
    )
)]
async fn get_products_by_category(
    AppPath(category_id): AppPath<i32>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let products = state
        .repository
        .list_products_by_category(category_id)
        .await?;

    if products.is_empty() {
        return Err(AppError::NotFound(
            "No products found in this category".into(),
        ));
    }

    Ok(StdResponse::list(products))
}

/// Fetch a product along with its category name.
#[utoipa::path(
    get,
    path = "/{id}",
    tags = ["Products"],
    params(
        ("id" = String, Path, description = "Product ID to fetch")
    ),
    responses(
        (status = 200, description = "Get product successfully", body = StdResponse<ProductWithCategory>),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn get_product(
    AppPath(id): AppPath<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let product = state
        .repository
        .find_product(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".into()))?;

    Ok(StdResponse::data(product))
}

#[derive(Deserialize, ToSchema)]
struct CreateProductReq {
    id: Option<String>,
    category_id: Option<i32>,
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    stock: Option<i32>,
    image_url: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
struct CreateProductRes {
    success: bool,
    message: String,
    product_id: String,
}

/// Create a product under a client-chosen ID.
#[utoipa::path(
    post,
    path = "/",
    tags = ["Products"],
    request_body = CreateProductReq,
    responses(
        (status = 201, description = "Created product successfully", body = CreateProductRes),
        (status = 400, description = "A required field is missing", body = ErrorResponse),
        (status = 500, description = "Duplicate ID or database failure", body = ErrorResponse)
    )
)]
async fn create_product(
    State(state): State<AppState>,
    AppJson(body): AppJson<CreateProductReq>,
) -> Result<impl IntoResponse, AppError> {
    let (Some(id), Some(category_id), Some(name), Some(price)) = (
        truthy(body.id),
        truthy(body.category_id),
        truthy(body.name),
        truthy(body.price),
    ) else {
        return Err(AppError::BadRequest(
            "Required fields: id, category_id, name, price".into(),
        ));
    };

    let product = state
        .repository
        .create_product(CreateProductEntity {
            id,
            category_id,
            name,
            description: truthy(body.description),
            price,
            stock: truthy(body.stock).unwrap_or(0),
            image_url: truthy(body.image_url),
        })
        .await?;

    tracing::info!("Product {} created", product.id);

    Ok((
        StatusCode::CREATED,
        Json(CreateProductRes {
            success: true,
            message: "Product created successfully".into(),
            product_id: product.id,
        }),
    ))
}

#[derive(Deserialize, ToSchema)]
struct UpdateProductReq {
    category_id: Option<i32>,
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    stock: Option<i32>,
    image_url: Option<String>,
}

impl TryFrom<UpdateProductReq> for UpdateProductEntity {
    type Error = AppError;

    fn try_from(req: UpdateProductReq) -> Result<Self, Self::Error> {
        Ok(Self {
            category_id: not_null(req.category_id, "products", "category_id")?,
            name: not_null(req.name, "products", "name")?,
            description: req.description,
            price: not_null(req.price, "products", "price")?,
            stock: not_null(req.stock, "products", "stock")?,
            image_url: req.image_url,
        })
    }
}

/// Overwrite every column of a product. Omitted optional columns become null.
#[utoipa::path(
    put,
    path = "/{id}",
    tags = ["Products"],
    params(
        ("id" = String, Path, description = "Product ID to update")
    ),
    request_body = UpdateProductReq,
    responses(
        (status = 200, description = "Updated product successfully", body = MessageResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn update_product(
    AppPath(id): AppPath<String>,
    State(state): State<AppState>,
    AppJson(body): AppJson<UpdateProductReq>,
) -> Result<impl IntoResponse, AppError> {
    // An UPDATE matching no row never reaches the not-null check.
    let changes = match UpdateProductEntity::try_from(body) {
        Ok(changes) => changes,
        Err(err) => {
            if state.repository.find_product(&id).await?.is_none() {
                return Err(AppError::NotFound("Product not found".into()));
            }
            return Err(err);
        }
    };

    let updated = state.repository.update_product(&id, changes).await?;

    if updated == 0 {
        return Err(AppError::NotFound("Product not found".into()));
    }

    tracing::info!("Product {} updated", id);

    Ok(MessageResponse::new("Product updated successfully"))
}

/// Delete a product.
#[utoipa::path(
    delete,
    path = "/{id}",
    tags = ["Products"],
    params(
        ("id" = String, Path, description = "Product ID to delete")
    ),
    responses(
        (status = 200, description = "Deleted product successfully", body = MessageResponse),
        (status = 404, description = "Product not found", body = ErrorResponse)
    )
)]
async fn delete_product(
    AppPath(id): AppPath<String>,
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let deleted = state.repository.delete_product(&id).await?;

    if deleted == 0 {
        return Err(AppError::NotFound("Product not found".into()));
    }

    tracing::info!("Product {} deleted", id);

    Ok(MessageResponse::new("Product deleted successfully"))
}
