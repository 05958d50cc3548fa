use axum::Router;
use utoipa_axum::router::OpenApiRouter;

use crate::{app_state::AppState, swagger};

pub mod categories;
pub mod orders;
pub mod payments;
pub mod products;

/// Every resource router, merged, with OpenAPI specs attached.
pub fn routes_with_openapi() -> OpenApiRouter<AppState> {
    categories::routes_with_openapi()
        .merge(products::routes_with_openapi())
        .merge(orders::routes_with_openapi())
        .merge(payments::routes_with_openapi())
}

/// Builds the application router, Swagger UI included, bound to `state`.
pub fn app(state: AppState) -> Router {
    let routes = routes_with_openapi();

    let mut openapi = routes.get_openapi().clone();
    openapi.info = utoipa::openapi::InfoBuilder::new()
        .title("StoreService API")
        .version("1.0.0")
        .build();
    let swagger_ui = swagger::create_swagger_ui(openapi);

    Router::new()
        .merge(routes)
        .merge(swagger_ui)
        .with_state(state)
}
