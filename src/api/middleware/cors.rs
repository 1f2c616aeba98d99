use axum::Router;
use tower_http::cors::{Any, CorsLayer};

// The dashboard is served from wherever; the API itself is open.
pub fn add_cors(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);
    router.layer(cors)
}
