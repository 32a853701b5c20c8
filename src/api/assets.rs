use axum::Router;
use std::path::Path;
use tower_http::services::{ServeDir, ServeFile};

/// Static single-page-app files. `/` and `/index` both answer with `index.html`;
/// any other unmatched path is looked up under `public_dir`.
pub fn router(public_dir: &Path) -> Router {
    let index = public_dir.join("index.html");

    Router::new()
        .route_service("/", ServeFile::new(&index))
        .route_service("/index", ServeFile::new(&index))
        .fallback_service(ServeDir::new(public_dir))
}
