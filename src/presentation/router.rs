use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::application::ports::{AnalysisEngine, ArtifactStore};
use crate::infrastructure::observability::request_id_middleware;
use crate::presentation::handlers::{
    analyze_handler, delete_file_handler, download_file_handler, get_file_handler, health_handler,
    list_files_handler, not_found_handler, root_handler, upload_and_analyze_handler,
    upload_handler,
};
use crate::presentation::state::AppState;

pub fn create_router<S, A>(state: AppState<S, A>) -> Router
where
    S: ArtifactStore + 'static,
    A: AnalysisEngine + 'static,
{
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // The payload cap is enforced byte-exact by the store; the transport
    // limit only has to clear it plus multipart framing overhead.
    let body_limit =
        DefaultBodyLimit::max((state.settings.storage.max_upload_bytes() + 1024 * 1024) as usize);

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/api/upload", post(upload_handler::<S, A>))
        .route("/api/analyze", post(analyze_handler::<S, A>))
        .route(
            "/api/upload-and-analyze",
            post(upload_and_analyze_handler::<S, A>),
        )
        .route("/api/files", get(list_files_handler::<S, A>))
        .route(
            "/api/files/{filename}",
            get(get_file_handler::<S, A>).delete(delete_file_handler::<S, A>),
        )
        .route(
            "/api/files/download/{filename}",
            get(download_file_handler::<S, A>),
        )
        .fallback(not_found_handler)
        .layer(body_limit)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(trace_layer)
        .layer(cors)
        .with_state(state)
}
