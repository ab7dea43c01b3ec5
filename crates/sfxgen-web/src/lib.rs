//! Browser front end and JSON API for the sound-effect generator.

pub mod app;
pub mod error;
pub mod handlers;
pub mod request_context;
pub mod router;
pub mod state;
pub mod ui;
pub mod wav;

pub use error::ApiError;
pub use router::create_router;
pub use state::AppState;

use std::future::Future;
use tokio::net::TcpListener;

/// Serve the router on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}
