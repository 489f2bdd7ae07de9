//! HTTP presentation layer: one HTML form plus a small JSON surface.

pub mod handlers;
pub mod page;
pub mod routes;

pub use page::{render_page, FormView, Outcome};
pub use routes::{create_router, AppState};

use crate::core::Classifier;
use crate::utils::error::Result;
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Serves the router on an already bound listener until `shutdown` resolves.
pub async fn serve<C, F>(listener: TcpListener, state: Arc<AppState<C>>, shutdown: F) -> Result<()>
where
    C: Classifier + 'static,
    F: Future<Output = ()> + Send + 'static,
{
    if !state.header_image.exists() {
        tracing::warn!(
            "Header image {} not found; the page will render without it",
            state.header_image.display()
        );
    }

    let addr = listener.local_addr()?;
    tracing::info!("☕ Serving the coffee form on http://{}", addr);

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
