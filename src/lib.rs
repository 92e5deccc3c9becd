//! A REST API for tracking personal expenses.
//!
//! Each registered user exclusively owns an ordered collection of expenses.
//! The API exposes four operations over that collection (append, list, update
//! by ID, delete by ID), each scoped to the authenticated owner by a bearer
//! token and each returning the owner's full updated collection.

#![warn(missing_docs)]

use std::time::Duration;

use axum_server::Handle;
use tokio::signal;

pub mod auth;
pub mod config;
pub mod db;
pub mod endpoints;
pub mod error;
pub mod expense;
pub mod logging;
pub mod password;
pub mod response;
pub mod routing;
pub mod user;

pub use config::AppConfig;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use logging::{logging_middleware, LOG_BODY_LENGTH_LIMIT};
pub use routing::build_router;

/// An async task that waits for either the ctrl+c or terminate signal,
/// whichever comes first, and then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
