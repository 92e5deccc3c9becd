//! Application router configuration.

use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Router,
};

use crate::{
    auth::{log_in, sign_up},
    config::AppConfig,
    endpoints,
    expense::{
        create_expense_endpoint, delete_expense_endpoint, get_expenses, update_expense_endpoint,
    },
};

/// Return a router with all the app's routes.
///
/// The expense routes require a valid bearer token; the auth routes do not.
pub fn build_router() -> Router<AppConfig> {
    Router::new()
        .route(endpoints::ROOT, get(|| async { StatusCode::IM_A_TEAPOT }))
        .route(endpoints::SIGN_UP, post(sign_up))
        .route(endpoints::LOG_IN, post(log_in))
        .route(
            endpoints::EXPENSES,
            get(get_expenses).post(create_expense_endpoint),
        )
        .route(
            endpoints::EXPENSE,
            put(update_expense_endpoint).delete(delete_expense_endpoint),
        )
}
