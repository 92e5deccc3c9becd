//! The REST endpoints for the expense collection.
//!
//! Every handler takes the authenticated user's claims, runs one collection
//! operation against the shared database connection, and replies with the
//! owner's full updated collection in the standard response envelope.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::{auth::Claims, config::AppConfig, response::ApiResponse, Error};

use super::{
    db::{append_expense, delete_expense, list_expenses, update_expense},
    model::{Expense, ExpenseId, ExpensePayload},
};

/// A handler for retrieving the authenticated user's full expense collection.
pub async fn get_expenses(
    State(config): State<AppConfig>,
    claims: Claims,
) -> Result<Json<ApiResponse<Vec<Expense>>>, Error> {
    let expenses = list_expenses(
        claims.user_id,
        &config.db_connection().lock().unwrap(),
    )?;

    Ok(Json(ApiResponse::with_data(
        "Fetched expenses successfully",
        expenses,
    )))
}

/// A handler for appending a new expense to the authenticated user's
/// collection.
pub async fn create_expense_endpoint(
    State(config): State<AppConfig>,
    claims: Claims,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<ApiResponse<Vec<Expense>>>, Error> {
    let data = payload.validate()?;
    let expenses = append_expense(
        claims.user_id,
        &data,
        &config.db_connection().lock().unwrap(),
    )?;

    Ok(Json(ApiResponse::with_data(
        "Expense added successfully",
        expenses,
    )))
}

/// A handler for replacing the fields of one expense in the authenticated
/// user's collection.
pub async fn update_expense_endpoint(
    State(config): State<AppConfig>,
    claims: Claims,
    Path(expense_id): Path<ExpenseId>,
    Json(payload): Json<ExpensePayload>,
) -> Result<Json<ApiResponse<Vec<Expense>>>, Error> {
    let data = payload.validate()?;
    let expenses = update_expense(
        claims.user_id,
        expense_id,
        &data,
        &config.db_connection().lock().unwrap(),
    )?;

    Ok(Json(ApiResponse::with_data(
        "Expense updated successfully",
        expenses,
    )))
}

/// A handler for removing one expense from the authenticated user's
/// collection. Deleting an expense that is already gone still succeeds.
pub async fn delete_expense_endpoint(
    State(config): State<AppConfig>,
    claims: Claims,
    Path(expense_id): Path<ExpenseId>,
) -> Result<Json<ApiResponse<Vec<Expense>>>, Error> {
    let expenses = delete_expense(
        claims.user_id,
        expense_id,
        &config.db_connection().lock().unwrap(),
    )?;

    Ok(Json(ApiResponse::with_data(
        "Expense deleted successfully",
        expenses,
    )))
}
