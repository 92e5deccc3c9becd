//! Defines the app level error type and its conversion to JSON API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An expense was created or updated without all of its required fields.
    ///
    /// Validation happens before any write, so nothing is persisted when this
    /// error is returned.
    #[error("text, amount, and date are required")]
    MissingExpenseFields,

    /// The user referenced by the caller's token could not be found.
    ///
    /// This signals session/account inconsistency: the client holds a valid
    /// token for an account that no longer resolves.
    #[error("no user found with the given ID")]
    UserNotFound,

    /// The expense ID did not match any expense owned by the caller.
    ///
    /// This covers both a missing expense and an expense that belongs to a
    /// different user. The two cases are deliberately indistinguishable so
    /// that clients cannot probe other users' collections.
    #[error("no expense found with the given ID for this user")]
    ExpenseNotFound,

    /// The email used to sign up is already registered.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 787 occurs when a FOREIGN KEY constraint failed. The only
            // foreign key in the schema is expense.user_id, so the referenced
            // user row is gone.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::UserNotFound
            }
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::QueryReturnedNoRows => Error::UserNotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Error::MissingExpenseFields => (
                StatusCode::BAD_REQUEST,
                "Text, amount, and date are required.",
            ),
            Error::UserNotFound => (StatusCode::NOT_FOUND, "User not found."),
            Error::ExpenseNotFound => (StatusCode::NOT_FOUND, "User or expense not found."),
            Error::DuplicateEmail => (StatusCode::CONFLICT, "User already exists, you can login."),
            // Internal errors are logged but not shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong")
            }
        };

        let body = Json(json!({
            "message": message,
            "success": false,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use super::Error;

    #[test]
    fn missing_fields_maps_to_bad_request() {
        let response = Error::MissingExpenseFields.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_errors_map_to_404() {
        assert_eq!(
            Error::UserNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            Error::ExpenseNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn sql_error_maps_to_internal_server_error() {
        let response = Error::SqlError(rusqlite::Error::InvalidQuery).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn query_returned_no_rows_maps_to_user_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::UserNotFound);
    }
}
