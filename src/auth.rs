//! Bearer-token authentication: token issuance (signup/login) and the
//! [Claims] extractor used by the protected expense routes.

use std::str::FromStr;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Json, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{Duration, Utc};
use email_address::EmailAddress;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    config::AppConfig,
    password::{PasswordHash, RawPassword},
    response::ApiResponse,
    user::{get_user_by_email, NewUser, UserID},
    Error,
};

// The extractor code in this module is adapted from
// https://github.com/tokio-rs/axum/blob/main/examples/jwt/src/main.rs

/// How long an issued token stays valid.
const TOKEN_VALIDITY_HOURS: i64 = 24;

/// The contents of a JSON Web Token.
#[derive(Serialize, Deserialize)]
pub struct Claims {
    /// The expiry time of the token.
    pub exp: usize,
    /// The time the token was issued.
    pub iat: usize,
    /// The ID of the user the token was issued to.
    pub user_id: UserID,
}

#[async_trait]
impl<S> FromRequestParts<S> for Claims
where
    AppConfig: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AuthError::InvalidToken)?;

        let app_config = parts
            .extract_with_state::<AppConfig, _>(state)
            .await
            .map_err(|_| AuthError::InvalidToken)?;

        let token_data = decode_jwt(bearer.token(), app_config.decoding_key())?;

        Ok(token_data.claims)
    }
}

/// The errors that may occur while signing up, logging in, or validating a
/// bearer token.
#[derive(Debug, PartialEq)]
pub enum AuthError {
    /// The signup request was missing the name, email, or password.
    MissingSignUpFields,
    /// The login request was missing the email or password.
    MissingCredentials,
    /// The signup email could not be parsed as an email address.
    InvalidEmail,
    /// The signup password did not meet the length requirement.
    WeakPassword,
    /// The signup email is already registered.
    DuplicateEmail,
    /// The email/password combination did not match a registered user.
    WrongCredentials,
    /// The bearer token was missing, malformed, or expired.
    ///
    /// Clients respond to this by clearing their stored token and returning
    /// to the login page, so it must use a status distinct from not-found.
    InvalidToken,
    /// The token could not be signed.
    TokenCreation,
    /// An unexpected error in a third-party library.
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingSignUpFields => (
                StatusCode::BAD_REQUEST,
                "Name, email, and password are required.",
            ),
            AuthError::MissingCredentials => {
                (StatusCode::BAD_REQUEST, "Email and password are required.")
            }
            AuthError::InvalidEmail => {
                (StatusCode::BAD_REQUEST, "A valid email address is required.")
            }
            AuthError::WeakPassword => (
                StatusCode::BAD_REQUEST,
                "Password must be at least 4 characters long.",
            ),
            AuthError::DuplicateEmail => {
                (StatusCode::CONFLICT, "User already exists, you can login.")
            }
            AuthError::WrongCredentials => (
                StatusCode::FORBIDDEN,
                "Auth failed: email or password is wrong.",
            ),
            AuthError::InvalidToken => {
                (StatusCode::FORBIDDEN, "JWT token is missing or invalid.")
            }
            AuthError::TokenCreation => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Token creation error")
            }
            AuthError::InternalError => {
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

/// The request body for the signup endpoint.
///
/// All fields are optional so that a missing field produces the API's own
/// validation error instead of a deserialization rejection.
#[derive(Deserialize)]
pub struct SignUpPayload {
    /// The display name for the new account.
    pub name: Option<String>,
    /// The email address for the new account.
    pub email: Option<String>,
    /// The password for the new account.
    pub password: Option<String>,
}

/// The request body for the login endpoint.
#[derive(Deserialize)]
pub struct LogInPayload {
    /// Email entered during login.
    pub email: Option<String>,
    /// Password entered during login.
    pub password: Option<String>,
}

/// The response body for a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInResponse {
    /// A human-readable description of the outcome.
    pub message: String,
    /// Always `true` for this response.
    pub success: bool,
    /// The bearer token to send with subsequent requests.
    #[serde(rename = "jwtToken")]
    pub jwt_token: String,
    /// The email of the logged-in user.
    pub email: String,
    /// The display name of the logged-in user.
    pub name: String,
}

/// Handler for signup requests.
///
/// # Panics
///
/// Panics if the lock for the database connection is poisoned.
///
/// # Errors
///
/// This function will return an error if a field is missing or invalid, or if
/// the email is already registered.
pub async fn sign_up(
    State(config): State<AppConfig>,
    Json(payload): Json<SignUpPayload>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), AuthError> {
    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or(AuthError::MissingSignUpFields)?;
    let email = payload.email.ok_or(AuthError::MissingSignUpFields)?;
    let password = payload.password.ok_or(AuthError::MissingSignUpFields)?;

    let email = EmailAddress::from_str(&email).map_err(|_| AuthError::InvalidEmail)?;
    let password = RawPassword::new(password).map_err(|_| AuthError::WeakPassword)?;
    let password_hash = PasswordHash::new(&password).map_err(|error| {
        tracing::error!("Error hashing password: {}", error);
        AuthError::InternalError
    })?;

    NewUser {
        name,
        email,
        password_hash,
    }
    .insert(&config.db_connection().lock().unwrap())
    .map_err(|error| match error {
        Error::DuplicateEmail => AuthError::DuplicateEmail,
        error => {
            tracing::error!("Error creating user: {}", error);
            AuthError::InternalError
        }
    })?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message_only("Signup successful")),
    ))
}

/// Handler for login requests.
///
/// # Panics
///
/// Panics if the lock for the database connection is poisoned.
///
/// # Errors
///
/// This function will return an error in a few situations.
/// - The email or password is missing.
/// - The email does not belong to a registered user.
/// - The password is not correct.
/// - An internal error occurred when verifying the password.
pub async fn log_in(
    State(config): State<AppConfig>,
    Json(payload): Json<LogInPayload>,
) -> Result<Json<LogInResponse>, AuthError> {
    let email = payload.email.ok_or(AuthError::MissingCredentials)?;
    let password = payload.password.ok_or(AuthError::MissingCredentials)?;

    // An unparseable email cannot belong to a registered user, and the error
    // must not reveal whether the address exists.
    let email = EmailAddress::from_str(&email).map_err(|_| AuthError::WrongCredentials)?;

    let user = get_user_by_email(&email, &config.db_connection().lock().unwrap()).map_err(
        |error| match error {
            Error::UserNotFound => AuthError::WrongCredentials,
            error => {
                tracing::error!("Error matching user: {}", error);
                AuthError::InternalError
            }
        },
    )?;

    let password_is_correct = user
        .password_hash()
        .verify(&RawPassword::new_unchecked(password))
        .map_err(|error| {
            tracing::error!("Error verifying password: {}", error);
            AuthError::InternalError
        })?;

    if !password_is_correct {
        return Err(AuthError::WrongCredentials);
    }

    let token = encode_jwt(user.id(), config.encoding_key())?;

    Ok(Json(LogInResponse {
        message: "Login successful".to_owned(),
        success: true,
        jwt_token: token,
        email: user.email().to_string(),
        name: user.name().to_owned(),
    }))
}

fn encode_jwt(user_id: UserID, encoding_key: &EncodingKey) -> Result<String, AuthError> {
    let now = Utc::now();
    let exp = (now + Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp() as usize;
    let iat = now.timestamp() as usize;
    let claims = Claims { exp, iat, user_id };

    encode(&Header::default(), &claims, encoding_key).map_err(|error| {
        tracing::error!("Error encoding JWT: {}", error);
        AuthError::TokenCreation
    })
}

fn decode_jwt(jwt_token: &str, decoding_key: &DecodingKey) -> Result<TokenData<Claims>, AuthError> {
    decode(jwt_token, decoding_key, &Validation::default()).map_err(|_| AuthError::InvalidToken)
}
