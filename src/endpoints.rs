//! The API endpoint URIs.

/// The root route, which serves no coffee.
pub const ROOT: &str = "/";
/// The route for registering a new user.
pub const SIGN_UP: &str = "/auth/signup";
/// The route for logging in a user and issuing a bearer token.
pub const LOG_IN: &str = "/auth/login";
/// The route for listing and appending to the authenticated user's expenses.
pub const EXPENSES: &str = "/expenses";
/// The route for updating or deleting one expense by ID.
pub const EXPENSE: &str = "/expenses/:expense_id";
