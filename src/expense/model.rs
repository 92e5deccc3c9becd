//! Defines the expense model and the validated request payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Error;

/// An alias for expense IDs, assigned by the database at creation and stable
/// for the expense's lifetime.
pub type ExpenseId = i64;

/// One signed monetary entry belonging to exactly one user.
///
/// Positive amounts represent income, negative amounts represent expenses.
/// This convention lives entirely in the client; the server imposes no
/// constraint on sign or magnitude.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    ///
    /// Serialized as `_id` to match the wire format the client expects.
    #[serde(rename = "_id")]
    pub id: ExpenseId,
    /// A text description of what the expense was for. Doubles as a free-form
    /// category label.
    pub text: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// The date the expense occurred on.
    pub date: NaiveDate,
}

/// The request body for creating or updating an expense.
///
/// All fields are optional so that a missing field produces the API's own
/// validation error instead of a deserialization rejection. Validate with
/// [ExpensePayload::validate] before persisting anything.
#[derive(Debug, Deserialize)]
pub struct ExpensePayload {
    /// A text description of what the expense was for.
    pub text: Option<String>,
    /// The amount of money spent or earned.
    pub amount: Option<f64>,
    /// The date the expense occurred on.
    pub date: Option<NaiveDate>,
}

/// A fully validated set of expense fields, ready to be persisted.
///
/// Updates replace all three fields together as a single unit; there is no
/// partial field update.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseData {
    /// A non-empty text description.
    pub text: String,
    /// The amount of money spent or earned.
    pub amount: f64,
    /// The date the expense occurred on.
    pub date: NaiveDate,
}

impl ExpensePayload {
    /// Check that the text, amount, and date are all present and that the
    /// text is non-empty.
    ///
    /// # Errors
    ///
    /// Returns [Error::MissingExpenseFields] if any field is missing or the
    /// text is empty.
    pub fn validate(self) -> Result<ExpenseData, Error> {
        let text = self
            .text
            .filter(|text| !text.trim().is_empty())
            .ok_or(Error::MissingExpenseFields)?;
        let amount = self.amount.ok_or(Error::MissingExpenseFields)?;
        let date = self.date.ok_or(Error::MissingExpenseFields)?;

        Ok(ExpenseData { text, amount, date })
    }
}
