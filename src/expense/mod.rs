//! The owned-collection mutation service for expenses.
//!
//! Each user exclusively owns an ordered collection of expenses. The four
//! operations (append, list, update by ID, delete by ID) are scoped to the
//! authenticated owner and each one is applied as a single atomic update,
//! returning the owner's full updated collection.

mod db;
mod endpoints;
mod model;

pub use db::{append_expense, delete_expense, list_expenses, update_expense};
pub use endpoints::{
    create_expense_endpoint, delete_expense_endpoint, get_expenses, update_expense_endpoint,
};
pub use model::{Expense, ExpenseData, ExpenseId, ExpensePayload};
