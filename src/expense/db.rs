//! The four owner-scoped collection operations, each applied as one atomic
//! database update.

use rusqlite::{Connection, Row};

use crate::{
    db::{CreateTable, MapRow},
    user::{get_user_by_id, UserID},
    Error,
};

use super::model::{Expense, ExpenseData, ExpenseId};

/// Append a new expense to the owner's collection and return the full updated
/// collection.
///
/// The expense's ID is assigned by the database. Insertion order is preserved
/// in the returned collection.
///
/// # Errors
/// This function will return a:
/// - [Error::UserNotFound] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn append_expense(
    user_id: UserID,
    data: &ExpenseData,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let tx = connection.unchecked_transaction()?;

    get_user_by_id(user_id, &tx)?;

    tx.execute(
        "INSERT INTO expense (user_id, text, amount, date) VALUES (?1, ?2, ?3, ?4)",
        (user_id.as_i64(), &data.text, data.amount, data.date),
    )?;

    let expenses = select_all(user_id, &tx)?;
    tx.commit()?;

    Ok(expenses)
}

/// Retrieve the owner's full expense collection in insertion order.
///
/// # Errors
/// This function will return a:
/// - [Error::UserNotFound] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn list_expenses(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    // An empty collection is indistinguishable from a deleted account, so the
    // owner row is checked explicitly.
    get_user_by_id(user_id, connection)?;

    select_all(user_id, connection)
}

/// Replace the text, amount, and date of the expense with `expense_id` in the
/// owner's collection, as a single unit, and return the full updated
/// collection. The expense's ID is preserved.
///
/// The `user_id` predicate is load-bearing: an expense ID that belongs to a
/// different user's collection never matches, and that user's row is left
/// untouched.
///
/// # Errors
/// This function will return a:
/// - [Error::ExpenseNotFound] if no expense owned by `user_id` has
///   `expense_id` (this includes the case where the user row itself is gone),
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    data: &ExpenseData,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let tx = connection.unchecked_transaction()?;

    let rows_updated = tx.execute(
        "UPDATE expense SET text = ?1, amount = ?2, date = ?3
         WHERE id = ?4 AND user_id = ?5",
        (&data.text, data.amount, data.date, expense_id, user_id.as_i64()),
    )?;

    if rows_updated == 0 {
        return Err(Error::ExpenseNotFound);
    }

    let expenses = select_all(user_id, &tx)?;
    tx.commit()?;

    Ok(expenses)
}

/// Remove the expense with `expense_id` from the owner's collection, if
/// present, and return the full updated collection.
///
/// Deletion is idempotent: an ID that matches nothing in the owner's
/// collection (including an ID from another user's collection) leaves the
/// collection unchanged and still succeeds.
///
/// # Errors
/// This function will return a:
/// - [Error::UserNotFound] if `user_id` does not refer to a registered user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn delete_expense(
    user_id: UserID,
    expense_id: ExpenseId,
    connection: &Connection,
) -> Result<Vec<Expense>, Error> {
    let tx = connection.unchecked_transaction()?;

    get_user_by_id(user_id, &tx)?;

    tx.execute(
        "DELETE FROM expense WHERE id = ?1 AND user_id = ?2",
        (expense_id, user_id.as_i64()),
    )?;

    let expenses = select_all(user_id, &tx)?;
    tx.commit()?;

    Ok(expenses)
}

/// SQLite AUTOINCREMENT ids are monotone, so ordering by id is insertion
/// order.
fn select_all(user_id: UserID, connection: &Connection) -> Result<Vec<Expense>, Error> {
    connection
        .prepare(
            "SELECT id, text, amount, date FROM expense
             WHERE user_id = :user_id ORDER BY id",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], Expense::map_row)?
        .map(|maybe_expense| maybe_expense.map_err(Error::from))
        .collect()
}

impl CreateTable for Expense {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expense (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id INTEGER NOT NULL,
                    text TEXT NOT NULL,
                    amount REAL NOT NULL,
                    date TEXT NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        // Ensure the sequence starts at 1
        connection.execute(
            "INSERT OR IGNORE INTO sqlite_sequence (name, seq) VALUES ('expense', 0)",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Expense {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        Ok(Self {
            id: row.get(offset)?,
            text: row.get(offset + 1)?,
            amount: row.get(offset + 2)?,
            date: row.get(offset + 3)?,
        })
    }
}

#[cfg(test)]
mod database_tests {
    use std::str::FromStr;

    use chrono::NaiveDate;
    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        expense::{append_expense, delete_expense, list_expenses, update_expense, ExpenseData},
        password::PasswordHash,
        user::{NewUser, User, UserID},
        Error,
    };

    fn init_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn insert_test_user(conn: &Connection, email: &str) -> User {
        NewUser {
            name: "Alex".to_string(),
            email: EmailAddress::from_str(email).unwrap(),
            password_hash: PasswordHash::new_unchecked("hunter2".to_string()),
        }
        .insert(conn)
        .unwrap()
    }

    fn rent() -> ExpenseData {
        ExpenseData {
            text: "rent".to_string(),
            amount: -1200.0,
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        }
    }

    fn groceries() -> ExpenseData {
        ExpenseData {
            text: "groceries".to_string(),
            amount: -45.67,
            date: NaiveDate::from_ymd_opt(2024, 3, 2).unwrap(),
        }
    }

    #[test]
    fn append_returns_collection_with_new_entry() {
        let conn = init_db();
        let user = insert_test_user(&conn, "foo@bar.baz");

        let expenses = append_expense(user.id(), &rent(), &conn).unwrap();

        assert_eq!(expenses.len(), 1);
        assert!(expenses[0].id > 0);
        assert_eq!(expenses[0].text, "rent");
        assert_eq!(expenses[0].amount, -1200.0);
        assert_eq!(
            expenses[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn append_fails_for_unknown_user() {
        let conn = init_db();

        let result = append_expense(UserID::new(42), &rent(), &conn);

        assert_eq!(result, Err(Error::UserNotFound));
    }

    #[test]
    fn append_preserves_insertion_order() {
        let conn = init_db();
        let user = insert_test_user(&conn, "foo@bar.baz");

        append_expense(user.id(), &rent(), &conn).unwrap();
        let expenses = append_expense(user.id(), &groceries(), &conn).unwrap();

        assert_eq!(expenses.len(), 2);
        assert_eq!(expenses[0].text, "rent");
        assert_eq!(expenses[1].text, "groceries");
        assert!(expenses[0].id < expenses[1].id);
    }

    #[test]
    fn list_returns_empty_collection_for_new_user() {
        let conn = init_db();
        let user = insert_test_user(&conn, "foo@bar.baz");

        let expenses = list_expenses(user.id(), &conn).unwrap();

        assert_eq!(expenses, vec![]);
    }

    #[test]
    fn list_fails_for_unknown_user() {
        let conn = init_db();

        assert_eq!(list_expenses(UserID::new(42), &conn), Err(Error::UserNotFound));
    }

    #[test]
    fn append_then_list_round_trips() {
        let conn = init_db();
        let user = insert_test_user(&conn, "foo@bar.baz");

        let appended = append_expense(user.id(), &rent(), &conn).unwrap();
        let listed = list_expenses(user.id(), &conn).unwrap();

        assert_eq!(appended, listed);
    }

    #[test]
    fn update_replaces_all_fields_and_preserves_id() {
        let conn = init_db();
        let user = insert_test_user(&conn, "foo@bar.baz");
        let expenses = append_expense(user.id(), &rent(), &conn).unwrap();
        let expense_id = expenses[0].id;

        let updated = update_expense(user.id(), expense_id, &groceries(), &conn).unwrap();

        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, expense_id);
        assert_eq!(updated[0].text, "groceries");
        assert_eq!(updated[0].amount, -45.67);
        assert_eq!(
            updated[0].date,
            NaiveDate::from_ymd_opt(2024, 3, 2).unwrap()
        );
    }

    #[test]
    fn update_is_idempotent() {
        let conn = init_db();
        let user = insert_test_user(&conn, "foo@bar.baz");
        let expenses = append_expense(user.id(), &rent(), &conn).unwrap();
        let expense_id = expenses[0].id;

        let once = update_expense(user.id(), expense_id, &groceries(), &conn).unwrap();
        let twice = update_expense(user.id(), expense_id, &groceries(), &conn).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn update_with_identical_values_changes_nothing() {
        let conn = init_db();
        let user = insert_test_user(&conn, "foo@bar.baz");
        let before = append_expense(user.id(), &rent(), &conn).unwrap();

        let after = update_expense(user.id(), before[0].id, &rent(), &conn).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn update_fails_for_unknown_expense_id() {
        let conn = init_db();
        let user = insert_test_user(&conn, "foo@bar.baz");
        append_expense(user.id(), &rent(), &conn).unwrap();

        let result = update_expense(user.id(), 9999, &groceries(), &conn);

        assert_eq!(result, Err(Error::ExpenseNotFound));
    }

    #[test]
    fn update_does_not_touch_another_users_expense() {
        let conn = init_db();
        let owner = insert_test_user(&conn, "owner@test.com");
        let intruder = insert_test_user(&conn, "intruder@test.com");
        let owners_expenses = append_expense(owner.id(), &rent(), &conn).unwrap();
        let owners_expense_id = owners_expenses[0].id;

        let result = update_expense(intruder.id(), owners_expense_id, &groceries(), &conn);

        assert_eq!(result, Err(Error::ExpenseNotFound));
        // The owner's collection must be untouched.
        let owners_expenses_after = list_expenses(owner.id(), &conn).unwrap();
        assert_eq!(owners_expenses, owners_expenses_after);
    }

    #[test]
    fn delete_removes_expense() {
        let conn = init_db();
        let user = insert_test_user(&conn, "foo@bar.baz");
        let expenses = append_expense(user.id(), &rent(), &conn).unwrap();

        let remaining = delete_expense(user.id(), expenses[0].id, &conn).unwrap();

        assert_eq!(remaining, vec![]);
        assert_eq!(list_expenses(user.id(), &conn).unwrap(), vec![]);
    }

    #[test]
    fn delete_is_a_no_op_for_unknown_expense_id() {
        let conn = init_db();
        let user = insert_test_user(&conn, "foo@bar.baz");
        let before = append_expense(user.id(), &rent(), &conn).unwrap();

        let after = delete_expense(user.id(), 9999, &conn).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn delete_fails_for_unknown_user() {
        let conn = init_db();

        let result = delete_expense(UserID::new(42), 1, &conn);

        assert_eq!(result, Err(Error::UserNotFound));
    }

    #[test]
    fn delete_does_not_touch_another_users_expense() {
        let conn = init_db();
        let owner = insert_test_user(&conn, "owner@test.com");
        let intruder = insert_test_user(&conn, "intruder@test.com");
        let owners_expenses = append_expense(owner.id(), &rent(), &conn).unwrap();

        // A cross-owner delete is a no-op on the intruder's own (empty)
        // collection and must leave the owner's collection alone.
        let intruders_expenses =
            delete_expense(intruder.id(), owners_expenses[0].id, &conn).unwrap();

        assert_eq!(intruders_expenses, vec![]);
        assert_eq!(list_expenses(owner.id(), &conn).unwrap(), owners_expenses);
    }

    #[test]
    fn collections_are_independent_between_users() {
        let conn = init_db();
        let first = insert_test_user(&conn, "first@test.com");
        let second = insert_test_user(&conn, "second@test.com");

        append_expense(first.id(), &rent(), &conn).unwrap();
        append_expense(second.id(), &groceries(), &conn).unwrap();

        let first_expenses = list_expenses(first.id(), &conn).unwrap();
        let second_expenses = list_expenses(second.id(), &conn).unwrap();

        assert_eq!(first_expenses.len(), 1);
        assert_eq!(first_expenses[0].text, "rent");
        assert_eq!(second_expenses.len(), 1);
        assert_eq!(second_expenses[0].text, "groceries");
    }
}
