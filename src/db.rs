//! Sets up the application's database.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::{Error, bill::create_bill_table, user::create_user_table};

/// Create the tables for users and bills if they do not exist yet.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    let transaction = Transaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_user_table(&transaction)?;
    create_bill_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
