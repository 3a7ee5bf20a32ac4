//! The store that holds bills and their attachments.

use std::{
    fmt::Debug,
    sync::{Arc, Mutex},
};

use axum::extract::FromRef;
use rusqlite::{Connection, Row};

use crate::{
    AppState, Error,
    bill::core::{Attachment, Bill, BillId, BillStatus, UploadedFile},
    endpoints::{self, format_endpoint},
};

/// Lists, creates and updates bills.
///
/// A bill starts life when its attachment is uploaded with [BillStore::create]
/// and is filled in by [BillStore::update] when the form is submitted.
pub trait BillStore: Debug + Send + Sync {
    /// Every bill that has been submitted, in no particular order.
    fn list(&self) -> Result<Vec<Bill>, Error>;

    /// Store `attachment` and start a new bill for it.
    fn create(&self, attachment: Attachment) -> Result<UploadedFile, Error>;

    /// Save the form values of `bill`, marking it as submitted.
    ///
    /// Only a bill that was uploaded by `bill.email` and has not been
    /// submitted yet can be updated.
    ///
    /// # Errors
    ///
    /// Returns [Error::UpdateMissingBill] if there is no such bill.
    fn update(&self, bill: &Bill) -> Result<Bill, Error>;

    /// The attachment of the bill `id`.
    ///
    /// # Errors
    ///
    /// Returns [Error::NotFound] if there is no such bill.
    fn attachment(&self, id: BillId) -> Result<Attachment, Error>;
}

/// The state needed by the bill route handlers.
#[derive(Debug, Clone)]
pub struct BillStoreState {
    /// The store holding the bills, if the server has one.
    pub bill_store: Option<Arc<dyn BillStore>>,
}

impl FromRef<AppState> for BillStoreState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            bill_store: state.bill_store.clone(),
        }
    }
}

/// Run `operation` on `store` in tokio's blocking thread pool.
///
/// Store calls lock a database connection, so handlers go through here
/// instead of calling the store on the async worker.
pub(crate) async fn run_blocking<T>(
    store: Arc<dyn BillStore>,
    operation: impl FnOnce(&dyn BillStore) -> Result<T, Error> + Send + 'static,
) -> Result<T, Error>
where
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || operation(store.as_ref()))
        .await
        .unwrap_or_else(|error| {
            tracing::error!("Bill store task failed: {error}");
            Err(Error::Fetch("Erreur 500".to_owned()))
        })
}

/// A [BillStore] backed by the application's SQLite database.
#[derive(Debug, Clone)]
pub struct SQLiteBillStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteBillStore {
    /// Create a new store from the SQLite `connection`.
    ///
    /// The bill table should already exist, see [create_bill_table].
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

/// Create the bill table.
///
/// # Errors
///
/// This function will return an error if the SQL query failed.
pub fn create_bill_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS bill (
            id INTEGER PRIMARY KEY,
            email TEXT NOT NULL,
            type TEXT NOT NULL DEFAULT '',
            name TEXT NOT NULL DEFAULT '',
            date TEXT NOT NULL DEFAULT '',
            amount REAL,
            vat REAL,
            pct INTEGER,
            commentary TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'pending',
            file_name TEXT NOT NULL,
            file_url TEXT NOT NULL DEFAULT '',
            file_content_type TEXT NOT NULL,
            file_data BLOB NOT NULL,
            submitted INTEGER NOT NULL DEFAULT 0
        )",
        (),
    )?;

    Ok(())
}

const BILL_COLUMNS: &str =
    "id, email, type, name, date, amount, vat, pct, commentary, status, file_url, file_name";

fn map_bill_row(row: &Row) -> Result<Bill, rusqlite::Error> {
    let file_url: String = row.get(10)?;
    let file_name: String = row.get(11)?;

    Ok(Bill {
        id: row.get(0)?,
        email: row.get(1)?,
        bill_type: row.get(2)?,
        name: row.get(3)?,
        date: row.get(4)?,
        amount: row.get(5)?,
        vat: row.get(6)?,
        pct: row.get(7)?,
        commentary: row.get(8)?,
        status: row.get(9)?,
        file_url: Some(file_url).filter(|url| !url.is_empty()),
        file_name: Some(file_name).filter(|name| !name.is_empty()),
    })
}

impl SQLiteBillStore {
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|error| {
            tracing::error!("Could not acquire database lock: {error}");
            Error::DatabaseLockError
        })
    }
}

impl BillStore for SQLiteBillStore {
    fn list(&self) -> Result<Vec<Bill>, Error> {
        self.lock()?
            .prepare(&format!(
                "SELECT {BILL_COLUMNS} FROM bill WHERE submitted = 1;"
            ))?
            .query_map([], map_bill_row)?
            .map(|maybe_bill| maybe_bill.map_err(|error| error.into()))
            .collect()
    }

    fn create(&self, attachment: Attachment) -> Result<UploadedFile, Error> {
        let mut connection = self.lock()?;
        let transaction = connection.transaction()?;

        transaction.execute(
            "INSERT INTO bill (email, status, file_name, file_content_type, file_data)
                VALUES (?1, ?2, ?3, ?4, ?5);",
            (
                &attachment.email,
                BillStatus::Pending,
                &attachment.file_name,
                &attachment.content_type,
                &attachment.data,
            ),
        )?;

        let key = transaction.last_insert_rowid();
        let file_url = format_endpoint(endpoints::BILL_FILE_VIEW, key);
        transaction.execute(
            "UPDATE bill SET file_url = ?1 WHERE id = ?2;",
            (&file_url, key),
        )?;
        transaction.commit()?;

        Ok(UploadedFile { file_url, key })
    }

    fn update(&self, bill: &Bill) -> Result<Bill, Error> {
        self.lock()?
            .prepare(&format!(
                "UPDATE bill SET
                    type = :type,
                    name = :name,
                    date = :date,
                    amount = :amount,
                    vat = :vat,
                    pct = :pct,
                    commentary = :commentary,
                    status = :status,
                    submitted = 1
                WHERE id = :id AND email = :email AND submitted = 0
                RETURNING {BILL_COLUMNS};"
            ))?
            .query_row(
                rusqlite::named_params! {
                    ":id": bill.id,
                    ":email": bill.email,
                    ":type": bill.bill_type,
                    ":name": bill.name,
                    ":date": bill.date,
                    ":amount": bill.amount,
                    ":vat": bill.vat,
                    ":pct": bill.pct,
                    ":commentary": bill.commentary,
                    ":status": bill.status,
                },
                map_bill_row,
            )
            .map_err(|error| match error {
                rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingBill,
                error => error.into(),
            })
    }

    fn attachment(&self, id: BillId) -> Result<Attachment, Error> {
        self.lock()?
            .prepare(
                "SELECT email, file_name, file_content_type, file_data FROM bill WHERE id = :id;",
            )?
            .query_row(&[(":id", &id)], |row| {
                Ok(Attachment {
                    email: row.get(0)?,
                    file_name: row.get(1)?,
                    content_type: row.get(2)?,
                    data: row.get(3)?,
                })
            })
            .map_err(|error| error.into())
    }
}
