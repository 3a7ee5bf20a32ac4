//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use rusqlite::Connection;
use sha2::{Digest, Sha512};
use time::Duration;

use crate::{
    Error,
    bill::{BillStore, SQLiteBillStore},
    db::initialize,
    session::DEFAULT_COOKIE_DURATION,
};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The key to be used for signing and encrypting private cookies.
    pub cookie_key: Key,

    /// How long a session lasts without any request.
    pub cookie_duration: Duration,

    /// The database connection holding the users.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The store holding the bills.
    ///
    /// The bill pages work without a store, they just have nothing to show.
    pub bill_store: Option<Arc<dyn BillStore>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the user and
    /// bill tables, and use the same database as the bill store.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, cookie_secret: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        let connection = Arc::new(Mutex::new(db_connection));
        let bill_store: Arc<dyn BillStore> = Arc::new(SQLiteBillStore::new(connection.clone()));

        Ok(Self {
            cookie_key: create_cookie_key(cookie_secret),
            cookie_duration: DEFAULT_COOKIE_DURATION,
            db_connection: connection,
            bill_store: Some(bill_store),
        })
    }

    /// Replace the bill store, or run without one if `bill_store` is `None`.
    pub fn with_bill_store(self, bill_store: Option<Arc<dyn BillStore>>) -> Self {
        Self { bill_store, ..self }
    }
}

// this impl tells `PrivateCookieJar` how to access the key from our state
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}

/// Create a signing key for cookies from a `secret`s string.
pub fn create_cookie_key(secret: &str) -> Key {
    let hash = Sha512::digest(secret);

    Key::from(&hash)
}
