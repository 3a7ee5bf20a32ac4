//! The bill record and the values passed to and from the store.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// The id the store gives a bill when its attachment is uploaded.
pub type BillId = i64;

/// The expense types offered in the new bill form.
pub const BILL_TYPES: [&str; 7] = [
    "Transports",
    "Restaurants et bars",
    "Hôtel et logement",
    "Services en ligne",
    "IT et électronique",
    "Equipement et matériel",
    "Fournitures de bureau",
];

/// The VAT percentage used when the employee leaves it empty.
pub const DEFAULT_VAT_PCT: u32 = 20;

/// Where a bill is in its review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    /// Waiting for an admin.
    Pending,
    /// Reimbursed.
    Accepted,
    /// Turned down.
    Refused,
}

impl BillStatus {
    /// The value stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Pending => "pending",
            BillStatus::Accepted => "accepted",
            BillStatus::Refused => "refused",
        }
    }

    /// The text shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            BillStatus::Pending => "En attente",
            BillStatus::Accepted => "Accepté",
            BillStatus::Refused => "Refused",
        }
    }
}

impl Display for BillStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BillStatus::Pending),
            "accepted" => Ok(BillStatus::Accepted),
            "refused" => Ok(BillStatus::Refused),
            other => Err(format!("unknown bill status \"{other}\"")),
        }
    }
}

impl ToSql for BillStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for BillStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error: String| FromSqlError::Other(error.into()))
    }
}

/// An expense report sent by an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    /// The id given by the store when the attachment was uploaded.
    pub id: BillId,
    /// The email of the employee that sent the bill.
    pub email: String,
    /// One of [BILL_TYPES].
    pub bill_type: String,
    /// A short description of the expense.
    pub name: String,
    /// The date of the expense as "YYYY-MM-DD".
    pub date: String,
    /// The amount including VAT, in euros.
    pub amount: Option<f64>,
    /// The VAT amount, in euros.
    pub vat: Option<f64>,
    /// The VAT percentage.
    pub pct: Option<u32>,
    /// Free text for the reviewer.
    pub commentary: String,
    /// Where the bill is in its review.
    pub status: BillStatus,
    /// Where the attachment can be downloaded from.
    pub file_url: Option<String>,
    /// The name of the attachment as uploaded.
    pub file_name: Option<String>,
}

/// A bill ready to be displayed: the date is in its short French form and
/// the status is replaced by its label.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayBill {
    /// A copy of the stored bill with only `date` changed.
    pub bill: Bill,
    /// The label of the bill's status.
    pub status: &'static str,
}

/// A file sent to the store to start a new bill.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// The email of the employee uploading the file.
    pub email: String,
    /// The name of the file on the employee's computer.
    pub file_name: String,
    /// The MIME type sent by the browser.
    pub content_type: String,
    /// The file contents.
    pub data: Vec<u8>,
}

/// What the store returns once it holds an attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// Where the attachment can be downloaded from.
    pub file_url: String,
    /// The id of the new bill.
    pub key: BillId,
}
