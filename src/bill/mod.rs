//! Bills: the expense reports employees send, their attachments and the pages to manage them.

mod bills_page;
mod core;
mod file_endpoint;
mod format;
mod new_bill_page;
mod store;
mod submit_endpoint;
mod upload_endpoint;

#[cfg(test)]
mod fake_store;

pub use bills_page::{get_bills, get_bills_page};
pub use core::{Attachment, Bill, BillId, BillStatus, DisplayBill, UploadedFile};
pub use file_endpoint::get_bill_file;
pub use new_bill_page::get_new_bill_page;
pub use store::{BillStore, SQLiteBillStore, create_bill_table};
pub use submit_endpoint::submit_bill;
pub use upload_endpoint::upload_bill_file;

/// Shown when an attachment is not a JPG or PNG image.
pub const INVALID_FILE_TYPE_MESSAGE: &str = "Format de fichier non valide";
