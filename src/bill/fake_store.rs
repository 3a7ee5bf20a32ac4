use std::{
    sync::{Mutex, mpsc::Sender},
    thread::{self, ThreadId},
};

use crate::{
    Error,
    bill::{
        core::{Attachment, Bill, BillId, BillStatus, UploadedFile},
        store::BillStore,
    },
};

/// An in-memory [BillStore] that can be told to fail and reports updates on a channel.
#[derive(Debug, Default)]
pub struct FakeBillStore {
    bills: Mutex<Vec<Bill>>,
    created: Mutex<Vec<Attachment>>,
    fetch_error: Option<String>,
    update_sender: Mutex<Option<Sender<Bill>>>,
    list_thread: Mutex<Option<ThreadId>>,
}

impl FakeBillStore {
    pub fn with_bills(bills: Vec<Bill>) -> Self {
        Self {
            bills: Mutex::new(bills),
            ..Default::default()
        }
    }

    /// Every call fails with [Error::Fetch] carrying `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            fetch_error: Some(message.to_owned()),
            ..Default::default()
        }
    }

    pub fn with_update_sender(self, sender: Sender<Bill>) -> Self {
        Self {
            update_sender: Mutex::new(Some(sender)),
            ..self
        }
    }

    pub fn created(&self) -> Vec<Attachment> {
        self.created.lock().unwrap().clone()
    }

    /// The thread the last call to [BillStore::list] ran on.
    pub fn list_thread(&self) -> Option<ThreadId> {
        *self.list_thread.lock().unwrap()
    }

    fn check_fetch_error(&self) -> Result<(), Error> {
        match &self.fetch_error {
            Some(message) => Err(Error::Fetch(message.clone())),
            None => Ok(()),
        }
    }
}

impl BillStore for FakeBillStore {
    fn list(&self) -> Result<Vec<Bill>, Error> {
        *self.list_thread.lock().unwrap() = Some(thread::current().id());
        self.check_fetch_error()?;
        Ok(self.bills.lock().unwrap().clone())
    }

    fn create(&self, attachment: Attachment) -> Result<UploadedFile, Error> {
        self.check_fetch_error()?;
        let mut created = self.created.lock().unwrap();
        let file_url = format!("https://localhost:3456/images/{}", attachment.file_name);
        created.push(attachment);

        Ok(UploadedFile {
            file_url,
            key: created.len() as BillId,
        })
    }

    fn update(&self, bill: &Bill) -> Result<Bill, Error> {
        if let Some(sender) = self.update_sender.lock().unwrap().as_ref() {
            sender.send(bill.clone()).unwrap();
        }
        self.check_fetch_error()?;
        self.bills.lock().unwrap().push(bill.clone());

        Ok(bill.clone())
    }

    fn attachment(&self, id: BillId) -> Result<Attachment, Error> {
        self.check_fetch_error()?;
        let index = usize::try_from(id - 1).map_err(|_| Error::NotFound)?;

        self.created
            .lock()
            .unwrap()
            .get(index)
            .cloned()
            .ok_or(Error::NotFound)
    }
}

pub fn test_bill(id: BillId, email: &str, date: &str) -> Bill {
    Bill {
        id,
        email: email.to_owned(),
        bill_type: "Hôtel et logement".to_owned(),
        name: format!("bill {id}"),
        date: date.to_owned(),
        amount: Some(400.0),
        vat: Some(80.0),
        pct: Some(20),
        commentary: "séminaire billed".to_owned(),
        status: BillStatus::Pending,
        file_url: Some(format!("https://test.storage.tld/{id}.jpg")),
        file_name: Some(format!("{id}.jpg")),
    }
}

/// Four bills from the same employee, out of date order.
pub fn test_bills() -> Vec<Bill> {
    vec![
        test_bill(1, "a@a", "2004-04-04"),
        test_bill(2, "a@a", "2001-01-01"),
        test_bill(3, "a@a", "2003-03-03"),
        test_bill(4, "a@a", "2002-02-02"),
    ]
}
