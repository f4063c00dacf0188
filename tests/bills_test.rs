use async_trait::async_trait;
use billed::infrastructure::memory_store::InMemoryBillStore;
use billed::models::{AcceptedFile, Bill, BillStatus, StoredFile};
use billed::services::bill_store::{BillStore, StoreError};
use billed::services::bills::BillsService;
use billed::ListError;
use std::sync::Arc;

fn fixture(id: &str, name: &str, date: &str, status: BillStatus) -> Bill {
    Bill {
        id: Some(id.to_string()),
        email: "a@a".to_string(),
        expense_type: "Hôtel et logement".to_string(),
        name: name.to_string(),
        date: date.to_string(),
        amount: 400,
        vat: "80".to_string(),
        pct: 20,
        commentary: Some("séminaire billed".to_string()),
        file_url: Some(format!("https://test.storage.tld/{}.jpg", id)),
        file_name: Some(format!("{}.jpg", id)),
        status,
    }
}

fn fixtures() -> Vec<Bill> {
    vec![
        fixture("47qAXb6fIm2zOKkLzMro", "encore", "2004-04-04", BillStatus::Pending),
        fixture("BeKy5Mo4jkmdfPGYpTxZ", "test1", "2001-01-01", BillStatus::Refused),
        fixture("UIUZtnPQvnbFnB0ozvJh", "test3", "2003-03-03", BillStatus::Accepted),
        fixture("qcCK3SzECmaZAGRrHjaC", "test2", "2002-02-02", BillStatus::Refused),
    ]
}

struct FailingStore(u16);

#[async_trait]
impl BillStore for FailingStore {
    async fn create(&self, _file: &AcceptedFile, _email: &str) -> Result<StoredFile, StoreError> {
        Err(StoreError::Status { code: self.0 })
    }

    async fn update(&self, _key: Option<&str>, _bill: &Bill) -> Result<Bill, StoreError> {
        Err(StoreError::Status { code: self.0 })
    }

    async fn list(&self) -> Result<Vec<Bill>, StoreError> {
        Err(StoreError::Status { code: self.0 })
    }
}

#[tokio::test]
async fn test_bills_are_ordered_most_recent_first() {
    let service = BillsService::new(Arc::new(InMemoryBillStore::with_bills(fixtures())));

    let bills = service.get_bills().await.unwrap();
    let dates: Vec<&str> = bills.iter().map(|b| b.bill.date.as_str()).collect();

    assert_eq!(dates, vec!["2004-04-04", "2003-03-03", "2002-02-02", "2001-01-01"]);
}

#[tokio::test]
async fn test_bills_are_formatted_for_display() {
    let service = BillsService::new(Arc::new(InMemoryBillStore::with_bills(fixtures())));

    let bills = service.get_bills().await.unwrap();

    assert_eq!(bills[0].display_date, "4 Avr. 04");
    assert_eq!(bills[0].display_status, "En attente");
    assert_eq!(bills[1].display_status, "Accepté");
    assert_eq!(bills[3].display_date, "1 Jan. 01");
    assert_eq!(bills[3].display_status, "Refused");
    assert_eq!(
        bills[0].bill.file_url.as_deref(),
        Some("https://test.storage.tld/47qAXb6fIm2zOKkLzMro.jpg")
    );
}

#[tokio::test]
async fn test_unreadable_date_is_shown_raw() {
    let mut bills = fixtures();
    bills[0].date = "2004-13-45".to_string();
    let service = BillsService::new(Arc::new(InMemoryBillStore::with_bills(bills)));

    let listed = service.get_bills().await.unwrap();
    let broken = listed
        .iter()
        .find(|b| b.bill.name == "encore")
        .unwrap();

    assert_eq!(broken.display_date, "2004-13-45");
}

#[tokio::test]
async fn test_fetch_errors_are_surfaced_verbatim() {
    for (code, message) in [(404, "Erreur 404"), (500, "Erreur 500")] {
        let service = BillsService::new(Arc::new(FailingStore(code)));

        let err = service.get_bills().await.unwrap_err();

        assert_eq!(err.to_string(), message);
        let ListError::FetchFailed(cause) = err;
        assert_eq!(cause.status_code(), Some(code));
    }
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let service = BillsService::new(Arc::new(InMemoryBillStore::new()));
    assert!(service.get_bills().await.unwrap().is_empty());
}
