use crate::error::ListError;
use crate::models::{Bill, BillStatus};
use crate::services::bill_store::BillStore;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::sync::Arc;

const MONTHS_FR: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

/// A bill ready to be shown in the employee's list.
#[derive(Debug, Clone, Serialize)]
pub struct BillSummary {
    #[serde(flatten)]
    pub bill: Bill,
    pub display_date: String,
    pub display_status: &'static str,
}

pub struct BillsService {
    store: Arc<dyn BillStore>,
}

impl BillsService {
    pub fn new(store: Arc<dyn BillStore>) -> Self {
        Self { store }
    }

    /// Fetches the bills, most recent first.
    pub async fn get_bills(&self) -> Result<Vec<BillSummary>, ListError> {
        let mut bills = self.store.list().await.map_err(|e| {
            tracing::error!("Failed to fetch bills: {}", e);
            ListError::FetchFailed(e)
        })?;

        // ISO dates order lexicographically.
        bills.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(bills
            .into_iter()
            .map(|bill| {
                let display_date = format_date(&bill.date).unwrap_or_else(|| {
                    tracing::warn!("Bill {:?} has an unreadable date: {}", bill.id, bill.date);
                    bill.date.clone()
                });
                BillSummary {
                    display_status: format_status(bill.status),
                    display_date,
                    bill,
                }
            })
            .collect())
    }
}

/// `2004-04-04` -> `4 Avr. 04`. `None` when the date does not parse.
pub fn format_date(date: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let month = MONTHS_FR[date.month0() as usize];
    Some(format!("{} {}. {:02}", date.day(), month, date.year() % 100))
}

pub fn format_status(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refused",
    }
}
