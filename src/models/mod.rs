use bytes::Bytes;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use validator::Validate;

/// Lifecycle state of a bill. Only the backend moves a bill out of `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    #[default]
    Pending,
    Accepted,
    Refused,
}

/// An expense bill as exchanged with the Billed API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub expense_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// ISO 8601 date (`YYYY-MM-DD`). Kept as text: stored bills may carry dates
    /// that no longer parse and must still be listed.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: i64,
    #[serde(default, deserialize_with = "deserialize_vat")]
    pub vat: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pct: u32,
    #[serde(default)]
    pub commentary: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BillStatus,
}

// A draft opened by a receipt upload whose save never went through comes back
// with its form fields null.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// The API sends VAT either as a string or as a bare number.
fn deserialize_vat<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Vat {
        Text(String),
        Number(i64),
        Missing(()),
    }

    Ok(match Vat::deserialize(deserializer)? {
        Vat::Text(s) => s,
        Vat::Number(n) => n.to_string(),
        Vat::Missing(()) => String::new(),
    })
}

/// VAT percentage applied when the form leaves it empty.
pub const DEFAULT_VAT_PCT: u32 = 20;

/// Values entered in the "new bill" form.
#[derive(Debug, Clone, Validate)]
pub struct BillFields {
    #[validate(length(min = 1, message = "Expense type is required"))]
    pub expense_type: String,
    pub name: String,
    pub date: NaiveDate,
    #[validate(range(min = 0, message = "Amount cannot be negative"))]
    pub amount: i64,
    pub vat: String,
    #[validate(range(max = 100, message = "VAT percentage must be between 0 and 100"))]
    pub pct: Option<u32>,
    pub commentary: Option<String>,
}

impl BillFields {
    /// Builds the record to persist for `email`, with the receipt if one was uploaded.
    pub fn into_bill(self, email: &str, receipt: Option<(StoredFile, String)>) -> Bill {
        let (file_url, file_name) = match receipt {
            Some((stored, file_name)) => (Some(stored.file_url), Some(file_name)),
            None => (None, None),
        };

        Bill {
            id: None,
            email: email.to_string(),
            expense_type: self.expense_type,
            name: self.name,
            date: self.date.format("%Y-%m-%d").to_string(),
            amount: self.amount,
            vat: self.vat,
            pct: self.pct.unwrap_or(DEFAULT_VAT_PCT),
            commentary: self.commentary.filter(|c| !c.is_empty()),
            file_url,
            file_name,
            status: BillStatus::Pending,
        }
    }
}

/// A file picked by the user, not yet checked.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(
        file_name: impl Into<String>,
        content_type: Option<&str>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.map(str::to_string),
            data: data.into(),
        }
    }

    /// Reads a file from disk, keeping only its last path component as the name.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self {
            file_name,
            content_type: None,
            data: data.into(),
        })
    }

    pub fn extension(&self) -> Option<String> {
        Path::new(&self.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
    }
}

/// A file that passed [`crate::utils::validation::validate_file`].
///
/// There is no public constructor, so holding one proves the check ran.
#[derive(Debug, Clone)]
pub struct AcceptedFile {
    file: UploadedFile,
    content_type: mime::Mime,
}

impl AcceptedFile {
    pub(crate) fn new(file: UploadedFile, content_type: mime::Mime) -> Self {
        Self { file, content_type }
    }

    pub fn file_name(&self) -> &str {
        &self.file.file_name
    }

    pub fn content_type(&self) -> &mime::Mime {
        &self.content_type
    }

    pub fn data(&self) -> &Bytes {
        &self.file.data
    }

    pub fn into_inner(self) -> UploadedFile {
        self.file
    }
}

/// Result of a receipt upload: where it lives and the key of the bill draft it opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredFile {
    pub file_url: String,
    pub key: String,
}

/// The connected employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub email: String,
}

impl UserContext {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Views the presentation layer can be asked to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Bills,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Bills => "#employee/bills",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> BillFields {
        BillFields {
            expense_type: "Transports".to_string(),
            name: "TGV".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 8, 24).unwrap(),
            amount: 120,
            vat: "20".to_string(),
            pct: None,
            commentary: Some(String::new()),
        }
    }

    #[test]
    fn test_into_bill_defaults() {
        let bill = fields().into_bill("employee@test.tld", None);
        assert_eq!(bill.date, "2023-08-24");
        assert_eq!(bill.pct, DEFAULT_VAT_PCT);
        assert_eq!(bill.status, BillStatus::Pending);
        assert_eq!(bill.commentary, None);
        assert!(bill.file_url.is_none());
        assert!(bill.file_name.is_none());
    }

    #[test]
    fn test_fields_validation() {
        assert!(fields().validate().is_ok());

        let mut empty_type = fields();
        empty_type.expense_type.clear();
        assert!(empty_type.validate().is_err());

        let mut negative = fields();
        negative.amount = -1;
        assert!(negative.validate().is_err());

        let mut pct = fields();
        pct.pct = Some(101);
        assert!(pct.validate().is_err());
    }

    #[test]
    fn test_bill_json_shape() {
        let bill = fields().into_bill("employee@test.tld", None);
        let json = serde_json::to_value(&bill).unwrap();
        assert_eq!(json["type"], "Transports");
        assert_eq!(json["status"], "pending");
        assert!(json.get("fileUrl").is_some());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_bill_accepts_numeric_vat() {
        let json = r#"{
            "id": "47qAXb6fIm2zOKkLzMro",
            "email": "a@a",
            "type": "Hôtel et logement",
            "name": "encore",
            "date": "2004-04-04",
            "amount": 400,
            "vat": 80,
            "pct": 20,
            "commentary": "séminaire billed",
            "fileUrl": "https://example.test/preview-facture-free-201801-pdf-1.jpg",
            "fileName": "preview-facture-free-201801-pdf-1.jpg",
            "status": "accepted"
        }"#;
        let bill: Bill = serde_json::from_str(json).unwrap();
        assert_eq!(bill.vat, "80");
        assert_eq!(bill.status, BillStatus::Accepted);
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Bills.path(), "#employee/bills");
    }

    #[test]
    fn test_draft_with_null_fields_still_decodes() {
        let json = r#"[
            {"id": "a", "email": "a@a", "type": "Transports", "name": "TGV",
             "date": "2004-04-04", "amount": 120, "vat": "20", "pct": 20,
             "commentary": null, "fileUrl": "u1", "fileName": "f.jpg", "status": "refused"},
            {"id": "b", "email": "a@a", "type": null, "name": null, "date": null,
             "amount": null, "vat": null, "pct": null, "commentary": null,
             "fileUrl": "u2", "fileName": "g.png", "status": null}
        ]"#;
        let bills: Vec<Bill> = serde_json::from_str(json).unwrap();
        assert_eq!(bills.len(), 2);
        assert_eq!(bills[0].status, BillStatus::Refused);

        let draft = &bills[1];
        assert_eq!(draft.expense_type, "");
        assert_eq!(draft.date, "");
        assert_eq!(draft.amount, 0);
        assert_eq!(draft.vat, "");
        assert_eq!(draft.status, BillStatus::Pending);
        assert_eq!(draft.file_name.as_deref(), Some("g.png"));
    }

    #[test]
    fn test_draft_with_missing_fields_still_decodes() {
        let bill: Bill = serde_json::from_str(r#"{"id": "c", "fileUrl": "u3"}"#).unwrap();
        assert_eq!(bill.pct, 0);
        assert_eq!(bill.status, BillStatus::Pending);
    }
}
