//! Implements the `DocumentStore` trait against the Firestore REST API.
//!
//! Documents live at `users/{uid}/transactions/{id}` and carry the same wire
//! fields the web client wrote: `type`, `amount`, `category`, `note`, `date`
//! and the server-stamped `createdAt`. Mutations go through `:commit` writes so
//! a single round trip can carry the field mask, the existence precondition and
//! the `REQUEST_TIME` transform for the timestamp.

use crate::config::Session;
use crate::model::{Amount, NewTransaction, Transaction, TransactionKind, TransactionUpdate};
use crate::store::{DocumentStore, UserScope, TRANSACTIONS};
use crate::{Config, Result};
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::str::FromStr;
use tracing::trace;
use uuid::Uuid;

/// Implements the `DocumentStore` trait using the Firestore REST API. Requests
/// are authenticated with the bearer token from the stored session.
pub(super) struct FirestoreStore {
    http: reqwest::Client,
    /// `projects/{project}/databases/(default)` as a resource name.
    database: String,
    /// Base URL for the v1 API, e.g. `https://firestore.googleapis.com/v1`.
    api_base: String,
    token: Option<String>,
}

impl FirestoreStore {
    pub(super) fn new(config: &Config, session: Option<&Session>) -> Result<Self> {
        let endpoint = config.endpoint().as_str().trim_end_matches('/').to_string();
        Ok(Self {
            http: reqwest::Client::new(),
            database: format!("projects/{}/databases/(default)", config.project_id()),
            api_base: format!("{endpoint}/v1"),
            token: session.map(|s| s.token().to_string()),
        })
    }

    /// The full resource name of one transaction document.
    fn doc_name(&self, scope: &UserScope, id: &str) -> String {
        format!(
            "{}/documents/users/{}/{}/{}",
            self.database,
            scope.uid(),
            TRANSACTIONS,
            id
        )
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .context("No authenticated session; cannot reach the remote store")
    }

    /// Sends a commit containing a single write and returns the commit time,
    /// or `None` when the existence precondition failed (document missing).
    async fn commit_one(&self, write: Value) -> Result<Option<DateTime<Utc>>> {
        let url = format!("{}/{}/documents:commit", self.api_base, self.database);
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token()?)
            .json(&json!({ "writes": [write] }))
            .send()
            .await
            .context("Failed to send commit request to the document store")?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("Failed to parse commit response")?;
        if is_missing_document(status, &body) {
            return Ok(None);
        }
        if !status.is_success() {
            anyhow::bail!("Commit failed with status {status}: {body}");
        }

        let commit_time = body
            .get("commitTime")
            .and_then(Value::as_str)
            .map(parse_timestamp)
            .transpose()?;
        Ok(commit_time.or(Some(Utc::now())))
    }
}

#[async_trait::async_trait]
impl DocumentStore for FirestoreStore {
    async fn list(&mut self, scope: &UserScope) -> Result<Vec<Transaction>> {
        trace!("list for uid {}", scope.uid());
        let url = format!(
            "{}/{}/documents/users/{}:runQuery",
            self.api_base,
            self.database,
            scope.uid()
        );
        let query = json!({
            "structuredQuery": {
                "from": [{ "collectionId": TRANSACTIONS }],
                "orderBy": [{
                    "field": { "fieldPath": "createdAt" },
                    "direction": "DESCENDING",
                }],
            }
        });
        let response = self
            .http
            .post(&url)
            .bearer_auth(self.token()?)
            .json(&query)
            .send()
            .await
            .context("Failed to query the transaction collection")?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("Failed to parse query response")?;
        if !status.is_success() {
            anyhow::bail!("Transaction query failed with status {status}: {body}");
        }

        // runQuery returns a stream of result objects; only some carry a document.
        let results = body.as_array().cloned().unwrap_or_default();
        results
            .iter()
            .filter_map(|r| r.get("document"))
            .map(decode_document)
            .collect()
    }

    async fn find_by_id(&mut self, scope: &UserScope, id: &str) -> Result<Option<Transaction>> {
        trace!("find_by_id {id}");
        let url = format!("{}/{}", self.api_base, self.doc_name(scope, id));
        let response = self
            .http
            .get(&url)
            .bearer_auth(self.token()?)
            .send()
            .await
            .with_context(|| format!("Failed to fetch transaction '{id}'"))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .context("Failed to parse document response")?;
        if !status.is_success() {
            anyhow::bail!("Fetching transaction '{id}' failed with status {status}: {body}");
        }
        decode_document(&body).map(Some)
    }

    async fn insert(&mut self, scope: &UserScope, new: &NewTransaction) -> Result<Transaction> {
        let id = Uuid::new_v4().to_string();
        trace!("insert {id}");
        let write = json!({
            "update": {
                "name": self.doc_name(scope, &id),
                "fields": encode_fields(new.kind, new.amount, &new.category, new.note.as_deref(), Some(new.date))?,
            },
            "currentDocument": { "exists": false },
            "updateTransforms": [server_timestamp_transform()],
        });
        let created_at = self
            .commit_one(write)
            .await
            .with_context(|| format!("Failed to create transaction '{id}'"))?
            .context("Document id collision on insert")?;
        Ok(Transaction {
            id,
            kind: new.kind,
            amount: new.amount,
            category: new.category.clone(),
            note: new.note.clone(),
            date: new.date,
            created_at: Some(created_at),
        })
    }

    async fn update(
        &mut self,
        scope: &UserScope,
        id: &str,
        fields: &TransactionUpdate,
    ) -> Result<Option<DateTime<Utc>>> {
        trace!("update {id}");
        let write = json!({
            "update": {
                "name": self.doc_name(scope, id),
                "fields": encode_fields(fields.kind, fields.amount, &fields.category, fields.note.as_deref(), None)?,
            },
            "updateMask": { "fieldPaths": ["type", "amount", "category", "note"] },
            "currentDocument": { "exists": true },
            "updateTransforms": [server_timestamp_transform()],
        });
        self.commit_one(write)
            .await
            .with_context(|| format!("Failed to update transaction '{id}'"))
    }

    async fn delete(&mut self, scope: &UserScope, id: &str) -> Result<bool> {
        trace!("delete {id}");
        let write = json!({
            "delete": self.doc_name(scope, id),
            "currentDocument": { "exists": true },
        });
        let committed = self
            .commit_one(write)
            .await
            .with_context(|| format!("Failed to delete transaction '{id}'"))?;
        Ok(committed.is_some())
    }
}

/// True when a commit or fetch failed only because the target document does not
/// exist (precondition failure or plain not-found).
fn is_missing_document(status: StatusCode, body: &Value) -> bool {
    if status == StatusCode::NOT_FOUND {
        return true;
    }
    let code = body
        .get("error")
        .and_then(|e| e.get("status"))
        .and_then(Value::as_str);
    matches!(code, Some("NOT_FOUND") | Some("FAILED_PRECONDITION"))
}

/// The `REQUEST_TIME` transform that refreshes `createdAt` on every write.
fn server_timestamp_transform() -> Value {
    json!({ "fieldPath": "createdAt", "setToServerValue": "REQUEST_TIME" })
}

/// Encodes the writable fields into Firestore's typed value map. `date` is only
/// present on creation; edits never change it.
fn encode_fields(
    kind: TransactionKind,
    amount: Amount,
    category: &str,
    note: Option<&str>,
    date: Option<NaiveDate>,
) -> Result<Value> {
    let double = amount
        .to_f64()
        .with_context(|| format!("Amount '{amount}' cannot be encoded as a double"))?;
    let mut fields = json!({
        "type": { "stringValue": kind.to_string() },
        "amount": { "doubleValue": double },
        "category": { "stringValue": category },
    });
    if let Some(note) = note {
        fields["note"] = json!({ "stringValue": note });
    }
    if let Some(date) = date {
        fields["date"] = json!({ "stringValue": date.to_string() });
    }
    Ok(fields)
}

/// Decodes a Firestore document into a `Transaction`.
fn decode_document(doc: &Value) -> Result<Transaction> {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .context("Document has no resource name")?;
    let id = name
        .rsplit('/')
        .next()
        .context("Document resource name is empty")?
        .to_string();
    let fields = doc
        .get("fields")
        .context("Document has no fields")?;

    let kind = TransactionKind::from_str(string_field(fields, "type").unwrap_or_default())
        .with_context(|| format!("Transaction '{id}' has an invalid type"))?;
    let amount = decode_amount(fields)
        .with_context(|| format!("Transaction '{id}' has an invalid amount"))?;
    let category = string_field(fields, "category").unwrap_or_default().to_string();
    let note = string_field(fields, "note")
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let date = string_field(fields, "date")
        .map(NaiveDate::from_str)
        .transpose()
        .with_context(|| format!("Transaction '{id}' has an invalid date"))?
        .unwrap_or_default();
    let created_at = fields
        .get("createdAt")
        .and_then(|v| v.get("timestampValue"))
        .and_then(Value::as_str)
        .map(parse_timestamp)
        .transpose()?;

    Ok(Transaction {
        id,
        kind,
        amount,
        category,
        note,
        date,
        created_at,
    })
}

fn string_field<'a>(fields: &'a Value, key: &str) -> Option<&'a str> {
    fields.get(key)?.get("stringValue")?.as_str()
}

/// Amounts written by the web client are doubles; integer-valued documents come
/// back as `integerValue` strings, so accept both.
fn decode_amount(fields: &Value) -> Result<Amount> {
    let value = fields.get("amount").context("Missing amount field")?;
    if let Some(double) = value.get("doubleValue").and_then(Value::as_f64) {
        return Amount::try_from(double);
    }
    if let Some(integer) = value.get("integerValue").and_then(Value::as_str) {
        return Amount::from_str(integer);
    }
    anyhow::bail!("Amount field has no numeric value")
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(s)
        .with_context(|| format!("Invalid timestamp '{s}'"))?
        .with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_full_document() {
        let doc = json!({
            "name": "projects/p/databases/(default)/documents/users/u1/transactions/txn-42",
            "fields": {
                "type": { "stringValue": "income" },
                "amount": { "doubleValue": 1000.0 },
                "category": { "stringValue": "Salary" },
                "note": { "stringValue": "march" },
                "date": { "stringValue": "2025-03-01" },
                "createdAt": { "timestampValue": "2025-03-01T08:30:00Z" },
            }
        });
        let t = decode_document(&doc).unwrap();
        assert_eq!(t.id, "txn-42");
        assert_eq!(t.kind, TransactionKind::Income);
        assert_eq!(t.amount, Amount::from_str("1000").unwrap());
        assert_eq!(t.category, "Salary");
        assert_eq!(t.note.as_deref(), Some("march"));
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
        assert!(t.created_at.is_some());
    }

    #[test]
    fn decode_integer_amount_and_missing_note() {
        let doc = json!({
            "name": "x/transactions/txn-7",
            "fields": {
                "type": { "stringValue": "expense" },
                "amount": { "integerValue": "300" },
                "category": { "stringValue": "Groceries" },
                "date": { "stringValue": "2025-03-02" },
            }
        });
        let t = decode_document(&doc).unwrap();
        assert_eq!(t.amount, Amount::from_str("300").unwrap());
        assert_eq!(t.note, None);
        assert_eq!(t.created_at, None);
    }

    #[test]
    fn decode_rejects_invalid_type() {
        let doc = json!({
            "name": "x/transactions/txn-8",
            "fields": {
                "type": { "stringValue": "transfer" },
                "amount": { "doubleValue": 1.0 },
                "category": { "stringValue": "" },
            }
        });
        assert!(decode_document(&doc).is_err());
    }

    #[test]
    fn encode_skips_absent_note_and_date() {
        let fields = encode_fields(
            TransactionKind::Expense,
            Amount::from_str("12.5").unwrap(),
            "Coffee",
            None,
            None,
        )
        .unwrap();
        assert!(fields.get("note").is_none());
        assert!(fields.get("date").is_none());
        assert_eq!(fields["type"]["stringValue"], "expense");
        assert_eq!(fields["amount"]["doubleValue"], 12.5);
    }

    #[test]
    fn missing_document_detection() {
        assert!(is_missing_document(StatusCode::NOT_FOUND, &json!({})));
        let precondition = json!({ "error": { "status": "FAILED_PRECONDITION" } });
        assert!(is_missing_document(StatusCode::BAD_REQUEST, &precondition));
        assert!(!is_missing_document(StatusCode::OK, &json!({})));
    }
}
