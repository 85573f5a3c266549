//! Glue for the transaction list surface: the display ordering and the single
//! inline edit draft.
//!
//! Rendering itself (rows, charts, styling) is a presentational collaborator;
//! this module only produces the data the surface consumes and models the
//! "one editor at a time" invariant explicitly.

use crate::model::{Amount, Transaction, TransactionUpdate};
use crate::Result;
use std::str::FromStr;

/// The records in display order: calendar date descending, ties keeping their
/// insertion order (stable sort).
pub fn display_order(records: &[Transaction]) -> Vec<&Transaction> {
    let mut ordered: Vec<&Transaction> = records.iter().collect();
    ordered.sort_by(|a, b| b.date.cmp(&a.date));
    ordered
}

/// The pending field values of the one record currently in edit mode. Values
/// are raw text as entered; nothing is validated until `save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    id: String,
    pub kind: crate::model::TransactionKind,
    pub amount: String,
    pub category: String,
    pub note: String,
}

impl EditDraft {
    /// The identifier of the record being edited. Fixed for the draft's life.
    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Holds the single shared draft slot: either no record is in edit mode, or
/// exactly one is.
#[derive(Debug, Default)]
pub struct ListView {
    draft: Option<EditDraft>,
}

impl ListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Puts `record` into edit mode, pre-populating the draft from its current
    /// field values. Any draft for another record is discarded.
    pub fn begin_edit(&mut self, record: &Transaction) {
        self.draft = Some(EditDraft {
            id: record.id.clone(),
            kind: record.kind,
            amount: record.amount.to_string(),
            category: record.category.clone(),
            note: record.note.clone().unwrap_or_default(),
        });
    }

    /// Discards the draft without mutation.
    pub fn cancel(&mut self) {
        self.draft = None;
    }

    /// The active draft, if any. Mutable so the surface can bind form inputs.
    pub fn draft_mut(&mut self) -> Option<&mut EditDraft> {
        self.draft.as_mut()
    }

    pub fn draft(&self) -> Option<&EditDraft> {
        self.draft.as_ref()
    }

    /// Parses the draft into an edit intent, clearing the slot on success. An
    /// empty amount coerces to zero; category and note stay unconstrained free
    /// text, with an empty note meaning "no note". When the amount does not
    /// parse, the draft stays in place for correction.
    pub fn save(&mut self) -> Result<Option<(String, TransactionUpdate)>> {
        let Some(draft) = self.draft.take() else {
            return Ok(None);
        };
        let amount = match Amount::from_str(&draft.amount) {
            Ok(amount) => amount,
            Err(e) => {
                self.draft = Some(draft);
                return Err(e);
            }
        };
        let note = if draft.note.is_empty() {
            None
        } else {
            Some(draft.note)
        };
        Ok(Some((
            draft.id,
            TransactionUpdate {
                kind: draft.kind,
                amount,
                category: draft.category,
                note,
            },
        )))
    }
}
