//! Key-unique record store implementing the two-pass toggle protocol
//!
//! A key present in the set means "currently flagged as differing". The
//! baseline pass [`add`](ToggleSet::add)s every throwing member; the target
//! pass [`toggle`](ToggleSet::toggle)s every throwing member, clearing those
//! already flagged by the baseline and recording the rest. What remains is the
//! symmetric difference of the two passes' throwing sets, with one documented
//! asymmetry: a member that throws in the baseline and is observed in the
//! target as non-throwing is never revisited, so it stays flagged exactly
//! like a member removed from the target.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::errors::{ExScanError, Result};
use crate::model::{DocId, MemberRecord};

/// Outcome of a target-pass toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Toggled {
    /// Not flagged before: recorded as new in this pass
    Recorded,
    /// Flagged by the earlier pass: cleared, carrying the removed record
    Cleared(MemberRecord),
}

/// DocId-keyed store of members currently flagged as differing
///
/// Created empty per run, mutated only through [`add`](Self::add),
/// [`remove`](Self::remove) and [`toggle`](Self::toggle), and iterated
/// read-only for export. Never overwrites: adding a DocId that is already
/// present is an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToggleSet {
    entries: HashMap<DocId, MemberRecord>,
}

impl ToggleSet {
    /// Create a new empty ToggleSet
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn contains(&self, doc_id: &DocId) -> bool {
        self.entries.contains_key(doc_id)
    }

    pub fn get(&self, doc_id: &DocId) -> Option<&MemberRecord> {
        self.entries.get(doc_id)
    }

    /// Insert a record under its DocId
    ///
    /// # Errors
    ///
    /// Returns `DuplicateKey` if the DocId is already present. The set is left
    /// unchanged.
    pub fn add(&mut self, record: MemberRecord) -> Result<()> {
        match self.entries.entry(record.doc_id.clone()) {
            Entry::Occupied(existing) => Err(ExScanError::DuplicateKey {
                doc_id: existing.key().to_string(),
            }
            .into()),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    /// Remove a DocId, returning its record
    ///
    /// Absent keys are a silent no-op (`None`).
    pub fn remove(&mut self, doc_id: &DocId) -> Option<MemberRecord> {
        self.entries.remove(doc_id)
    }

    /// Target-pass step: clear the DocId if flagged, otherwise record it
    pub fn toggle(&mut self, record: MemberRecord) -> Toggled {
        match self.entries.entry(record.doc_id.clone()) {
            Entry::Occupied(existing) => Toggled::Cleared(existing.remove()),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Toggled::Recorded
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current records in unspecified order
    pub fn entries(&self) -> impl Iterator<Item = &MemberRecord> {
        self.entries.values()
    }

    /// Current records in report order (see [`MemberRecord::report_cmp`])
    pub fn sorted(&self) -> Vec<&MemberRecord> {
        let mut records: Vec<&MemberRecord> = self.entries.values().collect();
        records.sort_by(|a, b| a.report_cmp(b));
        records
    }

    /// Consume the set, yielding records in report order
    pub fn into_sorted(self) -> Vec<MemberRecord> {
        let mut records: Vec<MemberRecord> = self.entries.into_values().collect();
        records.sort_by(|a, b| a.report_cmp(b));
        records
    }
}
