//! Upload session tracking: last submitted file wins.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::models::bill::BillFields;
use crate::models::document::IdentityFields;
use crate::models::form::ContractForm;

/// Tracks which upload is current for one form.
///
/// A user can replace the selected file while recognition of the previous
/// one is still in flight. Each submission takes a ticket; when a result
/// arrives, it is merged only if its ticket is still the latest one, so a
/// stale result is discarded silently (last submitted wins, not first
/// completed).
#[derive(Debug, Default)]
pub struct UploadSession {
    current: AtomicU64,
}

/// Ticket identifying one submitted upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecognitionTicket(u64);

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new upload, invalidating every earlier ticket.
    pub fn begin(&self) -> RecognitionTicket {
        RecognitionTicket(self.current.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Whether this ticket is still the latest submission.
    pub fn is_current(&self, ticket: RecognitionTicket) -> bool {
        ticket.0 == self.current.load(Ordering::SeqCst)
    }

    /// Merge identity fields into the form if the ticket is current.
    /// Returns false when the result was stale and nothing was merged.
    pub fn apply_identity(
        &self,
        ticket: RecognitionTicket,
        form: &mut ContractForm,
        fields: &IdentityFields,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!("discarding stale identity result");
            return false;
        }
        form.merge_identity(fields);
        true
    }

    /// Merge bill fields into the form if the ticket is current.
    pub fn apply_bill(
        &self,
        ticket: RecognitionTicket,
        form: &mut ContractForm,
        fields: &BillFields,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!("discarding stale bill result");
            return false;
        }
        form.merge_bill(fields);
        true
    }
}
