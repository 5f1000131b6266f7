//! Confirmed deletion.
//!
//! A delete is staged as a pending request and only carried out once the
//! user affirms it. Entities that are already completed or past due may skip
//! the prompt; for anything else a skip request is downgraded to a staged one.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::Store;
use crate::calendar::parse_item_date;
use crate::entities::{EntityId, EntityKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteRequest {
    pub kind: EntityKind,
    pub id: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Removed this many entities (more than one on an id collision).
    Deleted(usize),
    /// Staged; waiting for [`Store::confirm_delete`].
    AwaitingConfirmation(DeleteRequest),
}

impl Store {
    /// Completed, or dated before today. Only those may skip confirmation.
    pub fn may_skip_confirmation(&self, kind: EntityKind, id: EntityId) -> bool {
        if self.data.completed(kind, id) == Some(true) {
            return true;
        }
        let today = self.clock.today();
        self.data
            .item_date(kind, id)
            .and_then(parse_item_date)
            .is_some_and(|date| date < today)
    }

    /// Deletes right away when `skip_confirm` is allowed for the target,
    /// otherwise stages the request (replacing any earlier pending one).
    pub fn request_delete(
        &mut self,
        kind: EntityKind,
        id: EntityId,
        skip_confirm: bool,
    ) -> DeleteOutcome {
        if skip_confirm && self.may_skip_confirmation(kind, id) {
            return DeleteOutcome::Deleted(self.delete_now(kind, id));
        }
        if skip_confirm {
            debug!(kind = %kind, id, "skip refused for unfinished entity, asking instead");
        }
        let request = DeleteRequest { kind, id };
        self.pending_delete = Some(request);
        DeleteOutcome::AwaitingConfirmation(request)
    }

    pub fn pending_delete(&self) -> Option<DeleteRequest> {
        self.pending_delete
    }

    /// Answers the pending prompt. On affirmation the staged entity is
    /// deleted and the number removed returned; either way the prompt is
    /// cleared.
    pub fn confirm_delete(&mut self, affirmed: bool) -> Option<usize> {
        let request = self.pending_delete.take()?;
        if !affirmed {
            debug!(kind = %request.kind, id = request.id, "delete cancelled");
            return None;
        }
        Some(self.delete_now(request.kind, request.id))
    }

    /// Unconditional removal by id, then persist.
    pub fn delete_now(&mut self, kind: EntityKind, id: EntityId) -> usize {
        let removed = self.data.remove(kind, id);
        info!(kind = %kind, id, removed, "deleted entity");
        self.save();
        removed
    }
}
