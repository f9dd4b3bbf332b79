// Lock-in command
//
// Optimistic lock-in toggling as a command/undo pair: the flag flips in the
// local catalog right away, the PATCH follows, and a failed PATCH replays the
// inverse.

use crate::models::catalog::{BacklogCard, BacklogCardPatch};
use crate::services::api::{ApiError, TripApi};
use crate::services::catalog::EventCatalog;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockInCommand {
    pub card_id: i64,
    pub previous: bool,
    pub next: bool,
}

impl LockInCommand {
    /// Command that flips the current flag of `card_id`, if the card is known.
    pub fn toggle(catalog: &EventCatalog, card_id: i64) -> Option<Self> {
        let current = catalog.get(&card_id.to_string())?.locked_in;
        Some(Self {
            card_id,
            previous: current,
            next: !current,
        })
    }

    pub fn apply(&self, catalog: &mut EventCatalog) {
        catalog.set_locked_in(&self.card_id.to_string(), self.next);
    }

    pub fn undo(&self, catalog: &mut EventCatalog) {
        catalog.set_locked_in(&self.card_id.to_string(), self.previous);
    }

    pub fn patch(&self) -> BacklogCardPatch {
        BacklogCardPatch::locked_in(self.next)
    }

    /// Reconcile the server's answer with the optimistic local change.
    pub fn settle(
        &self,
        catalog: &mut EventCatalog,
        result: Result<BacklogCard, ApiError>,
    ) -> Result<(), ApiError> {
        match result {
            Ok(card) => {
                catalog.replace_card(card);
                Ok(())
            }
            Err(err) => {
                log::warn!(
                    "Failed to update lock-in for card {}, reverting: {}",
                    self.card_id,
                    err
                );
                self.undo(catalog);
                Err(err)
            }
        }
    }

    pub fn description(&self) -> String {
        if self.next {
            format!("Lock in card {}", self.card_id)
        } else {
            format!("Unlock card {}", self.card_id)
        }
    }
}

/// Toggle a card's lock-in flag against the collaborator, blocking.
///
/// Returns `Ok(None)` for unknown cards.
pub fn toggle_lock_in<A: TripApi + ?Sized>(
    api: &A,
    catalog: &mut EventCatalog,
    card_id: i64,
) -> Result<Option<LockInCommand>, ApiError> {
    let Some(command) = LockInCommand::toggle(catalog, card_id) else {
        return Ok(None);
    };
    command.apply(catalog);
    let result = api.update_backlog_card(card_id, &command.patch());
    command.settle(catalog, result)?;
    Ok(Some(command))
}
