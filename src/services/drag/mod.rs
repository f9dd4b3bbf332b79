//! Drag-and-drop transfer protocol for the schedule board.
//!
//! A drag carries a tagged JSON payload through a [`TransferData`] store, the
//! way a browser carries it through its data-transfer object. Catalog cards
//! are copied onto the grid; placed cards are moved. Anything that does not
//! decode as a payload is ignored on drop.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::catalog::CatalogEvent;
use crate::models::schedule::SlotKey;
use crate::services::slot_grid::SlotGrid;

pub const MIME_JSON: &str = "application/json";
pub const MIME_TEXT: &str = "text/plain";

/// What is being dragged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DragPayload {
    /// A card from the catalog panel (copy semantics).
    Catalog { event: CatalogEvent },
    /// A card already on the grid (move semantics).
    #[serde(rename_all = "camelCase")]
    Placement {
        event: CatalogEvent,
        origin_day_index: u8,
        origin_hour: u8,
    },
}

impl DragPayload {
    pub fn catalog(event: CatalogEvent) -> Self {
        DragPayload::Catalog { event }
    }

    pub fn placement(event: CatalogEvent, origin: SlotKey) -> Self {
        DragPayload::Placement {
            event,
            origin_day_index: origin.day_index,
            origin_hour: origin.hour,
        }
    }

    pub fn event(&self) -> &CatalogEvent {
        match self {
            DragPayload::Catalog { event } | DragPayload::Placement { event, .. } => event,
        }
    }

    pub fn effect(&self) -> DropEffect {
        match self {
            DragPayload::Catalog { .. } => DropEffect::Copy,
            DragPayload::Placement { .. } => DropEffect::Move,
        }
    }

    fn origin(&self) -> Option<SlotKey> {
        match self {
            DragPayload::Catalog { .. } => None,
            DragPayload::Placement {
                origin_day_index,
                origin_hour,
                ..
            } => SlotKey::new(*origin_day_index, *origin_hour),
        }
    }
}

/// Affordance shown while hovering a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropEffect {
    Copy,
    Move,
}

/// Platform transfer mechanism: string data keyed by MIME type.
pub trait TransferData {
    fn set_data(&mut self, mime: &str, data: String);
    fn get_data(&self, mime: &str) -> Option<String>;
}

/// In-memory transfer used by the egui board and in tests.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryTransfer {
    entries: HashMap<String, String>,
}

impl MemoryTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transfer holding arbitrary (possibly foreign) text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut transfer = Self::new();
        transfer.set_data(MIME_TEXT, text.into());
        transfer
    }
}

impl TransferData for MemoryTransfer {
    fn set_data(&mut self, mime: &str, data: String) {
        self.entries.insert(mime.to_string(), data);
    }

    fn get_data(&self, mime: &str) -> Option<String> {
        self.entries.get(mime).cloned()
    }
}

/// Result of a drop.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// A catalog card was copied into the target cell.
    Placed { target: SlotKey },
    /// A placed card moved from `origin` to `target`.
    Moved { origin: SlotKey, target: SlotKey },
    /// Payload missing, malformed, or target outside the window.
    Ignored,
}

impl DropOutcome {
    pub fn changed_grid(&self) -> bool {
        !matches!(self, DropOutcome::Ignored)
    }
}

pub struct DragController;

impl DragController {
    /// Serialize `payload` into the transfer under both MIME types.
    pub fn begin<T: TransferData + ?Sized>(transfer: &mut T, payload: &DragPayload) {
        match serde_json::to_string(payload) {
            Ok(serialized) => {
                transfer.set_data(MIME_JSON, serialized.clone());
                transfer.set_data(MIME_TEXT, serialized);
            }
            Err(err) => log::warn!("Failed to serialize drag payload: {}", err),
        }
    }

    /// Decode the payload, preferring the JSON slot and falling back to
    /// plain text. Foreign or malformed data yields `None`.
    pub fn read<T: TransferData + ?Sized>(transfer: &T) -> Option<DragPayload> {
        let raw = transfer
            .get_data(MIME_JSON)
            .filter(|data| !data.is_empty())
            .or_else(|| transfer.get_data(MIME_TEXT))?;

        match serde_json::from_str(&raw) {
            Ok(payload) => Some(payload),
            Err(err) => {
                log::debug!("Ignoring unrecognised drag payload: {}", err);
                None
            }
        }
    }

    /// Copy/move affordance for the hovered cell. Pure; never fails.
    pub fn preview_effect<T: TransferData + ?Sized>(transfer: &T) -> Option<DropEffect> {
        Self::read(transfer).map(|payload| payload.effect())
    }

    /// Apply a drop onto `(day_index, hour)`.
    pub fn drop_onto<T: TransferData + ?Sized>(
        grid: &mut SlotGrid,
        transfer: &T,
        day_index: u8,
        hour: u8,
    ) -> DropOutcome {
        let Some(payload) = Self::read(transfer) else {
            return DropOutcome::Ignored;
        };
        Self::apply(grid, payload, day_index, hour)
    }

    /// Apply an already decoded payload.
    pub fn apply(grid: &mut SlotGrid, payload: DragPayload, day_index: u8, hour: u8) -> DropOutcome {
        let Some(target) = SlotKey::new(day_index, hour) else {
            return DropOutcome::Ignored;
        };

        let origin = payload.origin();
        if matches!(payload, DragPayload::Placement { .. }) && origin.is_none() {
            log::debug!("Ignoring placement payload with an invalid origin");
            return DropOutcome::Ignored;
        }

        let event = match payload {
            DragPayload::Catalog { event } | DragPayload::Placement { event, .. } => event,
        };
        if !grid.place(day_index, hour, event, origin) {
            return DropOutcome::Ignored;
        }

        match origin {
            Some(origin) => DropOutcome::Moved { origin, target },
            None => DropOutcome::Placed { target },
        }
    }
}
