use egui::{Context, Id, Pos2};

use crate::models::schedule::SlotKey;
use crate::services::drag::{DragController, DragPayload, DropEffect, MemoryTransfer, TransferData};

/// Drag in progress on the board, kept in egui memory between frames.
#[derive(Clone, Debug, Default)]
pub struct BoardDrag {
    pub transfer: MemoryTransfer,
    pub hovered: Option<SlotKey>,
    pub pointer_pos: Option<Pos2>,
}

impl BoardDrag {
    pub fn payload(&self) -> Option<DragPayload> {
        DragController::read(&self.transfer)
    }
}

impl TransferData for BoardDrag {
    fn set_data(&mut self, mime: &str, data: String) {
        self.transfer.set_data(mime, data);
    }

    fn get_data(&self, mime: &str) -> Option<String> {
        self.transfer.get_data(mime)
    }
}

pub struct DragManager;

impl DragManager {
    fn storage_id() -> Id {
        Id::new("trip_board_drag_state")
    }

    pub fn begin(ctx: &Context, payload: &DragPayload) {
        let mut state = BoardDrag::default();
        DragController::begin(&mut state, payload);
        ctx.memory_mut(|mem| {
            mem.data.insert_temp(Self::storage_id(), state);
        });
    }

    pub fn active(ctx: &Context) -> Option<BoardDrag> {
        ctx.memory_mut(|mem| mem.data.get_temp::<BoardDrag>(Self::storage_id()))
    }

    pub fn is_active(ctx: &Context) -> bool {
        Self::active(ctx).is_some()
    }

    fn modify(ctx: &Context, f: impl FnOnce(&mut BoardDrag)) {
        let id = Self::storage_id();
        ctx.memory_mut(|mem| {
            if let Some(mut state) = mem.data.get_temp::<BoardDrag>(id) {
                f(&mut state);
                mem.data.insert_temp(id, state);
            }
        });
    }

    pub fn update_hover(ctx: &Context, key: SlotKey, pointer_pos: Pos2) {
        Self::modify(ctx, |state| {
            state.hovered = Some(key);
            state.pointer_pos = Some(pointer_pos);
        });
    }

    /// Forget the hovered cell; cells re-register it while the pointer is
    /// over them.
    pub fn clear_hover(ctx: &Context) {
        Self::modify(ctx, |state| state.hovered = None);
    }

    pub fn hovered(ctx: &Context) -> Option<SlotKey> {
        Self::active(ctx).and_then(|state| state.hovered)
    }

    pub fn preview_effect(ctx: &Context) -> Option<DropEffect> {
        Self::active(ctx).and_then(|state| DragController::preview_effect(&state))
    }

    pub fn finish(ctx: &Context) -> Option<BoardDrag> {
        let id = Self::storage_id();
        ctx.memory_mut(|mem| {
            let current = mem.data.get_temp::<BoardDrag>(id);
            mem.data.remove::<BoardDrag>(id);
            current
        })
    }

    pub fn cancel(ctx: &Context) {
        ctx.memory_mut(|mem| {
            mem.data.remove::<BoardDrag>(Self::storage_id());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::CatalogEvent;
    use crate::models::category::Category;

    fn payload() -> DragPayload {
        DragPayload::catalog(CatalogEvent::new("4", "Ferry", Category::Activities))
    }

    #[test]
    fn test_drag_lifecycle_in_memory() {
        let ctx = Context::default();
        assert!(!DragManager::is_active(&ctx));

        DragManager::begin(&ctx, &payload());
        assert!(DragManager::is_active(&ctx));
        assert_eq!(DragManager::preview_effect(&ctx), Some(DropEffect::Copy));

        let key = SlotKey::new(2, 10).unwrap();
        DragManager::update_hover(&ctx, key, Pos2::new(5.0, 5.0));
        assert_eq!(DragManager::hovered(&ctx), Some(key));

        DragManager::clear_hover(&ctx);
        assert_eq!(DragManager::hovered(&ctx), None);

        let finished = DragManager::finish(&ctx).unwrap();
        assert_eq!(finished.payload(), Some(payload()));
        assert!(!DragManager::is_active(&ctx));
    }

    #[test]
    fn test_hover_without_drag_is_ignored() {
        let ctx = Context::default();
        DragManager::update_hover(&ctx, SlotKey::new(0, 8).unwrap(), Pos2::ZERO);
        assert!(!DragManager::is_active(&ctx));
        assert!(DragManager::finish(&ctx).is_none());
    }

    #[test]
    fn test_cancel_drops_state() {
        let ctx = Context::default();
        DragManager::begin(&ctx, &payload());
        DragManager::cancel(&ctx);
        assert!(DragManager::active(&ctx).is_none());
    }
}
