//! Slot grid: the sparse (relative day, hour) -> placement map of the
//! visible window.
//!
//! The grid only ever describes the window currently on screen. Switching
//! windows goes through [`SlotGrid::load`], which starts from an empty grid.
//! Local edits set the dirty flag; only a successful save clears it.

use std::collections::{BTreeMap, HashMap};

use crate::models::catalog::CatalogEvent;
use crate::models::schedule::{to_relative, Placement, ScheduleEntry, SlotKey};

#[derive(Debug, Clone, Default)]
pub struct SlotGrid {
    slots: BTreeMap<SlotKey, Placement>,
    dirty: bool,
    /// Bumped on every local mutation; lets a save tell whether the grid
    /// changed while its request was in flight.
    revision: u64,
}

/// Summary of a [`SlotGrid::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub outside_window: usize,
    pub dangling: usize,
}

impl SlotGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, day_index: u8, hour: u8) -> Option<&Placement> {
        SlotKey::new(day_index, hour).and_then(|key| self.slots.get(&key))
    }

    /// Put `event` into `(day_index, hour)`.
    ///
    /// With an `origin` this is a move: the origin cell is cleared first,
    /// unconditionally, and whatever occupied the destination is replaced.
    /// Returns `false` (and changes nothing) for coordinates outside the
    /// window.
    pub fn place(
        &mut self,
        day_index: u8,
        hour: u8,
        event: CatalogEvent,
        origin: Option<SlotKey>,
    ) -> bool {
        let Some(destination) = SlotKey::new(day_index, hour) else {
            log::debug!("Rejected placement outside window: {}-{}", day_index, hour);
            return false;
        };

        if let Some(origin) = origin {
            self.slots.remove(&origin);
        }

        self.slots.insert(
            destination,
            Placement {
                event,
                day_index,
                hour,
            },
        );
        self.touch();
        true
    }

    /// Clear a cell. Absent cells are a no-op and do not mark the grid dirty.
    pub fn remove(&mut self, day_index: u8, hour: u8) -> Option<Placement> {
        let key = SlotKey::new(day_index, hour)?;
        let removed = self.slots.remove(&key)?;
        self.touch();
        Some(removed)
    }

    /// Replace the grid with the persisted entries that fall in the window at
    /// `week_offset`.
    ///
    /// Entries whose card is missing from `catalog_by_id` are dropped. This
    /// is a load, not an edit: the dirty flag ends up cleared.
    pub fn load(
        &mut self,
        week_offset: i32,
        entries: &[ScheduleEntry],
        catalog_by_id: &HashMap<String, CatalogEvent>,
    ) -> LoadSummary {
        self.slots.clear();
        self.dirty = false;

        let mut summary = LoadSummary::default();
        for entry in entries {
            let Some(day_index) = to_relative(week_offset, entry.day_index) else {
                summary.outside_window += 1;
                continue;
            };
            let Some(key) = SlotKey::new(day_index, entry.hour) else {
                log::debug!(
                    "Skipping schedule entry for card {} with invalid hour {}",
                    entry.card_id,
                    entry.hour
                );
                summary.outside_window += 1;
                continue;
            };
            let Some(event) = catalog_by_id.get(&entry.card_id.to_string()) else {
                log::debug!("Dropping schedule entry for missing card {}", entry.card_id);
                summary.dangling += 1;
                continue;
            };

            self.slots.insert(
                key,
                Placement {
                    event: event.clone(),
                    day_index,
                    hour: entry.hour,
                },
            );
            summary.loaded += 1;
        }
        summary
    }

    /// Drop everything without marking the grid dirty.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.dirty = false;
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Placements in slot-key order (day, then hour).
    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.slots.values()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision = self.revision.wrapping_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::category::Category;

    fn event(id: &str) -> CatalogEvent {
        CatalogEvent::new(id, format!("Event {}", id), Category::Activities)
    }

    fn entry(card_id: i64, day_index: i64, hour: u8) -> ScheduleEntry {
        ScheduleEntry {
            id: None,
            trip_id: 1,
            card_id,
            day_index,
            hour,
        }
    }

    fn catalog(ids: &[&str]) -> HashMap<String, CatalogEvent> {
        ids.iter().map(|id| (id.to_string(), event(id))).collect()
    }

    #[test]
    fn test_place_then_get_then_remove() {
        let mut grid = SlotGrid::new();
        assert!(grid.place(2, 14, event("5"), None));
        assert_eq!(grid.get(2, 14).unwrap().event.id, "5");

        let removed = grid.remove(2, 14).unwrap();
        assert_eq!(removed.event.id, "5");
        assert!(grid.get(2, 14).is_none());
    }

    #[test]
    fn test_drop_overwrites_occupied_cell() {
        let mut grid = SlotGrid::new();
        grid.place(1, 9, event("7"), None);
        grid.place(1, 9, event("42"), None);

        assert_eq!(grid.get(1, 9).unwrap().event.id, "42");
        assert!(grid.iter().all(|p| p.event.id != "7"));
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_move_clears_origin_even_when_destination_occupied() {
        let mut grid = SlotGrid::new();
        grid.place(0, 10, event("1"), None);
        grid.place(3, 12, event("2"), None);

        grid.place(3, 12, event("1"), SlotKey::new(0, 10));

        assert!(grid.get(0, 10).is_none());
        assert_eq!(grid.get(3, 12).unwrap().event.id, "1");
        assert_eq!(grid.len(), 1);
    }

    #[test]
    fn test_move_onto_itself_keeps_placement() {
        let mut grid = SlotGrid::new();
        grid.place(0, 10, event("1"), None);
        grid.place(0, 10, event("1"), SlotKey::new(0, 10));
        assert_eq!(grid.get(0, 10).unwrap().event.id, "1");
    }

    #[test]
    fn test_same_card_can_be_placed_twice() {
        let mut grid = SlotGrid::new();
        grid.place(0, 9, event("3"), None);
        grid.place(4, 20, event("3"), None);
        assert_eq!(grid.iter().filter(|p| p.event.id == "3").count(), 2);
    }

    #[test]
    fn test_out_of_window_coordinates_rejected() {
        let mut grid = SlotGrid::new();
        assert!(!grid.place(5, 9, event("1"), None));
        assert!(!grid.place(0, 24, event("1"), None));
        assert!(grid.is_empty());
        assert!(!grid.is_dirty());
        assert!(grid.get(9, 9).is_none());
    }

    #[test]
    fn test_dirty_flag_lifecycle() {
        let mut grid = SlotGrid::new();
        assert!(!grid.is_dirty());

        assert!(grid.remove(0, 8).is_none());
        assert!(!grid.is_dirty(), "removing an empty cell is not a mutation");

        grid.place(0, 8, event("1"), None);
        assert!(grid.is_dirty());

        grid.mark_clean();
        assert!(!grid.is_dirty());

        grid.remove(0, 8);
        assert!(grid.is_dirty());
    }

    #[test]
    fn test_revision_counts_mutations() {
        let mut grid = SlotGrid::new();
        let before = grid.revision();
        grid.place(0, 8, event("1"), None);
        grid.remove(0, 8);
        grid.remove(0, 8);
        assert_eq!(grid.revision(), before + 2);
    }

    #[test]
    fn test_load_filters_window_and_converts_to_relative() {
        let mut grid = SlotGrid::new();
        let entries = vec![entry(1, 13, 9), entry(2, 9, 10), entry(3, 10, 8), entry(1, 15, 9)];

        let summary = grid.load(2, &entries, &catalog(&["1", "2", "3"]));

        assert_eq!(summary.loaded, 2);
        assert_eq!(summary.outside_window, 2);
        assert_eq!(grid.get(3, 9).unwrap().event.id, "1");
        assert_eq!(grid.get(0, 8).unwrap().event.id, "3");
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_load_discards_previous_window() {
        let mut grid = SlotGrid::new();
        grid.place(1, 9, event("1"), None);

        grid.load(1, &[entry(2, 5, 11)], &catalog(&["1", "2"]));

        assert!(grid.get(1, 9).is_none());
        assert_eq!(grid.get(0, 11).unwrap().event.id, "2");
        assert_eq!(grid.len(), 1);
        assert!(!grid.is_dirty());
    }

    #[test]
    fn test_load_drops_dangling_cards() {
        let mut grid = SlotGrid::new();
        let summary = grid.load(0, &[entry(1, 0, 9), entry(77, 1, 9)], &catalog(&["1"]));
        assert_eq!(summary.dangling, 1);
        assert_eq!(grid.len(), 1);
        assert!(grid.get(1, 9).is_none());
    }

    #[test]
    fn test_load_skips_invalid_hours() {
        let mut grid = SlotGrid::new();
        let summary = grid.load(0, &[entry(1, 0, 24)], &catalog(&["1"]));
        assert_eq!(summary.loaded, 0);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_iter_is_ordered_by_day_then_hour() {
        let mut grid = SlotGrid::new();
        grid.place(2, 8, event("c"), None);
        grid.place(0, 20, event("b"), None);
        grid.place(0, 9, event("a"), None);
        let ids: Vec<&str> = grid.iter().map(|p| p.event.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clear() {
        let mut grid = SlotGrid::new();
        grid.place(2, 8, event("c"), None);
        grid.clear();
        assert!(grid.is_empty());
        assert!(!grid.is_dirty());
    }
}
