//! Event catalog: the snapshot of backlog cards offered for scheduling.

use std::collections::HashMap;

use crate::models::catalog::{BacklogCard, CatalogEvent};
use crate::models::category::Category;
use crate::services::api::{ApiResult, TripApi};

/// Immutable-by-default snapshot of the backlog, refreshed on board mount.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventCatalog {
    cards: Vec<BacklogCard>,
    events: Vec<CatalogEvent>,
}

impl EventCatalog {
    pub fn from_cards(cards: Vec<BacklogCard>) -> Self {
        let events = cards.iter().map(CatalogEvent::from).collect();
        Self { cards, events }
    }

    /// Fetch the backlog from the collaborator.
    pub fn load<A: TripApi + ?Sized>(api: &A) -> ApiResult<Self> {
        let cards = api.list_backlog_cards()?;
        log::info!("Loaded {} backlog cards", cards.len());
        Ok(Self::from_cards(cards))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &[CatalogEvent] {
        &self.events
    }

    pub fn cards(&self) -> &[BacklogCard] {
        &self.cards
    }

    /// Events that may be scheduled (locked-in only).
    pub fn schedulable(&self) -> impl Iterator<Item = &CatalogEvent> {
        self.events.iter().filter(|event| event.locked_in)
    }

    /// Schedulable events of one category, as the catalog panel lists them.
    pub fn in_category(&self, category: Category) -> Vec<&CatalogEvent> {
        self.schedulable()
            .filter(|event| event.category == category)
            .collect()
    }

    /// Cards of one category still waiting to be locked in.
    pub fn pending_in_category(&self, category: Category) -> Vec<&CatalogEvent> {
        self.events
            .iter()
            .filter(|event| !event.locked_in && event.category == category)
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&CatalogEvent> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn card(&self, card_id: i64) -> Option<&BacklogCard> {
        self.cards.iter().find(|card| card.id == card_id)
    }

    /// Lookup table used when resolving persisted schedule entries.
    pub fn by_id(&self) -> HashMap<String, CatalogEvent> {
        self.events
            .iter()
            .map(|event| (event.id.clone(), event.clone()))
            .collect()
    }

    /// Flip the locked-in flag locally. Returns the previous value, or
    /// `None` when the card is unknown.
    pub fn set_locked_in(&mut self, id: &str, locked_in: bool) -> Option<bool> {
        let event = self.events.iter_mut().find(|event| event.id == id)?;
        let previous = event.locked_in;
        event.locked_in = locked_in;

        if let Some(card) = self.cards.iter_mut().find(|card| card.id.to_string() == id) {
            card.locked_in = Some(locked_in);
        }
        Some(previous)
    }

    /// Adopt the server's copy of a card.
    pub fn replace_card(&mut self, card: BacklogCard) {
        let event = CatalogEvent::from(&card);
        match self.cards.iter().position(|existing| existing.id == card.id) {
            Some(index) => {
                self.cards[index] = card;
                self.events[index] = event;
            }
            None => {
                self.cards.push(card);
                self.events.push(event);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::api::{ApiError, MockTripApi};

    fn card(id: i64, title: &str, category: &str, locked_in: bool) -> BacklogCard {
        BacklogCard {
            id,
            title: title.into(),
            category: Some(category.into()),
            locked_in: Some(locked_in),
            ..BacklogCard::default()
        }
    }

    fn sample() -> EventCatalog {
        EventCatalog::from_cards(vec![
            card(1, "Louvre", "activities", true),
            card(2, "Boat tour", "activities", false),
            card(3, "Bistro", "food", true),
            card(4, "Hotel Lutetia", "hotels", true),
        ])
    }

    #[test]
    fn test_only_locked_in_events_are_schedulable() {
        let catalog = sample();
        let ids: Vec<&str> = catalog.schedulable().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
    }

    #[test]
    fn test_in_category_filters_both_ways() {
        let catalog = sample();
        let activities = catalog.in_category(Category::Activities);
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].title, "Louvre");
        assert!(catalog.in_category(Category::Clubs).is_empty());
        assert_eq!(catalog.pending_in_category(Category::Activities)[0].id, "2");
    }

    #[test]
    fn test_by_id_contains_every_event() {
        let map = sample().by_id();
        assert_eq!(map.len(), 4);
        assert_eq!(map["3"].title, "Bistro");
    }

    #[test]
    fn test_set_locked_in_updates_card_and_event() {
        let mut catalog = sample();
        assert_eq!(catalog.set_locked_in("2", true), Some(false));
        assert!(catalog.get("2").unwrap().locked_in);
        assert!(catalog.card(2).unwrap().is_locked_in());
        assert_eq!(catalog.set_locked_in("99", true), None);
    }

    #[test]
    fn test_replace_card_keeps_position() {
        let mut catalog = sample();
        catalog.replace_card(card(3, "Bistro Paul", "food", false));
        assert_eq!(catalog.events()[2].title, "Bistro Paul");
        assert!(!catalog.events()[2].locked_in);

        catalog.replace_card(card(5, "Jazz bar", "clubs", true));
        assert_eq!(catalog.len(), 5);
    }

    #[test]
    fn test_load_uses_api() {
        let mut api = MockTripApi::new();
        api.expect_list_backlog_cards()
            .times(1)
            .returning(|| Ok(vec![card(8, "Museum", "activities", true)]));

        let catalog = EventCatalog::load(&api).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("8").unwrap().title, "Museum");
    }

    #[test]
    fn test_load_propagates_errors() {
        let mut api = MockTripApi::new();
        api.expect_list_backlog_cards().returning(|| {
            Err(ApiError::Http {
                status: 502,
                url: "http://x/backlog/cards".into(),
            })
        });
        assert!(EventCatalog::load(&api).is_err());
    }
}
