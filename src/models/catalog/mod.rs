// Catalog module
// Backlog cards as served by the REST collaborator and the lightweight
// catalog events the schedule board works with.

use serde::{Deserialize, Serialize};

use crate::models::category::Category;

/// Person who proposed a backlog card.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CardCreator {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Wire record of `GET /backlog/cards`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BacklogCard {
    pub id: i64,
    pub category: Option<String>,
    pub title: String,
    pub location: Option<String>,
    pub cost: Option<f64>,
    pub rating: Option<f64>,
    pub desire_to_go: Option<f64>,
    pub requires_reservation: Option<bool>,
    pub description: Option<String>,
    pub reserved: Option<bool>,
    pub reservation_date: Option<String>,
    pub locked_in: Option<bool>,
    pub created_by: Option<i64>,
    pub creator: Option<CardCreator>,
}

impl BacklogCard {
    pub fn is_locked_in(&self) -> bool {
        self.locked_in.unwrap_or(false)
    }

    pub fn category(&self) -> Category {
        Category::parse_or_default(self.category.as_deref())
    }
}

/// Partial update body for `PATCH /backlog/cards/{id}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BacklogCardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked_in: Option<bool>,
}

impl BacklogCardPatch {
    pub fn locked_in(value: bool) -> Self {
        Self {
            locked_in: Some(value),
        }
    }
}

/// A schedulable backlog item as shown in the catalog panel.
///
/// Catalog events are snapshots: the board never edits a card through one,
/// it only copies them into slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEvent {
    pub id: String,
    pub title: String,
    pub desirability: Option<f64>,
    pub category: Category,
    pub locked_in: bool,
}

impl CatalogEvent {
    pub fn new(id: impl Into<String>, title: impl Into<String>, category: Category) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            desirability: None,
            category,
            locked_in: true,
        }
    }

    pub fn with_desirability(mut self, desirability: f64) -> Self {
        self.desirability = Some(desirability);
        self
    }

    /// Card id as the persistence layer addresses it.
    pub fn card_id(&self) -> Option<i64> {
        self.id.parse().ok()
    }

    /// Title with a placeholder for blank cards.
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }

    /// "Desire: 4.5" or an em placeholder when no score was given.
    pub fn desirability_label(&self) -> String {
        match self.desirability {
            Some(score) => format!("Desire: {:.1}", score),
            None => "Desire: —".to_string(),
        }
    }
}

impl From<&BacklogCard> for CatalogEvent {
    fn from(card: &BacklogCard) -> Self {
        Self {
            id: card.id.to_string(),
            title: card.title.clone(),
            desirability: card.desire_to_go,
            category: card.category(),
            locked_in: card.is_locked_in(),
        }
    }
}
