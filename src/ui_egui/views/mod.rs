pub mod board;
pub mod itinerary;
pub(crate) mod palette;

use crate::models::category::Category;
use crate::models::schedule::SlotKey;
use crate::services::drag::DropOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardTab {
    Board,
    Itinerary,
}

/// Something the user did in a view that the app has to act on.
///
/// Grid edits are applied by the view itself; they are reported so the app
/// can log them and refresh derived state.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardAction {
    SelectTrip(i64),
    SelectTab(BoardTab),
    SelectCategory(Category),
    ToggleLockIn(i64),
    Navigate(i32),
    Save,
    Refresh,
    Dropped(DropOutcome),
    Removed(SlotKey),
    ItineraryDay(i64),
    OpenDirections,
    ToggleStarredLeg(i64),
}
