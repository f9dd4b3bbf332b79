// Service module exports

pub mod api;
pub mod catalog;
pub mod drag;
pub mod itinerary;
pub mod lock_in;
pub mod slot_grid;
pub mod storage;
pub mod sync;
pub mod week_window;
