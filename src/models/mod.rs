// Module exports for models

pub mod catalog;
pub mod category;
pub mod schedule;
pub mod settings;
pub mod trip;
