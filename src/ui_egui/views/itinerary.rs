use egui::RichText;

use super::BoardAction;
use crate::models::trip::TripLeg;
use crate::services::itinerary::{directions_url, DayNavigation, ItineraryStop};
use crate::services::week_window::hour_label;
use crate::utils::date::{day_name, format_short_date};

pub struct ItineraryView<'a> {
    pub day_offset: i64,
    pub navigation: DayNavigation,
    pub stops: &'a [ItineraryStop],
    pub legs: &'a [TripLeg],
    pub starred_leg: Option<i64>,
}

impl ItineraryView<'_> {
    pub fn show(&self, ui: &mut egui::Ui, actions: &mut Vec<BoardAction>) {
        ui.horizontal(|ui| {
            if ui
                .add_enabled(self.navigation.can_go_previous, egui::Button::new("◀"))
                .clicked()
            {
                actions.push(BoardAction::ItineraryDay(self.day_offset - 1));
            }
            ui.label(RichText::new(self.day_title()).heading());
            if ui
                .add_enabled(self.navigation.can_go_next, egui::Button::new("▶"))
                .clicked()
            {
                actions.push(BoardAction::ItineraryDay(self.day_offset + 1));
            }
        });
        ui.separator();

        if self.stops.is_empty() {
            ui.label("No locked-in stops scheduled for this day.");
        } else {
            egui::Grid::new("itinerary_stops")
                .num_columns(3)
                .striped(true)
                .show(ui, |ui| {
                    for stop in self.stops {
                        ui.label(hour_label(stop.hour));
                        ui.label(RichText::new(&stop.title).strong());
                        ui.label(&stop.location);
                        ui.end_row();
                    }
                });
        }

        ui.add_space(6.0);
        let can_map = directions_url(self.stops).is_some();
        if ui
            .add_enabled(can_map, egui::Button::new("Open directions"))
            .on_disabled_hover_text("None of today's stops has a location")
            .clicked()
        {
            actions.push(BoardAction::OpenDirections);
        }

        if !self.legs.is_empty() {
            ui.add_space(12.0);
            ui.label(RichText::new("Legs").strong());
            for leg in self.legs {
                ui.horizontal(|ui| {
                    let starred = self.starred_leg == Some(leg.id);
                    let star = if starred { "★" } else { "☆" };
                    if ui.small_button(star).clicked() {
                        actions.push(BoardAction::ToggleStarredLeg(leg.id));
                    }
                    ui.label(leg_summary(leg));
                });
            }
        }
    }

    fn day_title(&self) -> String {
        match self.navigation.date {
            Some(date) => format!(
                "Day {} · {} {}",
                self.day_offset + 1,
                day_name(date),
                format_short_date(date)
            ),
            None => format!("Day {}", self.day_offset + 1),
        }
    }
}

fn leg_summary(leg: &TripLeg) -> String {
    match (leg.start_date, leg.end_date) {
        (Some(start), Some(end)) => format!(
            "{} ({} – {})",
            leg.name,
            format_short_date(start),
            format_short_date(end)
        ),
        (Some(start), None) => format!("{} (from {})", leg.name, format_short_date(start)),
        _ => leg.name.clone(),
    }
}
