//! Schedule board: catalog panel and the five-day week grid.
//!
//! Cells are laid out by hand (not with `egui::Grid`) so drag hover can be
//! resolved geometrically against each cell rect while a drag owns the
//! pointer.

use chrono::NaiveDate;
use egui::{Align2, CursorIcon, FontId, Pos2, Rect, RichText, Sense, Stroke, Vec2};
use std::ops::Range;

use super::palette::{category_color, with_alpha, BoardPalette};
use super::BoardAction;
use crate::models::catalog::CatalogEvent;
use crate::models::category::Category;
use crate::models::schedule::SlotKey;
use crate::services::catalog::EventCatalog;
use crate::services::drag::{DragController, DragPayload};
use crate::services::slot_grid::SlotGrid;
use crate::services::week_window::{hour_label, NavigationBounds, WeekWindow};
use crate::ui_egui::drag::DragManager;
use crate::utils::date::format_short_date;

const HOUR_COLUMN_WIDTH: f32 = 56.0;
const ROW_HEIGHT: f32 = 30.0;
const HEADER_HEIGHT: f32 = 36.0;
const CARD_HEIGHT: f32 = 44.0;

pub fn render_catalog_panel(
    ui: &mut egui::Ui,
    catalog: &EventCatalog,
    selected: Category,
    actions: &mut Vec<BoardAction>,
) {
    let palette = BoardPalette::from_visuals(ui.visuals());

    ui.heading("Catalog");
    ui.horizontal_wrapped(|ui| {
        for category in Category::ALL {
            let text = format!("{} {}", category.icon(), category.label());
            if ui.selectable_label(category == selected, text).clicked() && category != selected {
                actions.push(BoardAction::SelectCategory(category));
            }
        }
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .id_source("catalog_scroll")
        .show(ui, |ui| {
            let locked = catalog.in_category(selected);
            if locked.is_empty() {
                ui.label(RichText::new("Nothing locked in yet").color(palette.muted_text));
            }
            for event in locked {
                render_catalog_card(ui, event, &palette, actions);
                ui.add_space(4.0);
            }

            let pending = catalog.pending_in_category(selected);
            if !pending.is_empty() {
                ui.add_space(8.0);
                ui.label(RichText::new("Not locked in").strong());
                for event in pending {
                    ui.horizontal(|ui| {
                        ui.label(event.display_title());
                        if let Some(card_id) = event.card_id() {
                            if ui.small_button("Lock in").clicked() {
                                actions.push(BoardAction::ToggleLockIn(card_id));
                            }
                        }
                    });
                }
            }
        });
}

fn render_catalog_card(
    ui: &mut egui::Ui,
    event: &CatalogEvent,
    palette: &BoardPalette,
    actions: &mut Vec<BoardAction>,
) {
    let size = Vec2::new(ui.available_width(), CARD_HEIGHT);
    let (rect, response) = ui.allocate_exact_size(size, Sense::click_and_drag());

    let painter = ui.painter();
    painter.rect_filled(rect, 6.0, palette.card_fill(event.category));
    painter.text(
        rect.left_top() + Vec2::new(8.0, 6.0),
        Align2::LEFT_TOP,
        event.display_title(),
        FontId::proportional(14.0),
        palette.text,
    );
    painter.text(
        rect.left_bottom() + Vec2::new(8.0, -6.0),
        Align2::LEFT_BOTTOM,
        event.desirability_label(),
        FontId::proportional(11.0),
        palette.muted_text,
    );

    if response.hovered() {
        ui.ctx().set_cursor_icon(CursorIcon::Grab);
    }
    if response.drag_started() {
        DragManager::begin(ui.ctx(), &DragPayload::catalog(event.clone()));
    }

    if let Some(card_id) = event.card_id() {
        response.context_menu(|ui| {
            if ui.button("Unlock").clicked() {
                actions.push(BoardAction::ToggleLockIn(card_id));
                ui.close_menu();
            }
        });
    }
}

/// Window header, navigation and save controls.
pub fn render_board_toolbar(
    ui: &mut egui::Ui,
    window: &WeekWindow,
    bounds: NavigationBounds,
    is_dirty: bool,
    can_save: bool,
    is_saving: bool,
    actions: &mut Vec<BoardAction>,
) {
    ui.horizontal(|ui| {
        let can_navigate = !is_saving;
        if ui
            .add_enabled(can_navigate && bounds.can_go_previous, egui::Button::new("◀ Previous"))
            .clicked()
        {
            actions.push(BoardAction::Navigate(-1));
        }
        if ui
            .add_enabled(can_navigate && bounds.can_go_next, egui::Button::new("Next ▶"))
            .clicked()
        {
            actions.push(BoardAction::Navigate(1));
        }

        ui.label(RichText::new(window_title(window)).strong());

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            let label = if is_saving { "Saving..." } else { "Save" };
            if ui
                .add_enabled(can_save && !is_saving, egui::Button::new(label))
                .clicked()
            {
                actions.push(BoardAction::Save);
            }
            if is_dirty {
                ui.label(RichText::new("Unsaved changes").italics());
            }
            if ui
                .add_enabled(!is_saving, egui::Button::new("⟳"))
                .on_hover_text("Reload catalog and schedule")
                .clicked()
            {
                actions.push(BoardAction::Refresh);
            }
        });
    });
}

fn window_title(window: &WeekWindow) -> String {
    match (window.days.first(), window.days.last()) {
        (Some(first), Some(last)) if first.date == last.date => format_short_date(first.date),
        (Some(first), Some(last)) => format!(
            "{} – {}",
            format_short_date(first.date),
            format_short_date(last.date)
        ),
        _ => "No days in this window".to_string(),
    }
}

/// Draw the grid and apply drops and removals to `grid`.
pub fn render_week_grid(
    ui: &mut egui::Ui,
    grid: &mut SlotGrid,
    window: &WeekWindow,
    trip_start: Option<NaiveDate>,
    hours: Range<u8>,
    actions: &mut Vec<BoardAction>,
) {
    let palette = BoardPalette::from_visuals(ui.visuals());
    let ctx = ui.ctx().clone();

    let columns: Vec<(u8, String)> = match trip_start {
        Some(start) => window
            .days
            .iter()
            .filter_map(|day| {
                let index = window.relative_index_of(start, day.date)?;
                Some((index, format!("{} {}", day.day_name, day.day_number)))
            })
            .collect(),
        None => Vec::new(),
    };

    if columns.is_empty() {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("No days in this window").color(palette.muted_text));
        });
        return;
    }

    let drag_active = DragManager::is_active(&ctx);
    let drop_effect = DragManager::preview_effect(&ctx);
    if drag_active {
        DragManager::clear_hover(&ctx);
    }
    let pointer = ctx.pointer_latest_pos();

    let col_width =
        ((ui.available_width() - HOUR_COLUMN_WIDTH) / columns.len() as f32).max(60.0);

    egui::ScrollArea::vertical()
        .id_source("week_grid_scroll")
        .show(ui, |ui| {
            ui.spacing_mut().item_spacing = Vec2::ZERO;

            ui.horizontal(|ui| {
                ui.allocate_exact_size(Vec2::new(HOUR_COLUMN_WIDTH, HEADER_HEIGHT), Sense::hover());
                for (_, title) in &columns {
                    let (rect, _) =
                        ui.allocate_exact_size(Vec2::new(col_width, HEADER_HEIGHT), Sense::hover());
                    ui.painter().rect_filled(rect, 0.0, palette.header_bg);
                    ui.painter().text(
                        rect.center(),
                        Align2::CENTER_CENTER,
                        title,
                        FontId::proportional(14.0),
                        palette.text,
                    );
                }
            });

            for hour in hours {
                ui.horizontal(|ui| {
                    let (label_rect, _) =
                        ui.allocate_exact_size(Vec2::new(HOUR_COLUMN_WIDTH, ROW_HEIGHT), Sense::hover());
                    ui.painter().text(
                        label_rect.right_center() - Vec2::new(6.0, 0.0),
                        Align2::RIGHT_CENTER,
                        hour_label(hour),
                        FontId::proportional(11.0),
                        palette.muted_text,
                    );

                    for (day_index, _) in &columns {
                        let Some(key) = SlotKey::new(*day_index, hour) else {
                            continue;
                        };
                        let (rect, response) = ui.allocate_exact_size(
                            Vec2::new(col_width, ROW_HEIGHT),
                            Sense::click_and_drag(),
                        );

                        let hovered_by_drag =
                            drag_active && pointer.map_or(false, |pos| rect.contains(pos));
                        if hovered_by_drag {
                            if let Some(pos) = pointer {
                                DragManager::update_hover(&ctx, key, pos);
                            }
                        }

                        render_cell(ui, rect, key, grid, &palette);

                        if hovered_by_drag {
                            if let Some(effect) = drop_effect {
                                let color = palette.drop_highlight(effect);
                                let inner = rect.shrink2(Vec2::new(2.0, 2.0));
                                ui.painter().rect_filled(inner, 3.0, with_alpha(color, 40));
                                ui.painter().rect_stroke(inner, 3.0, Stroke::new(1.5, color));
                            }
                            ctx.set_cursor_icon(CursorIcon::Grabbing);
                        }

                        handle_cell_input(&ctx, &response, key, grid, drag_active, actions);
                    }
                });
            }
        });

    if drag_active && ctx.input(|i| i.pointer.any_released()) {
        if let Some(drag) = DragManager::finish(&ctx) {
            if let Some(target) = drag.hovered {
                let outcome = DragController::drop_onto(grid, &drag, target.day_index, target.hour);
                if outcome.changed_grid() {
                    actions.push(BoardAction::Dropped(outcome));
                }
            }
        }
    }
}

fn render_cell(ui: &egui::Ui, rect: Rect, key: SlotKey, grid: &SlotGrid, palette: &BoardPalette) {
    let painter = ui.painter();
    painter.rect_filled(rect, 0.0, palette.cell_bg);
    painter.line_segment(
        [rect.left_top(), rect.right_top()],
        Stroke::new(1.0, palette.grid_line),
    );
    painter.line_segment(
        [rect.right_top(), rect.right_bottom()],
        Stroke::new(1.0, palette.grid_line),
    );

    let Some(placement) = grid.get(key.day_index, key.hour) else {
        return;
    };
    let chip = rect.shrink2(Vec2::new(3.0, 3.0));
    painter.rect_filled(chip, 4.0, palette.card_fill(placement.event.category));
    painter.rect_filled(
        Rect::from_min_size(chip.min, Vec2::new(3.0, chip.height())),
        0.0,
        category_color(placement.event.category),
    );
    painter.with_clip_rect(chip).text(
        Pos2::new(chip.left() + 8.0, chip.center().y),
        Align2::LEFT_CENTER,
        placement.event.display_title(),
        FontId::proportional(12.0),
        palette.text,
    );
}

fn handle_cell_input(
    ctx: &egui::Context,
    response: &egui::Response,
    key: SlotKey,
    grid: &mut SlotGrid,
    drag_active: bool,
    actions: &mut Vec<BoardAction>,
) {
    let Some(placement) = grid.get(key.day_index, key.hour) else {
        return;
    };

    if response.drag_started() {
        DragManager::begin(ctx, &DragPayload::placement(placement.event.clone(), key));
        return;
    }

    if response.secondary_clicked() {
        if grid.remove(key.day_index, key.hour).is_some() {
            actions.push(BoardAction::Removed(key));
        }
        return;
    }

    if response.hovered() && !drag_active {
        let tooltip = format!(
            "{}\n{}\n{}\nRight-click to remove",
            placement.event.display_title(),
            placement.event.category.label(),
            placement.event.desirability_label()
        );
        response.clone().on_hover_text(tooltip);
    }
}
