use egui::{Color32, Visuals};

use crate::models::category::Category;
use crate::services::drag::DropEffect;

pub(crate) fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

fn blend(a: Color32, b: Color32, t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |c1: u8, c2: u8| ((c1 as f32 * (1.0 - t)) + (c2 as f32 * t)).round() as u8;
    Color32::from_rgb(lerp(a.r(), b.r()), lerp(a.g(), b.g()), lerp(a.b(), b.b()))
}

/// Parse `#rrggbb`.
pub(crate) fn parse_hex(hex: &str) -> Option<Color32> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub(crate) fn category_color(category: Category) -> Color32 {
    parse_hex(category.color()).unwrap_or(Color32::GRAY)
}

#[derive(Clone, Copy)]
pub(crate) struct BoardPalette {
    pub cell_bg: Color32,
    pub header_bg: Color32,
    pub grid_line: Color32,
    pub text: Color32,
    pub muted_text: Color32,
    pub copy_highlight: Color32,
    pub move_highlight: Color32,
}

impl BoardPalette {
    pub fn from_visuals(visuals: &Visuals) -> Self {
        let base = visuals.panel_fill;
        let accent = visuals.selection.bg_fill;
        let text = visuals.text_color();
        Self {
            cell_bg: visuals.extreme_bg_color,
            header_bg: blend(base, accent, 0.15),
            grid_line: visuals.widgets.noninteractive.bg_stroke.color,
            text,
            muted_text: with_alpha(text, 150),
            copy_highlight: Color32::from_rgb(110, 195, 120),
            move_highlight: Color32::from_rgb(100, 150, 230),
        }
    }

    pub fn drop_highlight(&self, effect: DropEffect) -> Color32 {
        match effect {
            DropEffect::Copy => self.copy_highlight,
            DropEffect::Move => self.move_highlight,
        }
    }

    /// Chip fill for a placed or catalog card.
    pub fn card_fill(&self, category: Category) -> Color32 {
        with_alpha(category_color(category), 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(parse_hex("#ff8000"), Some(Color32::from_rgb(255, 128, 0)));
        assert_eq!(parse_hex("ff8000"), None);
        assert_eq!(parse_hex("#ff80"), None);
        assert_eq!(parse_hex("#gg0000"), None);
    }

    #[test]
    fn test_every_category_has_a_color() {
        for category in Category::ALL {
            assert!(parse_hex(category.color()).is_some(), "{}", category);
        }
    }

    #[test]
    fn test_drop_highlight_differs_by_effect() {
        let palette = BoardPalette::from_visuals(&Visuals::dark());
        assert_ne!(
            palette.drop_highlight(DropEffect::Copy),
            palette.drop_highlight(DropEffect::Move)
        );
    }
}
