//! Transient notifications for save and lock-in outcomes.

use egui::{Color32, Context, Pos2, RichText};
use std::time::{Duration, Instant};

const FADE: Duration = Duration::from_millis(400);
const WIDTH: f32 = 280.0;
const HEIGHT: f32 = 38.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn icon(self) -> &'static str {
        match self {
            ToastKind::Success => "✓",
            ToastKind::Warning => "⚠",
            ToastKind::Error => "✗",
        }
    }

    fn colors(self, dark: bool) -> (Color32, Color32) {
        match (self, dark) {
            (ToastKind::Success, true) => (Color32::from_rgb(28, 66, 40), Color32::from_rgb(110, 215, 130)),
            (ToastKind::Success, false) => (Color32::from_rgb(222, 250, 226), Color32::from_rgb(30, 115, 50)),
            (ToastKind::Warning, true) => (Color32::from_rgb(78, 60, 22), Color32::from_rgb(250, 200, 90)),
            (ToastKind::Warning, false) => (Color32::from_rgb(255, 244, 205), Color32::from_rgb(145, 95, 0)),
            (ToastKind::Error, true) => (Color32::from_rgb(80, 30, 30), Color32::from_rgb(255, 125, 125)),
            (ToastKind::Error, false) => (Color32::from_rgb(255, 224, 224), Color32::from_rgb(175, 40, 40)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    shown_at: Instant,
    lifetime: Duration,
}

impl Toast {
    pub fn new(kind: ToastKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            shown_at: Instant::now(),
            lifetime: Duration::from_secs(3),
        }
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn is_expired(&self) -> bool {
        self.shown_at.elapsed() >= self.lifetime
    }

    /// 1.0 until the last [`FADE`] of the lifetime, then linear to 0.
    fn opacity(&self) -> f32 {
        let remaining = self.lifetime.saturating_sub(self.shown_at.elapsed());
        if remaining >= FADE {
            1.0
        } else {
            (remaining.as_secs_f32() / FADE.as_secs_f32()).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Default)]
pub struct ToastManager {
    toasts: Vec<Toast>,
}

impl ToastManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, toast: Toast) {
        self.toasts.push(toast);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Toast::new(ToastKind::Success, message));
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.push(Toast::new(ToastKind::Warning, message));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Toast::new(ToastKind::Error, message).with_lifetime(Duration::from_secs(5)));
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn cleanup(&mut self) {
        self.toasts.retain(|toast| !toast.is_expired());
    }

    /// Draw the stack in the bottom-right corner, newest at the bottom.
    pub fn render(&mut self, ctx: &Context) {
        self.cleanup();
        if self.toasts.is_empty() {
            return;
        }
        ctx.request_repaint();

        let dark = ctx.style().visuals.dark_mode;
        let screen = ctx.screen_rect();
        let count = self.toasts.len();

        for (index, toast) in self.toasts.iter().enumerate() {
            let alpha = toast.opacity();
            let (fill, text) = toast.kind.colors(dark);
            let slot = (count - 1 - index) as f32;
            let pos = Pos2::new(
                screen.right() - WIDTH - 12.0,
                screen.bottom() - (HEIGHT + 6.0) * (slot + 1.0) - 8.0,
            );

            egui::Area::new(egui::Id::new(("board_toast", index)))
                .fixed_pos(pos)
                .order(egui::Order::Foreground)
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::none()
                        .fill(fill.gamma_multiply(alpha))
                        .rounding(6.0)
                        .inner_margin(egui::Margin::symmetric(10.0, 7.0))
                        .show(ui, |ui| {
                            ui.set_min_width(WIDTH - 20.0);
                            ui.horizontal(|ui| {
                                let text = text.gamma_multiply(alpha);
                                ui.label(RichText::new(toast.kind.icon()).color(text).strong());
                                ui.label(RichText::new(&toast.message).color(text));
                            });
                        });
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expired_toasts_are_cleaned_up() {
        let mut toasts = ToastManager::new();
        toasts.push(Toast::new(ToastKind::Success, "Saved").with_lifetime(Duration::ZERO));
        toasts.warning("Unsaved changes discarded");
        assert_eq!(toasts.len(), 2);

        toasts.cleanup();
        assert_eq!(toasts.len(), 1);
        assert_eq!(toasts.toasts[0].kind, ToastKind::Warning);
    }

    #[test]
    fn test_opacity_fades_at_end_of_lifetime() {
        let fresh = Toast::new(ToastKind::Error, "Save failed");
        assert_eq!(fresh.opacity(), 1.0);

        let gone = Toast::new(ToastKind::Error, "Save failed").with_lifetime(Duration::ZERO);
        assert_eq!(gone.opacity(), 0.0);
    }
}
