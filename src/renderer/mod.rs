//! 2D rendering
//!
//! Engines draw through the [`Surface`] trait and only ever issue primitive
//! calls: filled rects, filled or stroked circles, and text. The browser
//! backs it with a canvas context; tests record into a [`DrawList`].

pub mod scenes;

use glam::Vec2;

use crate::sim::Rect;

/// CSS color string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub &'static str);

/// Shared palette
pub mod palette {
    use super::Color;

    pub const BACKDROP: Color = Color("#020617");
    pub const BACKDROP_DODGE: Color = Color("#0f172a");
    pub const HUD_TEXT: Color = Color("#cbd5e1");
    pub const HUD_MUTED: Color = Color("#94a3b8");
    pub const HEADLINE: Color = Color("#f8fafc");
    pub const ACCENT: Color = Color("#22d3ee");
    pub const ACCENT_LIGHT: Color = Color("#67e8f9");
    pub const HAZARD: Color = Color("#f97316");
    pub const HAZARD_RIM: Color = Color("#fed7aa");
    pub const DOT: Color = Color("#e2e8f0");
    pub const GROUND: Color = Color("#1e293b");
    pub const GRID: Color = Color("rgba(148,163,184,0.18)");
    pub const GRID_DODGE: Color = Color("rgba(125,211,252,0.35)");
    pub const SIGNAL: Color = Color("#22c55e");
    pub const SIGNAL_TEXT: Color = Color("#052e16");
    pub const WAIT_TEXT: Color = Color("#f1f5f9");
    pub const OVERLAY: Color = Color("rgba(15,23,42,0.82)");
}

/// Font spec; system UI stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Font {
    pub size_px: u8,
    pub bold: bool,
}

impl Font {
    pub const HUD: Font = Font::regular(14);
    pub const HINT: Font = Font::regular(13);
    pub const HEADLINE: Font = Font::bold(24);

    pub const fn regular(size_px: u8) -> Self {
        Self {
            size_px,
            bold: false,
        }
    }

    pub const fn bold(size_px: u8) -> Self {
        Self {
            size_px,
            bold: true,
        }
    }

    /// CSS `font` shorthand
    pub fn css(&self) -> String {
        if self.bold {
            format!("bold {}px system-ui, sans-serif", self.size_px)
        } else {
            format!("{}px system-ui, sans-serif", self.size_px)
        }
    }
}

/// A 2D drawing surface sized in device-independent pixels
pub trait Surface {
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color);
    /// Text anchored at its left baseline
    fn fill_text(&mut self, text: &str, pos: Vec2, font: Font, color: Color);
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        line_width: f32,
        color: Color,
    },
    FillText {
        text: String,
        pos: Vec2,
        font: Font,
        color: Color,
    },
}

/// Surface that records every call; used by tests and the headless runner
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All text drawn, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Whether any drawn text contains `needle`
    pub fn has_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }
}

impl Surface for DrawList {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, line_width: f32, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            line_width,
            color,
        });
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, font: Font, color: Color) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            pos,
            font,
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_css() {
        assert_eq!(Font::HUD.css(), "14px system-ui, sans-serif");
        assert_eq!(Font::HEADLINE.css(), "bold 24px system-ui, sans-serif");
    }

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), palette::BACKDROP);
        list.fill_text("SCORE 3", Vec2::new(12.0, 20.0), Font::HUD, palette::HUD_TEXT);
        list.fill_circle(Vec2::new(5.0, 5.0), 2.0, palette::DOT);

        assert_eq!(list.len(), 3);
        assert_eq!(list.texts(), vec!["SCORE 3"]);
        assert!(list.has_text("SCORE"));
        assert!(matches!(list.commands[0], DrawCommand::FillRect { .. }));

        list.clear();
        assert!(list.is_empty());
    }
}
