use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const FONT_FAMILIES: [&str; 5] = [
    "'Spline Sans', sans-serif",
    "Impact, sans-serif",
    "Georgia, serif",
    "'Courier New', monospace",
    "system-ui, sans-serif",
];

/// A text overlay. Position is a percentage of the canvas, font size and
/// stroke width are relative to a 1280px-wide canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    pub id: String,
    pub content: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    pub color: String,
    pub font_family: String,
    pub rotation: f32,
    pub shadow: bool,
    pub opacity: f32,
    pub is_bold: bool,
    pub is_italic: bool,
    pub stroke_color: String,
    pub stroke_width: f32,
}

impl TextLayer {
    pub fn new(content: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            id: format!("text-{}", Uuid::new_v4()),
            content: content.into(),
            x: clamp_percent(x),
            y: clamp_percent(y),
            font_size: 80.0,
            color: "#ffffff".to_string(),
            font_family: FONT_FAMILIES[1].to_string(),
            rotation: 0.0,
            shadow: true,
            opacity: 100.0,
            is_bold: true,
            is_italic: false,
            stroke_color: "#000000".to_string(),
            stroke_width: 4.0,
        }
    }

    /// Drags the layer by a delta in percent; the result stays on the canvas.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        self.x = clamp_percent(self.x + dx);
        self.y = clamp_percent(self.y + dy);
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.x = clamp_percent(x);
        self.y = clamp_percent(y);
    }
}

impl Default for TextLayer {
    fn default() -> Self {
        Self::new("TEXTO", 50.0, 50.0)
    }
}

fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
