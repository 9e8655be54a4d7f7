use serde::{Deserialize, Serialize};

use crate::models::{Dimensions, ImageReference};

use super::ColorFilter;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub family: String,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
}

impl Font {
    /// CSS shorthand, e.g. `italic 900 102.5px Impact, sans-serif`.
    pub fn to_css(&self) -> String {
        let mut parts = Vec::with_capacity(4);
        if self.italic {
            parts.push("italic".to_string());
        }
        parts.push(if self.bold { "900" } else { "normal" }.to_string());
        parts.push(format!("{}px", self.size));
        parts.push(self.family.clone());
        parts.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: String,
    pub blur: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

/// Minimal 2D drawing target. Text is drawn centred on the current origin.
pub trait Surface {
    fn size(&self) -> Dimensions;
    fn resize(&mut self, size: Dimensions);
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    fn rotate(&mut self, radians: f32);
    fn set_alpha(&mut self, alpha: f32);
    fn set_filter(&mut self, filter: Option<ColorFilter>);
    fn draw_image(&mut self, image: &ImageReference, x: f32, y: f32, width: f32, height: f32);
    fn set_font(&mut self, font: &Font);
    fn set_shadow(&mut self, shadow: Option<Shadow>);
    fn fill_text(&mut self, text: &str, color: &str);
    fn stroke_text(&mut self, text: &str, color: &str, line_width: f32);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Resize { width: u32, height: u32 },
    Save,
    Restore,
    Translate { x: f32, y: f32 },
    Rotate { radians: f32 },
    Alpha { value: f32 },
    Filter { filter: Option<ColorFilter> },
    Image { image: ImageReference, x: f32, y: f32, width: f32, height: f32 },
    Font { font: Font },
    Shadow { shadow: Option<Shadow> },
    FillText { text: String, color: String },
    StrokeText { text: String, color: String, line_width: f32 },
}

/// Records draw calls so a browser canvas (or any other backend) can replay them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayList {
    size: Option<Dimensions>,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }
}

impl Surface for DisplayList {
    fn size(&self) -> Dimensions {
        self.size.unwrap_or(Dimensions::new(0, 0))
    }

    fn resize(&mut self, size: Dimensions) {
        self.size = Some(size);
        self.commands.push(DrawCommand::Resize {
            width: size.width,
            height: size.height,
        });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.commands.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate { radians });
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCommand::Alpha { value: alpha });
    }

    fn set_filter(&mut self, filter: Option<ColorFilter>) {
        self.commands.push(DrawCommand::Filter { filter });
    }

    fn draw_image(&mut self, image: &ImageReference, x: f32, y: f32, width: f32, height: f32) {
        self.commands.push(DrawCommand::Image {
            image: image.clone(),
            x,
            y,
            width,
            height,
        });
    }

    fn set_font(&mut self, font: &Font) {
        self.commands.push(DrawCommand::Font { font: font.clone() });
    }

    fn set_shadow(&mut self, shadow: Option<Shadow>) {
        self.commands.push(DrawCommand::Shadow { shadow });
    }

    fn fill_text(&mut self, text: &str, color: &str) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            color: color.to_string(),
        });
    }

    fn stroke_text(&mut self, text: &str, color: &str, line_width: f32) {
        self.commands.push(DrawCommand::StrokeText {
            text: text.to_string(),
            color: color.to_string(),
            line_width,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_css() {
        let font = Font {
            family: "Impact, sans-serif".to_string(),
            size: 120.0,
            bold: true,
            italic: true,
        };
        assert_eq!(font.to_css(), "italic 900 120px Impact, sans-serif");
    }

    #[test]
    fn test_commands_serialize_with_op_tag() {
        let mut list = DisplayList::new();
        list.resize(Dimensions::new(10, 20));
        list.fill_text("OI", "#fff");
        let json = serde_json::to_value(list.commands()).unwrap();
        assert_eq!(json[0]["op"], "resize");
        assert_eq!(json[1]["op"], "fill_text");
        assert_eq!(json[1]["text"], "OI");
    }
}
