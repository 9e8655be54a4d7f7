//! Backend-independent thumbnail compositing: a background plus text layers
//! drawn onto any [`Surface`].

pub mod layer;
pub mod render;
pub mod surface;

use serde::{Deserialize, Serialize};

use crate::models::{AspectRatio, ImageReference};

pub use layer::{TextLayer, FONT_FAMILIES};
pub use render::{render, REFERENCE_WIDTH};
pub use surface::{DisplayList, DrawCommand, Font, Shadow, Surface};

/// CSS-style colour filter percentages; 100 leaves the image untouched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColorFilter {
    pub brightness: f32,
    pub contrast: f32,
    pub saturation: f32,
}

impl Default for ColorFilter {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            contrast: 100.0,
            saturation: 100.0,
        }
    }
}

impl ColorFilter {
    pub fn is_identity(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub background: ImageReference,
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub filter: ColorFilter,
    #[serde(default)]
    pub layers: Vec<TextLayer>,
}

impl Composition {
    pub fn new(background: ImageReference, aspect_ratio: AspectRatio) -> Self {
        Self {
            background,
            aspect_ratio,
            filter: ColorFilter::default(),
            layers: Vec::new(),
        }
    }

    /// Adds a default-styled layer and returns its id.
    pub fn add_text(&mut self, content: impl Into<String>, x: f32, y: f32) -> String {
        let layer = TextLayer::new(content, x, y);
        let id = layer.id.clone();
        self.layers.push(layer);
        id
    }

    pub fn layer_mut(&mut self, id: &str) -> Option<&mut TextLayer> {
        self.layers.iter_mut().find(|layer| layer.id == id)
    }

    /// Drags a layer by a percentage delta. Returns false for an unknown id.
    pub fn move_layer(&mut self, id: &str, dx: f32, dy: f32) -> bool {
        match self.layer_mut(id) {
            Some(layer) => {
                layer.move_by(dx, dy);
                true
            }
            None => false,
        }
    }

    pub fn remove_layer(&mut self, id: &str) -> Option<TextLayer> {
        let index = self.layers.iter().position(|layer| layer.id == id)?;
        Some(self.layers.remove(index))
    }

    /// The editor's quick success estimate, in percent.
    pub fn score(&self) -> u32 {
        let mut score = 70;
        if !self.layers.is_empty() {
            score += 10;
        }
        if self.filter.saturation > 120.0 {
            score += 5;
        }
        score.min(99)
    }
}
