use super::{surface::Shadow, Composition, Font, Surface};

/// Layer sizes are authored against a canvas this wide.
pub const REFERENCE_WIDTH: f32 = 1280.0;

/// Draws `composition` at its export size: filtered background first, then
/// each text layer in order.
pub fn render<S: Surface>(composition: &Composition, surface: &mut S) {
    let size = composition.aspect_ratio.dimensions();
    surface.resize(size);

    let (w, h) = (size.width as f32, size.height as f32);
    let scale = w / REFERENCE_WIDTH;

    if composition.filter.is_identity() {
        surface.draw_image(&composition.background, 0.0, 0.0, w, h);
    } else {
        surface.set_filter(Some(composition.filter));
        surface.draw_image(&composition.background, 0.0, 0.0, w, h);
        surface.set_filter(None);
    }

    for layer in &composition.layers {
        surface.save();
        surface.translate(layer.x / 100.0 * w, layer.y / 100.0 * h);
        surface.rotate(layer.rotation.to_radians());
        surface.set_alpha(layer.opacity / 100.0);
        surface.set_font(&Font {
            family: layer.font_family.clone(),
            size: layer.font_size * scale,
            bold: layer.is_bold,
            italic: layer.is_italic,
        });

        if layer.shadow {
            surface.set_shadow(Some(Shadow {
                color: "rgba(0,0,0,0.8)".to_string(),
                blur: 20.0 * scale,
                offset_x: 8.0 * scale,
                offset_y: 8.0 * scale,
            }));
        }
        surface.fill_text(&layer.content, &layer.color);

        if layer.stroke_width > 0.0 {
            surface.set_shadow(None);
            surface.stroke_text(&layer.content, &layer.stroke_color, layer.stroke_width * scale);
        }
        surface.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::{ColorFilter, DisplayList, DrawCommand};
    use crate::models::{AspectRatio, ImageReference};

    #[test]
    fn test_render_landscape_layer() {
        let mut composition = Composition::new(
            ImageReference::url("https://img/bg.png"),
            AspectRatio::Landscape,
        );
        composition.filter = ColorFilter {
            brightness: 110.0,
            ..ColorFilter::default()
        };
        composition.add_text("CHOCANTE", 25.0, 50.0);

        let mut list = DisplayList::new();
        render(&composition, &mut list);
        let commands = list.commands();

        assert_eq!(commands[0], DrawCommand::Resize { width: 1920, height: 1080 });
        assert!(matches!(commands[1], DrawCommand::Filter { filter: Some(_) }));
        assert!(matches!(commands[2], DrawCommand::Image { width, height, .. } if width == 1920.0 && height == 1080.0));
        assert_eq!(commands[3], DrawCommand::Filter { filter: None });
        assert_eq!(commands[5], DrawCommand::Translate { x: 480.0, y: 540.0 });

        let font = commands.iter().find_map(|c| match c {
            DrawCommand::Font { font } => Some(font),
            _ => None,
        });
        assert_eq!(font.map(|f| f.size), Some(120.0));

        let stroke = commands.iter().find_map(|c| match c {
            DrawCommand::StrokeText { line_width, .. } => Some(*line_width),
            _ => None,
        });
        assert_eq!(stroke, Some(6.0));
        assert_eq!(commands.last(), Some(&DrawCommand::Restore));
    }

    #[test]
    fn test_render_without_filter_or_stroke() {
        let mut composition =
            Composition::new(ImageReference::url("https://img/bg.png"), AspectRatio::Square);
        let id = composition.add_text("OI", 50.0, 50.0);
        {
            let layer = composition.layer_mut(&id).unwrap();
            layer.stroke_width = 0.0;
            layer.shadow = false;
        }

        let mut list = DisplayList::new();
        render(&composition, &mut list);

        assert!(!list
            .commands()
            .iter()
            .any(|c| matches!(c, DrawCommand::Filter { .. } | DrawCommand::StrokeText { .. } | DrawCommand::Shadow { .. })));
    }
}
