use eframe::egui;
use crate::common::Frame;

const TEXTURE_NAME: &str = "autointell-frame";

/// On-screen size of a `width` x `height` image scaled to `display_width`,
/// keeping the aspect ratio.
pub fn display_size(width: u32, height: u32, display_width: u32) -> (f32, f32) {
    if width == 0 || height == 0 {
        return (0., 0.);
    }
    let scale = display_width as f32 / width as f32;
    (display_width as f32, height as f32 * scale)
}

/// Owns the one texture the frames are painted into.
pub struct DisplaySink {
    texture: Option<egui::TextureHandle>,
    size: (u32, u32),
    display_width: u32,
}

impl DisplaySink {
    pub fn new(display_width: u32) -> Self {
        Self {
            texture: None,
            size: (0, 0),
            display_width,
        }
    }

    /// Uploads `frame` and schedules a repaint. `None` leaves the display as is.
    pub fn present(&mut self, ctx: &egui::Context, frame: Option<&Frame>) {
        let Some(frame) = frame else {
            return;
        };
        let (width, height) = frame.dimensions();
        let image = egui::ColorImage::from_rgb([width as usize, height as usize], frame.as_raw());

        match &mut self.texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                self.texture = Some(ctx.load_texture(TEXTURE_NAME, image, egui::TextureOptions::LINEAR));
            }
        }
        self.size = (width, height);
        ctx.request_repaint();
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        match &self.texture {
            Some(texture) => {
                let (w, h) = display_size(self.size.0, self.size.1, self.display_width);
                ui.image((texture.id(), egui::vec2(w, h)));
            }
            None => {
                ui.label("Waiting for the camera...");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_aspect_ratio() {
        assert_eq!(display_size(640, 480, 800), (800., 600.));
        assert_eq!(display_size(1600, 900, 800), (800., 450.));
        assert_eq!(display_size(0, 480, 800), (0., 0.));
    }
}
