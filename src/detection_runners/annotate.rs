use ab_glyph::{FontRef, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect;
use crate::common::{Detection, Frame};

static FONT: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

const TEXT_COLOUR: Rgb<u8> = Rgb([255, 255, 255]);

pub fn class_colour(class: usize) -> Rgb<u8> {
    match class {
        0 => Rgb([128, 0, 128]),     // purple (people)
        1..=8 => Rgb([0, 255, 0]),   // green (vehicles)
        14..=23 => Rgb([255, 0, 0]), // red (animals)
        _ => Rgb([0, 0, 255])        // blue (everything else)
    }
}

/// Draws detection boxes and captions over a frame.
#[derive(Debug, Clone)]
pub struct Annotator {
    font: FontRef<'static>,
    scale: PxScale,
}

impl Annotator {
    pub fn new() -> anyhow::Result<Self> {
        let font = FontRef::try_from_slice(FONT)
            .map_err(|err| anyhow::anyhow!("Failed to load the label font: {err}"))?;
        Ok(Self {
            font,
            scale: PxScale::from(16.),
        })
    }

    /// Returns a copy of `frame` with every detection drawn on it. Boxes are
    /// expected to be clamped to the frame already.
    pub fn draw(&self, frame: &Frame, detections: &[Detection]) -> Frame {
        if detections.is_empty() {
            return frame.clone();
        }

        let mut canvas: RgbImage = frame.to_rgb8();
        for det in detections {
            let (x, y, w, h) = det.bbox.as_xy_wh_i32();
            let colour = class_colour(det.class_id);
            let rect = Rect::at(x, y).of_size(w.max(1) as u32, h.max(1) as u32);
            draw_hollow_rect_mut(&mut canvas, rect, colour);

            let caption = det.caption();
            let (text_w, text_h) = text_size(self.scale, &self.font, &caption);
            let label_h = text_h as i32 + 2;
            // above the box when there is room, otherwise just inside it
            let label_y = if y >= label_h { y - label_h } else { y };
            draw_filled_rect_mut(
                &mut canvas,
                Rect::at(x, label_y).of_size(text_w + 4, label_h as u32),
                colour,
            );
            draw_text_mut(&mut canvas, TEXT_COLOUR, x + 2, label_y + 1, self.scale, &self.font, &caption);
        }
        Frame::from(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_groups_share_colours() {
        assert_eq!(class_colour(0), Rgb([128, 0, 128]));
        assert_eq!(class_colour(2), class_colour(7));
        assert_eq!(class_colour(16), Rgb([255, 0, 0]));
        assert_eq!(class_colour(79), Rgb([0, 0, 255]));
    }

    #[test]
    fn drawing_keeps_dimensions() {
        let frame = Frame::from(RgbImage::new(64, 48));
        let det = Detection::default()
            .with_x1y1_wh(0., 0., 64., 48.)
            .with_label("person")
            .with_confidence(0.9);

        let annotated = Annotator::new().unwrap().draw(&frame, &[det]);
        assert_eq!(annotated.dimensions(), (64, 48));
        assert_ne!(annotated, frame);
    }
}
