use serde::{Deserialize, Serialize};

/// Axis-aligned box in source-frame pixel coordinates.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize, PartialOrd)]
pub struct DetectionBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub w: f32,
    pub h: f32,
}

impl DetectionBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            w: x2 - x1,
            h: y2 - y1,
        }
    }

    /// Returns the width of the bounding box.
    pub fn width(&self) -> f32 {
        self.w
    }

    /// Returns the height of the bounding box.
    pub fn height(&self) -> f32 {
        self.h
    }

    pub fn x_min(&self) -> f32 {
        self.x1
    }

    pub fn y_min(&self) -> f32 {
        self.y1
    }

    pub fn x_max(&self) -> f32 {
        self.x1 + self.w
    }

    pub fn y_max(&self) -> f32 {
        self.y1 + self.h
    }

    /// Returns the bounding box coordinates and size as `(x, y, w, h)`.
    pub fn xy1_wh(&self) -> (f32, f32, f32, f32) {
        (self.x1, self.y1, self.w, self.h)
    }

    pub fn area(&self) -> f32 {
        self.h * self.w
    }

    /// Computes the intersection area between this bounding box and another.
    pub fn intersect(&self, other: &DetectionBox) -> f32 {
        let left = self.x1.max(other.x1);
        let right = self.x_max().min(other.x_max());
        let top = self.y1.max(other.y1);
        let bottom = self.y_max().min(other.y_max());
        (right - left).max(0.) * (bottom - top).max(0.)
    }

    /// Computes the union area between this bounding box and another.
    pub fn union(&self, other: &DetectionBox) -> f32 {
        self.area() + other.area() - self.intersect(other)
    }

    /// Intersection over union. Zero when both boxes are degenerate.
    pub fn iou(&self, other: &DetectionBox) -> f32 {
        let union = self.union(other);
        if union <= 0. {
            return 0.;
        }
        self.intersect(other) / union
    }

    /// Restricts the box to `[0, width) x [0, height)`.
    ///
    /// A box lying entirely outside collapses onto the nearest edge and keeps
    /// a size of at least one pixel, so it can still be drawn.
    pub fn clamped(self, width: u32, height: u32) -> Self {
        let (max_x, max_y) = (width.max(1) as f32, height.max(1) as f32);

        let x1 = self.x1.clamp(0., max_x - 1.);
        let y1 = self.y1.clamp(0., max_y - 1.);
        let x2 = self.x_max().clamp(0., max_x);
        let y2 = self.y_max().clamp(0., max_y);

        let w = (x2 - x1).max(1.).min(max_x - x1);
        let h = (y2 - y1).max(1.).min(max_y - y1);
        Self::default().with_x1y1_wh(x1, y1, w, h)
    }

    pub fn as_xy_wh_i32(&self) -> (i32, i32, i32, i32) {
        (self.x1.round() as i32,
         self.y1.round() as i32,
         self.w.round() as i32,
         self.h.round() as i32)
    }

    /// Sets the bounding box's coordinates and dimensions using `(x, y, w, h)`.
    ///
    /// # Arguments
    ///
    /// * `x` - The x-coordinate of the top-left corner.
    /// * `y` - The y-coordinate of the top-left corner.
    /// * `w` - The width of the bounding box.
    /// * `h` - The height of the bounding box.
    pub fn with_x1y1_wh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.x1 = x;
        self.y1 = y;
        self.w = w;
        self.h = h;

        self.x2 = x + w;
        self.y2 = y + h;
        self
    }

    /// Sets the bounding box's coordinates and dimensions using `(cx, cy, w, h)`.
    ///
    /// # Arguments
    ///
    /// * `cx` - The x-coordinate of the horizontal center.
    /// * `cy` - The y-coordinate of the vertical center.
    /// * `w` - The width of the bounding box.
    /// * `h` - The height of the bounding box.
    pub fn with_cxcy_wh(mut self, cx: f32, cy: f32, w: f32, h: f32) -> Self {
        self.x1 = cx - (w / 2.0);
        self.y1 = cy - (h / 2.0);
        self.w = w;
        self.h = h;

        self.x2 = cx + (w / 2.0);
        self.y2 = cy + (h / 2.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamping_keeps_inner_boxes_untouched() {
        let bbox = DetectionBox::default().with_x1y1_wh(10., 10., 20., 20.);
        assert_eq!(bbox.clamped(100, 100), bbox);
    }

    #[test]
    fn clamping_cuts_boxes_at_the_frame_edge() {
        let bbox = DetectionBox::default().with_cxcy_wh(95., 0., 20., 20.);
        let clamped = bbox.clamped(100, 100);
        assert_eq!(clamped.xy1_wh(), (85., 0., 15., 10.));
        assert!(clamped.x_max() <= 100.);
    }

    #[test]
    fn clamping_collapses_outside_boxes_onto_the_edge() {
        let bbox = DetectionBox::default().with_x1y1_wh(150., -40., 10., 10.);
        let clamped = bbox.clamped(100, 100);
        assert_eq!(clamped.xy1_wh(), (99., 0., 1., 1.));
    }

    #[test]
    fn iou_of_identical_boxes_is_one() {
        let bbox = DetectionBox::new(0., 0., 10., 10.);
        assert!((bbox.iou(&bbox) - 1.).abs() < f32::EPSILON);
        assert_eq!(bbox.iou(&DetectionBox::new(20., 20., 30., 30.)), 0.);
    }
}
