//! Drawing surface capability and the headless implementation used by the binary

use tracing::{debug, trace};

use super::assets::ImageResource;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Outlined label text: stroke drawn first, then fill on top
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: &'static str,
    pub fill: [u8; 4],
    pub stroke: [u8; 4],
    pub stroke_width: f64,
}

/// 2D drawing primitives provided by the host
pub trait DrawSurface {
    fn clear_rect(&mut self, rect: Rect);
    fn draw_image(&mut self, image: &ImageResource, src: Rect, dest: Rect);
    /// Text centered horizontally on `x`, baseline at `y`
    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle);
    fn save(&mut self);
    fn restore(&mut self);
    fn scale(&mut self, sx: f64, sy: f64);
    /// Called once after each full redraw
    fn present(&mut self) {}
}

/// Surface with no pixels behind it; counts and traces every call
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    frames: u64,
    images: usize,
    labels: usize,
    depth: usize,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl DrawSurface for HeadlessSurface {
    fn clear_rect(&mut self, rect: Rect) {
        trace!(?rect, "clear");
    }

    fn draw_image(&mut self, image: &ImageResource, src: Rect, dest: Rect) {
        self.images += 1;
        trace!(url = %image.url, ?src, ?dest, "image");
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, style: &TextStyle) {
        self.labels += 1;
        trace!(
            text,
            x,
            y,
            font = style.font,
            fill = ?style.fill,
            stroke = ?style.stroke,
            stroke_width = style.stroke_width,
            "text"
        );
    }

    fn save(&mut self) {
        self.depth += 1;
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        trace!(sx, sy, depth = self.depth, "scale");
    }

    fn present(&mut self) {
        self.frames += 1;
        debug!(
            frame = self.frames,
            images = self.images,
            labels = self.labels,
            "Frame presented"
        );
        self.images = 0;
        self.labels = 0;
    }
}
