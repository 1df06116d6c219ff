//! Abstract 2D drawing surface used by every animator.
//!
//! The animators only need four capabilities from the host: dimensions, clear,
//! stroke a line, and fill a path under a translate + rotate transform.
//! [`CanvasSurface`] provides them over a `<canvas>` 2D context and
//! [`RecordingSurface`] records them for headless tests.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::error::RevealError;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Endpoint of a segment of `length` leaving `self` at `angle` radians.
    pub fn along(self, angle: f64, length: f64) -> Self {
        Self {
            x: self.x + length * angle.cos(),
            y: self.y + length * angle.sin(),
        }
    }
}

/// Colour with 0..=255 channels and 0..=1 alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parses `#rrggbb`; anything else yields opaque white.
    pub fn from_hex(hex: &str) -> Self {
        let h = hex.trim_start_matches('#');
        let channel = |i: usize| {
            h.get(i..i + 2)
                .and_then(|c| u8::from_str_radix(c, 16).ok())
                .map(|v| v as f64)
        };
        match (h.len(), channel(0), channel(2), channel(4)) {
            (6, Some(r), Some(g), Some(b)) => Self::rgb(r, g, b),
            _ => Self::rgb(255.0, 255.0, 255.0),
        }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }

    pub fn css(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            self.r.round().clamp(0.0, 255.0) as u8,
            self.g.round().clamp(0.0, 255.0) as u8,
            self.b.round().clamp(0.0, 255.0) as u8,
            self.a.clamp(0.0, 1.0)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathSeg {
    MoveTo(Point),
    LineTo(Point),
    CubicTo(Point, Point, Point),
    Close,
}

/// Path in local coordinates; the surface places it with a [`Placement`].
pub type Path = Vec<PathSeg>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    pub origin: Point,
    /// Radians, clockwise in screen space.
    pub rotation: f64,
}

impl Placement {
    pub const fn at(origin: Point) -> Self {
        Self {
            origin,
            rotation: 0.0,
        }
    }

    pub const fn rotated(origin: Point, rotation: f64) -> Self {
        Self { origin, rotation }
    }
}

pub trait Surface {
    fn size(&self) -> (f64, f64);
    fn clear(&mut self);
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba);
    fn fill_path(&mut self, placement: Placement, path: &[PathSeg], color: Rgba);
}

/// Heart silhouette of height `size` hanging below its centre point: two
/// mirrored cubic curves from the notch to the tip and back.
pub fn heart_path(size: f64) -> Path {
    let s = size;
    vec![
        PathSeg::MoveTo(Point::new(0.0, 0.0)),
        PathSeg::CubicTo(
            Point::new(-s / 2.0, -s / 2.0),
            Point::new(-s, s / 3.0),
            Point::new(0.0, s),
        ),
        PathSeg::CubicTo(
            Point::new(s, s / 3.0),
            Point::new(s / 2.0, -s / 2.0),
            Point::new(0.0, 0.0),
        ),
        PathSeg::Close,
    ]
}

/// Axis-aligned rectangle centred on the origin.
pub fn rect_path(w: f64, h: f64) -> Path {
    let (hw, hh) = (w / 2.0, h / 2.0);
    vec![
        PathSeg::MoveTo(Point::new(-hw, -hh)),
        PathSeg::LineTo(Point::new(hw, -hh)),
        PathSeg::LineTo(Point::new(hw, hh)),
        PathSeg::LineTo(Point::new(-hw, hh)),
        PathSeg::Close,
    ]
}

// --- Canvas backend -----------------------------------------------------------

pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, RevealError> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or(RevealError::NoContext2d)?
            .dyn_into()
            .map_err(|_| RevealError::NoContext2d)?;
        ctx.set_line_cap("round");
        Ok(Self { canvas, ctx })
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        // Resizing resets context state.
        self.ctx.set_line_cap("round");
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    fn clear(&mut self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        self.ctx.begin_path();
        self.ctx.move_to(from.x, from.y);
        self.ctx.line_to(to.x, to.y);
        self.ctx.set_stroke_style_str(&color.css());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }

    fn fill_path(&mut self, placement: Placement, path: &[PathSeg], color: Rgba) {
        let ctx = &self.ctx;
        ctx.save();
        // translate/rotate only fail on non-finite input; skip the shape then.
        if ctx.translate(placement.origin.x, placement.origin.y).is_ok()
            && ctx.rotate(placement.rotation).is_ok()
        {
            ctx.set_fill_style_str(&color.css());
            ctx.begin_path();
            for seg in path {
                match *seg {
                    PathSeg::MoveTo(p) => ctx.move_to(p.x, p.y),
                    PathSeg::LineTo(p) => ctx.line_to(p.x, p.y),
                    PathSeg::CubicTo(c1, c2, p) => {
                        ctx.bezier_curve_to(c1.x, c1.y, c2.x, c2.y, p.x, p.y)
                    }
                    PathSeg::Close => ctx.close_path(),
                }
            }
            ctx.fill();
        }
        ctx.restore();
    }
}

// --- Recording backend ---------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub enum DrawOp {
    Clear,
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Rgba,
    },
    Fill {
        placement: Placement,
        segments: usize,
        color: Rgba,
    },
}

/// Headless surface that records every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    width: f64,
    height: f64,
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    pub fn lines(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Line { .. }))
            .count()
    }

    pub fn fills(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Fill { .. }))
            .count()
    }

    pub fn clears(&self) -> usize {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Clear)).count()
    }

    pub fn take(&mut self) -> Vec<DrawOp> {
        std::mem::take(&mut self.ops)
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.ops.push(DrawOp::Clear);
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_path(&mut self, placement: Placement, path: &[PathSeg], color: Rgba) {
        self.ops.push(DrawOp::Fill {
            placement,
            segments: path.len(),
            color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_along_up() {
        let p = Point::new(10.0, 100.0).along(-std::f64::consts::FRAC_PI_2, 90.0);
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_heart_path_is_closed_and_symmetric() {
        let path = heart_path(8.0);
        assert_eq!(path.first(), Some(&PathSeg::MoveTo(Point::new(0.0, 0.0))));
        assert_eq!(path.last(), Some(&PathSeg::Close));
        let (PathSeg::CubicTo(l1, l2, tip), PathSeg::CubicTo(r1, r2, back)) = (path[1], path[2])
        else {
            panic!("heart must be two cubic curves");
        };
        assert_eq!(tip, Point::new(0.0, 8.0));
        assert_eq!(back, Point::new(0.0, 0.0));
        // Right lobe mirrors the left one (traversed in reverse).
        assert_eq!(r1.x, -l2.x);
        assert_eq!(r2.x, -l1.x);
    }

    #[test]
    fn test_rgba_css_and_hex() {
        assert_eq!(Rgba::rgba(255.0, 100.4, 0.0, 0.5).css(), "rgba(255,100,0,0.5)");
        assert_eq!(Rgba::from_hex("#ff69b4"), Rgba::rgb(255.0, 105.0, 180.0));
        assert_eq!(Rgba::from_hex("nope"), Rgba::rgb(255.0, 255.0, 255.0));
    }

    #[test]
    fn test_recording_surface_counts() {
        let mut s = RecordingSurface::new(100.0, 50.0);
        s.clear();
        s.stroke_line(Point::default(), Point::new(1.0, 1.0), 2.0, Rgba::rgb(0.0, 0.0, 0.0));
        s.fill_path(Placement::at(Point::default()), &rect_path(2.0, 2.0), Rgba::rgb(1.0, 1.0, 1.0));
        assert_eq!((s.clears(), s.lines(), s.fills()), (1, 1, 1));
        assert_eq!(s.size(), (100.0, 50.0));
        assert_eq!(s.take().len(), 3);
        assert!(s.ops.is_empty());
    }
}
