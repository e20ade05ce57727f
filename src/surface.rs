//! The slice of the canvas 2D API the board draws with.

use web_sys::CanvasRenderingContext2d;

use crate::geometry::Point;

pub const DEBUG_FONT: &str = "16px Andale Mono, monospace";

pub trait Surface {
    fn clear(&mut self, width: f64, height: f64);
    fn set_stroke(&mut self, color: &str, width: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Point);
    fn line_to(&mut self, p: Point);
    fn bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point);
    fn close_path(&mut self);
    fn stroke(&mut self);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str);
    fn fill_text(&mut self, text: &str, at: Point, color: &str);
}

impl Surface for CanvasRenderingContext2d {
    fn clear(&mut self, width: f64, height: f64) {
        self.clear_rect(0.0, 0.0, width, height);
    }

    fn set_stroke(&mut self, color: &str, width: f64) {
        self.set_stroke_style_str(color);
        self.set_line_width(width);
        self.set_line_cap("round");
    }

    fn begin_path(&mut self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&mut self, p: Point) {
        CanvasRenderingContext2d::move_to(self, p.x, p.y);
    }

    fn line_to(&mut self, p: Point) {
        CanvasRenderingContext2d::line_to(self, p.x, p.y);
    }

    fn bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point) {
        CanvasRenderingContext2d::bezier_curve_to(self, c1.x, c1.y, c2.x, c2.y, end.x, end.y);
    }

    fn close_path(&mut self) {
        CanvasRenderingContext2d::close_path(self);
    }

    fn stroke(&mut self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        self.set_fill_style_str(color);
        CanvasRenderingContext2d::fill_rect(self, x, y, width, height);
    }

    fn fill_text(&mut self, text: &str, at: Point, color: &str) {
        self.set_fill_style_str(color);
        self.set_font(DEBUG_FONT);
        let _ = CanvasRenderingContext2d::fill_text(self, text, at.x, at.y);
    }
}

#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Op {
        Clear(f64, f64),
        Stroke(String, f64),
        Begin,
        Move(Point),
        Line(Point),
        Bezier(Point, Point, Point),
        Close,
        Paint,
        Rect(f64, f64, f64, f64, String),
        Text(String, Point),
    }

    /// Records every call for assertions on what a frame drew.
    #[derive(Debug, Default)]
    pub struct RecordingSurface {
        pub ops: Vec<Op>,
    }

    impl RecordingSurface {
        pub fn count(&self, pred: impl Fn(&Op) -> bool) -> usize {
            self.ops.iter().filter(|op| pred(op)).count()
        }
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self, width: f64, height: f64) {
            self.ops.push(Op::Clear(width, height));
        }
        fn set_stroke(&mut self, color: &str, width: f64) {
            self.ops.push(Op::Stroke(color.to_string(), width));
        }
        fn begin_path(&mut self) {
            self.ops.push(Op::Begin);
        }
        fn move_to(&mut self, p: Point) {
            self.ops.push(Op::Move(p));
        }
        fn line_to(&mut self, p: Point) {
            self.ops.push(Op::Line(p));
        }
        fn bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point) {
            self.ops.push(Op::Bezier(c1, c2, end));
        }
        fn close_path(&mut self) {
            self.ops.push(Op::Close);
        }
        fn stroke(&mut self) {
            self.ops.push(Op::Paint);
        }
        fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
            self.ops.push(Op::Rect(x, y, width, height, color.to_string()));
        }
        fn fill_text(&mut self, text: &str, at: Point, _color: &str) {
            self.ops.push(Op::Text(text.to_string(), at));
        }
    }
}
