//! Pixel-space geometry for detected text lines and redaction boxes

use serde::{Deserialize, Serialize};

/// A point in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<[f64; 2]> for Point {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Quadrilateral in the order top-left, top-right, bottom-right, bottom-left
///
/// Serialized as `[[x, y], [x, y], [x, y], [x, y]]`, the shape OCR engines emit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 2]; 4]", into = "[[f64; 2]; 4]")]
pub struct Quad(pub [Point; 4]);

impl Quad {
    /// Build an axis-aligned quad from two corners
    pub fn from_corners(top_left: Point, bottom_right: Point) -> Self {
        Self([
            top_left,
            Point::new(bottom_right.x, top_left.y),
            bottom_right,
            Point::new(top_left.x, bottom_right.y),
        ])
    }

    pub fn top_left(&self) -> Point {
        self.0[0]
    }

    pub fn bottom_right(&self) -> Point {
        self.0[2]
    }

    /// Horizontal extent between the top-left and bottom-right corners
    pub fn width(&self) -> f64 {
        self.bottom_right().x - self.top_left().x
    }

    /// Vertical extent between the top-left and bottom-right corners
    pub fn height(&self) -> f64 {
        self.bottom_right().y - self.top_left().y
    }

    /// A quad is degenerate when it has non-finite coordinates or no positive area
    pub fn is_degenerate(&self) -> bool {
        !self.0.iter().all(Point::is_finite) || self.width() <= 0.0 || self.height() <= 0.0
    }
}

impl From<[[f64; 2]; 4]> for Quad {
    fn from(points: [[f64; 2]; 4]) -> Self {
        Self(points.map(Point::from))
    }
}

impl From<Quad> for [[f64; 2]; 4] {
    fn from(quad: Quad) -> Self {
        quad.0.map(|p| [p.x, p.y])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners() {
        let quad = Quad::from_corners(Point::new(10.0, 20.0), Point::new(110.0, 40.0));
        assert_eq!(quad.0[1], Point::new(110.0, 20.0));
        assert_eq!(quad.0[3], Point::new(10.0, 40.0));
        assert_eq!(quad.width(), 100.0);
        assert_eq!(quad.height(), 20.0);
    }

    #[test]
    fn test_degenerate_quads() {
        let flat = Quad::from_corners(Point::new(0.0, 5.0), Point::new(50.0, 5.0));
        assert!(flat.is_degenerate());

        let inverted = Quad::from_corners(Point::new(50.0, 0.0), Point::new(10.0, 10.0));
        assert!(inverted.is_degenerate());

        let nan = Quad::from_corners(Point::new(f64::NAN, 0.0), Point::new(10.0, 10.0));
        assert!(nan.is_degenerate());

        let ok = Quad::from_corners(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(!ok.is_degenerate());
    }

    #[test]
    fn test_serde_point_arrays() {
        let quad: Quad = serde_json::from_str("[[1,2],[3,2],[3,4],[1,4]]").unwrap();
        assert_eq!(quad.top_left(), Point::new(1.0, 2.0));
        assert_eq!(quad.bottom_right(), Point::new(3.0, 4.0));

        let json = serde_json::to_string(&quad).unwrap();
        assert_eq!(json, "[[1.0,2.0],[3.0,2.0],[3.0,4.0],[1.0,4.0]]");
    }
}
