//! Integer polygon primitives used for key outlines and hit testing.
//!
//! Coordinates are in the keyboard's local pixel space: origin at the top-left
//! corner, `y` growing downward.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

/// Axis aligned rectangle covering `left..right` by `top..bottom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }
}

/// Simple closed polygon. The last vertex connects back to the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Rectangle with its top-left corner at `origin`.
    pub fn rect(origin: Point, width: i32, height: i32) -> Self {
        let Point { x, y } = origin;
        Self::new(vec![
            Point::new(x, y),
            Point::new(x + width, y),
            Point::new(x + width, y + height),
            Point::new(x, y + height),
        ])
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    fn edges(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Crossing-number point-in-polygon test in exact integer arithmetic.
    ///
    /// A horizontal ray is cast toward `+x`; an edge counts when it straddles
    /// the ray's `y` (lower endpoint inclusive, upper exclusive) and crosses
    /// strictly to the right of the point. Points on left and top edges are
    /// therefore inside, points on right and bottom edges outside, and two
    /// polygons that share an edge never both claim a point on it.
    pub fn contains(&self, point: Point) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }
        let (px, py) = (i128::from(point.x), i128::from(point.y));
        let mut inside = false;
        for (a, b) in self.edges() {
            let (ax, ay) = (i128::from(a.x), i128::from(a.y));
            let (bx, by) = (i128::from(b.x), i128::from(b.y));
            if (ay > py) == (by > py) {
                continue;
            }
            // px < ax + (bx - ax) * (py - ay) / (by - ay), without division.
            let dy = by - ay;
            let lhs = (px - ax) * dy;
            let rhs = (bx - ax) * (py - ay);
            let crosses = if dy > 0 { lhs < rhs } else { lhs > rhs };
            if crosses {
                inside = !inside;
            }
        }
        inside
    }

    /// Smallest rectangle enclosing every vertex.
    pub fn bounds(&self) -> Option<Rect> {
        let first = self.vertices.first()?;
        let mut rect = Rect {
            left: first.x,
            top: first.y,
            right: first.x,
            bottom: first.y,
        };
        for v in &self.vertices[1..] {
            rect.left = rect.left.min(v.x);
            rect.top = rect.top.min(v.y);
            rect.right = rect.right.max(v.x);
            rect.bottom = rect.bottom.max(v.y);
        }
        Some(rect)
    }

    /// Splits an axis-aligned polygon into horizontal bands of rectangles.
    ///
    /// Painters that can only fill convex shapes draw a notched white key as
    /// its top stem plus its full-width body. Non-vertical edges are ignored,
    /// so the result is only meaningful for rectilinear outlines.
    pub fn fill_bands(&self) -> Vec<Rect> {
        let mut ys: Vec<i32> = self.vertices.iter().map(|v| v.y).collect();
        ys.sort_unstable();
        ys.dedup();

        let mut bands = Vec::new();
        for pair in ys.windows(2) {
            let (top, bottom) = (pair[0], pair[1]);
            let mut xs: Vec<i32> = self
                .edges()
                .filter(|(a, b)| a.x == b.x && a.y.min(b.y) <= top && a.y.max(b.y) >= bottom)
                .map(|(a, _)| a.x)
                .collect();
            xs.sort_unstable();
            for span in xs.chunks_exact(2) {
                if span[0] < span[1] {
                    bands.push(Rect {
                        left: span[0],
                        top,
                        right: span[1],
                        bottom,
                    });
                }
            }
        }
        bands
    }
}
