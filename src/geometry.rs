use std::ops::{Add, Mul, Sub};

/// A point in a 2D drawing frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at polar `(r, theta)` with theta measured clockwise from +y.
    pub fn on_clock(r: f64, theta: f64) -> Self {
        Self::new(r * theta.sin(), r * theta.cos())
    }

    pub fn norm(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).norm()
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Orthographic projection onto the viewing plane.
    pub fn project(self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Row-major 3x3 matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    rows: [[f64; 3]; 3],
}

impl Mat3 {
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Rotation by `angle` about the in-plane vertical (y) axis.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self::from_rows([[c, 0.0, -s], [0.0, 1.0, 0.0], [s, 0.0, c]])
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        let r = &self.rows;
        Vec3::new(
            r[0][0] * v.x + r[0][1] * v.y + r[0][2] * v.z,
            r[1][0] * v.x + r[1][1] * v.y + r[1][2] * v.z,
            r[2][0] * v.x + r[2][1] * v.y + r[2][2] * v.z,
        )
    }
}

/// Axis-aligned rectangle, y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Rect {
    pub const fn new(left: f64, right: f64, bottom: f64, top: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
        }
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// Sub-rectangle with margins given as fractions of this one.
    pub fn with_margins(&self, left: f64, right: f64, top: f64, bottom: f64) -> Rect {
        let (w, h) = (self.width(), self.height());
        Rect::new(
            self.left + left * w,
            self.right - right * w,
            self.bottom + bottom * h,
            self.top - top * h,
        )
    }

    /// Point at fractional coordinates `(fx, fy)` inside the rectangle.
    pub fn at(&self, fx: f64, fy: f64) -> Point {
        Point::new(self.left + fx * self.width(), self.bottom + fy * self.height())
    }

    pub fn corners(&self) -> Vec<Point> {
        vec![
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.right, self.bottom),
            Point::new(self.left, self.bottom),
        ]
    }

    #[cfg(test)]
    pub fn overlaps(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        self.left < other.right - EPS
            && other.left < self.right - EPS
            && self.bottom < other.top - EPS
            && other.bottom < self.top - EPS
    }
}

/// Maps plot coordinates (arbitrary bounds, possibly flipped) onto a rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub bounds: Rect,
    pub target: Rect,
}

impl Viewport {
    pub fn new(bounds: Rect, target: Rect) -> Self {
        Self { bounds, target }
    }

    pub fn map(&self, p: Point) -> Point {
        let fx = (p.x - self.bounds.left) / self.bounds.width();
        let fy = (p.y - self.bounds.bottom) / self.bounds.height();
        self.target.at(fx, fy)
    }
}

/// Signed shoelace area; positive for counter-clockwise outlines.
pub fn signed_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        sum += p.x * q.y - q.x * p.y;
    }
    sum / 2.0
}

#[cfg(test)]
pub fn centroid_x(points: &[Point]) -> f64 {
    if points.is_empty() {
        return 0.0;
    }
    points.iter().map(|p| p.x).sum::<f64>() / points.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn rotation_keeps_y_and_length() {
        let m = Mat3::rotation_y(0.7);
        let v = m * Vec3::new(0.6, 0.8, 0.0);
        assert!((v.y - 0.8).abs() < 1e-12);
        assert!(((v.x * v.x + v.y * v.y + v.z * v.z) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn quarter_turn_moves_x_into_z() {
        let v = Mat3::rotation_y(FRAC_PI_2) * Vec3::new(1.0, 0.0, 0.0);
        assert!(v.x.abs() < 1e-12);
        assert!((v.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clock_angle_starts_at_twelve() {
        let p = Point::on_clock(2.0, 0.0);
        assert!((p.x).abs() < 1e-12 && (p.y - 2.0).abs() < 1e-12);
        let q = Point::on_clock(1.0, FRAC_PI_2);
        assert!((q.x - 1.0).abs() < 1e-12 && q.y.abs() < 1e-12);
    }

    #[test]
    fn margins_and_viewport() {
        let page = Rect::new(0.0, 100.0, 0.0, 200.0);
        let inner = page.with_margins(0.1, 0.2, 0.25, 0.05);
        assert_eq!(inner, Rect::new(10.0, 80.0, 10.0, 150.0));

        // flipped y bounds: top = 1, bottom = -1
        let vp = Viewport::new(Rect::new(-1.0, 1.0, -1.0, 1.0), page);
        assert_eq!(vp.map(Point::new(0.0, 0.0)), Point::new(50.0, 100.0));
        assert_eq!(vp.map(Point::new(1.0, 1.0)), Point::new(100.0, 200.0));
    }

    #[test]
    fn unit_square_area() {
        let square = Rect::new(0.0, 1.0, 0.0, 1.0).corners();
        assert!((signed_area(&square).abs() - 1.0).abs() < 1e-12);
        assert_eq!(signed_area(&square[..2]), 0.0);
    }

    #[test]
    fn touching_rects_do_not_overlap() {
        let a = Rect::new(0.0, 1.0, 0.0, 1.0);
        let b = Rect::new(1.0, 2.0, 0.0, 1.0);
        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&Rect::new(0.5, 1.5, 0.5, 1.5)));
    }
}
