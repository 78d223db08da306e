//! Drawable primitives handed to a rendering backend.

use crate::geometry::{Point, Rect};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

/// Hue in degrees, lightness and saturation in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hls {
    pub h: f64,
    pub l: f64,
    pub s: f64,
}

impl Rgb {
    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
    }

    pub fn to_u8(self) -> [u8; 3] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_u8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn to_hls(self) -> Hls {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) / 2.0;
        let delta = max - min;
        if delta == 0.0 {
            return Hls { h: 0.0, l, s: 0.0 };
        }
        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };
        let h = if max == self.r {
            ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if max == self.g {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };
        Hls { h: h * 60.0, l, s }
    }

    pub fn from_hls(hls: Hls) -> Self {
        let Hls { h, l, s } = hls;
        if s == 0.0 {
            return Self::new(l, l, l);
        }
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r, g, b) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        Self::new(r + m, g + m, b + m)
    }

    /// Same hue and saturation with lightness multiplied by `factor`.
    pub fn with_lightness_scaled(self, factor: f64) -> Self {
        let mut hls = self.to_hls();
        hls.l = (hls.l * factor).clamp(0.0, 1.0);
        Self::from_hls(hls)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Paint {
    Stroke,
    Fill,
    FillAndStroke,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub paint: Paint,
    pub stroke: Rgb,
    pub fill: Rgb,
    /// Stroke width in points.
    pub line_width: f64,
}

impl PathStyle {
    pub fn stroke(color: Rgb, line_width: f64) -> Self {
        Self {
            paint: Paint::Stroke,
            stroke: color,
            fill: color,
            line_width,
        }
    }

    pub fn fill(color: Rgb) -> Self {
        Self {
            paint: Paint::Fill,
            stroke: color,
            fill: color,
            line_width: 0.0,
        }
    }

    pub fn fill_and_stroke(color: Rgb, line_width: f64) -> Self {
        Self {
            paint: Paint::FillAndStroke,
            stroke: color,
            fill: color,
            line_width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Top,
    MidHeight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Justification {
    Left,
    Centered,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
    Swash,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextPlacement {
    pub text: String,
    pub at: Point,
    pub alignment: Alignment,
    pub justification: Justification,
    /// Font size in points.
    pub size: f64,
    pub weight: FontWeight,
    pub color: Rgb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Asterisk,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Path {
        points: Vec<Point>,
        closed: bool,
        style: PathStyle,
    },
    Text(TextPlacement),
    Marker {
        at: Point,
        kind: MarkerKind,
        size: f64,
        color: Rgb,
    },
}

impl Primitive {
    /// Moves every coordinate through `f`; sizes and widths stay in points.
    pub fn map_points(self, f: impl Fn(Point) -> Point) -> Primitive {
        match self {
            Primitive::Path {
                points,
                closed,
                style,
            } => Primitive::Path {
                points: points.into_iter().map(&f).collect(),
                closed,
                style,
            },
            Primitive::Text(mut text) => {
                text.at = f(text.at);
                Primitive::Text(text)
            }
            Primitive::Marker {
                at,
                kind,
                size,
                color,
            } => Primitive::Marker {
                at: f(at),
                kind,
                size,
                color,
            },
        }
    }

    pub fn as_text(&self) -> Option<&TextPlacement> {
        match self {
            Primitive::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Page size in points; coordinates have their origin at the bottom-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Page {
    pub width: f64,
    pub height: f64,
}

impl Page {
    pub fn bounds(&self) -> Rect {
        Rect::new(0.0, self.width, 0.0, self.height)
    }
}

/// Everything needed to draw one poster.
#[derive(Debug, Clone, PartialEq)]
pub struct Drawing {
    pub page: Page,
    pub primitives: Vec<Primitive>,
}

impl Drawing {
    pub fn texts(&self) -> impl Iterator<Item = &TextPlacement> {
        self.primitives.iter().filter_map(Primitive::as_text)
    }
}
