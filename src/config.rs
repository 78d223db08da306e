// Configuration for the lunar poster: spiral, glyph, page and palette constants.

use lazy_static::lazy_static;

use crate::geometry::Rect;
use crate::primitive::Rgb;

/// Points sampled around the moon disk.
pub const DISK_POINTS: usize = 100;

/// Longest month the layout must accommodate.
pub const MAX_DAYS_IN_MONTH: u32 = 31;

pub const GRID_COLUMNS: usize = 3;
pub const GRID_ROWS: usize = 4;

/// Parameters of the bounded logarithmic spiral `r(θ) = a·e^{-bθ}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralParams {
    /// Overall scale.
    pub a: f64,
    /// Spiral exponent.
    pub b: f64,
    /// Spacing between consecutive days along the spiral.
    pub ds: f64,
}

impl Default for SpiralParams {
    fn default() -> Self {
        Self {
            a: 0.8,
            b: 0.1,
            ds: 1.0 / 5.75,
        }
    }
}

/// Size and offsets of a single day's glyph, in panel plot units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphStyle {
    pub scale: f64,
    pub line_width: f64,
    /// Weekend marker sits at `r + marker_radius_factor * scale`.
    pub marker_radius_factor: f64,
    /// Angular offset of the weekend marker (negative) and day number (positive).
    pub angular_offset: f64,
    pub day_label_inset: f64,
    pub label_scale: f64,
    pub marker_scale: f64,
}

impl Default for GlyphStyle {
    fn default() -> Self {
        Self {
            scale: 0.0625,
            line_width: 0.25,
            marker_radius_factor: 1.4,
            angular_offset: 0.05,
            day_label_inset: 0.11,
            label_scale: 0.75,
            marker_scale: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// Page width in points.
    pub width: f64,
    /// Page height over frame width, chosen so month panels come out square.
    pub aspect_ratio: f64,
    pub margin: f64,
    /// Fraction of the frame above the month grid.
    pub title_band: f64,
    /// Fraction of the frame below the month grid.
    pub legend_band: f64,
    /// Plot bounds of a month panel; spirals look centered with these.
    pub panel_bounds: Rect,
    pub base_font_size: f64,
    pub title_scale: f64,
    pub month_title_scale: f64,
    pub border_width: f64,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            width: 72.0 * 10.5,
            aspect_ratio: (4.0 / 3.0) / 0.85,
            margin: 0.01,
            title_band: 0.1,
            legend_band: 0.05,
            panel_bounds: Rect::new(-0.925, 1.075, -1.0, 1.0),
            base_font_size: 10.0,
            // \Huge at 2.5x
            title_scale: 2.488 * 2.5,
            month_title_scale: 2.0,
            border_width: 1.0,
        }
    }
}

impl PageLayout {
    pub fn y_margin(&self) -> f64 {
        self.margin / self.aspect_ratio
    }

    pub fn height(&self) -> f64 {
        let frame_w = 1.0 - 2.0 * self.margin;
        let frame_h = 1.0 - 2.0 * self.y_margin();
        self.width * frame_w / frame_h * self.aspect_ratio
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgb,
    pub foreground: Rgb,
}

impl Palette {
    /// MidnightBlue darkened to three quarters of its lightness, on Cornsilk.
    pub fn night() -> Self {
        Self {
            background: Rgb::from_u8(25, 25, 112).with_lightness_scaled(0.75),
            foreground: Rgb::from_u8(255, 248, 220),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PosterConfig {
    pub spiral: SpiralParams,
    pub glyph: GlyphStyle,
    pub page: PageLayout,
    pub palette: Palette,
    /// Timezone the ephemeris was computed in, quoted in the legend.
    pub data_timezone: String,
}

impl Default for PosterConfig {
    fn default() -> Self {
        DEFAULT_CONFIG.clone()
    }
}

lazy_static! {
    pub static ref DEFAULT_CONFIG: PosterConfig = PosterConfig {
        spiral: SpiralParams::default(),
        glyph: GlyphStyle::default(),
        page: PageLayout::default(),
        palette: Palette::night(),
        data_timezone: "Pacific Standard Time".to_string(),
    };
}
