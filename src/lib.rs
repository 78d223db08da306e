//! Geometry engine for a yearly lunar-phase poster: one spiral of daily moon
//! glyphs per month, twelve panels on a page.

pub mod batch;
pub mod config;
pub mod ephemeris;
pub mod error;
pub mod geometry;
pub mod month;
pub mod phase;
pub mod poster;
pub mod primitive;
pub mod spiral;
pub mod svg;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use batch::{BatchReport, Metrics, PosterRenderer};
pub use config::{PosterConfig, SpiralParams};
pub use ephemeris::{load_year, parse_year, EphemerisRecord, PhaseLabel, YearEphemeris};
pub use error::{PosterError, Result};
pub use month::{DayLabel, MonthPanel, MonthPanelComposer, MoonGlyph};
pub use phase::MoonShape;
pub use poster::{Poster, PosterComposer};
pub use primitive::{Drawing, Primitive};
pub use spiral::{Spiral, SpiralPoint};
pub use svg::to_svg;
