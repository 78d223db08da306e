//! One month's spiral of moons.

use std::f64::consts::TAU;

use chrono::Month;

use crate::config::{GlyphStyle, Palette, PageLayout};
use crate::ephemeris::{EphemerisRecord, PhaseLabel};
use crate::error::{PosterError, RecordLocation, Result};
use crate::geometry::Point;
use crate::phase::MoonShape;
use crate::primitive::{
    Alignment, FontWeight, Justification, MarkerKind, PathStyle, Primitive, TextPlacement,
};
use crate::spiral::Spiral;

/// Label printed on a day's glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayLabel {
    None,
    /// First full moon of the month.
    Full,
    /// Any later full moon in the same month.
    Blue,
    New,
}

impl DayLabel {
    pub fn text(self) -> Option<&'static str> {
        match self {
            DayLabel::None => None,
            DayLabel::Full => Some("f"),
            DayLabel::Blue => Some("b"),
            DayLabel::New => Some("n"),
        }
    }
}

/// Labels for one month's records, in day order.
pub fn assign_labels(records: &[EphemerisRecord]) -> Vec<DayLabel> {
    records
        .iter()
        .scan(false, |seen_full, record| {
            let label = match record.label() {
                PhaseLabel::Full if *seen_full => DayLabel::Blue,
                PhaseLabel::Full => {
                    *seen_full = true;
                    DayLabel::Full
                }
                PhaseLabel::New => DayLabel::New,
                PhaseLabel::None => DayLabel::None,
            };
            Some(label)
        })
        .collect()
}

/// English month name; `month` is 1-based.
pub fn month_name(month: u32) -> &'static str {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name())
        .unwrap_or("")
}

/// A single day's moon, in panel plot coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct MoonGlyph {
    pub day: u32,
    pub position: Point,
    pub disk: Vec<Point>,
    pub lit: Vec<Point>,
    pub label: DayLabel,
    pub weekend_marker: Option<Point>,
    pub day_label_at: Point,
}

impl MoonGlyph {
    pub fn is_weekend_night(&self) -> bool {
        self.weekend_marker.is_some()
    }

    pub fn label_text(&self) -> Option<&'static str> {
        self.label.text()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthPanel {
    pub month: u32,
    pub name: String,
    pub glyphs: Vec<MoonGlyph>,
}

impl MonthPanel {
    /// Primitives for the panel, in its own plot coordinates.
    pub fn primitives(&self, glyph: &GlyphStyle, page: &PageLayout, palette: &Palette) -> Vec<Primitive> {
        let fg = palette.foreground;
        let small = page.base_font_size * glyph.label_scale;
        let mut out = Vec::with_capacity(1 + self.glyphs.len() * 5);

        out.push(Primitive::Text(TextPlacement {
            text: self.name.clone(),
            at: Point::new(0.0, 0.9),
            alignment: Alignment::Top,
            justification: Justification::Right,
            size: page.base_font_size * page.month_title_scale,
            weight: FontWeight::Swash,
            color: fg,
        }));

        for moon in &self.glyphs {
            out.push(Primitive::Path {
                points: moon.disk.clone(),
                closed: false,
                style: PathStyle::stroke(fg, glyph.line_width),
            });
            out.push(Primitive::Path {
                points: moon.lit.clone(),
                closed: true,
                style: PathStyle::fill_and_stroke(fg, glyph.line_width),
            });

            if let Some(text) = moon.label_text() {
                // the new moon's label sits on a dark disk
                let color = if moon.label == DayLabel::New {
                    fg
                } else {
                    palette.background
                };
                out.push(Primitive::Text(TextPlacement {
                    text: text.to_string(),
                    at: moon.position,
                    alignment: Alignment::MidHeight,
                    justification: Justification::Centered,
                    size: small,
                    weight: FontWeight::Bold,
                    color,
                }));
            }

            if let Some(at) = moon.weekend_marker {
                out.push(Primitive::Marker {
                    at,
                    kind: MarkerKind::Asterisk,
                    size: page.base_font_size * glyph.marker_scale,
                    color: fg,
                });
            }

            out.push(Primitive::Text(TextPlacement {
                text: moon.day.to_string(),
                at: moon.day_label_at,
                alignment: Alignment::MidHeight,
                justification: Justification::Centered,
                size: small,
                weight: FontWeight::Regular,
                color: fg,
            }));
        }
        out
    }
}

fn check_month_records(month: u32, records: &[EphemerisRecord]) -> Result<()> {
    let mut previous: Option<u32> = None;
    for record in records {
        let location = RecordLocation::default().on(Some(record.month()), Some(record.day()));
        if record.month() != month {
            return Err(PosterError::InvalidField {
                location,
                field: "month",
                value: format!("{} in panel for month {}", record.month(), month),
            });
        }
        match previous {
            Some(day) if day == record.day() => return Err(PosterError::DuplicateDay { location }),
            Some(day) if day > record.day() => {
                return Err(PosterError::InvalidField {
                    location,
                    field: "day",
                    value: format!("{} after day {}", record.day(), day),
                })
            }
            _ => {}
        }
        previous = Some(record.day());
    }
    Ok(())
}

/// Lays a month's records out along the spiral.
#[derive(Debug, Clone, Copy)]
pub struct MonthPanelComposer<'a> {
    spiral: &'a Spiral,
    style: &'a GlyphStyle,
}

impl<'a> MonthPanelComposer<'a> {
    pub fn new(spiral: &'a Spiral, style: &'a GlyphStyle) -> Self {
        Self { spiral, style }
    }

    /// Fails unless every record belongs to `month` and days strictly increase.
    pub fn compose(&self, month: u32, records: &[EphemerisRecord]) -> Result<MonthPanel> {
        check_month_records(month, records)?;

        let glyphs = records
            .iter()
            .zip(assign_labels(records))
            .map(|(record, label)| self.glyph(record, label))
            .collect();

        Ok(MonthPanel {
            month,
            name: month_name(month).to_string(),
            glyphs,
        })
    }

    fn glyph(&self, record: &EphemerisRecord, label: DayLabel) -> MoonGlyph {
        let style = self.style;
        let place = self.spiral.position(record.day());
        let shape = MoonShape::new(TAU * record.phase_fraction());
        let to_panel = |p: Point| p * style.scale + place.position;

        let weekend_marker = record.is_weekend_night().then(|| {
            Point::on_clock(
                place.radius + style.marker_radius_factor * style.scale,
                place.theta - style.angular_offset,
            )
        });
        let day_label_at = Point::on_clock(
            place.radius - style.day_label_inset,
            place.theta + style.angular_offset,
        );

        MoonGlyph {
            day: record.day(),
            position: place.position,
            disk: shape.disk.into_iter().map(to_panel).collect(),
            lit: shape.lit.into_iter().map(to_panel).collect(),
            label,
            weekend_marker,
            day_label_at,
        }
    }
}
