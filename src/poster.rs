//! Twelve month panels, title, legend and border on one page.

use std::time::Instant;

use tracing::{debug, info};

use crate::config::{PosterConfig, GRID_COLUMNS, GRID_ROWS, MAX_DAYS_IN_MONTH};
use crate::ephemeris::YearEphemeris;
use crate::error::{PosterError, Result};
use crate::geometry::{Point, Rect, Viewport};
use crate::month::{MonthPanel, MonthPanelComposer};
use crate::primitive::{
    Alignment, Drawing, FontWeight, Justification, Page, PathStyle, Primitive, TextPlacement,
};
use crate::spiral::Spiral;

/// Cell of the month grid; row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

/// Grid cell of `month` (1 = January): three per row, reading order.
pub fn grid_cell(month: u32) -> GridCell {
    let i = month as usize - 1;
    let r = i % GRID_COLUMNS;
    let c = (i - r) / GRID_COLUMNS;
    GridCell { row: c, col: r }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Poster {
    pub year: i32,
    pub panels: Vec<MonthPanel>,
    pub title: String,
    pub legend: Vec<String>,
    pub drawing: Drawing,
}

impl Poster {
    pub fn panel(&self, month: u32) -> &MonthPanel {
        &self.panels[month as usize - 1]
    }
}

/// Page regions derived from the layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRegions {
    pub page: Page,
    pub frame: Rect,
    pub body: Rect,
    pub title: Rect,
    pub legend: Rect,
    pub border: Rect,
}

/// Builds posters; owns the validated spiral and the style.
#[derive(Debug, Clone)]
pub struct PosterComposer {
    config: PosterConfig,
    spiral: Spiral,
}

impl PosterComposer {
    /// Fails if the spiral cannot fit the longest month.
    pub fn new(config: PosterConfig) -> Result<Self> {
        let spiral = Spiral::new(config.spiral, MAX_DAYS_IN_MONTH)?;
        Ok(Self { config, spiral })
    }

    pub fn config(&self) -> &PosterConfig {
        &self.config
    }

    pub fn spiral(&self) -> &Spiral {
        &self.spiral
    }

    pub fn regions(&self) -> PageRegions {
        let layout = &self.config.page;
        let page = Page {
            width: layout.width,
            height: layout.height(),
        };
        let (xm, ym) = (layout.margin, layout.y_margin());
        let frame = page.bounds().with_margins(xm, xm, ym, ym);
        PageRegions {
            page,
            frame,
            body: frame.with_margins(0.0, 0.0, layout.title_band, layout.legend_band),
            title: frame.with_margins(0.0, 0.0, 0.0, 1.0 - layout.title_band),
            legend: frame.with_margins(0.0, 0.0, 1.0 - layout.legend_band, 0.0),
            border: frame.with_margins(xm, xm, ym, ym),
        }
    }

    /// Rectangle of `month`'s panel inside the body.
    pub fn panel_rect(&self, month: u32) -> Rect {
        let cell = grid_cell(month);
        let (cols, rows) = (GRID_COLUMNS as f64, GRID_ROWS as f64);
        let col = cell.col as f64;
        let row = cell.row as f64;
        self.regions().body.with_margins(
            col / cols,
            (cols - 1.0 - col) / cols,
            row / rows,
            (rows - 1.0 - row) / rows,
        )
    }

    pub fn compose_month(&self, ephemeris: &YearEphemeris, month: u32) -> Result<MonthPanel> {
        MonthPanelComposer::new(&self.spiral, &self.config.glyph).compose(month, ephemeris.month(month))
    }

    pub fn compose(&self, ephemeris: &YearEphemeris) -> Result<Poster> {
        let start = Instant::now();
        let panels = ephemeris
            .months()
            .map(|(month, _)| self.compose_month(ephemeris, month))
            .collect::<Result<Vec<_>>>()?;
        let poster = self.assemble(ephemeris.year(), panels)?;
        info!(
            target: "poster",
            "Composed {} poster ({} primitives) in {}µs",
            poster.year,
            poster.drawing.primitives.len(),
            start.elapsed().as_micros()
        );
        Ok(poster)
    }

    /// Places already composed panels on the page.
    pub fn assemble(&self, year: i32, panels: Vec<MonthPanel>) -> Result<Poster> {
        if panels.len() != GRID_COLUMNS * GRID_ROWS {
            return Err(PosterError::PanelCount {
                year,
                found: panels.len(),
            });
        }
        if let Some((panel, position)) = panels
            .iter()
            .zip(1..)
            .find(|(panel, position)| panel.month != *position)
        {
            return Err(PosterError::PanelOrder {
                year,
                position,
                found_month: panel.month,
            });
        }

        let PosterConfig {
            glyph,
            page: layout,
            palette,
            data_timezone,
            ..
        } = &self.config;
        let regions = self.regions();
        let fg = palette.foreground;
        let title = year.to_string();
        let legend = vec![
            "f: full moon    n: new moon    b: blue moon".to_string(),
            "* denotes friday or saturday".to_string(),
            format!("calculations done in {}", data_timezone),
        ];

        let mut primitives = vec![Primitive::Path {
            points: regions.page.bounds().corners(),
            closed: true,
            style: PathStyle::fill(palette.background),
        }];

        for panel in &panels {
            let viewport = Viewport::new(layout.panel_bounds, self.panel_rect(panel.month));
            debug!(target: "poster", "{} {} at {:?}", panel.name, year, viewport.target);
            primitives.extend(
                panel
                    .primitives(glyph, layout, palette)
                    .into_iter()
                    .map(|p| p.map_points(|pt| viewport.map(pt))),
            );
        }

        primitives.push(Primitive::Text(TextPlacement {
            text: title.clone(),
            at: regions.title.at(0.5, 0.5),
            alignment: Alignment::MidHeight,
            justification: Justification::Centered,
            size: layout.base_font_size * layout.title_scale,
            weight: FontWeight::Bold,
            color: fg,
        }));

        let line_height = layout.base_font_size * 1.5;
        for (i, line) in legend.iter().enumerate() {
            let top = regions.legend.at(0.5, 1.0);
            primitives.push(Primitive::Text(TextPlacement {
                text: line.clone(),
                at: Point::new(top.x, top.y - i as f64 * line_height),
                alignment: Alignment::Top,
                justification: Justification::Centered,
                size: layout.base_font_size,
                weight: FontWeight::Regular,
                color: fg,
            }));
        }

        primitives.push(Primitive::Path {
            points: regions.border.corners(),
            closed: true,
            style: PathStyle::stroke(fg, layout.border_width),
        });

        Ok(Poster {
            year,
            panels,
            title,
            legend,
            drawing: Drawing {
                page: regions.page,
                primitives,
            },
        })
    }
}
