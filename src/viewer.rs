//! Desktop preview of a poster.

use std::sync::Arc;

use eframe::{App, Frame};
use egui::{Align2, Color32, Context, FontId, Key, Mesh, Pos2, Sense, Shape, Stroke, Ui, Vec2};
use tracing::{error, info};

use crate::batch::PosterRenderer;
use crate::geometry::Point;
use crate::poster::Poster;
use crate::primitive::{Alignment, Drawing, Justification, Paint, Primitive, Rgb};

pub struct PosterViewer {
    renderer: PosterRenderer,
    year: i32,
    poster: Option<Arc<Poster>>,
    error: Option<String>,
}

impl PosterViewer {
    pub fn new(renderer: PosterRenderer, year: i32) -> Self {
        let mut viewer = Self {
            renderer,
            year,
            poster: None,
            error: None,
        };
        viewer.load();
        viewer
    }

    fn load(&mut self) {
        match self.renderer.poster(self.year) {
            Ok(poster) => {
                info!(target: "viewer", "Showing {}", self.year);
                self.poster = Some(poster);
                self.error = None;
            }
            Err(e) => {
                error!(target: "viewer", "Failed to load {}: {}", self.year, e);
                self.poster = None;
                self.error = Some(e.to_string());
            }
        }
    }

    fn step(&mut self, delta: i32) {
        self.year += delta;
        self.load();
    }

    fn render_controls(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if ui.button("◀").clicked() {
                self.step(-1);
            }
            if ui.add(egui::DragValue::new(&mut self.year)).changed() {
                self.load();
            }
            if ui.button("▶").clicked() {
                self.step(1);
            }
            if let Some(message) = &self.error {
                ui.colored_label(Color32::LIGHT_RED, message);
            }
        });

        if cfg!(debug_assertions) {
            ui.collapsing("📊 Performance Metrics", |ui| {
                ui.monospace(self.renderer.metrics().report());
            });
        }
    }
}

impl App for PosterViewer {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        let (back, forward) = ctx.input(|i| (i.key_pressed(Key::ArrowLeft), i.key_pressed(Key::ArrowRight)));
        if back {
            self.step(-1);
        } else if forward {
            self.step(1);
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| self.render_controls(ui));
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(poster) = &self.poster {
                paint_drawing(ui, &poster.drawing);
            }
        });
    }
}

fn color(rgb: Rgb) -> Color32 {
    let [r, g, b] = rgb.to_u8();
    Color32::from_rgb(r, g, b)
}

fn anchor(justification: Justification, alignment: Alignment) -> Align2 {
    match (justification, alignment) {
        (Justification::Left, Alignment::Top) => Align2::LEFT_TOP,
        (Justification::Centered, Alignment::Top) => Align2::CENTER_TOP,
        (Justification::Right, Alignment::Top) => Align2::RIGHT_TOP,
        (Justification::Left, Alignment::MidHeight) => Align2::LEFT_CENTER,
        (Justification::Centered, Alignment::MidHeight) => Align2::CENTER_CENTER,
        (Justification::Right, Alignment::MidHeight) => Align2::RIGHT_CENTER,
    }
}

fn paint_drawing(ui: &mut Ui, drawing: &Drawing) {
    let page = drawing.page;
    let available = ui.available_size();
    let scale = (available.x / page.width as f32).min(available.y / page.height as f32);
    let size = Vec2::new(page.width as f32 * scale, page.height as f32 * scale);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let to_screen = |p: Point| {
        Pos2::new(
            origin.x + p.x as f32 * scale,
            origin.y + (page.height - p.y) as f32 * scale,
        )
    };

    for primitive in &drawing.primitives {
        match primitive {
            Primitive::Path {
                points,
                closed,
                style,
            } => {
                let screen: Vec<Pos2> = points.iter().map(|&p| to_screen(p)).collect();
                if matches!(style.paint, Paint::Fill | Paint::FillAndStroke) {
                    painter.add(Shape::mesh(monotone_mesh(&screen, color(style.fill))));
                }
                if matches!(style.paint, Paint::Stroke | Paint::FillAndStroke) {
                    let stroke = Stroke::new(style.line_width as f32 * scale, color(style.stroke));
                    painter.add(if *closed {
                        Shape::closed_line(screen, stroke)
                    } else {
                        Shape::line(screen, stroke)
                    });
                }
            }
            Primitive::Text(text) => {
                painter.text(
                    to_screen(text.at),
                    anchor(text.justification, text.alignment),
                    &text.text,
                    FontId::proportional(text.size as f32 * scale),
                    color(text.color),
                );
            }
            Primitive::Marker {
                at, size, color: c, ..
            } => {
                painter.text(
                    to_screen(*at),
                    Align2::CENTER_CENTER,
                    "*",
                    FontId::proportional(*size as f32 * 2.0 * scale),
                    color(*c),
                );
            }
        }
    }
}

/// Triangulates a polygon that is monotone in y (every outline on the poster
/// is: rectangles and moon phases).
fn monotone_mesh(points: &[Pos2], fill: Color32) -> Mesh {
    let mut mesh = Mesh::default();
    let n = points.len();
    if n < 3 {
        return mesh;
    }

    let by_y = |a: &&Pos2, b: &&Pos2| a.y.total_cmp(&b.y);
    let top = points
        .iter()
        .enumerate()
        .min_by(|a, b| by_y(&a.1, &b.1))
        .map_or(0, |(i, _)| i);
    let bottom = points
        .iter()
        .enumerate()
        .max_by(|a, b| by_y(&a.1, &b.1))
        .map_or(0, |(i, _)| i);

    let walk = |step: usize| {
        let mut chain = vec![points[top]];
        let mut i = top;
        while i != bottom {
            i = (i + step) % n;
            chain.push(points[i]);
        }
        chain
    };
    let left = walk(1);
    let right = walk(n - 1);

    for &p in left.iter().chain(right.iter()) {
        mesh.colored_vertex(p, fill);
    }

    let (l, r) = (left.len(), right.len());
    let (mut i, mut j) = (0, 0);
    while i + 1 < l || j + 1 < r {
        let advance_left = j + 1 >= r || (i + 1 < l && left[i + 1].y <= right[j + 1].y);
        if advance_left {
            mesh.add_triangle(i as u32, i as u32 + 1, (l + j) as u32);
            i += 1;
        } else {
            mesh.add_triangle(i as u32, (l + j) as u32, (l + j) as u32 + 1);
            j += 1;
        }
    }
    mesh
}

/// Opens the preview window.
pub fn run(renderer: PosterRenderer, year: i32) -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 1000.0])
            .with_min_inner_size([320.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Moon Poster",
        options,
        Box::new(move |_cc| Box::new(PosterViewer::new(renderer, year)) as Box<dyn App>),
    )
}
