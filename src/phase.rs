//! Moon phase glyph geometry.
//!
//! The terminator starts as the disk outline (phase 0) and is carried to its
//! pose for the given phase by a 3D rotation about the vertical axis. Only the
//! half facing the viewer survives the orthographic projection; closing it
//! against the limb gives the lit region.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::config::DISK_POINTS;
use crate::geometry::{Mat3, Point, Vec3};

/// Disk and lit-region outlines of one moon, in the unit frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MoonShape {
    /// Closed unit circle, always [`DISK_POINTS`] long.
    pub disk: Vec<Point>,
    /// Terminator (descending y) followed by the lit limb (ascending y).
    pub lit: Vec<Point>,
}

impl MoonShape {
    pub fn new(phase_angle: f64) -> Self {
        let phase = phase_angle.rem_euclid(TAU);
        let step = TAU / (DISK_POINTS - 1) as f64;

        let disk: Vec<Vec3> = (0..DISK_POINTS)
            .map(|i| {
                let theta = i as f64 * step + FRAC_PI_2;
                Vec3::new(theta.cos(), theta.sin(), 0.0)
            })
            .collect();

        let rotation = Mat3::rotation_y(-phase);
        let mut terminator: Vec<Vec3> = disk
            .iter()
            .map(|&v| rotation * v)
            .zip(disk.iter())
            .filter(|(rotated, original)| facing_viewer(rotated, original))
            .map(|(rotated, _)| rotated)
            .collect();
        terminator.sort_by(|p, q| q.y.total_cmp(&p.y));

        let mut limb: Vec<Point> = (0..DISK_POINTS / 2)
            .map(|i| {
                let theta = i as f64 * step;
                let theta = if phase > PI {
                    theta + FRAC_PI_2
                } else {
                    FRAC_PI_2 - theta
                };
                Point::new(theta.cos(), theta.sin())
            })
            .collect();
        limb.sort_by(|p, q| p.y.total_cmp(&q.y));

        let mut lit: Vec<Point> = terminator.into_iter().map(Vec3::project).collect();
        lit.extend(limb);

        Self {
            disk: disk.into_iter().map(Vec3::project).collect(),
            lit,
        }
    }

    pub fn lit_area(&self) -> f64 {
        crate::geometry::signed_area(&self.lit).abs()
    }
}

// z = 0 only happens at phase 0; keep the near limb there so the lit region
// collapses onto it instead of spanning the whole disk.
fn facing_viewer(rotated: &Vec3, original: &Vec3) -> bool {
    rotated.z < 0.0 || (rotated.z == 0.0 && original.x >= 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::centroid_x;

    fn sample_angles() -> Vec<f64> {
        (0..32).map(|i| i as f64 * TAU / 32.0).collect()
    }

    #[test]
    fn disk_is_closed_and_fixed_size() {
        for phase in sample_angles() {
            let shape = MoonShape::new(phase);
            assert_eq!(shape.disk.len(), DISK_POINTS);
            let (first, last) = (shape.disk[0], shape.disk[DISK_POINTS - 1]);
            assert!(first.distance(last) < 1e-12, "disk not closed at {}", phase);
            assert!(shape.disk.iter().all(|p| (p.norm() - 1.0).abs() < 1e-12));
        }
    }

    #[test]
    fn lit_outline_length_stays_in_bounds() {
        for phase in sample_angles() {
            let n = MoonShape::new(phase).lit.len();
            assert!(n >= DISK_POINTS / 2 && n <= 3 * DISK_POINTS / 2, "{} points at {}", n, phase);
        }
    }

    #[test]
    fn new_moon_is_dark() {
        let shape = MoonShape::new(0.0);
        assert!(shape.lit_area() < 0.01, "area {}", shape.lit_area());
        assert!(shape.lit.iter().all(|p| p.x.is_finite() && p.y.is_finite()));
    }

    #[test]
    fn full_moon_covers_the_disk() {
        let shape = MoonShape::new(PI);
        assert!(shape.lit.len() >= DISK_POINTS);
        let disk_area = crate::geometry::signed_area(&shape.disk).abs();
        assert!((shape.lit_area() - disk_area).abs() < 0.05 * disk_area);
    }

    #[test]
    fn area_grows_while_waxing_and_shrinks_while_waning() {
        let steps = 16;
        let areas: Vec<f64> = (0..=2 * steps)
            .map(|i| MoonShape::new(i as f64 * PI / steps as f64).lit_area())
            .collect();
        for i in 0..steps {
            assert!(areas[i + 1] > areas[i], "waxing step {}: {:?}", i, &areas[i..=i + 1]);
        }
        for i in steps..2 * steps - 1 {
            assert!(areas[i + 1] < areas[i], "waning step {}: {:?}", i, &areas[i..=i + 1]);
        }
    }

    #[test]
    fn quarter_moon_is_half_lit() {
        let half = PI / 2.0;
        let area = MoonShape::new(FRAC_PI_2).lit_area();
        assert!((area - half).abs() < 0.05, "area {}", area);
    }

    #[test]
    fn waxing_lights_the_right_limb_and_waning_the_left() {
        assert!(centroid_x(&MoonShape::new(FRAC_PI_2).lit) > 0.2);
        assert!(centroid_x(&MoonShape::new(3.0 * FRAC_PI_2).lit) < -0.2);
    }

    #[test]
    fn one_turn_later_is_the_same_moon() {
        for phase in [0.3, 1.0, 2.5, 4.0, 5.5] {
            let a = MoonShape::new(phase).lit_area();
            let b = MoonShape::new(phase + TAU).lit_area();
            assert!((a - b).abs() < 1e-9, "{} vs {} at {}", a, b, phase);
        }
    }

    #[test]
    fn same_phase_same_outlines() {
        assert_eq!(MoonShape::new(2.2), MoonShape::new(2.2));
    }

    #[test]
    fn terminator_runs_top_to_bottom() {
        let shape = MoonShape::new(1.0);
        let limb_len = DISK_POINTS / 2;
        let terminator = &shape.lit[..shape.lit.len() - limb_len];
        assert!(terminator.windows(2).all(|w| w[0].y >= w[1].y));
        let limb = &shape.lit[shape.lit.len() - limb_len..];
        assert!(limb.windows(2).all(|w| w[0].y <= w[1].y));
    }
}
