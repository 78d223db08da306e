use crate::config::SpiralParams;
use crate::error::{PosterError, Result};
use crate::geometry::Point;

/// A day's place on the spiral.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpiralPoint {
    pub position: Point,
    pub radius: f64,
    /// Clock-face angle: 0 at twelve o'clock, increasing clockwise.
    pub theta: f64,
}

/// Logarithmic spiral validated for every day up to `max_day`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spiral {
    params: SpiralParams,
    max_day: u32,
}

impl Spiral {
    pub fn new(params: SpiralParams, max_day: u32) -> Result<Self> {
        for (name, value) in [("a", params.a), ("b", params.b), ("ds", params.ds)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(PosterError::InvalidSpiralParameter { name, value });
            }
        }

        let spiral = Self { params, max_day };
        if let Some(day) = (1..=max_day).find(|&day| spiral.log_argument(day) <= 0.0) {
            return Err(PosterError::InvalidSpiral {
                a: params.a,
                b: params.b,
                ds: params.ds,
                day,
                argument: spiral.log_argument(day),
            });
        }
        Ok(spiral)
    }

    pub fn params(&self) -> SpiralParams {
        self.params
    }

    fn log_argument(&self, day: u32) -> f64 {
        let SpiralParams { a, b, ds } = self.params;
        1.0 - (b / a) * ds * day as f64
    }

    /// Position of `day`, evenly spaced in arclength from the outside in.
    pub fn position(&self, day: u32) -> SpiralPoint {
        debug_assert!(day >= 1 && day <= self.max_day, "day {} outside 1..={}", day, self.max_day);
        let SpiralParams { a, b, .. } = self.params;
        let theta = -(1.0 / b) * self.log_argument(day).ln();
        let radius = a * (-b * theta).exp();
        SpiralPoint {
            position: Point::on_clock(radius, theta),
            radius,
            theta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_DAYS_IN_MONTH;

    fn production() -> Spiral {
        Spiral::new(SpiralParams::default(), MAX_DAYS_IN_MONTH).expect("default spiral is valid")
    }

    #[test]
    fn radius_shrinks_every_day() {
        let spiral = production();
        let radii: Vec<f64> = (1..=MAX_DAYS_IN_MONTH).map(|d| spiral.position(d).radius).collect();
        assert!(radii.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn days_never_share_a_spot() {
        let spiral = production();
        let points: Vec<Point> = (1..=MAX_DAYS_IN_MONTH).map(|d| spiral.position(d).position).collect();
        for (i, p) in points.iter().enumerate() {
            for q in &points[i + 1..] {
                assert!(p.distance(*q) > 1e-3);
            }
        }
    }

    #[test]
    fn radius_matches_closed_form() {
        let spiral = production();
        let SpiralParams { a, b, ds } = spiral.params();
        for day in [1, 15, 31] {
            let s = ds * day as f64;
            let point = spiral.position(day);
            assert!((point.radius - (a - b * s)).abs() < 1e-12);
            assert!((point.position.norm() - point.radius).abs() < 1e-12);
        }
    }

    #[test]
    fn first_day_sits_just_past_twelve() {
        let point = production().position(1);
        assert!((point.theta - 0.21979).abs() < 1e-4, "theta {}", point.theta);
        assert!(point.position.x > 0.0 && point.position.y > 0.0);
    }

    #[test]
    fn spacing_that_runs_out_of_spiral_is_rejected() {
        let params = SpiralParams { a: 0.8, b: 0.1, ds: 0.3 };
        match Spiral::new(params, 31) {
            Err(PosterError::InvalidSpiral { day, argument, .. }) => {
                assert_eq!(day, 27);
                assert!(argument <= 0.0);
            }
            other => panic!("expected InvalidSpiral, got {:?}", other),
        }
        // the same spiral is fine for shorter months
        assert!(Spiral::new(params, 26).is_ok());
    }

    #[test]
    fn non_positive_parameters_are_rejected() {
        let params = SpiralParams { b: 0.0, ..SpiralParams::default() };
        assert!(matches!(
            Spiral::new(params, 31),
            Err(PosterError::InvalidSpiralParameter { name: "b", .. })
        ));
        let params = SpiralParams { a: f64::NAN, ..SpiralParams::default() };
        assert!(matches!(
            Spiral::new(params, 31),
            Err(PosterError::InvalidSpiralParameter { name: "a", .. })
        ));
    }
}
