//! Ordered colour stops evaluated over [0, 1].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Color;

/// Errors raised while building a gradient.
#[derive(Error, Debug, PartialEq)]
pub enum GradientError {
    #[error("Gradient needs at least one colour stop")]
    NoStops,
    #[error("Gradient stop position {0} is outside [0, 1]")]
    PositionOutOfRange(f32),
}

/// How colours between two stops are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientMode {
    /// Linear interpolation between the bracketing stops.
    #[default]
    Blend,
    /// The colour of the next stop at or above `t`, without interpolation.
    Fixed,
}

/// A single colour stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position in [0, 1].
    pub position: f32,
    pub color: Color,
}

impl GradientStop {
    pub fn new(position: f32, color: Color) -> Self {
        Self { position, color }
    }
}

/// Maps a normalized scalar to a colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGradient", into = "RawGradient")]
pub struct ColorGradient {
    stops: Vec<GradientStop>,
    mode: GradientMode,
}

impl ColorGradient {
    /// Creates a gradient; stops are sorted by position.
    pub fn new(mut stops: Vec<GradientStop>, mode: GradientMode) -> Result<Self, GradientError> {
        if stops.is_empty() {
            return Err(GradientError::NoStops);
        }
        if let Some(bad) = stops
            .iter()
            .find(|s| !(0.0..=1.0).contains(&s.position))
        {
            return Err(GradientError::PositionOutOfRange(bad.position));
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { stops, mode })
    }

    /// Ocean-to-snow palette for an Earth-like planet.
    pub fn terrain() -> Self {
        Self {
            stops: vec![
                GradientStop::new(0.0, Color::from_rgb8(12, 30, 80)),
                GradientStop::new(0.90, Color::from_rgb8(28, 88, 160)),
                GradientStop::new(0.93, Color::from_rgb8(214, 196, 140)),
                GradientStop::new(0.95, Color::from_rgb8(72, 132, 52)),
                GradientStop::new(0.975, Color::from_rgb8(96, 84, 70)),
                GradientStop::new(1.0, Color::from_rgb8(245, 245, 250)),
            ],
            mode: GradientMode::Blend,
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    pub fn mode(&self) -> GradientMode {
        self.mode
    }

    /// Returns the colour at `t`; `t` is clamped to [0, 1].
    pub fn evaluate(&self, t: f32) -> Color {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

        // Index of the first stop strictly above t.
        let upper = self.stops.partition_point(|s| s.position <= t);
        if upper == 0 {
            return self.stops[0].color;
        }
        if upper == self.stops.len() {
            return self.stops[upper - 1].color;
        }

        let lo = self.stops[upper - 1];
        let hi = self.stops[upper];
        match self.mode {
            GradientMode::Fixed => {
                if t <= lo.position {
                    lo.color
                } else {
                    hi.color
                }
            }
            GradientMode::Blend => {
                let span = hi.position - lo.position;
                if span <= f32::EPSILON {
                    hi.color
                } else {
                    lo.color.lerp(hi.color, (t - lo.position) / span)
                }
            }
        }
    }
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self::terrain()
    }
}

#[derive(Serialize, Deserialize)]
struct RawGradient {
    stops: Vec<GradientStop>,
    #[serde(default)]
    mode: GradientMode,
}

impl TryFrom<RawGradient> for ColorGradient {
    type Error = GradientError;

    fn try_from(raw: RawGradient) -> Result<Self, Self::Error> {
        ColorGradient::new(raw.stops, raw.mode)
    }
}

impl From<ColorGradient> for RawGradient {
    fn from(gradient: ColorGradient) -> Self {
        RawGradient {
            stops: gradient.stops,
            mode: gradient.mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn black_to_white(mode: GradientMode) -> ColorGradient {
        ColorGradient::new(
            vec![
                GradientStop::new(1.0, Color::WHITE),
                GradientStop::new(0.0, Color::BLACK),
            ],
            mode,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_gradient_rejected() {
        assert_eq!(
            ColorGradient::new(vec![], GradientMode::Blend),
            Err(GradientError::NoStops)
        );
    }

    #[test]
    fn test_out_of_range_stop_rejected() {
        let result = ColorGradient::new(
            vec![GradientStop::new(1.5, Color::WHITE)],
            GradientMode::Blend,
        );
        assert_eq!(result, Err(GradientError::PositionOutOfRange(1.5)));
    }

    #[test]
    fn test_blend_interpolates() {
        let g = black_to_white(GradientMode::Blend);
        assert_eq!(g.evaluate(0.0), Color::BLACK);
        assert_eq!(g.evaluate(1.0), Color::WHITE);
        let quarter = g.evaluate(0.25);
        assert!((quarter.r - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_steps() {
        let g = black_to_white(GradientMode::Fixed);
        assert_eq!(g.evaluate(0.0), Color::BLACK);
        assert_eq!(g.evaluate(0.01), Color::WHITE);
        assert_eq!(g.evaluate(0.99), Color::WHITE);
    }

    #[test]
    fn test_clamps_outside_unit_range() {
        let g = black_to_white(GradientMode::Blend);
        assert_eq!(g.evaluate(-3.0), Color::BLACK);
        assert_eq!(g.evaluate(7.0), Color::WHITE);
        assert_eq!(g.evaluate(f32::NAN), Color::BLACK);
    }

    #[test]
    fn test_single_stop_is_constant() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let g = ColorGradient::new(vec![GradientStop::new(0.5, red)], GradientMode::Blend).unwrap();
        assert_eq!(g.evaluate(0.0), red);
        assert_eq!(g.evaluate(1.0), red);
    }

    #[test]
    fn test_serde_validates() {
        let g = ColorGradient::terrain();
        let json = serde_json::to_string(&g).unwrap();
        let back: ColorGradient = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);

        let bad = r#"{"stops":[],"mode":"blend"}"#;
        assert!(serde_json::from_str::<ColorGradient>(bad).is_err());
    }
}
