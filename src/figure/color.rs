use plotters::style::RGBColor;
use serde::{Deserialize, Serialize};

/// Inverse of the golden ratio; successive hues are this far apart.
pub const GOLDEN_HUE_STEP: f64 = 0.618_033_988_749_895;
pub const AUTO_SATURATION: f64 = 0.75;
pub const AUTO_VALUE: f64 = 0.95;

/// HSV triple with components in `[0, 1]`, serialized as `[h, s, v]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv(pub f64, pub f64, pub f64);

impl Hsv {
    #[must_use]
    pub const fn new(h: f64, s: f64, v: f64) -> Self {
        Self(h, s, v)
    }

    /// Gray level (`s = 0`).
    #[must_use]
    pub const fn gray(v: f64) -> Self {
        Self(0.0, 0.0, v)
    }

    /// Six-sector HSV to RGB conversion. Hues outside `[0, 1)` wrap around.
    #[must_use]
    pub fn to_rgb_f64(self) -> (f64, f64, f64) {
        let Hsv(h, s, v) = self;
        if s == 0.0 {
            return (v, v, v);
        }
        let scaled = h * 6.0;
        let sector = scaled.floor();
        let f = scaled - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));
        match sector.rem_euclid(6.0) as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        }
    }

    #[must_use]
    pub fn to_rgb(self) -> RGBColor {
        let (r, g, b) = self.to_rgb_f64();
        RGBColor(channel(r), channel(g), channel(b))
    }
}

fn channel(value: f64) -> u8 {
    // Clamped to [0, 255] before the cast.
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Hands out the automatic colors of one figure.
///
/// Each figure starts at the same hue so that re-rendering a description
/// always yields the same palette.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HueWalk {
    hue: f64,
}

impl Default for HueWalk {
    fn default() -> Self {
        Self {
            hue: GOLDEN_HUE_STEP,
        }
    }
}

impl HueWalk {
    #[must_use]
    pub fn next_color(&mut self) -> Hsv {
        let color = Hsv(self.hue, AUTO_SATURATION, AUTO_VALUE);
        self.hue = (self.hue - GOLDEN_HUE_STEP).rem_euclid(1.0);
        color
    }

    /// Returns `explicit` when set, otherwise the next automatic color.
    pub fn resolve(&mut self, explicit: Option<Hsv>) -> Hsv {
        explicit.unwrap_or_else(|| self.next_color())
    }
}
