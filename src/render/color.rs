//! Colour ramps mapping a field value to an RGB triple.

use serde::Deserialize;

/// RGB colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
}

impl Rgb {
    /// Create a colour from its components.
    #[must_use]
    pub const fn new(red: f64, green: f64, blue: f64) -> Self {
        Self { red, green, blue }
    }

    /// Create a grey of the given intensity.
    #[must_use]
    pub const fn grey(value: f64) -> Self {
        Self::new(value, value, value)
    }

    /// Returns `true` if all three components are equal.
    #[allow(clippy::float_cmp)]
    #[must_use]
    pub fn is_grey(&self) -> bool {
        self.red == self.green && self.green == self.blue
    }

    /// Multiplies every component by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.red * factor, self.green * factor, self.blue * factor)
    }

    pub const WHITE: Rgb = Rgb::grey(1.0);
    pub const BLACK: Rgb = Rgb::grey(0.0);
}

/// Ramp used to colour cells by their field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMap {
    /// Blue through green and red to white.
    #[default]
    Default,
    /// Black at the minimum, white at the maximum.
    GreyScale,
    /// White at the minimum, black at the maximum.
    ReverseGreyScale,
}

impl ColorMap {
    /// Maps `x` within `[min, max]` to a colour.
    ///
    /// A degenerate range (all cells share one value) maps to white.
    #[must_use]
    pub fn map(self, x: f64, min: f64, max: f64) -> Rgb {
        let dif = max - min;
        if dif <= 0.0 {
            return Rgb::WHITE;
        }
        let x = x.clamp(min, max);
        match self {
            Self::Default => default_ramp(x, min, max),
            Self::GreyScale => Rgb::grey((x - min) / dif),
            Self::ReverseGreyScale => Rgb::grey((max - x) / dif),
        }
    }
}

/// Four linear pieces: black→blue, blue→green, green→red, red→white.
fn default_ramp(x: f64, min: f64, max: f64) -> Rgb {
    let sum = min + max;
    let sum13 = min + 3.0 * max;
    let sum22 = 2.0 * min + 2.0 * max;
    let sum31 = 3.0 * min + max;
    let rezdif = 1.0 / (max - min);

    let rgb = if x < sum31 / 4.0 {
        Rgb::new(0.0, 0.0, 4.0 * (x - min) * rezdif)
    } else if x < sum22 / 4.0 {
        Rgb::new(0.0, (4.0 * x - 3.0 * min - max) * rezdif, (sum22 - 4.0 * x) * rezdif)
    } else if x < sum13 / 4.0 {
        Rgb::new((4.0 * x - 2.0 * sum) * rezdif, (sum13 - 4.0 * x) * rezdif, 0.0)
    } else {
        Rgb::new(1.0, (4.0 * x - min - 3.0 * max) * rezdif, (4.0 * x - sum13) * rezdif)
    };
    Rgb::new(
        rgb.red.clamp(0.0, 1.0),
        rgb.green.clamp(0.0, 1.0),
        rgb.blue.clamp(0.0, 1.0),
    )
}
