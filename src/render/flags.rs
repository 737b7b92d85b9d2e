use serde::Deserialize;

use crate::error::{ConfigError, Result};

use super::color::ColorMap;

/// Which extent of the picture the `size` flag fixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeType {
    /// `size` is the width of the bounding box.
    #[default]
    Width,
    /// `size` is the height of the bounding box.
    Height,
}

/// Parameters controlling how patches are projected and drawn.
///
/// An immutable value passed to each render call. Every field is optional
/// when parsed; omitted fields keep their [`Default`] value.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderFlags {
    /// Field driving the height offset.
    pub height_vector: usize,
    /// Field driving the fill colour.
    pub color_vector: usize,
    /// Factor applied to the height field before displacing.
    pub z_scaling: f64,
    /// Rotation of the viewer around the vertical axis, in degrees.
    pub azimuth: f64,
    /// Angle of the viewer above the base plane, in degrees.
    pub elevation: f64,
    /// Extent of the output along `size_type`, in PostScript points.
    pub size: f64,
    /// Which extent `size` fixes.
    pub size_type: SizeType,
    /// Width of mesh lines.
    pub line_width: f64,
    /// Emit a filled polygon per cell.
    pub draw_cells: bool,
    /// Emit the cell outline.
    pub draw_mesh: bool,
    /// Colour fills by the colour field; otherwise fill white.
    pub shade_cells: bool,
    /// Mapping from field values to colours.
    pub color_map: ColorMap,
    /// Direction the light comes from; `None` disables lighting.
    pub light_direction: Option<[f64; 3]>,
    /// Fraction of the intensity that does not depend on the light.
    pub ambient: f64,
    /// Project patches on the rayon thread pool.
    pub parallel: bool,
}

impl Default for RenderFlags {
    fn default() -> Self {
        Self {
            height_vector: 0,
            color_vector: 0,
            z_scaling: 1.0,
            azimuth: 45.0,
            // Isometric: the view direction makes equal angles with all axes.
            elevation: (1.0_f64 / 3.0_f64.sqrt()).asin().to_degrees(),
            size: 300.0,
            size_type: SizeType::Width,
            line_width: 0.5,
            draw_cells: true,
            draw_mesh: true,
            shade_cells: true,
            color_map: ColorMap::Default,
            light_direction: None,
            ambient: 0.3,
            parallel: true,
        }
    }
}

impl RenderFlags {
    /// Parses flags from a TOML document and validates them.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for syntax errors, unknown keys, or
    /// mistyped values, and [`ConfigError::InvalidValue`] for values out of range.
    pub fn from_toml(content: &str) -> Result<Self> {
        let flags: Self = toml::from_str(content).map_err(ConfigError::from)?;
        flags.validate()?;
        Ok(flags)
    }

    /// Checks that every numeric flag is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending flag.
    pub fn validate(&self) -> Result<()> {
        let invalid =
            |msg: &str| -> Result<()> { Err(ConfigError::InvalidValue(msg.to_owned()).into()) };

        if !(self.size.is_finite() && self.size > 0.0) {
            return invalid("size must be a positive number");
        }
        if !(self.line_width.is_finite() && self.line_width >= 0.0) {
            return invalid("line_width must be a non-negative number");
        }
        if !self.z_scaling.is_finite() {
            return invalid("z_scaling must be finite");
        }
        if !(self.azimuth.is_finite() && self.elevation.is_finite()) {
            return invalid("view angles must be finite");
        }
        if !(0.0..=1.0).contains(&self.ambient) {
            return invalid("ambient must lie in [0, 1]");
        }
        if let Some(dir) = self.light_direction {
            let len2: f64 = dir.iter().map(|c| c * c).sum();
            if !len2.is_finite() || len2 <= 0.0 {
                return invalid("light_direction must be a finite non-zero vector");
            }
        }
        Ok(())
    }
}
