//! Encapsulated PostScript serialization of a sorted scene.
//!
//! The prolog defines short aliases for the path operators so that each
//! cell fits on one line:
//!
//! ```text
//! m   moveto          l   lineto
//! s   setrgbcolor     sg  setgray
//! lx  lineto closepath stroke
//! lf  lineto closepath fill
//! ```

use crate::math::{Vector2, TOLERANCE};

use super::color::Rgb;
use super::flags::SizeType;
use super::{Cell, RenderFlags, Scene};

/// Decimal places kept for every number in the document.
const PRECISION: usize = 4;

/// Writes a [`Scene`] as an EPS document.
pub struct EpsWriter<'a> {
    flags: &'a RenderFlags,
}

impl<'a> EpsWriter<'a> {
    /// Creates a writer using `flags` for sizing and styling.
    #[must_use]
    pub fn new(flags: &'a RenderFlags) -> Self {
        Self { flags }
    }

    /// Factor from projected coordinates to output points.
    ///
    /// The extent selected by `size_type` is mapped to `size`; when that
    /// extent is degenerate the other one is used, and a picture collapsed
    /// to a point is left unscaled.
    #[must_use]
    pub fn scale(&self, scene: &Scene) -> f64 {
        let b = scene.bounds();
        let (primary, secondary) = match self.flags.size_type {
            SizeType::Width => (b.width(), b.height()),
            SizeType::Height => (b.height(), b.width()),
        };
        if primary > TOLERANCE {
            self.flags.size / primary
        } else if secondary > TOLERANCE {
            self.flags.size / secondary
        } else {
            1.0
        }
    }

    /// Serializes the scene into a complete document.
    #[must_use]
    pub fn write(&self, scene: &Scene) -> String {
        let scale = self.scale(scene);
        let bounds = scene.bounds();
        let mut out = format!(
            "%!PS-Adobe-2.0 EPSF-1.2\n\
             %%Title: patchplot output\n\
             %%Creator: patchplot\n\
             %%BoundingBox: 0 0 {} {}\n",
            bbox_extent(bounds.width() * scale),
            bbox_extent(bounds.height() * scale)
        );
        out.push_str(
            "/m {moveto} bind def\n\
             /l {lineto} bind def\n\
             /s {setrgbcolor} bind def\n\
             /sg {setgray} bind def\n\
             /lx {lineto closepath stroke} bind def\n\
             /lf {lineto closepath fill} bind def\n\
             %%EndProlog\n\n",
        );
        out.push_str(&num(self.flags.line_width));
        out.push_str(" setlinewidth\n");

        let origin = bounds.min;
        let (color_min, color_max) = scene.color_range();
        for cell in scene.cells() {
            let path: Vec<String> = cell
                .vertices
                .iter()
                .map(|p| point((p - origin) * scale))
                .collect();

            if self.flags.draw_cells {
                let fill = if self.flags.shade_cells {
                    self.flags.color_map.map(cell.color_value, color_min, color_max)
                } else {
                    Rgb::WHITE
                };
                out.push_str(&set_color(fill.scaled(cell.intensity)));
                out.push(' ');
                out.push_str(&trace(&path, closing_op(cell)));
                out.push('\n');
            }
            // A segment drawn in its fill colour is its own outline.
            let segment = cell.vertices.len() <= 2;
            if self.flags.draw_mesh && !(self.flags.draw_cells && segment) {
                out.push_str(&set_color(Rgb::BLACK));
                out.push(' ');
                out.push_str(&trace(&path, "lx"));
                out.push('\n');
            }
        }

        out.push_str("showpage\n%%EOF\n");
        out
    }
}

/// Filled cells end in `lf`; segments have no interior and are stroked.
fn closing_op(cell: &Cell) -> &'static str {
    if cell.vertices.len() > 2 {
        "lf"
    } else {
        "lx"
    }
}

fn trace(path: &[String], closing: &str) -> String {
    let mut s = String::new();
    for (i, p) in path.iter().enumerate() {
        let op = if i == 0 {
            "m"
        } else if i + 1 == path.len() {
            closing
        } else {
            "l"
        };
        if i > 0 {
            s.push(' ');
        }
        s.push_str(p);
        s.push(' ');
        s.push_str(op);
    }
    s
}

fn set_color(c: Rgb) -> String {
    if c.is_grey() {
        format!("{} sg", num(c.red))
    } else {
        format!("{} {} {} s", num(c.red), num(c.green), num(c.blue))
    }
}

fn point(p: Vector2) -> String {
    format!("{} {}", num(p.x), num(p.y))
}

/// Extent rounded like the printed coordinates, plus one point of margin.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
fn bbox_extent(extent: f64) -> u64 {
    let unit = 10f64.powi(PRECISION as i32);
    ((extent * unit).round() / unit + 1.0).floor().max(1.0) as u64
}

/// Fixed-precision number without trailing zeros or negative zero.
fn num(x: f64) -> String {
    let mut s = format!("{x:.PRECISION$}");
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn square(x: f64, depth: f64, color_value: f64, index: usize) -> Cell {
        Cell {
            vertices: vec![
                Point2::new(x, 0.0),
                Point2::new(x + 1.0, 0.0),
                Point2::new(x + 1.0, 1.0),
                Point2::new(x, 1.0),
            ],
            depths: vec![depth; 4],
            depth,
            color_value,
            intensity: 1.0,
            patch_order: 0,
            index,
        }
    }

    fn two_squares() -> Scene {
        Scene::new(vec![square(0.0, 0.0, 0.0, 0), square(1.0, 1.0, 1.0, 1)]).unwrap()
    }

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(1.0), "1");
        assert_eq!(num(0.5), "0.5");
        assert_eq!(num(-0.00001), "0");
        assert_eq!(num(-2.25), "-2.25");
        assert_eq!(num(150.0), "150");
        assert_eq!(num(1.0 / 3.0), "0.3333");
    }

    #[test]
    fn bounding_box_absorbs_rounding_noise() {
        assert_eq!(bbox_extent(99.999_999_999), 101);
        assert_eq!(bbox_extent(150.4), 151);
        assert_eq!(bbox_extent(0.0), 1);
    }

    #[test]
    fn header_and_trailer() {
        let flags = RenderFlags::default();
        let doc = EpsWriter::new(&flags).write(&two_squares());
        assert!(doc.starts_with("%!PS-Adobe-2.0 EPSF-1.2\n"));
        // Width 2 scaled to 300, height 1 to 150.
        assert!(doc.contains("%%BoundingBox: 0 0 301 151\n"));
        assert!(doc.contains("%%EndProlog\n\n0.5 setlinewidth\n"));
        assert!(doc.ends_with("showpage\n%%EOF\n"));
    }

    #[test]
    fn cells_are_filled_then_outlined_farthest_first() {
        let flags = RenderFlags {
            color_map: crate::render::ColorMap::GreyScale,
            ..RenderFlags::default()
        };
        let doc = EpsWriter::new(&flags).write(&two_squares());
        let body: Vec<&str> = doc
            .lines()
            .skip_while(|l| !l.ends_with("setlinewidth"))
            .skip(1)
            .take(4)
            .collect();
        assert_eq!(
            body,
            vec![
                "1 sg 150 0 m 300 0 l 300 150 l 150 150 lf",
                "0 sg 150 0 m 300 0 l 300 150 l 150 150 lx",
                "0 sg 0 0 m 150 0 l 150 150 l 0 150 lf",
                "0 sg 0 0 m 150 0 l 150 150 l 0 150 lx",
            ]
        );
    }

    #[test]
    fn rgb_fill_uses_setrgbcolor() {
        let flags = RenderFlags {
            draw_mesh: false,
            ..RenderFlags::default()
        };
        let scene = Scene::new(vec![
            square(0.0, 0.0, 0.0, 0),
            square(1.0, 0.0, 0.5, 1),
            square(2.0, 0.0, 4.0, 2),
        ])
        .unwrap();
        let doc = EpsWriter::new(&flags).write(&scene);
        // 0.5 in [0, 4] lies on the black-to-blue piece.
        assert!(doc.contains("0 0 0.5 s 100 0 m"));
        assert!(!doc.contains(" lx"));
    }

    #[test]
    fn unshaded_cells_are_white() {
        let flags = RenderFlags {
            shade_cells: false,
            draw_mesh: false,
            ..RenderFlags::default()
        };
        let doc = EpsWriter::new(&flags).write(&two_squares());
        assert_eq!(doc.matches("1 sg ").count(), 2);
    }

    #[test]
    fn segments_are_stroked() {
        let flags = RenderFlags {
            draw_mesh: false,
            ..RenderFlags::default()
        };
        let segment = Cell {
            vertices: vec![Point2::new(0.0, 0.0), Point2::new(2.0, 1.0)],
            depths: vec![0.0; 2],
            depth: 0.0,
            color_value: 0.0,
            intensity: 1.0,
            patch_order: 0,
            index: 0,
        };
        let doc = EpsWriter::new(&flags).write(&Scene::new(vec![segment]).unwrap());
        assert!(doc.contains("1 sg 0 0 m 300 150 lx\n"));
        assert!(!doc.contains(" lf"));
    }

    #[test]
    fn segments_are_not_outlined_over_their_colour() {
        let flags = RenderFlags::default();
        let segment = Cell {
            vertices: vec![Point2::new(0.0, 0.0), Point2::new(2.0, 1.0)],
            depths: vec![0.0; 2],
            depth: 0.0,
            color_value: 0.5,
            intensity: 1.0,
            patch_order: 0,
            index: 0,
        };
        let doc = EpsWriter::new(&flags).write(&Scene::new(vec![segment]).unwrap());
        let strokes: Vec<&str> = doc.lines().filter(|l| l.ends_with(" lx")).collect();
        assert_eq!(strokes, vec!["1 sg 0 0 m 300 150 lx"]);

        let mesh_only = RenderFlags {
            draw_cells: false,
            ..RenderFlags::default()
        };
        let doc = EpsWriter::new(&mesh_only).write(&Scene::new(vec![Cell {
            vertices: vec![Point2::new(0.0, 0.0), Point2::new(2.0, 1.0)],
            depths: vec![0.0; 2],
            depth: 0.0,
            color_value: 0.5,
            intensity: 1.0,
            patch_order: 0,
            index: 0,
        }])
        .unwrap());
        assert!(doc.contains("0 sg 0 0 m 300 150 lx\n"));
    }

    #[test]
    fn height_sizing_fixes_the_vertical_extent() {
        let flags = RenderFlags {
            size_type: SizeType::Height,
            size: 100.0,
            ..RenderFlags::default()
        };
        let scene = two_squares();
        let writer = EpsWriter::new(&flags);
        assert!((writer.scale(&scene) - 100.0).abs() < f64::EPSILON);
        assert!(writer.write(&scene).contains("%%BoundingBox: 0 0 201 101\n"));
    }

    #[test]
    fn degenerate_extent_falls_back() {
        let flags = RenderFlags::default();
        let flat = Cell {
            vertices: vec![Point2::new(3.0, 0.0), Point2::new(3.0, 2.0)],
            depths: vec![0.0; 2],
            depth: 0.0,
            color_value: 0.0,
            intensity: 1.0,
            patch_order: 0,
            index: 0,
        };
        let scene = Scene::new(vec![flat]).unwrap();
        assert!((EpsWriter::new(&flags).scale(&scene) - 150.0).abs() < f64::EPSILON);
    }
}
