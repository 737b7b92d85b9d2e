//! Renders one of the generated reference scenes as EPS on stdout.
//!
//! Usage:
//! ```text
//! cargo run --example render_patches                          # hypercube, dim 2
//! cargo run --example render_patches -- hypercube 3 > cubes.eps
//! cargo run --example render_patches -- cutoff 2 flags.toml > bump.eps
//! ```
//!
//! The optional third argument is a TOML file with render flags, e.g.
//!
//! ```toml
//! height_vector = 0
//! color_vector = 0
//! azimuth = 30.0
//! color_map = "grey_scale"
//! light_direction = [1.0, 1.0, 2.0]
//! ```

use std::io::{self, BufWriter};

use patchplot::error::ConfigError;
use patchplot::patch::{ContinuousPatches, RepeatedHypercube};
use patchplot::{Dimension, PatchStore, RenderEps, RenderFlags, Result};
use tracing::info;

fn main() -> Result<()> {
    // Default: WARN for everything, INFO for patchplot. Logs go to stderr so
    // stdout carries only the document.
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("render_patches=info".parse().unwrap_or_default())
        .add_directive("patchplot=info".parse().unwrap_or_default());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let scene = args.next().unwrap_or_else(|| "hypercube".to_owned());
    let dim = match args.next() {
        Some(d) => d
            .parse()
            .ok()
            .and_then(Dimension::from_usize)
            .ok_or_else(|| ConfigError::InvalidValue(format!("bad dimension `{d}`")))?,
        None => Dimension::Two,
    };
    let flags = match args.next() {
        Some(path) => RenderFlags::from_toml(&std::fs::read_to_string(path)?)?,
        None => default_flags(&scene),
    };

    let store = build_scene(&scene, dim)?;
    info!(
        scene = %scene,
        dim = dim.get(),
        patches = store.len(),
        fields = ?store.names().iter().collect::<Vec<_>>(),
        "scene built"
    );

    let stdout = io::stdout();
    RenderEps::new(flags).write_to(&store, &mut BufWriter::new(stdout.lock()))
}

fn build_scene(name: &str, dim: Dimension) -> Result<PatchStore> {
    match name {
        "hypercube" => {
            let mut store = PatchStore::new(RepeatedHypercube::field_names(), vec![])?;
            RepeatedHypercube::new(dim, Dimension::Three, 4, 3).execute(&mut store)?;
            Ok(store)
        }
        "cutoff" => {
            let mut store = PatchStore::new(ContinuousPatches::field_names(), vec![])?;
            ContinuousPatches::new(dim, 4, 4).execute(&mut store)?;
            Ok(store)
        }
        other => Err(ConfigError::InvalidValue(format!(
            "unknown scene `{other}`, expected `hypercube` or `cutoff`"
        ))
        .into()),
    }
}

/// The hypercube scene lifts and colours by the sample index field `i`.
fn default_flags(scene: &str) -> RenderFlags {
    let index_field = RepeatedHypercube::field_names().index_of("i");
    match (scene, index_field) {
        ("hypercube", Some(i)) => RenderFlags {
            height_vector: i,
            color_vector: i,
            z_scaling: 0.25,
            ..RenderFlags::default()
        },
        _ => RenderFlags::default(),
    }
}
