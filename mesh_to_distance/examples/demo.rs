//! Convert an OBJ mesh to a distance texture.
//!
//! ```sh
//! cargo run --example demo --features serde -- [mesh.obj] [resolution] [u8|u16]
//! ```
//!
//! Writes `<mesh>.bin` (the texture and its metadata) and `<mesh>.json` (the metadata)
//! next to the mesh.

use anyhow::Context;
use mesh_to_distance::{BitDepth, Grid, Mesh, Options};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .unwrap_or_else(|| "assets/tetrahedron.obj".to_owned());
    let resolution = match args.next() {
        Some(resolution) => resolution
            .parse::<usize>()
            .with_context(|| format!("invalid resolution `{resolution}`"))?,
        None => 64,
    };
    let bits = match args.next().as_deref() {
        None | Some("u8") => BitDepth::U8,
        Some("u16") => BitDepth::U16,
        Some(other) => anyhow::bail!("unknown texture format `{other}`, expected u8 or u16"),
    };

    let mesh: Mesh = Mesh::load_obj(&path, false).with_context(|| format!("loading {path}"))?;
    println!("vertices: {:?}", mesh.vertices().len());
    println!("triangles: {:?}", mesh.triangles().len());

    if let Err(e) = mesh.check_watertight() {
        log::warn!("{e}");
    }
    let warnings = mesh.check_consistency();
    if !warnings.is_empty() {
        log::warn!(
            "{} consistency warning(s), the sign of the field may be wrong",
            warnings.len()
        );
    }

    let (min, max) = mesh.bounding_box();
    let grid = Grid::fit_to_bounding_box(&min, &max, resolution)?;
    println!("grid size: {:?}", grid.get_cell_count());

    let options = Options {
        bits,
        ..Options::default()
    };
    let texture = mesh_to_distance::generate_texture(&mesh, &grid, &options)?;

    let output = std::path::Path::new(&path);
    let binary = output.with_extension("bin");
    let json = output.with_extension("json");
    mesh_to_distance::save_to_file(&texture, &binary)
        .with_context(|| format!("writing {}", binary.display()))?;
    std::fs::write(&json, mesh_to_distance::metadata_to_json(&texture.metadata)?)?;

    println!(
        "distances: [{}, {}]",
        texture.metadata.distance_min, texture.metadata.distance_max
    );
    println!("written {} and {}", binary.display(), json.display());

    Ok(())
}
