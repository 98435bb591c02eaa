//! Builds every decorative shape and prints its mesh size

use rust_voronoi_map::shapes;
use rust_voronoi_map::{MeshData, Result};

fn report(name: &str, mesh: &MeshData) {
    println!(
        "  {:<12} {:>4} vertices, {:>3} triangles",
        name,
        mesh.vertex_count(),
        mesh.triangle_count()
    );
}

fn main() -> Result<()> {
    env_logger::init();

    println!("Decorative shapes:");
    report("flag", &shapes::flag_mesh()?);
    report("small flag", &shapes::small_flag_mesh()?);
    report("crown", &shapes::crown_mesh()?);
    report("decal", &shapes::decal_mesh()?);
    report("dot", &shapes::dot_mesh(0.05, 12)?);
    report("indicator", &shapes::indicator_mesh()?);
    report("star", &shapes::star_mesh()?);
    report("wheel", &shapes::wheel_mesh()?);
    report("mine base", &shapes::mine_base_mesh());

    Ok(())
}
