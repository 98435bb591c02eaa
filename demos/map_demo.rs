//! Demonstration of VoronoiMap generation and usage
//!
//! Run with `RUST_LOG=debug` to see the pipeline timings.

use rust_voronoi_map::*;

fn main() -> Result<()> {
    env_logger::init();

    println!("Generating map...");

    let config = MapConfigBuilder::new()
        .seed(42)
        .site_count(200)?
        .smoothing_iterations(10)?
        .lloyd_iterations(2)?
        .tile_count(101)
        .build()?;

    let map = VoronoiMap::generate(config)?;

    println!("Configuration:");
    println!("  Seed: {}", config.seed);
    println!("  Map Size: {}", config.map_size);
    println!("  Sites: {}", config.site_count);
    println!("  Tile Cutoff: {:.2}", config.tile_cutoff());
    println!();

    let triangulation = map.triangulation();
    println!("Triangulation:");
    println!("  Faces: {}", triangulation.face_count());
    println!("  Hull sites: {}", triangulation.hull().len());
    println!("  Skipped sites: {}", triangulation.diagnostics().len());
    println!();

    let total_neighbors: usize = map.tiles().iter().map(|t| t.neighbor_count()).sum();
    let total_area: f32 = map
        .tiles()
        .iter()
        .map(|t| geometry::polygon_signed_area(&t.polygon))
        .sum();
    println!("Generated {} tiles", map.tile_count());
    println!(
        "  Average neighbors per tile: {:.2}",
        total_neighbors as f32 / map.tile_count() as f32
    );
    println!("  Covered area: {:.2} of {:.2}", total_area, config.bounds().area());

    println!("\nSample tiles:");
    for tile in map.tiles().iter().take(5) {
        println!(
            "  Tile {}: site={}, center=({:.2}, {:.2}), neighbors={:?}",
            tile.id, tile.site, tile.center.x, tile.center.z, tile.neighbors
        );
    }

    #[cfg(feature = "spatial-index")]
    {
        let pos = Vec2::new(0.0, 0.0);
        match map.find_tile_at(pos) {
            Some(id) => {
                println!("\nPosition {:?} is in tile {}", pos, id);
                let nearby = map.tiles_within_hops(id, 2);
                println!("Found {} tiles within 2 hops of tile {}", nearby.len(), id);
            }
            None => println!("\nPosition {:?} is outside the map", pos),
        }
    }

    let mesh = map.mesh();
    println!("\nMesh statistics:");
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());

    Ok(())
}
