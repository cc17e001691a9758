use fvgrid::io::gmsh::{GmshOptions, MeshDimensions, PartitionedGmshFile};

/// Partitioned mesh import
///
/// Each partition of a partitioned Gmsh mesh reads the cells it owns and the
/// ghost cells that neighbour them
fn main() {
    env_logger::init();

    for local in 1..=2 {
        let p = PartitionedGmshFile::<f64>::open(
            "tests/meshes/partitioned.msh",
            MeshDimensions::planar(),
            local,
            &GmshOptions::default(),
        )
        .unwrap();
        println!(
            "partition {local}: {} owned cells, {} ghost cells",
            p.owned_cell_count(),
            p.ghost_cell_count()
        );
        for r in p.records() {
            println!(
                "  cell {} (global {}): {:?}",
                r.local_index, r.global_id, r.ownership
            );
        }
    }
}
