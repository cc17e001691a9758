use fvgrid::gmsh_2d;
use fvgrid::traits::MeshConstructor;

/// Mesh import
///
/// Demonstration of importing a mesh from a Gmsh file and reading its topology
///
/// Pass the path of a `.msh` file to import it instead of the built in mesh
fn main() {
    env_logger::init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("tests/meshes/mixed.msh"));

    // A 2D mesh with 2D coordinates
    let m = gmsh_2d::<f64>(path.as_str(), None).unwrap();
    let t = m.topology();
    println!(
        "{} vertices, {} faces, {} cells",
        t.vertex_count(),
        t.face_count(),
        t.cell_count()
    );

    // Print the faces of each cell. Cells with fewer faces than others are padded
    for c in 0..t.cell_count() {
        println!("cell {c}: faces {:?}", t.cell_faces(c).collect::<Vec<_>>());
    }

    // The faces on the boundary of the mesh have only one cell
    println!("exterior faces: {:?}", m.mesh().exterior_faces());

    // Volumes of 2D meshes are the absolute cell areas
    println!("cell volumes: {:?}", m.cell_volumes());
    println!("signed cell areas: {:?}", m.mesh().cell_volumes());
}
