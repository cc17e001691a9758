//! Test input/output
#![cfg(feature = "serde")]
use fvgrid::{
    gmsh_3d,
    io::gmsh::{GmshOptions, MeshDimensions},
    topology::MeshTopology,
    traits::{RONExport, RONImport},
    GmshFile,
};
use std::path::PathBuf;

fn relative_file(filename: &str) -> String {
    let file = PathBuf::from(file!());
    let dir = file.parent().unwrap();
    format!("{}/meshes/{filename}", dir.display())
}

#[test]
fn test_imported_topology_ron_io() {
    let t = GmshFile::<f64>::open(
        relative_file("mixed.msh").as_str(),
        MeshDimensions::planar(),
        &GmshOptions::default(),
    )
    .unwrap()
    .into_topology();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mixed.ron");
    t.export_as_ron(&path).unwrap();

    let t2 = MeshTopology::<f64>::import_from_ron(&path).unwrap();
    assert_eq!(t2, t);
}

#[test]
fn test_volume_topology_ron_string() {
    let m = gmsh_3d::<f32>(relative_file("two_tets.msh").as_str()).unwrap();
    let s = m.topology().to_ron_string().unwrap();
    let t = MeshTopology::<f32>::from_ron_string(&s).unwrap();
    assert_eq!(&t, m.topology());
    assert_eq!(t.face_count(), 7);
}

#[test]
fn test_options_from_ron() {
    let options =
        GmshOptions::from_ron_str("(verbosity: 3, timeout: (secs: 5, nanos: 0))").unwrap();
    assert_eq!(options.verbosity, 3);
    assert_eq!(options.timeout, std::time::Duration::from_secs(5));
    assert_eq!(
        options,
        GmshOptions::default()
            .with_verbosity(3)
            .with_timeout(std::time::Duration::from_secs(5))
    );
}
