//! Finite volume mesh

use crate::topology::MeshTopology;
use crate::traits::MeshConstructor;
use crate::types::{RealScalar, PADDING};
use itertools::izip;
use ndarray::{Array1, Array2, ArrayView1};

fn scalar<T: RealScalar>(n: usize) -> T {
    num::cast(n).unwrap_or_else(T::nan)
}

fn cross<T: RealScalar>(a: &[T; 3], b: &[T; 3]) -> [T; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn dot<T: RealScalar>(a: &[T; 3], b: &[T; 3]) -> T {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// A point padded to three components
fn point3<T: RealScalar>(p: ArrayView1<'_, T>) -> [T; 3] {
    let mut out = [T::zero(); 3];
    for (o, c) in izip!(out.iter_mut(), p.iter()) {
        *o = *c;
    }
    out
}

fn sub<T: RealScalar>(a: &[T; 3], b: &[T; 3]) -> [T; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// A mesh of cells bounded by faces, with the geometric quantities used by
/// finite volume discretisations
#[derive(Debug, Clone)]
pub struct FiniteVolumeMesh<T: RealScalar> {
    topology: MeshTopology<T>,
    face_cell_ids: Array2<isize>,
    cell_face_orientations: Array2<i8>,
    face_centers: Array2<T>,
    cell_centers: Array2<T>,
    cell_volumes: Vec<T>,
}

impl<T: RealScalar> FiniteVolumeMesh<T> {
    /// The cells on each side of each face, shape `[2, nfaces]`
    ///
    /// Row 0 holds the first cell found to contain the face. On exterior faces,
    /// row 1 is [`PADDING`].
    pub fn face_cell_ids(&self) -> &Array2<isize> {
        &self.face_cell_ids
    }

    /// Orientation of each face of each cell, shape `[max_faces, ncells]`
    ///
    /// This is 1 if the cell is in row 0 of [`Self::face_cell_ids`] for the
    /// face, -1 if it is in row 1, and 0 for padding.
    pub fn cell_face_orientations(&self) -> &Array2<i8> {
        &self.cell_face_orientations
    }

    /// Is a face on the boundary of the mesh?
    pub fn is_exterior(&self, face: usize) -> bool {
        self.face_cell_ids[[1, face]] == PADDING
    }

    /// The faces on the boundary of the mesh
    pub fn exterior_faces(&self) -> Vec<usize> {
        (0..self.topology.face_count())
            .filter(|f| self.is_exterior(*f))
            .collect()
    }

    /// The faces shared by two cells
    pub fn interior_faces(&self) -> Vec<usize> {
        (0..self.topology.face_count())
            .filter(|f| !self.is_exterior(*f))
            .collect()
    }

    /// Face centres, shape `[coord_dim, nfaces]`
    pub fn face_centers(&self) -> &Array2<T> {
        &self.face_centers
    }

    /// Cell centres, shape `[coord_dim, ncells]`
    pub fn cell_centers(&self) -> &Array2<T> {
        &self.cell_centers
    }

    fn compute_face_cells(topology: &MeshTopology<T>) -> (Array2<isize>, Array2<i8>) {
        let cell_face_ids = topology.cell_face_ids();
        let mut face_cell_ids = Array2::from_elem((2, topology.face_count()), PADDING);
        let mut orientations = Array2::zeros(cell_face_ids.raw_dim());
        for c in 0..topology.cell_count() {
            for (slot, f) in cell_face_ids.column(c).iter().enumerate() {
                if *f == PADDING {
                    continue;
                }
                let f = *f as usize;
                if face_cell_ids[[0, f]] == PADDING {
                    face_cell_ids[[0, f]] = c as isize;
                    orientations[[slot, c]] = 1;
                } else {
                    face_cell_ids[[1, f]] = c as isize;
                    orientations[[slot, c]] = -1;
                }
            }
        }
        (face_cell_ids, orientations)
    }

    fn compute_face_centers(topology: &MeshTopology<T>) -> Array2<T> {
        let n = scalar::<T>(topology.face_vertex_count());
        Array2::from_shape_fn((topology.coord_dim(), topology.face_count()), |(i, f)| {
            topology
                .face_vertices(f)
                .iter()
                .fold(T::zero(), |acc, v| acc + topology.vertex_coords()[[i, *v]])
                / n
        })
    }

    /// The distinct vertices of a cell
    fn cell_vertices(topology: &MeshTopology<T>, cell: usize) -> Vec<usize> {
        let mut vertices = topology
            .cell_faces(cell)
            .flat_map(|f| topology.face_vertices(f).to_vec())
            .collect::<Vec<_>>();
        vertices.sort_unstable();
        vertices.dedup();
        vertices
    }

    fn compute_cell_centers(topology: &MeshTopology<T>) -> Array2<T> {
        let mut centers = Array2::zeros((topology.coord_dim(), topology.cell_count()));
        for (c, mut center) in centers.columns_mut().into_iter().enumerate() {
            let vertices = Self::cell_vertices(topology, c);
            if vertices.is_empty() {
                continue;
            }
            let mut sum = Array1::<T>::zeros(topology.coord_dim());
            for v in &vertices {
                sum = sum + topology.vertex(*v);
            }
            let n = scalar::<T>(vertices.len());
            center.assign(&sum.mapv(|x| x / n));
        }
        centers
    }

    /// Signed areas of 2D cells, from the faces and their orientations
    fn cell_areas(topology: &MeshTopology<T>, orientations: &Array2<i8>) -> Vec<T> {
        let half = T::one() / scalar(2);
        (0..topology.cell_count())
            .map(|c| {
                let mut area = [T::zero(); 3];
                for (f, o) in izip!(
                    topology.cell_face_ids().column(c),
                    orientations.column(c)
                ) {
                    if *f == PADDING {
                        continue;
                    }
                    let face = topology.face_vertices(*f as usize);
                    let a = point3(topology.vertex(face[0]));
                    let b = point3(topology.vertex(face[1]));
                    let x = cross(&a, &b);
                    let sign = if *o < 0 { -T::one() } else { T::one() };
                    for (s, xi) in izip!(area.iter_mut(), x) {
                        *s = *s + sign * xi;
                    }
                }
                if topology.coord_dim() == 2 {
                    area[2] * half
                } else {
                    dot(&area, &area).sqrt() * half
                }
            })
            .collect()
    }

    /// Volumes of 3D cells, as the sum of the tetrahedra formed by each face
    /// and the cell centre
    fn cell_volumes_3d(topology: &MeshTopology<T>, centers: &Array2<T>) -> Vec<T> {
        let sixth = T::one() / scalar(6);
        (0..topology.cell_count())
            .map(|c| {
                let center = point3(centers.column(c));
                topology
                    .cell_faces(c)
                    .map(|f| {
                        let face = topology.face_vertices(f);
                        let a = point3(topology.vertex(face[0]));
                        let b = point3(topology.vertex(face[1]));
                        let d = point3(topology.vertex(face[2]));
                        let n = cross(&sub(&b, &a), &sub(&d, &a));
                        (dot(&n, &sub(&a, &center)) * sixth).abs()
                    })
                    .fold(T::zero(), |acc, v| acc + v)
            })
            .collect()
    }
}

impl<T: RealScalar> MeshConstructor for FiniteVolumeMesh<T> {
    type T = T;

    fn construct(topology: MeshTopology<T>) -> Self {
        let (face_cell_ids, cell_face_orientations) = Self::compute_face_cells(&topology);
        let face_centers = Self::compute_face_centers(&topology);
        let cell_centers = Self::compute_cell_centers(&topology);
        let cell_volumes = if topology.face_vertex_count() == 2 {
            Self::cell_areas(&topology, &cell_face_orientations)
        } else {
            Self::cell_volumes_3d(&topology, &cell_centers)
        };
        Self {
            topology,
            face_cell_ids,
            cell_face_orientations,
            face_centers,
            cell_centers,
            cell_volumes,
        }
    }

    fn topology(&self) -> &MeshTopology<T> {
        &self.topology
    }

    fn cell_volumes(&self) -> Vec<T> {
        self.cell_volumes.clone()
    }
}
