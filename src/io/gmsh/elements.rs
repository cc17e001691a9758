//! The `$Elements` section

use crate::error::{MeshImportError, Result};
use crate::topology::CellTable;
use crate::types::{ShapeTable, ShapeType};
use log::{debug, trace};
use std::io::BufRead;

/// One row of an `$Elements` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRow {
    /// Element ID in the file
    pub id: usize,
    /// Gmsh element type code
    pub code: i64,
    /// Tags
    pub tags: Vec<i64>,
    /// Node IDs
    pub nodes: Vec<usize>,
}

impl ElementRow {
    /// Parse a row of the form `<id> <type> <ntags> <tags...> <nodes...>`
    ///
    /// `line` is only used in error messages.
    pub fn parse(row: &str, line: usize) -> Result<Self> {
        let fields = row.split_whitespace().collect::<Vec<_>>();
        let field = |i: usize, what: &str| -> Result<i64> {
            let f = fields.get(i).ok_or_else(|| {
                MeshImportError::parse("Elements", line, format!("missing {what}"))
            })?;
            f.parse().map_err(|_| {
                MeshImportError::parse("Elements", line, format!("invalid {what} `{f}`"))
            })
        };
        let id = usize::try_from(field(0, "element ID")?)
            .map_err(|_| MeshImportError::parse("Elements", line, "negative element ID"))?;
        let code = field(1, "element type")?;
        let ntags = usize::try_from(field(2, "tag count")?)
            .map_err(|_| MeshImportError::parse("Elements", line, "negative tag count"))?;
        let tags = (3..3 + ntags)
            .map(|i| field(i, "tag"))
            .collect::<Result<Vec<_>>>()?;
        let nodes = (3 + ntags..fields.len())
            .map(|i| {
                usize::try_from(field(i, "node ID")?)
                    .map_err(|_| MeshImportError::parse("Elements", line, "negative node ID"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            id,
            code,
            tags,
            nodes,
        })
    }

    /// The shape of this element, if it is a cell of the mesh
    ///
    /// An error is returned if the element is a cell but has the wrong number of nodes.
    fn cell_shape(&self, shapes: &ShapeTable, line: usize) -> Result<Option<ShapeType>> {
        let Some(shape) = shapes.recognise(self.code) else {
            trace!("Skipping element {} of type {}", self.id, self.code);
            return Ok(None);
        };
        if self.nodes.len() != shape.vertex_count() {
            return Err(MeshImportError::parse(
                "Elements",
                line,
                format!(
                    "{shape:?} element {} has {} nodes, expected {}",
                    self.id,
                    self.nodes.len(),
                    shape.vertex_count()
                ),
            ));
        }
        Ok(Some(shape))
    }
}

/// Iterate over the element rows of a section, skipping the count line and blank lines
fn rows<R: BufRead>(section: R) -> impl Iterator<Item = Result<(usize, ElementRow)>> {
    section
        .lines()
        .enumerate()
        .filter(|(_, line)| !matches!(line, Ok(l) if l.trim().is_empty()))
        .enumerate()
        .filter_map(|(i, (n, line))| match line {
            Err(e) => Some(Err(e.into())),
            Ok(_) if i == 0 => None,
            Ok(line) => Some(ElementRow::parse(&line, n + 1).map(|row| (n + 1, row))),
        })
}

/// Read the cells of a `$Elements` section
///
/// Elements whose type is not in `shapes` (such as lines and points on the
/// boundary) are skipped. The node IDs of the returned cells are the IDs used
/// in the file.
pub fn parse<R: BufRead>(section: R, shapes: &ShapeTable) -> Result<CellTable> {
    let mut cells = CellTable::new();
    for row in rows(section) {
        let (line, row) = row?;
        if let Some(shape) = row.cell_shape(shapes, line)? {
            cells.add_cell(row.nodes, shape)?;
        }
    }
    debug!("Read {} cells", cells.cell_count());
    Ok(cells)
}

/// How an element relates to the local partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The element belongs to the local partition
    Owned,
    /// The element belongs to another partition and neighbours the local partition
    Ghost {
        /// The partition that owns the element
        owner: usize,
    },
    /// The element is not needed by the local partition
    Irrelevant,
}

/// Classify an element from its tags
///
/// The last tag is the partition of the element. If it is negative, the
/// element is a ghost of partition `-tag`, and the second to last tag is the
/// partition that owns it.
pub fn classify(tags: &[i64], local: usize) -> Classification {
    let local = local as i64;
    let Some(&part) = tags.last() else {
        return Classification::Irrelevant;
    };
    if part == local {
        return Classification::Owned;
    }
    if part >= 0 || tags.len() < 2 {
        return Classification::Irrelevant;
    }
    let owner = tags[tags.len() - 2];
    if -part == local {
        match usize::try_from(owner) {
            Ok(owner) => Classification::Ghost { owner },
            Err(_) => Classification::Irrelevant,
        }
    } else if owner == local {
        Classification::Owned
    } else {
        Classification::Irrelevant
    }
}

/// Cells read from a partitioned mesh, with their IDs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementRecords {
    /// The cells
    pub cells: CellTable,
    /// The element ID of each cell in the file
    pub file_ids: Vec<usize>,
    /// The global ID of each cell
    pub global_ids: Vec<usize>,
    /// The partition that owns each cell
    pub owners: Vec<usize>,
}

impl ElementRecords {
    fn push(
        &mut self,
        row: ElementRow,
        shape: ShapeType,
        global_id: usize,
        owner: usize,
    ) -> Result<()> {
        self.cells.add_cell(row.nodes, shape)?;
        self.file_ids.push(row.id);
        self.global_ids.push(global_id);
        self.owners.push(owner);
        Ok(())
    }

    /// Number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.cell_count()
    }
}

/// The cells of a partitioned mesh that the local partition needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionedCells {
    /// Cells owned by the local partition
    pub owned: ElementRecords,
    /// Cells owned by other partitions that neighbour the local partition
    pub ghosts: ElementRecords,
    /// The element ID of the first cell in the file. Global IDs count from this
    pub id_offset: Option<usize>,
}

/// Read the cells of a `$Elements` section that the partition `local` needs
///
/// Partitions are numbered from 1. Global cell IDs are the element IDs in the
/// file minus the ID of the first cell in the file, so they agree between
/// partitions reading the same file.
pub fn parse_partitioned<R: BufRead>(
    section: R,
    shapes: &ShapeTable,
    local: usize,
) -> Result<PartitionedCells> {
    let mut result = PartitionedCells::default();
    for row in rows(section) {
        let (line, row) = row?;
        let Some(shape) = row.cell_shape(shapes, line)? else {
            continue;
        };
        let offset = *result.id_offset.get_or_insert(row.id);
        let global_id = row.id.checked_sub(offset).ok_or_else(|| {
            MeshImportError::parse(
                "Elements",
                line,
                format!("element {} comes after element {offset}", row.id),
            )
        })?;
        match classify(&row.tags, local) {
            Classification::Owned => result.owned.push(row, shape, global_id, local)?,
            Classification::Ghost { owner } => result.ghosts.push(row, shape, global_id, owner)?,
            Classification::Irrelevant => {}
        }
    }
    debug!(
        "Partition {local}: {} owned cells, {} ghost cells",
        result.owned.cell_count(),
        result.ghosts.cell_count()
    );
    Ok(result)
}

#[cfg(test)]
mod test {
    use super::*;

    const ELEMENTS: &str = "5
1 1 2 1 1 1 2
2 2 4 6 1 1 1 1 2 5
3 2 5 6 1 2 1 -2 1 5 4
4 2 5 6 1 2 2 -1 2 3 5
5 2 4 6 1 1 2 3 6 5
";

    #[test]
    fn test_parse_row() {
        let row = ElementRow::parse("3 2 5 6 1 2 1 -2 1 5 4", 4).unwrap();
        assert_eq!(row.id, 3);
        assert_eq!(row.code, 2);
        assert_eq!(row.tags, vec![6, 1, 2, 1, -2]);
        assert_eq!(row.nodes, vec![1, 5, 4]);
    }

    #[test]
    fn test_parse_row_errors() {
        assert!(matches!(
            ElementRow::parse("3 2 5 6 1", 7),
            Err(MeshImportError::Parse { line: 7, .. })
        ));
        assert!(ElementRow::parse("3 2 0 1 b 3", 1).is_err());
        assert!(ElementRow::parse("3 2 0 1 -2 3", 1).is_err());
    }

    #[test]
    fn test_parse_skips_other_elements() {
        let cells = parse(ELEMENTS.as_bytes(), &ShapeTable::for_dimension(2)).unwrap();
        assert_eq!(cells.cell_count(), 4);
        assert_eq!(cells.cells_to_vertex_ids()[0], vec![1, 2, 5]);
        assert!(cells
            .shape_types()
            .iter()
            .all(|s| *s == ShapeType::Triangle));

        let cells = parse(ELEMENTS.as_bytes(), &ShapeTable::for_dimension(3)).unwrap();
        assert!(cells.is_empty());
    }

    #[test]
    fn test_parse_wrong_node_count() {
        assert!(matches!(
            parse("1\n1 2 2 0 1 1 2\n".as_bytes(), &ShapeTable::for_dimension(2)),
            Err(MeshImportError::Parse { line: 2, .. })
        ));
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(&[6, 1, 1, 1], 1), Classification::Owned);
        assert_eq!(classify(&[6, 1, 1, 1], 2), Classification::Irrelevant);
        assert_eq!(classify(&[6, 1, 2, 1, -2], 1), Classification::Owned);
        assert_eq!(
            classify(&[6, 1, 2, 1, -2], 2),
            Classification::Ghost { owner: 1 }
        );
        assert_eq!(classify(&[6, 1, 2, 1, -2], 3), Classification::Irrelevant);
        assert_eq!(classify(&[], 1), Classification::Irrelevant);
        assert_eq!(classify(&[-1], 1), Classification::Irrelevant);
    }

    #[test]
    fn test_partitions_are_exclusive() {
        let shapes = ShapeTable::for_dimension(2);
        let mut owned = vec![];
        for local in 1..=3 {
            let cells = parse_partitioned(ELEMENTS.as_bytes(), &shapes, local).unwrap();
            assert_eq!(cells.id_offset, Some(2));
            owned.extend(cells.owned.global_ids.clone());
            for (id, owner) in cells.ghosts.global_ids.iter().zip(&cells.ghosts.owners) {
                assert_ne!(*owner, local);
                assert!(!cells.owned.global_ids.contains(id));
            }
        }
        owned.sort();
        assert_eq!(owned, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_parse_partitioned() {
        let shapes = ShapeTable::for_dimension(2);
        let cells = parse_partitioned(ELEMENTS.as_bytes(), &shapes, 1).unwrap();
        assert_eq!(cells.owned.file_ids, vec![2, 3]);
        assert_eq!(cells.owned.global_ids, vec![0, 1]);
        assert_eq!(cells.owned.owners, vec![1, 1]);
        assert_eq!(cells.ghosts.file_ids, vec![4]);
        assert_eq!(cells.ghosts.global_ids, vec![2]);
        assert_eq!(cells.ghosts.owners, vec![2]);
        assert_eq!(
            cells.ghosts.cells.cells_to_vertex_ids(),
            &[vec![2, 3, 5]]
        );

        let cells = parse_partitioned(ELEMENTS.as_bytes(), &shapes, 2).unwrap();
        assert_eq!(cells.owned.file_ids, vec![4, 5]);
        assert_eq!(cells.ghosts.file_ids, vec![3]);
        assert_eq!(cells.ghosts.owners, vec![1]);

        let cells = parse_partitioned(ELEMENTS.as_bytes(), &shapes, 3).unwrap();
        assert_eq!(cells.owned.cell_count(), 0);
        assert_eq!(cells.ghosts.cell_count(), 0);
    }

    #[test]
    fn test_ids_before_offset() {
        let shapes = ShapeTable::for_dimension(2);
        let section = "2\n5 2 2 0 1 1 2 3\n4 2 2 0 1 1 3 4\n";
        assert!(matches!(
            parse_partitioned(section.as_bytes(), &shapes, 1),
            Err(MeshImportError::Parse { line: 3, .. })
        ));
    }

    /// Fails on its first read, then reaches the end
    struct FailOnce(bool);

    impl std::io::Read for FailOnce {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            if std::mem::replace(&mut self.0, true) {
                Ok(0)
            } else {
                Err(std::io::Error::other("disk went away"))
            }
        }
    }

    #[test]
    fn test_read_error_on_count_line() {
        let shapes = ShapeTable::for_dimension(2);
        assert!(matches!(
            parse(std::io::BufReader::new(FailOnce(false)), &shapes),
            Err(MeshImportError::Io(_))
        ));
        assert!(matches!(
            parse_partitioned(std::io::BufReader::new(FailOnce(false)), &shapes, 1),
            Err(MeshImportError::Io(_))
        ));
    }
}
