//! Section isolation

use crate::error::{MeshImportError, Result};
use log::debug;
use std::io::{self, BufRead, Cursor, Read, Seek, SeekFrom};

/// The lines between a `$<title>` marker and its `$End<title>` marker
///
/// The section is held in memory, independently of the stream it was read
/// from. It is read once and then dropped.
#[derive(Debug)]
pub struct RawSection {
    title: String,
    content: Cursor<Vec<u8>>,
}

impl RawSection {
    /// Create a section from its content
    pub fn new(title: &str, content: impl Into<Vec<u8>>) -> Self {
        Self {
            title: String::from(title),
            content: Cursor::new(content.into()),
        }
    }

    /// The section title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The raw content of the section
    pub fn as_bytes(&self) -> &[u8] {
        self.content.get_ref()
    }
}

impl Read for RawSection {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.content.read(buf)
    }
}

impl BufRead for RawSection {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        self.content.fill_buf()
    }
    fn consume(&mut self, amt: usize) {
        self.content.consume(amt)
    }
}

impl Seek for RawSection {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.content.seek(pos)
    }
}

/// Read lines until one containing `$<title>` has been consumed
fn seek_for_header<R: BufRead>(title: &str, stream: &mut R) -> Result<()> {
    let marker = format!("${title}");
    let mut line = String::new();
    loop {
        line.clear();
        if stream.read_line(&mut line)? == 0 {
            return Err(MeshImportError::HeaderNotFound(String::from(title)));
        }
        if line.contains(&marker) {
            return Ok(());
        }
    }
}

fn copy_section<R: BufRead>(title: &str, stream: &mut R) -> Result<RawSection> {
    seek_for_header(title, stream)?;
    let end_marker = format!("$End{title}");
    let mut content = Vec::new();
    let mut line = String::new();
    loop {
        line.clear();
        if stream.read_line(&mut line)? == 0 {
            return Err(MeshImportError::HeaderNotFound(format!("End{title}")));
        }
        if line.contains(&end_marker) {
            break;
        }
        content.extend_from_slice(line.as_bytes());
    }
    debug!("Isolated ${title} section ({} bytes)", content.len());
    Ok(RawSection::new(title, content))
}

/// Copy the section called `title` out of a stream
///
/// The search starts at the current position of the stream. Whether or not
/// the section is found, the stream is returned to that position, so several
/// sections can be isolated from the same stream in any order.
pub fn isolate<R: BufRead + Seek>(title: &str, stream: &mut R) -> Result<RawSection> {
    let start = stream.stream_position()?;
    let section = copy_section(title, stream);
    stream.seek(SeekFrom::Start(start))?;
    section
}

#[cfg(test)]
mod test {
    use super::*;

    const MESH: &str = "$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
3
1 0 0 0
2 1 0 0
3 0 1 0
$EndNodes
$Elements
1
1 2 2 0 1 1 2 3
$EndElements
";

    #[test]
    fn test_isolate_nodes() {
        let mut stream = Cursor::new(MESH);
        let nodes = isolate("Nodes", &mut stream).unwrap();
        assert_eq!(nodes.title(), "Nodes");
        assert_eq!(nodes.as_bytes(), b"3\n1 0 0 0\n2 1 0 0\n3 0 1 0\n");
    }

    #[test]
    fn test_isolate_in_either_order() {
        let mut stream = Cursor::new(MESH);
        let elements = isolate("Elements", &mut stream).unwrap();
        let nodes = isolate("Nodes", &mut stream).unwrap();
        assert_eq!(stream.position(), 0);
        assert_eq!(elements.as_bytes(), b"1\n1 2 2 0 1 1 2 3\n");
        assert_eq!(nodes.as_bytes(), b"3\n1 0 0 0\n2 1 0 0\n3 0 1 0\n");
    }

    #[test]
    fn test_sections_do_not_overlap() {
        let mut stream = Cursor::new(MESH);
        stream.set_position(15);
        let nodes = isolate("Nodes", &mut stream).unwrap();
        let elements = isolate("Elements", &mut stream).unwrap();
        assert_eq!(stream.position(), 15);

        let text = MESH.as_bytes();
        let find = |needle: &[u8]| {
            text.windows(needle.len())
                .position(|w| w == needle)
                .unwrap()
        };
        let nodes_start = find(nodes.as_bytes());
        let elements_start = find(elements.as_bytes());
        assert!(nodes_start + nodes.as_bytes().len() <= elements_start);
    }

    #[test]
    fn test_missing_header() {
        let mut stream = Cursor::new(MESH);
        stream.set_position(3);
        match isolate("NodeData", &mut stream) {
            Err(MeshImportError::HeaderNotFound(title)) => assert_eq!(title, "NodeData"),
            r => panic!("unexpected result: {r:?}"),
        }
        assert_eq!(stream.position(), 3);
    }

    #[test]
    fn test_missing_end_marker() {
        let mut stream = Cursor::new("$Nodes\n1\n1 0 0 0\n");
        assert!(matches!(
            isolate("Nodes", &mut stream),
            Err(MeshImportError::HeaderNotFound(t)) if t == "EndNodes"
        ));
    }

    #[test]
    fn test_header_search_starts_at_current_position() {
        let mut stream = Cursor::new(MESH);
        stream.set_position(MESH.find("$Elements").unwrap() as u64);
        assert!(isolate("Nodes", &mut stream).is_err());
    }

    #[test]
    fn test_section_is_readable() {
        let mut section = RawSection::new("Nodes", "1\n2\n");
        let lines = (&mut section).lines().collect::<io::Result<Vec<_>>>().unwrap();
        assert_eq!(lines, vec!["1", "2"]);
        section.seek(SeekFrom::Start(0)).unwrap();
        let mut s = String::new();
        section.read_to_string(&mut s).unwrap();
        assert_eq!(s, "1\n2\n");
    }
}
