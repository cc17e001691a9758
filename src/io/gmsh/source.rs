//! Resolving mesh sources to Gmsh mesh files

use super::options::{GmshOptions, MeshDimensions};
use crate::error::{MeshImportError, Result};
use log::{debug, warn};
use std::fs;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempPath;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Where a mesh comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MeshSource {
    /// A mesh file that Gmsh has already generated
    MeshFile(PathBuf),
    /// A Gmsh geometry file
    GeometryFile(PathBuf),
    /// The text of a Gmsh geometry script
    Script(String),
}

impl MeshSource {
    /// Interpret a string as a mesh file, a geometry file, or a script
    ///
    /// Strings ending in `.msh` are mesh files and strings ending in `.geo` or
    /// `.gmsh` are geometry files. Anything else, including any string that
    /// spans several lines, is treated as the text of a geometry script.
    pub fn from_arg(arg: &str) -> Self {
        if !arg.contains('\n') {
            let extension = Path::new(arg.trim())
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e.to_lowercase());
            match extension.as_deref() {
                Some("msh") => return MeshSource::MeshFile(PathBuf::from(arg.trim())),
                Some("geo") | Some("gmsh") => {
                    return MeshSource::GeometryFile(PathBuf::from(arg.trim()))
                }
                _ => {}
            }
        }
        MeshSource::Script(String::from(arg))
    }
}

impl From<&str> for MeshSource {
    fn from(arg: &str) -> Self {
        Self::from_arg(arg)
    }
}

impl From<String> for MeshSource {
    fn from(arg: String) -> Self {
        Self::from_arg(&arg)
    }
}

/// A mesh file ready to be read
///
/// If the file was generated, it is deleted when this is dropped.
#[derive(Debug)]
pub struct ResolvedMesh {
    path: PathBuf,
    generated: Option<TempPath>,
}

impl ResolvedMesh {
    /// Path to the mesh file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Was the file generated by Gmsh?
    pub fn is_generated(&self) -> bool {
        self.generated.is_some()
    }
}

/// Get a mesh file for a source, running Gmsh if necessary
pub fn resolve(
    source: &MeshSource,
    dimensions: MeshDimensions,
    options: &GmshOptions,
) -> Result<ResolvedMesh> {
    match source {
        MeshSource::MeshFile(path) => Ok(ResolvedMesh {
            path: path.clone(),
            generated: None,
        }),
        MeshSource::GeometryFile(path) => generate(path, dimensions, options),
        MeshSource::Script(script) => {
            let mut geometry = tempfile::Builder::new()
                .prefix("fvgrid-")
                .suffix(".geo")
                .tempfile()?;
            geometry.write_all(script.as_bytes())?;
            geometry.flush()?;
            debug!("Wrote geometry script to {}", geometry.path().display());
            generate(geometry.path(), dimensions, options)
        }
    }
}

/// Run Gmsh on a geometry file
fn generate(
    geometry: &Path,
    dimensions: MeshDimensions,
    options: &GmshOptions,
) -> Result<ResolvedMesh> {
    let output = tempfile::Builder::new()
        .prefix("fvgrid-")
        .suffix(".msh")
        .tempfile()?
        .into_temp_path();
    let mut stderr_log = tempfile::tempfile()?;

    let mut command = Command::new(&options.executable);
    command
        .arg(geometry)
        .args(options.flags(dimensions))
        .arg("-o")
        .arg(&output)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::from(stderr_log.try_clone()?));
    debug!("Running {command:?}");

    let mut child = command.spawn().map_err(|e| {
        MeshImportError::MeshGeneration(format!(
            "could not run `{}`: {e}",
            options.executable.display()
        ))
    })?;
    let status = wait_with_timeout(&mut child, options.timeout)?;

    let mut stderr = String::new();
    stderr_log.seek(SeekFrom::Start(0))?;
    stderr_log.read_to_string(&mut stderr)?;
    if !stderr.trim().is_empty() {
        warn!("{}: {}", options.executable.display(), stderr.trim());
    }

    if !status.success() {
        return Err(MeshImportError::MeshGeneration(format!(
            "`{}` exited with {status}: {}",
            options.executable.display(),
            stderr.trim()
        )));
    }
    let size = fs::metadata(&output).map(|m| m.len()).unwrap_or(0);
    if size == 0 {
        return Err(MeshImportError::MeshGeneration(format!(
            "`{}` did not write a mesh to {}",
            options.executable.display(),
            output.display()
        )));
    }
    debug!("Generated {} ({size} bytes)", output.display());

    Ok(ResolvedMesh {
        path: output.to_path_buf(),
        generated: Some(output),
    })
}

/// Wait for a process, killing it if it runs longer than `timeout`
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if start.elapsed() >= timeout {
            // The process may have exited since try_wait
            let _ = child.kill();
            let _ = child.wait();
            return Err(MeshImportError::MeshGeneration(format!(
                "gmsh did not finish within {timeout:?}"
            )));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_classify_arguments() {
        assert_eq!(
            MeshSource::from_arg("meshes/circle.msh"),
            MeshSource::MeshFile(PathBuf::from("meshes/circle.msh"))
        );
        assert_eq!(
            MeshSource::from_arg("CIRCLE.MSH"),
            MeshSource::MeshFile(PathBuf::from("CIRCLE.MSH"))
        );
        assert_eq!(
            MeshSource::from_arg("circle.geo"),
            MeshSource::GeometryFile(PathBuf::from("circle.geo"))
        );
        assert_eq!(
            MeshSource::from_arg("circle.gmsh"),
            MeshSource::GeometryFile(PathBuf::from("circle.gmsh"))
        );
        let script = "Point(1) = {0, 0, 0, 1.0};\nPoint(2) = {1, 0, 0, 1.0};\n";
        assert_eq!(
            MeshSource::from_arg(script),
            MeshSource::Script(String::from(script))
        );
        assert!(matches!(
            MeshSource::from("Point(1) = {0, 0, 0, 0.1};"),
            MeshSource::Script(_)
        ));
    }

    #[test]
    fn test_mesh_file_is_unchanged() {
        let source = MeshSource::MeshFile(PathBuf::from("cube.msh"));
        let resolved =
            resolve(&source, MeshDimensions::volume(), &GmshOptions::default()).unwrap();
        assert_eq!(resolved.path(), Path::new("cube.msh"));
        assert!(!resolved.is_generated());
    }

    #[test]
    fn test_missing_executable() {
        let options = GmshOptions::default().with_executable("/nonexistent/fvgrid-test/gmsh");
        let source = MeshSource::Script(String::from("Point(1) = {0, 0, 0, 1.0};"));
        assert!(matches!(
            resolve(&source, MeshDimensions::planar(), &options),
            Err(MeshImportError::MeshGeneration(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_generator_exit_status_is_checked() {
        let options = GmshOptions::default().with_executable("false");
        let source = MeshSource::Script(String::from("Point(1) = {0, 0, 0, 1.0};"));
        assert!(matches!(
            resolve(&source, MeshDimensions::planar(), &options),
            Err(MeshImportError::MeshGeneration(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_generator_output_is_checked() {
        // `true` succeeds without writing anything
        let options = GmshOptions::default().with_executable("true");
        let source = MeshSource::Script(String::from("Point(1) = {0, 0, 0, 1.0};"));
        let err = resolve(&source, MeshDimensions::planar(), &options).unwrap_err();
        assert!(err.to_string().contains("did not write a mesh"));
    }
}
