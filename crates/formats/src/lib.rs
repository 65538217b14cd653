//! Mesh loaders for tools and tests.

use std::fs;
use std::path::Path;

use scene::TriangleMesh;

pub mod mesh_json;
pub mod obj;

pub use mesh_json::{MeshDocument, load_mesh_json};
pub use obj::load_obj;

#[derive(Debug)]
pub enum MeshLoadError {
    Io(std::io::Error),
    Parse { line: usize, message: String },
    Json(serde_json::Error),
    UnsupportedExtension(String),
}

impl std::fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MeshLoadError::Io(err) => write!(f, "I/O error: {err}"),
            MeshLoadError::Parse { line, message } => write!(f, "line {line}: {message}"),
            MeshLoadError::Json(err) => write!(f, "mesh document error: {err}"),
            MeshLoadError::UnsupportedExtension(ext) => {
                write!(f, "unsupported mesh file extension: {ext:?}")
            }
        }
    }
}

impl std::error::Error for MeshLoadError {}

/// Loads `.obj` or `.json` mesh files, dispatching on the extension.
pub fn load_mesh_file(path: impl AsRef<Path>) -> Result<TriangleMesh, MeshLoadError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default();
    let loader = loader_for(ext)?;
    let payload = fs::read_to_string(path).map_err(MeshLoadError::Io)?;
    loader(&payload)
}

/// Parses an in-memory mesh payload of the format named by `extension`.
pub fn load_mesh_str(extension: &str, src: &str) -> Result<TriangleMesh, MeshLoadError> {
    loader_for(extension)?(src)
}

type Loader = fn(&str) -> Result<TriangleMesh, MeshLoadError>;

fn loader_for(extension: &str) -> Result<Loader, MeshLoadError> {
    match extension.to_ascii_lowercase().as_str() {
        "obj" => Ok(load_obj as Loader),
        "json" => Ok(load_mesh_json as Loader),
        other => Err(MeshLoadError::UnsupportedExtension(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::{MeshLoadError, load_mesh_file, load_mesh_str};
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(label: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("relic_formats_{label}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn dispatches_on_extension() {
        let dir = temp_dir("dispatch");
        let obj = dir.join("tri.OBJ");
        fs::write(&obj, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").expect("write obj");
        let json = dir.join("tri.json");
        fs::write(&json, r#"{"positions":[[0,0,0],[1,0,0],[0,1,0]],"indices":[0,1,2]}"#)
            .expect("write json");

        let a = load_mesh_file(&obj).expect("load obj");
        let b = load_mesh_file(&json).expect("load json");
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_unknown_extensions_and_missing_files() {
        let dir = temp_dir("errors");
        assert!(matches!(
            load_mesh_file(dir.join("model.stl")),
            Err(MeshLoadError::UnsupportedExtension(ext)) if ext == "stl"
        ));
        assert!(matches!(
            load_mesh_file(dir.join("missing.obj")),
            Err(MeshLoadError::Io(_))
        ));
        assert!(matches!(
            load_mesh_str("ply", ""),
            Err(MeshLoadError::UnsupportedExtension(ext)) if ext == "ply"
        ));
    }
}
