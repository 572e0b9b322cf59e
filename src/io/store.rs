use std::cell::{Cell, RefCell};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::NamedTempFile;

use crate::model::project::Project;
use crate::model::workspace::Workspace;

/// Error type for loading and saving workspace data
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not serialize data: {0}")]
    SerializeError(#[from] serde_json::Error),
}

/// Where committed workspaces go. The core never touches storage itself;
/// callers hand the committed value to a store.
pub trait Store {
    /// The stored workspace, or `None` if nothing has been saved yet
    fn load(&self) -> Result<Option<Workspace>, StoreError>;
    fn save(&self, workspace: &Workspace) -> Result<(), StoreError>;
}

/// Pretty-printed JSON file (`data.json` in the data directory)
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Store for JsonFileStore {
    fn load(&self) -> Result<Option<Workspace>, StoreError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path).map_err(|e| StoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        let ws = serde_json::from_str(&content).map_err(|e| StoreError::ParseError {
            path: self.path.clone(),
            source: e,
        })?;
        Ok(Some(ws))
    }

    fn save(&self, workspace: &Workspace) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(workspace)?;
        write_file(&self.path, &content)
    }
}

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    workspace: RefCell<Option<Workspace>>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_workspace(workspace: Workspace) -> Self {
        MemoryStore {
            workspace: RefCell::new(Some(workspace)),
            saves: Cell::new(0),
        }
    }

    /// Number of successful `save` calls
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl Store for MemoryStore {
    fn load(&self) -> Result<Option<Workspace>, StoreError> {
        Ok(self.workspace.borrow().clone())
    }

    fn save(&self, workspace: &Workspace) -> Result<(), StoreError> {
        *self.workspace.borrow_mut() = Some(workspace.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

impl<S: Store + ?Sized> Store for &S {
    fn load(&self) -> Result<Option<Workspace>, StoreError> {
        (**self).load()
    }

    fn save(&self, workspace: &Workspace) -> Result<(), StoreError> {
        (**self).save(workspace)
    }
}

/// Accepted shapes of an import file
#[derive(Deserialize)]
#[serde(untagged)]
enum ImportFile {
    /// A bare projects array (what export writes)
    Projects(Vec<Project>),
    /// A whole data file
    Workspace(Workspace),
}

/// Read the projects from an export file or a full data file.
pub fn read_import(path: &Path) -> Result<Vec<Project>, StoreError> {
    let content = fs::read_to_string(path).map_err(|e| StoreError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let parsed: ImportFile = serde_json::from_str(&content).map_err(|e| StoreError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(match parsed {
        ImportFile::Projects(projects) => projects,
        ImportFile::Workspace(ws) => ws.projects,
    })
}

/// Write the projects as a pretty JSON array.
pub fn write_export(path: &Path, projects: &[Project]) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(projects)?;
    write_file(path, &content)
}

fn write_file(path: &Path, content: &str) -> Result<(), StoreError> {
    atomic_write(path, content.as_bytes()).map_err(|e| StoreError::WriteError {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write `content` to `path` through a temp file in the same directory and
/// a rename, creating the directory first.
pub(crate) fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
