use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::history::History;
use crate::io::store::{Store, StoreError, atomic_write};
use crate::model::workspace::Workspace;

/// Undo history sidecar, next to the data file
pub const HISTORY_FILE: &str = ".history.json";

/// Error type for session persistence
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("could not write {path}: {source}")]
    HistoryWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not serialize history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A workspace under undo/redo, bound to a store.
///
/// The history is kept in a sidecar file so undo and redo work across
/// separate `pw` invocations. Every commit saves the workspace to the store
/// (when autosave is on) and rewrites the sidecar. While the store lags
/// behind the current workspace, the sidecar also records what the store
/// holds, so pending edits are recognized on the next open.
pub struct Session<S: Store> {
    store: S,
    history_path: PathBuf,
    history: History<Workspace>,
    autosave: bool,
    /// Last workspace written to (or read from) the store
    saved: Workspace,
}

/// Sidecar contents
#[derive(Deserialize)]
struct SessionFile {
    history: History<Workspace>,
    #[serde(default)]
    saved: Option<Workspace>,
}

#[derive(Serialize)]
struct SessionFileRef<'a> {
    history: &'a History<Workspace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    saved: Option<&'a Workspace>,
}

impl<S: Store> Session<S> {
    /// Load the workspace from `store` and pick up the saved history if it
    /// still belongs to it: either its current value is what the store
    /// holds, or it carries unsaved edits made on top of what the store
    /// holds. Pending edits are written out right away when autosave is on.
    pub fn open(
        store: S,
        history_path: impl Into<PathBuf>,
        max_history: usize,
        autosave: bool,
    ) -> Result<Self, SessionError> {
        let history_path = history_path.into();
        let stored = store.load()?.unwrap_or_default();

        let history = match read_session_file(&history_path) {
            Some(file)
                if file.history.current() == &stored || file.saved.as_ref() == Some(&stored) =>
            {
                let mut history = file.history;
                history.set_max_history(max_history);
                history
            }
            Some(_) => {
                tracing::warn!(
                    "data file changed outside pw, discarding undo history and unsaved edits"
                );
                History::with_max_history(stored.clone(), max_history)
            }
            None => History::with_max_history(stored.clone(), max_history),
        };

        let mut session = Session {
            store,
            history_path,
            history,
            autosave,
            saved: stored,
        };
        if autosave && session.is_dirty() {
            tracing::info!("writing pending edits to the data file");
            session.save()?;
        }
        Ok(session)
    }

    /// Start over with `workspace`: the store is overwritten and the history
    /// forgotten, without reading what was there before.
    pub fn create(
        store: S,
        history_path: impl Into<PathBuf>,
        max_history: usize,
        autosave: bool,
        workspace: Workspace,
    ) -> Result<Self, SessionError> {
        let mut session = Session {
            store,
            history_path: history_path.into(),
            history: History::with_max_history(Workspace::default(), max_history),
            autosave,
            saved: Workspace::default(),
        };
        session.reset(workspace)?;
        Ok(session)
    }

    pub fn workspace(&self) -> &Workspace {
        self.history.current()
    }

    pub fn history(&self) -> &History<Workspace> {
        &self.history
    }

    /// Whether the store holds something other than the current workspace
    pub fn is_dirty(&self) -> bool {
        self.history.current() != &self.saved
    }

    /// Commit a new workspace. Returns false if nothing changed.
    pub fn commit(&mut self, next: Workspace) -> Result<bool, SessionError> {
        if !self.history.set_state(next) {
            tracing::debug!("workspace unchanged, nothing to commit");
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn undo(&mut self) -> Result<bool, SessionError> {
        if !self.history.undo() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn redo(&mut self) -> Result<bool, SessionError> {
        if !self.history.redo() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Replace the workspace without recording history (initial load).
    pub fn reset(&mut self, workspace: Workspace) -> Result<(), SessionError> {
        self.history.reset(workspace);
        self.save()
    }

    /// Write the current workspace to the store regardless of autosave.
    pub fn save(&mut self) -> Result<(), SessionError> {
        self.store.save(self.history.current())?;
        self.saved = self.history.current().clone();
        self.write_history()
    }

    fn persist(&mut self) -> Result<(), SessionError> {
        if self.autosave {
            return self.save();
        }
        self.write_history()
    }

    fn write_history(&self) -> Result<(), SessionError> {
        let file = SessionFileRef {
            history: &self.history,
            saved: self.is_dirty().then_some(&self.saved),
        };
        let content = serde_json::to_string(&file)?;
        atomic_write(&self.history_path, content.as_bytes()).map_err(|e| {
            SessionError::HistoryWrite {
                path: self.history_path.clone(),
                source: e,
            }
        })
    }
}

fn read_session_file(path: &Path) -> Option<SessionFile> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(file) => Some(file),
        Err(e) => {
            tracing::warn!("ignoring unreadable undo history {}: {}", path.display(), e);
            None
        }
    }
}
