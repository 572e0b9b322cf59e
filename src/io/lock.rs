use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const LOCK_FILE: &str = ".lock";

/// Advisory lock on a data directory, held while a command reads, edits and
/// writes the workspace. Released when the handle drops.
///
/// The `.lock` file is never removed; waiting processes may already hold
/// it open.
pub struct DataLock {
    _file: File,
}

/// Error type for lock operations
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("could not create lock file at {path}: {source}")]
    CreateError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("data directory is busy ({path}): another pw process is writing")]
    Busy { path: PathBuf },
}

impl DataLock {
    /// Take the lock, polling until `timeout` runs out.
    pub fn acquire(data_dir: &Path, timeout: Duration) -> Result<Self, LockError> {
        let path = data_dir.join(LOCK_FILE);
        let create_err = |source| LockError::CreateError {
            path: path.clone(),
            source,
        };
        fs::create_dir_all(data_dir).map_err(create_err)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(create_err)?;

        let start = Instant::now();
        while try_lock(&file).is_err() {
            if start.elapsed() >= timeout {
                return Err(LockError::Busy { path });
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        tracing::debug!(path = %path.display(), "acquired data lock");
        Ok(DataLock { _file: file })
    }

    pub fn acquire_default(data_dir: &Path) -> Result<Self, LockError> {
        Self::acquire(data_dir, Duration::from_secs(5))
    }
}

#[cfg(unix)]
fn try_lock(file: &File) -> Result<(), std::io::Error> {
    use std::os::unix::io::AsRawFd;
    let result = unsafe { libc::flock(file.as_raw_fd(), libc::LOCK_EX | libc::LOCK_NB) };
    if result == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn try_lock(_file: &File) -> Result<(), std::io::Error> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use tempfile::TempDir;

    #[test]
    fn lock_creates_directory_and_releases_on_drop() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join(".weaver");
        let lock = DataLock::acquire_default(&dir).unwrap();
        assert!(dir.join(LOCK_FILE).exists());
        drop(lock);
        assert!(dir.join(LOCK_FILE).exists());
        assert!(DataLock::acquire(&dir, Duration::from_millis(50)).is_ok());
    }

    #[cfg(unix)]
    #[test]
    fn second_lock_times_out() {
        let tmp = TempDir::new().unwrap();
        let _held = DataLock::acquire_default(tmp.path()).unwrap();
        let second = DataLock::acquire(tmp.path(), Duration::from_millis(50));
        assert!(matches!(second, Err(LockError::Busy { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn waiter_that_takes_over_still_excludes_others() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_path_buf();
        let first = DataLock::acquire_default(&dir).unwrap();

        let (acquired_tx, acquired_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let waiter_dir = dir.clone();
        let waiter = std::thread::spawn(move || {
            let lock = DataLock::acquire(&waiter_dir, Duration::from_secs(5)).unwrap();
            acquired_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            drop(lock);
        });

        // let the waiter open the file and start polling
        std::thread::sleep(Duration::from_millis(100));
        drop(first);
        acquired_rx.recv_timeout(Duration::from_secs(5)).unwrap();

        let third = DataLock::acquire(&dir, Duration::from_millis(100));
        assert!(matches!(third, Err(LockError::Busy { .. })));

        release_tx.send(()).unwrap();
        waiter.join().unwrap();
        assert!(DataLock::acquire(&dir, Duration::from_millis(100)).is_ok());
    }
}
