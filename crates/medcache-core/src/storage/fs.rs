use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::Storage;

/// Prefix and suffix of in-progress writes. Hidden names never match the
/// record naming contract, so enumeration skips them.
pub const TEMP_PREFIX: &str = ".";
pub const TEMP_SUFFIX: &str = ".tmp";

/// Directory-backed storage.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    fn temp_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}{}{}", TEMP_PREFIX, name, TEMP_SUFFIX))
    }
}

/// Flush directory entries so a completed rename survives power loss.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

/// Directory handles cannot be synced on this platform.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

impl Storage for FsStorage {
    fn ensure_root(&self) -> io::Result<()> {
        fs::create_dir_all(&self.root)
    }

    fn root_exists(&self) -> io::Result<bool> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => Ok(true),
            Ok(_) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is not a directory", self.root.display()),
            )),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn list(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // Non-UTF-8 names cannot be category files
            if let Ok(name) = entry.file_name().into_string() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.path(name))
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        let tmp = self.temp_path(name);
        let result = (|| {
            let mut file = File::create(&tmp)?;
            file.write_all(contents.as_bytes())?;
            file.sync_all()?;
            fs::rename(&tmp, self.path(name))
        })();

        if result.is_err() {
            if let Err(e) = fs::remove_file(&tmp) {
                debug!(file = %tmp.display(), error = %e, "Could not clean up temp file");
            }
            return result;
        }

        // Contents are already in place, so this write counts as done
        // even if the directory entry is not yet flushed.
        if let Err(e) = sync_dir(&self.root) {
            warn!(dir = %self.root.display(), error = %e, "Failed to sync storage directory");
        }
        Ok(())
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.path(name))
    }

    fn exists(&self, name: &str) -> io::Result<bool> {
        self.path(name).try_exists()
    }
}
