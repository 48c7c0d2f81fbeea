use std::collections::BTreeMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::Storage;

/// In-memory storage with switchable failures.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: Mutex<BTreeMap<String, String>>,
    root_created: AtomicBool,
    unavailable: AtomicBool,
    fail_writes: AtomicBool,
    fail_removes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every operation fail as if the medium were inaccessible.
    pub fn set_unavailable(&self, value: bool) {
        self.unavailable.store(value, Ordering::SeqCst);
    }

    /// Make writes fail as if the disk were full.
    pub fn set_fail_writes(&self, value: bool) {
        self.fail_writes.store(value, Ordering::SeqCst);
    }

    /// Make removals fail as if permission were denied.
    pub fn set_fail_removes(&self, value: bool) {
        self.fail_removes.store(value, Ordering::SeqCst);
    }

    /// Insert a file directly, bypassing failure switches.
    pub fn insert_raw(&self, name: &str, contents: &str) {
        self.root_created.store(true, Ordering::SeqCst);
        self.files_lock().insert(name.to_string(), contents.to_string());
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files_lock().keys().cloned().collect()
    }

    fn files_lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A panic while holding the lock leaves the map itself intact
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_available(&self) -> io::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage medium unavailable",
            ));
        }
        Ok(())
    }

    fn check_root(&self) -> io::Result<()> {
        if !self.root_created.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::NotFound, "storage root missing"));
        }
        Ok(())
    }
}

impl Storage for MemoryStorage {
    fn ensure_root(&self) -> io::Result<()> {
        self.check_available()?;
        self.root_created.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn root_exists(&self) -> io::Result<bool> {
        self.check_available()?;
        Ok(self.root_created.load(Ordering::SeqCst))
    }

    fn list(&self) -> io::Result<Vec<String>> {
        self.check_available()?;
        self.check_root()?;
        Ok(self.file_names())
    }

    fn read(&self, name: &str) -> io::Result<String> {
        self.check_available()?;
        self.files_lock()
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }

    fn write(&self, name: &str, contents: &str) -> io::Result<()> {
        self.check_available()?;
        self.check_root()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
        }
        self.files_lock().insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        self.check_available()?;
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        self.files_lock()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }

    fn exists(&self, name: &str) -> io::Result<bool> {
        self.check_available()?;
        Ok(self.files_lock().contains_key(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_root_before_write() {
        let storage = MemoryStorage::new();
        assert!(storage.write("a.json", "x").is_err());
        storage.ensure_root().unwrap();
        storage.write("a.json", "x").unwrap();
        assert_eq!(storage.read("a.json").unwrap(), "x");
    }

    #[test]
    fn test_fault_switches() {
        let storage = MemoryStorage::new();
        storage.ensure_root().unwrap();
        storage.write("a.json", "x").unwrap();

        storage.set_fail_writes(true);
        assert!(storage.write("a.json", "y").is_err());
        assert_eq!(storage.read("a.json").unwrap(), "x");

        storage.set_fail_removes(true);
        assert!(storage.remove("a.json").is_err());
        assert!(storage.exists("a.json").unwrap());

        storage.set_unavailable(true);
        assert!(storage.list().is_err());
        assert!(storage.root_exists().is_err());
    }
}
