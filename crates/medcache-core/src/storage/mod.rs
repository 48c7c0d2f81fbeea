//! Local storage medium for offline records.
//!
//! A `Storage` is a flat, directory-like namespace of UTF-8 text files.
//! Two implementations are provided:
//! - `FsStorage`: a directory on disk, with atomic full-file overwrites
//! - `MemoryStorage`: an in-process map with fault injection, for tests and
//!   embedders without a file system

pub mod fs;
pub mod memory;

pub use fs::FsStorage;
pub use memory::MemoryStorage;

use std::io;

pub trait Storage: Send + Sync {
    /// Create the storage root if it does not exist. Pre-existence is success.
    fn ensure_root(&self) -> io::Result<()>;

    fn root_exists(&self) -> io::Result<bool>;

    /// Names of all entries in the root.
    fn list(&self) -> io::Result<Vec<String>>;

    fn read(&self, name: &str) -> io::Result<String>;

    /// Replace the whole contents of `name`. Readers never observe a
    /// partially written file under `name`. Whether a completed write
    /// survives power loss depends on the implementation: `FsStorage`
    /// syncs the file and, on Unix, its directory; `MemoryStorage` keeps
    /// nothing across restarts.
    fn write(&self, name: &str, contents: &str) -> io::Result<()>;

    fn remove(&self, name: &str) -> io::Result<()>;

    fn exists(&self, name: &str) -> io::Result<bool>;
}
