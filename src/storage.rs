//! Storage port for preset files.
//!
//! The path resolver and the preset store never touch `std::fs` directly; they
//! go through `PresetStorage`. `FsStorage` is the real filesystem,
//! `MemoryStorage` an in-memory stand-in for tests.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Marker file written and removed to probe directory writability
pub const WRITE_PROBE_NAME: &str = ".viewport-capture-probe";

/// Filesystem capabilities needed by path resolution and the preset store.
pub trait PresetStorage {
    fn is_dir(&self, path: &Path) -> bool;

    fn is_file(&self, path: &Path) -> bool;

    /// Whether new files can be created inside `dir`.
    fn is_writable_dir(&self, dir: &Path) -> bool;

    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    fn remove_file(&self, path: &Path) -> io::Result<()>;

    /// Regular files directly inside `dir`. `NotFound` if `dir` is missing.
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// `PresetStorage` backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl PresetStorage for FsStorage {
    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_writable_dir(&self, dir: &Path) -> bool {
        if !dir.is_dir() {
            return false;
        }
        // Probe with a marker file; permission bits are not consulted.
        let probe = dir.join(WRITE_PROBE_NAME);
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&probe)
        {
            Ok(_) => {
                let _ = fs::remove_file(&probe);
                true
            }
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                // Left over from an interrupted probe; writable if removable.
                fs::remove_file(&probe).is_ok()
            }
            Err(_) => false,
        }
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        fs::write(path, contents)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }
}

#[derive(Debug, Default)]
struct MemoryFs {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    read_only: BTreeSet<PathBuf>,
}

impl MemoryFs {
    fn is_read_only(&self, path: &Path) -> bool {
        self.read_only.iter().any(|ro| path.starts_with(ro))
    }
}

/// In-memory `PresetStorage`.
///
/// Directories must exist before files are written into them, and any path
/// under a directory marked read-only rejects writes with
/// `PermissionDenied`, mirroring what a locked-down share does.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    fs: RefCell<MemoryFs>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: create `dir` and all its parents.
    pub fn with_dir(self, dir: impl Into<PathBuf>) -> Self {
        {
            let mut fs = self.fs.borrow_mut();
            let dir = dir.into();
            for ancestor in dir.ancestors() {
                if !ancestor.as_os_str().is_empty() {
                    fs.dirs.insert(ancestor.to_path_buf());
                }
            }
        }
        self
    }

    /// Builder: reject every write at or below `dir`.
    pub fn with_read_only(self, dir: impl Into<PathBuf>) -> Self {
        self.fs.borrow_mut().read_only.insert(dir.into());
        self
    }

    /// Builder: place a file (its directory is created too).
    pub fn with_file(self, path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let path = path.into();
        let storage = match path.parent() {
            Some(parent) => self.with_dir(parent),
            None => self,
        };
        storage.fs.borrow_mut().files.insert(path, contents.into());
        storage
    }

    /// Number of files currently stored, across all directories
    pub fn file_count(&self) -> usize {
        self.fs.borrow().files.len()
    }
}

fn permission_denied(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("{} is read-only", path.display()),
    )
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("{} does not exist", path.display()),
    )
}

impl PresetStorage for MemoryStorage {
    fn is_dir(&self, path: &Path) -> bool {
        self.fs.borrow().dirs.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.fs.borrow().files.contains_key(path)
    }

    fn is_writable_dir(&self, dir: &Path) -> bool {
        let fs = self.fs.borrow();
        fs.dirs.contains(dir) && !fs.is_read_only(dir)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        let mut fs = self.fs.borrow_mut();
        let missing: Vec<PathBuf> = dir
            .ancestors()
            .filter(|a| !a.as_os_str().is_empty() && !fs.dirs.contains(*a))
            .map(Path::to_path_buf)
            .collect();
        if missing.iter().any(|m| fs.is_read_only(m)) {
            return Err(permission_denied(dir));
        }
        fs.dirs.extend(missing);
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.fs
            .borrow()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let mut fs = self.fs.borrow_mut();
        let parent = path.parent().ok_or_else(|| not_found(path))?;
        if !fs.dirs.contains(parent) {
            return Err(not_found(parent));
        }
        if fs.is_read_only(path) {
            return Err(permission_denied(path));
        }
        fs.files.insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let mut fs = self.fs.borrow_mut();
        if !fs.files.contains_key(path) {
            return Err(not_found(path));
        }
        if fs.is_read_only(path) {
            return Err(permission_denied(path));
        }
        fs.files.remove(path);
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let fs = self.fs.borrow();
        if !fs.dirs.contains(dir) {
            return Err(not_found(dir));
        }
        Ok(fs
            .files
            .keys()
            .filter(|path| path.parent() == Some(dir))
            .cloned()
            .collect())
    }
}
