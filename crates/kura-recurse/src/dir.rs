//! Snapshot cursor over a filesystem directory.

use std::fs;
use std::io;
use std::ops::BitOr;
use std::path::{Path, PathBuf};

use kura_types::{Key, Value};

use crate::node::{Node, RecursiveNode};
use crate::{TraverseError, TraverseResult};

/// Behavior flags for [`DirNode`], carried as a plain bitmask.
///
/// Flags combine with `|` and are inherited by every child node
/// produced through `get_children`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirFlags(u32);

impl DirFlags {
    /// No flags: dot entries included, key is the entry name, current
    /// is the full path.
    pub const NONE: DirFlags = DirFlags(0);
    /// Omit the synthesized `.` and `..` entries.
    pub const SKIP_DOTS: DirFlags = DirFlags(1 << 0);
    /// `key()` returns the full path instead of the entry name.
    pub const KEY_AS_PATH: DirFlags = DirFlags(1 << 1);
    /// `current()` returns the entry name instead of the full path.
    pub const CURRENT_AS_NAME: DirFlags = DirFlags(1 << 2);
    /// `current()` returns a metadata container
    /// (`{name, path, dir, size}`) instead of the full path.
    pub const CURRENT_AS_ENTRY: DirFlags = DirFlags(1 << 3);

    /// Reconstruct flags from their integer form.
    pub fn from_bits(bits: u32) -> Self {
        DirFlags(bits)
    }

    /// The integer form of these flags.
    pub fn bits(self) -> u32 {
        self.0
    }

    /// True if every flag in `other` is set.
    pub fn contains(self, other: DirFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for DirFlags {
    type Output = DirFlags;

    fn bitor(self, rhs: DirFlags) -> DirFlags {
        DirFlags(self.0 | rhs.0)
    }
}

/// One materialized directory entry.
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Name of the entry (not full path).
    pub name: String,
    /// True if this entry is a directory.
    pub is_dir: bool,
    /// Size in bytes (0 for directories).
    pub size: u64,
}

impl DirEntry {
    fn is_dot(&self) -> bool {
        self.name == "." || self.name == ".."
    }
}

/// Cursor over a directory's entries.
///
/// The directory is read exactly once, at construction; iteration runs
/// over that static snapshot in the order the OS returned it, so
/// concurrent filesystem mutation is never observed mid-traversal.
/// A position is a child iff it is a directory and not a dot entry;
/// descending constructs a fresh `DirNode` over the child path with the
/// same flags, and any error reading the child propagates unchanged.
#[derive(Debug)]
pub struct DirNode {
    path: PathBuf,
    entries: Vec<DirEntry>,
    pos: usize,
    flags: DirFlags,
}

impl DirNode {
    /// Open a directory and materialize its entry list.
    ///
    /// Fails with [`TraverseError::NotFound`],
    /// [`TraverseError::NotADirectory`], or
    /// [`TraverseError::PermissionDenied`] when the path is unusable.
    pub fn new(path: impl AsRef<Path>, flags: DirFlags) -> TraverseResult<Self> {
        let path = path.as_ref().to_path_buf();

        let meta = fs::metadata(&path).map_err(|e| io_error(&path, e))?;
        if !meta.is_dir() {
            return Err(TraverseError::NotADirectory(path.display().to_string()));
        }

        let mut entries = Vec::new();
        if !flags.contains(DirFlags::SKIP_DOTS) {
            entries.push(DirEntry {
                name: ".".to_string(),
                is_dir: true,
                size: 0,
            });
            entries.push(DirEntry {
                name: "..".to_string(),
                is_dir: true,
                size: 0,
            });
        }

        for entry in fs::read_dir(&path).map_err(|e| io_error(&path, e))? {
            let entry = entry.map_err(|e| io_error(&path, e))?;
            let file_type = entry.file_type().map_err(|e| io_error(&path, e))?;
            let is_dir = file_type.is_dir();
            let size = if is_dir {
                0
            } else {
                entry.metadata().map(|m| m.len()).unwrap_or(0)
            };
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
                size,
            });
        }

        tracing::debug!(
            path = %path.display(),
            entries = entries.len(),
            "materialized directory snapshot"
        );

        Ok(Self {
            path,
            entries,
            pos: 0,
            flags,
        })
    }

    /// The directory this node was opened on.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The flags this node (and its children) carry.
    pub fn flags(&self) -> DirFlags {
        self.flags
    }

    /// The materialized entries, in snapshot order.
    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    fn entry(&self) -> Option<&DirEntry> {
        self.entries.get(self.pos)
    }

    fn entry_path(&self, entry: &DirEntry) -> PathBuf {
        self.path.join(&entry.name)
    }

    fn entry_value(&self, entry: &DirEntry) -> Value {
        if self.flags.contains(DirFlags::CURRENT_AS_ENTRY) {
            Value::map([
                (Key::from("name"), Value::from(entry.name.as_str())),
                (
                    Key::from("path"),
                    Value::String(self.entry_path(entry).display().to_string()),
                ),
                (Key::from("dir"), Value::Bool(entry.is_dir)),
                (Key::from("size"), Value::Int(entry.size as i64)),
            ])
        } else if self.flags.contains(DirFlags::CURRENT_AS_NAME) {
            Value::from(entry.name.as_str())
        } else {
            Value::String(self.entry_path(entry).display().to_string())
        }
    }
}

fn io_error(path: &Path, err: io::Error) -> TraverseError {
    let shown = path.display();
    match err.kind() {
        io::ErrorKind::NotFound => TraverseError::NotFound(shown.to_string()),
        io::ErrorKind::NotADirectory => TraverseError::NotADirectory(shown.to_string()),
        io::ErrorKind::PermissionDenied => TraverseError::PermissionDenied(shown.to_string()),
        _ => TraverseError::Io(format!("{shown}: {err}")),
    }
}

impl Node for DirNode {
    fn valid(&self) -> bool {
        self.pos < self.entries.len()
    }

    fn current(&self) -> Option<Value> {
        self.entry().map(|e| self.entry_value(e))
    }

    fn key(&self) -> Option<Key> {
        self.entry().map(|e| {
            if self.flags.contains(DirFlags::KEY_AS_PATH) {
                Key::Str(self.entry_path(e).display().to_string())
            } else {
                Key::Str(e.name.clone())
            }
        })
    }

    fn next(&mut self) -> TraverseResult<()> {
        if self.pos < self.entries.len() {
            self.pos += 1;
        }
        Ok(())
    }

    fn rewind(&mut self) -> TraverseResult<()> {
        self.pos = 0;
        Ok(())
    }
}

impl RecursiveNode for DirNode {
    fn has_children(&self) -> bool {
        self.entry().is_some_and(|e| e.is_dir && !e.is_dot())
    }

    fn get_children(&self) -> TraverseResult<Box<dyn RecursiveNode>> {
        let entry = self
            .entry()
            .filter(|e| e.is_dir && !e.is_dot())
            .ok_or_else(|| {
                TraverseError::NotAContainer(self.path.display().to_string())
            })?;
        let child = DirNode::new(self.entry_path(entry), self.flags)?;
        Ok(Box::new(child))
    }
}
