//! Tree renderer
//!
//! Walks a directory subtree depth-first and produces one `DisplayLine` per
//! entry. Directories sort before files, names compare case-insensitively,
//! and a directory that cannot be listed becomes a single error line without
//! stopping the rest of the walk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::vec;

use tracing::{debug, warn};

use crate::core::model::{DirectoryEntry, DisplayLine, EntryKind, NodeError, RenderContext};

/// Source of directory listings
pub trait DirReader {
    /// Read the immediate children of `path` in one shot.
    ///
    /// # Errors
    ///
    /// Returns an error if the listing cannot be read (permission denied,
    /// I/O failure, etc.). A failure part way through the listing fails the
    /// whole call.
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>>;
}

impl<R: DirReader + ?Sized> DirReader for &R {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>> {
        (**self).read_dir(path)
    }
}

/// Reads listings from the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl DirReader for FsReader {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<DirectoryEntry>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry = entry?;
            let path = entry.path();
            // Both checks follow symlinks; entries that are neither (broken
            // links, sockets, FIFOs) display as files but sort with directories
            let kind = if path.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };
            let sorts_as_file = path.is_file();
            entries.push(DirectoryEntry::new(path, kind).with_sorts_as_file(sorts_as_file));
        }
        Ok(entries)
    }
}

/// Renders directory subtrees as display lines
#[derive(Debug, Clone, Default)]
pub struct TreeRenderer<R = FsReader> {
    reader: R,
}

impl TreeRenderer<FsReader> {
    pub fn new() -> Self {
        Self { reader: FsReader }
    }
}

impl<R: DirReader> TreeRenderer<R> {
    /// Create a renderer reading listings from `reader`
    #[cfg(test)]
    pub fn with_reader(reader: R) -> Self {
        Self { reader }
    }

    /// Lazily produce the lines for the subtree under `root`.
    ///
    /// Nothing is read until the iterator is advanced. Each call starts a
    /// fresh walk.
    pub fn render(&self, root: &Path, context: RenderContext) -> Lines<'_, R> {
        Lines {
            reader: &self.reader,
            stack: vec![Frame::Unread {
                path: root.to_path_buf(),
                context,
            }],
        }
    }

    /// Produce all lines for the subtree under `root`
    pub fn collect_lines(&self, root: &Path) -> Vec<DisplayLine> {
        self.render(root, RenderContext::root()).collect()
    }
}

enum Frame {
    /// A directory whose listing has not been read yet
    Unread { path: PathBuf, context: RenderContext },
    /// A sorted listing being emitted
    Listing(Listing),
}

struct Listing {
    entries: vec::IntoIter<DirectoryEntry>,
    context: RenderContext,
}

impl Listing {
    fn new(mut entries: Vec<DirectoryEntry>, context: RenderContext) -> Self {
        // Stable: entries with equal keys keep their listing order
        entries.sort_by_cached_key(DirectoryEntry::sort_key);
        Self {
            entries: entries.into_iter(),
            context,
        }
    }

    /// Next entry and whether it is the last of the listing
    fn advance(&mut self) -> Option<(DirectoryEntry, bool)> {
        let entry = self.entries.next()?;
        Some((entry, self.entries.as_slice().is_empty()))
    }
}

/// Pre-order iterator over the lines of one render
pub struct Lines<'a, R> {
    reader: &'a R,
    stack: Vec<Frame>,
}

impl<R: DirReader> Iterator for Lines<'_, R> {
    type Item = DisplayLine;

    fn next(&mut self) -> Option<DisplayLine> {
        loop {
            match self.stack.pop()? {
                Frame::Unread { path, context } => match self.reader.read_dir(&path) {
                    Ok(entries) => {
                        debug!(
                            path = %path.display(),
                            depth = context.depth(),
                            entries = entries.len(),
                            "listed directory"
                        );
                        self.stack.push(Frame::Listing(Listing::new(entries, context)));
                    }
                    Err(err) => {
                        let error = NodeError::from_io(&path, &err);
                        warn!(
                            path = %path.display(),
                            access_denied = error.is_access_denied(),
                            error = %err,
                            "cannot list directory"
                        );
                        return Some(DisplayLine::error(&context, error));
                    }
                },
                Frame::Listing(mut listing) => {
                    let Some((entry, is_last)) = listing.advance() else {
                        continue;
                    };
                    let line = DisplayLine::entry(&listing.context, &entry, is_last);
                    let child = entry.is_dir().then(|| Frame::Unread {
                        context: listing.context.descend(is_last),
                        path: entry.path,
                    });
                    if !is_last {
                        self.stack.push(Frame::Listing(listing));
                    }
                    if let Some(child) = child {
                        self.stack.push(child);
                    }
                    return Some(line);
                }
            }
        }
    }
}
