//! Tree Model
//!
//! Entries read from the filesystem, the per-level render context, and the
//! display lines the tree renderer produces.

use serde::{Serialize, Serializer};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The kind of a directory entry
///
/// Variant order is the sort order: directories before files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Directory,
    File,
}

/// A child of a directory, as captured by a single listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    /// Orders the entry after directories. Set only for regular files, so
    /// broken symlinks, sockets and FIFOs sort with directories while still
    /// displaying as files.
    pub sorts_as_file: bool,
}

impl DirectoryEntry {
    pub fn new(path: impl Into<PathBuf>, kind: EntryKind) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            name,
            path,
            kind,
            sorts_as_file: kind == EntryKind::File,
        }
    }

    /// Override the sort group captured from the filesystem
    pub fn with_sorts_as_file(mut self, sorts_as_file: bool) -> Self {
        self.sorts_as_file = sorts_as_file;
        self
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Composite ordering key: (is-file, lowercase name)
    pub fn sort_key(&self) -> (bool, String) {
        (self.sorts_as_file, self.name.to_lowercase())
    }
}

/// One unit of the indent prefix, contributed by one ancestor level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// The ancestor has more siblings below it
    PassThrough,
    /// The ancestor was the last entry of its listing
    Blank,
}

impl Segment {
    pub fn for_last(is_last: bool) -> Self {
        if is_last {
            Segment::Blank
        } else {
            Segment::PassThrough
        }
    }
}

/// Indent prefix: one segment per ancestor level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Indent(Vec<Segment>);

impl Indent {
    /// The indent of a child of the entry at this level.
    pub fn child(&self, is_last: bool) -> Self {
        let mut segments = Vec::with_capacity(self.0.len() + 1);
        segments.extend_from_slice(&self.0);
        segments.push(Segment::for_last(is_last));
        Indent(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    /// Number of ancestor levels
    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

/// Per-recursion-level state, owned by a single traversal frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderContext {
    pub indent: Indent,
}

impl RenderContext {
    /// Context for the root of a render
    pub fn root() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> usize {
        self.indent.depth()
    }

    /// Context for descending into a child entry
    pub fn descend(&self, is_last: bool) -> Self {
        Self {
            indent: self.indent.child(is_last),
        }
    }
}

/// Branch glyph placed before an entry's label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Connector {
    Mid,
    Last,
}

impl Connector {
    pub fn for_last(is_last: bool) -> Self {
        if is_last {
            Connector::Last
        } else {
            Connector::Mid
        }
    }
}

/// Semantic style of a line; color is applied by the output adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    Directory,
    File,
    Error,
}

impl From<EntryKind> for LineStyle {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Directory => LineStyle::Directory,
            EntryKind::File => LineStyle::File,
        }
    }
}

/// Failure to enumerate the children of one directory
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum NodeError {
    #[error("[Permission denied]: {path}")]
    AccessDenied { path: String },

    #[error("[OS error]: {message}: {path}")]
    Io {
        path: String,
        #[serde(serialize_with = "serialize_error_kind")]
        kind: io::ErrorKind,
        message: String,
    },
}

impl NodeError {
    /// Classify an enumeration failure for `path`
    pub fn from_io(path: &Path, err: &io::Error) -> Self {
        let path = path.to_string_lossy().into_owned();
        match err.kind() {
            io::ErrorKind::PermissionDenied => NodeError::AccessDenied { path },
            kind => NodeError::Io {
                path,
                kind,
                message: err.to_string(),
            },
        }
    }

    pub fn is_access_denied(&self) -> bool {
        matches!(self, NodeError::AccessDenied { .. })
    }
}

fn serialize_error_kind<S: Serializer>(kind: &io::ErrorKind, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&format!("{:?}", kind))
}

/// One line of tree output: indent, connector, semantic style and label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLine {
    pub indent: Indent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connector: Option<Connector>,
    pub style: LineStyle,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<NodeError>,
}

impl DisplayLine {
    /// Line for an entry of a listing
    pub fn entry(context: &RenderContext, entry: &DirectoryEntry, is_last: bool) -> Self {
        Self {
            indent: context.indent.clone(),
            connector: Some(Connector::for_last(is_last)),
            style: entry.kind.into(),
            label: entry.name.clone(),
            error: None,
        }
    }

    /// Line for a directory whose listing could not be read
    pub fn error(context: &RenderContext, error: NodeError) -> Self {
        Self {
            indent: context.indent.clone(),
            connector: None,
            style: LineStyle::Error,
            label: error.to_string(),
            error: Some(error),
        }
    }

    pub fn depth(&self) -> usize {
        self.indent.depth()
    }
}
