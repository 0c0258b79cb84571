//! Manifest document abstraction layer.
//!
//! `ManifestDocument`, `ManifestSection`, and `ParseNode` wrap the `kdl` crate
//! types so the rest of the manifest module never touches KDL directly.

use std::path::Path;

use super::ManifestError;

/// Parsed KDL document paired with its source text.
pub(super) struct ManifestDocument {
    doc: kdl::KdlDocument,
    source: String,
}

/// Single KDL node with source context for line-number reporting.
pub(super) struct ParseNode<'a> {
    node: &'a kdl::KdlNode,
    source: &'a str,
}

/// Borrowed view of a block of nodes: the document root or a node's children.
pub(super) struct ManifestSection<'a> {
    doc: &'a kdl::KdlDocument,
    source: &'a str,
}

impl ManifestDocument {
    /// Parse a KDL source string into a document.
    pub(super) fn parse(source: &str) -> Result<Self, ManifestError> {
        let doc: kdl::KdlDocument = source
            .parse()
            .map_err(|e: kdl::KdlError| ManifestError::ParseError(e.to_string()))?;
        Ok(Self {
            doc,
            source: source.to_string(),
        })
    }

    /// Read and parse a manifest file. Always hits the filesystem.
    pub(super) fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound {
                    start: path.to_path_buf(),
                }
            } else {
                ManifestError::ReadError(e)
            }
        })?;
        Self::parse(&content)
    }

    /// The top-level nodes as a section.
    pub(super) fn root(&self) -> ManifestSection<'_> {
        ManifestSection {
            doc: &self.doc,
            source: &self.source,
        }
    }
}

impl<'a> ManifestSection<'a> {
    /// All nodes in declaration order.
    pub(super) fn nodes(&self) -> Vec<ParseNode<'a>> {
        self.doc
            .nodes()
            .iter()
            .map(|node| ParseNode {
                node,
                source: self.source,
            })
            .collect()
    }
}

impl<'a> ParseNode<'a> {
    /// The node's identifier (e.g. `"pre-commit"`, `"wizard"`).
    pub(super) fn name(&self) -> &'a str {
        self.node.name().value()
    }

    /// String arguments in declaration order.
    ///
    /// Returns `None` if any entry is a property (`key=value`) or a
    /// non-string value.
    pub(super) fn string_arguments(&self) -> Option<Vec<&'a str>> {
        self.node
            .entries()
            .iter()
            .map(|e| match e.name() {
                Some(_) => None,
                None => e.value().as_string(),
            })
            .collect()
    }

    /// Total number of entries (all types, not just strings).
    pub(super) fn entry_count(&self) -> usize {
        self.node.entries().len()
    }

    /// The children block `{ … }`, preserving source.
    pub(super) fn children(&self) -> Option<ManifestSection<'a>> {
        self.node.children().map(|doc| ManifestSection {
            doc,
            source: self.source,
        })
    }

    /// 1-based line number of this node in the manifest text.
    pub(super) fn line(&self) -> usize {
        let offset = self.node.span().offset();
        self.source[..offset.min(self.source.len())]
            .bytes()
            .filter(|&b| b == b'\n')
            .count()
            + 1
    }
}
