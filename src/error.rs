//! Error taxonomy shared by the registries, the rule table, permission parsing and the
//! authorizer.

use std::fmt;
use thiserror::Error;

use crate::assertion::AssertionError;

pub type Result<T> = std::result::Result<T, Error>;

/// Which hierarchy a registry holds. Used to report unknown identifiers precisely.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Role,
    Resource,
} // enum NodeKind

impl fmt::Display for NodeKind {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NodeKind::Role     => f.write_str("role"),
            NodeKind::Resource => f.write_str("resource"),
        } // match
    } // fmt

} // impl fmt::Display for NodeKind

#[derive(Debug, Error)]
pub enum Error {
    /// A node names a parent which is not registered.
    #[error("unknown parent {kind} `{parent}` for `{id}`")]
    UnknownParent { kind: NodeKind, id: String, parent: String },

    /// A node is registered twice with different parents.
    #[error("duplicate {kind}: `{id}`")]
    DuplicateNode { kind: NodeKind, id: String },

    /// Parent links of the source data form a cycle. `path` lists the nodes on it.
    #[error("cyclic {kind} hierarchy: {}", .path.join(" -> "))]
    Cycle { kind: NodeKind, path: Vec<String> },

    #[error("unknown role: `{0}`")]
    UnknownRole(String),

    #[error("unknown resource: `{0}`")]
    UnknownResource(String),

    /// A structured permission entry lacks `resource` or `privilege`.
    #[error("permission `{entry}` must include `{field}`")]
    MissingField { entry: String, field: &'static str },

    /// A permission entry is neither a delimited string, a structured pair nor a descriptor.
    #[error("permission `{entry}` must be a string with delimiter `{delimiter}`, an object with resource & privilege or a permission descriptor, {found} given")]
    InvalidPermissionFormat { entry: String, delimiter: char, found: &'static str },

    /// An assertion could not be evaluated.
    #[error("assertion failed to evaluate")]
    Assertion(#[source] AssertionError),

    /// The configuration document is not valid JSON or has the wrong shape.
    #[error("invalid permissions configuration")]
    Config(#[from] serde_json::Error),
} // enum Error

impl Error {

    /// The error reported when `id` is missing from a registry of `kind`.
    pub(crate) fn unknown(kind: NodeKind, id: &str) -> Self {
        match kind {
            NodeKind::Role     => Error::UnknownRole(String::from(id)),
            NodeKind::Resource => Error::UnknownResource(String::from(id)),
        } // match
    } // unknown

} // impl Error
