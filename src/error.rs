/*!
# Errors

All fallible graph operations report a [`GraphError`]. The variants fall
into three kinds callers can discriminate:

- **lookup**: a referenced node or edge does not exist
  ([`GraphError::NodeNotFound`], [`GraphError::EdgeNotFound`]);
- **structural**: malformed input ([`GraphError::Malformed`]);
- **infeasibility**: an in-place relabeling cannot complete
  ([`GraphError::MappingCycle`]).
*/

use thiserror::Error;

use crate::key::Key;

/// Errors reported by graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A referenced node is not part of the graph.
    #[error("node {0} is not in the graph")]
    NodeNotFound(Key),

    /// A referenced edge is not part of the graph. For multi variants the
    /// missing edge may be a specific key within an existing pair.
    #[error("edge ({u}, {v}) is not in the graph")]
    EdgeNotFound {
        u: Key,
        v: Key,
        key: Option<Key>,
    },

    /// The input to an operation is malformed, e.g. an unknown ordering
    /// name.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// The relabeling mapping contains a cycle after self-loop removal, so
    /// nodes cannot be renamed in place.
    #[error("the relabeling mapping contains a cycle; relabel into a copy instead")]
    MappingCycle,
}

/// Shorthand for results of graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    pub(crate) fn edge_not_found(u: &Key, v: &Key, key: Option<&Key>) -> Self {
        GraphError::EdgeNotFound {
            u: u.clone(),
            v: v.clone(),
            key: key.cloned(),
        }
    }
}
