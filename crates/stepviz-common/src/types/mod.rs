//! Core type definitions for Stepviz.
//!
//! This module contains the types shared by every algorithm family:
//! - Identifier types ([`NodeId`], [`EdgeId`])
//! - The graph data model ([`GraphNode`], [`GraphEdge`], [`Graph`])
//! - Highlight vocabulary ([`HighlightColor`], [`ArrayHighlight`], [`GraphHighlight`])

mod graph;
mod highlight;
mod id;

pub use graph::{Graph, GraphEdge, GraphNode};
pub use highlight::{ArrayHighlight, GraphElement, GraphHighlight, HighlightColor};
pub use id::{EdgeId, NodeId};
