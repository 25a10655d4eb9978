//! # waypath Core
//!
//! Core library for waypath.
//!
//! This crate provides the fundamental data structures and algorithms:
//!
//! - [`HashtableMap`] - Chained hash table with load-factor driven resizing
//! - [`Graph`] - Directed, edge-weighted graph indexed by a [`HashtableMap`]
//! - Dijkstra shortest paths on [`Graph`] (`shortest_path_data`,
//!   `shortest_path_cost`, `most_distant_location`)
//!
//! ## Example
//!
//! ```rust
//! use waypath_core::Graph;
//!
//! let mut graph: Graph<String> = Graph::new();
//! for label in ["A", "B", "C"] {
//!     graph.insert_node(label.to_string());
//! }
//! graph.insert_edge("A", "B", 1.0);
//! graph.insert_edge("B", "C", 2.0);
//!
//! assert_eq!(graph.shortest_path_data("A", "C").unwrap(), vec!["A", "B", "C"]);
//! assert_eq!(graph.shortest_path_cost("A", "C"), 3.0);
//! assert_eq!(graph.shortest_path_cost("C", "A"), f64::INFINITY);
//! ```

pub mod dijkstra;
pub mod error;
pub mod graph;
pub mod map;

pub use error::{Error, Result};
pub use graph::{Edge, Graph, Node};
pub use map::{HashtableMap, MapConfig, MapKey};
