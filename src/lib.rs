//! # waypath
//!
//! Shortest routes between named locations over a directed, weighted graph.
//!
//! The graph indexes its nodes with a hand-written chained hash table
//! ([`HashtableMap`]) and answers path queries with Dijkstra's algorithm.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! waypath --graph campus.dot path "Bascom Hall" "Brat Stand"
//! waypath --graph campus.dot farthest "Union South"
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use waypath::prelude::*;
//!
//! let mut graph = Graph::new();
//! load_str(
//!     &mut graph,
//!     r#""Union South" -> "Memorial Arch" [seconds=145.1];"#,
//!     LoaderConfig::default(),
//! )
//! .unwrap();
//!
//! let finder = RouteFinder::new(graph);
//! assert_eq!(finder.travel_times_on_path("Union South", "Memorial Arch"), vec![145.1]);
//! ```
//!
//! ## Crate Structure
//!
//! - `waypath-core` - Hash table, graph and Dijkstra layer
//! - `waypath-loader` - Edge list parser
//! - `waypath` - [`RouteFinder`] and the `waypath` binary

pub mod routes;

// Re-export core types
pub use waypath_core::{Edge, Error, Graph, HashtableMap, MapConfig, MapKey, Node, Result};

// Re-export loader
pub use waypath_loader::{
    load_file, load_str, parse_line, EdgeLine, LoadError, LoadSummary, LoaderConfig,
};

pub use routes::{Route, RouteFinder};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Error, Graph, HashtableMap, MapConfig, Result,
        load_file, load_str, LoaderConfig,
        Route, RouteFinder,
    };
}
