use serde::{Deserialize, Serialize};
use std::path::Path;
use waypath_core::{Graph, Result};
use waypath_loader::{LoadSummary, LoaderConfig};

/// A resolved route with the travel time of every hop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub path: Vec<String>,
    pub segments: Vec<f64>,
    pub total_seconds: f64,
}

impl Route {
    #[inline]
    #[must_use]
    pub fn total_minutes(&self) -> f64 {
        self.total_seconds / 60.0
    }
}

/// Location-oriented queries over a graph of named places
/// with travel times in seconds.
#[derive(Debug, Clone, Default)]
pub struct RouteFinder {
    graph: Graph<String>,
}

impl RouteFinder {
    #[must_use]
    pub fn new(graph: Graph<String>) -> Self {
        Self { graph }
    }

    /// Build a finder from an edge list file.
    pub fn load<P: AsRef<Path>>(
        path: P,
        config: LoaderConfig,
    ) -> anyhow::Result<(Self, LoadSummary)> {
        let mut graph = Graph::new();
        let summary = waypath_loader::load_file(&mut graph, path, config)?;
        Ok((Self::new(graph), summary))
    }

    #[inline]
    #[must_use]
    pub fn graph(&self) -> &Graph<String> {
        &self.graph
    }

    /// Every known location, sorted for display.
    pub fn locations(&self) -> Vec<String> {
        let mut locations = self.graph.get_all_locations();
        locations.sort();
        locations
    }

    pub fn find_shortest_path(&self, start: &str, end: &str) -> Result<Vec<String>> {
        self.graph.shortest_path_data(start, end)
    }

    /// Travel time of each hop on the shortest path.
    ///
    /// Empty when either location is unknown, no path exists or the path
    /// has a single location.
    pub fn travel_times_on_path(&self, start: &str, end: &str) -> Vec<f64> {
        if !self.graph.contains_node(start) || !self.graph.contains_node(end) {
            return Vec::new();
        }
        match self.find_shortest_path(start, end) {
            Ok(path) if path.len() >= 2 => self.segments(&path).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    fn segments(&self, path: &[String]) -> Result<Vec<f64>> {
        path.windows(2)
            .map(|hop| self.graph.get_edge(hop[0].as_str(), hop[1].as_str()))
            .collect()
    }

    /// Shortest travel time in seconds, `f64::INFINITY` if there is none.
    pub fn total_travel_time(&self, start: &str, end: &str) -> f64 {
        self.graph.shortest_path_cost(start, end)
    }

    /// Path, per-hop times and total in one query.
    pub fn route(&self, start: &str, end: &str) -> Result<Route> {
        let path = self.find_shortest_path(start, end)?;
        let segments = self.segments(&path)?;
        let total_seconds: f64 = segments.iter().sum();
        Ok(Route {
            path,
            segments,
            total_seconds,
        })
    }

    /// Reachable location farthest from `from`, `None` if nothing is reachable.
    pub fn most_distant_location(&self, from: &str) -> Result<Option<String>> {
        self.graph.most_distant_location(from)
    }
}

impl From<Graph<String>> for RouteFinder {
    fn from(graph: Graph<String>) -> Self {
        Self::new(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypath_core::Error;

    fn campus() -> RouteFinder {
        let mut graph = Graph::new();
        let text = r#"
            "Union South" -> "Memorial Arch" [seconds=145.1];
            "Bascom Hall" -> "Education Building" [seconds=97.4];
            "Education Building" -> "Radio Hall" [seconds=120];
            "Radio Hall" -> "Brat Stand" [seconds=80.5];
            "Bascom Hall" -> "Brat Stand" [seconds=500];
            "Brat Stand" -> "Union South" [seconds=60];
        "#;
        waypath_loader::load_str(&mut graph, text, LoaderConfig::default()).unwrap();
        RouteFinder::new(graph)
    }

    #[test]
    fn test_locations_sorted() {
        let finder = campus();
        let locations = finder.locations();
        assert_eq!(locations.len(), 6);
        assert_eq!(locations.first().map(String::as_str), Some("Bascom Hall"));
        assert!(locations.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_find_shortest_path() {
        let finder = campus();
        assert_eq!(
            finder.find_shortest_path("Bascom Hall", "Brat Stand").unwrap(),
            vec!["Bascom Hall", "Education Building", "Radio Hall", "Brat Stand"]
        );
        assert!(matches!(
            finder.find_shortest_path("Memorial Arch", "Bascom Hall"),
            Err(Error::NoPathFound { .. })
        ));
    }

    #[test]
    fn test_travel_times() {
        let finder = campus();
        assert_eq!(finder.travel_times_on_path("Union South", "Memorial Arch"), vec![145.1]);
        assert_eq!(
            finder.travel_times_on_path("Bascom Hall", "Brat Stand"),
            vec![97.4, 120.0, 80.5]
        );
        assert!(finder.travel_times_on_path("Bascom Hall", "Nowhere").is_empty());
        assert!(finder.travel_times_on_path("Memorial Arch", "Bascom Hall").is_empty());
        assert!(finder.travel_times_on_path("Radio Hall", "Radio Hall").is_empty());
    }

    #[test]
    fn test_route() {
        let finder = campus();
        let route = finder.route("Radio Hall", "Memorial Arch").unwrap();
        assert_eq!(route.path, vec!["Radio Hall", "Brat Stand", "Union South", "Memorial Arch"]);
        assert_eq!(route.segments, vec![80.5, 60.0, 145.1]);
        assert_eq!(route.total_seconds, 80.5 + 60.0 + 145.1);
        assert_eq!(finder.total_travel_time("Memorial Arch", "Radio Hall"), f64::INFINITY);
    }

    #[test]
    fn test_most_distant_location() {
        let finder = campus();
        assert_eq!(
            finder.most_distant_location("Bascom Hall").unwrap(),
            Some("Memorial Arch".to_string())
        );
        assert_eq!(finder.most_distant_location("Memorial Arch").unwrap(), None);
        assert!(finder.most_distant_location("Nowhere").is_err());
    }
}
