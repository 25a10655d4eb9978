// Directed, edge-weighted graph keyed on node labels
use crate::map::{HashtableMap, MapConfig, MapKey};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt::Debug;
use std::hash::Hash;

/// A directed arc to `successor`. Owned by the predecessor's outgoing list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge<N> {
    pub successor: N,
    pub weight: f64,
}

/// A vertex and the edges leaving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node<N> {
    pub label: N,
    pub edges_leaving: Vec<Edge<N>>,
}

impl<N> Node<N> {
    #[inline]
    #[must_use]
    pub fn new(label: N) -> Self {
        Self {
            label,
            edges_leaving: Vec::new(),
        }
    }

    #[inline]
    fn edge_to<Q>(&self, successor: &Q) -> Option<&Edge<N>>
    where
        N: Borrow<Q>,
        Q: Eq + ?Sized,
    {
        self.edges_leaving
            .iter()
            .find(|edge| edge.successor.borrow() == successor)
    }
}

/// Directed graph whose node index is a [`HashtableMap`].
///
/// At most one edge exists per ordered pair of nodes; inserting it again
/// overwrites the weight. Weights must be finite and non-negative.
#[derive(Debug, Clone)]
pub struct Graph<N> {
    nodes: HashtableMap<N, Node<N>>,
    edge_count: usize,
}

impl<N: MapKey + Clone> Graph<N> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashtableMap::new(),
            edge_count: 0,
        }
    }

    /// Graph whose node index follows `config` instead of the default sizing.
    pub fn with_map_config(config: MapConfig) -> Result<Self> {
        Ok(Self {
            nodes: HashtableMap::with_config(config)?,
            edge_count: 0,
        })
    }

    /// Add a node. Returns false if the label is already present or blank.
    pub fn insert_node(&mut self, label: N) -> bool {
        if self.nodes.contains_key(&label) {
            return false;
        }
        match self.nodes.put(label.clone(), Node::new(label)) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("rejected node: {}", e);
                false
            }
        }
    }

    /// Remove a node together with every edge that points at it.
    pub fn remove_node<Q>(&mut self, label: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let Ok(node) = self.nodes.remove(label) else {
            return false;
        };
        self.edge_count -= node.edges_leaving.len();

        for other in self.nodes.values_mut() {
            let before = other.edges_leaving.len();
            other
                .edges_leaving
                .retain(|edge| edge.successor.borrow() != label);
            self.edge_count -= before - other.edges_leaving.len();
        }
        true
    }

    #[inline]
    pub fn contains_node<Q>(&self, label: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.contains_key(label)
    }

    /// Insert or overwrite the edge `pred -> succ`.
    ///
    /// Returns false, leaving the graph untouched, when either endpoint is
    /// missing or the weight is negative or not finite.
    pub fn insert_edge<Q>(&mut self, pred: &Q, succ: &Q, weight: f64) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        if !weight.is_finite() || weight < 0.0 {
            tracing::warn!(?pred, ?succ, weight, "rejected edge weight");
            return false;
        }
        let Ok(successor) = self.nodes.get(succ).map(|node| node.label.clone()) else {
            return false;
        };
        let Ok(node) = self.nodes.get_mut(pred) else {
            return false;
        };

        match node
            .edges_leaving
            .iter_mut()
            .find(|edge| edge.successor.borrow() == succ)
        {
            Some(edge) => edge.weight = weight,
            None => {
                node.edges_leaving.push(Edge { successor, weight });
                self.edge_count += 1;
            }
        }
        true
    }

    pub fn remove_edge<Q>(&mut self, pred: &Q, succ: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let Ok(node) = self.nodes.get_mut(pred) else {
            return false;
        };
        match node
            .edges_leaving
            .iter()
            .position(|edge| edge.successor.borrow() == succ)
        {
            Some(pos) => {
                node.edges_leaving.remove(pos);
                self.edge_count -= 1;
                true
            }
            None => false,
        }
    }

    pub fn contains_edge<Q>(&self, pred: &Q, succ: &Q) -> bool
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes
            .lookup(pred)
            .is_some_and(|node| node.edge_to(succ).is_some())
    }

    /// Weight of the edge `pred -> succ`.
    pub fn get_edge<Q>(&self, pred: &Q, succ: &Q) -> Result<f64>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.nodes
            .lookup(pred)
            .and_then(|node| node.edge_to(succ))
            .map(|edge| edge.weight)
            .ok_or_else(|| Error::EdgeNotFound {
                from: format!("{pred:?}"),
                to: format!("{succ:?}"),
            })
    }

    /// Outgoing edges of `label`, or None if the node is absent.
    pub fn edges_from<Q>(&self, label: &Q) -> Option<&[Edge<N>]>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes
            .lookup(label)
            .map(|node| node.edges_leaving.as_slice())
    }

    #[inline]
    pub(crate) fn node<Q>(&self, label: &Q) -> Option<&Node<N>>
    where
        N: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.lookup(label)
    }

    /// Every node label, in node index iteration order.
    pub fn get_all_locations(&self) -> Vec<N> {
        self.nodes.keys().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edge_count = 0;
    }
}

impl<N> Graph<N> {
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl<N: MapKey + Clone> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}
