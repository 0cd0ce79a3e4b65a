use std::collections::BTreeMap;
use std::fmt;

use crate::geo::Coordinate;
use super::directed_edge::DirectedEdge;
use super::directed_edge_star::DirectedEdgeStar;
use super::edge::Edge;
use super::label::{Label, Location};
use super::{DirEdgeId, NodeId};

/// A point where edges meet (or an isolated input point).
#[derive(Debug, Clone)]
pub struct Node {
    coord: Coordinate,
    pub star: DirectedEdgeStar,
    pub label: Label,
}

impl Node {
    pub fn new(coord: Coordinate) -> Node {
        Node {
            coord: coord,
            star: DirectedEdgeStar::new(),
            label: Label::new_geom_on(0, None),
        }
    }

    pub fn coordinate(&self) -> &Coordinate {
        &self.coord
    }

    /// True iff only one input geometry touches this node.
    pub fn is_isolated(&self) -> bool {
        self.label.geometry_count() == 1
    }

    pub fn set_label(&mut self, geom_index: usize, on: Option<Location>) {
        self.label.set_location_on(geom_index, on);
    }

    /// Toggles Boundary and Interior for geometry `geom_index`. An unknown
    /// location becomes Boundary.
    pub fn set_label_boundary(&mut self, geom_index: usize) {
        let new_loc = match self.label.location_on(geom_index) {
            Some(Location::Boundary) => Location::Interior,
            Some(Location::Interior) => Location::Boundary,
            _ => Location::Boundary,
        };
        self.label.set_location_on(geom_index, Some(new_loc));
    }

    /// Merges another Node's label into this one. Only unknown locations
    /// are filled, and a Boundary is never replaced.
    pub fn merge_label(&mut self, other: &Label) {
        for i in 0..2 {
            let mut loc = self.label.location_on(i);
            if !other.is_null(i) && loc != Some(Location::Boundary) {
                loc = other.location_on(i);
            }
            if self.label.location_on(i).is_none() {
                self.label.set_location_on(i, loc);
            }
        }
    }

    pub fn add_edge_end(&mut self, de: DirEdgeId, des: &[DirectedEdge]) {
        self.star.insert(de, des);
    }

    pub fn is_incident_edge_in_result(&self, des: &[DirectedEdge], edges: &[Edge]) -> bool {
        self.star.edges().iter().any(|&de| edges[des[de].edge()].is_in_result())
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "node {} lbl: {}", self.coord, self.label)
    }
}

/// The Nodes of a graph, one per distinct Coordinate.
///
/// Nodes are stored in insertion order (so NodeIds are stable) and indexed
/// by Coordinate. Iteration follows Coordinate order.
#[derive(Debug, Clone, Default)]
pub struct NodeMap {
    nodes: Vec<Node>,
    index: BTreeMap<Coordinate, NodeId>,
}

impl NodeMap {
    pub fn new() -> NodeMap {
        NodeMap { nodes: vec![], index: BTreeMap::new() }
    }

    /// Returns the Node at `coord`, creating it if needed.
    pub fn add_node(&mut self, coord: Coordinate) -> NodeId {
        if let Some(&id) = self.index.get(&coord) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(Node::new(coord));
        self.index.insert(coord, id);
        id
    }

    /// Adds `node`, or merges its label into the Node already at its
    /// Coordinate.
    pub fn add(&mut self, node: Node) -> NodeId {
        match self.index.get(node.coordinate()) {
            Some(&id) => {
                self.nodes[id].merge_label(&node.label);
                id
            }
            None => {
                let id = self.nodes.len();
                self.index.insert(node.coord, id);
                self.nodes.push(node);
                id
            }
        }
    }

    pub fn find(&self, coord: &Coordinate) -> Option<NodeId> {
        self.index.get(coord).cloned()
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// NodeIds in Coordinate order.
    pub fn ids(&self) -> Vec<NodeId> {
        self.index.values().cloned().collect()
    }

    /// Nodes in Coordinate order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item=&'a Node> + 'a {
        self.index.values().map(move |&id| &self.nodes[id])
    }

    /// Nodes on the boundary of geometry `geom_index`.
    pub fn boundary_nodes(&self, geom_index: usize) -> Vec<&Node> {
        self.iter()
            .filter(|n| n.label.location_on(geom_index) == Some(Location::Boundary))
            .collect()
    }
}
