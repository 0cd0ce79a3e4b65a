use crate::geo::Coordinate;
use crate::geo::algorithm::{orientation_index, Orientation};
use super::directed_edge::DirectedEdge;
use super::edge::Edge;
use super::edge_end::Quadrant;
use super::label::Location;
use super::node::NodeMap;
use super::{DirEdgeId, EdgeId, NodeId, TopologyError};

/// Edges, Nodes and DirectedEdges, all owned in flat arenas.
///
/// A GeometryGraph only ever fills `edges` and `nodes`. An overlay's result
/// graph also gets a pair of DirectedEdges per Edge (see `add_edges`), and
/// each DirectedEdge is registered in the star of the Node it leaves.
#[derive(Debug, Clone, Default)]
pub struct PlanarGraph {
    pub edges: Vec<Edge>,
    pub nodes: NodeMap,
    pub directed_edges: Vec<DirectedEdge>,
}

fn match_in_same_direction(p0: &Coordinate, p1: &Coordinate, ep0: &Coordinate, ep1: &Coordinate) -> bool {
    p0 == ep0
        && orientation_index(p0, p1, ep1) == Orientation::Collinear
        && Quadrant::of(p1.x - p0.x, p1.y - p0.y) == Quadrant::of(ep1.x - ep0.x, ep1.y - ep0.y)
}

impl PlanarGraph {
    pub fn new() -> PlanarGraph {
        PlanarGraph { edges: vec![], nodes: NodeMap::new(), directed_edges: vec![] }
    }

    /// Adds an Edge without DirectedEdges or nodes.
    pub fn insert_edge(&mut self, edge: Edge) -> EdgeId {
        self.edges.push(edge);
        self.edges.len() - 1
    }

    pub fn add_node(&mut self, coord: Coordinate) -> NodeId {
        self.nodes.add_node(coord)
    }

    /// Adds each Edge with its two DirectedEdges, and hooks the
    /// DirectedEdges into the Nodes at their start points.
    pub fn add_edges(&mut self, edges: Vec<Edge>) {
        for edge in edges {
            let edge_id = self.insert_edge(edge);
            let fwd = self.directed_edges.len();
            let rev = fwd + 1;

            let mut de_fwd = DirectedEdge::new(edge_id, &self.edges[edge_id], true);
            let mut de_rev = DirectedEdge::new(edge_id, &self.edges[edge_id], false);
            de_fwd.sym = rev;
            de_rev.sym = fwd;
            self.directed_edges.push(de_fwd);
            self.directed_edges.push(de_rev);

            self.add_edge_end(fwd);
            self.add_edge_end(rev);
        }
    }

    fn add_edge_end(&mut self, de: DirEdgeId) {
        let coord = *self.directed_edges[de].coordinate();
        let node_id = self.nodes.add_node(coord);
        self.directed_edges[de].set_node(node_id);
        let PlanarGraph { ref mut nodes, ref directed_edges, .. } = *self;
        nodes.get_mut(node_id).add_edge_end(de, directed_edges);
    }

    pub fn edge(&self, edge_id: EdgeId) -> &Edge {
        &self.edges[edge_id]
    }

    pub fn directed_edge(&self, de: DirEdgeId) -> &DirectedEdge {
        &self.directed_edges[de]
    }

    /// Links result DirectedEdges into maximal rings at every Node.
    pub fn link_result_directed_edges(&mut self) -> Result<(), TopologyError> {
        let PlanarGraph { ref nodes, ref mut directed_edges, .. } = *self;
        for node in nodes.iter() {
            node.star.link_result_directed_edges(directed_edges)?;
        }
        Ok(())
    }

    /// Links every DirectedEdge at every Node, ignoring result flags.
    pub fn link_all_directed_edges(&mut self) {
        let PlanarGraph { ref nodes, ref mut directed_edges, .. } = *self;
        for node in nodes.iter() {
            node.star.link_all_directed_edges(directed_edges);
        }
    }

    /// The first DirectedEdge walking `edge_id`.
    pub fn find_edge_end(&self, edge_id: EdgeId) -> Option<DirEdgeId> {
        self.directed_edges.iter().position(|de| de.edge() == edge_id)
    }

    /// The Edge whose first segment is exactly `p0`-`p1`.
    pub fn find_edge(&self, p0: &Coordinate, p1: &Coordinate) -> Option<EdgeId> {
        self.edges.iter().position(|e| {
            let pts = e.coordinates();
            *p0 == pts[0] && *p1 == pts[1]
        })
    }

    /// The Edge that starts (or ends) at `p0` heading the same way as
    /// `p0`->`p1`.
    pub fn find_edge_in_same_direction(&self, p0: &Coordinate, p1: &Coordinate) -> Option<EdgeId> {
        self.edges.iter().position(|e| {
            let pts = e.coordinates();
            let n = pts.len();
            match_in_same_direction(p0, p1, &pts[0], &pts[1])
                || match_in_same_direction(p0, p1, &pts[n - 1], &pts[n - 2])
        })
    }

    /// True iff there is a Node at `coord` on the boundary of geometry
    /// `geom_index`.
    pub fn is_boundary_node(&self, geom_index: usize, coord: &Coordinate) -> bool {
        match self.nodes.find(coord) {
            Some(id) => self.nodes.get(id).label.location_on(geom_index) == Some(Location::Boundary),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::label::Label;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn line(pts: &[(f64, f64)]) -> Edge {
        Edge::new(pts.iter().map(|&p| Coordinate::from(p)).collect(), Label::new_geom_on(0, Some(Location::Interior)))
    }

    //   (0,1)
    //     |
    //   (0,0)----(2,0)----(3,1)
    fn graph() -> PlanarGraph {
        let mut graph = PlanarGraph::new();
        graph.add_edges(vec![
            line(&[ (0.0, 0.0), (2.0, 0.0) ]),
            line(&[ (2.0, 0.0), (3.0, 1.0) ]),
            line(&[ (0.0, 1.0), (0.0, 0.0) ]),
        ]);
        graph
    }

    #[test]
    fn add_edges_pairs_directed_edges() {
        let graph = graph();
        assert_eq!(6, graph.directed_edges.len());
        for (i, de) in graph.directed_edges.iter().enumerate() {
            assert_eq!(i, graph.directed_edges[de.sym].sym);
            assert!(de.is_forward() != graph.directed_edges[de.sym].is_forward());
        }
        assert_eq!(4, graph.nodes.len());
        let origin = graph.nodes.find(&c(0.0, 0.0)).unwrap();
        assert_eq!(2, graph.nodes.get(origin).star.degree());
        assert_eq!(Some(origin), graph.directed_edges[0].node());
    }

    #[test]
    fn find_edges() {
        let graph = graph();
        assert_eq!(Some(1), graph.find_edge(&c(2.0, 0.0), &c(3.0, 1.0)));
        assert_eq!(None, graph.find_edge(&c(3.0, 1.0), &c(2.0, 0.0)));
        assert_eq!(Some(1), graph.find_edge_in_same_direction(&c(2.0, 0.0), &c(4.0, 2.0)));
        assert_eq!(Some(2), graph.find_edge_in_same_direction(&c(0.0, 0.0), &c(0.0, 0.5)));
        assert_eq!(None, graph.find_edge_in_same_direction(&c(0.0, 0.0), &c(0.0, -1.0)));
        assert_eq!(Some(2), graph.find_edge_end(1));
    }

    #[test]
    fn boundary_node() {
        let mut graph = graph();
        let id = graph.nodes.find(&c(3.0, 1.0)).unwrap();
        graph.nodes.get_mut(id).set_label(0, Some(Location::Boundary));
        assert!(graph.is_boundary_node(0, &c(3.0, 1.0)));
        assert!(!graph.is_boundary_node(1, &c(3.0, 1.0)));
        assert!(!graph.is_boundary_node(0, &c(0.0, 0.0)));
        assert!(!graph.is_boundary_node(0, &c(9.0, 9.0)));
    }

    #[test]
    fn link_all_makes_cycles() {
        let mut graph = graph();
        graph.link_all_directed_edges();
        // Every incoming edge at a node of degree > 0 has a next edge.
        assert!(graph.directed_edges.iter().all(|de| de.next.is_some()));
    }
}
