use crate::geo::{Coordinate, Envelope, GeometryFactory, LinearRing, Polygon};
use crate::geo::algorithm::{is_ccw, is_in_ring};
use super::directed_edge::DirectedEdge;
use super::label::{Label, Position};
use super::planar_graph::PlanarGraph;
use super::{DirEdgeId, RingId, TopologyError, TopologyErrorKind};

/// Which links a ring follows.
///
/// A Maximal ring follows `next` and claims edges through `edge_ring`. It
/// may touch itself at a node. A Minimal ring follows `next_min` and claims
/// edges through `min_edge_ring`; it never touches itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingKind {
    Maximal,
    Minimal,
}

impl RingKind {
    fn next(self, de: &DirectedEdge) -> Option<DirEdgeId> {
        match self {
            RingKind::Maximal => de.next,
            RingKind::Minimal => de.next_min,
        }
    }

    fn ring_of(self, de: &DirectedEdge) -> Option<RingId> {
        match self {
            RingKind::Maximal => de.edge_ring,
            RingKind::Minimal => de.min_edge_ring,
        }
    }

    fn set_ring(self, de: &mut DirectedEdge, ring: RingId) {
        match self {
            RingKind::Maximal => de.edge_ring = Some(ring),
            RingKind::Minimal => de.min_edge_ring = Some(ring),
        }
    }
}

/// A closed walk of DirectedEdges, realized as a LinearRing.
///
/// Rings live in a Vec owned by whoever builds them, and `id` is the ring's
/// index in that Vec. A hole points at its shell; a shell lists its holes.
#[derive(Debug, Clone)]
pub struct EdgeRing {
    kind: RingKind,
    id: RingId,
    start_de: DirEdgeId,
    edges: Vec<DirEdgeId>,
    pts: Vec<Coordinate>,
    label: Label,
    ring: LinearRing,
    envelope: Envelope,
    is_hole: bool,
    shell: Option<RingId>,
    holes: Vec<RingId>,
    max_node_degree: Option<usize>,
}

impl EdgeRing {
    /// Walks from `start` until it comes back, claiming each DirectedEdge
    /// for ring `id`.
    ///
    /// Fails with `VisitedTwice` if the walk reaches an edge this ring
    /// already claimed (so it would never return to `start`), and with
    /// `UnlinkedDirectedEdge` if it reaches an edge with no link to follow.
    pub fn new(kind: RingKind, start: DirEdgeId, id: RingId, graph: &mut PlanarGraph, factory: &dyn GeometryFactory) -> Result<EdgeRing, TopologyError> {
        let mut ret = EdgeRing {
            kind: kind,
            id: id,
            start_de: start,
            edges: vec![],
            pts: vec![],
            label: Label::new_on(None),
            ring: LinearRing(vec![]),
            envelope: Envelope::null(),
            is_hole: false,
            shell: None,
            holes: vec![],
            max_node_degree: None,
        };
        ret.compute_points(graph)?;
        ret.compute_ring(factory);
        Ok(ret)
    }

    fn compute_points(&mut self, graph: &mut PlanarGraph) -> Result<(), TopologyError> {
        let PlanarGraph { ref edges, ref mut directed_edges, .. } = *graph;

        let mut de = self.start_de;
        let mut is_first_edge = true;
        loop {
            if self.kind.ring_of(&directed_edges[de]) == Some(self.id) {
                return Err(TopologyError::at(TopologyErrorKind::VisitedTwice, *directed_edges[de].coordinate()));
            }

            self.edges.push(de);
            let label = *directed_edges[de].label();
            self.merge_label(&label);

            let pts = edges[directed_edges[de].edge()].coordinates();
            if directed_edges[de].is_forward() {
                let start = if is_first_edge { 0 } else { 1 };
                self.pts.extend_from_slice(&pts[start..]);
            } else {
                let end = if is_first_edge { pts.len() } else { pts.len() - 1 };
                self.pts.extend(pts[..end].iter().rev());
            }
            is_first_edge = false;

            self.kind.set_ring(&mut directed_edges[de], self.id);

            de = match self.kind.next(&directed_edges[de]) {
                Some(next) => next,
                None => return Err(TopologyError::at(TopologyErrorKind::UnlinkedDirectedEdge, *directed_edges[de].coordinate())),
            };
            if de == self.start_de {
                return Ok(());
            }
        }
    }

    // The ring's face is on the right of each DirectedEdge, so the right
    // side says where the ring lies in each input.
    fn merge_label(&mut self, de_label: &Label) {
        for i in 0..2 {
            let loc = de_label.location(i, Position::Right);
            if loc.is_some() && self.label.location_on(i).is_none() {
                self.label.set_location_on(i, loc);
            }
        }
    }

    fn compute_ring(&mut self, factory: &dyn GeometryFactory) {
        self.ring = factory.create_linear_ring(self.pts.clone());
        self.envelope = self.ring.envelope();
        self.is_hole = is_ccw(self.ring.coordinates());
    }

    pub fn id(&self) -> RingId {
        self.id
    }

    pub fn kind(&self) -> RingKind {
        self.kind
    }

    pub fn start(&self) -> DirEdgeId {
        self.start_de
    }

    /// The DirectedEdges walked, in order.
    pub fn edges(&self) -> &[DirEdgeId] {
        &self.edges
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.pts
    }

    pub fn coordinate(&self, i: usize) -> &Coordinate {
        &self.pts[i]
    }

    /// Where the ring lies in each input.
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn linear_ring(&self) -> &LinearRing {
        &self.ring
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    /// True iff the ring runs counter-clockwise.
    pub fn is_hole(&self) -> bool {
        self.is_hole
    }

    pub fn is_shell(&self) -> bool {
        self.shell.is_none()
    }

    pub fn shell(&self) -> Option<RingId> {
        self.shell
    }

    pub fn holes(&self) -> &[RingId] {
        &self.holes
    }

    /// Makes `shell` the shell of `hole` and adds `hole` to its holes.
    pub fn set_shell(rings: &mut [EdgeRing], hole: RingId, shell: RingId) {
        rings[hole].shell = Some(shell);
        rings[shell].holes.push(hole);
    }

    /// Marks every Edge this ring walks as part of the result.
    pub fn set_in_result(&self, graph: &mut PlanarGraph) {
        let PlanarGraph { ref mut edges, ref directed_edges, .. } = *graph;
        for &de in self.edges.iter() {
            edges[directed_edges[de].edge()].set_in_result(true);
        }
    }

    /// True iff `p` is inside this ring and not inside any of its holes.
    /// (`rings` is the Vec this ring and its holes live in.)
    pub fn contains_point(&self, p: &Coordinate, rings: &[EdgeRing]) -> bool {
        if !self.envelope.contains_coordinate(p) {
            return false;
        }
        if !is_in_ring(p, self.ring.coordinates()) {
            return false;
        }
        !self.holes.iter().any(|&hole| rings[hole].contains_point(p, rings))
    }

    pub fn to_polygon(&self, rings: &[EdgeRing], factory: &dyn GeometryFactory) -> Polygon {
        let holes = self.holes.iter().map(|&h| rings[h].ring.clone()).collect();
        factory.create_polygon(self.ring.clone(), holes)
    }

    /// Twice the largest number of this ring's outgoing edges at any of its
    /// nodes. Above 2, the ring touches itself.
    pub fn max_node_degree(&mut self, graph: &PlanarGraph) -> usize {
        if let Some(degree) = self.max_node_degree {
            return degree;
        }

        let degree = self.edges.iter()
            .filter_map(|&de| graph.directed_edges[de].node())
            .map(|node| graph.nodes.get(node).star.outgoing_degree_in_ring(&graph.directed_edges, self.id))
            .max()
            .unwrap_or(0) * 2;
        self.max_node_degree = Some(degree);
        degree
    }

    /// Links `next_min` at every node of this (maximal) ring.
    pub fn link_directed_edges_for_minimal_edge_rings(&self, graph: &mut PlanarGraph) -> Result<(), TopologyError> {
        let PlanarGraph { ref nodes, ref mut directed_edges, .. } = *graph;
        for &de in self.edges.iter() {
            if let Some(node) = directed_edges[de].node() {
                nodes.get(node).star.link_minimal_directed_edges(directed_edges, self.id)?;
            }
        }
        Ok(())
    }

    /// Splits this (maximal) ring into minimal rings, numbered from
    /// `first_id`. Call `link_directed_edges_for_minimal_edge_rings` first.
    pub fn build_minimal_rings(&self, first_id: RingId, graph: &mut PlanarGraph, factory: &dyn GeometryFactory) -> Result<Vec<EdgeRing>, TopologyError> {
        let mut ret = vec![];
        for &de in self.edges.iter() {
            if graph.directed_edges[de].min_edge_ring.is_none() {
                let ring = EdgeRing::new(RingKind::Minimal, de, first_id + ret.len(), graph, factory)?;
                ret.push(ring);
            }
        }
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::DefaultGeometryFactory;
    use crate::graph::edge::Edge;
    use crate::graph::label::Location;

    fn area_edge(pts: &[(f64, f64)]) -> Edge {
        let label = Label::new_geom_area(0, Some(Location::Boundary), Some(Location::Exterior), Some(Location::Interior));
        Edge::new(pts.iter().map(|&p| Coordinate::from(p)).collect(), label)
    }

    fn graph(edges: Vec<Edge>) -> PlanarGraph {
        let mut graph = PlanarGraph::new();
        graph.add_edges(edges);
        graph
    }

    // Clockwise squares; each is one closed Edge, so forward DirectedEdge
    // 2i links to itself.
    fn cw_square(x0: f64, y0: f64, x1: f64, y1: f64) -> Edge {
        area_edge(&[ (x0, y0), (x0, y1), (x1, y1), (x1, y0), (x0, y0) ])
    }

    #[test]
    fn clockwise_ring_is_not_a_hole() {
        let mut graph = graph(vec![ cw_square(0.0, 0.0, 1.0, 1.0) ]);
        graph.directed_edges[0].next = Some(0);
        let ring = EdgeRing::new(RingKind::Maximal, 0, 0, &mut graph, &DefaultGeometryFactory).unwrap();
        assert!(!ring.is_hole());
        assert!(ring.is_shell());
        assert_eq!(5, ring.coordinates().len());
        assert_eq!(Some(0), graph.directed_edges[0].edge_ring);
        assert_eq!(Some(Location::Interior), ring.label().location_on(0));
        assert!(ring.label().is_null(1));
    }

    #[test]
    fn counter_clockwise_ring_is_a_hole() {
        let mut graph = graph(vec![ cw_square(0.0, 0.0, 1.0, 1.0) ]);
        graph.directed_edges[1].next = Some(1);
        let ring = EdgeRing::new(RingKind::Maximal, 1, 0, &mut graph, &DefaultGeometryFactory).unwrap();
        assert!(ring.is_hole());
        assert_eq!(Coordinate::new(0.0, 0.0), *ring.coordinate(0));
        assert_eq!(Coordinate::new(1.0, 0.0), *ring.coordinate(1));
        // Walking backwards puts the exterior on the right.
        assert_eq!(Some(Location::Exterior), ring.label().location_on(0));
    }

    #[test]
    fn walk_that_never_returns_is_an_error() {
        //  (0,0)----(1,0)----(2,0)
        let mut graph = graph(vec![
            area_edge(&[ (0.0, 0.0), (1.0, 0.0) ]),
            area_edge(&[ (1.0, 0.0), (2.0, 0.0) ]),
        ]);
        graph.directed_edges[0].next = Some(2);
        graph.directed_edges[2].next = Some(2);
        let err = EdgeRing::new(RingKind::Maximal, 0, 0, &mut graph, &DefaultGeometryFactory).unwrap_err();
        assert_eq!(TopologyErrorKind::VisitedTwice, err.kind);
        assert_eq!(Some(Coordinate::new(1.0, 0.0)), err.coordinate);
    }

    #[test]
    fn unlinked_walk_is_an_error() {
        let mut graph = graph(vec![ area_edge(&[ (0.0, 0.0), (1.0, 0.0) ]) ]);
        let err = EdgeRing::new(RingKind::Minimal, 0, 0, &mut graph, &DefaultGeometryFactory).unwrap_err();
        assert_eq!(TopologyErrorKind::UnlinkedDirectedEdge, err.kind);
    }

    #[test]
    fn point_in_hole_is_not_contained() {
        //  +-----------+ (9,9)
        //  |           |
        //  |   +---+   |
        //  |   | x |   |
        //  |   +---+   |
        //  | x         |
        //  +-----------+
        let mut graph = graph(vec![ cw_square(0.0, 0.0, 9.0, 9.0), cw_square(3.0, 3.0, 6.0, 6.0) ]);
        graph.directed_edges[0].next = Some(0);
        graph.directed_edges[3].next = Some(3);
        let shell = EdgeRing::new(RingKind::Maximal, 0, 0, &mut graph, &DefaultGeometryFactory).unwrap();
        let hole = EdgeRing::new(RingKind::Maximal, 3, 1, &mut graph, &DefaultGeometryFactory).unwrap();
        assert!(hole.is_hole());

        let mut rings = vec![ shell, hole ];
        EdgeRing::set_shell(&mut rings, 1, 0);
        assert_eq!(Some(0), rings[1].shell());
        assert_eq!(&[ 1 ], rings[0].holes());

        assert!(rings[0].contains_point(&Coordinate::new(1.0, 1.0), &rings));
        assert!(!rings[0].contains_point(&Coordinate::new(4.5, 4.5), &rings));
        assert!(!rings[0].contains_point(&Coordinate::new(20.0, 4.5), &rings));

        let polygon = rings[0].to_polygon(&rings, &DefaultGeometryFactory);
        assert_eq!(1, polygon.interiors.len());
        assert_eq!(81.0 - 9.0, polygon.area());
    }

    #[test]
    fn self_touching_ring_splits_into_minimal_rings() {
        //          +---+ (2,2)
        //          | B |
        //  +---+---+---+
        //  | A |
        //  +---+
        //
        // Both squares start at (1,1). Walking them backwards makes one
        // maximal ring through (1,1) twice.
        let mut graph = graph(vec![
            area_edge(&[ (1.0, 1.0), (1.0, 0.0), (0.0, 0.0), (0.0, 1.0), (1.0, 1.0) ]),
            area_edge(&[ (1.0, 1.0), (1.0, 2.0), (2.0, 2.0), (2.0, 1.0), (1.0, 1.0) ]),
        ]);
        graph.directed_edges[1].set_in_result(true);
        graph.directed_edges[3].set_in_result(true);
        graph.link_result_directed_edges().unwrap();
        assert_eq!(Some(3), graph.directed_edges[1].next);
        assert_eq!(Some(1), graph.directed_edges[3].next);

        let mut max_ring = EdgeRing::new(RingKind::Maximal, 1, 0, &mut graph, &DefaultGeometryFactory).unwrap();
        assert_eq!(9, max_ring.coordinates().len());
        assert_eq!(4, max_ring.max_node_degree(&graph));

        max_ring.link_directed_edges_for_minimal_edge_rings(&mut graph).unwrap();
        let min_rings = max_ring.build_minimal_rings(1, &mut graph, &DefaultGeometryFactory).unwrap();
        assert_eq!(2, min_rings.len());
        assert_eq!(vec![ 1, 2 ], min_rings.iter().map(|r| r.id()).collect::<Vec<_>>());
        assert!(min_rings.iter().all(|r| r.is_hole() && r.coordinates().len() == 5));
        assert_eq!(Some(2), graph.directed_edges[3].min_edge_ring);

        max_ring.set_in_result(&mut graph);
        assert!(graph.edges.iter().all(|e| e.is_in_result()));
    }
}
