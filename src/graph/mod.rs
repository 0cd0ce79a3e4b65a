//! The topology graph: labelled edges and nodes built from one or two input
//! geometries.
//!
//! A graph is a web of back-references (an edge's two directed ends point at
//! each other, rings point at their shells, nodes own stars of directed
//! edges). We don't model those as pointers. Every Edge, DirectedEdge, Node
//! and EdgeRing lives in a Vec owned by its graph (or ring builder), and
//! every reference is an array index into that Vec.

use std::error;
use std::fmt;

use crate::geo::Coordinate;

pub mod label;
pub mod depth;
pub mod edge_intersection;
pub mod edge;
pub mod edge_end;
pub mod directed_edge;
pub mod directed_edge_star;
pub mod node;
pub mod planar_graph;
pub mod index;
pub mod geometry_graph;
pub mod edge_ring;
pub mod noding_validator;

pub use self::label::{Label, Location, Position, TopologyLocation};
pub use self::depth::Depth;
pub use self::edge_intersection::{EdgeIntersection, EdgeIntersectionList};
pub use self::edge::{Edge, EdgeList};
pub use self::edge_end::{EdgeEnd, Quadrant};
pub use self::directed_edge::DirectedEdge;
pub use self::directed_edge_star::DirectedEdgeStar;
pub use self::node::{Node, NodeMap};
pub use self::planar_graph::PlanarGraph;
pub use self::index::SegmentIntersector;
pub use self::geometry_graph::GeometryGraph;
pub use self::edge_ring::{EdgeRing, RingKind};
pub use self::noding_validator::EdgeNodingValidator;

/// Index of an Edge in its graph's edge Vec.
pub type EdgeId = usize;
/// Index of a DirectedEdge in its PlanarGraph.
pub type DirEdgeId = usize;
/// Index of a Node in its NodeMap.
pub type NodeId = usize;
/// Index of an EdgeRing in the builder that made it.
pub type RingId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopologyErrorKind {
    /// An input ring or line had too few distinct points.
    TooFewPoints,
    /// Ring building reached a DirectedEdge that already belongs to the ring.
    VisitedTwice,
    /// An incoming result edge had no outgoing result edge to link to.
    NoOutgoingEdge,
    /// Depths propagated around a node did not come back to the start value.
    DepthMismatch,
    /// Both candidate rightmost edges at a node are horizontal.
    AmbiguousHorizontalEdges,
    /// Two edges cross somewhere that is not a node.
    NonNodedIntersection,
    /// Side labels around a node contradict each other.
    SideLocationConflict,
    /// An area label has one side set and the other unknown.
    SingleNullSide,
    /// A DirectedEdge side was given two different depths.
    AssignedDepthMismatch,
    /// Ring building followed a DirectedEdge with no next edge.
    UnlinkedDirectedEdge,
    /// A hole lies inside no shell.
    UnassignedHole,
    /// A maximal ring split into more than one shell.
    MultipleShells,
}

impl TopologyErrorKind {
    fn description(&self) -> &'static str {
        match *self {
            TopologyErrorKind::TooFewPoints => "too few points in geometry component",
            TopologyErrorKind::VisitedTwice => "directed edge visited twice during ring-building",
            TopologyErrorKind::NoOutgoingEdge => "no outgoing dirEdge found",
            TopologyErrorKind::DepthMismatch => "depth mismatch",
            TopologyErrorKind::AmbiguousHorizontalEdges => "found two horizontal edges incident on node",
            TopologyErrorKind::NonNodedIntersection => "found non-noded intersection",
            TopologyErrorKind::SideLocationConflict => "side location conflict",
            TopologyErrorKind::SingleNullSide => "found single null side",
            TopologyErrorKind::AssignedDepthMismatch => "assigned depths do not match",
            TopologyErrorKind::UnlinkedDirectedEdge => "found null directed edge",
            TopologyErrorKind::UnassignedHole => "unable to assign hole to a shell",
            TopologyErrorKind::MultipleShells => "found two shells in minimal edge ring list",
        }
    }
}

/// A fault found while building or linking a graph.
///
/// These mean the input was not simple or not noded (or there is a bug).
/// The whole operation is abandoned: nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopologyError {
    pub kind: TopologyErrorKind,
    /// The point nearest the fault, when there is one.
    pub coordinate: Option<Coordinate>,
}

impl TopologyError {
    pub fn new(kind: TopologyErrorKind, coordinate: Option<Coordinate>) -> TopologyError {
        TopologyError { kind: kind, coordinate: coordinate }
    }

    pub fn at(kind: TopologyErrorKind, coordinate: Coordinate) -> TopologyError {
        TopologyError::new(kind, Some(coordinate))
    }
}

impl error::Error for TopologyError {
    fn description(&self) -> &str {
        self.kind.description()
    }
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.coordinate {
            Some(ref c) => write!(f, "{} [ ({}) ]", self.kind.description(), c),
            None => write!(f, "{}", self.kind.description()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_with_coordinate() {
        let err = TopologyError::at(TopologyErrorKind::NoOutgoingEdge, Coordinate::new(1.0, 2.0));
        assert_eq!("no outgoing dirEdge found [ (1 2) ]", format!("{}", err));
    }

    #[test]
    fn display_without_coordinate() {
        let err = TopologyError::new(TopologyErrorKind::DepthMismatch, None);
        assert_eq!("depth mismatch", format!("{}", err));
    }
}
