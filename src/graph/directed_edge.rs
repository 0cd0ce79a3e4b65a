use std::fmt;

use crate::geo::Coordinate;
use super::edge::Edge;
use super::edge_end::{EdgeEnd, Quadrant};
use super::label::{Label, Location, Position};
use super::{DirEdgeId, EdgeId, NodeId, RingId, TopologyError, TopologyErrorKind};

const UNSET_DEPTH: i32 = -999;

/// One of the two directions an Edge can be walked in.
///
/// DirectedEdges come in pairs, one per direction, and each knows its
/// partner (`sym`). Ring building threads them together with `next` (for
/// maximal rings) and `next_min` (for minimal rings).
#[derive(Debug, Clone)]
pub struct DirectedEdge {
    end: EdgeEnd,
    is_forward: bool,
    is_in_result: bool,
    is_visited: bool,
    pub sym: DirEdgeId,
    pub next: Option<DirEdgeId>,
    pub next_min: Option<DirEdgeId>,
    pub edge_ring: Option<RingId>,
    pub min_edge_ring: Option<RingId>,
    // Indexed by Position; the On slot is never set.
    depth: [i32; 3],
}

impl DirectedEdge {
    /// Builds the DirectedEdge walking `edge` (stored at `edge_id`) forwards
    /// or backwards. `sym` must be fixed up once the partner exists.
    pub fn new(edge_id: EdgeId, edge: &Edge, is_forward: bool) -> DirectedEdge {
        let pts = edge.coordinates();
        let n = pts.len();
        let (p0, p1) = if is_forward {
            (pts[0], pts[1])
        } else {
            (pts[n - 1], pts[n - 2])
        };

        let mut label = *edge.label();
        if !is_forward {
            label.flip();
        }

        DirectedEdge {
            end: EdgeEnd::new(edge_id, p0, p1, label),
            is_forward: is_forward,
            is_in_result: false,
            is_visited: false,
            sym: 0,
            next: None,
            next_min: None,
            edge_ring: None,
            min_edge_ring: None,
            depth: [0, UNSET_DEPTH, UNSET_DEPTH],
        }
    }

    /// `-1`, `0` or `1`: how the depth changes crossing from `curr` to
    /// `next`.
    pub fn depth_factor(curr: Location, next: Location) -> i32 {
        match (curr, next) {
            (Location::Exterior, Location::Interior) => 1,
            (Location::Interior, Location::Exterior) => -1,
            _ => 0,
        }
    }

    pub fn end(&self) -> &EdgeEnd {
        &self.end
    }

    pub fn edge(&self) -> EdgeId {
        self.end.edge
    }

    pub fn node(&self) -> Option<NodeId> {
        self.end.node
    }

    pub fn set_node(&mut self, node: NodeId) {
        self.end.node = Some(node);
    }

    pub fn coordinate(&self) -> &Coordinate {
        self.end.coordinate()
    }

    pub fn quadrant(&self) -> Quadrant {
        self.end.quadrant()
    }

    pub fn dy(&self) -> f64 {
        self.end.dy()
    }

    pub fn label(&self) -> &Label {
        &self.end.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.end.label
    }

    pub fn is_forward(&self) -> bool {
        self.is_forward
    }

    pub fn is_in_result(&self) -> bool {
        self.is_in_result
    }

    pub fn set_in_result(&mut self, is_in_result: bool) {
        self.is_in_result = is_in_result;
    }

    pub fn is_visited(&self) -> bool {
        self.is_visited
    }

    pub fn set_visited(&mut self, is_visited: bool) {
        self.is_visited = is_visited;
    }

    pub fn depth(&self, pos: Position) -> i32 {
        self.depth[pos as usize]
    }

    /// Sets the depth on one side. A side can be set again only to the same
    /// value.
    pub fn set_depth(&mut self, pos: Position, depth: i32) -> Result<(), TopologyError> {
        let current = self.depth[pos as usize];
        if current != UNSET_DEPTH && current != depth {
            return Err(TopologyError::at(TopologyErrorKind::AssignedDepthMismatch, *self.coordinate()));
        }
        self.depth[pos as usize] = depth;
        Ok(())
    }

    /// The edge's depth delta, seen walking in this direction.
    pub fn depth_delta(&self, edge: &Edge) -> i32 {
        if self.is_forward { edge.depth_delta() } else { -edge.depth_delta() }
    }

    /// Sets the depth on side `pos`, and derives the opposite side from the
    /// edge's depth delta.
    pub fn set_edge_depths(&mut self, edge: &Edge, pos: Position, depth: i32) -> Result<(), TopologyError> {
        let direction_factor = if pos == Position::Left { -1 } else { 1 };
        let opposite_depth = depth + self.depth_delta(edge) * direction_factor;
        self.set_depth(pos, depth)?;
        self.set_depth(pos.opposite(), opposite_depth)
    }

    /// A line edge: a line in some input and not inside any input area.
    pub fn is_line_edge(&self) -> bool {
        let label = self.label();
        let is_line = label.is_line(0) || label.is_line(1);
        let is_exterior_if_area_0 = !label.is_area_of(0) || label.all_positions_equal(0, Location::Exterior);
        let is_exterior_if_area_1 = !label.is_area_of(1) || label.all_positions_equal(1, Location::Exterior);
        is_line && is_exterior_if_area_0 && is_exterior_if_area_1
    }

    /// An edge with both inputs' interiors on both sides. It can't be in any
    /// result boundary.
    pub fn is_interior_area_edge(&self) -> bool {
        let label = self.label();
        (0..2).all(|i| {
            label.is_area_of(i)
                && label.location(i, Position::Left) == Some(Location::Interior)
                && label.location(i, Position::Right) == Some(Location::Interior)
        })
    }
}

/// Marks a DirectedEdge and its sym visited (or not).
pub fn set_visited_edge(des: &mut [DirectedEdge], de: DirEdgeId, is_visited: bool) {
    let sym = des[de].sym;
    des[de].set_visited(is_visited);
    des[sym].set_visited(is_visited);
}

impl fmt::Display for DirectedEdge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}/{}", self.end, self.depth[1], self.depth[2])?;
        if self.is_in_result {
            write!(f, " inResult")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const I: Option<Location> = Some(Location::Interior);
    const B: Option<Location> = Some(Location::Boundary);
    const E: Option<Location> = Some(Location::Exterior);

    fn area_edge() -> Edge {
        let pts = vec![ Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0), Coordinate::new(2.0, 1.0) ];
        Edge::new(pts, Label::new_geom_area(0, B, E, I))
    }

    #[test]
    fn reverse_flips_label_and_direction() {
        let edge = area_edge();
        let fwd = DirectedEdge::new(0, &edge, true);
        let rev = DirectedEdge::new(0, &edge, false);
        assert_eq!(Coordinate::new(0.0, 0.0), *fwd.coordinate());
        assert_eq!(Coordinate::new(2.0, 1.0), *rev.coordinate());
        assert_eq!(Coordinate::new(1.0, 0.0), *rev.end().directed_coordinate());
        assert_eq!(I, fwd.label().location(0, Position::Right));
        assert_eq!(E, rev.label().location(0, Position::Right));
    }

    #[test]
    fn edge_depths_follow_delta() {
        let mut edge = area_edge();
        edge.set_depth_delta(1);
        let mut fwd = DirectedEdge::new(0, &edge, true);
        fwd.set_edge_depths(&edge, Position::Right, 1).unwrap();
        assert_eq!(2, fwd.depth(Position::Left));

        let mut rev = DirectedEdge::new(0, &edge, false);
        rev.set_edge_depths(&edge, Position::Left, 1).unwrap();
        assert_eq!(2, rev.depth(Position::Right));
    }

    #[test]
    fn conflicting_depth_is_an_error() {
        let edge = area_edge();
        let mut de = DirectedEdge::new(0, &edge, true);
        de.set_depth(Position::Left, 2).unwrap();
        de.set_depth(Position::Left, 2).unwrap();
        let err = de.set_depth(Position::Left, 3).unwrap_err();
        assert_eq!(TopologyErrorKind::AssignedDepthMismatch, err.kind);
    }

    #[test]
    fn line_and_interior_edges() {
        let pts = vec![ Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 0.0) ];
        let line = Edge::new(pts.clone(), Label::new_geom_on(0, I));
        assert!(DirectedEdge::new(0, &line, true).is_line_edge());

        let area = Edge::new(pts, Label::new_area(B, I, I));
        let de = DirectedEdge::new(0, &area, true);
        assert!(!de.is_line_edge());
        assert!(de.is_interior_area_edge());
    }

    #[test]
    fn depth_factor() {
        assert_eq!(1, DirectedEdge::depth_factor(Location::Exterior, Location::Interior));
        assert_eq!(-1, DirectedEdge::depth_factor(Location::Interior, Location::Exterior));
        assert_eq!(0, DirectedEdge::depth_factor(Location::Interior, Location::Interior));
    }
}
