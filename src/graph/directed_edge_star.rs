use crate::geo::{Coordinate, Geometry};
use crate::geo::algorithm::locate_point_in_area;
use super::directed_edge::DirectedEdge;
use super::edge::Edge;
use super::label::{Label, Location, Position};
use super::{DirEdgeId, RingId, TopologyError, TopologyErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LinkState {
    ScanningForIncoming,
    LinkingToOutgoing,
}

/// The outgoing DirectedEdges around one Node, sorted counter-clockwise.
///
/// The star only holds ids. Every operation takes the graph's DirectedEdge
/// (and sometimes Edge) arena as an argument.
#[derive(Debug, Clone)]
pub struct DirectedEdgeStar {
    edges: Vec<DirEdgeId>,
    label: Label,
}

impl Default for DirectedEdgeStar {
    fn default() -> DirectedEdgeStar {
        DirectedEdgeStar::new()
    }
}

impl DirectedEdgeStar {
    pub fn new() -> DirectedEdgeStar {
        DirectedEdgeStar { edges: vec![], label: Label::new_on(None) }
    }

    /// Inserts `de` in direction order. An edge with exactly the same
    /// direction as one already present replaces it.
    pub fn insert(&mut self, de: DirEdgeId, des: &[DirectedEdge]) {
        let end = des[de].end();
        match self.edges.binary_search_by(|&other| des[other].end().compare_direction(end)) {
            Ok(i) => self.edges[i] = de,
            Err(i) => self.edges.insert(i, de),
        }
    }

    pub fn edges(&self) -> &[DirEdgeId] {
        &self.edges
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    /// The Node label this star implies, once `compute_labelling` has run.
    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn coordinate(&self, des: &[DirectedEdge]) -> Option<Coordinate> {
        self.edges.first().map(|&de| *des[de].coordinate())
    }

    pub fn find_index(&self, de: DirEdgeId) -> Option<usize> {
        self.edges.iter().position(|&e| e == de)
    }

    /// Number of outgoing edges in the result.
    pub fn outgoing_degree(&self, des: &[DirectedEdge]) -> usize {
        self.edges.iter().filter(|&&de| des[de].is_in_result()).count()
    }

    /// Number of outgoing edges belonging to maximal ring `ring`.
    pub fn outgoing_degree_in_ring(&self, des: &[DirectedEdge], ring: RingId) -> usize {
        self.edges.iter().filter(|&&de| des[de].edge_ring == Some(ring)).count()
    }

    /// The edges that are in the result or whose sym is.
    pub fn result_area_edges(&self, des: &[DirectedEdge]) -> Vec<DirEdgeId> {
        self.edges.iter()
            .cloned()
            .filter(|&de| des[de].is_in_result() || des[des[de].sym].is_in_result())
            .collect()
    }

    /// Fills in every unknown location on the DirectedEdges' labels, then
    /// computes the star's own label.
    ///
    /// Side locations propagate around the star. Anything still unknown is
    /// Exterior when the node has a collapsed (line-labelled Boundary) edge,
    /// and otherwise comes from locating the node in the other input's area.
    pub fn compute_labelling(&mut self, des: &mut [DirectedEdge], edges: &[Edge], geoms: [&Geometry; 2]) -> Result<(), TopologyError> {
        self.propagate_side_labels(0, des)?;
        self.propagate_side_labels(1, des)?;

        let mut has_dimensional_collapse_edge = [false, false];
        for &de in self.edges.iter() {
            let label = des[de].label();
            for i in 0..2 {
                if label.is_line(i) && label.location_on(i) == Some(Location::Boundary) {
                    has_dimensional_collapse_edge[i] = true;
                }
            }
        }

        let mut pt_in_area_location: [Option<Location>; 2] = [None, None];
        for &de in self.edges.iter() {
            let coord = *des[de].coordinate();
            for i in 0..2 {
                if !des[de].label().is_any_null(i) {
                    continue;
                }
                let loc = if has_dimensional_collapse_edge[i] {
                    Location::Exterior
                } else {
                    *pt_in_area_location[i].get_or_insert_with(|| locate_point_in_area(&coord, geoms[i]))
                };
                des[de].label_mut().set_all_locations_if_null(i, Some(loc));
            }
        }

        let mut label = Label::new_on(None);
        for &de in self.edges.iter() {
            let edge_label = edges[des[de].edge()].label();
            for i in 0..2 {
                match edge_label.location_on(i) {
                    Some(Location::Interior) | Some(Location::Boundary) => label.set_location_on(i, Some(Location::Interior)),
                    _ => {}
                }
            }
        }
        self.label = label;
        Ok(())
    }

    fn propagate_side_labels(&self, geom_index: usize, des: &mut [DirectedEdge]) -> Result<(), TopologyError> {
        let mut start_loc = None;
        for &de in self.edges.iter() {
            let label = des[de].label();
            if label.is_area_of(geom_index) && label.location(geom_index, Position::Left).is_some() {
                start_loc = label.location(geom_index, Position::Left);
            }
        }

        let mut curr_loc = match start_loc {
            Some(loc) => loc,
            None => return Ok(()),
        };

        for &de in self.edges.iter() {
            let coord = *des[de].coordinate();
            let label = des[de].label_mut();
            if label.location_on(geom_index).is_none() {
                label.set_location_on(geom_index, Some(curr_loc));
            }
            if !label.is_area_of(geom_index) {
                continue;
            }

            let left_loc = label.location(geom_index, Position::Left);
            let right_loc = label.location(geom_index, Position::Right);
            match (left_loc, right_loc) {
                (Some(left), Some(right)) => {
                    if right != curr_loc {
                        return Err(TopologyError::at(TopologyErrorKind::SideLocationConflict, coord));
                    }
                    curr_loc = left;
                }
                (None, Some(_)) | (Some(_), None) => {
                    return Err(TopologyError::at(TopologyErrorKind::SingleNullSide, coord));
                }
                (None, None) => {
                    label.set_location(geom_index, Position::Right, Some(curr_loc));
                    label.set_location(geom_index, Position::Left, Some(curr_loc));
                }
            }
        }
        Ok(())
    }

    /// Fills unknown slots in each DirectedEdge's label from its sym's.
    pub fn merge_sym_labels(&self, des: &mut [DirectedEdge]) {
        for &de in self.edges.iter() {
            let sym_label = *des[des[de].sym].label();
            des[de].label_mut().merge(&sym_label);
        }
    }

    /// Fills unknown slots in each DirectedEdge's label from the node's.
    pub fn update_labelling(&self, node_label: &Label, des: &mut [DirectedEdge]) {
        for &de in self.edges.iter() {
            let label = des[de].label_mut();
            label.set_all_locations_if_null(0, node_label.location_on(0));
            label.set_all_locations_if_null(1, node_label.location_on(1));
        }
    }

    /// The edge leaving the node furthest right. With no edges there is
    /// none.
    pub fn rightmost_edge(&self, des: &[DirectedEdge]) -> Result<Option<DirEdgeId>, TopologyError> {
        let (de0, de_last) = match (self.edges.first(), self.edges.last()) {
            (Some(&first), Some(&last)) => (first, last),
            _ => return Ok(None),
        };
        if self.edges.len() == 1 {
            return Ok(Some(de0));
        }

        let northern0 = des[de0].quadrant().is_northern();
        let northern1 = des[de_last].quadrant().is_northern();
        if northern0 && northern1 {
            Ok(Some(de0))
        } else if !northern0 && !northern1 {
            Ok(Some(de_last))
        } else if des[de0].dy() != 0.0 {
            Ok(Some(de0))
        } else if des[de_last].dy() != 0.0 {
            Ok(Some(de_last))
        } else {
            Err(TopologyError::at(TopologyErrorKind::AmbiguousHorizontalEdges, *des[de0].coordinate()))
        }
    }

    /// Marks each line edge at this node covered or not, by sweeping around
    /// the node and tracking whether we are inside the result area.
    pub fn find_covered_line_edges(&self, des: &[DirectedEdge], edges: &mut [Edge]) {
        let mut start_loc = None;
        for &out in self.edges.iter() {
            let inc = des[out].sym;
            if !des[out].is_line_edge() {
                if des[out].is_in_result() {
                    start_loc = Some(Location::Interior);
                    break;
                }
                if des[inc].is_in_result() {
                    start_loc = Some(Location::Exterior);
                    break;
                }
            }
        }

        let mut curr_loc = match start_loc {
            Some(loc) => loc,
            None => return,
        };

        for &out in self.edges.iter() {
            let inc = des[out].sym;
            if des[out].is_line_edge() {
                edges[des[out].edge()].set_covered(curr_loc == Location::Interior);
            } else {
                if des[out].is_in_result() {
                    curr_loc = Location::Exterior;
                }
                if des[inc].is_in_result() {
                    curr_loc = Location::Interior;
                }
            }
        }
    }

    /// Propagates depths around the star, starting after `de` (whose
    /// depths must be set) and wrapping back to it. The depth that comes
    /// back must equal `de`'s right depth.
    pub fn compute_depths(&self, de: DirEdgeId, des: &mut [DirectedEdge], edges: &[Edge]) -> Result<(), TopologyError> {
        let start_index = match self.find_index(de) {
            Some(i) => i,
            None => return Err(TopologyError::at(TopologyErrorKind::DepthMismatch, *des[de].coordinate())),
        };
        let start_depth = des[de].depth(Position::Left);
        let target_last_depth = des[de].depth(Position::Right);

        let next_depth = self.compute_depths_in_range(start_index + 1, self.edges.len(), start_depth, des, edges)?;
        let last_depth = self.compute_depths_in_range(0, start_index, next_depth, des, edges)?;
        if last_depth != target_last_depth {
            return Err(TopologyError::at(TopologyErrorKind::DepthMismatch, *des[de].coordinate()));
        }
        Ok(())
    }

    fn compute_depths_in_range(&self, start: usize, end: usize, start_depth: i32, des: &mut [DirectedEdge], edges: &[Edge]) -> Result<i32, TopologyError> {
        let mut curr_depth = start_depth;
        for &next in self.edges[start..end].iter() {
            let edge = &edges[des[next].edge()];
            des[next].set_edge_depths(edge, Position::Right, curr_depth)?;
            curr_depth = des[next].depth(Position::Left);
        }
        Ok(curr_depth)
    }

    /// Links each incoming result edge to the next outgoing result edge
    /// counter-clockwise around the node.
    pub fn link_result_directed_edges(&self, des: &mut [DirectedEdge]) -> Result<(), TopologyError> {
        let mut first_out = None;
        let mut incoming = None;
        let mut state = LinkState::ScanningForIncoming;

        for out in self.result_area_edges(des) {
            let inc = des[out].sym;
            if !des[out].label().is_area() {
                continue;
            }
            if first_out.is_none() && des[out].is_in_result() {
                first_out = Some(out);
            }

            match state {
                LinkState::ScanningForIncoming => {
                    if !des[inc].is_in_result() {
                        continue;
                    }
                    incoming = Some(inc);
                    state = LinkState::LinkingToOutgoing;
                }
                LinkState::LinkingToOutgoing => {
                    if !des[out].is_in_result() {
                        continue;
                    }
                    if let Some(inc) = incoming {
                        des[inc].next = Some(out);
                    }
                    state = LinkState::ScanningForIncoming;
                }
            }
        }

        if state == LinkState::LinkingToOutgoing {
            match (first_out, incoming) {
                (Some(out), Some(inc)) => {
                    trace!("linking last incoming edge at {}", des[inc].coordinate());
                    des[inc].next = Some(out);
                }
                _ => {
                    let coord = self.coordinate(des);
                    return Err(TopologyError::new(TopologyErrorKind::NoOutgoingEdge, coord));
                }
            }
        }
        Ok(())
    }

    /// Like `link_result_directed_edges`, but only among the edges of
    /// maximal ring `ring`, clockwise, setting `next_min`.
    pub fn link_minimal_directed_edges(&self, des: &mut [DirectedEdge], ring: RingId) -> Result<(), TopologyError> {
        let mut first_out = None;
        let mut incoming = None;
        let mut state = LinkState::ScanningForIncoming;

        for out in self.result_area_edges(des).into_iter().rev() {
            let inc = des[out].sym;
            if first_out.is_none() && des[out].edge_ring == Some(ring) {
                first_out = Some(out);
            }

            match state {
                LinkState::ScanningForIncoming => {
                    if des[inc].edge_ring != Some(ring) {
                        continue;
                    }
                    incoming = Some(inc);
                    state = LinkState::LinkingToOutgoing;
                }
                LinkState::LinkingToOutgoing => {
                    if des[out].edge_ring != Some(ring) {
                        continue;
                    }
                    if let Some(inc) = incoming {
                        des[inc].next_min = Some(out);
                    }
                    state = LinkState::ScanningForIncoming;
                }
            }
        }

        if state == LinkState::LinkingToOutgoing {
            match (first_out, incoming) {
                (Some(out), Some(inc)) => des[inc].next_min = Some(out),
                _ => {
                    let coord = self.coordinate(des);
                    return Err(TopologyError::new(TopologyErrorKind::NoOutgoingEdge, coord));
                }
            }
        }
        Ok(())
    }

    /// Links every incoming edge to the next outgoing edge clockwise,
    /// ignoring result flags.
    pub fn link_all_directed_edges(&self, des: &mut [DirectedEdge]) {
        let mut prev_out: Option<DirEdgeId> = None;
        let mut first_in: Option<DirEdgeId> = None;
        for &out in self.edges.iter().rev() {
            let inc = des[out].sym;
            if first_in.is_none() {
                first_in = Some(inc);
            }
            if prev_out.is_some() {
                des[inc].next = prev_out;
            }
            prev_out = Some(out);
        }
        if let Some(first_in) = first_in {
            des[first_in].next = prev_out;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const I: Option<Location> = Some(Location::Interior);
    const B: Option<Location> = Some(Location::Boundary);
    const E: Option<Location> = Some(Location::Exterior);

    // Builds one edge per direction, each leaving the origin. DirectedEdge
    // 2i leaves the origin along edge i; 2i+1 is its sym.
    fn star_labelled(dirs: &[((f64, f64), Label)]) -> (Vec<Edge>, Vec<DirectedEdge>, DirectedEdgeStar) {
        let mut edges = vec![];
        let mut des = vec![];
        let mut star = DirectedEdgeStar::new();
        for (i, &((dx, dy), label)) in dirs.iter().enumerate() {
            let edge = Edge::new(vec![ Coordinate::new(0.0, 0.0), Coordinate::new(dx, dy) ], label);
            let mut fwd = DirectedEdge::new(i, &edge, true);
            let mut rev = DirectedEdge::new(i, &edge, false);
            fwd.sym = 2 * i + 1;
            rev.sym = 2 * i;
            des.push(fwd);
            des.push(rev);
            edges.push(edge);
        }
        for i in 0..dirs.len() {
            star.insert(2 * i, &des);
        }
        (edges, des, star)
    }

    fn star(dirs: &[(f64, f64)], label: Label) -> (Vec<Edge>, Vec<DirectedEdge>, DirectedEdgeStar) {
        let labelled: Vec<((f64, f64), Label)> = dirs.iter().map(|&d| (d, label)).collect();
        star_labelled(&labelled)
    }

    #[test]
    fn insert_sorts_counter_clockwise() {
        let (_, des, star) = star(&[ (0.0, -1.0), (-1.0, 0.0), (1.0, 0.0), (0.0, 1.0) ], Label::new_on(None));
        assert_eq!(&[ 4, 6, 2, 0 ], star.edges());
        assert_eq!(Some(Coordinate::new(0.0, 0.0)), star.coordinate(&des));
    }

    #[test]
    fn insert_same_direction_replaces() {
        let (_, des, mut star) = star(&[ (1.0, 0.0), (2.0, 0.0) ], Label::new_on(None));
        assert_eq!(1, star.degree());
        star.insert(0, &des);
        assert_eq!(&[ 0 ], star.edges());
    }

    #[test]
    fn link_result_joins_incoming_to_outgoing() {
        //     W <----- o -----> E
        // Result ring passes through: in from the west, out to the east.
        let (_, mut des, star) = star(&[ (1.0, 0.0), (-1.0, 0.0) ], Label::new_geom_area(0, B, I, E));
        des[0].set_in_result(true);
        des[3].set_in_result(true);
        star.link_result_directed_edges(&mut des).unwrap();
        assert_eq!(Some(0), des[3].next);
        assert_eq!(2, star.result_area_edges(&des).len());
        assert_eq!(1, star.outgoing_degree(&des));
    }

    #[test]
    fn link_result_without_outgoing_edge_fails() {
        let (_, mut des, star) = star(&[ (1.0, 0.0), (-1.0, 0.0) ], Label::new_geom_area(0, B, I, E));
        des[3].set_in_result(true);
        let err = star.link_result_directed_edges(&mut des).unwrap_err();
        assert_eq!(TopologyErrorKind::NoOutgoingEdge, err.kind);
        assert_eq!(Some(Coordinate::new(0.0, 0.0)), err.coordinate);
    }

    #[test]
    fn link_all_links_clockwise() {
        let (_, mut des, star) = star(&[ (1.0, 0.0), (0.0, 1.0), (-1.0, 0.0) ], Label::new_on(None));
        star.link_all_directed_edges(&mut des);
        // Each incoming edge links to the outgoing edge just
        // counter-clockwise of it: east -> north -> west -> east.
        assert_eq!(Some(2), des[1].next);
        assert_eq!(Some(4), des[3].next);
        assert_eq!(Some(0), des[5].next);
    }

    #[test]
    fn compute_depths_around_a_line() {
        // The area lies north of the x axis.
        //
        //      interior
        //   W <---o---> E
        //      exterior
        let (mut edges, mut des, star) = star(&[ (1.0, 0.0), (-1.0, 0.0) ], Label::new_on(None));
        edges[0].set_depth_delta(1);
        edges[1].set_depth_delta(-1);
        des[0].set_depth(Position::Left, 1).unwrap();
        des[0].set_depth(Position::Right, 0).unwrap();
        star.compute_depths(0, &mut des, &edges).unwrap();
        assert_eq!(0, des[2].depth(Position::Left));
        assert_eq!(1, des[2].depth(Position::Right));
    }

    #[test]
    fn compute_depths_detects_mismatch() {
        let (edges, mut des, star) = star(&[ (1.0, 0.0), (-1.0, 0.0) ], Label::new_on(None));
        des[0].set_depth(Position::Left, 0).unwrap();
        des[0].set_depth(Position::Right, 1).unwrap();
        let err = star.compute_depths(0, &mut des, &edges).unwrap_err();
        assert_eq!(TopologyErrorKind::DepthMismatch, err.kind);
    }

    #[test]
    fn rightmost_edge() {
        let (_, des, star) = star(&[ (1.0, 1.0), (-1.0, 1.0) ], Label::new_on(None));
        assert_eq!(Some(0), star.rightmost_edge(&des).unwrap());

        let (_, des, star) = self::star(&[ (1.0, -1.0), (-1.0, -1.0) ], Label::new_on(None));
        assert_eq!(Some(0), star.rightmost_edge(&des).unwrap());

        let (_, des, star) = self::star(&[ (1.0, 0.0), (-1.0, 0.0), (0.0, -1.0) ], Label::new_on(None));
        assert_eq!(Some(4), star.rightmost_edge(&des).unwrap());
    }

    #[test]
    fn propagate_fills_unknown_locations() {
        //          N (line of B)
        //          |
        //   W <----o----> E      area A to the north
        //          |
        //          S (area edge of A with unknown sides)
        let (_, mut des, star) = star_labelled(&[
            ((1.0, 0.0), Label::new_geom_area(0, B, I, E)),
            ((0.0, 1.0), Label::new_geom_on(1, I)),
            ((-1.0, 0.0), Label::new_geom_area(0, B, E, I)),
            ((0.0, -1.0), Label::new_geom_area(0, B, None, None)),
        ]);
        star.propagate_side_labels(0, &mut des).unwrap();
        assert_eq!(I, des[2].label().location_on(0));
        assert_eq!(E, des[6].label().location(0, Position::Left));
        assert_eq!(E, des[6].label().location(0, Position::Right));
    }

    #[test]
    fn single_null_side_fails() {
        let (_, mut des, star) = star_labelled(&[
            ((1.0, 0.0), Label::new_geom_area(0, B, I, E)),
            ((-1.0, 0.0), Label::new_geom_area(0, B, E, I)),
            ((0.0, -1.0), Label::new_geom_area(0, B, None, E)),
        ]);
        let err = star.propagate_side_labels(0, &mut des).unwrap_err();
        assert_eq!(TopologyErrorKind::SingleNullSide, err.kind);
    }

    #[test]
    fn conflicting_sides_fail() {
        let (_, mut des, star) = star(&[ (1.0, 0.0), (-1.0, 0.0) ], Label::new_geom_area(0, B, I, E));
        // Both edges claim the interior is on their left; walking around
        // the node, that means the north side is both interior and exterior.
        let err = star.propagate_side_labels(0, &mut des).unwrap_err();
        assert_eq!(TopologyErrorKind::SideLocationConflict, err.kind);
    }
}
