use std::fmt;

use rstar::{RTree, RTreeObject, AABB};

use crate::geo::{Coordinate, Envelope};
use crate::geo::intersector::LineIntersector;
use super::depth::Depth;
use super::edge_intersection::EdgeIntersectionList;
use super::label::{Label, Location};
use super::EdgeId;

/// A polyline in the graph, with its Label and the intersections found on it.
///
/// The coordinates never change after construction; once intersections are
/// known, an Edge is replaced by its split edges.
#[derive(Debug, Clone)]
pub struct Edge {
    pts: Vec<Coordinate>,
    env: Envelope,
    label: Label,
    ei_list: EdgeIntersectionList,
    depth: Depth,
    depth_delta: i32,
    is_isolated: bool,
    is_in_result: bool,
    covered: Option<bool>,
}

impl Edge {
    /// Builds an Edge. `pts` must hold at least two Coordinates.
    pub fn new(pts: Vec<Coordinate>, label: Label) -> Edge {
        debug_assert!(pts.len() >= 2);
        let env = Envelope::from_coordinates(&pts);
        Edge {
            pts: pts,
            env: env,
            label: label,
            ei_list: EdgeIntersectionList::new(),
            depth: Depth::new(),
            depth_delta: 0,
            is_isolated: true,
            is_in_result: false,
            covered: None,
        }
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.pts
    }

    pub fn coordinate(&self, i: usize) -> &Coordinate {
        &self.pts[i]
    }

    pub fn num_points(&self) -> usize {
        self.pts.len()
    }

    pub fn maximum_segment_index(&self) -> usize {
        self.pts.len() - 1
    }

    pub fn envelope(&self) -> &Envelope {
        &self.env
    }

    pub fn is_closed(&self) -> bool {
        self.pts[0] == self.pts[self.pts.len() - 1]
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn label_mut(&mut self) -> &mut Label {
        &mut self.label
    }

    pub fn depth(&self) -> &Depth {
        &self.depth
    }

    pub fn depth_mut(&mut self) -> &mut Depth {
        &mut self.depth
    }

    /// The change in depth crossing this edge from its right side to its left.
    pub fn depth_delta(&self) -> i32 {
        self.depth_delta
    }

    pub fn set_depth_delta(&mut self, depth_delta: i32) {
        self.depth_delta = depth_delta;
    }

    pub fn edge_intersection_list(&self) -> &EdgeIntersectionList {
        &self.ei_list
    }

    pub fn edge_intersection_list_mut(&mut self) -> &mut EdgeIntersectionList {
        &mut self.ei_list
    }

    pub fn is_isolated(&self) -> bool {
        self.is_isolated
    }

    pub fn set_isolated(&mut self, is_isolated: bool) {
        self.is_isolated = is_isolated;
    }

    pub fn is_in_result(&self) -> bool {
        self.is_in_result
    }

    pub fn set_in_result(&mut self, is_in_result: bool) {
        self.is_in_result = is_in_result;
    }

    /// True iff a line edge lies inside the result area. Only meaningful
    /// once `is_covered_set()`.
    pub fn is_covered(&self) -> bool {
        self.covered == Some(true)
    }

    pub fn is_covered_set(&self) -> bool {
        self.covered.is_some()
    }

    pub fn set_covered(&mut self, is_covered: bool) {
        self.covered = Some(is_covered);
    }

    /// An area edge of three points that doubles back on itself.
    pub fn is_collapsed(&self) -> bool {
        self.label.is_area() && self.pts.len() == 3 && self.pts[0] == self.pts[2]
    }

    /// The line edge a collapsed edge really is.
    pub fn collapsed_edge(&self) -> Edge {
        Edge::new(vec![ self.pts[0], self.pts[1] ], Label::to_line_label(&self.label))
    }

    /// Records every intersection `li` found on segment `segment_index` of
    /// this edge, which was input segment `geom_index` of `li`.
    pub fn add_intersections(&mut self, li: &LineIntersector, segment_index: usize, geom_index: usize) {
        for i in 0..li.intersection_num() {
            self.add_intersection(li, segment_index, geom_index, i);
        }
    }

    /// Records one intersection. A point landing exactly on the next vertex
    /// is stored as the start of the next segment, so each point has one
    /// canonical (segment, distance) key.
    pub fn add_intersection(&mut self, li: &LineIntersector, segment_index: usize, geom_index: usize, int_index: usize) {
        let int_pt = li.intersection(int_index);
        let mut normalized_segment_index = segment_index;
        let mut dist = li.edge_distance(geom_index, int_index);

        let next_seg_index = normalized_segment_index + 1;
        if next_seg_index < self.pts.len() && int_pt.equals_2d(&self.pts[next_seg_index]) {
            normalized_segment_index = next_seg_index;
            dist = 0.0;
        }

        self.ei_list.add(int_pt, normalized_segment_index, dist);
    }

    /// Appends this edge's split edges to `out`.
    pub fn add_split_edges(&mut self, out: &mut Vec<Edge>) {
        let Edge { ref pts, ref label, ref mut ei_list, .. } = *self;
        ei_list.add_split_edges(pts, label, out);
    }

    /// True iff both edges have exactly the same coordinates in the same
    /// order.
    pub fn is_pointwise_equal(&self, other: &Edge) -> bool {
        self.pts == other.pts
    }

    /// Location of the edge itself relative to geometry `geom_index`.
    pub fn location_on(&self, geom_index: usize) -> Option<Location> {
        self.label.location_on(geom_index)
    }
}

/// Edges are equal when their coordinates match forwards or backwards.
impl PartialEq for Edge {
    fn eq(&self, other: &Edge) -> bool {
        if self.pts.len() != other.pts.len() {
            return false;
        }
        self.pts == other.pts || self.pts.iter().eq(other.pts.iter().rev())
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "edge: LINESTRING (")?;
        for (i, p) in self.pts.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", p)?;
        }
        write!(f, ") {} {}", self.label, self.depth_delta)
    }
}

/// An envelope in the EdgeList index, pointing back at its Edge.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedEnvelope {
    bbox: Envelope,
    edge_id: EdgeId,
}

impl RTreeObject for IndexedEnvelope {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners([ self.bbox.min_x, self.bbox.min_y ], [ self.bbox.max_x, self.bbox.max_y ])
    }
}

/// A list of Edges that can quickly find an Edge equal to a given one.
#[derive(Debug, Default)]
pub struct EdgeList {
    edges: Vec<Edge>,
    index: RTree<IndexedEnvelope>,
}

impl EdgeList {
    pub fn new() -> EdgeList {
        EdgeList { edges: vec![], index: RTree::new() }
    }

    pub fn add(&mut self, edge: Edge) -> EdgeId {
        let edge_id = self.edges.len();
        self.index.insert(IndexedEnvelope { bbox: *edge.envelope(), edge_id: edge_id });
        self.edges.push(edge);
        edge_id
    }

    pub fn add_all<I: IntoIterator<Item=Edge>>(&mut self, edges: I) {
        for e in edges {
            self.add(e);
        }
    }

    /// Returns the id of an Edge equal (in either direction) to `edge`.
    pub fn find_equal_edge(&self, edge: &Edge) -> Option<EdgeId> {
        let env = edge.envelope();
        let query = AABB::from_corners([ env.min_x, env.min_y ], [ env.max_x, env.max_y ]);
        self.index.locate_in_envelope_intersecting(&query)
            .map(|entry| entry.edge_id)
            .filter(|&id| self.edges[id] == *edge)
            .min()
    }

    pub fn get(&self, edge_id: EdgeId) -> &Edge {
        &self.edges[edge_id]
    }

    pub fn get_mut(&mut self, edge_id: EdgeId) -> &mut Edge {
        &mut self.edges[edge_id]
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edges_mut(&mut self) -> &mut [Edge] {
        &mut self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn iter(&self) -> ::std::slice::Iter<Edge> {
        self.edges.iter()
    }

    pub fn into_edges(self) -> Vec<Edge> {
        self.edges
    }
}
