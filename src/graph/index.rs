//! Finding the segment pairs of a set of Edges that might intersect, and
//! recording the intersections they actually have.

use std::cmp::Ordering;

use crate::geo::Coordinate;
use crate::geo::intersector::LineIntersector;
use super::edge::Edge;
use super::EdgeId;

/// One segment of one Edge: `edge.coordinate(segment)` to
/// `edge.coordinate(segment + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentRef {
    pub edge: EdgeId,
    pub segment: usize,
}

#[derive(Debug, Clone, Copy)]
struct SweepItem {
    // Items in the same group are never paired. `None` pairs with anything.
    group: Option<usize>,
    seg: SegmentRef,
    min_y: f64,
    max_y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Insert,
    Delete,
}

#[derive(Debug, Clone, Copy)]
struct SweepEvent {
    x: f64,
    kind: EventKind,
    item: usize,
}

/// Sweeps a vertical line left to right over segment envelopes, pairing
/// each segment with every active segment whose y range overlaps.
///
/// Inserts sort before deletes at the same x, so envelopes that merely
/// touch still pair up.
#[derive(Debug, Default)]
struct SweepLine {
    items: Vec<SweepItem>,
    events: Vec<SweepEvent>,
}

impl SweepLine {
    fn add_edge(&mut self, edge_id: EdgeId, edge: &Edge, group: Option<usize>) {
        let pts = edge.coordinates();
        for segment in 0..edge.maximum_segment_index() {
            let p0 = &pts[segment];
            let p1 = &pts[segment + 1];
            let item = self.items.len();
            self.items.push(SweepItem {
                group: group,
                seg: SegmentRef { edge: edge_id, segment: segment },
                min_y: p0.y.min(p1.y),
                max_y: p0.y.max(p1.y),
            });
            self.events.push(SweepEvent { x: p0.x.min(p1.x), kind: EventKind::Insert, item: item });
            self.events.push(SweepEvent { x: p0.x.max(p1.x), kind: EventKind::Delete, item: item });
        }
    }

    /// Returns every candidate pair, each as (earlier item, later item) in
    /// insertion order.
    fn candidate_pairs(mut self) -> Vec<(SweepItem, SweepItem)> {
        self.events.sort_by(|a, b| {
            a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal)
                .then_with(|| a.kind.cmp(&b.kind))
        });

        let mut ret = vec![];
        let mut active: Vec<usize> = vec![];
        for ev in self.events.iter() {
            match ev.kind {
                EventKind::Insert => {
                    let item = self.items[ev.item];
                    for &other_index in active.iter() {
                        let other = self.items[other_index];
                        if item.group.is_some() && item.group == other.group {
                            continue;
                        }
                        if item.max_y < other.min_y || other.max_y < item.min_y {
                            continue;
                        }
                        if other_index < ev.item {
                            ret.push((other, item));
                        } else {
                            ret.push((item, other));
                        }
                    }
                    active.push(ev.item);
                }
                EventKind::Delete => {
                    if let Some(pos) = active.iter().position(|&i| i == ev.item) {
                        active.swap_remove(pos);
                    }
                }
            }
        }
        ret
    }
}

/// Computes the intersections among one set of Edges.
///
/// With `test_all_segments` false, segments of the same Edge are never
/// compared: that is how ring inputs (already known to be simple) skip
/// self-intersection tests.
pub fn compute_self_intersections(edges: &mut [Edge], si: &mut SegmentIntersector, test_all_segments: bool) {
    let mut sweep = SweepLine::default();
    for (i, edge) in edges.iter().enumerate() {
        let group = if test_all_segments { None } else { Some(i) };
        sweep.add_edge(i, edge, group);
    }
    for (a, b) in sweep.candidate_pairs() {
        si.add_intersections_within(edges, a.seg.edge, a.seg.segment, b.seg.edge, b.seg.segment);
    }
}

/// Every pair of segments (from the same Edge or not) whose envelopes
/// overlap.
pub fn candidate_segment_pairs(edges: &[Edge]) -> Vec<(SegmentRef, SegmentRef)> {
    let mut sweep = SweepLine::default();
    for (i, edge) in edges.iter().enumerate() {
        sweep.add_edge(i, edge, None);
    }
    sweep.candidate_pairs().into_iter().map(|(a, b)| (a.seg, b.seg)).collect()
}

/// Computes the intersections between two sets of Edges.
pub fn compute_intersections_between(edges0: &mut [Edge], edges1: &mut [Edge], si: &mut SegmentIntersector) {
    let mut sweep = SweepLine::default();
    for (i, edge) in edges0.iter().enumerate() {
        sweep.add_edge(i, edge, Some(0));
    }
    for (i, edge) in edges1.iter().enumerate() {
        sweep.add_edge(i, edge, Some(1));
    }
    for (a, b) in sweep.candidate_pairs() {
        let (s0, s1) = if a.group == Some(0) { (a.seg, b.seg) } else { (b.seg, a.seg) };
        si.add_intersections_between(edges0, s0.edge, s0.segment, edges1, s1.edge, s1.segment);
    }
}

/// Tests segment pairs for intersection and records the intersections on
/// both Edges.
///
/// An intersection is "trivial" when it is just the shared vertex of two
/// adjacent segments of the same Edge (or the closing vertex of a closed
/// Edge); trivial intersections are counted but not recorded.
#[derive(Debug)]
pub struct SegmentIntersector {
    li: LineIntersector,
    include_proper: bool,
    record_isolated: bool,
    has_intersection: bool,
    has_proper: bool,
    has_proper_interior: bool,
    proper_intersection_point: Option<Coordinate>,
    boundary_nodes: Option<[Vec<Coordinate>; 2]>,
    /// Segment pairs that intersect, trivially or not.
    pub num_intersections: usize,
    /// Segment pairs tested.
    pub num_tests: usize,
}

impl SegmentIntersector {
    /// `include_proper`: record proper intersections too (otherwise only
    /// vertex intersections are recorded). `record_isolated`: mark edges
    /// that intersect anything as not isolated.
    pub fn new(include_proper: bool, record_isolated: bool) -> SegmentIntersector {
        SegmentIntersector {
            li: LineIntersector::new(),
            include_proper: include_proper,
            record_isolated: record_isolated,
            has_intersection: false,
            has_proper: false,
            has_proper_interior: false,
            proper_intersection_point: None,
            boundary_nodes: None,
            num_intersections: 0,
            num_tests: 0,
        }
    }

    /// Proper intersections at these points don't count as interior.
    pub fn set_boundary_nodes(&mut self, nodes0: Vec<Coordinate>, nodes1: Vec<Coordinate>) {
        self.boundary_nodes = Some([ nodes0, nodes1 ]);
    }

    /// True iff some non-trivial intersection was found.
    pub fn has_intersection(&self) -> bool {
        self.has_intersection
    }

    pub fn has_proper_intersection(&self) -> bool {
        self.has_proper
    }

    /// True iff a proper intersection was found away from all boundary
    /// nodes.
    pub fn has_proper_interior_intersection(&self) -> bool {
        self.has_proper_interior
    }

    /// The last proper intersection found.
    pub fn proper_intersection_point(&self) -> Option<Coordinate> {
        self.proper_intersection_point
    }

    fn is_boundary_point(&self) -> bool {
        match self.boundary_nodes {
            Some(ref nodes) => nodes.iter().flat_map(|v| v.iter()).any(|pt| self.li.is_intersection(pt)),
            None => false,
        }
    }

    // Bookkeeping for a pair that intersects. Returns true when the
    // intersection should be recorded on the edges.
    fn classify(&mut self, is_trivial: bool) -> bool {
        self.num_intersections += 1;
        if is_trivial {
            return false;
        }
        self.has_intersection = true;

        let is_proper = self.li.is_proper();
        if is_proper {
            self.proper_intersection_point = Some(self.li.intersection(0));
            self.has_proper = true;
            if !self.is_boundary_point() {
                self.has_proper_interior = true;
            }
        }
        self.include_proper || !is_proper
    }

    /// Tests segment `seg0` of `edges[e0]` against segment `seg1` of
    /// `edges[e1]`, both in the same set.
    pub fn add_intersections_within(&mut self, edges: &mut [Edge], e0: EdgeId, seg0: usize, e1: EdgeId, seg1: usize) {
        if e0 == e1 && seg0 == seg1 {
            return;
        }
        self.num_tests += 1;
        {
            let a = edges[e0].coordinates();
            let b = edges[e1].coordinates();
            self.li.compute_intersection(&a[seg0], &a[seg0 + 1], &b[seg1], &b[seg1 + 1]);
        }
        if !self.li.has_intersection() {
            return;
        }

        if self.record_isolated {
            edges[e0].set_isolated(false);
            edges[e1].set_isolated(false);
        }

        let is_trivial = e0 == e1 && self.is_trivial_self_intersection(&edges[e0], seg0, seg1);
        if self.classify(is_trivial) {
            edges[e0].add_intersections(&self.li, seg0, 0);
            edges[e1].add_intersections(&self.li, seg1, 1);
        }
    }

    /// Tests segment `seg0` of `edges0[e0]` against segment `seg1` of
    /// `edges1[e1]`.
    pub fn add_intersections_between(&mut self, edges0: &mut [Edge], e0: EdgeId, seg0: usize, edges1: &mut [Edge], e1: EdgeId, seg1: usize) {
        self.num_tests += 1;
        {
            let a = edges0[e0].coordinates();
            let b = edges1[e1].coordinates();
            self.li.compute_intersection(&a[seg0], &a[seg0 + 1], &b[seg1], &b[seg1 + 1]);
        }
        if !self.li.has_intersection() {
            return;
        }

        if self.record_isolated {
            edges0[e0].set_isolated(false);
            edges1[e1].set_isolated(false);
        }

        if self.classify(false) {
            edges0[e0].add_intersections(&self.li, seg0, 0);
            edges1[e1].add_intersections(&self.li, seg1, 1);
        }
    }

    fn is_trivial_self_intersection(&self, edge: &Edge, seg0: usize, seg1: usize) -> bool {
        if self.li.intersection_num() != 1 {
            return false;
        }
        if (seg0 as isize - seg1 as isize).abs() == 1 {
            return true;
        }
        if edge.is_closed() {
            let last_seg_index = edge.maximum_segment_index() - 1;
            if (seg0 == 0 && seg1 == last_seg_index) || (seg1 == 0 && seg0 == last_seg_index) {
                return true;
            }
        }
        false
    }
}
