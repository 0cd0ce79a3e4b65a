use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::collections::btree_set;
use std::fmt;

use crate::geo::Coordinate;
use super::edge::Edge;
use super::label::Label;

/// A point where an Edge is crossed, located by segment and distance along
/// that segment.
#[derive(Debug, Clone, Copy)]
pub struct EdgeIntersection {
    pub coord: Coordinate,
    /// The segment the point lies on (or starts, when `dist` is 0).
    pub segment_index: usize,
    /// The edge distance along the segment; see `compute_edge_distance`.
    pub dist: f64,
}

impl EdgeIntersection {
    pub fn new(coord: Coordinate, segment_index: usize, dist: f64) -> EdgeIntersection {
        EdgeIntersection { coord: coord, segment_index: segment_index, dist: dist }
    }

    pub fn is_end_point(&self, max_segment_index: usize) -> bool {
        (self.segment_index == 0 && self.dist == 0.0) || self.segment_index == max_segment_index
    }
}

/// Ordered by position along the edge, then by coordinate.
impl Ord for EdgeIntersection {
    fn cmp(&self, other: &EdgeIntersection) -> Ordering {
        self.segment_index.cmp(&other.segment_index)
            .then_with(|| self.dist.partial_cmp(&other.dist).unwrap_or(Ordering::Equal))
            .then_with(|| self.coord.cmp(&other.coord))
    }
}

impl PartialOrd for EdgeIntersection {
    fn partial_cmp(&self, other: &EdgeIntersection) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for EdgeIntersection {
    fn eq(&self, other: &EdgeIntersection) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for EdgeIntersection {}

impl fmt::Display for EdgeIntersection {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} seg # = {} dist = {}", self.coord, self.segment_index, self.dist)
    }
}

/// The intersections found on one Edge, sorted along the edge.
///
/// Adding an intersection that is already present does nothing.
#[derive(Debug, Clone, Default)]
pub struct EdgeIntersectionList {
    nodes: BTreeSet<EdgeIntersection>,
}

impl EdgeIntersectionList {
    pub fn new() -> EdgeIntersectionList {
        EdgeIntersectionList { nodes: BTreeSet::new() }
    }

    pub fn add(&mut self, coord: Coordinate, segment_index: usize, dist: f64) {
        self.nodes.insert(EdgeIntersection::new(coord, segment_index, dist));
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<EdgeIntersection> {
        self.nodes.iter()
    }

    pub fn is_intersection(&self, pt: &Coordinate) -> bool {
        self.nodes.iter().any(|ei| ei.coord == *pt)
    }

    /// Adds the first and last points of `pts` as intersections, so that
    /// splitting always yields edges covering the whole input.
    ///
    /// The last point is recorded at segment index `pts.len() - 1`, distance
    /// 0: it orders after every point on the final segment. Recording it on
    /// the final segment itself (index `pts.len() - 2`) would not, and
    /// `create_split_edge` relies on this ordering.
    pub fn add_endpoints(&mut self, pts: &[Coordinate]) {
        let max_segment_index = pts.len() - 1;
        self.add(pts[0], 0, 0.0);
        self.add(pts[max_segment_index], max_segment_index, 0.0);
    }

    /// Appends to `out` one Edge per pair of consecutive intersections along
    /// `pts`. Each split edge gets a copy of `label`.
    pub fn add_split_edges(&mut self, pts: &[Coordinate], label: &Label, out: &mut Vec<Edge>) {
        self.add_endpoints(pts);

        let mut it = self.nodes.iter();
        let mut ei_prev = match it.next() {
            Some(ei) => ei,
            None => return,
        };
        for ei in it {
            out.push(EdgeIntersectionList::create_split_edge(pts, label, ei_prev, ei));
            ei_prev = ei;
        }
    }

    /// Returns the Edge running from `ei0` to `ei1` along `pts`.
    ///
    /// When `ei1` sits exactly on the start vertex of its segment, that vertex
    /// is already the last point copied, so `ei1` is not appended again.
    pub fn create_split_edge(pts: &[Coordinate], label: &Label, ei0: &EdgeIntersection, ei1: &EdgeIntersection) -> Edge {
        let last_seg_start_pt = &pts[ei1.segment_index];
        let use_int_pt1 = ei1.dist > 0.0 || !ei1.coord.equals_2d(last_seg_start_pt);

        let mut npts = ei1.segment_index - ei0.segment_index + 2;
        if !use_int_pt1 {
            npts -= 1;
        }

        let mut split_pts = Vec::with_capacity(npts);
        split_pts.push(ei0.coord);
        split_pts.extend_from_slice(&pts[ei0.segment_index + 1 ..= ei1.segment_index]);
        if use_int_pt1 {
            split_pts.push(ei1.coord);
        }

        Edge::new(split_pts, *label)
    }
}

impl<'a> IntoIterator for &'a EdgeIntersectionList {
    type Item = &'a EdgeIntersection;
    type IntoIter = btree_set::Iter<'a, EdgeIntersection>;

    fn into_iter(self) -> btree_set::Iter<'a, EdgeIntersection> {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use crate::graph::label::Location;

    fn c(x: f64, y: f64) -> Coordinate {
        Coordinate::new(x, y)
    }

    fn label() -> Label {
        Label::new_geom_on(0, Some(Location::Interior))
    }

    // (0,0)--(2,0)--(4,0)--(4,2)
    fn pts() -> Vec<Coordinate> {
        vec![ c(0.0, 0.0), c(2.0, 0.0), c(4.0, 0.0), c(4.0, 2.0) ]
    }

    #[test]
    fn insertion_is_idempotent() {
        let mut list = EdgeIntersectionList::new();
        list.add(c(1.0, 0.0), 0, 1.0);
        list.add(c(1.0, 0.0), 0, 1.0);
        assert_eq!(1, list.len());
    }

    #[test]
    fn sorted_along_edge() {
        let mut list = EdgeIntersectionList::new();
        list.add(c(4.0, 1.0), 2, 1.0);
        list.add(c(1.0, 0.0), 0, 1.0);
        list.add(c(3.0, 0.0), 1, 1.0);
        let segs: Vec<usize> = list.iter().map(|ei| ei.segment_index).collect();
        assert_eq!(vec![ 0, 1, 2 ], segs);
    }

    #[test]
    fn endpoints_are_sentinels() {
        let mut list = EdgeIntersectionList::new();
        list.add(c(3.0, 0.0), 1, 1.0);
        list.add_endpoints(&pts());
        let all: Vec<EdgeIntersection> = list.iter().cloned().collect();
        assert_eq!(3, all.len());
        assert_eq!(EdgeIntersection::new(c(0.0, 0.0), 0, 0.0), all[0]);
        assert_eq!(EdgeIntersection::new(c(4.0, 2.0), 3, 0.0), all[2]);
        assert!(all[2].is_end_point(3));
    }

    #[test]
    fn split_without_intersections_copies_edge() {
        let mut list = EdgeIntersectionList::new();
        let mut out = vec![];
        list.add_split_edges(&pts(), &label(), &mut out);
        assert_eq!(1, out.len());
        assert_eq!(pts(), out[0].coordinates().to_vec());
    }

    #[test]
    fn split_at_vertex_does_not_duplicate_point() {
        // The intersection sits on vertex 1, which starts segment 1.
        let mut list = EdgeIntersectionList::new();
        list.add(c(2.0, 0.0), 1, 0.0);
        let mut out = vec![];
        list.add_split_edges(&pts(), &label(), &mut out);
        assert_eq!(2, out.len());
        assert_eq!(vec![ c(0.0, 0.0), c(2.0, 0.0) ], out[0].coordinates().to_vec());
        assert_eq!(vec![ c(2.0, 0.0), c(4.0, 0.0), c(4.0, 2.0) ], out[1].coordinates().to_vec());
    }

    #[test]
    fn split_mid_segment() {
        let mut list = EdgeIntersectionList::new();
        list.add(c(3.0, 0.0), 1, 1.0);
        list.add(c(4.0, 1.0), 2, 1.0);
        let mut out = vec![];
        list.add_split_edges(&pts(), &label(), &mut out);
        assert_eq!(3, out.len());
        assert_eq!(vec![ c(0.0, 0.0), c(2.0, 0.0), c(3.0, 0.0) ], out[0].coordinates().to_vec());
        assert_eq!(vec![ c(3.0, 0.0), c(4.0, 0.0), c(4.0, 1.0) ], out[1].coordinates().to_vec());
        assert_eq!(vec![ c(4.0, 1.0), c(4.0, 2.0) ], out[2].coordinates().to_vec());
    }

    fn join(edges: &[Edge]) -> Vec<Coordinate> {
        let mut ret: Vec<Coordinate> = vec![];
        for e in edges {
            let start = if ret.is_empty() { 0 } else { 1 };
            ret.extend_from_slice(&e.coordinates()[start..]);
        }
        ret
    }

    proptest! {
        #[test]
        fn split_edges_cover_the_original(
            ys in prop::collection::vec(-10i32..10, 2..8),
            cuts in prop::collection::vec((0usize..16, 0u32..4), 0..6),
        ) {
            // A polyline stepping right by 4 each vertex; cuts land on
            // vertices (quarter 0) or at quarter points of a segment.
            let coords: Vec<Coordinate> = ys.iter().enumerate()
                .map(|(i, &y)| c(4.0 * i as f64, y as f64))
                .collect();
            let n_segs = coords.len() - 1;
            let cuts: Vec<(usize, u32)> = cuts.iter().map(|&(seg, quarter)| (seg % n_segs, quarter)).collect();
            let cut_point = |seg: usize, quarter: u32| {
                let p0 = coords[seg];
                let p1 = coords[seg + 1];
                let t = quarter as f64 / 4.0;
                c(p0.x + t * (p1.x - p0.x), p0.y + t * (p1.y - p0.y))
            };

            let mut list = EdgeIntersectionList::new();
            for &(seg, quarter) in cuts.iter() {
                let pt = cut_point(seg, quarter);
                list.add(pt, seg, crate::geo::intersector::compute_edge_distance(&pt, &coords[seg], &coords[seg + 1]));
            }

            // Every original vertex, with each distinct interior cut added
            // in order along its segment.
            let mut expected = vec![];
            for seg in 0..n_segs {
                expected.push(coords[seg]);
                let mut quarters: Vec<u32> = cuts.iter()
                    .filter(|&&(s, q)| s == seg && q > 0)
                    .map(|&(_, q)| q)
                    .collect();
                quarters.sort();
                quarters.dedup();
                for q in quarters {
                    expected.push(cut_point(seg, q));
                }
            }
            expected.push(coords[n_segs]);

            let mut out = vec![];
            list.add_split_edges(&coords, &label(), &mut out);
            prop_assert_eq!(expected, join(&out));
        }
    }
}
