use crate::geo::{Coordinate, Geometry, GeometryFactory};
use crate::geo::algorithm::is_in_ring;
use crate::graph::{EdgeRing, PlanarGraph, RingKind, RingId, TopologyError, TopologyErrorKind};

/// Turns the result DirectedEdges of a labelled graph into Polygons.
///
/// Result edges are linked into maximal rings; a maximal ring that touches
/// itself is split into minimal rings. Clockwise rings are shells,
/// counter-clockwise rings are holes, and each hole goes to the smallest
/// shell that contains it.
pub struct PolygonBuilder<'f> {
    factory: &'f dyn GeometryFactory,
    rings: Vec<EdgeRing>,
    shells: Vec<RingId>,
}

/// The first point of `test` that isn't a point of `list`.
fn pt_not_in_list(test: &[Coordinate], list: &[Coordinate]) -> Option<Coordinate> {
    test.iter().find(|p| !list.contains(p)).cloned()
}

impl<'f> PolygonBuilder<'f> {
    pub fn new(factory: &'f dyn GeometryFactory) -> PolygonBuilder<'f> {
        PolygonBuilder { factory: factory, rings: vec![], shells: vec![] }
    }

    /// Builds rings from every result DirectedEdge in `graph`.
    pub fn add(&mut self, graph: &mut PlanarGraph) -> Result<(), TopologyError> {
        graph.link_result_directed_edges()?;

        let max_rings = self.build_maximal_edge_rings(graph)?;
        let mut free_holes = vec![];
        let edge_rings = self.build_minimal_edge_rings(max_rings, &mut free_holes, graph)?;
        self.sort_shells_and_holes(edge_rings, &mut free_holes);
        self.place_free_holes(&free_holes)?;

        debug!("{} rings, {} shells", self.rings.len(), self.shells.len());
        Ok(())
    }

    pub fn polygons(&self) -> Vec<Geometry> {
        self.shells.iter()
            .map(|&shell| Geometry::Polygon(self.rings[shell].to_polygon(&self.rings, self.factory)))
            .collect()
    }

    /// True iff some polygon built so far contains `p`.
    pub fn contains_point(&self, p: &Coordinate) -> bool {
        self.shells.iter().any(|&shell| self.rings[shell].contains_point(p, &self.rings))
    }

    fn push_ring(&mut self, kind: RingKind, start: usize, graph: &mut PlanarGraph) -> Result<RingId, TopologyError> {
        let id = self.rings.len();
        let ring = EdgeRing::new(kind, start, id, graph, self.factory)?;
        self.rings.push(ring);
        Ok(id)
    }

    fn build_maximal_edge_rings(&mut self, graph: &mut PlanarGraph) -> Result<Vec<RingId>, TopologyError> {
        let mut ret = vec![];
        for de in 0..graph.directed_edges.len() {
            let d = &graph.directed_edges[de];
            if d.is_in_result() && d.label().is_area() && d.edge_ring.is_none() {
                let id = self.push_ring(RingKind::Maximal, de, graph)?;
                self.rings[id].set_in_result(graph);
                ret.push(id);
            }
        }
        Ok(ret)
    }

    // Returns the maximal rings that needed no splitting. Shells found while
    // splitting go straight to `self.shells`, with their holes attached;
    // minimal rings with no shell among them go to `free_holes`.
    fn build_minimal_edge_rings(&mut self, max_rings: Vec<RingId>, free_holes: &mut Vec<RingId>, graph: &mut PlanarGraph) -> Result<Vec<RingId>, TopologyError> {
        let mut ret = vec![];
        for max_ring in max_rings {
            if self.rings[max_ring].max_node_degree(graph) <= 2 {
                ret.push(max_ring);
                continue;
            }

            self.rings[max_ring].link_directed_edges_for_minimal_edge_rings(graph)?;
            let first_id = self.rings.len();
            let min_rings = self.rings[max_ring].build_minimal_rings(first_id, graph, self.factory)?;
            let ids: Vec<RingId> = (first_id..first_id + min_rings.len()).collect();
            self.rings.extend(min_rings);

            match self.find_shell(&ids)? {
                Some(shell) => {
                    for &id in ids.iter() {
                        if self.rings[id].is_hole() {
                            EdgeRing::set_shell(&mut self.rings, id, shell);
                        }
                    }
                    self.shells.push(shell);
                }
                None => free_holes.extend(ids),
            }
        }
        Ok(ret)
    }

    /// The one non-hole among `ids`, if any.
    fn find_shell(&self, ids: &[RingId]) -> Result<Option<RingId>, TopologyError> {
        let mut shells = ids.iter().cloned().filter(|&id| !self.rings[id].is_hole());
        let shell = shells.next();
        if let Some(_) = shells.next() {
            return Err(TopologyError::at(TopologyErrorKind::MultipleShells, *self.rings[ids[0]].coordinate(0)));
        }
        Ok(shell)
    }

    fn sort_shells_and_holes(&mut self, edge_rings: Vec<RingId>, free_holes: &mut Vec<RingId>) {
        for id in edge_rings {
            if self.rings[id].is_hole() {
                free_holes.push(id);
            } else {
                self.shells.push(id);
            }
        }
    }

    fn place_free_holes(&mut self, free_holes: &[RingId]) -> Result<(), TopologyError> {
        for &hole in free_holes.iter() {
            if self.rings[hole].shell().is_some() {
                continue;
            }
            match self.find_edge_ring_containing(hole) {
                Some(shell) => EdgeRing::set_shell(&mut self.rings, hole, shell),
                None => return Err(TopologyError::at(TopologyErrorKind::UnassignedHole, *self.rings[hole].coordinate(0))),
            }
        }
        Ok(())
    }

    /// The smallest shell containing ring `test`.
    ///
    /// A shell with exactly the same envelope can't contain `test`. The
    /// containment test uses a point of `test` that isn't on the shell, since
    /// shell and hole may share vertices.
    fn find_edge_ring_containing(&self, test: RingId) -> Option<RingId> {
        let test_ring = &self.rings[test];
        let test_env = test_ring.envelope();

        let mut min_shell: Option<RingId> = None;
        for &try_shell in self.shells.iter() {
            let try_ring = &self.rings[try_shell];
            let try_env = try_ring.envelope();
            if try_env == test_env || !try_env.contains(test_env) {
                continue;
            }

            let test_pt = match pt_not_in_list(test_ring.coordinates(), try_ring.coordinates()) {
                Some(pt) => pt,
                None => continue,
            };
            if !is_in_ring(&test_pt, try_ring.coordinates()) {
                continue;
            }

            let is_smaller = match min_shell {
                None => true,
                Some(min) => self.rings[min].envelope().contains(try_env),
            };
            if is_smaller {
                min_shell = Some(try_shell);
            }
        }
        min_shell
    }
}
