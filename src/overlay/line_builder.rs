use crate::geo::{Geometry, GeometryFactory};
use crate::geo::algorithm::PointLocator;
use crate::graph::{EdgeId, PlanarGraph};
use crate::graph::directed_edge::set_visited_edge;
use super::{is_covered, is_label_result_of_op, OpCode};

/// Collects the result's linear parts: line edges in the result and not
/// inside a result polygon, plus (for intersections) area edges where the
/// two inputs merely touch.
pub struct LineBuilder<'g, 'a> {
    graph: &'g mut PlanarGraph,
    geoms: [&'a Geometry; 2],
    locator: PointLocator,
    factory: &'a dyn GeometryFactory,
}

impl<'g, 'a> LineBuilder<'g, 'a> {
    pub fn new(graph: &'g mut PlanarGraph, geoms: [&'a Geometry; 2], locator: PointLocator, factory: &'a dyn GeometryFactory) -> LineBuilder<'g, 'a> {
        LineBuilder { graph: graph, geoms: geoms, locator: locator, factory: factory }
    }

    /// Returns one LineString per result line edge. `polygons` are the
    /// result polygons already built.
    pub fn build(mut self, op: OpCode, polygons: &[Geometry]) -> Vec<Geometry> {
        self.find_covered_line_edges(polygons);
        let line_edges = self.collect_lines(op);

        let mut ret = vec![];
        for &e in line_edges.iter() {
            let edge = &mut self.graph.edges[e];
            ret.push(Geometry::LineString(self.factory.create_line_string(edge.coordinates().to_vec())));
            edge.set_in_result(true);
        }

        self.label_isolated_lines(&line_edges);
        ret
    }

    fn find_covered_line_edges(&mut self, polygons: &[Geometry]) {
        {
            let PlanarGraph { ref nodes, ref directed_edges, ref mut edges } = *self.graph;
            for node in nodes.iter() {
                node.star.find_covered_line_edges(directed_edges, edges);
            }
        }

        // Line edges no star could decide (they touch no result area at
        // either end) are covered iff a result polygon contains them.
        let PlanarGraph { ref directed_edges, ref mut edges, .. } = *self.graph;
        for de in directed_edges.iter() {
            let edge = &mut edges[de.edge()];
            if de.is_line_edge() && !edge.is_covered_set() {
                edge.set_covered(is_covered(&self.locator, de.coordinate(), polygons));
            }
        }
    }

    fn collect_lines(&mut self, op: OpCode) -> Vec<EdgeId> {
        let mut ret = vec![];
        for de in 0..self.graph.directed_edges.len() {
            self.collect_line_edge(de, op, &mut ret);
            self.collect_boundary_touch_edge(de, op, &mut ret);
        }
        ret
    }

    fn collect_line_edge(&mut self, de: usize, op: OpCode, out: &mut Vec<EdgeId>) {
        let d = &self.graph.directed_edges[de];
        if !d.is_line_edge() || d.is_visited() {
            return;
        }

        let e = d.edge();
        if is_label_result_of_op(d.label(), op) && !self.graph.edges[e].is_covered() {
            out.push(e);
            set_visited_edge(&mut self.graph.directed_edges, de, true);
        }
    }

    // An area edge where the inputs touch without overlapping: both
    // boundaries, no result area on either side. Only an intersection keeps
    // it, as a line.
    fn collect_boundary_touch_edge(&mut self, de: usize, op: OpCode, out: &mut Vec<EdgeId>) {
        let d = &self.graph.directed_edges[de];
        if d.is_line_edge() || d.is_visited() || d.is_interior_area_edge() {
            return;
        }

        let e = d.edge();
        if self.graph.edges[e].is_in_result() {
            return;
        }

        if op == OpCode::Intersection && is_label_result_of_op(d.label(), op) {
            out.push(e);
            set_visited_edge(&mut self.graph.directed_edges, de, true);
        }
    }

    // A result line touched by only one input lies somewhere in the other.
    fn label_isolated_lines(&mut self, line_edges: &[EdgeId]) {
        for &e in line_edges.iter() {
            let edge = &mut self.graph.edges[e];
            if !edge.is_isolated() {
                continue;
            }
            let target = if edge.label().is_null(0) { 0 } else { 1 };
            let loc = self.locator.locate(edge.coordinate(0), self.geoms[target]);
            edge.label_mut().set_location_on(target, Some(loc));
        }
    }
}
