use crate::geo::{Geometry, GeometryFactory};
use crate::geo::algorithm::PointLocator;
use crate::graph::PlanarGraph;
use super::{is_covered, is_label_result_of_op, OpCode};

/// Collects the result's isolated points: result nodes that no result line
/// or polygon already covers.
pub struct PointBuilder<'g, 'a> {
    graph: &'g PlanarGraph,
    locator: PointLocator,
    factory: &'a dyn GeometryFactory,
}

impl<'g, 'a> PointBuilder<'g, 'a> {
    pub fn new(graph: &'g PlanarGraph, locator: PointLocator, factory: &'a dyn GeometryFactory) -> PointBuilder<'g, 'a> {
        PointBuilder { graph: graph, locator: locator, factory: factory }
    }

    /// Only nodes with no edges can be result points, except for an
    /// intersection, where two lines crossing (or touching) leave a point.
    pub fn build(&self, op: OpCode, lines: &[Geometry], polygons: &[Geometry]) -> Vec<Geometry> {
        let mut ret = vec![];
        for node in self.graph.nodes.iter() {
            if node.is_incident_edge_in_result(&self.graph.directed_edges, &self.graph.edges) {
                continue;
            }
            if node.star.degree() != 0 && op != OpCode::Intersection {
                continue;
            }
            if !is_label_result_of_op(&node.label, op) {
                continue;
            }

            let coord = node.coordinate();
            if !is_covered(&self.locator, coord, lines) && !is_covered(&self.locator, coord, polygons) {
                ret.push(Geometry::Point(self.factory.create_point(*coord)));
            }
        }
        ret
    }
}
