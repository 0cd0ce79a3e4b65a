//! Boolean operations on two geometries: intersection, union, difference
//! and symmetric difference.
//!
//! # Examples
//!
//! ```
//! use topograph::overlay;
//! use topograph::read::wkt;
//!
//! let a = wkt::parse("POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))").unwrap();
//! let b = wkt::parse("POLYGON ((1 1, 1 3, 3 3, 3 1, 1 1))").unwrap();
//!
//! let both = overlay::intersection(&a, &b).unwrap();
//! assert_eq!(1.0, both.area());
//!
//! let either = overlay::union(&a, &b).unwrap();
//! assert_eq!(7.0, either.area());
//! ```
//!
//! The work happens on a PlanarGraph holding both inputs' edges, split at
//! every intersection and labelled with where each side lies in each input.
//! Result polygons are the rings of edges with the result on their right;
//! result lines and points are whatever labelled graph pieces those polygons
//! don't already cover.

mod line_builder;
mod point_builder;
mod polygon_builder;

use crate::geo::{Coordinate, DefaultGeometryFactory, Geometry, GeometryFactory};
use crate::geo::algorithm::{BoundaryNodeRule, PointLocator};
use crate::graph::{Edge, EdgeList, EdgeNodingValidator, GeometryGraph, Label, Location, PlanarGraph, Position};
use crate::graph::{TopologyError, TopologyErrorKind};

pub use self::line_builder::LineBuilder;
pub use self::point_builder::PointBuilder;
pub use self::polygon_builder::PolygonBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    Intersection,
    Union,
    Difference,
    SymDifference,
}

/// Knobs for an overlay.
#[derive(Debug, Clone, Copy)]
pub struct OverlayOptions {
    /// Decides which line endpoints are boundary points.
    pub boundary_node_rule: BoundaryNodeRule,
    /// Test rings (which are normally assumed simple) for self-intersections.
    pub compute_ring_self_nodes: bool,
    /// Check that the split edges are fully noded before building rings.
    pub validate_noding: bool,
}

impl Default for OverlayOptions {
    fn default() -> OverlayOptions {
        OverlayOptions {
            boundary_node_rule: BoundaryNodeRule::Mod2,
            compute_ring_self_nodes: false,
            validate_noding: true,
        }
    }
}

/// True iff a piece of the graph at `loc0` in the first input and `loc1` in
/// the second belongs in the result of `op`. Boundary counts as Interior.
pub fn is_result_of_op(loc0: Option<Location>, loc1: Option<Location>, op: OpCode) -> bool {
    fn is_interior(loc: Option<Location>) -> bool {
        loc == Some(Location::Interior) || loc == Some(Location::Boundary)
    }

    let in0 = is_interior(loc0);
    let in1 = is_interior(loc1);
    match op {
        OpCode::Intersection => in0 && in1,
        OpCode::Union => in0 || in1,
        OpCode::Difference => in0 && !in1,
        OpCode::SymDifference => in0 != in1,
    }
}

/// `is_result_of_op` on the On locations of a Label.
pub fn is_label_result_of_op(label: &Label, op: OpCode) -> bool {
    is_result_of_op(label.location_on(0), label.location_on(1), op)
}

/// True iff `coord` is inside or on any of `geoms`.
fn is_covered(locator: &PointLocator, coord: &Coordinate, geoms: &[Geometry]) -> bool {
    geoms.iter().any(|g| locator.locate(coord, g) != Location::Exterior)
}

/// One overlay of two geometries.
///
/// `compute` consumes the op: the graph it builds is labelled for exactly
/// one OpCode.
pub struct OverlayOp<'a> {
    args: [GeometryGraph<'a>; 2],
    graph: PlanarGraph,
    edge_list: EdgeList,
    options: OverlayOptions,
    locator: PointLocator,
    factory: &'a dyn GeometryFactory,
}

impl<'a> OverlayOp<'a> {
    pub fn new(g0: &'a Geometry, g1: &'a Geometry, options: OverlayOptions) -> OverlayOp<'a> {
        OverlayOp::with_factory(g0, g1, options, &DefaultGeometryFactory)
    }

    pub fn with_factory(g0: &'a Geometry, g1: &'a Geometry, options: OverlayOptions, factory: &'a dyn GeometryFactory) -> OverlayOp<'a> {
        OverlayOp {
            args: [
                GeometryGraph::new(0, g0, options.boundary_node_rule),
                GeometryGraph::new(1, g1, options.boundary_node_rule),
            ],
            graph: PlanarGraph::new(),
            edge_list: EdgeList::new(),
            options: options,
            locator: PointLocator::new(options.boundary_node_rule),
            factory: factory,
        }
    }

    pub fn arg_geometry(&self, i: usize) -> &'a Geometry {
        self.args[i].geometry()
    }

    /// Runs the overlay and returns the result geometry.
    pub fn compute(mut self, op: OpCode) -> Result<Geometry, TopologyError> {
        for arg in self.args.iter() {
            if arg.has_too_few_points() {
                return Err(TopologyError::new(TopologyErrorKind::TooFewPoints, arg.invalid_point()));
            }
        }

        self.copy_points(0);
        self.copy_points(1);

        let compute_ring_self_nodes = self.options.compute_ring_self_nodes;
        self.args[0].compute_self_nodes(compute_ring_self_nodes);
        self.args[1].compute_self_nodes(compute_ring_self_nodes);
        {
            let (first, second) = self.args.split_at_mut(1);
            first[0].compute_edge_intersections(&mut second[0], true);
        }

        let mut split_edges = vec![];
        self.args[0].compute_split_edges(&mut split_edges);
        self.args[1].compute_split_edges(&mut split_edges);
        debug!("{:?}: {} split edges", op, split_edges.len());

        self.insert_unique_edges(split_edges);
        self.compute_labels_from_depths();
        self.replace_collapsed_edges();
        debug!("{:?}: {} unique edges", op, self.edge_list.len());

        if self.options.validate_noding {
            EdgeNodingValidator::new(self.edge_list.edges()).check_valid()?;
        }

        let edges = ::std::mem::replace(&mut self.edge_list, EdgeList::new()).into_edges();
        self.graph.add_edges(edges);
        debug!("{:?}: graph has {} nodes, {} directed edges", op, self.graph.nodes.len(), self.graph.directed_edges.len());

        self.compute_labelling()?;
        self.label_incomplete_nodes();

        self.find_result_area_edges(op);
        self.cancel_duplicate_result_edges();

        let mut polygon_builder = PolygonBuilder::new(self.factory);
        polygon_builder.add(&mut self.graph)?;
        let polygons = polygon_builder.polygons();
        debug!("{:?}: {} result polygons", op, polygons.len());

        let geoms = [self.args[0].geometry(), self.args[1].geometry()];
        let lines = LineBuilder::new(&mut self.graph, geoms, self.locator, self.factory).build(op, &polygons);
        debug!("{:?}: {} result lines", op, lines.len());

        let points = PointBuilder::new(&self.graph, self.locator, self.factory).build(op, &lines, &polygons);
        debug!("{:?}: {} result points", op, points.len());

        let mut result = points;
        result.extend(lines);
        result.extend(polygons);
        Ok(self.factory.build_geometry(result))
    }

    // Every node of input `arg_index` becomes a node of the result graph,
    // whether or not any edge reaches it.
    fn copy_points(&mut self, arg_index: usize) {
        let copies: Vec<(Coordinate, Option<Location>)> = self.args[arg_index].nodes().iter()
            .map(|n| (*n.coordinate(), n.label.location_on(arg_index)))
            .collect();

        for (coord, loc) in copies {
            let id = self.graph.add_node(coord);
            self.graph.nodes.get_mut(id).set_label(arg_index, loc);
        }
    }

    fn insert_unique_edges(&mut self, edges: Vec<Edge>) {
        for edge in edges {
            self.insert_unique_edge(edge);
        }
    }

    /// Adds `edge`, or folds it into an equal Edge already present.
    ///
    /// Folding accumulates depths, so that two coincident area boundaries
    /// can later be recognized as cancelling out (or as a collapse to a
    /// line).
    fn insert_unique_edge(&mut self, edge: Edge) {
        let existing_id = match self.edge_list.find_equal_edge(&edge) {
            Some(id) => id,
            None => {
                self.edge_list.add(edge);
                return;
            }
        };

        let existing = self.edge_list.get_mut(existing_id);
        let mut label_to_merge = *edge.label();
        if !existing.is_pointwise_equal(&edge) {
            label_to_merge.flip();
        }

        let existing_label = *existing.label();
        let depth = existing.depth_mut();
        if depth.is_null() {
            depth.add(&existing_label);
        }
        depth.add(&label_to_merge);
        existing.label_mut().merge(&label_to_merge);
    }

    fn compute_labels_from_depths(&mut self) {
        for edge in self.edge_list.edges_mut().iter_mut() {
            if edge.depth().is_null() {
                continue;
            }

            edge.depth_mut().normalize();
            let depth = *edge.depth();
            let label = edge.label_mut();
            for i in 0..2 {
                if label.is_null(i) || !label.is_area() || depth.is_null_geom(i) {
                    continue;
                }
                if depth.delta(i) == 0 {
                    // Equal depths on both sides: the area collapsed here.
                    label.to_line(i);
                } else {
                    label.set_location(i, Position::Left, Some(depth.location(i, Position::Left)));
                    label.set_location(i, Position::Right, Some(depth.location(i, Position::Right)));
                }
            }
        }
    }

    fn replace_collapsed_edges(&mut self) {
        for edge in self.edge_list.edges_mut().iter_mut() {
            if edge.is_collapsed() {
                *edge = edge.collapsed_edge();
            }
        }
    }

    fn compute_labelling(&mut self) -> Result<(), TopologyError> {
        let geoms = [self.args[0].geometry(), self.args[1].geometry()];
        let PlanarGraph { ref mut nodes, ref mut directed_edges, ref edges } = self.graph;
        let ids = nodes.ids();

        for &id in ids.iter() {
            nodes.get_mut(id).star.compute_labelling(directed_edges, edges, geoms)?;
        }
        for &id in ids.iter() {
            nodes.get(id).star.merge_sym_labels(directed_edges);
        }
        for &id in ids.iter() {
            let node = nodes.get_mut(id);
            let star_label = *node.star.label();
            node.label.merge(&star_label);
        }
        Ok(())
    }

    // A node touched by only one input is somewhere in the other; find out
    // where. Then push node labels down onto the edges.
    fn label_incomplete_nodes(&mut self) {
        let geoms = [self.args[0].geometry(), self.args[1].geometry()];
        let locator = self.locator;
        let PlanarGraph { ref mut nodes, ref mut directed_edges, .. } = self.graph;

        for id in nodes.ids() {
            let node = nodes.get_mut(id);
            if node.is_isolated() {
                let target = if node.label.is_null(0) { 0 } else { 1 };
                let loc = locator.locate(node.coordinate(), geoms[target]);
                node.label.set_location_on(target, Some(loc));
            }
            let label = node.label;
            node.star.update_labelling(&label, directed_edges);
        }
    }

    fn find_result_area_edges(&mut self, op: OpCode) {
        for de in self.graph.directed_edges.iter_mut() {
            let label = *de.label();
            if label.is_area()
                && !de.is_interior_area_edge()
                && is_result_of_op(label.location(0, Position::Right), label.location(1, Position::Right), op)
            {
                de.set_in_result(true);
            }
        }
    }

    // Both directions in the result means the edge sits between two result
    // faces: it's not part of any result boundary.
    fn cancel_duplicate_result_edges(&mut self) {
        let des = &mut self.graph.directed_edges;
        for i in 0..des.len() {
            let sym = des[i].sym;
            if des[i].is_in_result() && des[sym].is_in_result() {
                des[i].set_in_result(false);
                des[sym].set_in_result(false);
            }
        }
    }
}

/// Runs `op` on `g0` and `g1` with default options.
pub fn overlay(g0: &Geometry, g1: &Geometry, op: OpCode) -> Result<Geometry, TopologyError> {
    OverlayOp::new(g0, g1, OverlayOptions::default()).compute(op)
}

/// The points in both `g0` and `g1`.
pub fn intersection(g0: &Geometry, g1: &Geometry) -> Result<Geometry, TopologyError> {
    overlay(g0, g1, OpCode::Intersection)
}

/// The points in `g0` or `g1`.
pub fn union(g0: &Geometry, g1: &Geometry) -> Result<Geometry, TopologyError> {
    overlay(g0, g1, OpCode::Union)
}

/// The points in `g0` but not in `g1`.
pub fn difference(g0: &Geometry, g1: &Geometry) -> Result<Geometry, TopologyError> {
    overlay(g0, g1, OpCode::Difference)
}

/// The points in exactly one of `g0` and `g1`.
pub fn sym_difference(g0: &Geometry, g1: &Geometry) -> Result<Geometry, TopologyError> {
    overlay(g0, g1, OpCode::SymDifference)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read::wkt;

    fn geom(s: &str) -> Geometry {
        wkt::parse(s).unwrap()
    }

    fn polygons(g: &Geometry) -> Vec<crate::geo::Polygon> {
        match g {
            &Geometry::Polygon(ref p) => vec![ p.clone() ],
            &Geometry::MultiPolygon(ref ps) => ps.clone(),
            _ => vec![],
        }
    }

    #[test]
    fn result_of_op_truth_table() {
        let i = Some(Location::Interior);
        let b = Some(Location::Boundary);
        let e = Some(Location::Exterior);
        assert!(is_result_of_op(i, b, OpCode::Intersection));
        assert!(!is_result_of_op(i, e, OpCode::Intersection));
        assert!(!is_result_of_op(i, None, OpCode::Intersection));
        assert!(is_result_of_op(e, i, OpCode::Union));
        assert!(!is_result_of_op(e, None, OpCode::Union));
        assert!(is_result_of_op(i, e, OpCode::Difference));
        assert!(!is_result_of_op(e, i, OpCode::Difference));
        assert!(is_result_of_op(e, b, OpCode::SymDifference));
        assert!(!is_result_of_op(i, i, OpCode::SymDifference));
    }

    // (0,0)-(2,2) and (1,1)-(3,3):
    //
    //        +-----+
    //        |  B  |
    //  +-----+--+  |
    //  |  A  |//|  |
    //  |     +--+--+
    //  |        |
    //  +--------+
    const A: &'static str = "POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))";
    const B: &'static str = "POLYGON ((1 1, 1 3, 3 3, 3 1, 1 1))";

    #[test]
    fn overlapping_squares_intersection() {
        let result = intersection(&geom(A), &geom(B)).unwrap();
        let polys = polygons(&result);
        assert_eq!(1, polys.len());
        assert_eq!(1.0, polys[0].area());
        assert!(polys[0].interiors.is_empty());
        assert_eq!(5, polys[0].exterior.0.len());
    }

    #[test]
    fn overlapping_squares_other_ops() {
        assert_eq!(7.0, union(&geom(A), &geom(B)).unwrap().area());
        assert_eq!(3.0, difference(&geom(A), &geom(B)).unwrap().area());
        assert_eq!(3.0, difference(&geom(B), &geom(A)).unwrap().area());

        let sym = sym_difference(&geom(A), &geom(B)).unwrap();
        assert_eq!(2, polygons(&sym).len());
        assert_eq!(6.0, sym.area());
    }

    #[test]
    fn disjoint_squares() {
        let a = geom("POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))");
        let b = geom("POLYGON ((5 5, 5 6, 6 6, 6 5, 5 5))");
        assert!(intersection(&a, &b).unwrap().is_empty());
        let u = union(&a, &b).unwrap();
        assert_eq!(2, polygons(&u).len());
        assert_eq!(2.0, u.area());
    }

    #[test]
    fn contained_square_makes_a_hole() {
        //  +-----------+
        //  |   +---+   |
        //  |   |   |   |
        //  |   +---+   |
        //  +-----------+
        let outer = geom("POLYGON ((0 0, 0 9, 9 9, 9 0, 0 0))");
        let inner = geom("POLYGON ((3 3, 3 6, 6 6, 6 3, 3 3))");
        let result = difference(&outer, &inner).unwrap();
        let polys = polygons(&result);
        assert_eq!(1, polys.len());
        assert_eq!(1, polys[0].interiors.len());
        assert_eq!(72.0, result.area());

        assert_eq!(9.0, intersection(&outer, &inner).unwrap().area());
        assert_eq!(81.0, union(&outer, &inner).unwrap().area());
    }

    #[test]
    fn identical_squares() {
        let a = geom(A);
        assert_eq!(4.0, intersection(&a, &a).unwrap().area());
        assert_eq!(4.0, union(&a, &a).unwrap().area());
        assert!(difference(&a, &a).unwrap().is_empty());
    }

    #[test]
    fn squares_sharing_an_edge() {
        //  +---+---+
        //  | A | B |
        //  +---+---+
        let a = geom("POLYGON ((0 0, 0 1, 1 1, 1 0, 0 0))");
        let b = geom("POLYGON ((1 0, 1 1, 2 1, 2 0, 1 0))");

        let u = union(&a, &b).unwrap();
        assert_eq!(1, polygons(&u).len());
        assert_eq!(2.0, u.area());

        // The shared edge is all they have in common.
        let i = intersection(&a, &b).unwrap();
        assert_eq!("LINESTRING (1 1, 1 0)", format!("{}", i));
    }

    #[test]
    fn line_through_square() {
        //       +---+
        //  -----+---+-----
        //       +---+
        let square = geom("POLYGON ((1 0, 1 2, 3 2, 3 0, 1 0))");
        let line = geom("LINESTRING (0 1, 4 1)");

        let inside = intersection(&line, &square).unwrap();
        assert_eq!("LINESTRING (1 1, 3 1)", format!("{}", inside));

        let outside = difference(&line, &square).unwrap();
        assert_eq!("MULTILINESTRING ((0 1, 1 1), (3 1, 4 1))", format!("{}", outside));

        // The line adds nothing to the square's area, and inside the square
        // it's covered.
        let u = union(&square, &line).unwrap();
        assert_eq!(4.0, u.area());
        assert_eq!(3, u.num_geometries());
    }

    #[test]
    fn point_in_and_out_of_square() {
        let square = geom(A);
        let inside = geom("POINT (1 1)");
        let outside = geom("POINT (5 5)");
        assert_eq!(inside, intersection(&inside, &square).unwrap());
        assert!(intersection(&outside, &square).unwrap().is_empty());
        assert_eq!(outside, difference(&outside, &square).unwrap());
    }

    #[test]
    fn crossing_lines_meet_at_a_point() {
        let a = geom("LINESTRING (0 0, 2 2)");
        let b = geom("LINESTRING (0 2, 2 0)");
        assert_eq!(geom("POINT (1 1)"), intersection(&a, &b).unwrap());
    }

    #[test]
    fn empty_member_line_is_ignored() {
        let a = geom("MULTILINESTRING ((0 0, 2 2), EMPTY)");
        let b = geom("LINESTRING (0 2, 2 0)");
        assert_eq!(geom("POINT (1 1)"), intersection(&a, &b).unwrap());

        // Both lines, each split where they cross.
        let u = union(&a, &b).unwrap();
        assert_eq!(4, u.num_geometries());
    }

    #[test]
    fn degenerate_input_is_rejected() {
        let bad = geom("POLYGON ((0 0, 1 1, 0 0, 0 0))");
        let err = intersection(&bad, &geom(A)).unwrap_err();
        assert_eq!(TopologyErrorKind::TooFewPoints, err.kind);
        assert_eq!(Some(Coordinate::new(0.0, 0.0)), err.coordinate);
    }

    #[test]
    fn options_default() {
        let options = OverlayOptions::default();
        assert_eq!(BoundaryNodeRule::Mod2, options.boundary_node_rule);
        assert!(!options.compute_ring_self_nodes);
        assert!(options.validate_noding);
    }
}
