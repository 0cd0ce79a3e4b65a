use std::collections::BTreeMap;

use crate::geo::{Coordinate, Geometry, LineString, LinearRing, Polygon};
use crate::geo::algorithm::{is_ccw, remove_repeated_points, BoundaryNodeRule, PointLocator};
use super::edge::Edge;
use super::index::{compute_intersections_between, compute_self_intersections, SegmentIntersector};
use super::label::{Label, Location};
use super::node::{Node, NodeMap};
use super::planar_graph::PlanarGraph;
use super::EdgeId;

/// The graph of one input Geometry, before it meets the other input.
///
/// Every ring and line of the input becomes one Edge; every ring start,
/// line endpoint and point becomes a Node labelled with its location in the
/// input. `arg_index` (0 or 1) says which Label slot this input fills.
///
/// ```
/// use topograph::geo::{Coordinate, Geometry, LineString};
/// use topograph::geo::algorithm::BoundaryNodeRule;
/// use topograph::graph::{GeometryGraph, Location};
///
/// let line = Geometry::LineString(LineString(vec![ Coordinate::new(0., 0.), Coordinate::new(5., 0.) ]));
/// let graph = GeometryGraph::new(0, &line, BoundaryNodeRule::Mod2);
/// assert_eq!(1, graph.edges().len());
/// assert_eq!(Location::Boundary, graph.locate(&Coordinate::new(5., 0.)));
/// ```
#[derive(Debug)]
pub struct GeometryGraph<'a> {
    pub graph: PlanarGraph,
    parent: &'a Geometry,
    arg_index: usize,
    boundary_node_rule: BoundaryNodeRule,
    use_boundary_determination_rule: bool,
    // Linear component ordinal (in traversal order) -> Edge.
    line_edge_map: BTreeMap<usize, EdgeId>,
    n_linear_components: usize,
    has_too_few_points: bool,
    invalid_point: Option<Coordinate>,
    locator: PointLocator,
}

impl<'a> GeometryGraph<'a> {
    pub fn new(arg_index: usize, parent: &'a Geometry, boundary_node_rule: BoundaryNodeRule) -> GeometryGraph<'a> {
        let mut ret = GeometryGraph {
            graph: PlanarGraph::new(),
            parent: parent,
            arg_index: arg_index,
            boundary_node_rule: boundary_node_rule,
            use_boundary_determination_rule: true,
            line_edge_map: BTreeMap::new(),
            n_linear_components: 0,
            has_too_few_points: false,
            invalid_point: None,
            locator: PointLocator::new(boundary_node_rule),
        };
        ret.add(parent);
        ret
    }

    pub fn geometry(&self) -> &'a Geometry {
        self.parent
    }

    pub fn arg_index(&self) -> usize {
        self.arg_index
    }

    pub fn boundary_node_rule(&self) -> BoundaryNodeRule {
        self.boundary_node_rule
    }

    /// True iff some ring or line was skipped for having too few distinct
    /// points. See `invalid_point`.
    pub fn has_too_few_points(&self) -> bool {
        self.has_too_few_points
    }

    pub fn invalid_point(&self) -> Option<Coordinate> {
        self.invalid_point
    }

    pub fn edges(&self) -> &[Edge] {
        &self.graph.edges
    }

    pub fn nodes(&self) -> &NodeMap {
        &self.graph.nodes
    }

    /// The Edge made from the `component`th ring or line of the input.
    pub fn find_edge(&self, component: usize) -> Option<&Edge> {
        self.line_edge_map.get(&component).map(|&id| &self.graph.edges[id])
    }

    pub fn boundary_nodes(&self) -> Vec<&Node> {
        self.graph.nodes.boundary_nodes(self.arg_index)
    }

    pub fn boundary_points(&self) -> Vec<Coordinate> {
        self.boundary_nodes().iter().map(|n| *n.coordinate()).collect()
    }

    fn add(&mut self, g: &Geometry) {
        if g.is_empty() {
            return;
        }

        match g {
            &Geometry::Point(ref p) => self.add_point(p.0),
            &Geometry::LineString(LineString(ref coords)) => self.add_line_string(coords),
            &Geometry::LinearRing(LinearRing(ref coords)) => self.add_line_string(coords),
            &Geometry::Polygon(ref poly) => self.add_polygon(poly),
            &Geometry::MultiPoint(ref pts) => {
                for p in pts.iter() {
                    self.add_point(p.0);
                }
            }
            &Geometry::MultiLineString(ref lines) => {
                for line in lines.iter().filter(|l| !l.0.is_empty()) {
                    self.add_line_string(&line.0);
                }
            }
            &Geometry::MultiPolygon(ref polys) => {
                // Shells of a MultiPolygon never share boundary, so their
                // self-intersection nodes are plain boundary points.
                self.use_boundary_determination_rule = false;
                for poly in polys.iter() {
                    self.add_polygon(poly);
                }
            }
            &Geometry::GeometryCollection(ref gs) => {
                for g in gs.iter() {
                    self.add(g);
                }
            }
        }
    }

    fn next_linear_component(&mut self) -> usize {
        self.n_linear_components += 1;
        self.n_linear_components - 1
    }

    fn record_too_few_points(&mut self, coords: &[Coordinate]) {
        warn!("skipping component with {} distinct points at {:?}", coords.len(), coords.first());
        self.has_too_few_points = true;
        self.invalid_point = coords.first().cloned();
    }

    /// Adds one ring of a polygon. `cw_left` and `cw_right` are the
    /// locations to the ring's left and right if it runs clockwise.
    fn add_polygon_ring(&mut self, ring: &LinearRing, cw_left: Location, cw_right: Location) {
        let component = self.next_linear_component();
        if ring.is_empty() {
            return;
        }

        let coords = remove_repeated_points(ring.coordinates());
        if coords.len() < 4 {
            self.record_too_few_points(&coords);
            return;
        }

        let (left, right) = if is_ccw(&coords) { (cw_right, cw_left) } else { (cw_left, cw_right) };
        let start = coords[0];
        let label = Label::new_geom_area(self.arg_index, Some(Location::Boundary), Some(left), Some(right));
        let edge_id = self.graph.insert_edge(Edge::new(coords, label));
        self.line_edge_map.insert(component, edge_id);
        self.insert_point(start, Location::Boundary);
    }

    fn add_polygon(&mut self, poly: &Polygon) {
        self.add_polygon_ring(&poly.exterior, Location::Exterior, Location::Interior);
        for hole in poly.interiors.iter() {
            // Holes are the other way round: the polygon is outside them.
            self.add_polygon_ring(hole, Location::Interior, Location::Exterior);
        }
    }

    fn add_line_string(&mut self, coords: &[Coordinate]) {
        let component = self.next_linear_component();
        let coords = remove_repeated_points(coords);
        if coords.len() < 2 {
            self.record_too_few_points(&coords);
            return;
        }

        let first = coords[0];
        let last = coords[coords.len() - 1];
        let label = Label::new_geom_on(self.arg_index, Some(Location::Interior));
        let edge_id = self.graph.insert_edge(Edge::new(coords, label));
        self.line_edge_map.insert(component, edge_id);

        // A closed line visits its start twice, making it Interior under
        // the Mod-2 rule.
        self.insert_boundary_point(first);
        self.insert_boundary_point(last);
    }

    fn add_point(&mut self, coord: Coordinate) {
        self.insert_point(coord, Location::Interior);
    }

    /// Adds an Edge computed elsewhere; its endpoints become boundary
    /// nodes.
    pub fn add_edge(&mut self, edge: Edge) {
        let first = *edge.coordinate(0);
        let last = *edge.coordinate(edge.num_points() - 1);
        self.graph.insert_edge(edge);
        self.insert_point(first, Location::Boundary);
        self.insert_point(last, Location::Boundary);
    }

    /// Sets the location of the Node at `coord` (creating it).
    pub fn insert_point(&mut self, coord: Coordinate, on_location: Location) {
        let arg_index = self.arg_index;
        let id = self.graph.nodes.add_node(coord);
        self.graph.nodes.get_mut(id).label.set_location_on(arg_index, Some(on_location));
    }

    /// Adds a line endpoint at `coord`. Whether it ends up Boundary or
    /// Interior depends on how many endpoints have landed there and on the
    /// BoundaryNodeRule.
    pub fn insert_boundary_point(&mut self, coord: Coordinate) {
        let arg_index = self.arg_index;
        let id = self.graph.nodes.add_node(coord);
        let label = &mut self.graph.nodes.get_mut(id).label;

        let mut boundary_count = 1;
        if label.location_on(arg_index) == Some(Location::Boundary) {
            boundary_count += 1;
        }

        let new_loc = if self.boundary_node_rule.is_in_boundary(boundary_count) {
            Location::Boundary
        } else {
            Location::Interior
        };
        label.set_location_on(arg_index, Some(new_loc));
    }

    /// Finds the input's self-intersections and adds a Node at each.
    ///
    /// Rings (LinearRing, Polygon, MultiPolygon inputs) are taken to be
    /// simple already, so their edges are only tested against each other,
    /// unless `compute_ring_self_nodes` is set.
    pub fn compute_self_nodes(&mut self, compute_ring_self_nodes: bool) -> SegmentIntersector {
        let mut si = SegmentIntersector::new(true, false);
        let is_rings = match *self.parent {
            Geometry::LinearRing(_) | Geometry::Polygon(_) | Geometry::MultiPolygon(_) => true,
            _ => false,
        };
        let compute_all_segments = compute_ring_self_nodes || !is_rings;
        compute_self_intersections(&mut self.graph.edges, &mut si, compute_all_segments);
        self.add_self_intersection_nodes();
        debug!("graph {}: {} self-intersections in {} tests", self.arg_index, si.num_intersections, si.num_tests);
        si
    }

    /// Intersects this graph's edges with `other`'s, recording the
    /// intersections on both.
    pub fn compute_edge_intersections(&mut self, other: &mut GeometryGraph, include_proper: bool) -> SegmentIntersector {
        let mut si = SegmentIntersector::new(include_proper, true);
        si.set_boundary_nodes(self.boundary_points(), other.boundary_points());
        compute_intersections_between(&mut self.graph.edges, &mut other.graph.edges, &mut si);
        debug!("graphs {}/{}: {} intersections in {} tests", self.arg_index, other.arg_index, si.num_intersections, si.num_tests);
        si
    }

    /// Splits every Edge at its intersections, appending the pieces to
    /// `out`.
    pub fn compute_split_edges(&mut self, out: &mut Vec<Edge>) {
        for edge in self.graph.edges.iter_mut() {
            edge.add_split_edges(out);
        }
    }

    fn add_self_intersection_nodes(&mut self) {
        let arg_index = self.arg_index;
        let mut found: Vec<(Coordinate, Option<Location>)> = vec![];
        for edge in self.graph.edges.iter() {
            let loc = edge.label().location_on(arg_index);
            for ei in edge.edge_intersection_list() {
                found.push((ei.coord, loc));
            }
        }

        for (coord, loc) in found {
            self.add_self_intersection_node(coord, loc);
        }
    }

    fn add_self_intersection_node(&mut self, coord: Coordinate, loc: Option<Location>) {
        // A boundary node stays a boundary node.
        if self.graph.is_boundary_node(self.arg_index, &coord) {
            return;
        }
        match loc {
            Some(Location::Boundary) if self.use_boundary_determination_rule => self.insert_boundary_point(coord),
            Some(loc) => self.insert_point(coord, loc),
            None => {}
        }
    }

    /// Locates `pt` in the input geometry.
    pub fn locate(&self, pt: &Coordinate) -> Location {
        self.locator.locate(pt, self.parent)
    }
}
