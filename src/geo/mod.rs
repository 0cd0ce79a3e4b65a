//! The geometry model the topology engine consumes and produces.
//!
//! These types are deliberately plain: a geometry is a handful of coordinate
//! sequences. All topology lives in `graph`.

use std::cmp::Ordering;
use std::fmt;

pub mod algorithm;
pub mod intersector;

/// A place in the plane, with an optional elevation.
///
/// Equality and ordering only look at `x` and `y`. `z` rides along (and is
/// `NaN` when absent).
#[derive(Clone, Copy, Debug)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Coordinate {
        Coordinate { x: x, y: y, z: f64::NAN }
    }

    pub fn new_3d(x: f64, y: f64, z: f64) -> Coordinate {
        Coordinate { x: x, y: y, z: z }
    }

    pub fn equals_2d(&self, other: &Coordinate) -> bool {
        self.x == other.x && self.y == other.y
    }

    pub fn distance(&self, other: &Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Coordinate) -> bool {
        self.equals_2d(other)
    }
}

impl Eq for Coordinate {}

/// Coordinates are ordered by `x`, then `y`. That is the order `NodeMap`
/// iterates in.
impl Ord for Coordinate {
    fn cmp(&self, other: &Coordinate) -> Ordering {
        self.x.partial_cmp(&other.x).unwrap_or(Ordering::Equal)
            .then_with(|| self.y.partial_cmp(&other.y).unwrap_or(Ordering::Equal))
    }
}

impl PartialOrd for Coordinate {
    fn partial_cmp(&self, other: &Coordinate) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from(xy: (f64, f64)) -> Coordinate {
        Coordinate::new(xy.0, xy.1)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.z.is_nan() {
            write!(f, "{} {}", self.x, self.y)
        } else {
            write!(f, "{} {} {}", self.x, self.y, self.z)
        }
    }
}

/// An axis-aligned bounding box. A "null" envelope contains nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Envelope {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Envelope {
    pub fn null() -> Envelope {
        Envelope { min_x: 0.0, max_x: -1.0, min_y: 0.0, max_y: -1.0 }
    }

    pub fn from_coordinates(coords: &[Coordinate]) -> Envelope {
        let mut env = Envelope::null();
        for c in coords {
            env.expand_to_include(c);
        }
        env
    }

    /// The envelope of the segment (or point pair) `p1`..`p2`.
    pub fn of_segment(p1: &Coordinate, p2: &Coordinate) -> Envelope {
        Envelope {
            min_x: p1.x.min(p2.x),
            max_x: p1.x.max(p2.x),
            min_y: p1.y.min(p2.y),
            max_y: p1.y.max(p2.y),
        }
    }

    pub fn is_null(&self) -> bool {
        self.max_x < self.min_x
    }

    pub fn expand_to_include(&mut self, c: &Coordinate) {
        if self.is_null() {
            self.min_x = c.x;
            self.max_x = c.x;
            self.min_y = c.y;
            self.max_y = c.y;
        } else {
            self.min_x = self.min_x.min(c.x);
            self.max_x = self.max_x.max(c.x);
            self.min_y = self.min_y.min(c.y);
            self.max_y = self.max_y.max(c.y);
        }
    }

    pub fn contains_coordinate(&self, c: &Coordinate) -> bool {
        !self.is_null()
            && c.x >= self.min_x && c.x <= self.max_x
            && c.y >= self.min_y && c.y <= self.max_y
    }

    pub fn contains(&self, other: &Envelope) -> bool {
        !self.is_null() && !other.is_null()
            && other.min_x >= self.min_x && other.max_x <= self.max_x
            && other.min_y >= self.min_y && other.max_y <= self.max_y
    }

    pub fn intersects(&self, other: &Envelope) -> bool {
        !self.is_null() && !other.is_null()
            && other.min_x <= self.max_x && other.max_x >= self.min_x
            && other.min_y <= self.max_y && other.max_y >= self.min_y
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point(pub Coordinate);

/// A path through two or more Coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct LineString(pub Vec<Coordinate>);

/// A closed LineString: first and last Coordinates are identical.
///
/// Clockwise rings enclose area; counter-clockwise rings (inside a
/// Polygon) are holes. (0,0) is the bottom left: y points up.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearRing(pub Vec<Coordinate>);

impl LinearRing {
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.0
    }

    pub fn envelope(&self) -> Envelope {
        Envelope::from_coordinates(&self.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the absolute enclosed area.
    pub fn area(&self) -> f64 {
        algorithm::signed_area(&self.0).abs()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    pub exterior: LinearRing,
    pub interiors: Vec<LinearRing>,
}

impl Polygon {
    pub fn new(exterior: LinearRing, interiors: Vec<LinearRing>) -> Polygon {
        Polygon { exterior: exterior, interiors: interiors }
    }

    /// Area of the shell minus the area of the holes.
    pub fn area(&self) -> f64 {
        self.exterior.area() - self.interiors.iter().map(|r| r.area()).sum::<f64>()
    }
}

/// Any geometry the engine accepts.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point),
    LineString(LineString),
    LinearRing(LinearRing),
    Polygon(Polygon),
    MultiPoint(Vec<Point>),
    MultiLineString(Vec<LineString>),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

impl Geometry {
    pub fn empty() -> Geometry {
        Geometry::GeometryCollection(vec![])
    }

    pub fn is_empty(&self) -> bool {
        match self {
            &Geometry::Point(_) => false,
            &Geometry::LineString(ref l) => l.0.is_empty(),
            &Geometry::LinearRing(ref r) => r.0.is_empty(),
            &Geometry::Polygon(ref p) => p.exterior.is_empty(),
            &Geometry::MultiPoint(ref ps) => ps.is_empty(),
            &Geometry::MultiLineString(ref ls) => ls.iter().all(|l| l.0.is_empty()),
            &Geometry::MultiPolygon(ref ps) => ps.iter().all(|p| p.exterior.is_empty()),
            &Geometry::GeometryCollection(ref gs) => gs.iter().all(|g| g.is_empty()),
        }
    }

    /// 0 for points, 1 for lines, 2 for areas; `None` for an empty collection.
    pub fn dimension(&self) -> Option<u8> {
        match self {
            &Geometry::Point(_) | &Geometry::MultiPoint(_) => Some(0),
            &Geometry::LineString(_) | &Geometry::LinearRing(_) | &Geometry::MultiLineString(_) => Some(1),
            &Geometry::Polygon(_) | &Geometry::MultiPolygon(_) => Some(2),
            &Geometry::GeometryCollection(ref gs) => gs.iter().filter_map(|g| g.dimension()).max(),
        }
    }

    /// True for Polygon and MultiPolygon.
    pub fn is_polygonal(&self) -> bool {
        match self {
            &Geometry::Polygon(_) | &Geometry::MultiPolygon(_) => true,
            _ => false,
        }
    }

    /// Total area of every polygonal component.
    pub fn area(&self) -> f64 {
        match self {
            &Geometry::Polygon(ref p) => p.area(),
            &Geometry::MultiPolygon(ref ps) => ps.iter().map(|p| p.area()).sum(),
            &Geometry::GeometryCollection(ref gs) => gs.iter().map(|g| g.area()).sum(),
            _ => 0.0,
        }
    }

    /// Number of top-level components (1 for non-collections).
    pub fn num_geometries(&self) -> usize {
        match self {
            &Geometry::MultiPoint(ref ps) => ps.len(),
            &Geometry::MultiLineString(ref ls) => ls.len(),
            &Geometry::MultiPolygon(ref ps) => ps.len(),
            &Geometry::GeometryCollection(ref gs) => gs.len(),
            _ => 1,
        }
    }

    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        self.visit_coordinates(&mut |c| env.expand_to_include(c));
        env
    }

    fn visit_coordinates<F: FnMut(&Coordinate)>(&self, f: &mut F) {
        match self {
            &Geometry::Point(ref p) => f(&p.0),
            &Geometry::LineString(ref l) => l.0.iter().for_each(|c| f(c)),
            &Geometry::LinearRing(ref r) => r.0.iter().for_each(|c| f(c)),
            &Geometry::Polygon(ref p) => p.exterior.0.iter().for_each(|c| f(c)),
            &Geometry::MultiPoint(ref ps) => ps.iter().for_each(|p| f(&p.0)),
            &Geometry::MultiLineString(ref ls) => ls.iter().flat_map(|l| l.0.iter()).for_each(|c| f(c)),
            &Geometry::MultiPolygon(ref ps) => ps.iter().flat_map(|p| p.exterior.0.iter()).for_each(|c| f(c)),
            &Geometry::GeometryCollection(ref gs) => gs.iter().for_each(|g| g.visit_coordinates(f)),
        }
    }
}

/// Builds output geometries. Callers may supply their own (to, say, snap
/// coordinates or track provenance); `DefaultGeometryFactory` just wraps.
pub trait GeometryFactory {
    fn create_point(&self, coord: Coordinate) -> Point {
        Point(coord)
    }

    fn create_line_string(&self, coords: Vec<Coordinate>) -> LineString {
        LineString(coords)
    }

    fn create_linear_ring(&self, coords: Vec<Coordinate>) -> LinearRing {
        LinearRing(coords)
    }

    fn create_polygon(&self, shell: LinearRing, holes: Vec<LinearRing>) -> Polygon {
        Polygon::new(shell, holes)
    }

    /// Returns the most specific Geometry that holds all `geoms`: the lone
    /// member, a homogeneous Multi*, or a GeometryCollection.
    fn build_geometry(&self, mut geoms: Vec<Geometry>) -> Geometry {
        if geoms.len() == 1 {
            return geoms.remove(0);
        }
        if geoms.is_empty() {
            return Geometry::empty();
        }

        if geoms.iter().all(|g| match g { &Geometry::Point(_) => true, _ => false }) {
            Geometry::MultiPoint(geoms.into_iter().filter_map(|g| match g { Geometry::Point(p) => Some(p), _ => None }).collect())
        } else if geoms.iter().all(|g| match g { &Geometry::LineString(_) => true, _ => false }) {
            Geometry::MultiLineString(geoms.into_iter().filter_map(|g| match g { Geometry::LineString(l) => Some(l), _ => None }).collect())
        } else if geoms.iter().all(|g| match g { &Geometry::Polygon(_) => true, _ => false }) {
            Geometry::MultiPolygon(geoms.into_iter().filter_map(|g| match g { Geometry::Polygon(p) => Some(p), _ => None }).collect())
        } else {
            Geometry::GeometryCollection(geoms)
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultGeometryFactory;

impl GeometryFactory for DefaultGeometryFactory {}

struct DisplayCoords<'a>(&'a [Coordinate]);
impl<'a> fmt::Display for DisplayCoords<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "EMPTY");
        }
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", c)?;
        }
        write!(f, ")")
    }
}

struct DisplayPolygonBody<'a>(&'a Polygon);
impl<'a> fmt::Display for DisplayPolygonBody<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.0.exterior.is_empty() {
            return write!(f, "EMPTY");
        }
        write!(f, "({}", DisplayCoords(&self.0.exterior.0))?;
        for hole in self.0.interiors.iter() {
            write!(f, ", {}", DisplayCoords(&hole.0))?;
        }
        write!(f, ")")
    }
}

/// Writes Well-Known Text.
impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            &Geometry::Point(ref p) => write!(f, "POINT ({})", p.0),
            &Geometry::LineString(ref l) => write!(f, "LINESTRING {}", DisplayCoords(&l.0)),
            &Geometry::LinearRing(ref r) => write!(f, "LINEARRING {}", DisplayCoords(&r.0)),
            &Geometry::Polygon(ref p) => write!(f, "POLYGON {}", DisplayPolygonBody(p)),
            &Geometry::MultiPoint(ref ps) => {
                let coords: Vec<Coordinate> = ps.iter().map(|p| p.0).collect();
                write!(f, "MULTIPOINT {}", DisplayCoords(&coords))
            }
            &Geometry::MultiLineString(ref ls) => {
                if ls.is_empty() {
                    return write!(f, "MULTILINESTRING EMPTY");
                }
                write!(f, "MULTILINESTRING (")?;
                for (i, l) in ls.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", DisplayCoords(&l.0))?;
                }
                write!(f, ")")
            }
            &Geometry::MultiPolygon(ref ps) => {
                if ps.is_empty() {
                    return write!(f, "MULTIPOLYGON EMPTY");
                }
                write!(f, "MULTIPOLYGON (")?;
                for (i, p) in ps.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", DisplayPolygonBody(p))?;
                }
                write!(f, ")")
            }
            &Geometry::GeometryCollection(ref gs) => {
                if gs.is_empty() {
                    return write!(f, "GEOMETRYCOLLECTION EMPTY");
                }
                write!(f, "GEOMETRYCOLLECTION (")?;
                for (i, g) in gs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", g)?;
                }
                write!(f, ")")
            }
        }
    }
}
