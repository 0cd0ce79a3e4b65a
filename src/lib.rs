//! Planar overlay of 2D geometries.
//!
//! Intersection, union, difference and symmetric difference of any two
//! geometries, computed by noding both inputs into one planar graph,
//! labelling every node and edge with its location in each input, and
//! reading the result back out of the labelled graph.
//!
//! ```
//! use topograph::read::wkt;
//!
//! let a = wkt::parse("POLYGON ((0 0, 0 2, 2 2, 2 0, 0 0))").unwrap();
//! let b = wkt::parse("POLYGON ((1 1, 1 3, 3 3, 3 1, 1 1))").unwrap();
//! assert_eq!(1.0, topograph::intersection(&a, &b).unwrap().area());
//! assert_eq!(7.0, topograph::union(&a, &b).unwrap().area());
//! ```

extern crate itertools;
#[macro_use] extern crate lazy_static;
extern crate regex;
extern crate rstar;
#[macro_use] extern crate tracing;

pub mod geo;
pub mod graph;
pub mod overlay;
pub mod read;

pub use overlay::{difference, intersection, overlay, sym_difference, union, OpCode, OverlayOp, OverlayOptions};
