use std::fmt;

use super::label::{Label, Location, Position};

const NULL_DEPTH: i32 = -1;

/// How many times each side of an edge is covered by each input geometry.
///
/// When several area edges collapse onto the same segment, their labels can
/// contradict one another. Counting depth (how deep inside the area each
/// side is) and normalizing resolves that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Depth {
    // [geom_index][Position]; the On column is never used.
    depth: [[i32; 3]; 2],
}

impl Default for Depth {
    fn default() -> Depth {
        Depth::new()
    }
}

impl Depth {
    pub fn new() -> Depth {
        Depth { depth: [[NULL_DEPTH; 3]; 2] }
    }

    pub fn depth_at_location(loc: Location) -> i32 {
        match loc {
            Location::Exterior => 0,
            Location::Interior => 1,
            Location::Boundary => NULL_DEPTH,
        }
    }

    pub fn get_depth(&self, geom_index: usize, pos: Position) -> i32 {
        self.depth[geom_index][pos as usize]
    }

    pub fn set_depth(&mut self, geom_index: usize, pos: Position, depth: i32) {
        self.depth[geom_index][pos as usize] = depth;
    }

    /// Interior iff the depth is positive.
    pub fn location(&self, geom_index: usize, pos: Position) -> Location {
        if self.depth[geom_index][pos as usize] <= 0 {
            Location::Exterior
        } else {
            Location::Interior
        }
    }

    pub fn add_location(&mut self, geom_index: usize, pos: Position, loc: Location) {
        if loc == Location::Interior {
            self.depth[geom_index][pos as usize] += 1;
        }
    }

    /// True iff no depth has been recorded at all.
    pub fn is_null(&self) -> bool {
        self.depth.iter().all(|d| d[1] == NULL_DEPTH && d[2] == NULL_DEPTH)
    }

    pub fn is_null_geom(&self, geom_index: usize) -> bool {
        self.depth[geom_index][1] == NULL_DEPTH
    }

    pub fn is_null_side(&self, geom_index: usize, pos: Position) -> bool {
        self.depth[geom_index][pos as usize] == NULL_DEPTH
    }

    /// Accumulates the Left and Right locations of `label`.
    ///
    /// An unset side starts at the label's depth; a set side adds to it.
    pub fn add(&mut self, label: &Label) {
        for i in 0..2 {
            for &pos in [Position::Left, Position::Right].iter() {
                match label.location(i, pos) {
                    Some(loc @ Location::Exterior) | Some(loc @ Location::Interior) => {
                        let d = &mut self.depth[i][pos as usize];
                        if *d == NULL_DEPTH {
                            *d = Depth::depth_at_location(loc);
                        } else {
                            *d += Depth::depth_at_location(loc);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    /// Right depth minus Left depth.
    pub fn delta(&self, geom_index: usize) -> i32 {
        self.depth[geom_index][Position::Right as usize] - self.depth[geom_index][Position::Left as usize]
    }

    /// Reduces each geometry's (Left, Right) pair so the smaller is 0 and the
    /// larger is 0 or 1.
    pub fn normalize(&mut self) {
        for i in 0..2 {
            if self.is_null_geom(i) {
                continue;
            }
            let min = self.depth[i][1].min(self.depth[i][2]).max(0);
            for j in 1..3 {
                self.depth[i][j] = if self.depth[i][j] > min { 1 } else { 0 };
            }
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "A: {},{} B: {},{}", self.depth[0][1], self.depth[0][2], self.depth[1][1], self.depth[1][2])
    }
}
