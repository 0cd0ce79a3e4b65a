use std::fmt;

pub use crate::geo::algorithm::Location;

/// A side of a directed graph element, or the element itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    On = 0,
    Left = 1,
    Right = 2,
}

impl Position {
    /// Left <-> Right. On stays On.
    pub fn opposite(self) -> Position {
        match self {
            Position::Left => Position::Right,
            Position::Right => Position::Left,
            Position::On => Position::On,
        }
    }
}

/// The locations of one graph element relative to one input geometry.
///
/// A "line" TopologyLocation only has an On slot. An "area" one also has
/// Left and Right slots. `None` means "not yet known".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyLocation {
    locations: [Option<Location>; 3],
    is_area: bool,
}

impl TopologyLocation {
    pub fn new_line(on: Option<Location>) -> TopologyLocation {
        TopologyLocation { locations: [on, None, None], is_area: false }
    }

    pub fn new_area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> TopologyLocation {
        TopologyLocation { locations: [on, left, right], is_area: true }
    }

    pub fn get(&self, pos: Position) -> Option<Location> {
        match pos {
            Position::On => self.locations[0],
            _ if self.is_area => self.locations[pos as usize],
            _ => None,
        }
    }

    pub fn set(&mut self, pos: Position, loc: Option<Location>) {
        if pos != Position::On && !self.is_area {
            self.is_area = true;
        }
        self.locations[pos as usize] = loc;
    }

    pub fn is_area(&self) -> bool {
        self.is_area
    }

    pub fn is_line(&self) -> bool {
        !self.is_area
    }

    fn slots(&self) -> &[Option<Location>] {
        if self.is_area { &self.locations[..] } else { &self.locations[..1] }
    }

    /// True iff every slot is unknown.
    pub fn is_null(&self) -> bool {
        self.slots().iter().all(|l| l.is_none())
    }

    /// True iff some slot is unknown.
    pub fn is_any_null(&self) -> bool {
        self.slots().iter().any(|l| l.is_none())
    }

    pub fn is_equal_on_side(&self, other: &TopologyLocation, pos: Position) -> bool {
        self.get(pos) == other.get(pos)
    }

    pub fn all_positions_equal(&self, loc: Location) -> bool {
        self.slots().iter().all(|&l| l == Some(loc))
    }

    /// Swaps Left and Right.
    pub fn flip(&mut self) {
        if self.is_area {
            self.locations.swap(1, 2);
        }
    }

    pub fn set_all_locations(&mut self, loc: Option<Location>) {
        let n = self.slots().len();
        for l in self.locations[..n].iter_mut() {
            *l = loc;
        }
    }

    pub fn set_all_locations_if_null(&mut self, loc: Option<Location>) {
        let n = self.slots().len();
        for l in self.locations[..n].iter_mut() {
            if l.is_none() {
                *l = loc;
            }
        }
    }

    /// Drops the Left and Right slots.
    pub fn to_line(&mut self) {
        self.is_area = false;
        self.locations[1] = None;
        self.locations[2] = None;
    }

    /// Fills each unknown slot from `other`. Known slots never change. An
    /// area `other` turns a line into an area.
    pub fn merge(&mut self, other: &TopologyLocation) {
        if other.is_area && !self.is_area {
            self.is_area = true;
            self.locations[1] = None;
            self.locations[2] = None;
        }
        let n = self.slots().len().min(other.slots().len());
        for i in 0..n {
            if self.locations[i].is_none() {
                self.locations[i] = other.locations[i];
            }
        }
    }
}

fn location_symbol(loc: Option<Location>) -> char {
    match loc {
        Some(Location::Interior) => 'i',
        Some(Location::Boundary) => 'b',
        Some(Location::Exterior) => 'e',
        None => '-',
    }
}

impl fmt::Display for TopologyLocation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_area {
            write!(f, "{}{}{}", location_symbol(self.locations[1]), location_symbol(self.locations[0]), location_symbol(self.locations[2]))
        } else {
            write!(f, "{}", location_symbol(self.locations[0]))
        }
    }
}

/// Records where a graph element lies relative to each of (up to) two input
/// geometries.
///
/// Labels start mostly unknown and fill in as the graph is computed. A
/// known location is only replaced by an explicit `set_*`; `merge` never
/// overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label {
    elt: [TopologyLocation; 2],
}

impl Label {
    /// A line label with the same On location for both geometries.
    pub fn new_on(on: Option<Location>) -> Label {
        Label { elt: [TopologyLocation::new_line(on), TopologyLocation::new_line(on)] }
    }

    /// A line label for geometry `geom_index`; the other geometry is unknown.
    pub fn new_geom_on(geom_index: usize, on: Option<Location>) -> Label {
        let mut label = Label::new_on(None);
        label.elt[geom_index].set(Position::On, on);
        label
    }

    /// An area label with the same locations for both geometries.
    pub fn new_area(on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Label {
        let tl = TopologyLocation::new_area(on, left, right);
        Label { elt: [tl, tl] }
    }

    /// An area label for geometry `geom_index`; the other geometry is an
    /// unknown area.
    pub fn new_geom_area(geom_index: usize, on: Option<Location>, left: Option<Location>, right: Option<Location>) -> Label {
        let mut label = Label::new_area(None, None, None);
        label.elt[geom_index] = TopologyLocation::new_area(on, left, right);
        label
    }

    /// A line label carrying only the On locations of `label`.
    pub fn to_line_label(label: &Label) -> Label {
        let mut ret = Label::new_on(None);
        for i in 0..2 {
            ret.elt[i].set(Position::On, label.location_on(i));
        }
        ret
    }

    pub fn flip(&mut self) {
        self.elt[0].flip();
        self.elt[1].flip();
    }

    pub fn location(&self, geom_index: usize, pos: Position) -> Option<Location> {
        self.elt[geom_index].get(pos)
    }

    pub fn location_on(&self, geom_index: usize) -> Option<Location> {
        self.elt[geom_index].get(Position::On)
    }

    pub fn set_location(&mut self, geom_index: usize, pos: Position, loc: Option<Location>) {
        self.elt[geom_index].set(pos, loc);
    }

    pub fn set_location_on(&mut self, geom_index: usize, loc: Option<Location>) {
        self.elt[geom_index].set(Position::On, loc);
    }

    pub fn set_all_locations(&mut self, geom_index: usize, loc: Option<Location>) {
        self.elt[geom_index].set_all_locations(loc);
    }

    pub fn set_all_locations_if_null(&mut self, geom_index: usize, loc: Option<Location>) {
        self.elt[geom_index].set_all_locations_if_null(loc);
    }

    pub fn set_all_locations_if_null_both(&mut self, loc: Option<Location>) {
        self.set_all_locations_if_null(0, loc);
        self.set_all_locations_if_null(1, loc);
    }

    /// Fills every unknown slot from `other`, geometry by geometry.
    pub fn merge(&mut self, other: &Label) {
        for i in 0..2 {
            self.elt[i].merge(&other.elt[i]);
        }
    }

    /// Number of geometries this label knows anything about.
    pub fn geometry_count(&self) -> usize {
        self.elt.iter().filter(|tl| !tl.is_null()).count()
    }

    /// True iff nothing is known about geometry `geom_index`.
    pub fn is_null(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_null()
    }

    pub fn is_any_null(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_any_null()
    }

    /// True iff either geometry's slot has Left/Right positions.
    pub fn is_area(&self) -> bool {
        self.elt[0].is_area() || self.elt[1].is_area()
    }

    pub fn is_area_of(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_area()
    }

    pub fn is_line(&self, geom_index: usize) -> bool {
        self.elt[geom_index].is_line()
    }

    pub fn is_equal_on_side(&self, other: &Label, pos: Position) -> bool {
        self.elt[0].is_equal_on_side(&other.elt[0], pos) && self.elt[1].is_equal_on_side(&other.elt[1], pos)
    }

    pub fn all_positions_equal(&self, geom_index: usize, loc: Location) -> bool {
        self.elt[geom_index].all_positions_equal(loc)
    }

    /// Collapses geometry `geom_index`'s slot to a line.
    pub fn to_line(&mut self, geom_index: usize) {
        self.elt[geom_index].to_line();
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "A:{} B:{}", self.elt[0], self.elt[1])
    }
}
