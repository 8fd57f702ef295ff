//! The schematic data model.
//!
//! Everything here is produced once by the parsing stage ([`crate::parse`])
//! and consumed immutably by the renderer. Coordinates are integers in
//! schematic-local units; floating point enters only at emission time.

use std::fmt;

/// An integer point in schematic space. Y grows downward (screen convention);
/// the emitter negates Y when producing TikZ coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Point {
        Point { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// An axis-aligned rectangle. `x1 < x2` is *not* guaranteed; consumers must
/// treat the two corners independently rather than as min/max.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Bounds {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Bounds {
        Bounds { x1, y1, x2, y2 }
    }

    /// Width and height as signed extents (`x2 - x1`, `y2 - y1`).
    pub fn size(&self) -> (i32, i32) {
        (self.x2 - self.x1, self.y2 - self.y1)
    }
}

/// Font attributes attached to a [`Text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub family: String,
    pub size: Option<i32>,
    pub bold: bool,
}

/// A piece of text with its extracted bounding box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub text: String,
    pub bounds: Bounds,
    pub font: Font,
    /// Text reads top-to-bottom when set.
    pub vertical: bool,
    pub invisible: bool,
}

/// A straight segment inside a drawing, or a port stub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
    pub width: Option<i32>,
}

/// An elliptical arc. The ellipse is inscribed in `bounds`; `p1`/`p2` lie on
/// its boundary and the sweep angles are derived at render time, not stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
    pub p1: Point,
    pub p2: Point,
    pub bounds: Bounds,
    pub width: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rectangle {
    pub bounds: Bounds,
    pub width: Option<i32>,
}

/// A full ellipse inscribed in `bounds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circle {
    pub bounds: Bounds,
    pub width: Option<i32>,
}

/// One element of a [`Pin`] or [`Symbol`] drawing, rendered in order
/// (painter's algorithm).
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicObject {
    Text(Text),
    Line(Line),
    Arc(Arc),
    Rectangle(Rectangle),
    Circle(Circle),
}

/// Signal direction of a pin or port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
    Bidir,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Input => "input",
            Direction::Output => "output",
            Direction::Bidir => "bidir",
        })
    }
}

/// Mirror flag applied to the internal geometry of a pin or symbol.
/// `X` flips the vertical coordinate, `Y` the horizontal one, both relative
/// to the object's own bounds. Mirroring happens *before* rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mirror {
    #[default]
    None,
    X,
    Y,
}

/// Rotation applied to the internal geometry of a pin or symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

/// A connection point on a [`Symbol`].
///
/// The two labels are redundant copies; they are normally equal, and the
/// renderer prefers the inner (second) one when they differ.
#[derive(Debug, Clone, PartialEq)]
pub struct Port {
    /// External attachment point, local to the symbol bounds.
    pub point: Point,
    pub direction: Direction,
    pub label_outer: Text,
    pub label_inner: Text,
    /// Stub segment from the symbol edge to `point`. One endpoint equals
    /// `point`; the other is where wires attach.
    pub stub: Line,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub bounds: Bounds,
    pub ports: Vec<Port>,
    pub type_label: Text,
    pub name_label: Text,
    pub drawing: Vec<GraphicObject>,
    pub mirror: Mirror,
    pub rotation: Rotation,
}

impl Symbol {
    /// A primitive symbol is rendered as a bare logic-gate-like shape rather
    /// than a boxed block: its drawing is not a single bare rectangle and
    /// every port has both labels invisible.
    pub fn is_primitive(&self) -> bool {
        if let [GraphicObject::Rectangle(_)] = self.drawing.as_slice() {
            return false;
        }
        self.ports
            .iter()
            .all(|p| p.label_outer.invisible && p.label_inner.invisible)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pin {
    pub bounds: Bounds,
    pub direction: Option<Direction>,
    /// Internal attachment point, local to `bounds`.
    pub point: Point,
    pub type_label: Text,
    pub name_label: Text,
    /// Optional default-level text. Parsed and carried, never rendered.
    pub level: Option<Text>,
    pub drawing: Vec<GraphicObject>,
    pub mirror: Mirror,
    pub rotation: Rotation,
}

/// A fan-out dot. Junctions are endpoints that others connect to, not wires;
/// they contribute no segment to the merger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Junction {
    pub point: Point,
}

/// A bare wire segment, possibly labeled with a signal/bus name.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub p1: Point,
    pub p2: Point,
    pub label: Option<Text>,
    /// The `(bus)` flag. Carried for completeness; the rendered width comes
    /// from the label subscripts, not from this flag.
    pub is_bus: bool,
}

/// Anything that can appear at the top level of a schematic.
#[derive(Debug, Clone, PartialEq)]
pub enum SchematicObject {
    Pin(Pin),
    Symbol(Symbol),
    Text(Text),
    Junction(Junction),
    Connector(Connector),
}

/// A parsed, structurally validated schematic: an ordered sequence of
/// top-level objects, rendered in one deterministic pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schematic {
    pub objects: Vec<SchematicObject>,
}
