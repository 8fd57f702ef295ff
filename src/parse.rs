//! BDF front-end: s-expression parsing and typed interpretation.
//!
//! The surface syntax is parsed with a pest grammar (`bdf.pest`), then the
//! generic list tree is interpreted into the typed data model of
//! [`crate::types`], enforcing the exact child-count constraints of each
//! block kind. The rendering engine downstream assumes this stage has
//! rejected everything structurally malformed.

use pest::Parser;
use pest_derive::Parser;

use crate::errors::{ParseError, SourceContext};
use crate::types::*;

#[derive(Parser)]
#[grammar = "bdf.pest"]
pub struct BdfParser;

/// Parse a BDF document into a validated [`Schematic`].
pub fn parse_bdf(source: &str) -> Result<Schematic, ParseError> {
    parse_bdf_named(source, "<input>")
}

/// Like [`parse_bdf`], with a source name used in diagnostics.
pub fn parse_bdf_named(source: &str, name: &str) -> Result<Schematic, ParseError> {
    let ctx = SourceContext::new(name, source);
    let mut pairs = BdfParser::parse(Rule::bdf, source).map_err(|e| syntax_error(&ctx, e))?;

    let root = pairs.next().expect("grammar yields exactly one bdf node");
    let mut nodes = Vec::new();
    for pair in root.into_inner() {
        if pair.as_rule() == Rule::EOI {
            continue;
        }
        nodes.push(build_node(&ctx, pair)?);
    }

    let interp = Interp { ctx: &ctx };
    let body = interp.validate_header(&nodes)?;

    let mut objects = Vec::new();
    for node in body {
        objects.push(interp.schematic_object(node)?);
    }
    Ok(Schematic { objects })
}

// ============================================================================
// Generic list tree
// ============================================================================

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    start: usize,
    len: usize,
}

#[derive(Debug)]
enum NodeKind {
    List(Vec<Node>),
    Str(String),
    Int(i32),
    Sym(String),
}

impl Node {
    /// Quoted string or bare symbol content; header fields accept either.
    fn atom(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Str(s) | NodeKind::Sym(s) => Some(s),
            _ => None,
        }
    }
}

fn syntax_error(ctx: &SourceContext, e: pest::error::Error<Rule>) -> ParseError {
    let (start, len) = match e.location {
        pest::error::InputLocation::Pos(p) => (p, 1),
        pest::error::InputLocation::Span((s, e)) => (s, e - s),
    };
    ParseError::Syntax {
        message: e.variant.message().into_owned(),
        src: ctx.named_source(),
        span: (start, len.max(1)).into(),
    }
}

fn build_node(ctx: &SourceContext, pair: pest::iterators::Pair<Rule>) -> Result<Node, ParseError> {
    let span = pair.as_span();
    let (start, len) = (span.start(), span.end() - span.start());
    let kind = match pair.as_rule() {
        Rule::sexp => NodeKind::List(
            pair.into_inner()
                .map(|p| build_node(ctx, p))
                .collect::<Result<_, _>>()?,
        ),
        Rule::string => {
            let raw = pair.as_str();
            NodeKind::Str(unescape(&raw[1..raw.len() - 1]))
        }
        Rule::integer => NodeKind::Int(pair.as_str().parse().map_err(|_| {
            ParseError::InvalidInteger {
                src: ctx.named_source(),
                span: (start, len).into(),
            }
        })?),
        Rule::symbol => NodeKind::Sym(pair.as_str().to_string()),
        rule => unreachable!("unexpected rule {rule:?} in value position"),
    };
    Ok(Node { kind, start, len })
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next().unwrap_or('\\'));
        } else {
            out.push(c);
        }
    }
    out
}

// ============================================================================
// Typed interpretation
// ============================================================================

/// One interpreted block. Internal carriers (fonts, widths, drawings) never
/// surface in the schematic; they are absorbed by their parent block.
enum Item {
    Font(Font),
    FontSize(i32),
    LineWidth(i32),
    Bounds(Bounds),
    Point(Point),
    Drawing(Vec<GraphicObject>),
    Annotation,
    Port(Port),
    Text(Text),
    Line(Line),
    Arc(Arc),
    Rectangle(Rectangle),
    Circle(Circle),
    Pin(Pin),
    Symbol(Symbol),
    Junction(Junction),
    Connector(Connector),
    /// A bare `(name)` block with no payload: direction markers, `bold`,
    /// `vertical`, `invisible`, `bus`, orientation flags.
    Flag(String),
}

impl Item {
    fn kind_name(&self) -> &'static str {
        match self {
            Item::Font(_) => "font",
            Item::FontSize(_) => "font_size",
            Item::LineWidth(_) => "line_width",
            Item::Bounds(_) => "rect",
            Item::Point(_) => "pt",
            Item::Drawing(_) => "drawing",
            Item::Annotation => "annotation_block",
            Item::Port(_) => "port",
            Item::Text(_) => "text",
            Item::Line(_) => "line",
            Item::Arc(_) => "arc",
            Item::Rectangle(_) => "rectangle",
            Item::Circle(_) => "circle",
            Item::Pin(_) => "pin",
            Item::Symbol(_) => "symbol",
            Item::Junction(_) => "junction",
            Item::Connector(_) => "connector",
            Item::Flag(_) => "flag",
        }
    }
}

fn direction(s: &str) -> Option<Direction> {
    match s {
        "input" => Some(Direction::Input),
        "output" => Some(Direction::Output),
        "bidir" => Some(Direction::Bidir),
        _ => None,
    }
}

/// `flipx`, `rotate180`, `flipy_rotate90`, ...
fn orientation_flag(flag: &str) -> Option<(Mirror, Rotation)> {
    Some(match flag {
        "flipx" => (Mirror::X, Rotation::R0),
        "flipy" => (Mirror::Y, Rotation::R0),
        "rotate90" => (Mirror::None, Rotation::R90),
        "rotate180" => (Mirror::None, Rotation::R180),
        "rotate270" => (Mirror::None, Rotation::R270),
        "flipx_rotate90" => (Mirror::X, Rotation::R90),
        "flipx_rotate180" => (Mirror::X, Rotation::R180),
        "flipx_rotate270" => (Mirror::X, Rotation::R270),
        "flipy_rotate90" => (Mirror::Y, Rotation::R90),
        "flipy_rotate180" => (Mirror::Y, Rotation::R180),
        "flipy_rotate270" => (Mirror::Y, Rotation::R270),
        _ => return None,
    })
}

const SUPPORTED_HEADERS: &[(&str, &[&str])] =
    &[("graphic", &["1.3", "1.4"]), ("symbol", &["1.1"])];

struct Interp<'a> {
    ctx: &'a SourceContext,
}

impl<'a> Interp<'a> {
    fn malformed(&self, node: &Node, kind: &'static str, reason: impl Into<String>) -> ParseError {
        ParseError::MalformedObject {
            kind,
            reason: reason.into(),
            src: self.ctx.named_source(),
            span: (node.start, node.len).into(),
        }
    }

    /// Validates the mandatory leading header block and returns the rest.
    fn validate_header<'n>(&self, nodes: &'n [Node]) -> Result<&'n [Node], ParseError> {
        let Some((header, body)) = nodes.split_first() else {
            return Err(ParseError::MissingHeader);
        };
        let NodeKind::List(children) = &header.kind else {
            return Err(ParseError::MissingHeader);
        };
        match children.first().and_then(Node::atom) {
            Some("header") => {}
            _ => return Err(ParseError::MissingHeader),
        }

        let bad = || ParseError::BadHeader {
            src: self.ctx.named_source(),
            span: (header.start, header.len).into(),
        };
        if children.len() != 3 {
            return Err(bad());
        }
        let kind = children[1].atom().ok_or_else(bad)?;
        let NodeKind::List(version_info) = &children[2].kind else {
            return Err(bad());
        };
        if version_info.len() != 2 || version_info[0].atom() != Some("version") {
            return Err(bad());
        }
        let version = version_info[1].atom().ok_or_else(bad)?;

        let supported = SUPPORTED_HEADERS
            .iter()
            .any(|(k, vs)| *k == kind && vs.contains(&version));
        if !supported {
            return Err(ParseError::UnsupportedVersion {
                kind: kind.to_string(),
                version: version.to_string(),
                src: self.ctx.named_source(),
                span: (header.start, header.len).into(),
            });
        }
        Ok(body)
    }

    fn schematic_object(&self, node: &Node) -> Result<SchematicObject, ParseError> {
        let item = self.object(node)?;
        Ok(match item {
            Item::Pin(v) => SchematicObject::Pin(v),
            Item::Symbol(v) => SchematicObject::Symbol(v),
            Item::Text(v) => SchematicObject::Text(v),
            Item::Junction(v) => SchematicObject::Junction(v),
            Item::Connector(v) => SchematicObject::Connector(v),
            other => {
                return Err(ParseError::NotTopLevel {
                    name: other.kind_name().to_string(),
                    src: self.ctx.named_source(),
                    span: (node.start, node.len).into(),
                });
            }
        })
    }

    fn object(&self, node: &Node) -> Result<Item, ParseError> {
        let NodeKind::List(children) = &node.kind else {
            return Err(self.malformed(node, "object", "expected a parenthesized block"));
        };
        let Some((head, rest)) = children.split_first() else {
            return Err(self.malformed(node, "object", "empty block"));
        };
        let NodeKind::Sym(name) = &head.kind else {
            return Err(self.malformed(node, "object", "block must start with a name"));
        };

        match name.as_str() {
            "font_size" => Ok(Item::FontSize(self.single_int(node, rest, "font_size")?)),
            "line_width" => Ok(Item::LineWidth(self.single_int(node, rest, "line_width")?)),
            "rect" => self.rect(node, rest),
            "pt" => self.point(node, rest).map(Item::Point),
            "drawing" => self.drawing(node, rest),
            "annotation_block" => Ok(Item::Annotation),
            "font" => self.font(node, rest),
            "text" => self.text(node, rest).map(Item::Text),
            "line" => self.line(node, rest).map(Item::Line),
            "arc" => self.arc(node, rest),
            "rectangle" => self.box_shape(node, rest, "rectangle"),
            "circle" => self.box_shape(node, rest, "circle"),
            "port" => self.port(node, rest),
            "junction" => self.junction(node, rest),
            "connector" => self.connector(node, rest),
            "symbol" => self.symbol(node, rest),
            "pin" => self.pin(node, rest),
            other => {
                // A payload-free unknown block is a flag owned by its parent.
                if rest.is_empty() {
                    Ok(Item::Flag(other.to_string()))
                } else {
                    Err(ParseError::UnknownObject {
                        name: other.to_string(),
                        src: self.ctx.named_source(),
                        span: (node.start, node.len).into(),
                    })
                }
            }
        }
    }

    fn items(&self, nodes: &[Node]) -> Result<Vec<Item>, ParseError> {
        nodes.iter().map(|n| self.object(n)).collect()
    }

    fn single_int(&self, node: &Node, rest: &[Node], kind: &'static str) -> Result<i32, ParseError> {
        match rest {
            [n] => match n.kind {
                NodeKind::Int(v) => Ok(v),
                _ => Err(self.malformed(node, kind, "expected an integer")),
            },
            _ => Err(self.malformed(node, kind, "expected exactly one integer")),
        }
    }

    fn rect(&self, node: &Node, rest: &[Node]) -> Result<Item, ParseError> {
        let mut vals = [0i32; 4];
        if rest.len() != 4 {
            return Err(self.malformed(node, "rect", "expected exactly 4 integers"));
        }
        for (slot, n) in vals.iter_mut().zip(rest) {
            match n.kind {
                NodeKind::Int(v) => *slot = v,
                _ => return Err(self.malformed(node, "rect", "expected an integer")),
            }
        }
        Ok(Item::Bounds(Bounds::new(vals[0], vals[1], vals[2], vals[3])))
    }

    fn point(&self, node: &Node, rest: &[Node]) -> Result<Point, ParseError> {
        match rest {
            [Node { kind: NodeKind::Int(x), .. }, Node { kind: NodeKind::Int(y), .. }] => {
                Ok(Point::new(*x, *y))
            }
            _ => Err(self.malformed(node, "pt", "expected exactly 2 integers")),
        }
    }

    fn drawing(&self, node: &Node, rest: &[Node]) -> Result<Item, ParseError> {
        let mut objects = Vec::new();
        for item in self.items(rest)? {
            objects.push(match item {
                Item::Text(v) => GraphicObject::Text(v),
                Item::Line(v) => GraphicObject::Line(v),
                Item::Arc(v) => GraphicObject::Arc(v),
                Item::Rectangle(v) => GraphicObject::Rectangle(v),
                Item::Circle(v) => GraphicObject::Circle(v),
                other => {
                    return Err(self.malformed(
                        node,
                        "drawing",
                        format!("{} is not a graphic object", other.kind_name()),
                    ));
                }
            });
        }
        Ok(Item::Drawing(objects))
    }

    fn font(&self, node: &Node, rest: &[Node]) -> Result<Item, ParseError> {
        let Some((first, attrs)) = rest.split_first() else {
            return Err(self.malformed(node, "font", "missing family name"));
        };
        let NodeKind::Str(family) = &first.kind else {
            return Err(self.malformed(node, "font", "family name must be a string"));
        };
        let mut size = None;
        let mut bold = false;
        for item in self.items(attrs)? {
            match item {
                Item::Flag(f) if f == "bold" => bold = true,
                Item::FontSize(s) => {
                    if size.replace(s).is_some() {
                        return Err(self.malformed(node, "font", "duplicate font_size"));
                    }
                }
                other => {
                    return Err(self.malformed(
                        node,
                        "font",
                        format!("unexpected {} in font", other.kind_name()),
                    ));
                }
            }
        }
        Ok(Item::Font(Font {
            family: family.clone(),
            size,
            bold,
        }))
    }

    fn text(&self, node: &Node, rest: &[Node]) -> Result<Text, ParseError> {
        let Some((first, attrs)) = rest.split_first() else {
            return Err(self.malformed(node, "text", "missing content string"));
        };
        let NodeKind::Str(content) = &first.kind else {
            return Err(self.malformed(node, "text", "content must be a string"));
        };
        let mut bounds = None;
        let mut font = None;
        let mut vertical = false;
        let mut invisible = false;
        for item in self.items(attrs)? {
            match item {
                Item::Bounds(b) => {
                    if bounds.replace(b).is_some() {
                        return Err(self.malformed(node, "text", "duplicate rect"));
                    }
                }
                Item::Font(f) => {
                    if font.replace(f).is_some() {
                        return Err(self.malformed(node, "text", "duplicate font"));
                    }
                }
                Item::Flag(f) if f == "vertical" => vertical = true,
                Item::Flag(f) if f == "invisible" => invisible = true,
                other => {
                    return Err(self.malformed(
                        node,
                        "text",
                        format!("unexpected {} in text", other.kind_name()),
                    ));
                }
            }
        }
        Ok(Text {
            text: content.clone(),
            bounds: bounds.ok_or_else(|| self.malformed(node, "text", "missing rect"))?,
            font: font.ok_or_else(|| self.malformed(node, "text", "missing font"))?,
            vertical,
            invisible,
        })
    }

    fn line(&self, node: &Node, rest: &[Node]) -> Result<Line, ParseError> {
        let items = self.items(rest)?;
        match items.as_slice() {
            [Item::Point(p1), Item::Point(p2), Item::LineWidth(w)] => Ok(Line {
                p1: *p1,
                p2: *p2,
                width: Some(*w),
            }),
            _ => Err(self.malformed(node, "line", "expected (pt) (pt) (line_width)")),
        }
    }

    fn arc(&self, node: &Node, rest: &[Node]) -> Result<Item, ParseError> {
        let mut points = Vec::new();
        let mut bounds = None;
        let mut width = None;
        for item in self.items(rest)? {
            match item {
                Item::Point(p) => points.push(p),
                Item::Bounds(b) => {
                    if bounds.replace(b).is_some() {
                        return Err(self.malformed(node, "arc", "duplicate rect"));
                    }
                }
                Item::LineWidth(w) => {
                    if width.replace(w).is_some() {
                        return Err(self.malformed(node, "arc", "duplicate line_width"));
                    }
                }
                other => {
                    return Err(self.malformed(
                        node,
                        "arc",
                        format!("unexpected {} in arc", other.kind_name()),
                    ));
                }
            }
        }
        let [p1, p2] = points.as_slice() else {
            return Err(self.malformed(node, "arc", "expected exactly 2 points"));
        };
        Ok(Item::Arc(Arc {
            p1: *p1,
            p2: *p2,
            bounds: bounds.ok_or_else(|| self.malformed(node, "arc", "missing rect"))?,
            width,
        }))
    }

    fn box_shape(&self, node: &Node, rest: &[Node], kind: &'static str) -> Result<Item, ParseError> {
        let mut bounds = None;
        let mut width = None;
        for item in self.items(rest)? {
            match item {
                Item::Bounds(b) => {
                    if bounds.replace(b).is_some() {
                        return Err(self.malformed(node, kind, "duplicate rect"));
                    }
                }
                Item::LineWidth(w) => {
                    if width.replace(w).is_some() {
                        return Err(self.malformed(node, kind, "duplicate line_width"));
                    }
                }
                other => {
                    return Err(self.malformed(
                        node,
                        kind,
                        format!("unexpected {} in {kind}", other.kind_name()),
                    ));
                }
            }
        }
        let bounds = bounds.ok_or_else(|| self.malformed(node, kind, "missing rect"))?;
        Ok(match kind {
            "rectangle" => Item::Rectangle(Rectangle { bounds, width }),
            _ => Item::Circle(Circle { bounds, width }),
        })
    }

    fn port(&self, node: &Node, rest: &[Node]) -> Result<Item, ParseError> {
        let items = self.items(rest)?;
        match items.as_slice() {
            [
                Item::Point(p),
                Item::Flag(dir),
                Item::Text(outer),
                Item::Text(inner),
                Item::Line(stub),
            ] => {
                let direction = direction(dir)
                    .ok_or_else(|| self.malformed(node, "port", format!("bad direction {dir}")))?;
                Ok(Item::Port(Port {
                    point: *p,
                    direction,
                    label_outer: outer.clone(),
                    label_inner: inner.clone(),
                    stub: *stub,
                }))
            }
            _ => Err(self.malformed(
                node,
                "port",
                "expected (pt) (direction) (text) (text) (line)",
            )),
        }
    }

    fn junction(&self, node: &Node, rest: &[Node]) -> Result<Item, ParseError> {
        let items = self.items(rest)?;
        match items.as_slice() {
            [Item::Point(p)] => Ok(Item::Junction(Junction { point: *p })),
            _ => Err(self.malformed(node, "junction", "expected exactly one point")),
        }
    }

    fn connector(&self, node: &Node, rest: &[Node]) -> Result<Item, ParseError> {
        let mut points = Vec::new();
        let mut label = None;
        let mut is_bus = false;
        for item in self.items(rest)? {
            match item {
                Item::Point(p) => points.push(p),
                Item::Text(t) => {
                    if label.replace(t).is_some() {
                        return Err(self.malformed(node, "connector", "duplicate label"));
                    }
                }
                Item::Flag(f) => is_bus = is_bus || f == "bus",
                other => {
                    return Err(self.malformed(
                        node,
                        "connector",
                        format!("unexpected {} in connector", other.kind_name()),
                    ));
                }
            }
        }
        let [p1, p2] = points.as_slice() else {
            return Err(self.malformed(node, "connector", "expected exactly 2 points"));
        };
        Ok(Item::Connector(Connector {
            p1: *p1,
            p2: *p2,
            label,
            is_bus,
        }))
    }

    fn symbol(&self, node: &Node, rest: &[Node]) -> Result<Item, ParseError> {
        let mut texts = Vec::new();
        let mut bounds = None;
        let mut ports = Vec::new();
        let mut drawing = None;
        let mut mirror = Mirror::None;
        let mut rotation = Rotation::R0;
        for item in self.items(rest)? {
            match item {
                Item::Text(t) => texts.push(t),
                Item::Bounds(b) => {
                    if bounds.replace(b).is_some() {
                        return Err(self.malformed(node, "symbol", "duplicate rect"));
                    }
                }
                Item::Port(p) => ports.push(p),
                Item::Drawing(d) => {
                    if drawing.replace(d).is_some() {
                        return Err(self.malformed(node, "symbol", "duplicate drawing"));
                    }
                }
                Item::Flag(f) => match orientation_flag(&f) {
                    Some((m, r)) => {
                        mirror = m;
                        rotation = r;
                    }
                    None => {
                        return Err(ParseError::UnknownFlag {
                            flag: f,
                            kind: "symbol",
                            src: self.ctx.named_source(),
                            span: (node.start, node.len).into(),
                        });
                    }
                },
                other => {
                    return Err(self.malformed(
                        node,
                        "symbol",
                        format!("unexpected {} in symbol", other.kind_name()),
                    ));
                }
            }
        }
        let [type_label, name_label] = texts.as_slice() else {
            return Err(self.malformed(node, "symbol", "expected exactly 2 texts"));
        };
        Ok(Item::Symbol(Symbol {
            bounds: bounds.ok_or_else(|| self.malformed(node, "symbol", "missing rect"))?,
            ports,
            type_label: type_label.clone(),
            name_label: name_label.clone(),
            drawing: drawing.ok_or_else(|| self.malformed(node, "symbol", "missing drawing"))?,
            mirror,
            rotation,
        }))
    }

    fn pin(&self, node: &Node, rest: &[Node]) -> Result<Item, ParseError> {
        let mut texts = Vec::new();
        let mut bounds = None;
        let mut point = None;
        let mut drawing = None;
        let mut dir = None;
        let mut mirror = Mirror::None;
        let mut rotation = Rotation::R0;
        for item in self.items(rest)? {
            match item {
                Item::Text(t) => texts.push(t),
                Item::Bounds(b) => {
                    if bounds.replace(b).is_some() {
                        return Err(self.malformed(node, "pin", "duplicate rect"));
                    }
                }
                Item::Point(p) => {
                    if point.replace(p).is_some() {
                        return Err(self.malformed(node, "pin", "duplicate pt"));
                    }
                }
                Item::Drawing(d) => {
                    if drawing.replace(d).is_some() {
                        return Err(self.malformed(node, "pin", "duplicate drawing"));
                    }
                }
                Item::Annotation => {}
                Item::Flag(f) => {
                    if let Some(d) = direction(&f) {
                        if dir.replace(d).is_some() {
                            return Err(self.malformed(node, "pin", "duplicate direction"));
                        }
                    } else if let Some((m, r)) = orientation_flag(&f) {
                        mirror = m;
                        rotation = r;
                    } else {
                        return Err(ParseError::UnknownFlag {
                            flag: f,
                            kind: "pin",
                            src: self.ctx.named_source(),
                            span: (node.start, node.len).into(),
                        });
                    }
                }
                other => {
                    return Err(self.malformed(
                        node,
                        "pin",
                        format!("unexpected {} in pin", other.kind_name()),
                    ));
                }
            }
        }
        if texts.len() < 2 || texts.len() > 3 {
            return Err(self.malformed(node, "pin", "expected 2 or 3 texts"));
        }
        let level = if texts.len() == 3 { texts.pop() } else { None };
        let name_label = texts.pop().expect("length checked above");
        let type_label = texts.pop().expect("length checked above");
        Ok(Item::Pin(Pin {
            bounds: bounds.ok_or_else(|| self.malformed(node, "pin", "missing rect"))?,
            direction: dir,
            point: point.ok_or_else(|| self.malformed(node, "pin", "missing pt"))?,
            type_label,
            name_label,
            level,
            drawing: drawing.ok_or_else(|| self.malformed(node, "pin", "missing drawing"))?,
            mirror,
            rotation,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "(header \"graphic\" (version \"1.3\"))\n";

    fn text_block(content: &str) -> String {
        format!("(text \"{content}\" (rect 0 0 40 12) (font \"Arial\"))")
    }

    #[test]
    fn parse_empty_document() {
        let schematic = parse_bdf(HEADER).unwrap();
        assert!(schematic.objects.is_empty());
    }

    #[test]
    fn header_is_mandatory() {
        assert!(matches!(
            parse_bdf("(junction (pt 1 2))"),
            Err(ParseError::MissingHeader)
        ));
        assert!(matches!(parse_bdf(""), Err(ParseError::MissingHeader)));
    }

    #[test]
    fn unsupported_version_is_rejected() {
        let err = parse_bdf("(header \"graphic\" (version \"2.0\"))").unwrap_err();
        assert!(matches!(err, ParseError::UnsupportedVersion { .. }));
    }

    #[test]
    fn symbol_header_is_accepted() {
        assert!(parse_bdf("(header \"symbol\" (version \"1.1\"))").is_ok());
    }

    #[test]
    fn leading_comments_are_stripped() {
        let input = format!("/* exported */\n// tool comment\n{HEADER}(junction (pt 8 16))");
        let schematic = parse_bdf(&input).unwrap();
        assert_eq!(
            schematic.objects,
            vec![SchematicObject::Junction(Junction {
                point: Point::new(8, 16)
            })]
        );
    }

    #[test]
    fn parse_connector_with_bus_and_label() {
        let input = format!(
            "{HEADER}(connector (pt 0 0) (pt 64 0) {} (bus))",
            text_block("data[7..0]")
        );
        let schematic = parse_bdf(&input).unwrap();
        let SchematicObject::Connector(c) = &schematic.objects[0] else {
            panic!("expected connector, got {:?}", schematic.objects[0]);
        };
        assert!(c.is_bus);
        assert_eq!(c.label.as_ref().unwrap().text, "data[7..0]");
        assert_eq!(c.p2, Point::new(64, 0));
    }

    #[test]
    fn parse_pin_with_direction_and_orientation() {
        let input = format!(
            "{HEADER}(pin (output) (flipx_rotate180) (rect 0 0 130 16) (pt 0 8) \
             {} {} (drawing (line (pt 0 0) (pt 1 1) (line_width 1))))",
            text_block("OUTPUT"),
            text_block("result")
        );
        let schematic = parse_bdf(&input).unwrap();
        let SchematicObject::Pin(pin) = &schematic.objects[0] else {
            panic!("expected pin");
        };
        assert_eq!(pin.direction, Some(Direction::Output));
        assert_eq!(pin.mirror, Mirror::X);
        assert_eq!(pin.rotation, Rotation::R180);
        assert_eq!(pin.name_label.text, "result");
        assert_eq!(pin.type_label.text, "OUTPUT");
        assert!(pin.level.is_none());
    }

    #[test]
    fn pin_third_text_is_level() {
        let input = format!(
            "{HEADER}(pin (input) (rect 0 0 130 16) (pt 120 8) {} {} {} \
             (drawing (rectangle (rect 0 0 10 10))))",
            text_block("INPUT"),
            text_block("clk"),
            text_block("VCC")
        );
        let schematic = parse_bdf(&input).unwrap();
        let SchematicObject::Pin(pin) = &schematic.objects[0] else {
            panic!("expected pin");
        };
        assert_eq!(pin.level.as_ref().unwrap().text, "VCC");
        assert_eq!(pin.name_label.text, "clk");
    }

    #[test]
    fn unknown_pin_flag_is_rejected() {
        let input = format!(
            "{HEADER}(pin (sideways) (rect 0 0 1 1) (pt 0 0) {} {} (drawing))",
            text_block("INPUT"),
            text_block("x")
        );
        assert!(matches!(
            parse_bdf(&input),
            Err(ParseError::UnknownFlag { kind: "pin", .. })
        ));
    }

    #[test]
    fn parse_symbol_with_port() {
        let input = format!(
            "{HEADER}(symbol (rect 10 20 110 60) {} {} \
             (port (pt 0 8) (input) {} {} (line (pt 0 8) (pt 16 8) (line_width 1))) \
             (drawing (rectangle (rect 16 0 84 40))))",
            text_block("counter"),
            text_block("inst1"),
            text_block("clock"),
            text_block("clock")
        );
        let schematic = parse_bdf(&input).unwrap();
        let SchematicObject::Symbol(sym) = &schematic.objects[0] else {
            panic!("expected symbol");
        };
        assert_eq!(sym.ports.len(), 1);
        assert_eq!(sym.ports[0].direction, Direction::Input);
        assert_eq!(sym.ports[0].stub.p2, Point::new(16, 8));
        assert!(!sym.is_primitive());
    }

    #[test]
    fn rect_arity_is_enforced() {
        let input = format!("{HEADER}(junction (pt 1 2 3))");
        assert!(matches!(
            parse_bdf(&input),
            Err(ParseError::MalformedObject { kind: "pt", .. })
        ));
    }

    #[test]
    fn text_flags_and_escapes() {
        let input = format!(
            "{HEADER}(text \"a \\\"quoted\\\" thing\" (rect 0 0 9 9) \
             (font \"Courier\" (font_size 8) (bold)) (vertical) (invisible))"
        );
        let schematic = parse_bdf(&input).unwrap();
        let SchematicObject::Text(t) = &schematic.objects[0] else {
            panic!("expected text");
        };
        assert_eq!(t.text, "a \"quoted\" thing");
        assert!(t.vertical && t.invisible && t.font.bold);
        assert_eq!(t.font.size, Some(8));
    }

    #[test]
    fn graphic_object_at_top_level_is_rejected() {
        let input = format!("{HEADER}(rectangle (rect 0 0 4 4))");
        assert!(matches!(
            parse_bdf(&input),
            Err(ParseError::NotTopLevel { .. })
        ));
    }

    #[test]
    fn unknown_block_with_payload_is_rejected() {
        let input = format!("{HEADER}(wormhole (pt 0 0))");
        assert!(matches!(
            parse_bdf(&input),
            Err(ParseError::UnknownObject { .. })
        ));
    }
}
