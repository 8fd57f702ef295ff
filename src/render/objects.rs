//! Per-kind rendering of schematic objects.
//!
//! Pins, symbols and connectors emit their decorative statements immediately
//! and register wire segments with the merger; junction markers and
//! connector labels go to the tail so they draw on top of the merged runs.

use glam::DVec2;

use crate::names::{parse_node_name, type_width};
use crate::types::*;

use super::anchor::{
    calculate_anchor_point, calculate_optimal_anchor_to_line, snap_port_name, Anchor, RectF,
};
use super::context::RenderContext;
use super::geometry::{point_transform, transform_text_anchor};
use super::merge::{Run, Segment, Vertex};
use super::tikz::{escape_latex, render_components, Emitter};
use super::Warning;

/// Shared text-statement routine. `content` overrides the escaped text (for
/// labels rendered through the node-name macros) and `bounds` overrides the
/// label's own box (for snapped port names).
pub(super) fn render_text(
    em: &Emitter,
    text: &Text,
    style: &[&str],
    anchor: Anchor,
    content: Option<&str>,
    bounds: Option<RectF>,
) -> String {
    let bounds = bounds.unwrap_or_else(|| RectF::from(&text.bounds));
    let point = calculate_anchor_point(&bounds, text.vertical, anchor);

    let mut node_args: Vec<String> = Vec::new();
    if anchor != Anchor::Center {
        node_args.push(format!("anchor={anchor}"));
    }
    if text.vertical {
        node_args.push("rotate=90".into());
    }

    let mut body = match content {
        Some(c) => c.to_string(),
        None => escape_latex(&text.text),
    };
    if text.font.bold {
        body = format!("\\textsf{{{body}}}");
    }

    let content = format!("{} node[{}] {{{}}}", em.point(point), node_args.join(", "), body);
    em.statement(style, &content)
}

/// One statement per graphic shape, in the object's local frame. Carried
/// line widths are not rendered; stroke styling belongs to the style token.
pub(super) fn render_graphic_object(em: &Emitter, object: &GraphicObject, style: &[&str]) -> String {
    match object {
        GraphicObject::Text(text) => render_text(em, text, style, Anchor::Center, None, None),

        GraphicObject::Line(line) => {
            let content = format!(
                "{} -- {}",
                em.point(DVec2::new(line.p1.x as f64, line.p1.y as f64)),
                em.point(DVec2::new(line.p2.x as f64, line.p2.y as f64))
            );
            em.statement(style, &content)
        }

        GraphicObject::Arc(arc) => {
            let b = &arc.bounds;
            let center = DVec2::new((b.x1 + b.x2) as f64 / 2.0, (b.y1 + b.y2) as f64 / 2.0);
            let radius = DVec2::new(
                (b.x1 - b.x2).abs() as f64 / 2.0,
                (b.y1 - b.y2).abs() as f64 / 2.0,
            );
            // unit-circle direction of each endpoint, Y flipped to math
            // convention for the angle computation
            let dir = |p: Point| {
                DVec2::new(
                    (p.x as f64 - center.x) / radius.x,
                    -((p.y as f64 - center.y) / radius.y),
                )
            };
            let d1 = dir(arc.p1);
            let d2 = dir(arc.p2);
            let angle1 = d1.y.atan2(d1.x).to_degrees();
            let angle2 = d2.y.atan2(d2.x).to_degrees();
            // project the endpoints back onto the ellipse so the arc meets
            // them exactly even if the input was slightly off
            let on_ellipse = |d: DVec2| {
                let n = d / d.length();
                DVec2::new(n.x * radius.x + center.x, -n.y * radius.y + center.y)
            };
            let content = format!(
                "{} arc[x radius={}, y radius={}, start angle={angle1:.1}, end angle={angle2:.1}]",
                em.point(on_ellipse(d1)),
                em.length(radius.x),
                em.length(radius.y),
            );
            em.statement(style, &content)
        }

        GraphicObject::Rectangle(rect) => {
            let b = &rect.bounds;
            let content = format!(
                "{} rectangle {}",
                em.point(DVec2::new(b.x1 as f64, b.y1 as f64)),
                em.point(DVec2::new(b.x2 as f64, b.y2 as f64))
            );
            em.statement(style, &content)
        }

        GraphicObject::Circle(circle) => {
            let b = &circle.bounds;
            let center = DVec2::new((b.x1 + b.x2) as f64 / 2.0, (b.y1 + b.y2) as f64 / 2.0);
            let radius = DVec2::new(
                (b.x1 - b.x2).abs() as f64 / 2.0,
                (b.y1 - b.y2).abs() as f64 / 2.0,
            );
            let content = format!(
                "{} circle[x radius={}, y radius={}]",
                em.point(center),
                em.length(radius.x),
                em.length(radius.y),
            );
            em.statement(style, &content)
        }
    }
}

/// Fixed drawing template for one pin direction: connection point, label
/// point and anchor, housing polygon.
struct PinTemplate {
    connection: DVec2,
    text_point: DVec2,
    text_anchor: Anchor,
    housing: [DVec2; 5],
}

fn pin_template(direction: Direction) -> Option<PinTemplate> {
    match direction {
        Direction::Output => Some(PinTemplate {
            connection: DVec2::new(52.0, 8.0),
            text_point: DVec2::new(82.0, 8.0),
            text_anchor: Anchor::West,
            housing: [
                DVec2::new(52.0, 4.0),
                DVec2::new(78.0, 4.0),
                DVec2::new(82.0, 8.0),
                DVec2::new(78.0, 12.0),
                DVec2::new(52.0, 12.0),
            ],
        }),
        Direction::Input => Some(PinTemplate {
            connection: DVec2::new(120.5, 8.0),
            text_point: DVec2::new(92.0, 8.0),
            text_anchor: Anchor::East,
            housing: [
                DVec2::new(92.0, 12.0),
                DVec2::new(117.0, 12.0),
                DVec2::new(121.0, 8.0),
                DVec2::new(117.0, 4.0),
                DVec2::new(92.0, 4.0),
            ],
        }),
        Direction::Bidir => None,
    }
}

pub(super) fn render_pin(ctx: &mut RenderContext, pin: &Pin) {
    let name = &pin.name_label.text;
    let template = pin.direction.and_then(|d| pin_template(d).map(|t| (d, t)));
    let Some((direction, template)) = template else {
        ctx.warn(Warning::UnknownPinDirection {
            name: name.clone(),
            direction: pin.direction,
        });
        return;
    };

    let em = ctx.local_emitter(&pin.bounds);
    let transform = point_transform(pin.mirror, pin.rotation, &pin.bounds);
    let connection = transform(template.connection);
    let text_point = transform(template.text_point);
    let housing: Vec<DVec2> = template.housing.iter().map(|&p| transform(p)).collect();
    let text_anchor = transform_text_anchor(pin.mirror, pin.rotation, template.text_anchor);

    if ctx.opts.render_pin_bounds {
        let (w, h) = pin.bounds.size();
        let content = format!(
            "{} rectangle {}",
            em.point(DVec2::ZERO),
            em.point(DVec2::new(w as f64, h as f64))
        );
        let statement = em.statement(&["pin bounds"], &content);
        ctx.out.push_str(&statement);
    }

    // wire segment in global coordinates
    let parsed = parse_node_name(name);
    if parsed.is_err() {
        ctx.warn(Warning::UnparsableLabel { label: name.clone() });
    }
    let entry = Vertex::new(
        (pin.point.x + pin.bounds.x1) as f64,
        (pin.point.y + pin.bounds.y1) as f64,
    );
    let conn = Vertex::new(
        connection.x + pin.bounds.x1 as f64,
        connection.y + pin.bounds.y1 as f64,
    );
    ctx.segments.push(Segment {
        a: entry,
        b: conn,
        width: parsed.as_ref().ok().map(|c| type_width(c)),
        arrow: false,
        output_forbidden: true,
        // an input pin drives its net
        has_output: direction == Direction::Input,
    });

    let housing: Vec<String> = housing.iter().map(|&p| em.point(p)).collect();
    let content = format!("{} -- cycle", housing.join(" -- "));
    let style = format!("{direction} pin");
    let statement = em.statement(&[style.as_str()], &content);
    ctx.out.push_str(&statement);

    let label = match &parsed {
        Ok(components) => render_components(components),
        Err(_) => escape_latex(name),
    };
    let content = format!(
        "{} node[anchor={text_anchor}] {{{label}}}",
        em.point(text_point)
    );
    let statement = em.statement(&["pin name"], &content);
    ctx.out.push_str(&statement);
}

/// The stub endpoint that is not the port's attachment point.
fn stub_inner(port: &Port) -> Option<Point> {
    if port.stub.p1 == port.point {
        Some(port.stub.p2)
    } else if port.stub.p2 == port.point {
        Some(port.stub.p1)
    } else {
        None
    }
}

pub(super) fn render_symbol(ctx: &mut RenderContext, symbol: &Symbol) {
    let em = ctx.local_emitter(&symbol.bounds);
    let primitive = symbol.is_primitive();

    let draw_bounds = if primitive {
        ctx.opts.render_primitive_bounds
    } else {
        ctx.opts.render_symbol_bounds
    };
    if draw_bounds {
        let (w, h) = symbol.bounds.size();
        let content = format!(
            "{} rectangle {}",
            em.point(DVec2::ZERO),
            em.point(DVec2::new(w as f64, h as f64))
        );
        let statement = em.statement(&["symbol bounds"], &content);
        ctx.out.push_str(&statement);
    }

    // primitives hide their type except for power symbols
    if (!primitive || symbol.type_label.text == "VCC") && !symbol.type_label.invisible {
        let statement = render_text(
            &em,
            &symbol.type_label,
            &["symbol type"],
            Anchor::Center,
            None,
            None,
        );
        ctx.out.push_str(&statement);
    }

    let shape_style = if primitive { "primitive" } else { "symbol" };
    for object in &symbol.drawing {
        if let GraphicObject::Text(text) = object {
            if text.invisible {
                continue;
            }
        }
        let statement = render_graphic_object(&em, object, &[shape_style]);
        ctx.out.push_str(&statement);
    }

    for port in &symbol.ports {
        if port.label_outer.text != port.label_inner.text {
            ctx.warn(Warning::PortLabelMismatch {
                symbol: symbol.name_label.text.clone(),
                outer: port.label_outer.text.clone(),
                inner: port.label_inner.text.clone(),
            });
        }
        let label = &port.label_inner;

        let Some(inner) = stub_inner(port) else {
            ctx.warn(Warning::DetachedPortStub {
                symbol: symbol.name_label.text.clone(),
                port: label.text.clone(),
            });
            continue;
        };

        let needs_name = !label.invisible || !primitive;
        let parsed = if needs_name {
            let parsed = parse_node_name(&label.text);
            if parsed.is_err() {
                ctx.warn(Warning::UnparsableLabel {
                    label: label.text.clone(),
                });
            }
            parsed.ok()
        } else {
            None
        };

        if !label.invisible {
            let content = match &parsed {
                Some(components) => render_components(components),
                None => escape_latex(&label.text),
            };
            let (anchor, snapped) = match snap_port_name(port, inner, ctx.opts) {
                Some((anchor, bounds)) => (anchor, Some(bounds)),
                None if ctx.opts.anchor_ports => {
                    let anchor = calculate_optimal_anchor_to_line(
                        &RectF::from(&label.bounds),
                        label.vertical,
                        DVec2::new(port.stub.p1.x as f64, port.stub.p1.y as f64),
                        DVec2::new(port.stub.p2.x as f64, port.stub.p2.y as f64),
                    );
                    (anchor, None)
                }
                None => (Anchor::Center, None),
            };
            let statement = render_text(&em, label, &["port name"], anchor, Some(&content), snapped);
            ctx.out.push_str(&statement);
        }

        // wire segment in global coordinates
        let a = Vertex::new(
            (port.point.x + symbol.bounds.x1) as f64,
            (port.point.y + symbol.bounds.y1) as f64,
        );
        let b = Vertex::new(
            (inner.x + symbol.bounds.x1) as f64,
            (inner.y + symbol.bounds.y1) as f64,
        );
        let width = if primitive {
            None
        } else {
            parsed.as_deref().map(type_width)
        };
        let can_have_arrow = ctx.opts.port_arrows_if_invisible || !label.invisible;
        let arrow =
            port.direction == Direction::Input && ctx.opts.port_input_arrows && can_have_arrow;
        ctx.segments.push(Segment {
            a,
            b,
            width,
            arrow,
            output_forbidden: true,
            has_output: port.direction == Direction::Output,
        });
    }
}

pub(super) fn render_connector(ctx: &mut RenderContext, connector: &Connector) {
    let mut width = None;
    let mut content = None;
    if let Some(label) = &connector.label {
        match parse_node_name(&label.text) {
            Ok(components) => {
                width = Some(type_width(&components));
                content = Some(render_components(&components));
            }
            Err(_) => {
                // unnamed nets carry a <<...>> placeholder label
                let t = &label.text;
                if !(t.starts_with("<<") && t.ends_with(">>")) {
                    ctx.warn(Warning::UnparsableLabel { label: t.clone() });
                }
            }
        }
    }

    let p1 = DVec2::new(connector.p1.x as f64, connector.p1.y as f64);
    let p2 = DVec2::new(connector.p2.x as f64, connector.p2.y as f64);
    ctx.segments.push(Segment {
        a: Vertex::new(p1.x, p1.y),
        b: Vertex::new(p2.x, p2.y),
        width,
        arrow: false,
        output_forbidden: false,
        has_output: false,
    });

    if let (Some(label), Some(content)) = (&connector.label, content) {
        let anchor = if ctx.opts.anchor_labels {
            calculate_optimal_anchor_to_line(&RectF::from(&label.bounds), label.vertical, p1, p2)
        } else {
            Anchor::Center
        };
        let em = ctx.emitter();
        let statement = render_text(&em, label, &["line name"], anchor, Some(&content), None);
        ctx.tail.push_str(&statement);
    }
}

pub(super) fn render_junction(ctx: &mut RenderContext, junction: &Junction) {
    let em = ctx.emitter();
    let content = format!(
        "{} node[contact] {{}}",
        em.point(DVec2::new(junction.point.x as f64, junction.point.y as f64))
    );
    let statement = em.statement(&["junction"], &content);
    ctx.tail.push_str(&statement);
}

/// One statement per merged run, with width-derived style and arrowheads.
pub(super) fn render_run(ctx: &mut RenderContext, run: &Run) {
    let width = match run.width.get() {
        Some(w) => w,
        None => {
            let first = run.points[0];
            ctx.warn(Warning::UnresolvedRunWidth {
                x: first.x,
                y: first.y,
            });
            1
        }
    };

    let em = ctx.emitter();
    let points: Vec<String> = run
        .points
        .iter()
        .map(|v| em.point(DVec2::new(v.x, v.y)))
        .collect();
    let content = points.join(" -- ");

    let mut arrow = run.arrow;
    if run.has_output.get() && ctx.opts.connector_output_arrows {
        arrow[0] = arrow[0] || !run.output_forbidden[0];
        arrow[1] = arrow[1] || !run.output_forbidden[1];
    }

    let line_style = if width == 1 { "node line" } else { "bus line" };
    let mut style = vec![line_style];
    let spec;
    if arrow != [false, false] {
        spec = format!(
            "{}-{}",
            if arrow[0] { "<" } else { "" },
            if arrow[1] { ">" } else { "" }
        );
        style.push(&spec);
    }
    let statement = em.statement(&style, &content);
    ctx.out.push_str(&statement);
}
