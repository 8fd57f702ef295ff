//! The rendering engine: schematic in, TikZ statement stream out.
//!
//! Rendering never fails. Anything that would have been an error in the
//! input (unknown pin directions, mismatched labels, width conflicts) is
//! downgraded to a [`Warning`] collected on the returned [`Rendered`], and
//! the offending piece is skipped or defaulted.

pub mod anchor;
mod context;
pub mod geometry;
pub mod merge;
mod objects;
pub mod tikz;

use glam::DVec2;
use thiserror::Error;

use crate::log;
use crate::types::{Direction, Schematic, SchematicObject};

use context::RenderContext;

/// Configuration for one rendering pass. Defaults reproduce the standard
/// Quartus look at a scale where 42 schematic units map to one TikZ unit.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// TikZ units per schematic unit.
    pub scale: f64,
    /// Added to every coordinate before scaling.
    pub offset: DVec2,
    /// Style tokens prepended to every statement.
    pub extra_args: Vec<String>,
    /// Place port names with the optimal-anchor heuristic.
    pub anchor_ports: bool,
    /// Place connector labels with the optimal-anchor heuristic.
    pub anchor_labels: bool,
    /// Snap tolerance along the stub (tangential).
    pub port_name_t_snap: i32,
    /// Snap tolerance across the stub (normal).
    pub port_name_n_snap: i32,
    /// Distance a snapped name sits from the stub end; `None` disables
    /// snapping entirely.
    pub port_name_n_distance: Option<i32>,
    pub render_pin_bounds: bool,
    pub render_symbol_bounds: bool,
    pub render_primitive_bounds: bool,
    /// Draw an arrowhead into every input port.
    pub port_input_arrows: bool,
    /// Allow port arrows even when the port label is invisible.
    pub port_arrows_if_invisible: bool,
    /// Draw arrowheads out of nets that carry an output.
    pub connector_output_arrows: bool,
}

impl Default for RenderOptions {
    fn default() -> RenderOptions {
        RenderOptions {
            scale: 1.0 / 42.0,
            offset: DVec2::ZERO,
            extra_args: Vec::new(),
            anchor_ports: true,
            anchor_labels: true,
            port_name_t_snap: 8,
            port_name_n_snap: 12,
            port_name_n_distance: Some(4),
            render_pin_bounds: false,
            render_symbol_bounds: true,
            render_primitive_bounds: false,
            port_input_arrows: true,
            port_arrows_if_invisible: false,
            connector_output_arrows: true,
        }
    }
}

/// A recoverable rendering problem. The engine skips or defaults the
/// offending piece and keeps going.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Warning {
    #[error("pin `{name}`: no drawing template for direction {direction:?}")]
    UnknownPinDirection {
        name: String,
        direction: Option<Direction>,
    },

    #[error("port on symbol `{symbol}` has different labels `{outer}` and `{inner}`, using the inner one")]
    PortLabelMismatch {
        symbol: String,
        outer: String,
        inner: String,
    },

    #[error("inconsistent widths at ({x}, {y}): {existing} vs {new}, keeping the larger")]
    WidthConflict {
        x: f64,
        y: f64,
        existing: u32,
        new: u32,
    },

    #[error("cannot parse signal name `{label}`, ignoring")]
    UnparsableLabel { label: String },

    #[error("no width resolved for the run at ({x}, {y}), defaulting to a single node line")]
    UnresolvedRunWidth { x: f64, y: f64 },

    #[error("port `{port}` on symbol `{symbol}` has a stub detached from its attachment point")]
    DetachedPortStub { symbol: String, port: String },
}

/// Output of one rendering pass.
#[derive(Debug, Clone)]
pub struct Rendered {
    /// TikZ statement stream, one `\draw` per line.
    pub tikz: String,
    pub warnings: Vec<Warning>,
}

/// Renders a schematic in one deterministic pass: decorative statements per
/// object first, then the merged wire runs, then junction markers and
/// connector labels.
pub fn render_schematic(schematic: &Schematic, opts: &RenderOptions) -> Rendered {
    let mut ctx = RenderContext::new(opts);

    for object in &schematic.objects {
        match object {
            SchematicObject::Pin(pin) => {
                let comment = ctx.emitter().comment(&format!(
                    "Pin ({}) named {}",
                    pin.type_label.text, pin.name_label.text
                ));
                ctx.out.push_str(&comment);
                objects::render_pin(&mut ctx, pin);
                ctx.out.push('\n');
            }
            SchematicObject::Symbol(symbol) => {
                let comment = ctx.emitter().comment(&format!(
                    "Symbol ({}) named {}",
                    symbol.type_label.text, symbol.name_label.text
                ));
                ctx.out.push_str(&comment);
                objects::render_symbol(&mut ctx, symbol);
                ctx.out.push('\n');
            }
            SchematicObject::Text(text) => {
                let statement = objects::render_text(
                    &ctx.emitter(),
                    text,
                    &[],
                    anchor::Anchor::Center,
                    None,
                    None,
                );
                ctx.out.push_str(&statement);
                ctx.out.push('\n');
            }
            SchematicObject::Junction(junction) => objects::render_junction(&mut ctx, junction),
            SchematicObject::Connector(connector) => {
                objects::render_connector(&mut ctx, connector)
            }
        }
    }

    let segments = std::mem::take(&mut ctx.segments);
    log::debug!("merging {} wire segments", segments.len());
    let runs = merge::merge_segments(segments, &mut ctx.warnings);
    log::debug!("merged into {} runs", runs.len());
    for run in &runs {
        objects::render_run(&mut ctx, run);
    }

    let tail = std::mem::take(&mut ctx.tail);
    ctx.out.push_str(&tail);

    Rendered {
        tikz: ctx.out,
        warnings: ctx.warnings,
    }
}
