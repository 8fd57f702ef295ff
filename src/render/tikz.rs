//! TikZ statement emission.
//!
//! The emitter owns the coordinate mapping: schematic points are shifted by
//! the configured offset, Y is negated (schematic Y grows down, TikZ Y grows
//! up), and everything is scaled and printed with fixed 4-decimal precision.

use glam::DVec2;

use crate::errors::NameError;
use crate::names::{parse_node_name, NameComponent, Subscript};

use super::RenderOptions;

/// Formats coordinates and assembles `\draw` statements. Cheap to copy into
/// an object's local frame with [`Emitter::advanced`].
pub struct Emitter<'a> {
    opts: &'a RenderOptions,
    offset: DVec2,
}

impl<'a> Emitter<'a> {
    pub fn new(opts: &'a RenderOptions) -> Emitter<'a> {
        Emitter {
            opts,
            offset: opts.offset,
        }
    }

    /// An emitter whose offset is advanced into a local frame.
    pub fn advanced(&self, by: DVec2) -> Emitter<'a> {
        Emitter {
            opts: self.opts,
            offset: self.offset + by,
        }
    }

    pub fn length(&self, l: f64) -> String {
        let v = l * self.opts.scale;
        // normalize negative zero so (0, -0) never shows up in output
        let v = if v == 0.0 { 0.0 } else { v };
        format!("{v:.4}")
    }

    pub fn vector(&self, v: DVec2) -> String {
        format!("({},{})", self.length(v.x), self.length(-v.y))
    }

    pub fn point(&self, p: DVec2) -> String {
        self.vector(p + self.offset)
    }

    pub fn statement(&self, style: &[&str], content: &str) -> String {
        let args: Vec<&str> = self
            .opts
            .extra_args
            .iter()
            .map(String::as_str)
            .chain(style.iter().copied())
            .collect();
        format!("  \\draw[{}] {};\n", args.join(", "), content)
    }

    pub fn comment(&self, text: &str) -> String {
        format!("  % {text}\n")
    }
}

const REGULAR_ESCAPES: &str = "&%$#_{}";

/// Escapes LaTeX-significant characters in label text.
pub fn escape_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if REGULAR_ESCAPES.contains(c) {
            out.push('\\');
            out.push(c);
        } else {
            match c {
                '\\' => out.push_str("\\textbackslash"),
                '^' => out.push_str("\\textasciicircum"),
                '~' => out.push_str("\\textasciitilde"),
                _ => out.push(c),
            }
        }
    }
    out
}

/// Renders parsed signal-name components with the `\nodename*` macros,
/// wrapped in math mode.
pub fn render_components(components: &[NameComponent]) -> String {
    let rendered: Vec<String> = components
        .iter()
        .map(|c| {
            let name = escape_latex(&c.name);
            match c.subscript {
                None => format!("\\nodenamebit{{{name}}}"),
                Some(Subscript::Single(i)) => format!("\\nodenamesingle{{{name}}}{{{i}}}"),
                Some(Subscript::Range(a, b)) => {
                    format!("\\nodenamerange{{{name}}}{{{a}}}{{{b}}}")
                }
            }
        })
        .collect();
    format!("${}$", rendered.join(" "))
}

/// Parses and renders a signal name in one step.
pub fn render_node_name(name: &str) -> Result<String, NameError> {
    Ok(render_components(&parse_node_name(name)?))
}
