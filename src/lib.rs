//! schemtikz converts Quartus Block Design Files (BDF) into TikZ statement
//! streams for inclusion in LaTeX documents.
//!
//! The pipeline has two stages: [`parse::parse_bdf`] turns BDF source into a
//! validated [`types::Schematic`] (this is the only stage that can fail),
//! and [`render::render_schematic`] turns the schematic into TikZ, collecting
//! non-fatal [`render::Warning`]s along the way.
//!
//! ```no_run
//! use schemtikz::{bdf_to_tikz, RenderOptions};
//!
//! # fn main() -> miette::Result<()> {
//! let source = std::fs::read_to_string("counter.bdf").expect("readable file");
//! let rendered = bdf_to_tikz(&source, "counter.bdf", &RenderOptions::default())?;
//! print!("{}", rendered.tikz);
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod log;
pub mod names;
pub mod parse;
pub mod render;
pub mod types;

pub use errors::{NameError, ParseError};
pub use parse::{parse_bdf, parse_bdf_named};
pub use render::{render_schematic, RenderOptions, Rendered, Warning};

/// Parse and render in one step.
pub fn bdf_to_tikz(
    source: &str,
    name: &str,
    options: &RenderOptions,
) -> Result<Rendered, miette::Report> {
    let schematic = parse_bdf_named(source, name)?;
    Ok(render_schematic(&schematic, options))
}
