use std::fs;
use std::path::PathBuf;

use clap::Parser;
use glam::DVec2;
use miette::{IntoDiagnostic, Result, WrapErr};

use schemtikz::{bdf_to_tikz, RenderOptions};

/// Convert Quartus Block Design Files (.bdf) to TikZ.
#[derive(Parser, Debug)]
#[command(name = "schemtikz", version, about)]
struct Args {
    /// Input .bdf file
    input: PathBuf,

    /// Output file (stdout if omitted)
    output: Option<PathBuf>,

    /// TikZ units per schematic unit
    #[arg(long, default_value_t = 1.0 / 42.0)]
    scale: f64,

    /// Offset added to every X coordinate, in schematic units
    #[arg(long, default_value_t = 0.0)]
    offset_x: f64,

    /// Offset added to every Y coordinate, in schematic units
    #[arg(long, default_value_t = 0.0)]
    offset_y: f64,

    /// Extra style tokens prepended to every statement (repeatable)
    #[arg(long = "extra-arg", value_name = "STYLE")]
    extra_args: Vec<String>,

    /// Draw pin bounds rectangles
    #[arg(long)]
    pin_bounds: bool,

    /// Skip symbol bounds rectangles
    #[arg(long)]
    no_symbol_bounds: bool,

    /// Draw bounds rectangles around primitives
    #[arg(long)]
    primitive_bounds: bool,

    /// Place port names centered instead of optimally anchored
    #[arg(long)]
    no_anchor_ports: bool,

    /// Place connector labels centered instead of optimally anchored
    #[arg(long)]
    no_anchor_labels: bool,

    /// Disable snapping port names against their stubs
    #[arg(long)]
    no_snap: bool,

    /// Disable arrowheads into input ports
    #[arg(long)]
    no_input_arrows: bool,

    /// Disable arrowheads on output-carrying nets
    #[arg(long)]
    no_output_arrows: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let source = fs::read_to_string(&args.input)
        .into_diagnostic()
        .wrap_err_with(|| format!("reading {}", args.input.display()))?;

    let options = RenderOptions {
        scale: args.scale,
        offset: DVec2::new(args.offset_x, args.offset_y),
        extra_args: args.extra_args,
        anchor_ports: !args.no_anchor_ports,
        anchor_labels: !args.no_anchor_labels,
        port_name_n_distance: if args.no_snap {
            None
        } else {
            RenderOptions::default().port_name_n_distance
        },
        render_pin_bounds: args.pin_bounds,
        render_symbol_bounds: !args.no_symbol_bounds,
        render_primitive_bounds: args.primitive_bounds,
        port_input_arrows: !args.no_input_arrows,
        connector_output_arrows: !args.no_output_arrows,
        ..RenderOptions::default()
    };

    let name = args.input.display().to_string();
    let rendered = bdf_to_tikz(&source, &name, &options)?;

    for warning in &rendered.warnings {
        eprintln!("warning: {warning}");
    }

    match &args.output {
        Some(path) => fs::write(path, rendered.tikz)
            .into_diagnostic()
            .wrap_err_with(|| format!("writing {}", path.display()))?,
        None => print!("{}", rendered.tikz),
    }
    Ok(())
}
