//! End-to-end tests: BDF source in, TikZ statement stream out.
//!
//! These run at scale 1.0 so every coordinate in the expected output can be
//! checked against the schematic by hand.

use schemtikz::{parse_bdf, render_schematic, RenderOptions, Warning};

fn options() -> RenderOptions {
    RenderOptions {
        scale: 1.0,
        ..RenderOptions::default()
    }
}

fn render(source: &str) -> schemtikz::Rendered {
    let schematic = parse_bdf(source).expect("test input parses");
    render_schematic(&schematic, &options())
}

const HEADER: &str = "(header \"graphic\" (version \"1.3\"))\n";

#[test]
fn output_pin_with_connector_and_junction() {
    // A pin housing, its label, the wire merged across pin stub and
    // connector, and the junction marker last.
    let source = format!(
        "{HEADER}\
         (pin (output) (rect 0 0 130 16) (pt 0 8)\
           (text \"OUTPUT\" (rect 0 0 40 10) (font \"Arial\"))\
           (text \"data\" (rect 0 0 30 10) (font \"Arial\"))\
           (drawing (line (pt 0 8) (pt 52 8) (line_width 1))))\
         (connector (pt 52 8) (pt 100 8))\
         (junction (pt 100 8))"
    );
    let rendered = render(&source);
    assert_eq!(
        rendered.tikz,
        concat!(
            "  % Pin (OUTPUT) named data\n",
            "  \\draw[output pin] (52.0000,-4.0000) -- (78.0000,-4.0000) -- (82.0000,-8.0000) -- (78.0000,-12.0000) -- (52.0000,-12.0000) -- cycle;\n",
            "  \\draw[pin name] (82.0000,-8.0000) node[anchor=west] {$\\nodenamebit{data}$};\n",
            "\n",
            "  \\draw[node line] (100.0000,-8.0000) -- (52.0000,-8.0000) -- (0.0000,-8.0000);\n",
            "  \\draw[junction] (100.0000,-8.0000) node[contact] {};\n",
        )
    );
    assert!(rendered.warnings.is_empty());
}

#[test]
fn input_pin_gets_output_arrow() {
    // An input pin drives its net, so the automatic output arrow points
    // away from the housing into the schematic.
    let source = format!(
        "{HEADER}\
         (pin (input) (rect 0 0 130 16) (pt 0 8)\
           (text \"INPUT\" (rect 0 0 40 10) (font \"Arial\"))\
           (text \"clk\" (rect 0 0 30 10) (font \"Arial\"))\
           (drawing (line (pt 52 8) (pt 120 8) (line_width 1))))"
    );
    let rendered = render(&source);
    assert_eq!(
        rendered.tikz,
        concat!(
            "  % Pin (INPUT) named clk\n",
            "  \\draw[input pin] (92.0000,-12.0000) -- (117.0000,-12.0000) -- (121.0000,-8.0000) -- (117.0000,-4.0000) -- (92.0000,-4.0000) -- cycle;\n",
            "  \\draw[pin name] (92.0000,-8.0000) node[anchor=east] {$\\nodenamebit{clk}$};\n",
            "\n",
            "  \\draw[node line, ->] (120.5000,-8.0000) -- (0.0000,-8.0000);\n",
        )
    );
    assert!(rendered.warnings.is_empty());
}

#[test]
fn bus_connector_renders_label_after_runs() {
    let source = format!(
        "{HEADER}\
         (connector (pt 0 0) (pt 64 0)\
           (text \"data[7..0]\" (rect 20 -12 44 -2) (font \"Arial\"))\
           (bus))"
    );
    let rendered = render(&source);
    assert_eq!(
        rendered.tikz,
        concat!(
            "  \\draw[bus line] (64.0000,0.0000) -- (0.0000,0.0000);\n",
            "  \\draw[line name] (32.0000,2.0000) node[anchor=south] {$\\nodenamerange{data}{7}{0}$};\n",
        )
    );
    assert!(rendered.warnings.is_empty());
}

#[test]
fn symbol_with_snapped_port_name() {
    let source = format!(
        "{HEADER}\
         (symbol (rect 10 20 110 60)\
           (text \"counter\" (rect 30 2 70 12) (font \"Arial\"))\
           (text \"inst1\" (rect 30 14 70 24) (font \"Arial\") (invisible))\
           (port (pt 0 8) (input)\
             (text \"clock\" (rect 18 4 48 12) (font \"Arial\"))\
             (text \"clock\" (rect 18 4 48 12) (font \"Arial\"))\
             (line (pt 0 8) (pt 16 8) (line_width 1)))\
           (drawing (rectangle (rect 16 0 84 40))))"
    );
    let rendered = render(&source);
    assert_eq!(
        rendered.tikz,
        concat!(
            "  % Symbol (counter) named inst1\n",
            "  \\draw[symbol bounds] (10.0000,-20.0000) rectangle (110.0000,-60.0000);\n",
            "  \\draw[symbol type] (60.0000,-27.0000) node[] {counter};\n",
            "  \\draw[symbol] (26.0000,-20.0000) rectangle (94.0000,-60.0000);\n",
            // snapped flush against the stub: west anchor 4 units from (16,8)
            "  \\draw[port name] (30.0000,-28.0000) node[anchor=west] {$\\nodenamebit{clock}$};\n",
            "\n",
            "  \\draw[node line, ->] (10.0000,-28.0000) -- (26.0000,-28.0000);\n",
        )
    );
    assert!(rendered.warnings.is_empty());
}

#[test]
fn bidir_pin_warns_and_renders_nothing() {
    let source = format!(
        "{HEADER}\
         (pin (bidir) (rect 0 0 130 16) (pt 0 8)\
           (text \"BIDIR\" (rect 0 0 40 10) (font \"Arial\"))\
           (text \"io\" (rect 0 0 30 10) (font \"Arial\"))\
           (drawing (line (pt 0 8) (pt 52 8) (line_width 1))))"
    );
    let rendered = render(&source);
    assert_eq!(rendered.tikz, "  % Pin (BIDIR) named io\n\n");
    assert_eq!(
        rendered.warnings,
        vec![Warning::UnknownPinDirection {
            name: "io".into(),
            direction: Some(schemtikz::types::Direction::Bidir),
        }]
    );
}

#[test]
fn conflicting_bus_widths_warn_and_keep_larger() {
    let source = format!(
        "{HEADER}\
         (connector (pt 0 0) (pt 32 0)\
           (text \"a[3..0]\" (rect 4 -12 28 -2) (font \"Arial\")))\
         (connector (pt 32 0) (pt 64 0)\
           (text \"b[1..0]\" (rect 36 -12 60 -2) (font \"Arial\")))"
    );
    let rendered = render(&source);
    assert_eq!(
        rendered.warnings,
        vec![Warning::WidthConflict {
            x: 32.0,
            y: 0.0,
            existing: 4,
            new: 2,
        }]
    );
    // one run, four wires wide
    assert!(rendered.tikz.contains("\\draw[bus line]"));
}

#[test]
fn placeholder_labels_are_silently_tolerated() {
    let source = format!(
        "{HEADER}\
         (connector (pt 0 0) (pt 64 0)\
           (text \"<<net17>>\" (rect 20 -12 44 -2) (font \"Arial\")))"
    );
    let rendered = render(&source);
    // the placeholder never triggers a label warning; only the width is
    // left unresolved, falling back to a single node line
    assert_eq!(
        rendered.warnings,
        vec![Warning::UnresolvedRunWidth { x: 64.0, y: 0.0 }]
    );
    assert_eq!(
        rendered.tikz,
        "  \\draw[node line] (64.0000,0.0000) -- (0.0000,0.0000);\n"
    );
}

#[test]
fn floating_text_renders_immediately() {
    let source = format!(
        "{HEADER}(text \"Top-level schematic\" (rect 0 0 100 10) (font \"Arial\" (bold)))"
    );
    let rendered = render(&source);
    insta::assert_snapshot!(
        rendered.tikz.trim(),
        @r"\draw[] (50.0000,-5.0000) node[] {\textsf{Top-level schematic}};"
    );
}

#[test]
fn rendering_is_idempotent() {
    let source = format!(
        "{HEADER}\
         (pin (output) (rect 0 0 130 16) (pt 0 8)\
           (text \"OUTPUT\" (rect 0 0 40 10) (font \"Arial\"))\
           (text \"data[3..0]\" (rect 0 0 30 10) (font \"Arial\"))\
           (drawing (line (pt 0 8) (pt 52 8) (line_width 1))))\
         (connector (pt 52 8) (pt 100 8))"
    );
    let schematic = parse_bdf(&source).expect("test input parses");
    let first = render_schematic(&schematic, &options());
    let second = render_schematic(&schematic, &options());
    assert_eq!(first.tikz, second.tikz);
    assert_eq!(first.warnings, second.warnings);
}
