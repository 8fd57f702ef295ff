//! Compound signal names.
//!
//! Connector and port labels use Quartus notation: space-separated
//! components, each optionally subscripted (`addr[3..0]`, `clk`, `a b[1..0]`).
//! The grammar lives in `bdf.pest` next to the BDF surface syntax; this
//! module interprets the parse tree and computes bus widths.

use pest::Parser;

use crate::errors::NameError;
use crate::parse::{BdfParser, Rule};

/// One subscript of a name component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscript {
    /// `name[3]`
    Single(i32),
    /// `name[3..0]`, inclusive on both ends, either direction.
    Range(i32, i32),
}

/// One component of a compound signal name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameComponent {
    pub name: String,
    pub subscript: Option<Subscript>,
}

impl NameComponent {
    /// Number of wires this component contributes.
    pub fn width(&self) -> u32 {
        match self.subscript {
            Some(Subscript::Range(a, b)) => a.abs_diff(b) + 1,
            _ => 1,
        }
    }
}

/// Parse a signal name into its components.
pub fn parse_node_name(name: &str) -> Result<Vec<NameComponent>, NameError> {
    let mut pairs =
        BdfParser::parse(Rule::node_name, name).map_err(|_| NameError(name.to_string()))?;
    let root = pairs.next().ok_or_else(|| NameError(name.to_string()))?;

    let mut components = Vec::new();
    for pair in root.into_inner() {
        if pair.as_rule() != Rule::name_component {
            continue; // EOI
        }
        let mut inner = pair.into_inner();
        let ident = inner
            .next()
            .ok_or_else(|| NameError(name.to_string()))?
            .as_str()
            .to_string();
        let subscript = match inner.next() {
            None => None,
            Some(sub) => {
                let mut numbers = Vec::with_capacity(2);
                for n in sub.into_inner() {
                    let v: i32 = n
                        .as_str()
                        .parse()
                        .map_err(|_| NameError(name.to_string()))?;
                    numbers.push(v);
                }
                match numbers.as_slice() {
                    [i] => Some(Subscript::Single(*i)),
                    [a, b] => Some(Subscript::Range(*a, *b)),
                    _ => return Err(NameError(name.to_string())),
                }
            }
        };
        components.push(NameComponent {
            name: ident,
            subscript,
        });
    }
    Ok(components)
}

/// Total wire count of a compound name: the sum of component widths.
pub fn type_width(components: &[NameComponent]) -> u32 {
    components.iter().map(NameComponent::width).sum()
}
