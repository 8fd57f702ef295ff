//! Shared state for one rendering pass.

use glam::DVec2;

use crate::log;
use crate::types::Bounds;

use super::merge::Segment;
use super::tikz::Emitter;
use super::{RenderOptions, Warning};

/// Accumulates output and pending wire segments while the driver walks the
/// object list. `tail` holds statements that must come after the merged
/// runs (junction markers, connector labels).
pub struct RenderContext<'a> {
    pub opts: &'a RenderOptions,
    pub out: String,
    pub tail: String,
    pub segments: Vec<Segment>,
    pub warnings: Vec<Warning>,
}

impl<'a> RenderContext<'a> {
    pub fn new(opts: &'a RenderOptions) -> RenderContext<'a> {
        RenderContext {
            opts,
            out: String::new(),
            tail: String::new(),
            segments: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Emitter at the global offset. Borrows the options, not the context,
    /// so output can be appended while it is alive.
    pub fn emitter(&self) -> Emitter<'a> {
        Emitter::new(self.opts)
    }

    /// Emitter advanced into an object's local frame.
    pub fn local_emitter(&self, bounds: &Bounds) -> Emitter<'a> {
        self.emitter()
            .advanced(DVec2::new(bounds.x1 as f64, bounds.y1 as f64))
    }

    pub fn warn(&mut self, warning: Warning) {
        log::warn!("{warning}");
        self.warnings.push(warning);
    }
}
