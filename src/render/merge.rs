//! Line network merger.
//!
//! Pins, ports and connectors each contribute short wire segments with no
//! knowledge of each other. Drawing them one by one would overstrike every
//! junction and scatter arrowheads, so the segments are merged into
//! continuous polyline "runs" first: chains of segments sharing endpoints
//! collapse into one run, branch points end runs and spawn new ones, and
//! each connected component reconciles a single bus width.
//!
//! Width and has-output state are shared across every run of a component
//! through `Rc<Cell>` handles, so a width discovered while extending one
//! branch is visible to its siblings.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use super::Warning;

/// A merge endpoint. Coordinates are compared bitwise, so the constructor
/// normalizes negative zero.
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64) -> Vertex {
        Vertex {
            x: x + 0.0,
            y: y + 0.0,
        }
    }
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Vertex) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for Vertex {}

impl std::hash::Hash for Vertex {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

/// One pending wire segment. `arrow` and `output_forbidden` describe the
/// `b` end; when the merger walks onto a segment it attributes both flags to
/// whichever endpoint it did not arrive from.
#[derive(Debug, Clone)]
pub struct Segment {
    pub a: Vertex,
    pub b: Vertex,
    pub width: Option<u32>,
    pub arrow: bool,
    pub output_forbidden: bool,
    pub has_output: bool,
}

/// A merged polyline. `arrow` and `output_forbidden` describe the first and
/// last point; `width` and `has_output` are shared with every other run of
/// the same connected component.
#[derive(Debug, Clone)]
pub struct Run {
    pub points: Vec<Vertex>,
    pub width: Rc<Cell<Option<u32>>>,
    pub arrow: [bool; 2],
    pub has_output: Rc<Cell<bool>>,
    pub output_forbidden: [bool; 2],
}

/// Pending segments, indexed by endpoint so extension steps take incident
/// segments without rescanning the pool.
struct Pool {
    segments: Vec<Option<Segment>>,
    by_point: HashMap<Vertex, Vec<usize>>,
    cursor: usize,
}

impl Pool {
    fn new(segments: Vec<Segment>) -> Pool {
        let mut by_point: HashMap<Vertex, Vec<usize>> = HashMap::new();
        for (id, seg) in segments.iter().enumerate() {
            by_point.entry(seg.a).or_default().push(id);
            by_point.entry(seg.b).or_default().push(id);
        }
        Pool {
            segments: segments.into_iter().map(Some).collect(),
            by_point,
            cursor: 0,
        }
    }

    /// Next unconsumed segment in registration order.
    fn next_seed(&mut self) -> Option<Segment> {
        while self.cursor < self.segments.len() {
            let slot = self.segments[self.cursor].take();
            self.cursor += 1;
            if slot.is_some() {
                return slot;
            }
        }
        None
    }

    /// Removes and returns all still-pending segments incident on `p`, as
    /// (far endpoint, segment) pairs, in registration order.
    fn take_incident(&mut self, p: Vertex) -> Vec<(Vertex, Segment)> {
        let Some(ids) = self.by_point.get(&p) else {
            return Vec::new();
        };
        let ids = ids.clone();
        let mut out = Vec::new();
        for id in ids {
            if let Some(seg) = self.segments[id].take() {
                let other = if seg.a == p { seg.b } else { seg.a };
                out.push((other, seg));
            }
        }
        out
    }
}

/// A branch discovered while extending a run: a new run to grow from the
/// branch point, sharing the component's width and has-output cells.
struct Spawn {
    start: Vertex,
    to: Vertex,
    arrow: bool,
    output_forbidden: bool,
    width: Rc<Cell<Option<u32>>>,
    has_output: Rc<Cell<bool>>,
}

fn join_widths(
    point: Vertex,
    w1: Option<u32>,
    w2: Option<u32>,
    warnings: &mut Vec<Warning>,
) -> Option<u32> {
    if let (Some(a), Some(b)) = (w1, w2) {
        if a != b {
            warnings.push(Warning::WidthConflict {
                x: point.x,
                y: point.y,
                existing: a,
                new: b,
            });
        }
    }
    match (w1, w2) {
        (None, w) | (w, None) => w,
        (Some(a), Some(b)) => Some(a.max(b)),
    }
}

/// Grows `run` from its last point: consumes every incident segment, folds
/// widths, and either extends through (single continuation, no terminating
/// arrow) or stops and reports the branches to spawn.
fn extend(
    pool: &mut Pool,
    run: &mut Run,
    mut arrow: bool,
    mut forbidden: bool,
    warnings: &mut Vec<Warning>,
) -> Vec<Spawn> {
    loop {
        run.arrow[1] = arrow;
        let point = *run.points.last().expect("runs always hold >= 2 points");

        // Duplicate far endpoints keep their first position but take the
        // flags of the last segment reaching them.
        let mut neighbors: Vec<(Vertex, bool, bool)> = Vec::new();
        for (other, seg) in pool.take_incident(point) {
            run.width
                .set(join_widths(point, run.width.get(), seg.width, warnings));
            run.has_output.set(run.has_output.get() || seg.has_output);
            match neighbors.iter_mut().find(|(v, _, _)| *v == other) {
                Some(slot) => {
                    slot.1 = seg.arrow;
                    slot.2 = seg.output_forbidden;
                }
                None => neighbors.push((other, seg.arrow, seg.output_forbidden)),
            }
        }

        if let [(v, a, f)] = neighbors.as_slice() {
            if !run.arrow[1] {
                run.points.push(*v);
                (arrow, forbidden) = (*a, *f);
                continue;
            }
        }

        run.output_forbidden[1] = forbidden || !neighbors.is_empty();
        return neighbors
            .into_iter()
            .map(|(v, a, f)| Spawn {
                start: point,
                to: v,
                arrow: a,
                output_forbidden: f,
                width: run.width.clone(),
                has_output: run.has_output.clone(),
            })
            .collect();
    }
}

/// Depth-first: each spawned run is grown to completion (consuming segments
/// and possibly spawning further branches) before its siblings.
fn process_spawns(
    pool: &mut Pool,
    spawns: Vec<Spawn>,
    out: &mut Vec<Run>,
    warnings: &mut Vec<Warning>,
) {
    for spawn in spawns {
        let mut run = Run {
            points: vec![spawn.start, spawn.to],
            width: spawn.width,
            arrow: [false, false],
            // near end sits on a branch point, never draw an arrow into it
            output_forbidden: [true, false],
            has_output: spawn.has_output,
        };
        let children = extend(pool, &mut run, spawn.arrow, spawn.output_forbidden, warnings);
        out.push(run);
        process_spawns(pool, children, out, warnings);
    }
}

/// Merges all pending segments into runs. Deterministic: seeds are taken in
/// registration order and every extension step visits segments in
/// registration order.
pub fn merge_segments(segments: Vec<Segment>, warnings: &mut Vec<Warning>) -> Vec<Run> {
    let mut pool = Pool::new(segments);
    let mut runs = Vec::new();

    while let Some(seed) = pool.next_seed() {
        let mut run = Run {
            points: vec![seed.a, seed.b],
            width: Rc::new(Cell::new(seed.width)),
            arrow: [false, false],
            output_forbidden: [false, false],
            has_output: Rc::new(Cell::new(seed.has_output)),
        };

        let spawns = extend(
            &mut pool,
            &mut run,
            seed.arrow,
            seed.output_forbidden,
            warnings,
        );
        let mut children = Vec::new();
        process_spawns(&mut pool, spawns, &mut children, warnings);

        // walk the other direction from the seed
        run.points.reverse();
        run.arrow.reverse();
        run.output_forbidden.reverse();
        let spawns = extend(&mut pool, &mut run, false, false, warnings);
        let mut children_back = Vec::new();
        process_spawns(&mut pool, spawns, &mut children_back, warnings);

        // canonicalize so arrows point away from the start
        if run.arrow == [true, false] {
            run.points.reverse();
            run.arrow.reverse();
            run.output_forbidden.reverse();
        }

        runs.push(run);
        runs.append(&mut children);
        runs.append(&mut children_back);
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: f64, y: f64) -> Vertex {
        Vertex::new(x, y)
    }

    fn seg(a: Vertex, b: Vertex, width: Option<u32>) -> Segment {
        Segment {
            a,
            b,
            width,
            arrow: false,
            output_forbidden: false,
            has_output: false,
        }
    }

    #[test]
    fn chain_collapses_to_one_run() {
        let (a, b, c, d) = (v(0.0, 0.0), v(10.0, 0.0), v(20.0, 0.0), v(30.0, 0.0));
        let mut warnings = Vec::new();
        let runs = merge_segments(
            vec![seg(a, b, Some(4)), seg(b, c, None), seg(c, d, Some(4))],
            &mut warnings,
        );
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].points.len(), 4);
        assert_eq!(runs[0].width.get(), Some(4));
        assert!(warnings.is_empty());
    }

    #[test]
    fn width_resolution_is_order_independent() {
        let (a, b, c, d) = (v(0.0, 0.0), v(10.0, 0.0), v(20.0, 0.0), v(30.0, 0.0));
        let base = [seg(a, b, Some(4)), seg(b, c, None), seg(c, d, Some(4))];
        // every registration order yields one run of width 4
        let orders: [[usize; 3]; 6] = [
            [0, 1, 2],
            [0, 2, 1],
            [1, 0, 2],
            [1, 2, 0],
            [2, 0, 1],
            [2, 1, 0],
        ];
        for order in orders {
            let segments = order.iter().map(|&i| base[i].clone()).collect();
            let mut warnings = Vec::new();
            let runs = merge_segments(segments, &mut warnings);
            assert_eq!(runs.len(), 1, "order {order:?}");
            assert_eq!(runs[0].width.get(), Some(4), "order {order:?}");
            assert!(warnings.is_empty(), "order {order:?}");
        }
    }

    #[test]
    fn conflicting_widths_warn_and_keep_larger() {
        let (a, b, c) = (v(0.0, 0.0), v(10.0, 0.0), v(20.0, 0.0));
        let mut warnings = Vec::new();
        let runs = merge_segments(vec![seg(a, b, Some(4)), seg(b, c, Some(2))], &mut warnings);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].width.get(), Some(4));
        assert_eq!(
            warnings,
            vec![Warning::WidthConflict {
                x: 10.0,
                y: 0.0,
                existing: 4,
                new: 2,
            }]
        );
    }

    #[test]
    fn branch_splits_into_three_runs() {
        let (a, b, c, d) = (v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(10.0, -10.0));
        let mut warnings = Vec::new();
        let runs = merge_segments(
            vec![seg(a, b, None), seg(b, c, None), seg(b, d, None)],
            &mut warnings,
        );
        assert_eq!(runs.len(), 3);
        // no run crosses the branch point
        for run in &runs {
            assert_eq!(run.points.len(), 2);
        }
        // seed run ends at the branch, children start from it; all three
        // carry output-forbidden at their B end
        assert_eq!(runs[0].points, vec![b, a]);
        assert_eq!(runs[0].output_forbidden, [true, false]);
        assert_eq!(runs[1].points, vec![b, c]);
        assert_eq!(runs[1].output_forbidden, [true, false]);
        assert_eq!(runs[2].points, vec![b, d]);
        assert_eq!(runs[2].output_forbidden, [true, false]);
    }

    #[test]
    fn branch_shares_width_across_spawned_runs() {
        // width is declared on only one leg of a fan-out
        let (a, b, c, d) = (v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(10.0, -10.0));
        let mut warnings = Vec::new();
        let runs = merge_segments(
            vec![seg(a, b, Some(8)), seg(b, c, None), seg(b, d, None)],
            &mut warnings,
        );
        assert_eq!(runs.len(), 3);
        for run in &runs {
            assert_eq!(run.width.get(), Some(8));
        }
    }

    #[test]
    fn arrow_is_never_canonicalized_backwards() {
        let (a, b) = (v(0.0, 0.0), v(10.0, 0.0));
        let mut s = seg(a, b, Some(1));
        s.arrow = true;
        let mut warnings = Vec::new();
        let runs = merge_segments(vec![s], &mut warnings);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].arrow, [false, true]);
        assert_eq!(runs[0].points, vec![a, b]);
    }

    #[test]
    fn arrow_stops_extension() {
        // an arrowed end must terminate its run even with a continuation
        let (a, b, c) = (v(0.0, 0.0), v(10.0, 0.0), v(20.0, 0.0));
        let mut first = seg(a, b, None);
        first.arrow = true;
        let mut warnings = Vec::new();
        let runs = merge_segments(vec![first, seg(b, c, None)], &mut warnings);
        assert_eq!(runs.len(), 2);
    }
}
