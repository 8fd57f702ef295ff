//! Compass anchors and label placement.
//!
//! An anchor names one of nine reference points on a bounding box. The grid
//! coordinates here are Y-up (north is `(0, 1)`) while schematic space is
//! Y-down; [`calculate_anchor_point`] does the flip when interpolating.

use std::fmt;

use glam::DVec2;

use crate::types::{Bounds, Point, Port};

use super::RenderOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Center,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
    North,
    NorthEast,
}

impl Anchor {
    /// Fixed enumeration order. Optimal-anchor selection keeps the first
    /// strict minimum in this order, which makes tie-breaking deterministic.
    pub const ALL: [Anchor; 9] = [
        Anchor::Center,
        Anchor::East,
        Anchor::SouthEast,
        Anchor::South,
        Anchor::SouthWest,
        Anchor::West,
        Anchor::NorthWest,
        Anchor::North,
        Anchor::NorthEast,
    ];

    /// Grid coordinates, Y-up.
    pub fn grid(self) -> (i32, i32) {
        match self {
            Anchor::Center => (0, 0),
            Anchor::East => (1, 0),
            Anchor::SouthEast => (1, -1),
            Anchor::South => (0, -1),
            Anchor::SouthWest => (-1, -1),
            Anchor::West => (-1, 0),
            Anchor::NorthWest => (-1, 1),
            Anchor::North => (0, 1),
            Anchor::NorthEast => (1, 1),
        }
    }

    /// Maps a direction vector back to an anchor. Only the signs matter.
    /// `vertical` rotates the direction a quarter turn first, for anchors
    /// relative to vertically-written text.
    pub fn from_grid(x: i32, y: i32, vertical: bool) -> Anchor {
        let mut p = (x.signum(), y.signum());
        if vertical {
            p = (-p.1, p.0);
        }
        match p {
            (0, 0) => Anchor::Center,
            (1, 0) => Anchor::East,
            (1, -1) => Anchor::SouthEast,
            (0, -1) => Anchor::South,
            (-1, -1) => Anchor::SouthWest,
            (-1, 0) => Anchor::West,
            (-1, 1) => Anchor::NorthWest,
            (0, 1) => Anchor::North,
            (1, 1) => Anchor::NorthEast,
            _ => unreachable!("signum components are always in -1..=1"),
        }
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Anchor::Center => "center",
            Anchor::East => "east",
            Anchor::SouthEast => "south east",
            Anchor::South => "south",
            Anchor::SouthWest => "south west",
            Anchor::West => "west",
            Anchor::NorthWest => "north west",
            Anchor::North => "north",
            Anchor::NorthEast => "north east",
        })
    }
}

/// Floating-point rectangle, used for label bounds that the snap heuristic
/// may shift by a fractional amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl RectF {
    pub fn translated(self, d: DVec2) -> RectF {
        RectF {
            x1: self.x1 + d.x,
            y1: self.y1 + d.y,
            x2: self.x2 + d.x,
            y2: self.y2 + d.y,
        }
    }
}

impl From<&Bounds> for RectF {
    fn from(b: &Bounds) -> RectF {
        RectF {
            x1: b.x1 as f64,
            y1: b.y1 as f64,
            x2: b.x2 as f64,
            y2: b.y2 as f64,
        }
    }
}

/// Concrete position of an anchor on a rectangle. For vertical text the
/// anchor grid is rotated along with the glyphs.
pub fn calculate_anchor_point(rect: &RectF, vertical: bool, anchor: Anchor) -> DVec2 {
    let (gx, gy) = anchor.grid();
    let frac = |g: i32| (g + 1) as f64 / 2.0;
    let (mut fx, mut fy) = (frac(gx), frac(gy));
    if vertical {
        (fx, fy) = (1.0 - fy, fx);
    }
    DVec2::new(
        rect.x1 + fx * (rect.x2 - rect.x1),
        // grid Y grows up, rect Y grows down
        rect.y2 + fy * (rect.y1 - rect.y2),
    )
}

/// Distance from `x` to the finite segment `a`..`b` (clamped projection).
fn distance_to_segment(a: DVec2, b: DVec2, x: DVec2) -> f64 {
    let d = b - a;
    let len2 = d.length_squared();
    if len2 == 0.0 {
        return (x - a).length();
    }
    let t = ((x - a).dot(d) / len2).clamp(0.0, 1.0);
    (x - (a + t * d)).length()
}

/// Picks the anchor that places the label closest to the reference segment.
/// A Manhattan penalty on the grid coordinates prefers central anchors among
/// near-equal candidates, pulling labels toward the wire rather than a
/// corner of their box.
pub fn calculate_optimal_anchor_to_line(
    rect: &RectF,
    vertical: bool,
    a: DVec2,
    b: DVec2,
) -> Anchor {
    let mut best = Anchor::Center;
    let mut best_score = f64::INFINITY;
    for anchor in Anchor::ALL {
        let p = calculate_anchor_point(rect, vertical, anchor);
        let (gx, gy) = anchor.grid();
        let score = distance_to_segment(a, b, p) + (gx.abs() + gy.abs()) as f64;
        if score < best_score {
            best = anchor;
            best_score = score;
        }
    }
    best
}

/// Port-name snapping.
///
/// When a port label sits roughly beside its stub, Quartus meant it to be
/// flush against the stub's inner end; font metrics differences would
/// otherwise leave it floating. If the label qualifies (stub is axis-aligned,
/// text orientation matches, offsets within the configured tolerances), this
/// returns the anchor to use and the label bounds shifted to exactly
/// `port_name_n_distance` units from the stub's inner end. Declines with
/// `None` otherwise; `inner` is the stub endpoint away from the port.
pub fn snap_port_name(
    port: &Port,
    inner: Point,
    opts: &RenderOptions,
) -> Option<(Anchor, RectF)> {
    let distance = opts.port_name_n_distance?;
    let text = &port.label_inner;

    let delta = (port.point.x - inner.x, port.point.y - inner.y);
    if delta.0 != 0 && delta.1 != 0 {
        return None; // diagonal stub
    }
    let line_vertical = delta.0 == 0;
    if line_vertical == !text.vertical {
        return None; // stub/text orientation mismatch
    }

    let line_anchor = Anchor::from_grid(delta.0, delta.1, line_vertical);
    let rect = RectF::from(&text.bounds);
    let tp = calculate_anchor_point(&rect, line_vertical, line_anchor);

    // normal/tangential offset of the anchor point from the inner end
    let mut diff = (tp.x - inner.x as f64, tp.y - inner.y as f64);
    if line_vertical {
        diff = (diff.1, diff.0);
    }
    if delta.0 + delta.1 > 0 {
        diff.0 = -diff.0;
    }
    if diff.0 < -3.0 || diff.0 > opts.port_name_n_snap as f64 {
        return None;
    }
    if diff.1.abs() > opts.port_name_t_snap as f64 {
        return None;
    }

    let mut d = (distance as f64, 0.0);
    if delta.0 + delta.1 > 0 {
        d.0 = -d.0;
    }
    if line_vertical {
        d = (d.1, d.0);
    }
    let target = DVec2::new(inner.x as f64 + d.0, inner.y as f64 + d.1);
    Some((line_anchor, rect.translated(target - tp)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, Font, Line, Text};

    fn rect() -> RectF {
        RectF {
            x1: 0.0,
            y1: 0.0,
            x2: 10.0,
            y2: 20.0,
        }
    }

    #[test]
    fn anchor_round_trip() {
        for anchor in Anchor::ALL {
            let (gx, gy) = anchor.grid();
            assert_eq!(Anchor::from_grid(gx, gy, false), anchor);
        }
    }

    #[test]
    fn anchor_point_corners() {
        let r = rect();
        // north = top edge = smaller y
        assert_eq!(
            calculate_anchor_point(&r, false, Anchor::North),
            DVec2::new(5.0, 0.0)
        );
        assert_eq!(
            calculate_anchor_point(&r, false, Anchor::SouthEast),
            DVec2::new(10.0, 20.0)
        );
        assert_eq!(
            calculate_anchor_point(&r, false, Anchor::Center),
            DVec2::new(5.0, 10.0)
        );
    }

    #[test]
    fn vertical_text_rotates_anchor_grid() {
        let r = rect();
        // for vertical text, "west" is the bottom of the box
        assert_eq!(
            calculate_anchor_point(&r, true, Anchor::West),
            DVec2::new(5.0, 20.0)
        );
    }

    #[test]
    fn optimal_anchor_prefers_side_facing_line() {
        // segment to the east of the box: east anchor is closest
        let r = rect();
        let a = DVec2::new(30.0, 10.0);
        let b = DVec2::new(60.0, 10.0);
        assert_eq!(calculate_optimal_anchor_to_line(&r, false, a, b), Anchor::East);
    }

    #[test]
    fn optimal_anchor_center_wins_ties() {
        // segment crossing the center: everything is close, penalty decides
        let r = rect();
        let a = DVec2::new(5.0, 10.0);
        let b = DVec2::new(5.0, 10.0);
        assert_eq!(calculate_optimal_anchor_to_line(&r, false, a, b), Anchor::Center);
    }

    fn label(bounds: Bounds, vertical: bool) -> Text {
        Text {
            text: "clk".into(),
            bounds,
            font: Font {
                family: "Arial".into(),
                size: None,
                bold: false,
            },
            vertical,
            invisible: false,
        }
    }

    fn port_with_label(bounds: Bounds) -> Port {
        // horizontal stub pointing west: port at (0,8), inner end at (16,8)
        Port {
            point: Point::new(0, 8),
            direction: Direction::Input,
            label_outer: label(bounds, false),
            label_inner: label(bounds, false),
            stub: Line {
                p1: Point::new(0, 8),
                p2: Point::new(16, 8),
                width: None,
            },
        }
    }

    #[test]
    fn snap_adjusts_near_label() {
        // west anchor point of the label is at (18, 8): 2 units past the
        // inner end, well within tolerances
        let port = port_with_label(Bounds::new(18, 4, 40, 12));
        let opts = RenderOptions::default();
        let (anchor, rect) = snap_port_name(&port, Point::new(16, 8), &opts).unwrap();
        assert_eq!(anchor, Anchor::West);
        // snapped so the west anchor lands 4 units from the inner end
        assert_eq!(rect.x1, 20.0);
        assert_eq!(rect.y1, 4.0);
    }

    #[test]
    fn snap_declines_distant_label() {
        let port = port_with_label(Bounds::new(60, 4, 90, 12));
        let opts = RenderOptions::default();
        assert!(snap_port_name(&port, Point::new(16, 8), &opts).is_none());
    }

    #[test]
    fn snap_disabled_by_config() {
        let port = port_with_label(Bounds::new(18, 4, 40, 12));
        let opts = RenderOptions {
            port_name_n_distance: None,
            ..RenderOptions::default()
        };
        assert!(snap_port_name(&port, Point::new(16, 8), &opts).is_none());
    }
}
