//! Mirror/rotation transforms for pin and symbol internals.
//!
//! Orientation flags apply only to an object's internal geometry; its bounds
//! rectangle stays axis-aligned and untransformed. Mirroring happens first,
//! relative to the object's own size, then a true rotation about the local
//! origin.

use glam::{DMat2, DVec2};

use crate::types::{Bounds, Mirror, Rotation};

use super::anchor::Anchor;

fn rotation_matrix(rotation: Rotation) -> DMat2 {
    match rotation {
        Rotation::R0 => DMat2::IDENTITY,
        Rotation::R90 => DMat2::from_cols(DVec2::new(0.0, 1.0), DVec2::new(-1.0, 0.0)),
        Rotation::R180 => DMat2::from_cols(DVec2::new(-1.0, 0.0), DVec2::new(0.0, -1.0)),
        Rotation::R270 => DMat2::from_cols(DVec2::new(0.0, -1.0), DVec2::new(1.0, 0.0)),
    }
}

fn mirror_matrix(mirror: Mirror) -> DMat2 {
    match mirror {
        Mirror::None => DMat2::IDENTITY,
        Mirror::X => DMat2::from_cols(DVec2::new(1.0, 0.0), DVec2::new(0.0, -1.0)),
        Mirror::Y => DMat2::from_cols(DVec2::new(-1.0, 0.0), DVec2::new(0.0, 1.0)),
    }
}

/// Transform for points in an object's local frame. The mirror reflects
/// within the object's size so the geometry stays inside its bounds, then
/// the rotation is applied.
pub fn point_transform(
    mirror: Mirror,
    rotation: Rotation,
    bounds: &Bounds,
) -> impl Fn(DVec2) -> DVec2 {
    let (w, h) = bounds.size();
    let (w, h) = (w as f64, h as f64);
    let m = rotation_matrix(rotation);
    move |p| {
        let p = match mirror {
            Mirror::None => p,
            Mirror::X => DVec2::new(p.x, h - p.y),
            Mirror::Y => DVec2::new(w - p.x, p.y),
        };
        m * p
    }
}

/// Where does a text anchor end up after the object is transformed?
///
/// The anchor grid is Y-up while object space is Y-down, so the transform is
/// conjugated by a vertical flip: rotation-180 maps north to south and east
/// to west.
pub fn transform_text_anchor(mirror: Mirror, rotation: Rotation, anchor: Anchor) -> Anchor {
    let m = rotation_matrix(rotation) * mirror_matrix(mirror);
    let (gx, gy) = anchor.grid();
    let t = m * DVec2::new(gx as f64, -(gy as f64));
    let sig = |v: f64| {
        if v > 0.0 {
            1
        } else if v < 0.0 {
            -1
        } else {
            0
        }
    };
    Anchor::from_grid(sig(t.x), sig(-t.y), false)
}
