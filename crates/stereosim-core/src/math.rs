//! Vector algebra and intersection primitives.
//!
//! Element-wise arithmetic, lengths, cross products and interpolation come
//! from `glam`'s double-precision vectors. This module adds the pieces the
//! optical pipeline needs on top: explicit 3×3 determinants and Cramer
//! solves, planar orientation tests, and the homogeneous ray intersection
//! used for reconstruction.

use glam::{DMat3, DVec2, DVec3};

use crate::error::GeometryDegenerate;

/// Magnitude below which a denominator is treated as zero.
pub const DEGENERATE_EPSILON: f64 = 1e-12;

/// Determinant of the 3×3 matrix with columns `a`, `b`, `c`.
///
/// Expanded along the first column.
#[must_use]
pub fn determinant3(a: DVec3, b: DVec3, c: DVec3) -> f64 {
    a.x * (b.y * c.z - c.y * b.z) - a.y * (b.x * c.z - c.x * b.z) + a.z * (b.x * c.y - c.x * b.y)
}

/// Solves `x·a + y·b + z·c = rhs` with Cramer's rule.
pub fn solve3(a: DVec3, b: DVec3, c: DVec3, rhs: DVec3) -> Result<DVec3, GeometryDegenerate> {
    let denominator = determinant3(a, b, c);
    if !denominator.is_finite() || denominator.abs() < DEGENERATE_EPSILON {
        return Err(GeometryDegenerate("singular 3x3 system"));
    }
    Ok(DVec3::new(
        determinant3(rhs, b, c) / denominator,
        determinant3(a, rhs, c) / denominator,
        determinant3(a, b, rhs) / denominator,
    ))
}

/// Signed orientation of the triangle `a, b, c`: `(a − c) × (b − c)`.
///
/// Positive when the vertices wind counter-clockwise, zero when collinear.
#[must_use]
pub fn triangle_orientation(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    (a - c).perp_dot(b - c)
}

/// Linear interpolation between two scalars.
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Intersects the lines `a → b` and `c → d`.
///
/// The intersection is solved exactly in the XZ plane using homogeneous
/// coordinates. Y is estimated by walking each line to the intersection's
/// Z and averaging the two heights, so lines that are skew in Y still
/// produce a point halfway between them.
pub fn intersect_rays_xz(
    a: DVec3,
    b: DVec3,
    c: DVec3,
    d: DVec3,
) -> Result<DVec3, GeometryDegenerate> {
    let homogeneous = |p: DVec3| DVec3::new(p.x, p.z, 1.0);
    let first = homogeneous(a).cross(homogeneous(b));
    let second = homogeneous(c).cross(homogeneous(d));
    let q = first.cross(second);
    if !q.z.is_finite() || q.z.abs() < DEGENERATE_EPSILON {
        return Err(GeometryDegenerate("parallel sight lines"));
    }
    let qx = q.x / q.z;
    let qz = q.y / q.z;

    let dz1 = b.z - a.z;
    let dz2 = d.z - c.z;
    if dz1.abs() < DEGENERATE_EPSILON || dz2.abs() < DEGENERATE_EPSILON {
        return Err(GeometryDegenerate("sight line without depth extent"));
    }
    let t1 = (qz - a.z) / dz1;
    let t2 = (qz - c.z) / dz2;
    let y = 0.5 * lerp(a.y, b.y, t1) + 0.5 * lerp(c.y, d.y, t2);

    Ok(DVec3::new(qx, y, qz))
}

/// Maps plane coordinates `(s, t)` to the world point `origin + s·u + t·v`.
#[must_use]
pub fn plane_point(origin: DVec3, u: DVec3, v: DVec3, coords: DVec2) -> DVec3 {
    origin + u * coords.x + v * coords.y
}

/// Rotation applying Z, then Y, then X (angles in degrees).
#[must_use]
pub fn rotation_zyx(degrees: DVec3) -> DMat3 {
    let radians = DVec3::new(
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    );
    DMat3::from_rotation_x(radians.x)
        * DMat3::from_rotation_y(radians.y)
        * DMat3::from_rotation_z(radians.z)
}
