//! Point to triangle distance primitives.

use crate::point::{saturate, sign, Point};

/// Signed distance from `p` to the triangle `a b c`.
///
/// The sign follows `n = cross(b - a, a - c)`, which points against the
/// counter-clockwise face normal: samples in front of a counter-clockwise
/// triangle are negative, samples behind it (or in its plane) are positive.
/// Swapping two vertices flips the sign.
///
/// Returns `None` for a zero-area triangle, which has no normal.
pub fn signed_distance<V: Point>(p: &V, a: &V, b: &V, c: &V) -> Option<f32> {
    let ba = b.sub(a);
    let cb = c.sub(b);
    let ac = a.sub(c);
    let pa = p.sub(a);
    let pb = p.sub(b);
    let pc = p.sub(c);
    let normal = ba.cross(&ac);

    let normal2 = normal.length2();
    if normal2 == 0.0 {
        return None;
    }

    let side = normal.dot(&pa);
    let sign_factor = if side < 0.0 { -1.0 } else { 1.0 };

    // All three half-plane tests are anchored at `a`.
    let region = sign(ba.cross(&normal).dot(&pa))
        + sign(cb.cross(&normal).dot(&pa))
        + sign(ac.cross(&normal).dot(&pa));

    let distance2 = if region < 2.0 {
        // nearest point lies on an edge or a vertex.
        f32::min(
            edge_distance2(&ba, &pa),
            f32::min(edge_distance2(&cb, &pb), edge_distance2(&ac, &pc)),
        )
    } else {
        side * side / normal2
    };

    Some(sign_factor * distance2.sqrt())
}

/// Squared distance between the origin of `to_point` and the segment `[0, edge]`,
/// both expressed relative to the first vertex of the edge.
fn edge_distance2<V: Point>(edge: &V, to_point: &V) -> f32 {
    let t = saturate(edge.dot(to_point) / edge.length2());
    edge.mul(t).sub(to_point).length2()
}

/// Axis-aligned bounding box of a triangle, as `(min, max)`.
pub fn triangle_bounding_box<V: Point>(a: &V, b: &V, c: &V) -> (V, V) {
    (a.comp_min(b).comp_min(c), a.comp_max(b).comp_max(c))
}
