use waystep_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Signed difference `a - b` along one axis of length `extent`.
///
/// On a wrapping axis the shorter way round is taken once the plain
/// difference exceeds half the extent.
#[inline]
pub fn wrapped_delta(a: i32, b: i32, extent: i32, wraps: bool) -> i32 {
    let d = a - b;
    if wraps && d.abs() > extent / 2 {
        if d < 0 { d + extent } else { d - extent }
    } else {
        d
    }
}
