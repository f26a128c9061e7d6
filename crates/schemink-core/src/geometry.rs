//! Pure geometry helpers: grid snapping, element transforms, bounds and
//! orthogonal wire routing.
//!
//! Everything here works in scene coordinates and carries no state.

use kurbo::{Affine, Line, ParamCurveNearest, Point, Rect, Size};

/// Tolerance used when testing whether a transformed corner lies on a
/// rectangle edge. Rotations by multiples of 90° leave tiny residues.
pub const CONTAINMENT_EPSILON: f64 = 1e-9;

/// Snap a scalar to the nearest multiple of `grid_size`.
///
/// A grid that is not a positive finite size leaves the value as is.
pub fn snap(value: f64, grid_size: f64) -> f64 {
    if !(grid_size.is_finite() && grid_size > 0.0) {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap both coordinates of a point to the grid.
pub fn snap_point(point: Point, grid_size: f64) -> Point {
    Point::new(snap(point.x, grid_size), snap(point.y, grid_size))
}

/// Normalize an angle in degrees into `[0, 360)`.
///
/// Non-finite input collapses to 0.
pub fn normalize_degrees(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let normalized = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if normalized >= 360.0 { 0.0 } else { normalized }
}

/// Affine transform from an element's unrotated local frame to scene space.
///
/// The local frame is rotated about its own center by `rotation_degrees`
/// and then translated to `position`.
pub fn element_transform(position: Point, rotation_degrees: f64, size: Size) -> Affine {
    let center = Point::new(size.width / 2.0, size.height / 2.0);
    Affine::translate(position.to_vec2())
        * Affine::rotate_about(rotation_degrees.to_radians(), center)
}

/// Transform a local-frame point of an element into scene coordinates.
pub fn local_to_global(position: Point, rotation_degrees: f64, size: Size, local: Point) -> Point {
    element_transform(position, rotation_degrees, size) * local
}

/// Inverse of [`local_to_global`].
pub fn global_to_local(position: Point, rotation_degrees: f64, size: Size, global: Point) -> Point {
    element_transform(position, rotation_degrees, size).inverse() * global
}

/// The four corners of an element's nominal rectangle in scene space,
/// in local order top-left, top-right, bottom-right, bottom-left.
pub fn element_corners(position: Point, rotation_degrees: f64, size: Size) -> [Point; 4] {
    let transform = element_transform(position, rotation_degrees, size);
    [
        transform * Point::new(0.0, 0.0),
        transform * Point::new(size.width, 0.0),
        transform * Point::new(size.width, size.height),
        transform * Point::new(0.0, size.height),
    ]
}

/// Axis-aligned bounding box of a (possibly rotated) element.
pub fn element_bounds(position: Point, rotation_degrees: f64, size: Size) -> Rect {
    bounds_of_points(&element_corners(position, rotation_degrees, size))
        .unwrap_or_else(|| Rect::from_origin_size(position, size))
}

/// Axis-aligned bounds of a set of points, `None` when empty.
pub fn bounds_of_points(points: &[Point]) -> Option<Rect> {
    let (first, rest) = points.split_first()?;
    let mut rect = Rect::from_points(*first, *first);
    for p in rest {
        rect = rect.union_pt(*p);
    }
    Some(rect)
}

/// Union of a sequence of rectangles, `None` when empty.
pub fn union_bounds(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects
        .into_iter()
        .fold(None, |acc: Option<Rect>, r| Some(acc.map_or(r, |a| a.union(r))))
}

/// Inclusive containment test: points on the border count as inside.
///
/// `kurbo::Rect::contains` is half-open, which would reject elements whose
/// edge sits exactly on the marquee edge.
pub fn rect_contains_inclusive(rect: Rect, point: Point) -> bool {
    let rect = rect.abs();
    point.x >= rect.x0 - CONTAINMENT_EPSILON
        && point.x <= rect.x1 + CONTAINMENT_EPSILON
        && point.y >= rect.y0 - CONTAINMENT_EPSILON
        && point.y <= rect.y1 + CONTAINMENT_EPSILON
}

/// Normalized rectangle spanned by two arbitrary corner points.
pub fn rect_from_corners(a: Point, b: Point) -> Rect {
    Rect::from_points(a, b)
}

/// Two-bend orthogonal route between two points.
///
/// When the horizontal distance dominates, the path runs horizontally to the
/// mid x, vertically to the target row, then horizontally again. Otherwise
/// it goes vertical-first via the mid y.
pub fn orthogonal_path(from: Point, to: Point) -> [Point; 4] {
    let mid = from.midpoint(to);
    if (from.x - to.x).abs() > (from.y - to.y).abs() {
        [from, Point::new(mid.x, from.y), Point::new(mid.x, to.y), to]
    } else {
        [from, Point::new(from.x, mid.y), Point::new(to.x, mid.y), to]
    }
}

/// Shortest distance from `point` to a polyline.
pub fn distance_to_polyline(points: &[Point], point: Point) -> f64 {
    match points {
        [] => f64::INFINITY,
        [single] => single.distance(point),
        _ => points
            .windows(2)
            .map(|pair| {
                let segment = Line::new(pair[0], pair[1]);
                segment.nearest(point, 1e-6).distance_sq.sqrt()
            })
            .fold(f64::INFINITY, f64::min),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(a: Point, b: Point) {
        assert!(
            (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9,
            "{a:?} != {b:?}"
        );
    }

    #[test]
    fn test_snap_rounds_to_grid() {
        assert_eq!(snap(14.0, 10.0), 10.0);
        assert_eq!(snap(15.0, 10.0), 20.0);
        assert_eq!(snap(-14.0, 10.0), -10.0);
        assert_eq!(snap(0.0, 10.0), 0.0);
    }

    #[test]
    fn test_snap_without_usable_grid() {
        assert_eq!(snap(14.0, 0.0), 14.0);
        assert_eq!(snap(14.0, -10.0), 14.0);
        assert_eq!(snap(14.0, f64::NAN), 14.0);
    }

    #[test]
    fn test_snap_idempotent() {
        for &grid in &[1.0, 7.5, 10.0, 20.0] {
            for i in -50..50 {
                let v = i as f64 * 3.7;
                let once = snap(v, grid);
                assert_eq!(snap(once, grid), once);
            }
        }
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
        assert_eq!(normalize_degrees(f64::NAN), 0.0);
    }

    #[test]
    fn test_local_to_global_unrotated() {
        let size = Size::new(80.0, 40.0);
        let p = local_to_global(Point::new(100.0, 50.0), 0.0, size, Point::new(80.0, 20.0));
        assert_point_eq(p, Point::new(180.0, 70.0));
    }

    #[test]
    fn test_local_to_global_rotated_about_center() {
        // Port on the east edge of an 80x40 element rotated by 90 degrees
        // ends up below the center.
        let size = Size::new(80.0, 40.0);
        let p = local_to_global(Point::ZERO, 90.0, size, Point::new(80.0, 20.0));
        assert_point_eq(p, Point::new(40.0, 60.0));
    }

    #[test]
    fn test_rotation_roundtrip() {
        let size = Size::new(50.0, 30.0);
        let local = Point::new(7.0, 29.0);
        for &angle in &[0.0, 15.0, 90.0, 133.0, 270.0, 359.0] {
            let rotated = local_to_global(Point::ZERO, angle, size, local);
            let back = local_to_global(Point::ZERO, -angle, size, rotated);
            assert_point_eq(back, local);
        }
    }

    #[test]
    fn test_global_to_local_inverts() {
        let size = Size::new(90.0, 40.0);
        let pos = Point::new(30.0, -20.0);
        let local = Point::new(12.0, 3.0);
        let global = local_to_global(pos, 45.0, size, local);
        assert_point_eq(global_to_local(pos, 45.0, size, global), local);
    }

    #[test]
    fn test_bounds_rotated_quarter_turn() {
        let bounds = element_bounds(Point::ZERO, 90.0, Size::new(80.0, 40.0));
        assert!((bounds.x0 - 20.0).abs() < 1e-9);
        assert!((bounds.x1 - 60.0).abs() < 1e-9);
        assert!((bounds.y0 + 20.0).abs() < 1e-9);
        assert!((bounds.y1 - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_orthogonal_path_horizontal_first() {
        let path = orthogonal_path(Point::new(0.0, 0.0), Point::new(100.0, 20.0));
        assert_eq!(
            path,
            [
                Point::new(0.0, 0.0),
                Point::new(50.0, 0.0),
                Point::new(50.0, 20.0),
                Point::new(100.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_orthogonal_path_vertical_first() {
        let path = orthogonal_path(Point::new(0.0, 0.0), Point::new(10.0, 100.0));
        assert_eq!(path[1], Point::new(0.0, 50.0));
        assert_eq!(path[2], Point::new(10.0, 50.0));
    }

    #[test]
    fn test_rect_contains_inclusive_edges() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect_contains_inclusive(rect, Point::new(10.0, 10.0)));
        assert!(rect_contains_inclusive(rect, Point::new(0.0, 5.0)));
        assert!(!rect_contains_inclusive(rect, Point::new(10.1, 5.0)));
    }

    #[test]
    fn test_distance_to_polyline() {
        let path = orthogonal_path(Point::new(0.0, 0.0), Point::new(100.0, 20.0));
        assert!((distance_to_polyline(&path, Point::new(25.0, 3.0)) - 3.0).abs() < 1e-6);
        assert!(distance_to_polyline(&path, Point::new(50.0, 10.0)) < 1e-6);
        assert!(distance_to_polyline(&path, Point::new(25.0, 15.0)) > 10.0);
    }

    #[test]
    fn test_union_bounds() {
        let rects = [Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, -2.0, 6.0, 0.0)];
        let u = union_bounds(rects).unwrap();
        assert_eq!(u, Rect::new(0.0, -2.0, 6.0, 1.0));
        assert!(union_bounds(Vec::<Rect>::new()).is_none());
    }
}
