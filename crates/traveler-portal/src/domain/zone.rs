//! Marker trigger zones.

use traveler_core::scene::{Marker, Point};

/// Whether `point` lies strictly inside the marker's bounding rectangle.
///
/// The rectangle spans `centre ± size / 2` on each axis; a point exactly on
/// an edge is outside.
#[must_use]
pub fn contains(marker: &Marker, point: Point) -> bool {
    let half_width = marker.size.width / 2.0;
    let half_height = marker.size.height / 2.0;

    let in_x = point.x > marker.position.x - half_width && point.x < marker.position.x + half_width;
    let in_y =
        point.y > marker.position.y - half_height && point.y < marker.position.y + half_height;

    in_x && in_y
}

#[cfg(test)]
mod tests {
    use super::*;
    use traveler_core::scene::{ContextId, MarkerId, Size};

    fn marker_at(x: f64, y: f64, width: f64, height: f64) -> Marker {
        Marker {
            id: MarkerId::new("m1"),
            name: "Traveler:City:1".to_owned(),
            position: Point::new(x, y),
            size: Size::new(width, height),
            context_id: ContextId::new("page-a"),
        }
    }

    #[test]
    fn test_centre_is_inside() {
        assert!(contains(&marker_at(100.0, 100.0, 70.0, 70.0), Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_edges_are_outside() {
        let marker = marker_at(100.0, 100.0, 70.0, 70.0);

        assert!(!contains(&marker, Point::new(65.0, 100.0)));
        assert!(!contains(&marker, Point::new(135.0, 100.0)));
        assert!(!contains(&marker, Point::new(100.0, 65.0)));
        assert!(!contains(&marker, Point::new(100.0, 135.0)));
    }

    #[test]
    fn test_one_unit_inside_each_bound_is_inside() {
        let marker = marker_at(100.0, 100.0, 70.0, 70.0);

        assert!(contains(&marker, Point::new(66.0, 66.0)));
        assert!(contains(&marker, Point::new(134.0, 134.0)));
        assert!(contains(&marker, Point::new(66.0, 134.0)));
        assert!(contains(&marker, Point::new(134.0, 66.0)));
    }

    #[test]
    fn test_inside_one_axis_only_is_outside() {
        let marker = marker_at(100.0, 100.0, 70.0, 140.0);

        assert!(!contains(&marker, Point::new(200.0, 100.0)));
        assert!(!contains(&marker, Point::new(100.0, 200.0)));
    }

    #[test]
    fn test_zero_sized_marker_contains_nothing() {
        let marker = marker_at(100.0, 100.0, 0.0, 0.0);

        assert!(!contains(&marker, Point::new(100.0, 100.0)));
    }
}
