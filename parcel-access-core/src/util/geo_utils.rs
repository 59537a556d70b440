use geo::{Coord, Distance, Haversine, Point};

/// projects a point onto the segment `from`-`to` in coordinate space.
///
/// # Arguments
///
/// * `from`  - segment start
/// * `to`    - segment end
/// * `point` - location to project
///
/// # Returns
///
/// * the fraction of the way from `from` to `to` where the projection lies,
///   clamped to [0, 1], and the projected coordinate
pub fn project_onto_segment(
    from: Coord<f64>,
    to: Coord<f64>,
    point: Coord<f64>,
) -> (f64, Coord<f64>) {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return (0.0, from);
    }
    let t = (((point.x - from.x) * dx + (point.y - from.y) * dy) / len_sq).clamp(0.0, 1.0);
    let projected = Coord {
        x: from.x + t * dx,
        y: from.y + t * dy,
    };
    (t, projected)
}

/// great-circle distance in meters between two WGS84 lon/lat coordinates
pub fn haversine_meters(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Haversine.distance(Point(a), Point(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_interior() {
        let (t, c) = project_onto_segment(
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: 2.5, y: 3.0 },
        );
        assert!((t - 0.25).abs() < 1e-12);
        assert!((c.x - 2.5).abs() < 1e-12);
        assert!(c.y.abs() < 1e-12);
    }

    #[test]
    fn test_projection_clamped_to_endpoints() {
        let (t, c) = project_onto_segment(
            Coord { x: 0.0, y: 0.0 },
            Coord { x: 10.0, y: 0.0 },
            Coord { x: -4.0, y: 1.0 },
        );
        assert_eq!(t, 0.0);
        assert_eq!(c, Coord { x: 0.0, y: 0.0 });
    }

    #[test]
    fn test_degenerate_segment() {
        let p = Coord { x: 1.0, y: 1.0 };
        let (t, c) = project_onto_segment(p, p, Coord { x: 3.0, y: 3.0 });
        assert_eq!(t, 0.0);
        assert_eq!(c, p);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let d = haversine_meters(Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 1.0 });
        assert!((d - 111_195.0).abs() < 100.0);
    }
}
