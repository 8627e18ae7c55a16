//! Polyline routes with fractional progress.

use resqroute_core::AppError;

use crate::distance::GeoPoint;

/// An ordered list of at least two points.
///
/// Progress is measured in segments: `0.0` is the first point, `1.5` is
/// halfway between the second and third, `len - 1` is the end.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePath {
    points: Vec<GeoPoint>,
}

impl RoutePath {
    /// Build a route. Fewer than two points is a validation error.
    pub fn new(points: Vec<GeoPoint>) -> Result<Self, AppError> {
        if points.len() < 2 {
            return Err(AppError::validation("A route needs at least two points"));
        }
        Ok(Self { points })
    }

    /// A straight route from `start` to `end` split into `segments` pieces.
    pub fn straight(start: GeoPoint, end: GeoPoint, segments: usize) -> Self {
        let segments = segments.max(1);
        let points = (0..=segments)
            .map(|i| {
                if i == segments {
                    end
                } else {
                    lerp(start, end, i as f64 / segments as f64)
                }
            })
            .collect();
        Self { points }
    }

    /// The points of the route.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// First point.
    pub fn start(&self) -> GeoPoint {
        self.points[0]
    }

    /// Progress value at which the route is finished.
    pub fn end_progress(&self) -> f64 {
        (self.points.len() - 1) as f64
    }

    /// The interpolated position at `progress`, or `None` once the route
    /// has been completed.
    pub fn position_at(&self, progress: f64) -> Option<GeoPoint> {
        if !(0.0..self.end_progress()).contains(&progress) {
            return None;
        }
        let i = progress.floor() as usize;
        let t = progress - i as f64;
        Some(lerp(self.points[i], self.points[i + 1], t))
    }

    /// Total length in meters.
    pub fn length_meters(&self) -> f64 {
        self.points
            .windows(2)
            .map(|w| w[0].distance_to(&w[1]))
            .sum()
    }
}

fn lerp(a: GeoPoint, b: GeoPoint, t: f64) -> GeoPoint {
    GeoPoint::new(
        a.latitude + (b.latitude - a.latitude) * t,
        a.longitude + (b.longitude - a.longitude) * t,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_two_points() {
        assert!(RoutePath::new(vec![GeoPoint::new(1.0, 1.0)]).is_err());
    }

    #[test]
    fn test_interpolation() {
        let route = RoutePath::new(vec![
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(1.0, 2.0),
            GeoPoint::new(1.0, 4.0),
        ])
        .unwrap();
        assert_eq!(route.position_at(0.0), Some(GeoPoint::new(0.0, 0.0)));
        assert_eq!(route.position_at(0.5), Some(GeoPoint::new(0.5, 1.0)));
        assert_eq!(route.position_at(1.5), Some(GeoPoint::new(1.0, 3.0)));
        assert_eq!(route.position_at(2.0), None);
        assert_eq!(route.position_at(-0.1), None);
    }

    #[test]
    fn test_straight_route_endpoints() {
        let a = GeoPoint::new(28.600, 77.205);
        let b = GeoPoint::new(28.6139, 77.209);
        let route = RoutePath::straight(a, b, 4);
        assert_eq!(route.points().len(), 5);
        assert_eq!(route.start(), a);
        assert_eq!(*route.points().last().unwrap(), b);
        assert!((route.length_meters() - a.distance_to(&b)).abs() < 1.0);
    }
}
