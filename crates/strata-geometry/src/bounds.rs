use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Sphere enclosing every vertex of a buffer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: [f32; 3],
    pub radius: f32,
}

impl BoundingSphere {
    /// Sphere centred on the axis-aligned box of `positions`, with the radius
    /// reaching the farthest vertex. An empty buffer gives a zero sphere.
    pub fn from_positions(positions: &[f32]) -> Self {
        let mut points = positions.chunks_exact(3).map(Vec3::from_slice);
        let Some(first) = points.next() else {
            return Self::empty();
        };
        let (min, max) = points
            .clone()
            .fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        let center = (min + max) * 0.5;
        let radius = std::iter::once(first)
            .chain(points)
            .map(|p| p.distance_squared(center))
            .fold(0.0f32, f32::max)
            .sqrt();
        Self {
            center: center.to_array(),
            radius,
        }
    }

    pub fn empty() -> Self {
        Self {
            center: [0.0; 3],
            radius: 0.0,
        }
    }

    /// Containment test with a small relative tolerance for rounding.
    pub fn contains_point(&self, point: [f32; 3]) -> bool {
        let distance = Vec3::from_array(point).distance(Vec3::from_array(self.center));
        distance <= self.radius * (1.0 + 1e-5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_buffer() {
        assert_eq!(BoundingSphere::from_positions(&[]), BoundingSphere::empty());
    }

    #[test]
    fn single_point_has_zero_radius() {
        let sphere = BoundingSphere::from_positions(&[1.0, 2.0, 3.0]);
        assert_eq!(sphere.center, [1.0, 2.0, 3.0]);
        assert_eq!(sphere.radius, 0.0);
    }

    #[test]
    fn unit_square() {
        let positions = [0.0, 0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 2.0, 0.0, 0.0, 2.0, 0.0];
        let sphere = BoundingSphere::from_positions(&positions);
        assert_eq!(sphere.center, [1.0, 1.0, 0.0]);
        assert!((sphere.radius - 2f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn encloses_every_vertex() {
        let positions = [-3.0, 1.0, 0.5, 4.0, -2.0, 7.0, 0.0, 0.0, 0.0, 1.5, 9.0, -4.0];
        let sphere = BoundingSphere::from_positions(&positions);
        for p in positions.chunks_exact(3) {
            assert!(sphere.contains_point([p[0], p[1], p[2]]));
        }
    }
}
