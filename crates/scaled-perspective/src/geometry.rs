use glam::DVec3;

/// Below this, a ray is treated as running parallel to a plane.
pub const PARALLEL_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    /// Not required to be unit length
    pub direction: DVec3,
}

impl Ray {
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}

/// Infinite plane through `point`, facing along `normal` (unit length).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: DVec3,
    pub normal: DVec3,
}

impl Plane {
    /// None if `normal` has no usable direction
    pub fn new(point: DVec3, normal: DVec3) -> Option<Self> {
        let normal = normal.try_normalize()?;
        Some(Self { point, normal })
    }

    pub fn signed_distance(&self, point: DVec3) -> f64 {
        (point - self.point).dot(self.normal)
    }

    pub fn distance_to(&self, point: DVec3) -> f64 {
        self.signed_distance(point).abs()
    }

    /// Orthogonal projection of `point` onto the plane.
    pub fn project(&self, point: DVec3) -> DVec3 {
        point - self.normal * self.signed_distance(point)
    }

    /// Ray equation: P = origin + t * direction
    /// Plane equation: dot(P - point, normal) = 0
    ///
    /// Returns None when the ray runs parallel to the plane, or when the hit
    /// is behind the ray origin.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<DVec3> {
        let denom = ray.direction.dot(self.normal);
        if denom.abs() < PARALLEL_EPSILON {
            tracing::trace!("ray is parallel to plane");
            return None;
        }

        let t = (self.point - ray.origin).dot(self.normal) / denom;
        if t < 0.0 {
            tracing::trace!("intersection is behind the ray origin");
            return None;
        }

        Some(ray.at(t))
    }
}

/// Scene geometry a pointer ray can land on.
///
/// Hosts implement this against their real model; planes are enough for
/// tests and scripted sessions.
pub trait PickScene {
    fn pick(&self, ray: &Ray) -> Option<DVec3>;
}

impl PickScene for Plane {
    fn pick(&self, ray: &Ray) -> Option<DVec3> {
        self.intersect_ray(ray)
    }
}

impl PickScene for [Plane] {
    /// Nearest hit along the ray
    fn pick(&self, ray: &Ray) -> Option<DVec3> {
        self.iter()
            .filter_map(|plane| plane.intersect_ray(ray))
            .min_by(|a, b| {
                let da = a.distance_squared(ray.origin);
                let db = b.distance_squared(ray.origin);
                da.total_cmp(&db)
            })
    }
}

impl PickScene for Vec<Plane> {
    fn pick(&self, ray: &Ray) -> Option<DVec3> {
        self.as_slice().pick(ray)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_and_projection() {
        let plane = Plane::new(DVec3::new(0.0, 0.0, 5.0), DVec3::Z * 3.0).unwrap();
        let point = DVec3::new(1.0, 2.0, 2.0);

        assert_eq!(plane.signed_distance(point), -3.0);
        assert_eq!(plane.distance_to(point), 3.0);
        assert_eq!(plane.project(point), DVec3::new(1.0, 2.0, 5.0));
    }

    #[test]
    fn zero_normal_is_rejected() {
        assert!(Plane::new(DVec3::ZERO, DVec3::ZERO).is_none());
    }

    #[test]
    fn ray_hits_in_front_only() {
        let plane = Plane::new(DVec3::new(0.0, 0.0, -10.0), DVec3::Z).unwrap();

        let forward = Ray::new(DVec3::ZERO, DVec3::new(0.0, 0.0, -2.0));
        assert_eq!(plane.intersect_ray(&forward), Some(DVec3::new(0.0, 0.0, -10.0)));

        let backward = Ray::new(DVec3::ZERO, DVec3::Z);
        assert_eq!(plane.intersect_ray(&backward), None);

        let parallel = Ray::new(DVec3::ZERO, DVec3::X);
        assert_eq!(plane.intersect_ray(&parallel), None);
    }

    #[test]
    fn plane_list_picks_nearest() {
        let planes = vec![
            Plane::new(DVec3::new(0.0, 0.0, -20.0), DVec3::Z).unwrap(),
            Plane::new(DVec3::new(0.0, 0.0, -5.0), DVec3::Z).unwrap(),
        ];
        let ray = Ray::new(DVec3::ZERO, -DVec3::Z);
        assert_eq!(planes.pick(&ray), Some(DVec3::new(0.0, 0.0, -5.0)));
    }
}
