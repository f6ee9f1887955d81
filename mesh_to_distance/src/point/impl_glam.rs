use super::Point;

impl Point for glam::Vec3 {
    /// Create a new point.
    fn new(x: f32, y: f32, z: f32) -> Self {
        glam::Vec3::new(x, y, z)
    }

    /// Get the x coordinate.
    fn x(&self) -> f32 {
        self.x
    }

    /// Get the y coordinate.
    fn y(&self) -> f32 {
        self.y
    }

    /// Get the z coordinate.
    fn z(&self) -> f32 {
        self.z
    }

    fn get(&self, axis: usize) -> f32 {
        self[axis]
    }

    /// Add two points.
    fn add(&self, other: &Self) -> Self {
        *self + *other
    }
    /// Subtract two points.
    fn sub(&self, other: &Self) -> Self {
        *self - *other
    }
    /// Dot product of two points.
    fn dot(&self, other: &Self) -> f32 {
        glam::Vec3::dot(*self, *other)
    }
    /// Cross product of two points.
    fn cross(&self, other: &Self) -> Self {
        glam::Vec3::cross(*self, *other)
    }
    /// Length of the point.
    fn length(&self) -> f32 {
        glam::Vec3::length(*self)
    }
    /// Distance between two points.
    fn dist(&self, other: &Self) -> f32 {
        glam::Vec3::distance(*self, *other)
    }
    /// Multiply a point by a scalar.
    fn mul(&self, other: f32) -> Self {
        *self * other
    }
    /// Multiply two points by components.
    fn comp_mul(&self, other: &Self) -> Self {
        *self * *other
    }
    /// Divide two points by components.
    fn comp_div(&self, other: &Self) -> Self {
        *self / *other
    }
    fn comp_min(&self, other: &Self) -> Self {
        glam::Vec3::min(*self, *other)
    }
    fn comp_max(&self, other: &Self) -> Self {
        glam::Vec3::max(*self, *other)
    }
}
