#[cfg(feature = "glam")]
mod impl_glam;

mod impl_array;

/// Point is the trait that represents a point (or vector) in 3D space.
/// It is an abstraction over the type of point used in the client math library.
///
/// Only `new`, `x`, `y` and `z` are required.
/// The other methods have default implementations built on top of them
/// and are provided so math libraries can plug in their optimized versions.
pub trait Point: Sized + Copy + Sync + Send {
    /// Create a new point.
    fn new(x: f32, y: f32, z: f32) -> Self;

    /// Get the x coordinate.
    fn x(&self) -> f32;
    /// Get the y coordinate.
    fn y(&self) -> f32;
    /// Get the z coordinate.
    fn z(&self) -> f32;

    /// Get the coordinate of an axis (0 = x, 1 = y, 2 = z).
    fn get(&self, axis: usize) -> f32 {
        match axis {
            0 => self.x(),
            1 => self.y(),
            2 => self.z(),
            _ => panic!("Index out of bounds"),
        }
    }

    /// Add two points.
    fn add(&self, other: &Self) -> Self {
        Self::new(
            self.x() + other.x(),
            self.y() + other.y(),
            self.z() + other.z(),
        )
    }
    /// Subtract two points.
    fn sub(&self, other: &Self) -> Self {
        Self::new(
            self.x() - other.x(),
            self.y() - other.y(),
            self.z() - other.z(),
        )
    }
    /// Dot product of two points.
    fn dot(&self, other: &Self) -> f32 {
        self.x() * other.x() + self.y() * other.y() + self.z() * other.z()
    }
    /// Cross product of two points.
    fn cross(&self, other: &Self) -> Self {
        Self::new(
            self.y() * other.z() - self.z() * other.y(),
            self.z() * other.x() - self.x() * other.z(),
            self.x() * other.y() - self.y() * other.x(),
        )
    }
    /// Squared length of the point.
    fn length2(&self) -> f32 {
        self.dot(self)
    }
    /// Length of the point.
    fn length(&self) -> f32 {
        self.length2().sqrt()
    }
    /// Distance between two points.
    fn dist(&self, other: &Self) -> f32 {
        self.sub(other).length()
    }
    /// Multiply a point by a scalar.
    fn mul(&self, other: f32) -> Self {
        Self::new(self.x() * other, self.y() * other, self.z() * other)
    }
    /// Multiply two points by components.
    fn comp_mul(&self, other: &Self) -> Self {
        Self::new(
            self.x() * other.x(),
            self.y() * other.y(),
            self.z() * other.z(),
        )
    }
    /// Divide two points by components.
    fn comp_div(&self, other: &Self) -> Self {
        Self::new(
            self.x() / other.x(),
            self.y() / other.y(),
            self.z() / other.z(),
        )
    }
    /// Component-wise minimum.
    fn comp_min(&self, other: &Self) -> Self {
        Self::new(
            self.x().min(other.x()),
            self.y().min(other.y()),
            self.z().min(other.z()),
        )
    }
    /// Component-wise maximum.
    fn comp_max(&self, other: &Self) -> Self {
        Self::new(
            self.x().max(other.x()),
            self.y().max(other.y()),
            self.z().max(other.z()),
        )
    }
    /// Clamp each component between the components of `min` and `max`.
    fn clamp(&self, min: &Self, max: &Self) -> Self {
        self.comp_max(min).comp_min(max)
    }
    /// Normalized copy of the point.
    /// The zero vector has no direction and yields NaN components.
    fn normalize(&self) -> Self {
        self.mul(1.0 / self.length())
    }
}

/// `x.clamp(0.0, 1.0)`, named after the shading language builtin.
pub(crate) fn saturate(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// Sign of `x`, with `sign(0) == 0` unlike `f32::signum`.
pub(crate) fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}
