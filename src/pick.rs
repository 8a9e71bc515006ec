//! Pointer coordinates and the ray-casting helper.
//!
//! Pointer positions are tracked as normalized device coordinates and fed
//! into a world-space ray on every pointer move. The ray is scaffolding for
//! hit-testing: it is kept aimed but nothing consumes it yet.

use cgmath::{EuclideanSpace, InnerSpace, Point3, SquareMatrix, Vector3, Vector4};

use crate::camera::{Camera, Projection};

/// Pointer position in normalized device coordinates.
///
/// Both axes are in [-1, 1]: x grows left-to-right, y bottom-to-top (inverted
/// from screen coordinates).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerNdc {
    pub x: f32,
    pub y: f32,
}

/// Convert absolute client coordinates into normalized device coordinates.
pub fn to_ndc(x: f64, y: f64, width: f64, height: f64) -> PointerNdc {
    PointerNdc {
        x: ((x / width) * 2.0 - 1.0) as f32,
        y: (-(y / height) * 2.0 + 1.0) as f32,
    }
}

/// A world-space ray with a normalized direction.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

/// Unprojects pointer coordinates into a world-space ray through the camera.
#[derive(Debug)]
pub struct Raycaster {
    pub ray: Ray,
}

impl Raycaster {
    pub fn new() -> Self {
        Self {
            ray: Ray {
                origin: Point3::origin(),
                direction: -Vector3::unit_z(),
            },
        }
    }

    /// Re-aim the ray so it passes from the camera through the pointer.
    ///
    /// The NDC point is pushed onto the far plane and pulled back through the
    /// inverse view-projection. A non-invertible matrix leaves the previous
    /// ray in place.
    pub fn set_from_camera(
        &mut self,
        pointer: PointerNdc,
        camera: &Camera,
        projection: &Projection,
    ) {
        let view_proj = projection.calc_matrix() * camera.view_matrix();
        let Some(inverse) = view_proj.invert() else {
            return;
        };
        let far = inverse * Vector4::new(pointer.x, pointer.y, 1.0, 1.0);
        if far.w.abs() <= f32::EPSILON {
            return;
        }
        let far = Point3::from_homogeneous(far);
        let origin = camera.position();
        self.ray = Ray {
            origin,
            direction: (far - origin).normalize(),
        };
    }
}

impl Default for Raycaster {
    fn default() -> Self {
        Self::new()
    }
}
