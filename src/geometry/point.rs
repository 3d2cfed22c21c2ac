use std::sync::{Arc, Mutex, PoisonError};

use crate::foundation::core::Vec3;

/// One addressable light element: a model-space position plus the slot it writes to in the
/// host's output color buffer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GeometryPoint {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
    /// Output color index.
    pub index: usize,
}

impl GeometryPoint {
    /// Create a point.
    pub fn new(x: f64, y: f64, z: f64, index: usize) -> Self {
        Self { x, y, z, index }
    }

    /// Position as a vector.
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Host-side source of the current point layout, in stable order.
pub trait GeometryProvider: Send + Sync {
    /// Snapshot of the current points.
    fn points(&self) -> Arc<[GeometryPoint]>;
}

/// A replaceable, in-memory point layout.
#[derive(Debug, Default)]
pub struct StaticGeometry {
    points: Mutex<Arc<[GeometryPoint]>>,
}

impl StaticGeometry {
    /// Create a layout from `points`.
    pub fn new(points: impl Into<Arc<[GeometryPoint]>>) -> Self {
        Self {
            points: Mutex::new(points.into()),
        }
    }

    /// Swap in a new layout. Callers notify the session with `on_geometry_changed`.
    pub fn replace(&self, points: impl Into<Arc<[GeometryPoint]>>) {
        *self.points.lock().unwrap_or_else(PoisonError::into_inner) = points.into();
    }
}

impl GeometryProvider for StaticGeometry {
    fn points(&self) -> Arc<[GeometryPoint]> {
        Arc::clone(&self.points.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
