//! Scene storage and closest-hit queries.
//!
//! The scene is built once before the first frame and only read while
//! tiles are in flight; workers share it through a plain `&Scene`.

use crate::hittable::{HitRecord, Hittable};
use crate::Sphere;
use raytile_math::{Interval, Ray};
use std::collections::TryReserveError;
use thiserror::Error;

/// Capacity used when a scene is created with a capacity of zero.
pub const DEFAULT_SCENE_CAPACITY: usize = 16;

/// Errors that can occur while populating a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Failed to grow scene storage to {capacity} objects: {source}")]
    Allocation {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Kind tag of a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Sphere,
}

/// A primitive stored in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SceneObject {
    Sphere(Sphere),
}

impl SceneObject {
    pub fn kind(&self) -> ObjectKind {
        match self {
            SceneObject::Sphere(_) => ObjectKind::Sphere,
        }
    }
}

impl From<Sphere> for SceneObject {
    fn from(sphere: Sphere) -> Self {
        SceneObject::Sphere(sphere)
    }
}

impl Hittable for SceneObject {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        match self {
            SceneObject::Sphere(sphere) => sphere.hit(ray, ray_t),
        }
    }
}

/// Growable list of scene objects.
///
/// Capacity doubles when full and halves once a removal leaves the list
/// less than a quarter full.
#[derive(Debug, Clone)]
pub struct Scene {
    objects: Vec<SceneObject>,
    capacity: usize,
}

impl Scene {
    /// Create an empty scene with the default capacity.
    pub fn new() -> SceneResult<Self> {
        Self::with_capacity(0)
    }

    /// Create an empty scene. A capacity of zero selects the default.
    pub fn with_capacity(capacity: usize) -> SceneResult<Self> {
        let capacity = if capacity == 0 {
            DEFAULT_SCENE_CAPACITY
        } else {
            capacity
        };

        let mut objects = Vec::new();
        objects
            .try_reserve_exact(capacity)
            .map_err(|source| SceneError::Allocation { capacity, source })?;

        Ok(Self { objects, capacity })
    }

    /// Append an object, doubling the capacity when the scene is full.
    pub fn add(&mut self, object: impl Into<SceneObject>) -> SceneResult<()> {
        if self.objects.len() >= self.capacity {
            self.resize(self.capacity * 2)?;
        }
        self.objects.push(object.into());
        Ok(())
    }

    /// Remove the object at `index`, shifting later objects down.
    ///
    /// Panics if `index` is out of range.
    pub fn remove(&mut self, index: usize) -> SceneObject {
        assert!(
            index < self.objects.len(),
            "scene index {index} out of range for {} objects",
            self.objects.len()
        );
        let removed = self.objects.remove(index);

        let count = self.objects.len();
        if count > 0 && count < self.capacity / 4 {
            let capacity = self.capacity / 2;
            self.objects.shrink_to(capacity);
            self.capacity = capacity;
        }

        removed
    }

    /// Get the object at `index`.
    ///
    /// Panics if `index` is out of range.
    pub fn object(&self, index: usize) -> &SceneObject {
        assert!(
            index < self.objects.len(),
            "scene index {index} out of range for {} objects",
            self.objects.len()
        );
        &self.objects[index]
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Logical capacity under the doubling/halving policy.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter()
    }

    fn resize(&mut self, capacity: usize) -> SceneResult<()> {
        let additional = capacity.saturating_sub(self.objects.len());
        self.objects
            .try_reserve_exact(additional)
            .map_err(|source| SceneError::Allocation { capacity, source })?;
        self.capacity = capacity;
        Ok(())
    }
}

impl Hittable for Scene {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<HitRecord> {
        let mut closest: Option<HitRecord> = None;
        let mut closest_so_far = ray_t.max;

        for object in &self.objects {
            if let Some(rec) = object.hit(ray, ray_t.with_max(closest_so_far)) {
                closest_so_far = rec.t;
                closest = Some(rec);
            }
        }

        closest
    }
}
