//! Projected image sets.
//!
//! Points are indexed `[view][object][vertex]`, where a view is either a
//! camera of the rig or one of the two eyes. Every view holds the same
//! number of objects, and each object the same number of vertices across
//! views.

use glam::DVec2;

use crate::error::{Result, StereosimError};

/// A point of an image set that may be absent.
pub trait ImagePoint: Copy {
    /// The point, if it is visible and finite.
    fn visible(self) -> Option<DVec2>;
}

impl ImagePoint for DVec2 {
    fn visible(self) -> Option<DVec2> {
        self.is_finite().then_some(self)
    }
}

impl ImagePoint for Option<DVec2> {
    fn visible(self) -> Option<DVec2> {
        self.filter(|p| p.is_finite())
    }
}

/// Points of every view, object and vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageStack<P> {
    views: Vec<Vec<Vec<P>>>,
}

/// Camera images produced by projection.
pub type Images = ImageStack<DVec2>;

/// The two eye images; `None` marks a point the eye cannot see.
pub type VisibleImages = ImageStack<Option<DVec2>>;

impl<P: Copy> ImageStack<P> {
    /// Wraps views after checking they share object and vertex counts.
    pub fn from_views(views: Vec<Vec<Vec<P>>>) -> Result<Self> {
        if let Some(first) = views.first() {
            for view in &views[1..] {
                if view.len() != first.len() {
                    return Err(StereosimError::SizeMismatch {
                        expected: first.len(),
                        actual: view.len(),
                    });
                }
                for (expected, actual) in first.iter().zip(view) {
                    if expected.len() != actual.len() {
                        return Err(StereosimError::SizeMismatch {
                            expected: expected.len(),
                            actual: actual.len(),
                        });
                    }
                }
            }
        }
        Ok(Self { views })
    }

    /// Builds `view_count` views where object `o` has `vertex_counts[o]`
    /// vertices, filling each point with `f(view, object, vertex)`.
    pub fn from_fn(
        view_count: usize,
        vertex_counts: &[usize],
        mut f: impl FnMut(usize, usize, usize) -> P,
    ) -> Self {
        let views = (0..view_count)
            .map(|view| {
                vertex_counts
                    .iter()
                    .enumerate()
                    .map(|(object, &count)| (0..count).map(|vertex| f(view, object, vertex)).collect())
                    .collect()
            })
            .collect();
        Self { views }
    }

    /// Vertex count of every object, in order.
    pub fn shape(&self) -> Vec<usize> {
        self.views
            .first()
            .map(|view| view.iter().map(Vec::len).collect())
            .unwrap_or_default()
    }

    /// Number of views.
    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Number of objects per view.
    pub fn object_count(&self) -> usize {
        self.views.first().map_or(0, Vec::len)
    }

    /// Number of vertices of an object.
    pub fn vertex_count(&self, object: usize) -> usize {
        self.views
            .first()
            .and_then(|view| view.get(object))
            .map_or(0, Vec::len)
    }

    /// Total points per view.
    pub fn point_count(&self) -> usize {
        self.views
            .first()
            .map_or(0, |view| view.iter().map(Vec::len).sum())
    }

    /// All objects of one view.
    pub fn view(&self, view: usize) -> Option<&[Vec<P>]> {
        self.views.get(view).map(Vec::as_slice)
    }

    /// A single point.
    pub fn point(&self, view: usize, object: usize, vertex: usize) -> Option<P> {
        self.views.get(view)?.get(object)?.get(vertex).copied()
    }

    /// Iterates corresponding points of two views as `(object, vertex, a, b)`.
    ///
    /// # Panics
    ///
    /// Panics if either view index is out of range.
    pub fn pairs(&self, a: usize, b: usize) -> impl Iterator<Item = (usize, usize, P, P)> + '_ {
        let first = &self.views[a];
        let second = &self.views[b];
        first
            .iter()
            .zip(second)
            .enumerate()
            .flat_map(|(object, (pa, pb))| {
                pa.iter()
                    .zip(pb)
                    .enumerate()
                    .map(move |(vertex, (&p, &q))| (object, vertex, p, q))
            })
    }
}

impl<P: ImagePoint> ImageStack<P> {
    /// Number of visible points in one view.
    pub fn visible_count(&self, view: usize) -> usize {
        self.views.get(view).map_or(0, |objects| {
            objects
                .iter()
                .flatten()
                .filter(|p| p.visible().is_some())
                .count()
        })
    }
}
