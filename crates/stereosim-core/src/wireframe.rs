//! Scene objects as wireframes.
//!
//! A wireframe is a list of vertices plus edges between them, like a curve
//! network. Canonical templates are centered on the origin with a
//! half-extent of one; scene objects place them with rotate, scale and
//! translate.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StereosimError};
use crate::math::rotation_zyx;
use crate::options::SceneObjectConfig;

/// Canonical shape of a scene object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum ObjectShape {
    /// Axis-aligned cube.
    #[default]
    Cube,
    /// Square-based pyramid with its apex on +Y.
    Pyramid,
    /// Regular octahedron.
    Octahedron,
    /// Square in the XY plane, facing the cameras.
    Quad,
    /// Three unit axes from the origin.
    Axes,
    /// User-supplied wireframe.
    Custom {
        vertices: Vec<DVec3>,
        edges: Vec<[u32; 2]>,
    },
}

impl ObjectShape {
    /// Builds the canonical wireframe for this shape.
    pub fn template(&self) -> Wireframe {
        match self {
            ObjectShape::Cube => {
                let vertices = (0..8)
                    .map(|i| {
                        DVec3::new(
                            if i & 1 == 0 { -1.0 } else { 1.0 },
                            if i & 2 == 0 { -1.0 } else { 1.0 },
                            if i & 4 == 0 { -1.0 } else { 1.0 },
                        )
                    })
                    .collect();
                #[rustfmt::skip]
                let edges = vec![
                    [0, 1], [2, 3], [4, 5], [6, 7],
                    [0, 2], [1, 3], [4, 6], [5, 7],
                    [0, 4], [1, 5], [2, 6], [3, 7],
                ];
                Wireframe::new(vertices, edges)
            }
            ObjectShape::Pyramid => Wireframe::new(
                vec![
                    DVec3::new(-1.0, -1.0, -1.0),
                    DVec3::new(1.0, -1.0, -1.0),
                    DVec3::new(1.0, -1.0, 1.0),
                    DVec3::new(-1.0, -1.0, 1.0),
                    DVec3::new(0.0, 1.0, 0.0),
                ],
                vec![[0, 1], [1, 2], [2, 3], [3, 0], [0, 4], [1, 4], [2, 4], [3, 4]],
            ),
            ObjectShape::Octahedron => {
                #[rustfmt::skip]
                let edges = vec![
                    [0, 2], [0, 3], [0, 4], [0, 5],
                    [1, 2], [1, 3], [1, 4], [1, 5],
                    [2, 4], [4, 3], [3, 5], [5, 2],
                ];
                Wireframe::new(
                    vec![
                        DVec3::X,
                        DVec3::NEG_X,
                        DVec3::Y,
                        DVec3::NEG_Y,
                        DVec3::Z,
                        DVec3::NEG_Z,
                    ],
                    edges,
                )
            }
            ObjectShape::Quad => Wireframe::new(
                vec![
                    DVec3::new(-1.0, -1.0, 0.0),
                    DVec3::new(1.0, -1.0, 0.0),
                    DVec3::new(1.0, 1.0, 0.0),
                    DVec3::new(-1.0, 1.0, 0.0),
                ],
                vec![[0, 1], [1, 2], [2, 3], [3, 0]],
            ),
            ObjectShape::Axes => Wireframe::new(
                vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::Z],
                vec![[0, 1], [0, 2], [0, 3]],
            ),
            ObjectShape::Custom { vertices, edges } => {
                Wireframe::new(vertices.clone(), edges.clone())
            }
        }
    }

    /// Checks that custom edges reference existing vertices.
    pub fn validate(&self) -> Result<()> {
        if let ObjectShape::Custom { vertices, edges } = self {
            let count = vertices.len();
            for edge in edges {
                for &index in edge {
                    if index as usize >= count {
                        return Err(StereosimError::SizeMismatch {
                            expected: count,
                            actual: index as usize + 1,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Vertices and edges of one scene object.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Wireframe {
    /// Vertex positions.
    pub vertices: Vec<DVec3>,
    /// Pairs of vertex indices.
    pub edges: Vec<[u32; 2]>,
}

impl Wireframe {
    /// Creates a wireframe from vertices and edges.
    pub fn new(vertices: Vec<DVec3>, edges: Vec<[u32; 2]>) -> Self {
        Self { vertices, edges }
    }

    /// Builds a placed object: rotate (Z, Y, X), then scale, then translate.
    pub fn from_object(object: &SceneObjectConfig) -> Self {
        object
            .shape
            .template()
            .transformed(object.rotation, object.scale, object.position)
    }

    /// Returns a copy with every vertex rotated, scaled and translated.
    #[must_use]
    pub fn transformed(&self, rotation_degrees: DVec3, scale: DVec3, translation: DVec3) -> Self {
        let rotation = rotation_zyx(rotation_degrees);
        let vertices = self
            .vertices
            .iter()
            .map(|&v| (rotation * v) * scale + translation)
            .collect();
        Self {
            vertices,
            edges: self.edges.clone(),
        }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if there are no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounds, or `None` for an empty wireframe.
    pub fn bounding_box(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
        )
    }
}

/// Builds the wireframes of all enabled objects, in order.
pub fn build_scene(objects: &[SceneObjectConfig]) -> Vec<Wireframe> {
    objects
        .iter()
        .filter(|object| object.enabled)
        .map(Wireframe::from_object)
        .collect()
}
