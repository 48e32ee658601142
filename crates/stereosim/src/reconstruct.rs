//! Perceived 3-D geometry from the two eye images.

use glam::DVec3;
use stereosim_core::math::intersect_rays_xz;
use stereosim_core::{DisplayRecord, Result, StereosimError, VisibleImages, Wireframe};

use crate::viewer::Eyes;

/// What the viewer perceives at one scene vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Perceived {
    /// The two sight lines meet here.
    Point(DVec3),
    /// At least one eye cannot see the vertex.
    Hidden,
    /// The sight lines are parallel or have no depth extent.
    Degenerate,
}

impl Perceived {
    /// The perceived point, if any.
    pub fn point(self) -> Option<DVec3> {
        match self {
            Perceived::Point(p) => Some(p),
            Perceived::Hidden | Perceived::Degenerate => None,
        }
    }
}

/// Perceived position of every vertex, indexed `[object][vertex]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReconstructedScene {
    objects: Vec<Vec<Perceived>>,
}

impl ReconstructedScene {
    /// Perceived vertices of every object.
    pub fn objects(&self) -> &[Vec<Perceived>] {
        &self.objects
    }

    /// A single perceived vertex.
    pub fn get(&self, object: usize, vertex: usize) -> Option<Perceived> {
        self.objects.get(object)?.get(vertex).copied()
    }

    /// Number of vertices perceived at a point.
    pub fn perceived_count(&self) -> usize {
        self.iter().filter(|p| matches!(p, Perceived::Point(_))).count()
    }

    /// Number of degenerate vertices.
    pub fn degenerate_count(&self) -> usize {
        self.iter().filter(|p| matches!(p, Perceived::Degenerate)).count()
    }

    fn iter(&self) -> impl Iterator<Item = &Perceived> {
        self.objects.iter().flatten()
    }

    /// The scene with every vertex moved to its perceived position.
    ///
    /// Vertices without a perceived position become NaN so renderers can
    /// skip them; edges are kept as they are.
    pub fn to_wireframes(&self, scene: &[Wireframe]) -> Result<Vec<Wireframe>> {
        if scene.len() != self.objects.len() {
            return Err(StereosimError::SizeMismatch {
                expected: self.objects.len(),
                actual: scene.len(),
            });
        }
        scene
            .iter()
            .zip(&self.objects)
            .map(|(wireframe, perceived)| {
                if wireframe.len() != perceived.len() {
                    return Err(StereosimError::SizeMismatch {
                        expected: perceived.len(),
                        actual: wireframe.len(),
                    });
                }
                let vertices = perceived
                    .iter()
                    .map(|p| p.point().unwrap_or(DVec3::NAN))
                    .collect();
                Ok(Wireframe::new(vertices, wireframe.edges.clone()))
            })
            .collect()
    }
}

/// Intersects each eye's sight line through its visible display point.
pub fn reconstruct(
    eyes: &Eyes,
    display: &DisplayRecord,
    visible: &VisibleImages,
) -> Result<ReconstructedScene> {
    if visible.view_count() != 2 {
        return Err(StereosimError::SizeMismatch {
            expected: 2,
            actual: visible.view_count(),
        });
    }
    let left_eye = eyes.left().location;
    let right_eye = eyes.right().location;

    let mut objects: Vec<Vec<Perceived>> = visible
        .shape()
        .into_iter()
        .map(Vec::with_capacity)
        .collect();
    for (object, _, left, right) in visible.pairs(0, 1) {
        let perceived = match (left, right) {
            (Some(left), Some(right)) => {
                let left_hit = display.world_point(left);
                let right_hit = display.world_point(right);
                intersect_rays_xz(left_eye, left_hit, right_eye, right_hit)
                    .map_or(Perceived::Degenerate, Perceived::Point)
            }
            _ => Perceived::Hidden,
        };
        objects[object].push(perceived);
    }

    let scene = ReconstructedScene { objects };
    let degenerate = scene.degenerate_count();
    if degenerate > 0 {
        log::warn!("{degenerate} vertices have parallel sight lines");
    }
    log::debug!(
        "reconstructed {} of {} vertices",
        scene.perceived_count(),
        visible.point_count()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::build_display;
    use glam::DVec2;
    use stereosim_core::{DisplayConfig, ViewerConfig};

    fn setup() -> (DisplayRecord, Eyes) {
        let display = build_display(&DisplayConfig::default());
        let eyes = Eyes::new(&ViewerConfig::default(), &display);
        (display, eyes)
    }

    #[test]
    fn test_zero_disparity_lands_on_display() {
        let (display, eyes) = setup();
        let p = DVec2::new(0.2, -0.1);
        let visible = VisibleImages::from_views(vec![vec![vec![Some(p)]], vec![vec![Some(p)]]])
            .unwrap();
        let scene = reconstruct(&eyes, &display, &visible).unwrap();
        let point = scene.get(0, 0).unwrap().point().unwrap();
        assert!((point - display.world_point(p)).length() < 1e-12);
    }

    #[test]
    fn test_uncrossed_disparity_is_behind_display() {
        let (display, eyes) = setup();
        let visible = VisibleImages::from_views(vec![
            vec![vec![Some(DVec2::new(-0.02, 0.0))]],
            vec![vec![Some(DVec2::new(0.02, 0.0))]],
        ])
        .unwrap();
        let scene = reconstruct(&eyes, &display, &visible).unwrap();
        assert!(scene.get(0, 0).unwrap().point().unwrap().z > 0.0);
    }

    #[test]
    fn test_hidden_and_degenerate() {
        let (display, eyes) = setup();
        // Screen parallax equal to the eye separation: parallel sight lines.
        let half = 0.065 / display.half_width() / 2.0;
        let visible = VisibleImages::from_views(vec![
            vec![vec![None, Some(DVec2::new(-half, 0.0))]],
            vec![vec![Some(DVec2::ZERO), Some(DVec2::new(half, 0.0))]],
        ])
        .unwrap();
        let scene = reconstruct(&eyes, &display, &visible).unwrap();
        assert_eq!(scene.get(0, 0), Some(Perceived::Hidden));
        assert_eq!(scene.get(0, 1), Some(Perceived::Degenerate));
        assert_eq!(scene.perceived_count(), 0);
        assert_eq!(scene.degenerate_count(), 1);

        let wireframes = scene
            .to_wireframes(&[Wireframe::new(vec![DVec3::ZERO, DVec3::X], vec![[0, 1]])])
            .unwrap();
        assert!(wireframes[0].vertices[0].is_nan());
        assert_eq!(wireframes[0].edges, vec![[0, 1]]);
    }

    #[test]
    fn test_requires_two_views() {
        let (display, eyes) = setup();
        let visible = VisibleImages::from_views(vec![vec![vec![None]]]).unwrap();
        assert!(reconstruct(&eyes, &display, &visible).is_err());
    }
}
