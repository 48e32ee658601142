//! Pinhole projection of scene vertices onto every camera's image plane.

use glam::{DVec2, DVec3};
use stereosim_core::math::solve3;
use stereosim_core::{CameraRecord, GeometryDegenerate, Images, Wireframe};

/// Images of every camera plus the number of degenerate projections.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Points indexed `[camera][object][vertex]`.
    pub images: Images,
    /// Vertices whose ray ran parallel to an image plane; stored as NaN.
    pub degenerate: usize,
}

/// Projects one world point into normalized image coordinates.
///
/// The ray from the vertex through the pinhole meets the image plane at
/// `location + direction + r·right + u·up`; `(r, u)` is returned. Values
/// outside the frame are valid and simply fall outside the sensor border.
/// Points behind the pinhole project mirrored, as the pinhole model does.
pub fn project_point(camera: &CameraRecord, vertex: DVec3) -> Result<DVec2, GeometryDegenerate> {
    let rd = vertex - camera.location;
    let solution = solve3(-rd, camera.right, camera.up, -camera.direction)
        .map_err(|_| GeometryDegenerate("ray parallel to image plane"))?;
    Ok(DVec2::new(solution.y, solution.z))
}

/// Projects every vertex of every object through every camera.
pub fn project(cameras: &[CameraRecord], scene: &[Wireframe]) -> Projection {
    let shape: Vec<usize> = scene.iter().map(Wireframe::len).collect();
    let mut degenerate = 0;
    let images = Images::from_fn(cameras.len(), &shape, |camera, object, vertex| {
        project_point(&cameras[camera], scene[object].vertices[vertex]).unwrap_or_else(|_| {
            degenerate += 1;
            DVec2::NAN
        })
    });

    if degenerate > 0 {
        log::warn!("{degenerate} projections were degenerate");
    }
    log::debug!(
        "projected {} vertices through {} cameras",
        images.point_count(),
        cameras.len()
    );

    Projection { images, degenerate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::build_rig;
    use stereosim_core::{ObjectShape, RigConfig, RigType};

    fn straight_camera(length: f64) -> CameraRecord {
        CameraRecord::new(
            DVec3::new(0.0, 0.0, -1.0),
            DVec3::new(0.0, 0.0, length),
            DVec3::X,
            DVec3::Y,
            1.5,
            DVec3::ONE,
        )
    }

    #[test]
    fn test_origin_projects_to_center() {
        let rig = build_rig(&RigConfig::new().with_rig_type(RigType::Parallel).with_separation(0.0))
            .unwrap();
        for camera in rig.cameras() {
            let p = project_point(camera, DVec3::ZERO).unwrap();
            assert!(p.length() < 1e-12);
        }
    }

    #[test]
    fn test_similar_triangles() {
        let camera = straight_camera(2.0);
        // One unit right at distance one: twice that on an image plane at two.
        let p = project_point(&camera, DVec3::new(1.0, -0.5, 0.0)).unwrap();
        assert!((p - DVec2::new(2.0, -1.0)).length() < 1e-12);
    }

    #[test]
    fn test_projected_point_lies_on_ray() {
        let camera = CameraRecord::new(
            DVec3::new(0.1, 0.2, -1.0),
            DVec3::new(-0.1, -0.2, 1.5),
            DVec3::new(1.0, 0.0, 0.1),
            DVec3::new(0.0, 1.0, 0.2),
            1.5,
            DVec3::ONE,
        );
        let vertex = DVec3::new(0.3, -0.1, 0.4);
        let p = project_point(&camera, vertex).unwrap();
        let on_plane = camera.image_point(p);
        let ray = (vertex - camera.location).normalize();
        let hit = (on_plane - camera.location).normalize();
        assert!((ray - hit).length() < 1e-12);
    }

    #[test]
    fn test_parallel_ray_is_degenerate() {
        let camera = straight_camera(1.0);
        // Vertex in the pinhole's own plane.
        assert!(project_point(&camera, DVec3::new(1.0, 0.0, -1.0)).is_err());

        let scene = vec![Wireframe::new(vec![DVec3::new(1.0, 0.0, -1.0), DVec3::ZERO], vec![[0, 1]])];
        let projection = project(&[camera], &scene);
        assert_eq!(projection.degenerate, 1);
        assert!(projection.images.point(0, 0, 0).unwrap().is_nan());
        assert!(projection.images.point(0, 0, 1).unwrap().length() < 1e-12);
    }

    #[test]
    fn test_project_shape() {
        let rig = build_rig(&RigConfig::new().with_camera_count(3)).unwrap();
        let scene = vec![ObjectShape::Cube.template(), ObjectShape::Axes.template()];
        let projection = project(rig.cameras(), &scene);
        assert_eq!(projection.images.view_count(), 3);
        assert_eq!(projection.images.shape(), vec![8, 4]);
        assert_eq!(projection.degenerate, 0);
    }
}
