use cgmath::{Deg, InnerSpace};
use vantage::camera::{Camera, Projection};
use vantage::pick::{self, PointerNdc, Raycaster};

fn default_camera() -> (Camera, Projection) {
    let camera = Camera::new((0.0, 0.0, 0.0), Deg(90.0), Deg(0.0), 5.0);
    let projection = Projection::new(800, 600, Deg(75.0), 0.1, 1000.0);
    (camera, projection)
}

#[test]
fn ndc_maps_corners_and_center() {
    let top_left = pick::to_ndc(0.0, 0.0, 800.0, 600.0);
    assert_eq!(top_left, PointerNdc { x: -1.0, y: 1.0 });

    let bottom_right = pick::to_ndc(800.0, 600.0, 800.0, 600.0);
    assert_eq!(bottom_right, PointerNdc { x: 1.0, y: -1.0 });

    let center = pick::to_ndc(400.0, 300.0, 800.0, 600.0);
    assert_eq!(center, PointerNdc { x: 0.0, y: 0.0 });
}

#[test]
fn ndc_stays_in_range_inside_the_window() {
    for (x, y) in [(1.0, 1.0), (123.0, 456.0), (799.0, 599.0), (400.0, 1.0)] {
        let ndc = pick::to_ndc(x, y, 800.0, 600.0);
        assert!((-1.0..=1.0).contains(&ndc.x), "x out of range: {:?}", ndc);
        assert!((-1.0..=1.0).contains(&ndc.y), "y out of range: {:?}", ndc);
    }
}

#[test]
fn ndc_y_axis_is_inverted() {
    let near_top = pick::to_ndc(400.0, 30.0, 800.0, 600.0);
    let near_bottom = pick::to_ndc(400.0, 570.0, 800.0, 600.0);
    assert!(near_top.y > 0.0);
    assert!(near_bottom.y < 0.0);
}

#[test]
fn center_pointer_casts_straight_ahead() {
    let (camera, projection) = default_camera();
    let mut raycaster = Raycaster::new();
    raycaster.set_from_camera(PointerNdc { x: 0.0, y: 0.0 }, &camera, &projection);

    let ray = raycaster.ray;
    assert!((ray.origin.x).abs() < 1e-4);
    assert!((ray.origin.y).abs() < 1e-4);
    assert!((ray.origin.z - 5.0).abs() < 1e-4);
    assert!(ray.direction.x.abs() < 1e-3, "direction {:?}", ray.direction);
    assert!(ray.direction.y.abs() < 1e-3, "direction {:?}", ray.direction);
    assert!(
        (ray.direction.z + 1.0).abs() < 1e-3,
        "direction {:?}",
        ray.direction
    );
}

#[test]
fn off_center_pointer_tilts_the_ray() {
    let (camera, projection) = default_camera();
    let mut raycaster = Raycaster::new();

    raycaster.set_from_camera(PointerNdc { x: 0.8, y: 0.0 }, &camera, &projection);
    assert!(raycaster.ray.direction.x > 0.0);

    raycaster.set_from_camera(PointerNdc { x: 0.0, y: -0.8 }, &camera, &projection);
    assert!(raycaster.ray.direction.y < 0.0);
}

#[test]
fn ray_direction_is_normalized() {
    let (camera, projection) = default_camera();
    let mut raycaster = Raycaster::new();
    for (x, y) in [(0.0, 0.0), (1.0, 1.0), (-1.0, 0.3), (0.5, -0.9)] {
        raycaster.set_from_camera(PointerNdc { x, y }, &camera, &projection);
        let len = raycaster.ray.direction.magnitude();
        assert!((len - 1.0).abs() < 1e-5, "length {} for ({}, {})", len, x, y);
    }
}
