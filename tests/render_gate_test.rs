use vantage::app::SurfaceGate;
use winit::dpi::PhysicalSize;

#[test]
fn no_frame_before_the_first_configuring_resize() {
    let gate = SurfaceGate::default();
    assert!(!gate.is_open());
}

#[test]
fn zero_sized_resizes_keep_the_gate_closed() {
    let mut gate = SurfaceGate::default();
    assert!(!gate.configure(PhysicalSize::new(0, 600)));
    assert!(!gate.configure(PhysicalSize::new(800, 0)));
    assert!(!gate.is_open());
}

#[test]
fn gate_opens_after_a_real_resize_and_stays_open() {
    let mut gate = SurfaceGate::default();
    assert!(gate.configure(PhysicalSize::new(800, 600)));
    assert!(gate.is_open());

    // a later zero-sized resize is rejected but does not close the gate
    assert!(!gate.configure(PhysicalSize::new(0, 0)));
    assert!(gate.is_open());
}
