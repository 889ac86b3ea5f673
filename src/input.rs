//! Backend-neutral input events and the viewer state machine.
//!
//! A windowing frontend translates its raw mouse/keyboard callbacks into
//! [`ViewEvent`]s; [`Viewer`] folds them into the view transform and
//! layer set. Every event carries everything it needs, so the whole
//! interaction layer is testable without a window.

use glam::{DVec2, DVec3};

use crate::view::{
    LayerSet, ROT_STEP, ROT_STEP_FINE, ViewTransform, ZOOM_STEP, ZOOM_STEP_FINE,
};

/// Rotation axis for the arrow / page keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// One user interaction, in screen coordinates where it carries a point.
/// `fine` is the modifier for the smaller zoom/rotate increments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ViewEvent {
    ZoomIn { at: DVec2, fine: bool },
    ZoomOut { at: DVec2, fine: bool },
    DragStart { at: DVec2 },
    DragMove { at: DVec2 },
    DragEnd,
    Rotate { axis: Axis, ccw: bool, fine: bool, at: DVec2 },
    ToggleLayer(u8),
    AllLayers,
    Home,
}

/// Interactive state: the view transform, layer visibility and an active
/// drag, if any.
#[derive(Clone, Copy, Debug)]
pub struct Viewer {
    pub view: ViewTransform,
    pub layers: LayerSet,
    drag: Option<DVec2>,
}

impl Viewer {
    pub fn new(view: ViewTransform) -> Self {
        Viewer {
            view,
            layers: LayerSet::all_visible(),
            drag: None,
        }
    }

    pub fn handle(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::ZoomIn { at, fine } => {
                let step = if fine { ZOOM_STEP_FINE } else { ZOOM_STEP };
                self.view.zoom_about(self.view.zoom / step, at);
            }
            ViewEvent::ZoomOut { at, fine } => {
                let step = if fine { ZOOM_STEP_FINE } else { ZOOM_STEP };
                self.view.zoom_about(self.view.zoom * step, at);
            }
            ViewEvent::DragStart { at } => self.drag = Some(at),
            ViewEvent::DragMove { at } => {
                // Moves before a press are ignored.
                if let Some(last) = self.drag {
                    self.view.pan_by(at - last);
                    self.drag = Some(at);
                }
            }
            ViewEvent::DragEnd => self.drag = None,
            ViewEvent::Rotate { axis, ccw, fine, at } => {
                let step = if fine { ROT_STEP_FINE } else { ROT_STEP };
                let amount = if ccw { step } else { -step };
                let delta = match axis {
                    Axis::X => DVec3::new(amount, 0.0, 0.0),
                    Axis::Y => DVec3::new(0.0, amount, 0.0),
                    Axis::Z => DVec3::new(0.0, 0.0, amount),
                };
                self.view.rotate_about(delta, at);
            }
            ViewEvent::ToggleLayer(layer) => self.layers.toggle(layer),
            ViewEvent::AllLayers => self.layers.show_all(),
            ViewEvent::Home => self.view.home(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::dvec2;

    fn viewer() -> Viewer {
        Viewer::new(ViewTransform::new())
    }

    #[test]
    fn wheel_zooms_in_and_out_by_the_step() {
        let mut v = viewer();
        v.handle(ViewEvent::ZoomIn {
            at: DVec2::ZERO,
            fine: false,
        });
        assert_eq!(v.view.zoom, 1.0 / ZOOM_STEP);
        v.handle(ViewEvent::ZoomOut {
            at: DVec2::ZERO,
            fine: false,
        });
        assert!((v.view.zoom - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fine_zoom_uses_the_smaller_step() {
        let mut v = viewer();
        v.handle(ViewEvent::ZoomIn {
            at: DVec2::ZERO,
            fine: true,
        });
        assert_eq!(v.view.zoom, 1.0 / ZOOM_STEP_FINE);
    }

    #[test]
    fn drag_pans_by_screen_delta() {
        let mut v = viewer();
        v.handle(ViewEvent::DragStart { at: dvec2(100.0, 100.0) });
        v.handle(ViewEvent::DragMove { at: dvec2(110.0, 95.0) });
        assert_eq!(v.view.pan, dvec2(10.0, 5.0));
        v.handle(ViewEvent::DragMove { at: dvec2(110.0, 100.0) });
        assert_eq!(v.view.pan, dvec2(10.0, 0.0));
        v.handle(ViewEvent::DragEnd);
        v.handle(ViewEvent::DragMove { at: dvec2(500.0, 500.0) });
        assert_eq!(v.view.pan, dvec2(10.0, 0.0));
    }

    #[test]
    fn rotate_events_pick_their_axis() {
        let mut v = viewer();
        v.handle(ViewEvent::Rotate {
            axis: Axis::X,
            ccw: true,
            fine: false,
            at: DVec2::ZERO,
        });
        assert_eq!(v.view.rot.x, ROT_STEP);
        v.handle(ViewEvent::Rotate {
            axis: Axis::Z,
            ccw: false,
            fine: true,
            at: DVec2::ZERO,
        });
        assert_eq!(v.view.rot.z, 360.0 - ROT_STEP_FINE);
    }

    #[test]
    fn layer_events_toggle_and_restore() {
        let mut v = viewer();
        v.handle(ViewEvent::ToggleLayer(5));
        assert!(!v.layers.visible(5));
        v.handle(ViewEvent::AllLayers);
        assert!(v.layers.visible(5));
    }

    #[test]
    fn home_event_resets_the_view() {
        let mut v = viewer();
        v.handle(ViewEvent::ZoomIn {
            at: dvec2(50.0, 50.0),
            fine: false,
        });
        v.handle(ViewEvent::Home);
        assert_eq!(v.view.zoom, 1.0);
        assert_eq!(v.view.pan, DVec2::ZERO);
    }
}
