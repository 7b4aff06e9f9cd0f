// Pointer-driven 3D tilt for grid tiles
// Values are derived per motion event and stay local to one tile.

use gtk4::graphene;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{BinLayout, EventControllerMotion, Widget};
use std::cell::Cell;

/// Pointer offset divisor; a pointer 25px off-centre gives full tilt.
const POINTER_DIVISOR: f64 = 25.0;
/// Maximum rotation in degrees on either axis.
const MAX_TILT_DEG: f32 = 7.0;
const PERSPECTIVE_PX: f32 = 800.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tilt {
    pub rotate_x: f32,
    pub rotate_y: f32,
}

impl Tilt {
    pub const REST: Self = Self {
        rotate_x: 0.0,
        rotate_y: 0.0,
    };

    /// Tilt for a pointer at (`x`, `y`) inside a `width` x `height` tile.
    pub fn from_pointer(x: f64, y: f64, width: f64, height: f64) -> Self {
        if width <= 0.0 || height <= 0.0 || !x.is_finite() || !y.is_finite() {
            return Self::REST;
        }
        let dx = ((x - width / 2.0) / POINTER_DIVISOR).clamp(-1.0, 1.0) as f32;
        let dy = ((y - height / 2.0) / POINTER_DIVISOR).clamp(-1.0, 1.0) as f32;
        Self {
            rotate_x: dy * MAX_TILT_DEG,
            rotate_y: -dx * MAX_TILT_DEG,
        }
    }

    pub fn is_rest(&self) -> bool {
        *self == Self::REST
    }
}

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct TiltFrameInner {
        pub tilt: Cell<Tilt>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for TiltFrameInner {
        const NAME: &'static str = "KeepsakeTiltFrame";
        type Type = super::TiltFrame;
        type ParentType = Widget;

        fn class_init(klass: &mut Self::Class) {
            klass.set_layout_manager_type::<BinLayout>();
        }
    }

    impl ObjectImpl for TiltFrameInner {
        fn dispose(&self) {
            while let Some(child) = self.obj().first_child() {
                child.unparent();
            }
        }
    }

    impl WidgetImpl for TiltFrameInner {
        fn snapshot(&self, snapshot: &gtk4::Snapshot) {
            let tilt = self.tilt.get();
            if tilt.is_rest() {
                self.parent_snapshot(snapshot);
                return;
            }

            let obj = self.obj();
            let cx = obj.width() as f32 / 2.0;
            let cy = obj.height() as f32 / 2.0;

            snapshot.save();
            snapshot.translate(&graphene::Point::new(cx, cy));
            snapshot.perspective(PERSPECTIVE_PX);
            snapshot.rotate_3d(tilt.rotate_x, &graphene::Vec3::x_axis());
            snapshot.rotate_3d(tilt.rotate_y, &graphene::Vec3::y_axis());
            snapshot.translate(&graphene::Point::new(-cx, -cy));
            self.parent_snapshot(snapshot);
            snapshot.restore();
        }
    }
}

glib::wrapper! {
    pub struct TiltFrame(ObjectSubclass<imp::TiltFrameInner>)
        @extends Widget,
        @implements gtk4::Accessible, gtk4::Buildable, gtk4::ConstraintTarget;
}

impl TiltFrame {
    pub fn new(child: &impl IsA<Widget>) -> Self {
        let frame: Self = glib::Object::builder().build();
        child.set_parent(&frame);
        frame.add_css_class("tilt-frame");
        frame.setup_motion();
        frame
    }

    fn setup_motion(&self) {
        let motion = EventControllerMotion::new();

        let frame_weak = self.downgrade();
        motion.connect_motion(move |_, x, y| {
            if let Some(frame) = frame_weak.upgrade() {
                let tilt =
                    Tilt::from_pointer(x, y, frame.width() as f64, frame.height() as f64);
                frame.set_tilt(tilt);
            }
        });

        let frame_weak = self.downgrade();
        motion.connect_leave(move |_| {
            if let Some(frame) = frame_weak.upgrade() {
                frame.set_tilt(Tilt::REST);
            }
        });

        self.add_controller(motion);
    }

    fn set_tilt(&self, tilt: Tilt) {
        if self.imp().tilt.replace(tilt) != tilt {
            self.queue_draw();
        }
    }
}
