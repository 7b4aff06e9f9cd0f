// Keybindings and swipe mapping for the lightbox viewer
//
// Keybindings (only while the viewer is open):
// - ArrowLeft: Previous item
// - ArrowRight: Next item
// - Escape: Close viewer
//
// Swipes: a mostly horizontal drag of at least SWIPE_THRESHOLD_PX moves to
// the next item (leftwards) or the previous one (rightwards).

use gdk4::Key;
use gtk4::prelude::*;
use gtk4::{EventControllerKey, PropagationPhase, Widget};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::models::ViewerCommand;

/// Map a key to a viewer command.
pub fn command_for_key(key: Key) -> Option<ViewerCommand> {
    match key {
        Key::Left | Key::KP_Left => Some(ViewerCommand::Prev),
        Key::Right | Key::KP_Right => Some(ViewerCommand::Next),
        Key::Escape => Some(ViewerCommand::Close),
        _ => None,
    }
}

/// Horizontal travel a drag needs before it changes items.
pub const SWIPE_THRESHOLD_PX: f64 = 60.0;

/// Map a finished drag (total offset from its start) to a viewer command.
pub fn command_for_swipe(offset_x: f64, offset_y: f64) -> Option<ViewerCommand> {
    if !offset_x.is_finite() || !offset_y.is_finite() {
        return None;
    }
    if offset_x.abs() < SWIPE_THRESHOLD_PX || offset_x.abs() <= offset_y.abs() {
        return None;
    }
    if offset_x < 0.0 {
        Some(ViewerCommand::Next)
    } else {
        Some(ViewerCommand::Prev)
    }
}

/// Tracks whether the listener is attached so repeated opens never stack
/// duplicate handlers.
#[derive(Debug, Default)]
pub struct AttachGuard {
    attached: Cell<bool>,
}

impl AttachGuard {
    /// Returns `true` only on the transition from detached to attached.
    pub fn attach(&self) -> bool {
        !self.attached.replace(true)
    }

    /// Returns `true` only on the transition from attached to detached.
    pub fn detach(&self) -> bool {
        self.attached.replace(false)
    }

    #[cfg(test)]
    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }
}

/// Callback type for viewer commands
pub type CommandCallback = Box<dyn Fn(ViewerCommand)>;

/// Window-level key listener for an open viewer session
pub struct ViewerKeybindings {
    controller: EventControllerKey,
    guard: AttachGuard,
    target: RefCell<Option<Widget>>,
    on_command: Rc<RefCell<Option<CommandCallback>>>,
}

impl ViewerKeybindings {
    pub fn new() -> Self {
        let controller = EventControllerKey::new();
        controller.set_propagation_phase(PropagationPhase::Capture);

        let on_command: Rc<RefCell<Option<CommandCallback>>> = Rc::new(RefCell::new(None));

        let on_command_clone = on_command.clone();
        controller.connect_key_pressed(move |_controller, keyval, _keycode, _state| {
            let Some(command) = command_for_key(keyval) else {
                return glib::Propagation::Proceed;
            };
            if let Some(ref callback) = *on_command_clone.borrow() {
                callback(command);
                return glib::Propagation::Stop;
            }
            glib::Propagation::Proceed
        });

        Self {
            controller,
            guard: AttachGuard::default(),
            target: RefCell::new(None),
            on_command,
        }
    }

    /// Connect callback for viewer commands
    pub fn connect_command<F>(&self, callback: F)
    where
        F: Fn(ViewerCommand) + 'static,
    {
        *self.on_command.borrow_mut() = Some(Box::new(callback));
    }

    /// Start listening on `widget` (typically the toplevel window).
    pub fn attach(&self, widget: &impl IsA<Widget>) {
        if !self.guard.attach() {
            return;
        }
        let widget = widget.as_ref().clone();
        widget.add_controller(self.controller.clone());
        *self.target.borrow_mut() = Some(widget);
        tracing::debug!("Viewer keybindings attached");
    }

    /// Stop listening. Safe to call when not attached.
    pub fn detach(&self) {
        if !self.guard.detach() {
            return;
        }
        if let Some(widget) = self.target.borrow_mut().take() {
            widget.remove_controller(&self.controller);
        }
        tracing::debug!("Viewer keybindings detached");
    }
}

impl Default for ViewerKeybindings {
    fn default() -> Self {
        Self::new()
    }
}
