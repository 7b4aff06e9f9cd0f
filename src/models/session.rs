//! Viewer session state machine.
//!
//! `Closed` ⇄ `Open { current, start }`. The session only knows the number
//! of items; the viewer widget maps indices to sources.

/// Commands the viewer accepts from its controls and the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    Next,
    Prev,
    Close,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerState {
    Closed,
    Open { current: usize, start: usize },
}

/// Result of applying a command, so the widget knows what to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Nothing changed.
    None,
    /// The active item moved to this index.
    Moved(usize),
    /// The session ended.
    Closed,
}

#[derive(Debug, Clone)]
pub struct ViewerSession {
    state: ViewerState,
    len: usize,
}

impl Default for ViewerSession {
    fn default() -> Self {
        Self::new(0)
    }
}

impl ViewerSession {
    pub fn new(len: usize) -> Self {
        Self {
            state: ViewerState::Closed,
            len,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> ViewerState {
        self.state
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, ViewerState::Open { .. })
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.state {
            ViewerState::Open { current, .. } => Some(current),
            ViewerState::Closed => None,
        }
    }

    #[cfg(test)]
    pub fn start_index(&self) -> Option<usize> {
        match self.state {
            ViewerState::Open { start, .. } => Some(start),
            ViewerState::Closed => None,
        }
    }

    /// Looping (and the prev/next controls) only make sense with more than
    /// one item.
    pub fn loops(&self) -> bool {
        self.len > 1
    }

    /// Replace the item count. Only allowed while closed since indices must
    /// stay stable for the lifetime of a session.
    pub fn set_len(&mut self, len: usize) -> bool {
        if self.is_open() {
            return false;
        }
        self.len = len;
        true
    }

    /// Start a fresh session at `start`, clamped into range. Any previous
    /// position is discarded. Returns `false` for an empty catalog, which
    /// cannot be opened.
    pub fn open(&mut self, start: usize) -> bool {
        if self.len == 0 {
            self.state = ViewerState::Closed;
            return false;
        }
        let start = start.min(self.len - 1);
        self.state = ViewerState::Open {
            current: start,
            start,
        };
        true
    }

    pub fn close(&mut self) -> Transition {
        match self.state {
            ViewerState::Open { .. } => {
                self.state = ViewerState::Closed;
                Transition::Closed
            }
            ViewerState::Closed => Transition::None,
        }
    }

    pub fn next(&mut self) -> Transition {
        self.step(1)
    }

    pub fn prev(&mut self) -> Transition {
        self.step(-1)
    }

    pub fn apply(&mut self, command: ViewerCommand) -> Transition {
        match command {
            ViewerCommand::Next => self.next(),
            ViewerCommand::Prev => self.prev(),
            ViewerCommand::Close => self.close(),
        }
    }

    fn step(&mut self, delta: isize) -> Transition {
        let ViewerState::Open { current, start } = self.state else {
            return Transition::None;
        };
        if !self.loops() {
            return Transition::None;
        }
        let len = self.len as isize;
        let next = (current as isize + delta).rem_euclid(len) as usize;
        self.state = ViewerState::Open {
            current: next,
            start,
        };
        Transition::Moved(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaKind, RenderSpec};

    #[test]
    fn test_open_sets_current_to_start() {
        for len in 1..6 {
            for k in 0..len {
                let mut session = ViewerSession::new(len);
                assert!(session.open(k));
                assert_eq!(session.current_index(), Some(k));
                assert_eq!(session.start_index(), Some(k));
            }
        }
    }

    #[test]
    fn test_next_is_cyclic_with_period_len() {
        for len in 2..7 {
            for k in 0..len {
                let mut session = ViewerSession::new(len);
                session.open(k);
                for _ in 0..len {
                    session.next();
                }
                assert_eq!(session.current_index(), Some(k));
            }
        }
    }

    #[test]
    fn test_prev_wraps_backwards() {
        let mut session = ViewerSession::new(3);
        session.open(0);
        assert_eq!(session.prev(), Transition::Moved(2));
        assert_eq!(session.prev(), Transition::Moved(1));
        assert_eq!(session.next(), Transition::Moved(2));
        assert_eq!(session.next(), Transition::Moved(0));
    }

    #[test]
    fn test_single_item_never_moves() {
        let mut session = ViewerSession::new(1);
        session.open(0);
        assert!(!session.loops());
        assert_eq!(session.next(), Transition::None);
        assert_eq!(session.prev(), Transition::None);
        assert_eq!(session.current_index(), Some(0));
    }

    #[test]
    fn test_empty_catalog_navigation_is_noop() {
        let mut session = ViewerSession::new(0);
        assert!(!session.open(0));
        assert!(!session.is_open());
        assert_eq!(session.next(), Transition::None);
        assert_eq!(session.prev(), Transition::None);
        assert_eq!(session.current_index(), None);
    }

    #[test]
    fn test_reopen_does_not_leak_previous_index() {
        let mut session = ViewerSession::new(5);
        session.open(1);
        session.next();
        session.next();
        assert_eq!(session.current_index(), Some(3));
        assert_eq!(session.close(), Transition::Closed);
        assert_eq!(session.current_index(), None);

        session.open(4);
        assert_eq!(session.current_index(), Some(4));

        session.close();
        session.open(1);
        assert_eq!(session.current_index(), Some(1));
    }

    #[test]
    fn test_close_only_once() {
        let mut session = ViewerSession::new(2);
        assert_eq!(session.close(), Transition::None);
        session.open(0);
        assert_eq!(session.apply(ViewerCommand::Close), Transition::Closed);
        assert_eq!(session.apply(ViewerCommand::Close), Transition::None);
    }

    #[test]
    fn test_navigation_ignored_while_closed() {
        let mut session = ViewerSession::new(4);
        assert_eq!(session.next(), Transition::None);
        assert_eq!(session.state(), ViewerState::Closed);
    }

    #[test]
    fn test_open_clamps_out_of_range_start() {
        let mut session = ViewerSession::new(3);
        session.open(10);
        assert_eq!(session.current_index(), Some(2));
    }

    #[test]
    fn test_len_is_fixed_while_open() {
        let mut session = ViewerSession::new(3);
        session.open(0);
        assert!(!session.set_len(1));
        assert_eq!(session.len(), 3);
        session.close();
        assert!(session.set_len(1));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_mixed_catalog_example() {
        let sources = ["a.jpeg", "b.jpeg", "c.mp4"];
        let mut session = ViewerSession::new(sources.len());
        session.open(2);
        let current = session.current_index().unwrap();
        let kind = MediaKind::infer(sources[current]);
        assert_eq!(kind, MediaKind::Video);
        let RenderSpec::Video(spec) = kind.render_spec() else {
            panic!("expected video render spec");
        };
        assert!(spec.autoplay && spec.muted && spec.looping);

        assert_eq!(session.apply(ViewerCommand::Next), Transition::Moved(0));
        assert_eq!(
            MediaKind::infer(sources[session.current_index().unwrap()]),
            MediaKind::Image
        );
    }
}
