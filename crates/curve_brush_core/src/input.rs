// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input events delivered by the host and the brush's key bindings.

use serde::{Deserialize, Serialize};

/// Pointer button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseButton {
    /// Primary button, paints
    Left,
    /// Middle button, view navigation
    Middle,
    /// Secondary button
    Right,
}

/// Keyboard key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    /// Escape
    Escape,
    /// Z
    Z,
    /// Y
    Y,
    /// Home (view all)
    Home,
    /// Numpad digit
    Numpad(u8),
    /// Numpad period (view selected)
    NumpadPeriod,
    /// Any other character key
    Char(char),
}

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// Control
    pub ctrl: bool,
    /// Shift
    pub shift: bool,
    /// Alt
    pub alt: bool,
}

impl Modifiers {
    /// Control only
    pub const CTRL: Modifiers = Modifiers { ctrl: true, shift: false, alt: false };
    /// Control and shift
    pub const CTRL_SHIFT: Modifiers = Modifiers { ctrl: true, shift: true, alt: false };
    /// Alt only
    pub const ALT: Modifiers = Modifiers { ctrl: false, shift: false, alt: true };
}

/// Kind of input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Pointer moved
    PointerMove,
    /// Button pressed
    Press(MouseButton),
    /// Button released
    Release(MouseButton),
    /// Scroll wheel
    Wheel {
        /// Scroll amount, positive away from the user
        delta: f32,
    },
    /// Key pressed
    KeyPress(Key),
    /// Key released
    KeyRelease(Key),
}

/// One input event
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    /// Event kind
    pub kind: EventKind,
    /// Pointer position inside the editing region
    pub region_position: [f32; 2],
    /// Pointer position in window coordinates, for UI region hit tests
    pub window_position: [f32; 2],
    /// Modifier keys
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl InputEvent {
    /// Event with the region placed at the window origin
    pub fn new(kind: EventKind, position: [f32; 2]) -> Self {
        Self {
            kind,
            region_position: position,
            window_position: position,
            modifiers: Modifiers::default(),
        }
    }

    /// Pointer move
    pub fn pointer_move(position: [f32; 2]) -> Self {
        Self::new(EventKind::PointerMove, position)
    }

    /// Left button press
    pub fn press(position: [f32; 2]) -> Self {
        Self::new(EventKind::Press(MouseButton::Left), position)
    }

    /// Left button release
    pub fn release(position: [f32; 2]) -> Self {
        Self::new(EventKind::Release(MouseButton::Left), position)
    }

    /// Key press at the origin
    pub fn key(key: Key) -> Self {
        Self::new(EventKind::KeyPress(key), [0.0, 0.0])
    }

    /// Set modifiers
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Set the window position separately from the region position
    pub fn with_window_position(mut self, position: [f32; 2]) -> Self {
        self.window_position = position;
        self
    }

    /// Whether the event is view navigation (pan, zoom, view presets)
    pub fn is_navigation(&self) -> bool {
        match self.kind {
            EventKind::Press(MouseButton::Middle)
            | EventKind::Release(MouseButton::Middle)
            | EventKind::Wheel { .. } => true,
            EventKind::KeyPress(key) | EventKind::KeyRelease(key) => matches!(
                key,
                Key::Home | Key::NumpadPeriod | Key::Numpad(1..=9)
            ),
            _ => false,
        }
    }

    /// History command bound to this event, if any
    pub fn history_command(&self) -> Option<HistoryCommand> {
        let EventKind::KeyPress(key) = self.kind else {
            return None;
        };
        if !self.modifiers.ctrl {
            return None;
        }
        match key {
            Key::Z if self.modifiers.shift => Some(HistoryCommand::Redo),
            Key::Z => Some(HistoryCommand::Undo),
            Key::Y => Some(HistoryCommand::Redo),
            _ => None,
        }
    }
}

/// Brush-local history command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCommand {
    /// Ctrl+Z
    Undo,
    /// Ctrl+Shift+Z or Ctrl+Y
    Redo,
}

/// Kind of editor region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionKind {
    /// The curve editing surface
    Window,
    /// Sidebar
    Ui,
    /// Toolbar
    Tools,
    /// Header bar
    Header,
    /// Channel list
    Channels,
    /// Operator redo panel
    Hud,
}

impl RegionKind {
    /// Whether pointer input over this region belongs to the host UI
    pub fn is_ui(&self) -> bool {
        !matches!(self, Self::Window)
    }
}

/// Axis-aligned region rectangle in window coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UiRegion {
    /// Region kind
    pub kind: RegionKind,
    /// Bottom-left corner
    pub origin: [f32; 2],
    /// Width and height
    pub size: [f32; 2],
}

impl UiRegion {
    /// Create a region
    pub fn new(kind: RegionKind, origin: [f32; 2], size: [f32; 2]) -> Self {
        Self { kind, origin, size }
    }

    /// Half-open containment test
    pub fn contains(&self, [x, y]: [f32; 2]) -> bool {
        x >= self.origin[0]
            && x < self.origin[0] + self.size[0]
            && y >= self.origin[1]
            && y < self.origin[1] + self.size[1]
    }
}

/// First UI region under `window_position`
pub fn ui_region_at(regions: &[UiRegion], window_position: [f32; 2]) -> Option<RegionKind> {
    regions
        .iter()
        .find(|r| r.kind.is_ui() && r.contains(window_position))
        .map(|r| r.kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_bindings() {
        let undo = InputEvent::key(Key::Z).with_modifiers(Modifiers::CTRL);
        let redo_shift = InputEvent::key(Key::Z).with_modifiers(Modifiers::CTRL_SHIFT);
        let redo_y = InputEvent::key(Key::Y).with_modifiers(Modifiers::CTRL);

        assert_eq!(undo.history_command(), Some(HistoryCommand::Undo));
        assert_eq!(redo_shift.history_command(), Some(HistoryCommand::Redo));
        assert_eq!(redo_y.history_command(), Some(HistoryCommand::Redo));
        assert_eq!(InputEvent::key(Key::Z).history_command(), None);

        let released = InputEvent::new(EventKind::KeyRelease(Key::Z), [0.0, 0.0])
            .with_modifiers(Modifiers::CTRL);
        assert_eq!(released.history_command(), None);
    }

    #[test]
    fn test_navigation_events() {
        assert!(InputEvent::new(EventKind::Wheel { delta: 1.0 }, [0.0, 0.0]).is_navigation());
        assert!(InputEvent::new(EventKind::Press(MouseButton::Middle), [0.0, 0.0]).is_navigation());
        assert!(InputEvent::key(Key::Numpad(5)).is_navigation());
        assert!(InputEvent::key(Key::Home).is_navigation());
        assert!(!InputEvent::key(Key::Numpad(0)).is_navigation());
        assert!(!InputEvent::press([0.0, 0.0]).is_navigation());
    }

    #[test]
    fn test_ui_region_hit() {
        let regions = [
            UiRegion::new(RegionKind::Window, [0.0, 0.0], [800.0, 600.0]),
            UiRegion::new(RegionKind::Ui, [600.0, 0.0], [200.0, 600.0]),
        ];
        assert_eq!(ui_region_at(&regions, [700.0, 10.0]), Some(RegionKind::Ui));
        assert_eq!(ui_region_at(&regions, [100.0, 10.0]), None);
        assert_eq!(ui_region_at(&regions, [800.0, 10.0]), None);
    }
}
