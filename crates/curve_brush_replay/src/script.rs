// SPDX-License-Identifier: MIT OR Apache-2.0
//! Replay script format.
//!
//! A script is a RON document describing the brush settings, the editor
//! view, the curves to paint and a list of timestamped input actions:
//!
//! ```ron
//! ReplayScript(
//!     settings: (mode: Flatten, strength: 1.0, radius: 200.0),
//!     seed: Some(7),
//!     curves: [(name: "location.x", points: [(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)])],
//!     events: [
//!         (at_ms: 0, action: Press((1.0, 5.0))),
//!         (at_ms: 40, action: Move((1.0, 5.0))),
//!         (at_ms: 80, action: Release((1.0, 5.0))),
//!     ],
//! )
//! ```

use crate::error::{ReplayError, Result};
use curve_brush_core::{
    BrushSettings, Curve, CurveSet, EventKind, InputEvent, Key, Modifiers, UiRegion, View2d,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A curve given as plain points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    /// Curve name
    pub name: String,
    /// `(time, value)` control points
    pub points: Vec<(f32, f32)>,
    /// Hidden curves are never painted
    #[serde(default)]
    pub hidden: bool,
    /// Indices of selected keyframes
    #[serde(default)]
    pub selected: Vec<usize>,
}

impl CurveSpec {
    /// Build the curve, with computed handles
    pub fn build(&self) -> Curve {
        let mut curve = Curve::from_points(self.name.clone(), &self.points);
        curve.hidden = self.hidden;
        for &index in &self.selected {
            if let Some(keyframe) = curve.keyframes.get_mut(index) {
                keyframe.selected = true;
            } else {
                tracing::warn!("Curve {:?} has no keyframe {index} to select", self.name);
            }
        }
        curve
    }
}

/// Scripted input, positions in region pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScriptAction {
    /// Pointer move
    Move([f32; 2]),
    /// Left button press
    Press([f32; 2]),
    /// Left button release
    Release([f32; 2]),
    /// Key press without modifiers
    Key(Key),
    /// Ctrl+Z
    Undo,
    /// Ctrl+Shift+Z
    Redo,
    /// Scroll wheel at a position
    Wheel([f32; 2], f32),
    /// Fully specified event
    Event(InputEvent),
}

impl ScriptAction {
    /// Input event delivered to the controller
    pub fn to_event(&self, last_position: [f32; 2]) -> InputEvent {
        match *self {
            Self::Move(position) => InputEvent::pointer_move(position),
            Self::Press(position) => InputEvent::press(position),
            Self::Release(position) => InputEvent::release(position),
            Self::Key(key) => InputEvent::new(EventKind::KeyPress(key), last_position),
            Self::Undo => InputEvent::new(EventKind::KeyPress(Key::Z), last_position)
                .with_modifiers(Modifiers::CTRL),
            Self::Redo => InputEvent::new(EventKind::KeyPress(Key::Z), last_position)
                .with_modifiers(Modifiers::CTRL_SHIFT),
            Self::Wheel(position, delta) => InputEvent::new(EventKind::Wheel { delta }, position),
            Self::Event(event) => event,
        }
    }
}

/// An action at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    /// Milliseconds since the start of the replay
    pub at_ms: u64,
    /// What happens
    pub action: ScriptAction,
}

/// A complete replay
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    /// Brush settings
    pub settings: BrushSettings,
    /// Editor view
    pub view: View2d,
    /// Noise seed; `None` draws from the thread generator
    pub seed: Option<u64>,
    /// Curves to paint
    pub curves: Vec<CurveSpec>,
    /// Host UI regions, in window coordinates
    pub regions: Vec<UiRegion>,
    /// Actions in time order
    pub events: Vec<TimedEvent>,
}

impl ReplayScript {
    /// Parse a script from RON
    pub fn from_ron_str(content: &str) -> Result<Self> {
        let script: ReplayScript = ron::from_str(content)?;
        script.check_order()?;
        Ok(script)
    }

    /// Load a script file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    /// Build the curve set to paint on
    pub fn build_curves(&self) -> CurveSet {
        self.curves.iter().map(CurveSpec::build).collect()
    }

    fn check_order(&self) -> Result<()> {
        for (index, pair) in self.events.windows(2).enumerate() {
            if pair[1].at_ms < pair[0].at_ms {
                return Err(ReplayError::OutOfOrder {
                    index: index + 1,
                    at_ms: pair[1].at_ms,
                    previous_ms: pair[0].at_ms,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_brush_core::{BrushMode, MouseButton};

    const SCRIPT: &str = r#"
        ReplayScript(
            settings: (mode: Flatten, strength: 1.0, radius: 200.0),
            seed: Some(7),
            curves: [
                (name: "location.x", points: [(0.0, 0.0), (1.0, 10.0), (2.0, 0.0)], selected: [1, 9]),
                (name: "location.y", points: [(0.0, 1.0)], hidden: true),
            ],
            events: [
                (at_ms: 0, action: Press((1.0, 5.0))),
                (at_ms: 40, action: Move((1.0, 5.0))),
                (at_ms: 80, action: Release((1.0, 5.0))),
                (at_ms: 90, action: Undo),
            ],
        )
    "#;

    #[test]
    fn test_parse_script() {
        let script = ReplayScript::from_ron_str(SCRIPT).unwrap();
        assert_eq!(script.settings.mode, BrushMode::Flatten);
        assert_eq!(script.settings.iterations, 1);
        assert_eq!(script.view, View2d::default());
        assert_eq!(script.seed, Some(7));
        assert_eq!(script.events.len(), 4);
        assert!(script.regions.is_empty());

        let set = script.build_curves();
        let curves: Vec<_> = set.curves().collect();
        assert_eq!(curves.len(), 2);
        assert!(curves[0].keyframes[1].selected);
        assert!(!curves[0].keyframes[0].selected);
        assert!(curves[1].hidden);
    }

    #[test]
    fn test_out_of_order_events_rejected() {
        let content = r#"(events: [
            (at_ms: 50, action: Move((0.0, 0.0))),
            (at_ms: 10, action: Move((0.0, 0.0))),
        ])"#;
        assert!(matches!(
            ReplayScript::from_ron_str(content),
            Err(ReplayError::OutOfOrder { index: 1, at_ms: 10, previous_ms: 50 })
        ));
    }

    #[test]
    fn test_actions_to_events() {
        let undo = ScriptAction::Undo.to_event([3.0, 4.0]);
        assert_eq!(undo.region_position, [3.0, 4.0]);
        assert!(undo.history_command().is_some());

        let press = ScriptAction::Press([1.0, 2.0]).to_event([0.0, 0.0]);
        assert_eq!(press.kind, EventKind::Press(MouseButton::Left));
        assert_eq!(press.window_position, [1.0, 2.0]);

        assert!(ScriptAction::Wheel([0.0, 0.0], -1.0).to_event([0.0, 0.0]).is_navigation());
    }

    #[test]
    fn test_missing_file() {
        let result = ReplayScript::load(Path::new("/nonexistent/script.ron"));
        assert!(matches!(result, Err(ReplayError::Io { .. })));
    }
}
