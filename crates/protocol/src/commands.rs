use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::theme::ThemeToken;
use crate::types::{Point, Rect};

/// A single, stateless render instruction.
///
/// The core emits a `Vec<RenderCommand>` for each section. Renderers consume
/// this list sequentially; each command carries all the data it needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RenderCommand {
    /// Draw a filled rectangle, optionally with a centered label and an
    /// action (for hit-testing / clicks).
    DrawRect {
        rect: Rect,
        color: ThemeToken,
        border_color: Option<ThemeToken>,
        label: Option<String>,
        action: Option<Action>,
    },

    /// Draw a single line of text. `position` is the top-left corner for
    /// left alignment, the top-center for center alignment.
    DrawText {
        position: Point,
        text: String,
        color: ThemeToken,
        font_size: f64,
        align: TextAlign,
    },

    /// Draw a line segment.
    DrawLine {
        from: Point,
        to: Point,
        color: ThemeToken,
        width: f64,
    },

    /// Restrict subsequent drawing to a rectangular region.
    SetClip { rect: Rect },

    /// Remove the active clip region.
    ClearClip,

    /// Push an affine transform (applied to all subsequent commands until
    /// the matching `PopTransform`).
    PushTransform { translate: Point, scale: Point },

    /// Pop the most recent transform.
    PopTransform,

    /// Multiply the alpha of subsequent commands until the matching
    /// `PopOpacity`. Used for the hidden state of reveal animations.
    PushOpacity { opacity: f64 },

    PopOpacity,

    /// Begin a logical group (a section, a card). Renderers may use this for
    /// batching, layer separation, or accessibility.
    BeginGroup { id: String, label: Option<String> },

    /// End the current group.
    EndGroup,
}

impl RenderCommand {
    /// Shorthand for an undecorated filled rectangle.
    pub fn fill(rect: Rect, color: ThemeToken) -> Self {
        Self::DrawRect {
            rect,
            color,
            border_color: None,
            label: None,
            action: None,
        }
    }

    pub fn text(
        position: Point,
        text: impl Into<String>,
        color: ThemeToken,
        font_size: f64,
    ) -> Self {
        Self::DrawText {
            position,
            text: text.into(),
            color,
            font_size,
            align: TextAlign::Left,
        }
    }

    pub fn translate(dx: f64, dy: f64) -> Self {
        Self::PushTransform {
            translate: Point::new(dx, dy),
            scale: Point::new(1.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::SectionKind;

    #[test]
    fn actions_survive_json() {
        let cmd = RenderCommand::DrawRect {
            rect: Rect::new(0.0, 0.0, 10.0, 10.0),
            color: ThemeToken::TabActive,
            border_color: None,
            label: Some("Cloud Computing".into()),
            action: Some(Action::SelectTab {
                section: SectionKind::Skills,
                tab: 1,
            }),
        };
        let json = serde_json::to_string(&cmd).unwrap_or_default();
        assert!(json.contains("SelectTab"));
        let back: Option<RenderCommand> = serde_json::from_str(&json).ok();
        assert_eq!(back, Some(cmd));
    }
}
