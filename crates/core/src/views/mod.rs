//! Section layouts. Each view lays one section out in page coordinates and
//! reports the bounds of its observable item nodes.

pub mod contact;
pub mod experience;
pub mod hero;
pub mod journey;
pub mod projects;
pub mod skills;
pub mod splash;

use folio_protocol::{Action, Point, Rect, RenderCommand, TextAlign, ThemeToken};

/// Vertical offset of an item that has not been revealed yet.
pub const HIDDEN_OFFSET: f64 = 32.0;

pub const TITLE_SIZE: f64 = 32.0;
pub const SUBTITLE_SIZE: f64 = 16.0;
pub const HEADING_SIZE: f64 = 20.0;
pub const BODY_SIZE: f64 = 14.0;
pub const SMALL_SIZE: f64 = 12.0;

const SECTION_PADDING: f64 = 80.0;
const CHIP_HEIGHT: f64 = 24.0;
const MAX_CONTENT_WIDTH: f64 = 1100.0;
const SIDE_MARGIN: f64 = 24.0;
const LINE_SPACING: f64 = 1.45;
/// Average glyph advance as a fraction of the font size.
const CHAR_WIDTH: f64 = 0.55;

/// One laid-out section.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SectionView {
    pub commands: Vec<RenderCommand>,
    /// Page-space bounds of each observable item, keyed by item id.
    pub nodes: Vec<(u32, Rect)>,
    pub height: f64,
}

/// Horizontal extent of the centered content column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    pub x: f64,
    pub w: f64,
}

impl Column {
    pub fn for_width(width: f64) -> Self {
        let w = (width - 2.0 * SIDE_MARGIN).clamp(0.0, MAX_CONTENT_WIDTH);
        Self {
            x: ((width - w) / 2.0).max(0.0),
            w,
        }
    }

    pub fn center(&self) -> f64 {
        self.x + self.w / 2.0
    }

    /// Split into `n` equal cells separated by `gap`.
    pub fn cells(&self, n: usize, gap: f64) -> Vec<Column> {
        if n == 0 {
            return Vec::new();
        }
        let w = ((self.w - gap * (n as f64 - 1.0)) / n as f64).max(0.0);
        (0..n)
            .map(|i| Column {
                x: self.x + i as f64 * (w + gap),
                w,
            })
            .collect()
    }

    /// Number of grid columns that fit cells at least `min` wide.
    pub fn fit(&self, min: f64, max: usize) -> usize {
        ((self.w / min).floor() as usize).clamp(1, max.max(1))
    }
}

pub fn line_height(size: f64) -> f64 {
    size * LINE_SPACING
}

/// Greedy word wrap using an average glyph width.
pub fn wrap(text: &str, size: f64, width: f64) -> Vec<String> {
    let max_chars = ((width / (size * CHAR_WIDTH)).floor() as usize).max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        let needed = if line.is_empty() {
            word.chars().count()
        } else {
            line.chars().count() + 1 + word.chars().count()
        };
        if needed > max_chars && !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Height taken by `text` wrapped to `width`.
pub fn text_height(text: &str, size: f64, width: f64) -> f64 {
    wrap(text, size, width).len() as f64 * line_height(size)
}

/// Estimated rendered width of a single line.
pub fn text_width(text: &str, size: f64) -> f64 {
    text.chars().count() as f64 * size * CHAR_WIDTH
}

/// Command buffer for one section.
pub(crate) struct Canvas {
    commands: Vec<RenderCommand>,
    nodes: Vec<(u32, Rect)>,
}

impl Canvas {
    pub(crate) fn new() -> Self {
        Self {
            commands: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, cmd: RenderCommand) {
        self.commands.push(cmd);
    }

    pub(crate) fn len(&self) -> usize {
        self.commands.len()
    }

    /// Insert below everything drawn after position `at`.
    pub(crate) fn insert(&mut self, at: usize, cmd: RenderCommand) {
        self.commands.insert(at.min(self.commands.len()), cmd);
    }

    /// Append what `other` drew, e.g. content measured before its card.
    pub(crate) fn absorb(&mut self, other: Canvas) {
        self.commands.extend(other.commands);
        self.nodes.extend(other.nodes);
    }

    pub(crate) fn fill(&mut self, rect: Rect, color: ThemeToken) {
        self.push(RenderCommand::fill(rect, color));
    }

    /// Bordered card surface.
    pub(crate) fn card(&mut self, rect: Rect, color: ThemeToken, action: Option<Action>) {
        self.push(RenderCommand::DrawRect {
            rect,
            color,
            border_color: Some(ThemeToken::Border),
            label: None,
            action,
        });
    }

    pub(crate) fn button(
        &mut self,
        rect: Rect,
        color: ThemeToken,
        label: impl Into<String>,
        action: Option<Action>,
    ) {
        self.push(RenderCommand::DrawRect {
            rect,
            color,
            border_color: None,
            label: Some(label.into()),
            action,
        });
    }

    pub(crate) fn text(&mut self, x: f64, y: f64, text: impl Into<String>, color: ThemeToken, size: f64) {
        self.push(RenderCommand::text(Point::new(x, y), text, color, size));
    }

    pub(crate) fn centered(&mut self, x: f64, y: f64, text: impl Into<String>, color: ThemeToken, size: f64) {
        self.push(RenderCommand::DrawText {
            position: Point::new(x, y),
            text: text.into(),
            color,
            font_size: size,
            align: TextAlign::Center,
        });
    }

    pub(crate) fn line(&mut self, from: Point, to: Point, color: ThemeToken, width: f64) {
        self.push(RenderCommand::DrawLine {
            from,
            to,
            color,
            width,
        });
    }

    /// Wrapped paragraph starting at `y`; returns the y below it.
    pub(crate) fn paragraph(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        text: &str,
        color: ThemeToken,
        size: f64,
    ) -> f64 {
        let mut y = y;
        for line in wrap(text, size, width) {
            self.text(x, y, line, color, size);
            y += line_height(size);
        }
        y
    }

    /// Centered wrapped paragraph; returns the y below it.
    pub(crate) fn centered_paragraph(
        &mut self,
        column: Column,
        y: f64,
        text: &str,
        color: ThemeToken,
        size: f64,
    ) -> f64 {
        let mut y = y;
        for line in wrap(text, size, column.w) {
            self.centered(column.center(), y, line, color, size);
            y += line_height(size);
        }
        y
    }

    /// Bulleted list; returns the y below it.
    pub(crate) fn bullets(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        items: &[String],
        bullet: ThemeToken,
        size: f64,
    ) -> f64 {
        let mut y = y;
        for item in items {
            self.fill(Rect::new(x, y + size * 0.45, 5.0, 5.0), bullet);
            y = self.paragraph(x + 14.0, y, width - 14.0, item, ThemeToken::TextSecondary, size);
            y += 4.0;
        }
        y
    }

    /// Pills laid out left to right, wrapping; returns the y below them.
    pub(crate) fn chips(&mut self, x: f64, y: f64, w: f64, chips: &[(String, ThemeToken)]) -> f64 {
        if chips.is_empty() {
            return y;
        }
        let mut cx = x;
        let mut y = y;
        for (label, color) in chips {
            let cw = text_width(label, SMALL_SIZE) + 24.0;
            if cx + cw > x + w && cx > x {
                cx = x;
                y += CHIP_HEIGHT + 8.0;
            }
            self.button(Rect::new(cx, y, cw, CHIP_HEIGHT), *color, label.clone(), None);
            cx += cw + 8.0;
        }
        y + CHIP_HEIGHT
    }

    /// Section title and subtitle; returns the y below them.
    pub(crate) fn heading(&mut self, column: Column, y: f64, title: &str, subtitle: &str) -> f64 {
        self.centered(column.center(), y, title, ThemeToken::TextPrimary, TITLE_SIZE);
        let y = y + line_height(TITLE_SIZE) + 12.0;
        let sub = Column {
            x: column.x + column.w * 0.1,
            w: column.w * 0.8,
        };
        self.centered_paragraph(sub, y, subtitle, ThemeToken::TextSecondary, SUBTITLE_SIZE) + 40.0
    }

    /// Draw an observable item. Its node is registered under `id` with the
    /// un-shifted `rect`; until revealed it is drawn transparent and
    /// shifted down.
    pub(crate) fn reveal(&mut self, id: u32, rect: Rect, revealed: bool, body: impl FnOnce(&mut Canvas)) {
        self.nodes.push((id, rect));
        if revealed {
            body(self);
            return;
        }
        self.push(RenderCommand::PushOpacity { opacity: 0.0 });
        self.push(RenderCommand::translate(0.0, HIDDEN_OFFSET));
        body(self);
        self.push(RenderCommand::PopTransform);
        self.push(RenderCommand::PopOpacity);
    }

    /// Wrap everything drawn so far in a section group over a full-width
    /// background.
    pub(crate) fn finish(
        self,
        id: &str,
        label: &str,
        background: Rect,
        color: ThemeToken,
    ) -> SectionView {
        let mut commands = Vec::with_capacity(self.commands.len() + 3);
        commands.push(RenderCommand::BeginGroup {
            id: id.into(),
            label: Some(label.into()),
        });
        commands.push(RenderCommand::fill(background, color));
        commands.extend(self.commands);
        commands.push(RenderCommand::EndGroup);
        SectionView {
            commands,
            nodes: self.nodes,
            height: background.h,
        }
    }
}

/// Standard section frame: padding above, heading, then `body` returning
/// the y where its content ends.
pub(crate) fn section(
    top: f64,
    width: f64,
    id: &str,
    title: &str,
    subtitle: &str,
    background: ThemeToken,
    body: impl FnOnce(&mut Canvas, Column, f64) -> f64,
) -> SectionView {
    let column = Column::for_width(width);
    let mut canvas = Canvas::new();
    let y = canvas.heading(column, top + SECTION_PADDING, title, subtitle);
    let bottom = body(&mut canvas, column, y) + SECTION_PADDING;
    canvas.finish(id, title, Rect::new(0.0, top, width, bottom - top), background)
}

/// Text color for a label drawn on top of `fill`.
pub fn label_color(fill: ThemeToken) -> ThemeToken {
    match fill {
        ThemeToken::AccentBlue
        | ThemeToken::AccentGreen
        | ThemeToken::AccentPurple
        | ThemeToken::AccentOrange
        | ThemeToken::AccentTeal
        | ThemeToken::AccentPink
        | ThemeToken::AccentGray
        | ThemeToken::TabActive
        | ThemeToken::ButtonPrimary
        | ThemeToken::ButtonDisabled
        | ThemeToken::TimelineDot => ThemeToken::TextOnAccent,
        ThemeToken::Chip => ThemeToken::ChipText,
        ThemeToken::SuccessBackground => ThemeToken::SuccessText,
        ThemeToken::ErrorBackground => ThemeToken::ErrorText,
        _ => ThemeToken::TextPrimary,
    }
}

/// Action under `point`, in the coordinate space the commands were issued
/// in.
///
/// The topmost rectangle containing the point decides. Rectangles with
/// neither an action nor a border are transparent to clicks, and so is
/// anything drawn at zero opacity (unrevealed items).
pub fn hit_test(commands: &[RenderCommand], point: Point) -> Option<Action> {
    // (tx, ty, sx, sy): page = t + s * local
    let mut stack: Vec<(f64, f64, f64, f64)> = vec![(0.0, 0.0, 1.0, 1.0)];
    let mut hidden = 0usize;
    let mut opacities: Vec<bool> = Vec::new();
    let mut hit: Option<&RenderCommand> = None;
    for cmd in commands {
        let &(tx, ty, sx, sy) = stack.last().unwrap_or(&(0.0, 0.0, 1.0, 1.0));
        match cmd {
            RenderCommand::PushOpacity { opacity } => {
                let transparent = *opacity <= 0.0;
                hidden += usize::from(transparent);
                opacities.push(transparent);
            }
            RenderCommand::PopOpacity => {
                if opacities.pop() == Some(true) {
                    hidden -= 1;
                }
            }
            RenderCommand::PushTransform { translate, scale } => {
                stack.push((tx + sx * translate.x, ty + sy * translate.y, sx * scale.x, sy * scale.y));
            }
            RenderCommand::PopTransform => {
                if stack.len() > 1 {
                    stack.pop();
                }
            }
            RenderCommand::DrawRect {
                rect,
                border_color,
                action,
                ..
            } if hidden == 0 && (action.is_some() || border_color.is_some()) => {
                let placed = Rect::new(tx + sx * rect.x, ty + sy * rect.y, sx * rect.w, sy * rect.h);
                if placed.contains(point) {
                    hit = Some(cmd);
                }
            }
            _ => {}
        }
    }
    match hit {
        Some(RenderCommand::DrawRect { action, .. }) => action.clone(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_protocol::SectionKind;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("one two three four five six", 10.0, 60.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 10, "{line:?}");
        }
        assert_eq!(lines.join(" "), "one two three four five six");
    }

    #[test]
    fn wrap_keeps_overlong_words_whole() {
        assert_eq!(wrap("supercalifragilistic", 10.0, 20.0), vec!["supercalifragilistic"]);
        assert!(wrap("   ", 10.0, 100.0).is_empty());
    }

    #[test]
    fn column_is_centered_and_capped() {
        let col = Column::for_width(1600.0);
        assert_eq!(col.w, MAX_CONTENT_WIDTH);
        assert_eq!(col.center(), 800.0);
        let cells = col.cells(3, 20.0);
        assert_eq!(cells.len(), 3);
        assert!((cells[2].x + cells[2].w - (col.x + col.w)).abs() < 1e-9);
    }

    #[test]
    fn hidden_items_are_transparent_and_shifted() {
        let mut canvas = Canvas::new();
        canvas.reveal(7, Rect::new(0.0, 0.0, 10.0, 10.0), false, |c| {
            c.fill(Rect::new(0.0, 0.0, 10.0, 10.0), ThemeToken::Surface);
        });
        let view = canvas.finish("s", "S", Rect::new(0.0, 0.0, 10.0, 10.0), ThemeToken::Background);
        assert_eq!(view.nodes, vec![(7, Rect::new(0.0, 0.0, 10.0, 10.0))]);
        assert!(view.commands.contains(&RenderCommand::PushOpacity { opacity: 0.0 }));
        assert!(view.commands.contains(&RenderCommand::translate(0.0, HIDDEN_OFFSET)));
    }

    #[test]
    fn revealed_items_draw_plainly() {
        let mut canvas = Canvas::new();
        canvas.reveal(7, Rect::new(0.0, 0.0, 10.0, 10.0), true, |c| {
            c.fill(Rect::new(0.0, 0.0, 10.0, 10.0), ThemeToken::Surface);
        });
        assert!(!canvas
            .commands
            .iter()
            .any(|c| matches!(c, RenderCommand::PushOpacity { .. })));
    }

    #[test]
    fn hit_test_follows_transforms_and_stacking() {
        let toggle = Action::ToggleItem {
            section: SectionKind::Journey,
            item: 1,
        };
        let commands = vec![
            RenderCommand::translate(0.0, -100.0),
            RenderCommand::DrawRect {
                rect: Rect::new(0.0, 100.0, 50.0, 50.0),
                color: ThemeToken::Surface,
                border_color: None,
                label: None,
                action: Some(toggle.clone()),
            },
            // Decoration on top without action or border: transparent.
            RenderCommand::fill(Rect::new(0.0, 100.0, 10.0, 10.0), ThemeToken::TimelineDot),
            RenderCommand::PopTransform,
        ];
        assert_eq!(hit_test(&commands, Point::new(5.0, 5.0)), Some(toggle));
        assert_eq!(hit_test(&commands, Point::new(5.0, 120.0)), None);
    }

    #[test]
    fn bordered_surface_blocks_what_is_below() {
        let commands = vec![
            RenderCommand::DrawRect {
                rect: Rect::new(0.0, 0.0, 100.0, 100.0),
                color: ThemeToken::Overlay,
                border_color: None,
                label: None,
                action: Some(Action::CloseDetail {
                    section: SectionKind::Projects,
                }),
            },
            RenderCommand::DrawRect {
                rect: Rect::new(20.0, 20.0, 60.0, 60.0),
                color: ThemeToken::ModalSurface,
                border_color: Some(ThemeToken::Border),
                label: None,
                action: None,
            },
        ];
        assert_eq!(hit_test(&commands, Point::new(50.0, 50.0)), None);
        assert!(hit_test(&commands, Point::new(5.0, 5.0)).is_some());
    }

    #[test]
    fn unrevealed_items_ignore_clicks() {
        let mut canvas = Canvas::new();
        let action = Action::ToggleItem {
            section: SectionKind::Experience,
            item: 2,
        };
        let rect = Rect::new(0.0, 0.0, 40.0, 40.0);
        canvas.reveal(2, rect, false, |c| {
            c.push(RenderCommand::DrawRect {
                rect,
                color: ThemeToken::Surface,
                border_color: None,
                label: None,
                action: Some(action.clone()),
            });
        });
        // Hidden items are shifted down by HIDDEN_OFFSET.
        let inside = Point::new(10.0, HIDDEN_OFFSET + 10.0);
        assert_eq!(hit_test(&canvas.commands, inside), None);

        let mut canvas = Canvas::new();
        canvas.reveal(2, rect, true, |c| {
            c.push(RenderCommand::DrawRect {
                rect,
                color: ThemeToken::Surface,
                border_color: None,
                label: None,
                action: Some(action.clone()),
            });
        });
        assert_eq!(hit_test(&canvas.commands, Point::new(10.0, 10.0)), Some(action));
    }
}
