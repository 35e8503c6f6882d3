use std::f64::consts::TAU;
use std::time::Duration;

use folio_protocol::{Point, Rect, RenderCommand, ThemeToken};

use super::{BODY_SIZE, Canvas, HEADING_SIZE, line_height};
use crate::model::Icon;
use crate::splash::SplashGate;

const RADIUS: f64 = 40.0;
const SEGMENTS: usize = 12;
/// Spinner revolutions per second.
const SPIN: f64 = 1.0;

/// Loading screen filling `viewport`. The spinner angle follows `elapsed`.
pub fn render_splash(viewport: Rect, elapsed: Duration) -> Vec<RenderCommand> {
    let mut c = Canvas::new();
    c.fill(viewport, ThemeToken::SplashBackground);

    let cx = viewport.x + viewport.w / 2.0;
    let cy = viewport.y + viewport.h / 2.0 - 60.0;

    // Ring with a gap at the leading edge, drawn as chords.
    let phase = elapsed.as_secs_f64() * SPIN * TAU;
    for i in 0..SEGMENTS - 3 {
        let a0 = phase + i as f64 * TAU / SEGMENTS as f64;
        let a1 = a0 + TAU / SEGMENTS as f64;
        c.line(
            Point::new(cx + RADIUS * a0.cos(), cy + RADIUS * a0.sin()),
            Point::new(cx + RADIUS * a1.cos(), cy + RADIUS * a1.sin()),
            ThemeToken::SplashSpinner,
            4.0,
        );
    }
    c.centered(cx, cy - 12.0, Icon::Cloud.glyph().to_string(), ThemeToken::SplashSpinner, 24.0);

    let mut y = cy + RADIUS + 32.0;
    c.centered(cx, y, SplashGate::TITLE, ThemeToken::TextOnAccent, HEADING_SIZE + 4.0);
    y += line_height(HEADING_SIZE + 4.0) + 4.0;
    c.centered(cx, y, SplashGate::SUBTITLE, ThemeToken::TextOnAccent, BODY_SIZE + 2.0);
    y += line_height(BODY_SIZE + 2.0) + 16.0;

    // Three icons bouncing out of phase.
    let glyphs = [Icon::Network, Icon::Radio, Icon::Cloud];
    for (i, icon) in glyphs.into_iter().enumerate() {
        let t = elapsed.as_secs_f64() * 2.0 - i as f64 * 0.15;
        let bounce = (t * TAU).sin().max(0.0) * 6.0;
        c.centered(
            cx + (i as f64 - 1.0) * 28.0,
            y - bounce,
            icon.glyph().to_string(),
            ThemeToken::TextOnAccent,
            BODY_SIZE,
        );
    }
    c.commands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_viewport_with_title() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let cmds = render_splash(viewport, Duration::from_millis(250));
        assert_eq!(cmds.first(), Some(&RenderCommand::fill(viewport, ThemeToken::SplashBackground)));
        assert!(cmds.iter().any(|c| matches!(c,
            RenderCommand::DrawText { text, .. } if text == SplashGate::TITLE)));
    }

    #[test]
    fn spinner_moves_with_time() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 600.0);
        let a = render_splash(viewport, Duration::ZERO);
        let b = render_splash(viewport, Duration::from_millis(100));
        assert_ne!(a, b);
    }
}
