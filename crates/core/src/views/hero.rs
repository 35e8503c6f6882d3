use folio_protocol::{Action, Point, Rect, SectionKind, ThemeToken};

use super::{BODY_SIZE, Canvas, Column, SMALL_SIZE, SectionView, line_height, text_width};
use crate::model::{Icon, Profile};

const NAME_SIZE: f64 = 44.0;
const INTRO_SIZE: f64 = 18.0;
const STAT_SIZE: f64 = 28.0;
const BUTTON_HEIGHT: f64 = 52.0;

/// Hero section: greeting, rotating headline word, intro, personal info,
/// calls to action and stats. Fills at least `min_height` (the viewport).
///
/// `word` is `None` while the rotator is in its blank gap.
pub fn render_hero(
    profile: &Profile,
    word: Option<&str>,
    top: f64,
    width: f64,
    min_height: f64,
) -> SectionView {
    let column = Column::for_width(width);
    let text_col = Column {
        x: column.x + column.w * 0.1,
        w: column.w * 0.8,
    };
    let mut c = Canvas::new();
    let mut y = top + 140.0;

    c.centered(
        column.center(),
        y,
        format!("Hi, I'm {}.", profile.name),
        ThemeToken::TextPrimary,
        NAME_SIZE,
    );
    y += line_height(NAME_SIZE);

    // "Building The" + accent word + caret, centered as one line.
    let lead = "Building The";
    let shown = word.unwrap_or("");
    let total = text_width(lead, NAME_SIZE) + text_width(shown, NAME_SIZE) + text_width("|", NAME_SIZE);
    let mut x = column.center() - total / 2.0;
    c.text(x, y, lead, ThemeToken::TextPrimary, NAME_SIZE);
    x += text_width(lead, NAME_SIZE);
    if !shown.is_empty() {
        c.text(x, y, shown, ThemeToken::AccentBlue, NAME_SIZE);
        x += text_width(shown, NAME_SIZE);
    }
    c.text(x, y, "|", ThemeToken::AccentBlue, NAME_SIZE);
    y += line_height(NAME_SIZE) + 32.0;

    for para in &profile.intro {
        y = c.centered_paragraph(text_col, y, para, ThemeToken::TextSecondary, INTRO_SIZE) + 16.0;
    }
    y += 8.0;

    let info = [
        (Icon::MapPin, profile.birthplace.as_str()),
        (Icon::GraduationCap, profile.school.as_str()),
    ];
    for (cell, (icon, label)) in column.cells(info.len(), 24.0).into_iter().zip(info) {
        c.centered(
            cell.center(),
            y,
            format!("{} {label}", icon.glyph()),
            ThemeToken::TextMuted,
            BODY_SIZE,
        );
    }
    y += line_height(BODY_SIZE) + 32.0;

    let buttons = [
        (
            format!("{} Download CV", Icon::Download.glyph()),
            ThemeToken::ButtonPrimary,
            Action::OpenLink {
                url: profile.cv_url.clone(),
            },
        ),
        (
            format!("{} Get In Touch", Icon::Mail.glyph()),
            ThemeToken::Surface,
            Action::OpenLink {
                url: format!("mailto:{}", profile.email),
            },
        ),
        (
            "View My Work".to_string(),
            ThemeToken::Surface,
            Action::ScrollTo {
                section: SectionKind::Projects,
            },
        ),
    ];
    let row = Column {
        x: column.center() - 330.0_f64.min(column.w / 2.0),
        w: 660.0_f64.min(column.w),
    };
    for (cell, (label, color, action)) in row.cells(buttons.len(), 16.0).into_iter().zip(buttons) {
        c.button(Rect::new(cell.x, y, cell.w, BUTTON_HEIGHT), color, label, Some(action));
    }
    y += BUTTON_HEIGHT + 40.0;

    c.line(
        Point::new(row.x, y),
        Point::new(row.x + row.w, y),
        ThemeToken::Border,
        1.0,
    );
    y += 32.0;
    let stats = row.cells(profile.stats.len(), 32.0);
    for (cell, stat) in stats.into_iter().zip(&profile.stats) {
        c.centered(cell.center(), y, &stat.value, stat.accent.token(), STAT_SIZE);
        c.centered(
            cell.center(),
            y + line_height(STAT_SIZE),
            &stat.label,
            ThemeToken::TextMuted,
            SMALL_SIZE,
        );
    }
    y += line_height(STAT_SIZE) + line_height(SMALL_SIZE) + 80.0;

    let height = (y - top).max(min_height);
    let anchor = SectionKind::Hero.anchor();
    c.finish(
        anchor,
        SectionKind::Hero.title(),
        Rect::new(0.0, top, width, height),
        ThemeToken::Background,
    )
}

#[cfg(test)]
mod tests {
    use folio_protocol::RenderCommand;

    use super::*;
    use crate::content::builtin;

    fn texts(view: &SectionView) -> Vec<&str> {
        view.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn shows_rotating_word_and_no_nodes() {
        let Ok(registry) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let view = render_hero(&registry.profile, Some(" Cloud"), 0.0, 1280.0, 720.0);
        assert!(texts(&view).contains(&" Cloud"));
        assert!(view.nodes.is_empty());
        assert!(view.height >= 720.0);
    }

    #[test]
    fn blank_gap_drops_the_word() {
        let Ok(registry) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let view = render_hero(&registry.profile, None, 0.0, 1280.0, 720.0);
        assert!(!texts(&view).iter().any(|t| t.contains("Networks")));
        assert!(texts(&view).contains(&"Building The"));
    }

    #[test]
    fn cv_button_links_to_cv() {
        let Ok(registry) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let view = render_hero(&registry.profile, None, 0.0, 1280.0, 720.0);
        let has_cv = view.commands.iter().any(|c| {
            matches!(c, RenderCommand::DrawRect { action: Some(Action::OpenLink { url }), .. }
                if *url == registry.profile.cv_url)
        });
        assert!(has_cv);
    }
}
