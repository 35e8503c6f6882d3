use folio_protocol::{Action, Point, Rect, SectionKind, ThemeToken};

use super::{BODY_SIZE, Canvas, Column, HEADING_SIZE, SMALL_SIZE, SectionView, line_height, section};
use crate::model::Experience;

const TITLE: &str = "Organizational Experience";
const SUBTITLE: &str = "Leadership roles and technical contributions that have shaped my soft skills and ability to drive meaningful impact in academic and professional environments.";

const CARD_PADDING: f64 = 32.0;
const ICON: f64 = 56.0;
const GAP: f64 = 32.0;

/// One card per experience, stacked. The toggle button expands
/// achievements and skills.
pub fn render_experience(
    experiences: &[Experience],
    expanded: Option<u32>,
    revealed: &dyn Fn(u32) -> bool,
    top: f64,
    width: f64,
) -> SectionView {
    section(
        top,
        width,
        SectionKind::Experience.anchor(),
        TITLE,
        SUBTITLE,
        ThemeToken::SectionBackground,
        |c, column, y| {
            let mut y = y;
            for exp in experiences {
                let mut body = Canvas::new();
                let bottom = card_body(&mut body, exp, expanded == Some(exp.id), column, y);
                let rect = Rect::new(column.x, y, column.w, bottom + CARD_PADDING - y);
                c.reveal(exp.id, rect, revealed(exp.id), |c| {
                    c.card(rect, ThemeToken::Surface, None);
                    c.fill(Rect::new(rect.x, rect.y, 4.0, rect.h), exp.accent().token());
                    c.absorb(body);
                });
                y = rect.bottom() + GAP;
            }
            if experiences.is_empty() { y } else { y - GAP }
        },
    )
}

fn card_body(c: &mut Canvas, exp: &Experience, open: bool, column: Column, top: f64) -> f64 {
    let x = column.x + CARD_PADDING;
    let y = top + CARD_PADDING;
    c.button(
        Rect::new(x, y, ICON, ICON),
        exp.accent().token(),
        exp.icon.glyph().to_string(),
        None,
    );

    let tx = x + ICON + 24.0;
    let tw = column.x + column.w - CARD_PADDING - tx;
    let mut ty = c.paragraph(tx, y, tw, &exp.title, ThemeToken::TextPrimary, HEADING_SIZE);
    c.text(tx, ty, &exp.organization, exp.accent().token(), BODY_SIZE + 2.0);
    ty += line_height(BODY_SIZE + 2.0) + 6.0;

    let badges: Vec<(String, ThemeToken)> = exp
        .categories
        .iter()
        .map(|cat| (cat.label().to_string(), cat.accent().token()))
        .collect();
    ty = c.chips(tx, ty, tw, &badges) + 8.0;
    c.text(tx, ty, &exp.period, ThemeToken::TextMuted, SMALL_SIZE);
    ty += line_height(SMALL_SIZE) + 12.0;

    ty = c.paragraph(tx, ty, tw, &exp.description, ThemeToken::TextSecondary, BODY_SIZE) + 12.0;

    let label = if open { "Show Less" } else { "Show More Details" };
    c.button(
        Rect::new(tx, ty, 180.0, 32.0),
        ThemeToken::TabInactive,
        label,
        Some(Action::ToggleItem {
            section: SectionKind::Experience,
            item: exp.id,
        }),
    );
    ty += 32.0;

    if open {
        ty += 16.0;
        c.line(Point::new(tx, ty), Point::new(tx + tw, ty), ThemeToken::Border, 1.0);
        ty += 16.0;
        let halves = Column { x: tx, w: tw }.cells(if tw >= 600.0 { 2 } else { 1 }, 32.0);
        let skills: Vec<(String, ThemeToken)> = exp
            .skills
            .iter()
            .map(|s| (s.clone(), ThemeToken::Chip))
            .collect();
        if let [left, right] = halves.as_slice() {
            c.text(left.x, ty, "Key Achievements", ThemeToken::TextPrimary, HEADING_SIZE - 2.0);
            let a = c.bullets(left.x, ty + line_height(HEADING_SIZE), left.w, &exp.achievements, ThemeToken::AccentGreen, BODY_SIZE);
            c.text(right.x, ty, "Skills Developed", ThemeToken::TextPrimary, HEADING_SIZE - 2.0);
            let s = c.chips(right.x, ty + line_height(HEADING_SIZE), right.w, &skills);
            ty = a.max(s);
        } else {
            c.text(tx, ty, "Key Achievements", ThemeToken::TextPrimary, HEADING_SIZE - 2.0);
            ty = c.bullets(tx, ty + line_height(HEADING_SIZE), tw, &exp.achievements, ThemeToken::AccentGreen, BODY_SIZE) + 12.0;
            c.text(tx, ty, "Skills Developed", ThemeToken::TextPrimary, HEADING_SIZE - 2.0);
            ty = c.chips(tx, ty + line_height(HEADING_SIZE), tw, &skills);
        }
    }
    ty.max(y + ICON)
}

#[cfg(test)]
mod tests {
    use folio_protocol::RenderCommand;

    use super::*;
    use crate::content::builtin;

    fn experiences() -> &'static [Experience] {
        match builtin() {
            Ok(registry) => &registry.experiences,
            Err(e) => panic!("builtin content failed to parse: {e}"),
        }
    }

    fn texts(view: &SectionView) -> Vec<String> {
        view.commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.clone()),
                RenderCommand::DrawRect { label: Some(l), .. } => Some(l.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn collapsed_cards_hide_achievements() {
        let view = render_experience(experiences(), None, &|_| true, 0.0, 1280.0);
        let texts = texts(&view);
        assert!(!texts.iter().any(|t| t == "Key Achievements"));
        assert_eq!(texts.iter().filter(|t| *t == "Show More Details").count(), 3);
    }

    #[test]
    fn expanded_card_lists_achievements_and_skills() {
        let first = &experiences()[0];
        let view = render_experience(experiences(), Some(first.id), &|_| true, 0.0, 1280.0);
        let texts = texts(&view);
        assert!(texts.iter().any(|t| t == "Key Achievements"));
        assert!(texts.iter().any(|t| t == "Show Less"));
        assert!(texts.contains(&first.skills[0]));
    }

    #[test]
    fn category_badges_use_labels() {
        let view = render_experience(experiences(), None, &|_| false, 0.0, 1280.0);
        let texts = texts(&view);
        assert!(texts.iter().any(|t| t == "Leadership"));
        assert!(texts.iter().any(|t| t == "Technical"));
        assert_eq!(view.nodes.len(), 3);
    }
}
