use folio_protocol::{Action, Rect, RenderCommand, SectionKind, ThemeToken};

use super::{
    BODY_SIZE, Canvas, Column, HEADING_SIZE, SMALL_SIZE, SectionView, line_height, section,
    text_width,
};
use crate::model::{Certification, Icon, Language, SkillCategory};

const TITLE: &str = "Technical Expertise";
const SUBTITLE: &str = "A comprehensive skill set spanning from software development to cloud infrastructure, with deep expertise in ICT technologies and telecommunications.";

const TAB_HEIGHT: f64 = 44.0;
const CARD_PADDING: f64 = 20.0;
const GAP: f64 = 24.0;

/// Category tabs over a grid of the active category's skills, then
/// certifications and languages.
///
/// Only the active tab's skills are observable nodes.
pub fn render_skills(
    categories: &[SkillCategory],
    certifications: &[Certification],
    languages: &[Language],
    active_tab: usize,
    revealed: &dyn Fn(u32) -> bool,
    top: f64,
    width: f64,
) -> SectionView {
    section(
        top,
        width,
        SectionKind::Skills.anchor(),
        TITLE,
        SUBTITLE,
        ThemeToken::SectionBackground,
        |c, column, y| {
            let mut y = tabs(c, column, y, categories, active_tab);
            if let Some(category) = categories.get(active_tab) {
                y = skill_grid(c, column, y, category, revealed);
            }
            y = certification_grid(c, column, y + 64.0, certifications);
            language_row(c, column, y + 48.0, languages)
        },
    )
}

fn tabs(c: &mut Canvas, column: Column, y: f64, categories: &[SkillCategory], active: usize) -> f64 {
    let widths: Vec<f64> = categories
        .iter()
        .map(|cat| text_width(&cat.title, BODY_SIZE) + 40.0)
        .collect();
    let mut x = column.x;
    let mut y = y;
    let total: f64 = widths.iter().sum::<f64>() + 12.0 * widths.len().saturating_sub(1) as f64;
    if total <= column.w {
        x = column.center() - total / 2.0;
    }
    for (tab, (category, w)) in categories.iter().zip(widths).enumerate() {
        if x + w > column.x + column.w && x > column.x {
            x = column.x;
            y += TAB_HEIGHT + 12.0;
        }
        let color = if tab == active {
            category.accent.token()
        } else {
            ThemeToken::TabInactive
        };
        c.button(
            Rect::new(x, y, w, TAB_HEIGHT),
            color,
            category.title.clone(),
            Some(Action::SelectTab {
                section: SectionKind::Skills,
                tab,
            }),
        );
        x += w + 12.0;
    }
    y + TAB_HEIGHT + 40.0
}

fn skill_grid(
    c: &mut Canvas,
    column: Column,
    y: f64,
    category: &SkillCategory,
    revealed: &dyn Fn(u32) -> bool,
) -> f64 {
    let cols = column.fit(300.0, 3);
    let cells = column.cells(cols, GAP);
    let mut y = y;
    for row in category.skills.chunks(cols) {
        // Uniform row height: measure every card first.
        let bodies: Vec<(Canvas, f64)> = row
            .iter()
            .zip(&cells)
            .map(|(skill, cell)| {
                let mut body = Canvas::new();
                let x = cell.x + CARD_PADDING;
                let w = cell.w - 2.0 * CARD_PADDING;
                let top = y + CARD_PADDING;
                body.button(
                    Rect::new(x, top, 40.0, 40.0),
                    category.accent.token(),
                    skill.icon.glyph().to_string(),
                    None,
                );
                body.text(x + 52.0, top + 10.0, &skill.name, ThemeToken::TextPrimary, HEADING_SIZE - 2.0);
                let bottom = body.paragraph(x, top + 56.0, w, &skill.description, ThemeToken::TextSecondary, BODY_SIZE);
                (body, bottom)
            })
            .collect();
        let row_bottom = bodies.iter().map(|(_, b)| *b).fold(y, f64::max) + CARD_PADDING;
        for ((skill, cell), (body, _)) in row.iter().zip(&cells).zip(bodies) {
            let rect = Rect::new(cell.x, y, cell.w, row_bottom - y);
            c.reveal(skill.id, rect, revealed(skill.id), |c| {
                c.card(rect, ThemeToken::Surface, None);
                c.absorb(body);
            });
        }
        y = row_bottom + GAP;
    }
    y - GAP
}

fn certification_grid(c: &mut Canvas, column: Column, y: f64, certifications: &[Certification]) -> f64 {
    if certifications.is_empty() {
        return y;
    }
    let panel_top = y;
    let panel_index = c.len();
    let inner = Column {
        x: column.x + 32.0,
        w: column.w - 64.0,
    };
    c.centered(column.center(), y + 32.0, "Professional Certifications", ThemeToken::TextPrimary, 24.0);
    let mut y = y + 32.0 + line_height(24.0) + 24.0;

    let cols = inner.fit(260.0, 3);
    let cells = inner.cells(cols, GAP);
    let card_h = 16.0 + 48.0 + 12.0 + 2.0 * line_height(BODY_SIZE) + line_height(SMALL_SIZE) + 8.0 + 28.0 + 16.0;
    for row in certifications.chunks(cols) {
        for (cert, cell) in row.iter().zip(&cells) {
            let rect = Rect::new(cell.x, y, cell.w, card_h);
            c.card(rect, ThemeToken::SurfaceRaised, None);
            let cx = cell.center();
            let mut ty = y + 16.0;
            c.button(
                Rect::new(cx - 24.0, ty, 48.0, 48.0),
                ThemeToken::AccentTeal,
                Icon::Database.glyph().to_string(),
                None,
            );
            ty += 60.0;
            let name = Column {
                x: cell.x + 12.0,
                w: cell.w - 24.0,
            };
            let name_bottom = c.centered_paragraph(name, ty, &cert.name, ThemeToken::TextPrimary, BODY_SIZE);
            ty = name_bottom.max(ty + line_height(BODY_SIZE));
            c.centered(
                cx,
                ty,
                format!("{} \u{2022} {}", cert.issuer, cert.year),
                ThemeToken::TextMuted,
                SMALL_SIZE,
            );
            ty += line_height(SMALL_SIZE) + 8.0;
            if let Some(link) = &cert.link {
                c.button(
                    Rect::new(cx - 70.0, ty, 140.0, 28.0),
                    ThemeToken::Link,
                    "View Certificate",
                    Some(Action::OpenLink { url: link.clone() }),
                );
            }
        }
        y += card_h + GAP;
    }
    let bottom = y - GAP + 32.0;
    c.insert(
        panel_index,
        RenderCommand::fill(
            Rect::new(column.x, panel_top, column.w, bottom - panel_top),
            ThemeToken::SectionBackgroundAlt,
        ),
    );
    bottom
}

fn language_row(c: &mut Canvas, column: Column, y: f64, languages: &[Language]) -> f64 {
    if languages.is_empty() {
        return y;
    }
    let height = 32.0 + line_height(24.0) + 24.0 + line_height(28.0) + line_height(BODY_SIZE) * 2.0 + 32.0;
    c.fill(Rect::new(column.x, y, column.w, height), ThemeToken::SectionBackgroundAlt);
    c.centered(column.center(), y + 32.0, "Languages", ThemeToken::TextPrimary, 24.0);
    let row_y = y + 32.0 + line_height(24.0) + 24.0;
    for (lang, cell) in languages.iter().zip(column.cells(languages.len(), GAP)) {
        c.centered(cell.center(), row_y, &lang.name, lang.accent.token(), 28.0);
        let level = Column {
            x: cell.x + 8.0,
            w: cell.w - 16.0,
        };
        c.centered_paragraph(level, row_y + line_height(28.0), &lang.level, ThemeToken::TextMuted, BODY_SIZE);
    }
    y + height
}

#[cfg(test)]
mod tests {
    use folio_protocol::Point;

    use super::*;
    use crate::content::builtin;
    use crate::views::hit_test;

    fn view(tab: usize, revealed: &dyn Fn(u32) -> bool) -> SectionView {
        let Ok(r) = builtin() else {
            panic!("builtin content failed to parse");
        };
        render_skills(&r.skill_categories, &r.certifications, &r.languages, tab, revealed, 0.0, 1280.0)
    }

    #[test]
    fn nodes_are_the_active_tabs_skills() {
        let Ok(r) = builtin() else {
            panic!("builtin content failed to parse");
        };
        for (tab, category) in r.skill_categories.iter().enumerate() {
            let v = view(tab, &|_| false);
            let ids: Vec<u32> = v.nodes.iter().map(|(id, _)| *id).collect();
            let expected: Vec<u32> = category.skills.iter().map(|s| s.id).collect();
            assert_eq!(ids, expected);
        }
    }

    #[test]
    fn tabs_are_clickable() {
        let v = view(0, &|_| true);
        let tab_rect = v.commands.iter().find_map(|c| match c {
            RenderCommand::DrawRect {
                rect,
                action: Some(Action::SelectTab { tab: 2, .. }),
                ..
            } => Some(*rect),
            _ => None,
        });
        let Some(rect) = tab_rect else {
            panic!("no tab 2 button");
        };
        let hit = hit_test(&v.commands, Point::new(rect.x + 2.0, rect.y + 2.0));
        assert_eq!(
            hit,
            Some(Action::SelectTab {
                section: SectionKind::Skills,
                tab: 2
            })
        );
    }

    #[test]
    fn certificate_links_only_when_present() {
        let Ok(r) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let v = view(0, &|_| true);
        let links = v
            .commands
            .iter()
            .filter(|c| matches!(c, RenderCommand::DrawRect { label: Some(l), .. } if l == "View Certificate"))
            .count();
        let expected = r.certifications.iter().filter(|c| c.link.is_some()).count();
        assert_eq!(links, expected);
    }

    #[test]
    fn out_of_range_tab_shows_no_skills() {
        let v = view(99, &|_| true);
        assert!(v.nodes.is_empty());
    }
}
