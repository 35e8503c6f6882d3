use folio_protocol::{Action, Point, Rect, RenderCommand, SectionKind, ThemeToken};

use super::{BODY_SIZE, Canvas, Column, HEADING_SIZE, SectionView, line_height, section, text_width};
use crate::content::filter::{FilterTab, TagFilter};
use crate::model::{Icon, Project};

const TITLE: &str = "Featured Projects";
const SUBTITLE: &str = "Explore my portfolio of ICT technology projects, from AI-powered applications to cloud infrastructure. Each project demonstrates practical application of engineering principles and innovative problem-solving.";

/// Technologies shown on a card before "+N more".
pub const CARD_TECH_LIMIT: usize = 3;

const TAB_HEIGHT: f64 = 40.0;
const IMAGE_HEIGHT: f64 = 192.0;
const CARD_PADDING: f64 = 24.0;
const GAP: f64 = 32.0;

const MODAL_MAX_WIDTH: f64 = 896.0;
const MODAL_MARGIN: f64 = 16.0;
const MODAL_HEADER: f64 = 72.0;

/// Filter tabs and a card grid of the projects passing `filter`.
///
/// `projects` is the filtered projection, in registry order; each card's
/// node is keyed by the project id, so reveal state carries across filter
/// changes.
pub fn render_projects(
    projects: &[&Project],
    tabs: &[FilterTab],
    filter: &TagFilter,
    revealed: &dyn Fn(u32) -> bool,
    top: f64,
    width: f64,
) -> SectionView {
    section(
        top,
        width,
        SectionKind::Projects.anchor(),
        TITLE,
        SUBTITLE,
        ThemeToken::SectionBackgroundAlt,
        |c, column, y| {
            let y = filter_tabs(c, column, y, tabs, filter);
            grid(c, column, y, projects, revealed)
        },
    )
}

fn filter_tabs(c: &mut Canvas, column: Column, y: f64, tabs: &[FilterTab], active: &TagFilter) -> f64 {
    let captions: Vec<String> = tabs.iter().map(FilterTab::caption).collect();
    let widths: Vec<f64> = captions.iter().map(|s| text_width(s, BODY_SIZE) + 32.0).collect();
    let total = widths.iter().sum::<f64>() + 16.0 * widths.len().saturating_sub(1) as f64;
    let mut x = if total <= column.w {
        column.center() - total / 2.0
    } else {
        column.x
    };
    let mut y = y;
    for (tab, (caption, w)) in captions.into_iter().zip(widths).enumerate() {
        if x + w > column.x + column.w && x > column.x {
            x = column.x;
            y += TAB_HEIGHT + 12.0;
        }
        let color = if tabs[tab].filter == *active {
            ThemeToken::TabActive
        } else {
            ThemeToken::TabInactive
        };
        c.button(
            Rect::new(x, y, w, TAB_HEIGHT),
            color,
            caption,
            Some(Action::SelectTab {
                section: SectionKind::Projects,
                tab,
            }),
        );
        x += w + 16.0;
    }
    y + TAB_HEIGHT + 48.0
}

fn grid(
    c: &mut Canvas,
    column: Column,
    y: f64,
    projects: &[&Project],
    revealed: &dyn Fn(u32) -> bool,
) -> f64 {
    if projects.is_empty() {
        c.centered(column.center(), y, "No projects in this category yet.", ThemeToken::TextMuted, BODY_SIZE);
        return y + line_height(BODY_SIZE);
    }
    let cols = column.fit(340.0, 3);
    let cells = column.cells(cols, GAP);
    let mut y = y;
    for row in projects.chunks(cols) {
        let bodies: Vec<(Canvas, f64)> = row
            .iter()
            .zip(&cells)
            .map(|(project, cell)| {
                let mut body = Canvas::new();
                let bottom = card_body(&mut body, project, *cell, y);
                (body, bottom)
            })
            .collect();
        let row_bottom = bodies.iter().map(|(_, b)| *b).fold(y, f64::max) + CARD_PADDING;
        for ((project, cell), (body, _)) in row.iter().zip(&cells).zip(bodies) {
            let rect = Rect::new(cell.x, y, cell.w, row_bottom - y);
            c.reveal(project.id, rect, revealed(project.id), |c| {
                c.card(rect, ThemeToken::Surface, None);
                c.absorb(body);
            });
        }
        y = row_bottom + GAP;
    }
    y - GAP
}

fn card_body(c: &mut Canvas, project: &Project, cell: Column, top: f64) -> f64 {
    // Image area stands in for the project screenshot.
    c.button(
        Rect::new(cell.x, top, cell.w, IMAGE_HEIGHT),
        ThemeToken::AccentBlue,
        project.title.clone(),
        None,
    );
    c.button(
        Rect::new(cell.x + cell.w - 56.0, top + 16.0, 40.0, 40.0),
        ThemeToken::SurfaceRaised,
        project.icon.glyph().to_string(),
        None,
    );

    let x = cell.x + CARD_PADDING;
    let w = cell.w - 2.0 * CARD_PADDING;
    let mut y = top + IMAGE_HEIGHT + CARD_PADDING;
    y = c.paragraph(x, y, w, &project.title, ThemeToken::TextPrimary, HEADING_SIZE) + 6.0;
    y = c.paragraph(x, y, w, &project.description, ThemeToken::TextSecondary, BODY_SIZE) + 12.0;

    let mut chips: Vec<(String, ThemeToken)> = project
        .technologies
        .iter()
        .take(CARD_TECH_LIMIT)
        .map(|t| (t.clone(), ThemeToken::Chip))
        .collect();
    if let Some(more) = more_label(project) {
        chips.push((more, ThemeToken::TabInactive));
    }
    y = c.chips(x, y, w, &chips) + 16.0;

    let links: Vec<(Icon, &String)> = [
        (Icon::Github, project.github_url.as_ref()),
        (Icon::Globe, project.other_url.as_ref()),
    ]
    .into_iter()
    .filter_map(|(icon, url)| url.map(|u| (icon, u)))
    .collect();
    let link_w = 40.0;
    let details_w = w - links.len() as f64 * (link_w + 8.0);
    c.button(
        Rect::new(x, y, details_w, 40.0),
        ThemeToken::ButtonPrimary,
        "View Details",
        Some(Action::ToggleItem {
            section: SectionKind::Projects,
            item: project.id,
        }),
    );
    let mut lx = x + details_w + 8.0;
    for (icon, url) in links {
        c.button(
            Rect::new(lx, y, link_w, 40.0),
            ThemeToken::TabInactive,
            icon.glyph().to_string(),
            Some(Action::OpenLink { url: url.clone() }),
        );
        lx += link_w + 8.0;
    }
    y + 40.0
}

/// "+N more" for technologies beyond the card limit.
pub fn more_label(project: &Project) -> Option<String> {
    let hidden = project.technologies.len().saturating_sub(CARD_TECH_LIMIT);
    (hidden > 0).then(|| format!("+{hidden} more"))
}

/// Project detail modal in viewport coordinates, with its body scrolled by
/// `scroll`. Returns the commands and the largest useful scroll offset.
pub fn render_project_modal(project: &Project, viewport: Rect, scroll: f64) -> (Vec<RenderCommand>, f64) {
    let close = Action::CloseDetail {
        section: SectionKind::Projects,
    };
    let w = (viewport.w - 2.0 * MODAL_MARGIN).clamp(0.0, MODAL_MAX_WIDTH);
    let x = viewport.x + (viewport.w - w) / 2.0;
    let h = (viewport.h - 2.0 * MODAL_MARGIN).max(MODAL_HEADER);
    let surface = Rect::new(x, viewport.y + MODAL_MARGIN, w, h);
    let body = Rect::new(
        surface.x,
        surface.y + MODAL_HEADER,
        surface.w,
        (surface.h - MODAL_HEADER).max(0.0),
    );

    let mut content = Canvas::new();
    let content_bottom = modal_body(&mut content, project, body.x + 24.0, body.y + 8.0, body.w - 48.0);
    let max_scroll = (content_bottom + 24.0 - body.bottom()).max(0.0);
    let scroll = scroll.clamp(0.0, max_scroll);

    let mut c = Canvas::new();
    c.push(RenderCommand::BeginGroup {
        id: "project-modal".into(),
        label: Some(project.title.clone()),
    });
    c.button(viewport, ThemeToken::Overlay, String::new(), Some(close.clone()));
    c.push(RenderCommand::DrawRect {
        rect: surface,
        color: ThemeToken::ModalSurface,
        border_color: Some(ThemeToken::Border),
        label: None,
        action: None,
    });
    c.text(surface.x + 24.0, surface.y + 20.0, &project.title, ThemeToken::TextPrimary, 24.0);
    c.button(
        Rect::new(surface.right() - 56.0, surface.y + 16.0, 40.0, 40.0),
        ThemeToken::TabInactive,
        "\u{2715}",
        Some(close),
    );
    c.line(
        Point::new(surface.x, body.y),
        Point::new(surface.right(), body.y),
        ThemeToken::Border,
        1.0,
    );
    c.push(RenderCommand::SetClip { rect: body });
    c.push(RenderCommand::translate(0.0, -scroll));
    c.absorb(content);
    c.push(RenderCommand::PopTransform);
    c.push(RenderCommand::ClearClip);
    c.push(RenderCommand::EndGroup);
    (c.commands, max_scroll)
}

fn modal_body(c: &mut Canvas, project: &Project, x: f64, y: f64, w: f64) -> f64 {
    c.button(
        Rect::new(x, y, w, 256.0),
        ThemeToken::AccentBlue,
        project.icon.glyph().to_string(),
        None,
    );
    let mut y = y + 256.0 + 24.0;
    y = c.paragraph(x, y, w, &project.long_description, ThemeToken::TextSecondary, BODY_SIZE + 2.0) + 24.0;

    let lists = [
        ("Key Features", &project.features, ThemeToken::AccentBlue),
        ("Technical Challenges", &project.challenges, ThemeToken::AccentOrange),
    ];
    if w >= 600.0 {
        let halves = Column { x, w }.cells(2, 32.0);
        let mut bottom = y;
        for (half, (title, items, bullet)) in halves.into_iter().zip(lists) {
            c.text(half.x, y, title, ThemeToken::TextPrimary, HEADING_SIZE - 2.0);
            let end = c.bullets(half.x, y + line_height(HEADING_SIZE), half.w, items, bullet, BODY_SIZE);
            bottom = bottom.max(end);
        }
        y = bottom + 16.0;
    } else {
        for (title, items, bullet) in lists {
            c.text(x, y, title, ThemeToken::TextPrimary, HEADING_SIZE - 2.0);
            y = c.bullets(x, y + line_height(HEADING_SIZE), w, items, bullet, BODY_SIZE) + 16.0;
        }
    }

    c.text(x, y, "Results & Impact", ThemeToken::TextPrimary, HEADING_SIZE - 2.0);
    y = c.bullets(x, y + line_height(HEADING_SIZE), w, &project.results, ThemeToken::AccentGreen, BODY_SIZE) + 16.0;

    c.text(x, y, "Technologies Used", ThemeToken::TextPrimary, HEADING_SIZE - 2.0);
    let chips: Vec<(String, ThemeToken)> = project
        .technologies
        .iter()
        .map(|t| (t.clone(), ThemeToken::Chip))
        .collect();
    c.chips(x, y + line_height(HEADING_SIZE), w, &chips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin;
    use crate::content::filter::{filter_items, filter_tabs};
    use crate::views::hit_test;

    fn render(filter: &TagFilter) -> SectionView {
        let Ok(r) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let shown = filter_items(&r.projects, filter);
        let tabs = filter_tabs(&r.projects, &r.project_filters);
        render_projects(&shown, &tabs, filter, &|_| true, 0.0, 1280.0)
    }

    fn labels(commands: &[RenderCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawRect { label: Some(l), .. } => Some(l.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn filter_tabs_carry_counts() {
        let view = render(&TagFilter::All);
        let labels = labels(&view.commands);
        assert!(labels.contains(&"All Projects (4)"));
        assert!(labels.contains(&"Cloud Computing (2)"));
    }

    #[test]
    fn cloud_filter_shows_projects_two_and_three() {
        let view = render(&TagFilter::from_tag("cloud"));
        let ids: Vec<u32> = view.nodes.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn cards_cap_technologies() {
        let Ok(r) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let Some(wide) = r.projects.iter().find(|p| p.technologies.len() > CARD_TECH_LIMIT) else {
            panic!("expected a project with many technologies");
        };
        let view = render(&TagFilter::All);
        let labels = labels(&view.commands);
        let more = format!("+{} more", wide.technologies.len() - CARD_TECH_LIMIT);
        assert!(labels.contains(&more.as_str()));
        assert!(!labels.contains(&wide.technologies[CARD_TECH_LIMIT].as_str()));
    }

    #[test]
    fn modal_close_and_surface_hits() {
        let Ok(r) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let viewport = Rect::new(0.0, 0.0, 1280.0, 720.0);
        let (commands, max_scroll) = render_project_modal(&r.projects[0], viewport, 0.0);
        assert!(max_scroll > 0.0);
        let close = Some(Action::CloseDetail {
            section: SectionKind::Projects,
        });
        // Outside the surface: overlay closes.
        assert_eq!(hit_test(&commands, Point::new(5.0, 360.0)), close);
        // Inside the surface body: nothing.
        assert_eq!(hit_test(&commands, Point::new(640.0, 400.0)), None);
        let texts = commands.iter().any(|c| {
            matches!(c, RenderCommand::DrawText { text, .. } if text == "Technologies Used")
        });
        assert!(texts);
    }

    #[test]
    fn modal_scroll_is_clamped() {
        let Ok(r) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let viewport = Rect::new(0.0, 0.0, 1280.0, 720.0);
        let (_, max_scroll) = render_project_modal(&r.projects[0], viewport, 0.0);
        let (commands, _) = render_project_modal(&r.projects[0], viewport, 1e9);
        assert!(commands.contains(&RenderCommand::translate(0.0, -max_scroll)));
    }
}
