use folio_protocol::{Action, Point, Rect, RenderCommand, SectionKind, ThemeToken};

use super::{BODY_SIZE, Canvas, Column, HEADING_SIZE, SMALL_SIZE, SectionView, line_height, section};
use crate::model::JourneyItem;

const TITLE: &str = "My Journey";
const SUBTITLE: &str = "From curious beginner to a new graduate ready to dive into the field - every step has shaped my expertise and passion for ICT technology and telecommunications.";

const CARD_PADDING: f64 = 24.0;
const ITEM_GAP: f64 = 48.0;
const DOT: f64 = 16.0;
/// Below this column width the timeline runs down the left edge.
const TWO_SIDED_MIN: f64 = 760.0;

/// Vertical timeline of journey items, alternating sides on wide layouts.
/// Clicking a card toggles its details.
pub fn render_journey(
    items: &[JourneyItem],
    expanded: Option<u32>,
    revealed: &dyn Fn(u32) -> bool,
    top: f64,
    width: f64,
) -> SectionView {
    section(
        top,
        width,
        SectionKind::Journey.anchor(),
        TITLE,
        SUBTITLE,
        ThemeToken::SectionBackgroundAlt,
        |c, column, y| timeline(c, column, y, items, expanded, revealed),
    )
}

fn timeline(
    c: &mut Canvas,
    column: Column,
    start: f64,
    items: &[JourneyItem],
    expanded: Option<u32>,
    revealed: &dyn Fn(u32) -> bool,
) -> f64 {
    let two_sided = column.w >= TWO_SIDED_MIN;
    let axis = if two_sided {
        column.center()
    } else {
        column.x + DOT
    };
    let card_w = if two_sided {
        column.w * 5.0 / 12.0
    } else {
        column.w - 3.0 * DOT
    };

    // The line goes down first so cards and dots draw over it.
    let line_at = c.len();
    let mut y = start;
    for (index, item) in items.iter().enumerate() {
        let x = match (two_sided, index % 2 == 0) {
            (true, true) => axis - 32.0 - card_w,
            (true, false) => axis + 32.0,
            (false, _) => axis + 2.0 * DOT,
        };
        let open = expanded == Some(item.id);
        let mut body = Canvas::new();
        let bottom = card_body(&mut body, item, open, x + CARD_PADDING, y + CARD_PADDING, card_w - 2.0 * CARD_PADDING);
        let rect = Rect::new(x, y, card_w, bottom + CARD_PADDING - y);
        let shown = revealed(item.id);
        let action = Action::ToggleItem {
            section: SectionKind::Journey,
            item: item.id,
        };

        c.reveal(item.id, rect, shown, |c| {
            c.card(rect, ThemeToken::Surface, Some(action));
            c.absorb(body);
        });
        if shown {
            let cy = rect.y + rect.h / 2.0;
            c.fill(
                Rect::new(axis - DOT / 2.0, cy - DOT / 2.0, DOT, DOT),
                item.category.accent().token(),
            );
        }
        y = rect.bottom() + ITEM_GAP;
    }
    let end = (y - ITEM_GAP).max(start);
    c.insert(
        line_at,
        RenderCommand::DrawLine {
            from: Point::new(axis, start),
            to: Point::new(axis, end),
            color: ThemeToken::TimelineLine,
            width: 4.0,
        },
    );
    end
}

/// Card contents; returns the y below the last line.
fn card_body(c: &mut Canvas, item: &JourneyItem, open: bool, x: f64, y: f64, w: f64) -> f64 {
    let accent = item.category.accent().token();
    c.button(
        Rect::new(x, y, 32.0, 32.0),
        accent,
        item.icon.glyph().to_string(),
        None,
    );
    c.text(x + 44.0, y + 8.0, item.year.to_uppercase(), ThemeToken::TextMuted, SMALL_SIZE);
    let mut y = y + 44.0;

    y = c.paragraph(x, y, w, &item.title, ThemeToken::TextPrimary, HEADING_SIZE) + 6.0;
    y = c.paragraph(x, y, w, &item.description, ThemeToken::TextSecondary, BODY_SIZE);

    if open && !item.details.is_empty() {
        y += 12.0;
        c.line(Point::new(x, y), Point::new(x + w, y), ThemeToken::Border, 1.0);
        y += 16.0;
        y = c.bullets(x, y, w, &item.details, ThemeToken::AccentBlue, BODY_SIZE - 1.0);
    } else {
        y += 4.0;
        c.text(x, y, "Show details", ThemeToken::Link, SMALL_SIZE);
        y += line_height(SMALL_SIZE);
    }
    y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin;

    fn journey() -> &'static [JourneyItem] {
        match builtin() {
            Ok(registry) => &registry.journey,
            Err(e) => panic!("builtin content failed to parse: {e}"),
        }
    }

    #[test]
    fn one_node_per_item_in_order() {
        let view = render_journey(journey(), None, &|_| false, 0.0, 1280.0);
        let ids: Vec<u32> = view.nodes.iter().map(|(id, _)| *id).collect();
        let expected: Vec<u32> = journey().iter().map(|i| i.id).collect();
        assert_eq!(ids, expected);
        // Nodes go down the page.
        assert!(view.nodes.windows(2).all(|w| w[0].1.y < w[1].1.y));
    }

    #[test]
    fn expanding_an_item_grows_the_section() {
        let collapsed = render_journey(journey(), None, &|_| true, 0.0, 1280.0);
        let open = render_journey(journey(), Some(1), &|_| true, 0.0, 1280.0);
        assert!(open.height > collapsed.height);
        assert_eq!(collapsed.nodes[0].0, 1);
        assert!(open.nodes[0].1.h > collapsed.nodes[0].1.h);
    }

    #[test]
    fn dots_only_for_revealed_items() {
        let none = render_journey(journey(), None, &|_| false, 0.0, 1280.0);
        let some = render_journey(journey(), None, &|id| id <= 2, 0.0, 1280.0);
        let dots = |view: &SectionView| {
            view.commands
                .iter()
                .filter(|c| matches!(c, RenderCommand::DrawRect { rect, .. } if rect.w == DOT && rect.h == DOT))
                .count()
        };
        assert_eq!(dots(&none), 0);
        assert_eq!(dots(&some), 2);
    }

    #[test]
    fn narrow_layout_is_single_sided() {
        let view = render_journey(journey(), None, &|_| true, 0.0, 480.0);
        let xs: Vec<f64> = view.nodes.iter().map(|(_, r)| r.x).collect();
        assert!(xs.windows(2).all(|w| w[0] == w[1]));
    }
}
