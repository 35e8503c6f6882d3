//! Integration test: scroll a full page through its sections and verify that
//! reveal state accumulates, never reverts, and survives filter changes.

use std::time::Duration;

use folio_core::contact::{EmailRelay, RelayReply, RelayRequest};
use folio_core::svg::render_svg;
use folio_core::{Page, SiteConfig};
use folio_protocol::{Action, RenderCommand, SectionKind, Viewport};

struct AcceptingRelay;

impl EmailRelay for AcceptingRelay {
    fn dispatch(&self, _request: RelayRequest, reply: RelayReply) {
        reply.send(Ok(()));
    }
}

fn page() -> Page {
    let config = SiteConfig::default();
    let registry = config.registry().expect("builtin content should parse");
    Page::new(&config, registry, Box::new(AcceptingRelay))
}

fn offset(page: &Page, kind: SectionKind) -> f64 {
    page.section_offset(kind)
        .unwrap_or_else(|| panic!("{kind} has no offset before the first frame"))
}

#[test]
fn scrolling_reveals_once_and_keeps_items_revealed() {
    let mut page = page();
    let top = Viewport::new(1280.0, 720.0);
    page.frame(&top, Duration::ZERO);
    assert!(page.revealed_ids(SectionKind::Journey).is_empty());

    let journey = offset(&page, SectionKind::Journey);
    page.frame(&top.scrolled_to(journey), Duration::from_millis(16));
    let seen = page.revealed_ids(SectionKind::Journey);
    assert!(!seen.is_empty(), "journey items in view should reveal");
    assert!(
        page.revealed_ids(SectionKind::Contact).is_empty(),
        "contact is far below the fold"
    );

    // Back to the top: nothing un-reveals.
    page.frame(&top, Duration::from_millis(32));
    assert_eq!(page.revealed_ids(SectionKind::Journey), seen);

    let contact = offset(&page, SectionKind::Contact);
    page.frame(&top.scrolled_to(contact), Duration::from_millis(48));
    assert!(page.is_revealed(SectionKind::Contact, 0));
    assert_eq!(page.revealed_ids(SectionKind::Journey), seen);
}

#[test]
fn filter_changes_preserve_reveal_state() {
    let mut page = page();
    let tall = Viewport::new(1280.0, 3000.0);
    page.frame(&Viewport::new(1280.0, 720.0), Duration::ZERO);

    // Cloud first: only projects 2 and 3 are rendered and observed.
    page.handle(
        &Action::SelectTab {
            section: SectionKind::Projects,
            tab: 2,
        },
        Duration::ZERO,
    );
    let projects = offset(&page, SectionKind::Projects);
    page.frame(&tall.scrolled_to(projects), Duration::from_millis(16));
    assert_eq!(page.attached_count(SectionKind::Projects), 2);
    assert_eq!(page.revealed_ids(SectionKind::Projects), vec![2, 3]);

    // All projects: the newly rendered ones are in view and reveal too.
    page.handle(
        &Action::SelectTab {
            section: SectionKind::Projects,
            tab: 0,
        },
        Duration::ZERO,
    );
    let projects = offset(&page, SectionKind::Projects);
    page.frame(&tall.scrolled_to(projects), Duration::from_millis(32));
    assert_eq!(page.attached_count(SectionKind::Projects), 4);
    assert_eq!(page.revealed_ids(SectionKind::Projects), vec![1, 2, 3, 4]);

    // Narrowing again detaches project 3 but leaves it revealed.
    page.handle(
        &Action::SelectTab {
            section: SectionKind::Projects,
            tab: 1,
        },
        Duration::ZERO,
    );
    page.frame(&tall.scrolled_to(projects), Duration::from_millis(48));
    assert_eq!(page.attached_count(SectionKind::Projects), 3);
    assert!(page.is_revealed(SectionKind::Projects, 3));
}

#[test]
fn skill_tab_switch_observes_new_items() {
    let mut page = page();
    let tall = Viewport::new(1280.0, 2000.0);
    page.frame(&Viewport::new(1280.0, 720.0), Duration::ZERO);
    let skills = offset(&page, SectionKind::Skills);

    page.frame(&tall.scrolled_to(skills), Duration::from_millis(16));
    assert!(page.is_revealed(SectionKind::Skills, 1));
    assert!(!page.is_revealed(SectionKind::Skills, 6));

    page.handle(
        &Action::SelectTab {
            section: SectionKind::Skills,
            tab: 1,
        },
        Duration::ZERO,
    );
    page.frame(&tall.scrolled_to(skills), Duration::from_millis(32));
    assert!(page.is_revealed(SectionKind::Skills, 6));
    assert!(page.is_revealed(SectionKind::Skills, 1), "reveal outlives the tab");
}

#[test]
fn export_reveals_the_whole_page_without_touching_live_state() {
    let mut page = page();
    let top = Viewport::new(1280.0, 720.0);
    page.frame(&top, Duration::ZERO);
    let journey_before = page.revealed_ids(SectionKind::Journey);
    assert!(page.revealed_ids(SectionKind::Experience).is_empty());

    let (commands, height) = page.export(1280.0, Duration::ZERO);
    assert!(height > 2000.0);

    // Everything is drawn revealed: no hidden wrappers remain.
    let hidden = commands
        .iter()
        .filter(|c| matches!(c, RenderCommand::PushOpacity { opacity } if *opacity == 0.0))
        .count();
    assert_eq!(hidden, 0);
    let svg = render_svg(&commands, 1280.0, height, page.theme());
    assert!(svg.contains("Organizational Experience"));

    // The live page still only knows what was scrolled past.
    page.frame(&top, Duration::from_millis(16));
    assert_eq!(page.revealed_ids(SectionKind::Journey), journey_before);
    assert!(page.revealed_ids(SectionKind::Experience).is_empty());
    assert!(page.revealed_ids(SectionKind::Contact).is_empty());
}

#[test]
fn export_keeps_the_selected_tab_and_theme() {
    let mut page = page();
    page.handle(
        &Action::SelectTab {
            section: SectionKind::Skills,
            tab: 1,
        },
        Duration::ZERO,
    );
    page.handle(&Action::ToggleTheme, Duration::ZERO);
    let (commands, _) = page.export(1280.0, Duration::ZERO);
    let active_tab = commands.iter().any(|c| {
        matches!(
            c,
            RenderCommand::DrawRect {
                action: Some(Action::SelectTab {
                    section: SectionKind::Skills,
                    tab: 1
                }),
                color,
                ..
            } if *color != folio_protocol::ThemeToken::TabInactive
        )
    });
    assert!(active_tab);
    assert_eq!(page.skill_tab(), 1);
    assert!(page.theme().is_dark());
}
