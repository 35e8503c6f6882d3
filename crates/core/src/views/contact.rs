use folio_protocol::{Action, FormField, Rect, RenderCommand, SectionKind, ThemeToken};

use super::{BODY_SIZE, Canvas, Column, HEADING_SIZE, SMALL_SIZE, SectionView, line_height, section, wrap};
use crate::contact::{ContactForm, SubmitStatus};
use crate::model::{ContactChannel, Icon, SocialLink};

const TITLE: &str = "Get In Touch";
const SUBTITLE: &str = "Interested in discussing year in industry opportunities, collaboration on projects, or learning more about my experience? I'd love to connect with you.";

/// Observable element ids within the contact section.
pub const INFO_ELEMENT: u32 = 0;
pub const FORM_ELEMENT: u32 = 1;

const PADDING: f64 = 32.0;
const INPUT_HEIGHT: f64 = 44.0;
const MESSAGE_HEIGHT: f64 = 150.0;
const GAP: f64 = 48.0;

/// Static inputs of the contact section.
pub struct ContactContent<'a> {
    pub channels: &'a [ContactChannel],
    pub socials: &'a [SocialLink],
    pub cv_url: &'a str,
}

/// Contact information beside the message form. Form inputs are rects
/// carrying [`Action::EditField`] so front-ends can overlay real inputs.
pub fn render_contact(
    content: &ContactContent<'_>,
    form: &ContactForm,
    status: SubmitStatus,
    revealed: &dyn Fn(u32) -> bool,
    top: f64,
    width: f64,
) -> SectionView {
    section(
        top,
        width,
        SectionKind::Contact.anchor(),
        TITLE,
        SUBTITLE,
        ThemeToken::SectionBackgroundAlt,
        |c, column, y| {
            let (info_col, form_col, stacked) = if column.w >= 800.0 {
                let halves = column.cells(2, GAP);
                (halves[0], halves[1], false)
            } else {
                (column, column, true)
            };

            let mut info = Canvas::new();
            let info_bottom = info_panel(&mut info, content, info_col, y);
            let info_rect = Rect::new(info_col.x, y, info_col.w, info_bottom - y);

            let form_top = if stacked { info_rect.bottom() + GAP } else { y };
            let mut form_canvas = Canvas::new();
            let form_bottom = form_panel(&mut form_canvas, form, status, form_col, form_top);
            let form_rect = Rect::new(form_col.x, form_top, form_col.w, form_bottom - form_top);

            c.reveal(INFO_ELEMENT, info_rect, revealed(INFO_ELEMENT), |c| c.absorb(info));
            c.reveal(FORM_ELEMENT, form_rect, revealed(FORM_ELEMENT), |c| {
                c.card(form_rect, ThemeToken::Surface, None);
                c.absorb(form_canvas);
            });
            info_rect.bottom().max(form_rect.bottom())
        },
    )
}

fn info_panel(c: &mut Canvas, content: &ContactContent<'_>, col: Column, y: f64) -> f64 {
    c.text(col.x, y, "Contact Information", ThemeToken::TextPrimary, 24.0);
    let mut y = y + line_height(24.0) + 24.0;

    for channel in content.channels {
        c.button(
            Rect::new(col.x, y, col.w, 64.0),
            ThemeToken::Surface,
            String::new(),
            Some(Action::OpenLink {
                url: channel.link.clone(),
            }),
        );
        c.button(
            Rect::new(col.x + 12.0, y + 12.0, 40.0, 40.0),
            ThemeToken::AccentBlue,
            channel.icon.glyph().to_string(),
            None,
        );
        c.text(col.x + 64.0, y + 12.0, &channel.title, ThemeToken::TextPrimary, BODY_SIZE);
        c.text(col.x + 64.0, y + 12.0 + line_height(BODY_SIZE), &channel.content, ThemeToken::TextSecondary, BODY_SIZE);
        y += 64.0 + 16.0;
    }

    y += 16.0;
    c.text(col.x, y, "Connect With Me", ThemeToken::TextPrimary, HEADING_SIZE - 2.0);
    y += line_height(HEADING_SIZE) + 8.0;
    let mut x = col.x;
    for social in content.socials {
        c.button(
            Rect::new(x, y, 48.0, 48.0),
            social.accent.token(),
            social.icon.glyph().to_string(),
            Some(Action::OpenLink {
                url: social.url.clone(),
            }),
        );
        x += 48.0 + 16.0;
    }
    y += 48.0 + 32.0;

    c.button(
        Rect::new(col.x, y, 200.0, 48.0),
        ThemeToken::ButtonPrimary,
        format!("{} Download CV", Icon::Download.glyph()),
        Some(Action::OpenLink {
            url: content.cv_url.to_string(),
        }),
    );
    y + 48.0
}

fn form_panel(c: &mut Canvas, form: &ContactForm, status: SubmitStatus, col: Column, top: f64) -> f64 {
    let x = col.x + PADDING;
    let w = col.w - 2.0 * PADDING;
    let mut y = top + PADDING;

    // Name and email side by side when there is room.
    let pair = Column { x, w }.cells(if w >= 420.0 { 2 } else { 1 }, 16.0);
    if let [left, right] = pair.as_slice() {
        input(c, form, FormField::Name, *left, y, INPUT_HEIGHT);
        input(c, form, FormField::Email, *right, y, INPUT_HEIGHT);
        y += field_height(INPUT_HEIGHT) + 16.0;
    } else {
        for field in [FormField::Name, FormField::Email] {
            input(c, form, field, Column { x, w }, y, INPUT_HEIGHT);
            y += field_height(INPUT_HEIGHT) + 16.0;
        }
    }
    input(c, form, FormField::Subject, Column { x, w }, y, INPUT_HEIGHT);
    y += field_height(INPUT_HEIGHT) + 16.0;
    input(c, form, FormField::Message, Column { x, w }, y, MESSAGE_HEIGHT);
    y += field_height(MESSAGE_HEIGHT) + 16.0;

    if let Some(banner) = status.banner() {
        let (bg, fg) = match status {
            SubmitStatus::Success => (ThemeToken::SuccessBackground, ThemeToken::SuccessText),
            _ => (ThemeToken::ErrorBackground, ThemeToken::ErrorText),
        };
        let lines = wrap(banner, BODY_SIZE, w - 32.0);
        let h = lines.len() as f64 * line_height(BODY_SIZE) + 24.0;
        c.fill(Rect::new(x, y, w, h), bg);
        let mut ty = y + 12.0;
        for line in lines {
            c.text(x + 16.0, ty, line, fg, BODY_SIZE);
            ty += line_height(BODY_SIZE);
        }
        y += h + 16.0;
    }

    let submitting = status == SubmitStatus::Submitting;
    c.button(
        Rect::new(x, y, w, 52.0),
        if submitting {
            ThemeToken::ButtonDisabled
        } else {
            ThemeToken::ButtonPrimary
        },
        status.button_label(),
        (!submitting).then_some(Action::SubmitContact),
    );
    y + 52.0 + PADDING
}

fn field_height(input: f64) -> f64 {
    line_height(SMALL_SIZE) + 6.0 + input
}

fn input(c: &mut Canvas, form: &ContactForm, field: FormField, col: Column, y: f64, h: f64) {
    c.text(col.x, y, format!("{} *", field.label()), ThemeToken::TextSecondary, SMALL_SIZE);
    let rect = Rect::new(col.x, y + line_height(SMALL_SIZE) + 6.0, col.w, h);
    c.push(RenderCommand::DrawRect {
        rect,
        color: ThemeToken::InputBackground,
        border_color: Some(ThemeToken::InputBorder),
        label: None,
        action: Some(Action::EditField { field }),
    });
    let value = form.get(field);
    let (text, color) = if value.is_empty() {
        (field.placeholder(), ThemeToken::TextMuted)
    } else {
        (value, ThemeToken::TextPrimary)
    };
    let max_lines = ((h - 16.0) / line_height(BODY_SIZE)).floor().max(1.0) as usize;
    let mut ty = rect.y + (if h > INPUT_HEIGHT { 12.0 } else { (h - BODY_SIZE) / 2.0 });
    for line in wrap(text, BODY_SIZE, col.w - 24.0).into_iter().take(max_lines) {
        c.text(rect.x + 12.0, ty, line, color, BODY_SIZE);
        ty += line_height(BODY_SIZE);
    }
}

#[cfg(test)]
mod tests {
    use folio_protocol::Point;

    use super::*;
    use crate::content::builtin;
    use crate::views::hit_test;

    fn render(form: &ContactForm, status: SubmitStatus) -> SectionView {
        let Ok(r) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let content = ContactContent {
            channels: &r.contact_channels,
            socials: &r.social_links,
            cv_url: &r.profile.cv_url,
        };
        render_contact(&content, form, status, &|_| true, 0.0, 1280.0)
    }

    fn field_rect(view: &SectionView, field: FormField) -> Option<Rect> {
        view.commands.iter().find_map(|c| match c {
            RenderCommand::DrawRect {
                rect,
                action: Some(Action::EditField { field: f }),
                ..
            } if *f == field => Some(*rect),
            _ => None,
        })
    }

    #[test]
    fn two_elements_are_observable() {
        let view = render(&ContactForm::default(), SubmitStatus::Idle);
        let ids: Vec<u32> = view.nodes.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![INFO_ELEMENT, FORM_ELEMENT]);
    }

    #[test]
    fn every_field_is_a_hit_region() {
        let view = render(&ContactForm::default(), SubmitStatus::Idle);
        for field in FormField::ALL {
            let Some(rect) = field_rect(&view, field) else {
                panic!("no input for {field:?}");
            };
            let hit = hit_test(&view.commands, Point::new(rect.x + 4.0, rect.y + 4.0));
            assert_eq!(hit, Some(Action::EditField { field }));
        }
    }

    #[test]
    fn submit_disabled_while_sending() {
        let view = render(&ContactForm::default(), SubmitStatus::Submitting);
        let submit = view.commands.iter().any(|c| {
            matches!(c, RenderCommand::DrawRect { action: Some(Action::SubmitContact), .. })
        });
        assert!(!submit);
        let label = view.commands.iter().any(|c| {
            matches!(c, RenderCommand::DrawRect { label: Some(l), .. } if l == "Sending...")
        });
        assert!(label);
    }

    #[test]
    fn banners_follow_status() {
        let has_text = |view: &SectionView, needle: &str| {
            view.commands.iter().any(|c| {
                matches!(c, RenderCommand::DrawText { text, .. } if text.contains(needle))
            })
        };
        let ok = render(&ContactForm::default(), SubmitStatus::Success);
        assert!(has_text(&ok, "Message sent successfully!"));
        let err = render(&ContactForm::default(), SubmitStatus::Error);
        assert!(has_text(&err, "There was an error"));
        let idle = render(&ContactForm::default(), SubmitStatus::Idle);
        assert!(!has_text(&idle, "There was an error"));
    }

    #[test]
    fn typed_values_replace_placeholders() {
        let mut form = ContactForm::default();
        form.set(FormField::Name, "Ada");
        let view = render(&form, SubmitStatus::Idle);
        let texts: Vec<&str> = view
            .commands
            .iter()
            .filter_map(|c| match c {
                RenderCommand::DrawText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"Ada"));
        assert!(!texts.contains(&FormField::Name.placeholder()));
    }
}
