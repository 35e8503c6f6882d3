use serde::{Deserialize, Serialize};

/// The content sections of the page, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SectionKind {
    Hero,
    Journey,
    Skills,
    Projects,
    Experience,
    Contact,
}

impl SectionKind {
    pub const ALL: [SectionKind; 6] = [
        Self::Hero,
        Self::Journey,
        Self::Skills,
        Self::Projects,
        Self::Experience,
        Self::Contact,
    ];

    /// Anchor id used for navigation and render groups.
    pub fn anchor(self) -> &'static str {
        match self {
            Self::Hero => "home",
            Self::Journey => "journey",
            Self::Skills => "skills",
            Self::Projects => "projects",
            Self::Experience => "organizational",
            Self::Contact => "contact",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Hero => "Home",
            Self::Journey => "Journey",
            Self::Skills => "Skills",
            Self::Projects => "Projects",
            Self::Experience => "Experience",
            Self::Contact => "Contact",
        }
    }
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

/// Contact form input fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormField {
    Name,
    Email,
    Subject,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Your Name",
            Self::Email => "Email Address",
            Self::Subject => "Subject",
            Self::Message => "Message",
        }
    }

    pub fn placeholder(self) -> &'static str {
        match self {
            Self::Name => "Your Name",
            Self::Email => "your@example.com",
            Self::Subject => "Year in Industry Opportunity / Project Collaboration / General Inquiry",
            Self::Message => "Tell me about your opportunity, project, or just say hello...",
        }
    }

    /// Key used in the relay template parameters.
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

/// What happens when a hit region is clicked.
///
/// Attached to `DrawRect` commands; renderers hit-test and hand the action
/// back to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Switch the active tab or filter of a section.
    SelectTab { section: SectionKind, tab: usize },
    /// Expand an item, or collapse it if it is already expanded.
    ToggleItem { section: SectionKind, item: u32 },
    /// Close the open detail view (project modal).
    CloseDetail { section: SectionKind },
    OpenLink { url: String },
    /// Navigation bar jump to a section anchor.
    ScrollTo { section: SectionKind },
    ToggleTheme,
    /// Input focus on a contact form field.
    EditField { field: FormField },
    SubmitContact,
}
