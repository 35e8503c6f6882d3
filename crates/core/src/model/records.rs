use folio_protocol::ThemeToken;
use serde::{Deserialize, Serialize};

use super::{ContentItem, Icon};

/// Category accent, mapped onto the theme's accent tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    #[default]
    Blue,
    Green,
    Purple,
    Orange,
    Teal,
    Pink,
    Gray,
}

impl Accent {
    pub fn token(self) -> ThemeToken {
        match self {
            Self::Blue => ThemeToken::AccentBlue,
            Self::Green => ThemeToken::AccentGreen,
            Self::Purple => ThemeToken::AccentPurple,
            Self::Orange => ThemeToken::AccentOrange,
            Self::Teal => ThemeToken::AccentTeal,
            Self::Pink => ThemeToken::AccentPink,
            Self::Gray => ThemeToken::AccentGray,
        }
    }
}

// ── Hero ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stat {
    pub value: String,
    pub label: String,
    pub accent: Accent,
}

/// Biography shown in the hero section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Words cycled after "Building The".
    pub rotating_words: Vec<String>,
    pub intro: Vec<String>,
    pub birthplace: String,
    pub school: String,
    pub email: String,
    pub cv_url: String,
    pub stats: Vec<Stat>,
}

// ── Journey ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JourneyCategory {
    Education,
    Achievement,
    Experience,
    Certification,
}

impl JourneyCategory {
    pub fn key(self) -> &'static str {
        match self {
            Self::Education => "education",
            Self::Achievement => "achievement",
            Self::Experience => "experience",
            Self::Certification => "certification",
        }
    }

    pub fn accent(self) -> Accent {
        match self {
            Self::Education => Accent::Blue,
            Self::Achievement => Accent::Green,
            Self::Experience => Accent::Purple,
            Self::Certification => Accent::Orange,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyItem {
    pub id: u32,
    pub year: String,
    pub title: String,
    pub description: String,
    pub icon: Icon,
    pub category: JourneyCategory,
    pub details: Vec<String>,
}

impl ContentItem for JourneyItem {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.category.key() == tag
    }
}

// ── Skills ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    pub id: u32,
    pub name: String,
    pub icon: Icon,
    pub description: String,
}

impl ContentItem for Skill {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn has_tag(&self, _tag: &str) -> bool {
        false
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkillCategory {
    pub title: String,
    pub accent: Accent,
    pub skills: Vec<Skill>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Certification {
    pub name: String,
    pub issuer: String,
    pub year: String,
    #[serde(default)]
    pub link: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    pub name: String,
    pub level: String,
    pub accent: Accent,
}

// ── Projects ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub long_description: String,
    pub technologies: Vec<String>,
    pub categories: Vec<String>,
    pub image: String,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub other_url: Option<String>,
    pub icon: Icon,
    pub features: Vec<String>,
    pub challenges: Vec<String>,
    pub results: Vec<String>,
}

impl ContentItem for Project {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.categories.iter().any(|c| c == tag)
    }
}

/// A project filter tab. The tag `"all"` matches every project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectFilter {
    pub tag: String,
    pub name: String,
}

// ── Organizational experience ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceCategory {
    Leadership,
    Technical,
    Research,
}

impl ExperienceCategory {
    pub fn key(self) -> &'static str {
        match self {
            Self::Leadership => "leadership",
            Self::Technical => "technical",
            Self::Research => "research",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Leadership => "Leadership",
            Self::Technical => "Technical",
            Self::Research => "Research",
        }
    }

    pub fn accent(self) -> Accent {
        match self {
            Self::Leadership => Accent::Blue,
            Self::Technical => Accent::Green,
            Self::Research => Accent::Purple,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Experience {
    pub id: u32,
    pub title: String,
    pub organization: String,
    pub period: String,
    pub description: String,
    pub icon: Icon,
    pub categories: Vec<ExperienceCategory>,
    pub achievements: Vec<String>,
    pub skills: Vec<String>,
}

impl Experience {
    /// Accent of the leading category, gray when uncategorized.
    pub fn accent(&self) -> Accent {
        self.categories
            .first()
            .map_or(Accent::Gray, |c| c.accent())
    }
}

impl ContentItem for Experience {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn has_tag(&self, tag: &str) -> bool {
        self.categories.iter().any(|c| c.key() == tag)
    }
}

// ── Contact ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactChannel {
    pub title: String,
    pub content: String,
    pub link: String,
    pub icon: Icon,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialLink {
    pub name: String,
    pub url: String,
    pub icon: Icon,
    pub accent: Accent,
}
