use serde::{Deserialize, Serialize};

/// Symbolic icon reference carried by content records.
///
/// Renderers pick a glyph; the core never draws icons itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Award,
    BookOpen,
    Brain,
    Briefcase,
    Cloud,
    Code,
    Cpu,
    Database,
    Download,
    Github,
    Globe,
    GraduationCap,
    Instagram,
    Lightbulb,
    Linkedin,
    Mail,
    MapPin,
    Network,
    Phone,
    Radio,
    Settings,
    Shield,
    Target,
    Trophy,
    Users,
    Zap,
}

impl Icon {
    /// A single-character stand-in usable by text renderers.
    pub fn glyph(self) -> char {
        match self {
            Self::Award | Self::Trophy => '★',
            Self::BookOpen | Self::GraduationCap => '✎',
            Self::Brain | Self::Lightbulb => '✦',
            Self::Briefcase => '▣',
            Self::Cloud => '☁',
            Self::Code | Self::Github => '⌘',
            Self::Cpu | Self::Settings => '⚙',
            Self::Database => '◉',
            Self::Download => '↓',
            Self::Globe | Self::Network => '◍',
            Self::Instagram | Self::Linkedin => '◆',
            Self::Mail => '✉',
            Self::MapPin => '⌖',
            Self::Phone => '☎',
            Self::Radio => '⌁',
            Self::Shield => '⛨',
            Self::Target => '◎',
            Self::Users => '☺',
            Self::Zap => 'ϟ',
        }
    }
}
