pub mod icon;
pub mod records;

use std::fmt::Debug;
use std::hash::Hash;

pub use icon::Icon;
pub use records::{
    Accent, Certification, ContactChannel, Experience, ExperienceCategory, JourneyCategory,
    JourneyItem, Language, Profile, Project, ProjectFilter, Skill, SkillCategory, SocialLink,
    Stat,
};

/// A record in a registry list that can be tracked and filtered.
///
/// `id` must be unique within its list: reveal state is indexed by it.
pub trait ContentItem {
    type Id: Copy + Eq + Hash + Ord + Debug;

    fn id(&self) -> Self::Id;

    /// Whether the item carries the given filter tag.
    fn has_tag(&self, tag: &str) -> bool;
}
