//! Static content registry: the hand-authored records behind every section.
//!
//! The registry is parsed once and never mutated. Sections borrow slices of
//! it; filtering is a projection (see [`filter`]) that leaves the lists and
//! their ids untouched.

pub mod filter;

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::model::{
    Certification, ContactChannel, ContentItem, Experience, JourneyItem, Language, Profile,
    Project, ProjectFilter, SkillCategory, SocialLink,
};

const BUILTIN_CONTENT: &str = include_str!("../../content/portfolio.json");

static BUILTIN: LazyLock<Result<Registry, RegistryError>> =
    LazyLock::new(|| Registry::from_json(BUILTIN_CONTENT.as_bytes()));

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("malformed content: {0}")]
    Malformed(String),
    #[error("duplicate id {id} in {list}")]
    DuplicateId { list: &'static str, id: String },
    #[error("failed to read {path}: {reason}")]
    Io { path: String, reason: String },
}

/// Every content list of the page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registry {
    pub profile: Profile,
    pub journey: Vec<JourneyItem>,
    pub skill_categories: Vec<SkillCategory>,
    pub certifications: Vec<Certification>,
    pub languages: Vec<Language>,
    pub projects: Vec<Project>,
    pub project_filters: Vec<ProjectFilter>,
    pub experiences: Vec<Experience>,
    pub contact_channels: Vec<ContactChannel>,
    pub social_links: Vec<SocialLink>,
}

impl Registry {
    /// Parse and validate a registry from JSON.
    pub fn from_json(data: &[u8]) -> Result<Self, RegistryError> {
        let registry: Registry =
            serde_json::from_slice(data).map_err(|e| RegistryError::Malformed(e.to_string()))?;
        registry.validate()?;
        Ok(registry)
    }

    /// Load a registry from a JSON file on disk.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let data = std::fs::read(path).map_err(|e| RegistryError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let registry = Self::from_json(&data)?;
        info!(path = %path.display(), "loaded content registry");
        Ok(registry)
    }

    /// All skills across categories, in category order.
    pub fn skills(&self) -> impl Iterator<Item = &crate::model::Skill> {
        self.skill_categories.iter().flat_map(|c| c.skills.iter())
    }

    /// Ids must be unique within each tracked list.
    fn validate(&self) -> Result<(), RegistryError> {
        unique_ids("journey", self.journey.iter())?;
        unique_ids("skills", self.skills())?;
        unique_ids("projects", self.projects.iter())?;
        unique_ids("experiences", self.experiences.iter())?;
        Ok(())
    }
}

fn unique_ids<'a, T: ContentItem + 'a>(
    list: &'static str,
    items: impl Iterator<Item = &'a T>,
) -> Result<(), RegistryError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id()) {
            return Err(RegistryError::DuplicateId {
                list,
                id: format!("{:?}", item.id()),
            });
        }
    }
    Ok(())
}

/// The content compiled into the binary, parsed on first use.
pub fn builtin() -> Result<&'static Registry, RegistryError> {
    BUILTIN.as_ref().map_err(Clone::clone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_content_parses() {
        let registry = builtin();
        assert!(registry.is_ok(), "{registry:?}");
        let Ok(registry) = registry else { return };
        assert_eq!(registry.journey.len(), 11);
        assert_eq!(registry.skill_categories.len(), 4);
        assert_eq!(registry.skills().count(), 16);
        assert_eq!(registry.certifications.len(), 6);
        assert_eq!(registry.projects.len(), 4);
        assert_eq!(registry.experiences.len(), 3);
        assert_eq!(registry.profile.rotating_words.len(), 4);
    }

    #[test]
    fn builtin_is_parsed_once() {
        let (Ok(a), Ok(b)) = (builtin(), builtin()) else {
            panic!("builtin content failed to parse");
        };
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn rejects_duplicate_project_ids() {
        let Ok(mut registry) = builtin().cloned() else {
            panic!("builtin content failed to parse");
        };
        let dup = registry.projects[0].clone();
        registry.projects.push(dup);
        let json = serde_json::to_vec(&registry).unwrap_or_default();
        let err = Registry::from_json(&json).err();
        assert_eq!(
            err,
            Some(RegistryError::DuplicateId {
                list: "projects",
                id: "1".into()
            })
        );
    }

    #[test]
    fn skill_ids_are_unique_across_categories() {
        let Ok(mut registry) = builtin().cloned() else {
            panic!("builtin content failed to parse");
        };
        registry.skill_categories[1].skills[0].id = registry.skill_categories[0].skills[0].id;
        let json = serde_json::to_vec(&registry).unwrap_or_default();
        assert!(matches!(
            Registry::from_json(&json),
            Err(RegistryError::DuplicateId { list: "skills", .. })
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = Registry::from_json(b"{\"profile\": 3}").err();
        assert!(matches!(err, Some(RegistryError::Malformed(_))));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Registry::load(Path::new("/nonexistent/folio.json")).err();
        assert!(matches!(err, Some(RegistryError::Io { .. })));
    }
}
