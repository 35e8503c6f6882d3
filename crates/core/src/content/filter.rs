use serde::{Deserialize, Serialize};

use crate::model::{ContentItem, ProjectFilter};

/// Tag used by filter tabs that match every item.
pub const ALL_TAG: &str = "all";

/// Active filter of a filterable section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl TagFilter {
    pub fn from_tag(tag: &str) -> Self {
        if tag == ALL_TAG {
            Self::All
        } else {
            Self::Tag(tag.to_string())
        }
    }

    pub fn matches<T: ContentItem>(&self, item: &T) -> bool {
        match self {
            Self::All => true,
            Self::Tag(tag) => item.has_tag(tag),
        }
    }
}

/// Project the items matching `filter`, in registry order.
///
/// Items are borrowed, so ids (and any reveal state keyed by them) are
/// unaffected.
pub fn filter_items<'a, T: ContentItem>(items: &'a [T], filter: &TagFilter) -> Vec<&'a T> {
    items.iter().filter(|item| filter.matches(*item)).collect()
}

/// A filter button with the number of items it would show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterTab {
    pub filter: TagFilter,
    pub name: String,
    pub count: usize,
}

impl FilterTab {
    pub fn caption(&self) -> String {
        format!("{} ({})", self.name, self.count)
    }
}

pub fn filter_tabs<T: ContentItem>(items: &[T], filters: &[ProjectFilter]) -> Vec<FilterTab> {
    filters
        .iter()
        .map(|f| {
            let filter = TagFilter::from_tag(&f.tag);
            let count = items.iter().filter(|item| filter.matches(*item)).count();
            FilterTab {
                filter,
                name: f.name.clone(),
                count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::builtin;

    #[test]
    fn cloud_filter_keeps_ids_and_order() {
        let Ok(registry) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let cloud = filter_items(&registry.projects, &TagFilter::from_tag("cloud"));
        let ids: Vec<u32> = cloud.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        // Registry itself is untouched.
        let all: Vec<u32> = registry.projects.iter().map(|p| p.id).collect();
        assert_eq!(all, vec![1, 2, 3, 4]);
    }

    #[test]
    fn all_filter_matches_everything() {
        let Ok(registry) = builtin() else {
            panic!("builtin content failed to parse");
        };
        assert_eq!(
            filter_items(&registry.projects, &TagFilter::All).len(),
            registry.projects.len()
        );
        assert_eq!(TagFilter::from_tag("all"), TagFilter::All);
    }

    #[test]
    fn tabs_carry_counts() {
        let Ok(registry) = builtin() else {
            panic!("builtin content failed to parse");
        };
        let tabs = filter_tabs(&registry.projects, &registry.project_filters);
        let captions: Vec<String> = tabs.iter().map(FilterTab::caption).collect();
        assert_eq!(
            captions,
            vec![
                "All Projects (4)",
                "Machine Learning & AI (3)",
                "Cloud Computing (2)"
            ]
        );
    }

    #[test]
    fn unknown_tag_matches_nothing() {
        let Ok(registry) = builtin() else {
            panic!("builtin content failed to parse");
        };
        assert!(filter_items(&registry.experiences, &TagFilter::from_tag("sports")).is_empty());
    }
}
