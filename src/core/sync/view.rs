//! Search and filtering over the mirrors.
//!
//! Everything here is a pure function of its arguments. Results borrow from
//! the mirrors and are recomputed whenever the mirrors, the selection or the
//! query change.

use std::collections::HashSet;

use crate::core::model::{Link, Project, ProjectId};

/// One row of the global search results: a matching link under its project.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit<'a> {
    pub project: &'a Project,
    pub link: &'a Link,
}

struct Needle(String);

impl Needle {
    /// `None` for the empty query, which filters nothing.
    fn new(query: &str) -> Option<Self> {
        (!query.is_empty()).then(|| Needle(query.to_lowercase()))
    }

    fn found_in(&self, text: &str) -> bool {
        text.to_lowercase().contains(&self.0)
    }

    fn matches_link(&self, link: &Link) -> bool {
        self.found_in(&link.title) || self.found_in(&link.url)
    }
}

/// Projects whose name matches `query`, or that own at least one link whose
/// title or url matches. Matching is a case-insensitive substring test.
pub fn filtered_projects<'a>(projects: &'a [Project], links: &[Link], query: &str) -> Vec<&'a Project> {
    let Some(needle) = Needle::new(query) else {
        return projects.iter().collect();
    };
    let with_matching_links: HashSet<&ProjectId> = links
        .iter()
        .filter(|link| needle.matches_link(link))
        .map(|link| &link.project_id)
        .collect();
    projects
        .iter()
        .filter(|project| needle.found_in(&project.name) || with_matching_links.contains(&project.id))
        .collect()
}

/// Links of the active project that match `query`. Nothing is active, nothing
/// is listed.
pub fn filtered_links<'a>(
    links: &'a [Link],
    active_project: Option<&ProjectId>,
    query: &str,
) -> Vec<&'a Link> {
    let Some(active_project) = active_project else {
        return Vec::new();
    };
    let needle = Needle::new(query);
    links
        .iter()
        .filter(|link| &link.project_id == active_project)
        .filter(|link| needle.as_ref().is_none_or(|needle| needle.matches_link(link)))
        .collect()
}

/// Matching links grouped under their projects, in project order then link
/// order. The empty query has no results.
pub fn search_results<'a>(projects: &'a [Project], links: &'a [Link], query: &str) -> Vec<SearchHit<'a>> {
    let Some(needle) = Needle::new(query) else {
        return Vec::new();
    };
    filtered_projects(projects, links, query)
        .into_iter()
        .flat_map(move |project| {
            links
                .iter()
                .filter(move |link| link.project_id == project.id)
                .map(move |link| SearchHit { project, link })
        })
        .filter(|hit| needle.matches_link(hit.link))
        .collect()
}
