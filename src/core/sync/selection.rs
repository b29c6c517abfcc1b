use crate::core::model::Project;

/// Repair the active selection against a freshly rebuilt project list.
///
/// A selection that still exists is kept but re-resolved by id, so the caller
/// holds the refreshed record. Otherwise the first project in sort order is
/// selected, or nothing when the list is empty.
pub fn reconcile(current: Option<&Project>, projects: &[Project]) -> Option<Project> {
    current
        .and_then(|selected| projects.iter().find(|project| project.id == selected.id))
        .or_else(|| projects.first())
        .cloned()
}
