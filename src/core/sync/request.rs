use crate::core::model::{Link, LinkId, Project, ProjectId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    Project(ProjectId),
    Link(LinkId),
}

/// A user action awaiting submission, carrying only the fields its form edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PendingRequest {
    CreateProject {
        name: String,
    },
    EditProject {
        id: ProjectId,
        name: String,
    },
    CreateLink {
        project_id: ProjectId,
        title: String,
        url: String,
    },
    EditLink {
        id: LinkId,
        title: String,
        url: String,
    },
    ConfirmDelete {
        target: DeleteTarget,
    },
}

impl PendingRequest {
    /// Edit form prefilled from the current record.
    pub fn edit_project(project: &Project) -> Self {
        PendingRequest::EditProject {
            id: project.id.clone(),
            name: project.name.clone(),
        }
    }

    pub fn edit_link(link: &Link) -> Self {
        PendingRequest::EditLink {
            id: link.id.clone(),
            title: link.title.clone(),
            url: link.url.clone(),
        }
    }

    pub fn delete_project(id: ProjectId) -> Self {
        PendingRequest::ConfirmDelete {
            target: DeleteTarget::Project(id),
        }
    }

    pub fn delete_link(id: LinkId) -> Self {
        PendingRequest::ConfirmDelete {
            target: DeleteTarget::Link(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    ProjectCreated(ProjectId),
    LinkCreated(LinkId),
    Updated,
    ProjectDeleted { links_removed: usize },
    LinkDeleted,
}
