use std::fmt;

use thiserror::Error;

use crate::core::model::{CollectionKind, ProjectId};

/// User-initiated writes, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationAction {
    CreateProject,
    UpdateProject,
    DeleteProject,
    CreateLink,
    UpdateLink,
    DeleteLink,
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self {
            MutationAction::CreateProject => "create project",
            MutationAction::UpdateProject => "update project",
            MutationAction::DeleteProject => "delete project",
            MutationAction::CreateLink => "create link",
            MutationAction::UpdateLink => "update link",
            MutationAction::DeleteLink => "delete link",
        };
        f.write_str(action)
    }
}

/// Rejections raised before any remote call is issued.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("project name must not be empty")]
    EmptyProjectName,

    #[error("link title must not be empty")]
    EmptyLinkTitle,

    #[error("link url must not be empty")]
    EmptyLinkUrl,

    #[error("project {0} does not exist")]
    UnknownProject(ProjectId),

    #[error("no project is selected")]
    NoSelection,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// The remote client could not be set up. Fatal for the session.
    #[error("failed to initialize remote client: {0}")]
    Initialization(String),

    /// A snapshot stream terminated; the last applied data is kept.
    #[error("could not fetch {collection}: {reason}")]
    Subscription {
        collection: CollectionKind,
        reason: String,
    },

    #[error("failed to {action}: {reason}")]
    Mutation {
        action: MutationAction,
        reason: String,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl HubError {
    pub(crate) fn mutation(action: MutationAction, err: anyhow::Error) -> Self {
        HubError::Mutation {
            action,
            reason: format!("{err:#}"),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, HubError::Validation(_))
    }
}
