use time::OffsetDateTime;
use tracing::{error, info};

use crate::{
    config::HubConfig,
    core::{
        error::{HubError, MutationAction, ValidationError},
        model::{
            Link, LinkFields, LinkId, LinkPatch, ProjectFields, ProjectId, ProjectPatch, to_fields,
        },
        remote::RemoteCollectionClient,
    },
};

/// Issues user writes against the remote store.
///
/// Nothing here touches the local mirrors: every change comes back through the
/// snapshot streams. Each call is a single attempt; failures are logged and
/// returned as [`HubError::Mutation`].
#[derive(Debug)]
pub struct MutationCoordinator<C> {
    client: C,
    projects_collection: String,
    links_collection: String,
}

fn non_empty(value: &str, err: ValidationError) -> Result<&str, HubError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(err.into());
    }
    Ok(trimmed)
}

fn failed(action: MutationAction) -> impl FnOnce(anyhow::Error) -> HubError {
    move |err| {
        error!(%action, error = %format!("{err:#}"), "remote write failed");
        HubError::mutation(action, err)
    }
}

fn encode<T: serde::Serialize>(
    action: MutationAction,
    value: &T,
) -> Result<serde_json::Map<String, serde_json::Value>, HubError> {
    to_fields(value).map_err(|err| failed(action)(err.into()))
}

impl<C: RemoteCollectionClient> MutationCoordinator<C> {
    pub fn new(client: C, config: &HubConfig) -> Self {
        Self {
            client,
            projects_collection: config.projects_collection.clone(),
            links_collection: config.links_collection.clone(),
        }
    }

    /// Create a project named `name`.
    ///
    /// Names, like link titles and urls, are trimmed: blank input is rejected
    /// and the trimmed text is what gets stored.
    pub async fn create_project(&self, name: &str) -> Result<ProjectId, HubError> {
        let name = non_empty(name, ValidationError::EmptyProjectName)?;
        let action = MutationAction::CreateProject;
        let fields = encode(
            action,
            &ProjectFields {
                name: name.to_string(),
                created_at: OffsetDateTime::now_utc(),
            },
        )?;
        let id = self
            .client
            .create(&self.projects_collection, fields)
            .await
            .map_err(failed(action))?;
        info!(project = %id, "created project");
        Ok(ProjectId::new(id))
    }

    /// Rename a project. Only the `name` field is written.
    pub async fn update_project(&self, id: &ProjectId, name: &str) -> Result<(), HubError> {
        let name = non_empty(name, ValidationError::EmptyProjectName)?;
        let action = MutationAction::UpdateProject;
        let fields = encode(action, &ProjectPatch { name })?;
        self.client
            .update(&self.projects_collection, id.as_str(), fields)
            .await
            .map_err(failed(action))?;
        info!(project = %id, "renamed project");
        Ok(())
    }

    /// Delete a project together with its links.
    ///
    /// The links owned by `id` in `links` are removed in one batch first, and
    /// the project document only after that batch succeeded. A failure in
    /// between leaves the project present with no links, which a retry clears.
    /// Links created after `links` was read are not covered.
    pub async fn delete_project(&self, id: &ProjectId, links: &[Link]) -> Result<usize, HubError> {
        let action = MutationAction::DeleteProject;
        let owned: Vec<String> = links
            .iter()
            .filter(|link| &link.project_id == id)
            .map(|link| link.id.to_string())
            .collect();
        if !owned.is_empty() {
            self.client
                .batch_delete(&self.links_collection, &owned)
                .await
                .map_err(failed(action))?;
        }
        self.client
            .delete(&self.projects_collection, id.as_str())
            .await
            .map_err(failed(action))?;
        info!(project = %id, links = owned.len(), "deleted project");
        Ok(owned.len())
    }

    pub async fn create_link(
        &self,
        project_id: &ProjectId,
        title: &str,
        url: &str,
    ) -> Result<LinkId, HubError> {
        let title = non_empty(title, ValidationError::EmptyLinkTitle)?;
        let url = non_empty(url, ValidationError::EmptyLinkUrl)?;
        let action = MutationAction::CreateLink;
        let fields = encode(
            action,
            &LinkFields {
                title: title.to_string(),
                url: url.to_string(),
                project_id: project_id.clone(),
                created_at: OffsetDateTime::now_utc(),
            },
        )?;
        let id = self
            .client
            .create(&self.links_collection, fields)
            .await
            .map_err(failed(action))?;
        info!(link = %id, project = %project_id, "created link");
        Ok(LinkId::new(id))
    }

    pub async fn update_link(&self, id: &LinkId, title: &str, url: &str) -> Result<(), HubError> {
        let title = non_empty(title, ValidationError::EmptyLinkTitle)?;
        let url = non_empty(url, ValidationError::EmptyLinkUrl)?;
        let action = MutationAction::UpdateLink;
        let fields = encode(action, &LinkPatch { title, url })?;
        self.client
            .update(&self.links_collection, id.as_str(), fields)
            .await
            .map_err(failed(action))?;
        info!(link = %id, "updated link");
        Ok(())
    }

    pub async fn delete_link(&self, id: &LinkId) -> Result<(), HubError> {
        let action = MutationAction::DeleteLink;
        self.client
            .delete(&self.links_collection, id.as_str())
            .await
            .map_err(failed(action))?;
        info!(link = %id, "deleted link");
        Ok(())
    }
}
