use tracing::{error, warn};

use crate::{
    config::HubConfig,
    core::{
        error::{HubError, ValidationError},
        model::{CollectionKind, Link, LinkId, Project, ProjectId},
        remote::RemoteCollectionClient,
        sync::{
            clipboard::{Clipboard, CopiedIndicator},
            coordinator::MutationCoordinator,
            request::{DeleteTarget, PendingRequest, RequestOutcome},
            selection::reconcile,
            store::{StoreUpdate, SyncStore},
            view::{self, SearchHit},
        },
    },
};

/// One browsing session over the remote projects and links.
///
/// The hub owns the mirrors, the active selection, the search query and the
/// user-facing notice. Snapshots are applied only through [`Hub::sync`] or
/// [`Hub::next_update`]; user actions go to the remote store through the
/// coordinator and return through the snapshot streams.
#[derive(Debug)]
pub struct Hub<C> {
    coordinator: MutationCoordinator<C>,
    store: SyncStore,
    selection: Option<Project>,
    query: String,
    notice: Option<HubError>,
    copied: CopiedIndicator,
}

impl<C: RemoteCollectionClient> Hub<C> {
    /// Subscribe to both collections. A client that cannot subscribe fails the
    /// whole session with [`HubError::Initialization`].
    pub async fn open(client: C, config: HubConfig) -> Result<Self, HubError> {
        let store = SyncStore::open(&client, &config).await?;
        Ok(Self {
            coordinator: MutationCoordinator::new(client, &config),
            store,
            selection: None,
            query: String::new(),
            notice: None,
            copied: CopiedIndicator::new(config.copied_indicator()),
        })
    }

    /// Apply every snapshot already delivered. Returns how many were applied.
    pub fn sync(&mut self) -> usize {
        let updates = self.store.poll();
        for update in &updates {
            self.after_update(update);
        }
        updates.len()
    }

    /// Wait for the next snapshot event and apply it.
    pub async fn next_update(&mut self) -> Option<StoreUpdate> {
        let update = self.store.next_update().await?;
        self.after_update(&update);
        Some(update)
    }

    fn after_update(&mut self, update: &StoreUpdate) {
        if let StoreUpdate::Failed(_) = update {
            self.notice = self.store.failure().cloned();
        }
        self.selection = reconcile(self.selection.as_ref(), self.store.projects());
    }

    pub fn store(&self) -> &SyncStore {
        &self.store
    }

    pub fn coordinator(&self) -> &MutationCoordinator<C> {
        &self.coordinator
    }

    /// True until the first links snapshot arrives or that stream fails.
    pub fn is_loading(&self) -> bool {
        self.store.snapshots_applied(CollectionKind::Links) == 0
            && self.store.is_streaming(CollectionKind::Links)
    }

    pub fn selection(&self) -> Option<&Project> {
        self.selection.as_ref()
    }

    /// Select a project from the mirror. Unknown ids leave the selection as is.
    pub fn select_project(&mut self, id: &ProjectId) -> bool {
        match self.store.project(id) {
            Some(project) => {
                self.selection = Some(project.clone());
                true
            }
            None => false,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn filtered_projects(&self) -> Vec<&Project> {
        view::filtered_projects(self.store.projects(), self.store.links(), &self.query)
    }

    pub fn filtered_links(&self) -> Vec<&Link> {
        view::filtered_links(
            self.store.links(),
            self.selection.as_ref().map(|project| &project.id),
            &self.query,
        )
    }

    pub fn search_results(&self) -> Vec<SearchHit<'_>> {
        view::search_results(self.store.projects(), self.store.links(), &self.query)
    }

    /// The latest failure to surface, until dismissed.
    pub fn notice(&self) -> Option<&HubError> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Submit a user action. Snapshots already delivered are applied first so
    /// the action reads current mirrors. Validation failures are only
    /// returned; remote failures are also kept as the notice.
    pub async fn submit(&mut self, request: PendingRequest) -> Result<RequestOutcome, HubError> {
        self.sync();
        let result = self.dispatch(request).await;
        match &result {
            Err(err) if !err.is_validation() => self.notice = Some(err.clone()),
            _ => {}
        }
        result
    }

    /// Add a link to the active project.
    pub async fn create_link_in_selection(
        &mut self,
        title: &str,
        url: &str,
    ) -> Result<RequestOutcome, HubError> {
        self.sync();
        let Some(project) = &self.selection else {
            return Err(ValidationError::NoSelection.into());
        };
        let request = PendingRequest::CreateLink {
            project_id: project.id.clone(),
            title: title.to_string(),
            url: url.to_string(),
        };
        self.submit(request).await
    }

    async fn dispatch(&mut self, request: PendingRequest) -> Result<RequestOutcome, HubError> {
        match request {
            PendingRequest::CreateProject { name } => self
                .coordinator
                .create_project(&name)
                .await
                .map(RequestOutcome::ProjectCreated),
            PendingRequest::EditProject { id, name } => {
                self.coordinator.update_project(&id, &name).await?;
                Ok(RequestOutcome::Updated)
            }
            PendingRequest::CreateLink {
                project_id,
                title,
                url,
            } => {
                if self.store.project(&project_id).is_none() {
                    return Err(ValidationError::UnknownProject(project_id).into());
                }
                self.coordinator
                    .create_link(&project_id, &title, &url)
                    .await
                    .map(RequestOutcome::LinkCreated)
            }
            PendingRequest::EditLink { id, title, url } => {
                self.coordinator.update_link(&id, &title, &url).await?;
                Ok(RequestOutcome::Updated)
            }
            PendingRequest::ConfirmDelete {
                target: DeleteTarget::Project(id),
            } => {
                let links_removed = self
                    .coordinator
                    .delete_project(&id, self.store.links())
                    .await?;
                // Move off the deleted project now rather than after the round trip.
                if self.selection.as_ref().is_some_and(|project| project.id == id) {
                    let remaining: Vec<Project> = self
                        .store
                        .projects()
                        .iter()
                        .filter(|project| project.id != id)
                        .cloned()
                        .collect();
                    self.selection = reconcile(self.selection.as_ref(), &remaining);
                }
                Ok(RequestOutcome::ProjectDeleted { links_removed })
            }
            PendingRequest::ConfirmDelete {
                target: DeleteTarget::Link(id),
            } => {
                self.coordinator.delete_link(&id).await?;
                self.selection = reconcile(self.selection.as_ref(), self.store.projects());
                Ok(RequestOutcome::LinkDeleted)
            }
        }
    }

    /// Copy a link's url and mark it as copied. Clipboard errors are logged
    /// only.
    pub fn copy_link(&mut self, id: &LinkId, clipboard: &impl Clipboard) -> bool {
        let Some(link) = self.store.links().iter().find(|link| &link.id == id) else {
            warn!(link = %id, "cannot copy unknown link");
            return false;
        };
        match clipboard.write_text(&link.url) {
            Ok(()) => {
                self.copied.mark(id.clone());
                true
            }
            Err(err) => {
                error!(link = %id, error = %format!("{err:#}"), "failed to copy url");
                false
            }
        }
    }

    pub fn copied_link(&self) -> Option<&LinkId> {
        self.copied.current()
    }

    /// Release both subscriptions.
    pub fn close(mut self) {
        self.store.close();
    }
}
