//! Integration tests for link create, edit, delete and copy.
//!
//! Tests cover:
//! - Adding links to the selected project
//! - Validation of title, url and owning project
//! - Editing and deleting single links
//! - Copying a url and the copied indicator expiring

mod common;

use std::time::Duration;

use common::*;

#[tokio::test]
async fn test_create_link_in_selection() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let project = seed_project(&store, "1", "Alpha");
    let mut hub = open_hub_on(&store).await;

    let outcome = hub
        .create_link_in_selection("Docs", "https://docs.rs")
        .await?;
    assert!(matches!(outcome, RequestOutcome::LinkCreated(_)));
    hub.sync();

    let links = hub.filtered_links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].title, "Docs");
    assert_eq!(links[0].project_id, project);
    Ok(())
}

#[tokio::test]
async fn test_create_link_in_project_just_created() -> anyhow::Result<()> {
    let (mut hub, store) = open_hub().await;

    let RequestOutcome::ProjectCreated(project) = hub
        .submit(PendingRequest::CreateProject {
            name: "Reading list".to_string(),
        })
        .await?
    else {
        panic!("expected a created project");
    };
    // The project snapshot has been delivered but not applied yet.
    let outcome = hub
        .submit(PendingRequest::CreateLink {
            project_id: project.clone(),
            title: "Docs".to_string(),
            url: "https://docs.rs".to_string(),
        })
        .await?;

    assert!(matches!(outcome, RequestOutcome::LinkCreated(_)));
    assert_eq!(store.documents("links").len(), 1);
    hub.sync();
    assert_eq!(hub.selection().map(|p| &p.id), Some(&project));
    assert_eq!(link_titles(&hub), ["Docs"]);
    Ok(())
}

#[tokio::test]
async fn test_create_link_requires_selection() -> anyhow::Result<()> {
    let (mut hub, store) = open_hub().await;

    let result = hub.create_link_in_selection("Docs", "https://docs.rs").await;

    assert_eq!(result, Err(HubError::Validation(ValidationError::NoSelection)));
    assert!(store.mutation_calls().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_link_validation() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let project = seed_project(&store, "1", "Alpha");
    let mut hub = open_hub_on(&store).await;

    let cases = [
        ("", "https://docs.rs", ValidationError::EmptyLinkTitle),
        ("Docs", "", ValidationError::EmptyLinkUrl),
        ("Docs", "  ", ValidationError::EmptyLinkUrl),
    ];
    for (title, url, expected) in cases {
        let result = hub
            .submit(PendingRequest::CreateLink {
                project_id: project.clone(),
                title: title.to_string(),
                url: url.to_string(),
            })
            .await;
        assert_eq!(result, Err(HubError::Validation(expected)));
    }

    let result = hub
        .submit(PendingRequest::CreateLink {
            project_id: ProjectId::new("missing"),
            title: "Docs".to_string(),
            url: "https://docs.rs".to_string(),
        })
        .await;
    assert_eq!(
        result,
        Err(HubError::Validation(ValidationError::UnknownProject(
            ProjectId::new("missing")
        )))
    );

    assert!(store.mutation_calls().is_empty());
    assert!(hub.notice().is_none());
    Ok(())
}

#[tokio::test]
async fn test_edit_link() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let project = seed_project(&store, "1", "Alpha");
    let link = seed_link(&store, "a", "Docs", "https://docs.rs", project.as_str());
    let mut hub = open_hub_on(&store).await;

    let mut request = PendingRequest::edit_link(hub.filtered_links()[0]);
    assert_eq!(
        request,
        PendingRequest::EditLink {
            id: link.clone(),
            title: "Docs".to_string(),
            url: "https://docs.rs".to_string(),
        }
    );
    if let PendingRequest::EditLink { title, url, .. } = &mut request {
        *title = "Crates".to_string();
        *url = "https://crates.io".to_string();
    }
    hub.submit(request).await?;
    hub.sync();

    let links = hub.filtered_links();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].id, link);
    assert_eq!(links[0].title, "Crates");
    assert_eq!(links[0].url, "https://crates.io");
    assert_eq!(links[0].project_id, project);

    let result = hub
        .submit(PendingRequest::EditLink {
            id: link,
            title: "Crates".to_string(),
            url: String::new(),
        })
        .await;
    assert_eq!(result, Err(HubError::Validation(ValidationError::EmptyLinkUrl)));
    Ok(())
}

#[tokio::test]
async fn test_delete_link_leaves_project() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let project = seed_project(&store, "1", "Alpha");
    let doomed = seed_link(&store, "a", "Docs", "https://docs.rs", project.as_str());
    seed_link(&store, "b", "Blog", "https://blog.test", project.as_str());
    let mut hub = open_hub_on(&store).await;

    let outcome = hub.submit(PendingRequest::delete_link(doomed.clone())).await?;
    assert_eq!(outcome, RequestOutcome::LinkDeleted);
    hub.sync();

    assert_eq!(link_titles(&hub), ["Blog"]);
    assert_eq!(project_names(&hub), ["Alpha"]);
    assert_eq!(hub.selection().map(|p| &p.id), Some(&project));

    let calls = store.mutation_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].operation, Operation::Delete);
    assert_eq!(calls[0].ids, [doomed.to_string()]);
    Ok(())
}

#[tokio::test]
async fn test_failed_link_delete_sets_notice() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let project = seed_project(&store, "1", "Alpha");
    let link = seed_link(&store, "a", "Docs", "https://docs.rs", project.as_str());
    let mut hub = open_hub_on(&store).await;
    store.fail_next(Operation::Delete);

    let result = hub.submit(PendingRequest::delete_link(link)).await;

    assert!(matches!(
        result,
        Err(HubError::Mutation {
            action: MutationAction::DeleteLink,
            ..
        })
    ));
    assert!(hub.notice().is_some());
    hub.sync();
    assert_eq!(link_titles(&hub), ["Docs"]);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_copy_link_marks_it_for_two_seconds() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let project = seed_project(&store, "1", "Alpha");
    let link = seed_link(&store, "a", "Docs", "https://docs.rs", project.as_str());
    let mut hub = open_hub_on(&store).await;
    let clipboard = RecordingClipboard::default();

    assert!(hub.copy_link(&link, &clipboard));
    assert_eq!(
        *clipboard.written.lock().expect("clipboard lock"),
        ["https://docs.rs"]
    );
    assert_eq!(hub.copied_link(), Some(&link));

    tokio::time::advance(Duration::from_millis(1_900)).await;
    assert_eq!(hub.copied_link(), Some(&link));

    tokio::time::advance(Duration::from_millis(100)).await;
    assert_eq!(hub.copied_link(), None);
    Ok(())
}

#[tokio::test]
async fn test_copy_failures_do_not_raise_a_notice() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let project = seed_project(&store, "1", "Alpha");
    let link = seed_link(&store, "a", "Docs", "https://docs.rs", project.as_str());
    let mut hub = open_hub_on(&store).await;

    assert!(!hub.copy_link(&link, &DeniedClipboard));
    assert!(!hub.copy_link(&LinkId::new("missing"), &RecordingClipboard::default()));

    assert_eq!(hub.copied_link(), None);
    assert!(hub.notice().is_none());
    Ok(())
}
