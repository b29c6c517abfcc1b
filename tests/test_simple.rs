use linkhub::{Hub, HubConfig, MemoryStore};

#[tokio::test]
async fn test_simple() -> anyhow::Result<()> {
    let store = MemoryStore::new();
    let mut hub = Hub::open(store, HubConfig::default()).await?;
    assert!(hub.is_loading());

    hub.sync();

    assert!(!hub.is_loading());
    assert_eq!(hub.store().projects().len(), 0);
    assert!(hub.selection().is_none());
    assert!(hub.filtered_links().is_empty());

    Ok(())
}
