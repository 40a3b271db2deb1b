use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;
use tokio::time;

use super::AutoSaveTask;
use super::AUTO_SAVE_INTERVAL;
use crate::domain::models::KeyValueStore;
use crate::domain::services::EditorHost;
use crate::domain::services::EditorProxy;
use crate::domain::services::Window;
use crate::infrastructure::editors::buffer::BufferEditor;
use crate::infrastructure::host::static_page::StaticPage;
use crate::infrastructure::stores::memory::MemoryStore;

const URL: &str = "https://cses.fi/problemset/task/1068";

#[tokio::test(start_paused = true)]
async fn it_saves_the_editor_value_after_the_interval() -> Result<()> {
    let window = Window::new();
    let proxy = Arc::new(EditorProxy::connect(&window));
    let page = StaticPage::new(URL, "rgb(255, 255, 255)");

    let mut editor: Option<BufferEditor> = None;
    let host = EditorHost::mount(&window, &page, |state| {
        let created = BufferEditor::new(state);
        editor = Some(created.clone());
        return created;
    })
    .unwrap();
    let editor = editor.unwrap();

    let store = Arc::new(MemoryStore::default());
    let task = AutoSaveTask::start(proxy, store.clone(), "1068", AUTO_SAVE_INTERVAL);

    editor.type_text("int main() { return 1; }");
    time::sleep(Duration::from_millis(4900)).await;
    assert!(store.get(&["savedCode-1068"]).await?.is_empty());

    time::sleep(Duration::from_millis(200)).await;
    let saved = store.get(&["savedCode-1068"]).await?;
    assert_eq!(saved["savedCode-1068"], json!("int main() { return 1; }"));

    editor.type_text("int main() { return 2; }");
    time::sleep(AUTO_SAVE_INTERVAL).await;
    let saved = store.get(&["savedCode-1068"]).await?;
    assert_eq!(saved["savedCode-1068"], json!("int main() { return 2; }"));

    task.stop().await;
    host.unmount().await;
    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_stops_saving_once_stopped() -> Result<()> {
    let window = Window::new();
    let proxy = Arc::new(EditorProxy::connect(&window));
    let page = StaticPage::new(URL, "rgb(255, 255, 255)");
    let host = EditorHost::mount(&window, &page, BufferEditor::new).unwrap();

    let store = Arc::new(MemoryStore::default());
    let task = AutoSaveTask::start(proxy, store.clone(), "1068", AUTO_SAVE_INTERVAL);
    task.stop().await;

    time::sleep(AUTO_SAVE_INTERVAL * 3).await;
    assert!(store.get(&["savedCode-1068"]).await?.is_empty());

    host.unmount().await;
    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_keeps_asking_while_the_editor_is_missing() -> Result<()> {
    let window = Window::new();
    let proxy = Arc::new(EditorProxy::connect(&window));
    let store = Arc::new(MemoryStore::default());
    let task = AutoSaveTask::start(proxy, store.clone(), "1068", AUTO_SAVE_INTERVAL);

    time::sleep(AUTO_SAVE_INTERVAL * 2 + Duration::from_millis(100)).await;
    assert!(store.get(&["savedCode-1068"]).await?.is_empty());

    let page = StaticPage::new(URL, "rgb(255, 255, 255)");
    let host = EditorHost::mount(&window, &page, BufferEditor::new).unwrap();

    time::sleep(Duration::from_millis(100)).await;
    let saved = store.get(&["savedCode-1068"]).await?;
    assert_eq!(saved["savedCode-1068"], json!("// Write your code here"));

    task.stop().await;
    host.unmount().await;
    return Ok(());
}

#[tokio::test(start_paused = true)]
async fn it_falls_back_to_the_default_interval_for_zero() -> Result<()> {
    let window = Window::new();
    let proxy = Arc::new(EditorProxy::connect(&window));
    let page = StaticPage::new(URL, "rgb(255, 255, 255)");
    let host = EditorHost::mount(&window, &page, BufferEditor::new).unwrap();

    let store = Arc::new(MemoryStore::default());
    let task = AutoSaveTask::start(proxy, store.clone(), "1068", Duration::ZERO);

    time::sleep(Duration::from_millis(100)).await;
    assert!(store.get(&["savedCode-1068"]).await?.is_empty());

    time::sleep(AUTO_SAVE_INTERVAL).await;
    let saved = store.get(&["savedCode-1068"]).await?;
    assert_eq!(saved["savedCode-1068"], json!("// Write your code here"));

    task.stop().await;
    host.unmount().await;
    return Ok(());
}
