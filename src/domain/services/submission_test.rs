use std::sync::Arc;

use anyhow::Result;
use serde_json::json;
use serde_json::Map;

use super::package_submission;
use super::ConfirmationPage;
use super::SubmissionOutcome;
use super::SubmissionPipeline;
use crate::domain::models::EditorHandle;
use crate::domain::models::KeyValueStore;
use crate::domain::models::LanguageName;
use crate::domain::models::PendingSubmission;
use crate::domain::models::StoreBox;
use crate::domain::services::EditorHost;
use crate::domain::services::EditorProxy;
use crate::domain::services::Window;
use crate::infrastructure::editors::buffer::BufferEditor;
use crate::infrastructure::host::memory_form::MemoryForm;
use crate::infrastructure::host::static_page::StaticPage;
use crate::infrastructure::stores::memory::MemoryStore;

const TASK_URL: &str = "https://cses.fi/problemset/task/1068";
const SUBMIT_URL: &str = "https://cses.fi/problemset/submit/1068/";

async fn live_editor(code: &str) -> (Arc<EditorProxy>, EditorHost) {
    let window = Window::new();
    let proxy = Arc::new(EditorProxy::connect(&window));
    let page = StaticPage::new(TASK_URL, "rgb(255, 255, 255)");
    let host = EditorHost::mount(&window, &page, BufferEditor::new).unwrap();

    proxy.set_value(code).await.unwrap();
    return (proxy, host);
}

async fn park(store: &StoreBox, pending: serde_json::Value) -> Result<()> {
    let mut items = Map::new();
    items.insert("codeToSubmit".to_string(), pending);
    store.set(items).await?;
    return Ok(());
}

#[test]
fn it_packages_cpp_submissions() {
    let package = package_submission(LanguageName::Cpp, "int main(){}");

    assert_eq!(package.file.filename, "solution.cpp");
    assert_eq!(package.file.content, "int main(){}");
    assert_eq!(package.file.mime, "text/plain");
    assert_eq!(package.language_label, "C++");
}

#[test]
fn it_packages_python_with_the_native_label() {
    let package = package_submission(LanguageName::Python, "print(1)");

    assert_eq!(package.file.filename, "solution.py");
    assert_eq!(package.language_label, "Python 3");
}

#[tokio::test]
async fn it_submits_editor_code_through_the_native_form() -> Result<()> {
    let (proxy, host) = live_editor("int main(){}").await;
    let store: StoreBox = Arc::new(MemoryStore::default());
    let form = MemoryForm::new("/problemset/task/1068/");

    let pipeline = SubmissionPipeline::new(proxy, store, Some(Box::new(form.clone())));
    let outcome = pipeline.submit(LanguageName::Cpp).await?;

    assert_eq!(outcome, SubmissionOutcome::Submitted);
    let record = form.record();
    let file = record.attached_file.unwrap();
    assert_eq!(file.filename, "solution.cpp");
    assert_eq!(file.content, "int main(){}");
    assert_eq!(record.selected_language, Some("C++".to_string()));
    assert_eq!(record.submissions, 1);
    assert!(record.hidden);

    host.unmount().await;
    return Ok(());
}

#[tokio::test]
async fn it_aborts_without_a_file_input() -> Result<()> {
    let (proxy, host) = live_editor("int main(){}").await;
    let store: StoreBox = Arc::new(MemoryStore::default());
    let form = MemoryForm::new("/problemset/task/1068/").without_file_input();

    let pipeline = SubmissionPipeline::new(proxy, store, Some(Box::new(form.clone())));
    let outcome = pipeline.submit(LanguageName::Cpp).await?;

    assert_eq!(outcome, SubmissionOutcome::Aborted);
    assert_eq!(form.record().submissions, 0);

    host.unmount().await;
    return Ok(());
}

#[tokio::test]
async fn it_parks_code_when_the_page_has_no_form() -> Result<()> {
    let (proxy, host) = live_editor("class Solution {}").await;
    let store: StoreBox = Arc::new(MemoryStore::default());
    let foreign = MemoryForm::new("/login");

    let pipeline = SubmissionPipeline::new(proxy, store.clone(), Some(Box::new(foreign.clone())));
    let outcome = pipeline.submit(LanguageName::Java).await?;

    assert_eq!(outcome, SubmissionOutcome::Deferred);
    assert!(!foreign.record().hidden);

    let pending = ConfirmationPage::new(store).pending().await?;
    assert_eq!(
        pending,
        Some(PendingSubmission {
            code: "class Solution {}".to_string(),
            language: LanguageName::Java,
            filename: "Solution.java".to_string(),
        })
    );

    host.unmount().await;
    return Ok(());
}

#[tokio::test]
async fn it_submits_parked_code_once() -> Result<()> {
    let store: StoreBox = Arc::new(MemoryStore::default());
    park(
        &store,
        json!({ "code": "print(42)", "language": "python", "filename": "solution.py" }),
    )
    .await?;

    let page = ConfirmationPage::new(store.clone());
    let form = MemoryForm::new("/problemset/submit/1068/");

    let outcome = page.run(SUBMIT_URL, Some(&form)).await?;
    assert_eq!(outcome, SubmissionOutcome::Submitted);

    let record = form.record();
    assert_eq!(record.selected_language, Some("Python 3".to_string()));
    assert_eq!(record.attached_file.unwrap().content, "print(42)");
    assert!(store.get(&["codeToSubmit"]).await?.is_empty());

    let outcome = page.run(SUBMIT_URL, Some(&form)).await?;
    assert_eq!(outcome, SubmissionOutcome::Skipped);
    assert_eq!(form.record().submissions, 1);
    return Ok(());
}

#[tokio::test]
async fn it_keeps_parked_code_when_the_form_is_broken() -> Result<()> {
    let store: StoreBox = Arc::new(MemoryStore::default());
    park(
        &store,
        json!({ "code": "int main(){}", "language": "cpp", "filename": "solution.cpp" }),
    )
    .await?;

    let page = ConfirmationPage::new(store.clone());

    let outcome = page.run(SUBMIT_URL, None).await?;
    assert_eq!(outcome, SubmissionOutcome::Aborted);

    let broken = MemoryForm::new("/problemset/submit/1068/").without_file_input();
    let outcome = page.run(SUBMIT_URL, Some(&broken)).await?;
    assert_eq!(outcome, SubmissionOutcome::Aborted);

    assert!(page.pending().await?.is_some());
    return Ok(());
}

#[tokio::test]
async fn it_only_runs_on_submit_pages() -> Result<()> {
    let store: StoreBox = Arc::new(MemoryStore::default());
    park(
        &store,
        json!({ "code": "int main(){}", "language": "cpp", "filename": "solution.cpp" }),
    )
    .await?;

    let form = MemoryForm::new("/problemset/submit/1068/");
    let outcome = ConfirmationPage::new(store.clone())
        .run(TASK_URL, Some(&form))
        .await?;

    assert_eq!(outcome, SubmissionOutcome::Skipped);
    assert_eq!(form.record().submissions, 0);
    return Ok(());
}

#[tokio::test]
async fn it_packages_both_paths_identically() -> Result<()> {
    let (proxy, host) = live_editor("int main(){}").await;
    let store: StoreBox = Arc::new(MemoryStore::default());

    let live_form = MemoryForm::new("/problemset/task/1068/");
    SubmissionPipeline::new(proxy.clone(), store.clone(), Some(Box::new(live_form.clone())))
        .submit(LanguageName::Cpp)
        .await?;

    SubmissionPipeline::new(proxy, store.clone(), None)
        .submit(LanguageName::Cpp)
        .await?;
    let confirm_form = MemoryForm::new("/problemset/submit/1068/");
    ConfirmationPage::new(store)
        .run(SUBMIT_URL, Some(&confirm_form))
        .await?;

    let live = live_form.record();
    let confirmed = confirm_form.record();
    assert_eq!(live.attached_file, confirmed.attached_file);
    assert_eq!(live.selected_language, confirmed.selected_language);

    host.unmount().await;
    return Ok(());
}
