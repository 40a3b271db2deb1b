use anyhow::Result;
use serde_json::json;
use serde_json::Map;

use super::FileStore;
use crate::domain::models::KeyValueStore;

fn entries(key: &str, value: serde_json::Value) -> Map<String, serde_json::Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    return map;
}

#[tokio::test]
async fn it_returns_nothing_when_the_file_is_missing() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileStore::new(dir.path().join("nested/storage.json"));

    let res = store.get(&["language"]).await?;
    assert!(res.is_empty());
    return Ok(());
}

#[tokio::test]
async fn it_persists_entries_across_instances() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("nested/storage.json");

    FileStore::new(file_path.clone())
        .set(entries("savedCode-1068", json!("int main(){}")))
        .await?;
    FileStore::new(file_path.clone())
        .set(entries("language", json!("java")))
        .await?;

    let res = FileStore::new(file_path)
        .get(&["savedCode-1068", "language", "fontSize"])
        .await?;

    assert_eq!(res.len(), 2);
    assert_eq!(res["savedCode-1068"], json!("int main(){}"));
    assert_eq!(res["language"], json!("java"));
    return Ok(());
}

#[tokio::test]
async fn it_removes_entries() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let store = FileStore::new(dir.path().join("storage.json"));

    store.set(entries("codeToSubmit", json!({ "code": "x" }))).await?;
    store.remove("codeToSubmit").await?;
    store.remove("codeToSubmit").await?;

    let res = store.get(&["codeToSubmit"]).await?;
    assert!(res.is_empty());
    return Ok(());
}

#[tokio::test]
async fn it_fails_on_a_corrupt_document() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file_path = dir.path().join("storage.json");
    std::fs::write(&file_path, "[1, 2, 3]")?;

    let err = FileStore::new(file_path).get(&["language"]).await.unwrap_err();
    assert!(err.to_string().contains("does not contain a JSON object"));
    return Ok(());
}
