#[cfg(test)]
#[path = "templates_test.rs"]
mod tests;

use anyhow::Result;
use serde_json::Map;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::models::LanguageName;
use crate::domain::models::StoreBox;
use crate::domain::models::Template;
use crate::domain::models::TEMPLATES_KEY;

/// Named code snippets, partitioned by language and kept in insertion order.
///
/// Nothing guards concurrent writers. Two writers racing on the table means
/// the last write wins.
pub struct TemplateStore {
    store: StoreBox,
}

impl TemplateStore {
    pub fn new(store: StoreBox) -> TemplateStore {
        return TemplateStore { store };
    }

    pub fn create_id() -> String {
        return Uuid::new_v4()
            .to_string()
            .split('-')
            .enumerate()
            .filter_map(|(idx, str)| {
                if idx > 1 {
                    return None;
                }
                return Some(str);
            })
            .collect::<Vec<&str>>()
            .join("-");
    }

    async fn load_table(&self) -> Result<Map<String, Value>> {
        let mut res = self.store.get(&[TEMPLATES_KEY]).await?;
        match res.remove(TEMPLATES_KEY) {
            Some(Value::Object(table)) => return Ok(table),
            Some(other) => {
                tracing::warn!(value = %other, "Templates table is not an object, starting over");
                return Ok(Map::new());
            }
            None => return Ok(Map::new()),
        }
    }

    fn read_bucket(table: &Map<String, Value>, language: LanguageName) -> Result<Vec<Template>> {
        if let Some(bucket) = table.get(&language.to_string()) {
            let templates: Vec<Template> = serde_json::from_value(bucket.clone())?;
            return Ok(templates);
        }

        return Ok(vec![]);
    }

    async fn write_bucket(
        &self,
        mut table: Map<String, Value>,
        language: LanguageName,
        templates: &[Template],
    ) -> Result<()> {
        table.insert(language.to_string(), serde_json::to_value(templates)?);

        let mut items = Map::new();
        items.insert(TEMPLATES_KEY.to_string(), Value::Object(table));
        self.store.set(items).await?;

        return Ok(());
    }

    pub async fn list(&self, language: LanguageName) -> Result<Vec<Template>> {
        let table = self.load_table().await?;
        return TemplateStore::read_bucket(&table, language);
    }

    pub async fn find(&self, language: LanguageName, id: &str) -> Result<Option<Template>> {
        let templates = self.list(language).await?;
        return Ok(templates.into_iter().find(|e| return e.id == id));
    }

    /// Creates the template when its id is empty, otherwise updates the stored
    /// template with that id in place. Returns what was stored, or `None` when
    /// the id matched nothing and the save was dropped.
    pub async fn save(&self, language: LanguageName, template: Template) -> Result<Option<Template>> {
        let table = self.load_table().await?;
        let mut templates = TemplateStore::read_bucket(&table, language)?;

        let saved = if template.id.is_empty() {
            let mut id = TemplateStore::create_id();
            while templates.iter().any(|e| return e.id == id) {
                id = TemplateStore::create_id();
            }

            let created = Template { id, ..template };
            templates.push(created.clone());
            created
        } else if let Some(existing) = templates.iter_mut().find(|e| return e.id == template.id) {
            existing.name = template.name;
            existing.code = template.code;
            existing.clone()
        } else {
            tracing::warn!(
                language = %language,
                id = %template.id,
                "No template with this id, save dropped"
            );
            return Ok(None);
        };

        self.write_bucket(table, language, &templates).await?;
        tracing::debug!(language = %language, id = %saved.id, "Template saved");

        return Ok(Some(saved));
    }

    pub async fn delete(&self, language: LanguageName, id: &str) -> Result<()> {
        let table = self.load_table().await?;
        let mut templates = TemplateStore::read_bucket(&table, language)?;

        let count = templates.len();
        templates.retain(|e| return e.id != id);
        if templates.len() == count {
            return Ok(());
        }

        return self.write_bucket(table, language, &templates).await;
    }
}
