//! In-memory template repository using DashMap.
//!
//! Templates are stored in memory and will be lost on service restart.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use uuid::Uuid;

use crate::template::PromptTemplate;

use super::backend::{StoreError, StoreResult, TemplateQuery, TemplateRepository};

/// In-memory template repository.
#[derive(Default)]
pub struct MemoryTemplateRepository {
    templates: DashMap<Uuid, PromptTemplate>,
}

impl MemoryTemplateRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TemplateRepository for MemoryTemplateRepository {
    fn backend_type(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, template: &PromptTemplate) -> StoreResult<()> {
        match self.templates.entry(template.id) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(template.id)),
            Entry::Vacant(slot) => {
                slot.insert(template.clone());
                Ok(())
            }
        }
    }

    async fn get_by_id(&self, id: Uuid) -> StoreResult<PromptTemplate> {
        self.templates
            .get(&id)
            .map(|t| t.clone())
            .ok_or(StoreError::NotFound(id))
    }

    async fn list(&self, query: &TemplateQuery) -> StoreResult<Vec<PromptTemplate>> {
        let mut matching: Vec<PromptTemplate> = self
            .templates
            .iter()
            .filter(|entry| query.matches(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();

        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(matching
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn update(&self, template: &PromptTemplate) -> StoreResult<()> {
        let mut stored = self
            .templates
            .get_mut(&template.id)
            .ok_or(StoreError::NotFound(template.id))?;

        let usage_count = stored.usage_count;
        *stored = template.clone();
        stored.usage_count = usage_count;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StoreResult<()> {
        self.templates
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn increment_usage(&self, id: Uuid) -> StoreResult<()> {
        let mut stored = self
            .templates
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        stored.usage_count += 1;
        Ok(())
    }

    async fn count(&self) -> StoreResult<u64> {
        Ok(self.templates.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn template(name: &str, category: &str, is_public: bool, age_minutes: i64) -> PromptTemplate {
        let created_at = Utc::now() - Duration::minutes(age_minutes);
        PromptTemplate {
            id: Uuid::new_v4(),
            user_id: Uuid::nil(),
            name: name.to_string(),
            description: String::new(),
            content: format!("{} {{{{topic}}}}", name),
            variables: vec![],
            category: category.to_string(),
            is_public,
            usage_count: 0,
            created_at,
            updated_at: created_at,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = MemoryTemplateRepository::new();
        let t = template("first", "writing", false, 0);

        repo.create(&t).await.unwrap();
        let fetched = repo.get_by_id(t.id).await.unwrap();
        assert_eq!(fetched, t);
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let repo = MemoryTemplateRepository::new();
        let t = template("first", "", false, 0);

        repo.create(&t).await.unwrap();
        assert!(matches!(
            repo.create(&t).await,
            Err(StoreError::AlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_get_missing() {
        let repo = MemoryTemplateRepository::new();
        assert!(matches!(
            repo.get_by_id(Uuid::new_v4()).await,
            Err(StoreError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_filters_orders_and_pages() {
        let repo = MemoryTemplateRepository::new();
        let oldest = template("oldest", "writing", true, 30);
        let middle = template("middle", "coding", true, 20);
        let newest = template("newest", "writing", false, 10);
        for t in [&oldest, &middle, &newest] {
            repo.create(t).await.unwrap();
        }

        let all = repo.list(&TemplateQuery::default()).await.unwrap();
        let names: Vec<_> = all.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["newest", "middle", "oldest"]);

        let writing = repo
            .list(&TemplateQuery {
                category: Some("writing".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(writing.len(), 2);

        let public = repo
            .list(&TemplateQuery {
                public_only: true,
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(public.iter().all(|t| t.is_public));
        assert_eq!(public.len(), 2);

        let second_page = repo
            .list(&TemplateQuery {
                limit: 2,
                offset: 2,
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(second_page.len(), 1);
        assert_eq!(second_page[0].name, "oldest");
    }

    #[tokio::test]
    async fn test_update_preserves_usage_count() {
        let repo = MemoryTemplateRepository::new();
        let mut t = template("before", "", false, 0);
        repo.create(&t).await.unwrap();
        repo.increment_usage(t.id).await.unwrap();

        t.name = "after".to_string();
        repo.update(&t).await.unwrap();

        let fetched = repo.get_by_id(t.id).await.unwrap();
        assert_eq!(fetched.name, "after");
        assert_eq!(fetched.usage_count, 1);
    }

    #[tokio::test]
    async fn test_delete_and_count() {
        let repo = MemoryTemplateRepository::new();
        let t = template("gone", "", false, 0);
        repo.create(&t).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);

        repo.delete(t.id).await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 0);
        assert!(matches!(repo.delete(t.id).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_increment_usage_missing() {
        let repo = MemoryTemplateRepository::new();
        assert!(matches!(
            repo.increment_usage(Uuid::new_v4()).await,
            Err(StoreError::NotFound(_))
        ));
    }
}
