use request_state::EntityStore;
use serde::{de::DeserializeOwned, Serialize};
use shared::{domain::EntityId, error::ApiError};
use tracing::debug;

use crate::service::{ApiService, RequestOptions};

/// A REST collection (`{path}` / `{path}/{id}`) whose calls are tracked in
/// an [`EntityStore`].
pub struct ResourceService<E> {
    api: ApiService,
    path: String,
    store: EntityStore<E, ApiError>,
}

impl<E> ResourceService<E>
where
    E: DeserializeOwned + Clone + Send + 'static,
{
    pub fn new(api: ApiService, path: impl Into<String>) -> Self {
        Self {
            api,
            path: path.into().trim_matches('/').to_string(),
            store: EntityStore::new(),
        }
    }

    pub fn store(&self) -> &EntityStore<E, ApiError> {
        &self.store
    }

    pub fn api(&self) -> &ApiService {
        &self.api
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn item_endpoint(&self, id: EntityId) -> String {
        format!("{}/{}", self.path, id)
    }

    pub async fn fetch_one(&self, id: EntityId) -> Result<E, ApiError> {
        debug!(resource = %self.path, %id, "fetching entity");
        let endpoint = self.item_endpoint(id);
        self.store
            .fetch_entity(self.api.get(&endpoint, None))
            .await
    }

    pub async fn fetch_all(&self, options: Option<&RequestOptions>) -> Result<Vec<E>, ApiError> {
        debug!(resource = %self.path, "fetching entities");
        self.store
            .fetch_entities(self.api.get(&self.path, options))
            .await
    }

    pub async fn create<B>(&self, body: &B) -> Result<E, ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!(resource = %self.path, "creating entity");
        self.store
            .create_entity(self.api.post(&self.path, Some(body), None))
            .await
    }

    pub async fn update<B>(&self, id: EntityId, body: &B) -> Result<E, ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!(resource = %self.path, %id, "replacing entity");
        let endpoint = self.item_endpoint(id);
        self.store
            .update_entity(self.api.put(&endpoint, Some(body), None))
            .await
    }

    /// Partial update; tracked as an update.
    pub async fn patch<B>(&self, id: EntityId, body: &B) -> Result<E, ApiError>
    where
        B: Serialize + ?Sized,
    {
        debug!(resource = %self.path, %id, "patching entity");
        let endpoint = self.item_endpoint(id);
        self.store
            .update_entity(self.api.patch(&endpoint, Some(body), None))
            .await
    }

    pub async fn delete(&self, id: EntityId) -> Result<E, ApiError> {
        debug!(resource = %self.path, %id, "deleting entity");
        let endpoint = self.item_endpoint(id);
        self.store
            .delete_entity(self.api.delete(&endpoint, None))
            .await
    }
}

#[cfg(test)]
#[path = "tests/resource_tests.rs"]
mod tests;
