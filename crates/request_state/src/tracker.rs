use std::{collections::HashMap, fmt, future::Future, hash::Hash};

use crate::{cell::StateCell, join::join_parallel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    FetchEntity,
    FetchEntities,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    pub const ALL: [OperationKind; 5] = [
        OperationKind::FetchEntity,
        OperationKind::FetchEntities,
        OperationKind::Create,
        OperationKind::Update,
        OperationKind::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::FetchEntity => "fetch_entity",
            OperationKind::FetchEntities => "fetch_entities",
            OperationKind::Create => "create",
            OperationKind::Update => "update",
            OperationKind::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Busy flag, last failure and last successful result of one operation kind.
pub struct OperationState<T, Err> {
    busy: StateCell<bool>,
    last_error: StateCell<Option<Err>>,
    result: StateCell<Option<T>>,
}

impl<T, Err> OperationState<T, Err>
where
    T: Clone + Send + 'static,
    Err: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            busy: StateCell::new(false),
            last_error: StateCell::new(None),
            result: StateCell::new(None),
        }
    }

    pub fn busy(&self) -> &StateCell<bool> {
        &self.busy
    }

    pub fn last_error(&self) -> &StateCell<Option<Err>> {
        &self.last_error
    }

    pub fn result(&self) -> &StateCell<Option<T>> {
        &self.result
    }

    /// Drives the three cells around `producer`.
    ///
    /// `busy` goes up and `last_error` is cleared as soon as this is called,
    /// before the returned future is first polled. On success the value lands
    /// in `result`; on failure the error lands in `last_error` and is also
    /// returned. `busy` drops last, after the outcome is recorded, and also
    /// when the returned future is dropped early or never polled.
    pub fn run<'a, F>(&'a self, producer: F) -> impl Future<Output = Result<T, Err>> + 'a
    where
        F: Future<Output = Result<T, Err>> + 'a,
    {
        self.busy.write(true);
        self.last_error.write(None);
        let settle = SettleBusy(&self.busy);

        async move {
            let _settle = settle;
            match producer.await {
                Ok(value) => {
                    self.result.write(Some(value.clone()));
                    Ok(value)
                }
                Err(err) => {
                    self.last_error.write(Some(err.clone()));
                    Err(err)
                }
            }
        }
    }

    pub fn set_result(&self, value: Option<T>) {
        self.result.write(value);
    }

    pub fn clear_error(&self) {
        self.last_error.write(None);
    }

    pub fn clear_busy(&self) {
        self.busy.write(false);
    }

    /// Clears both the busy flag and the last error, leaving the result.
    pub fn reset_status(&self) {
        self.busy.write(false);
        self.last_error.write(None);
    }
}

impl<T, Err> Default for OperationState<T, Err>
where
    T: Clone + Send + 'static,
    Err: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug, Err: fmt::Debug> fmt::Debug for OperationState<T, Err> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperationState")
            .field("busy", &self.busy)
            .field("last_error", &self.last_error)
            .field("result", &self.result)
            .finish()
    }
}

struct SettleBusy<'a>(&'a StateCell<bool>);

impl Drop for SettleBusy<'_> {
    fn drop(&mut self) {
        self.0.write(false);
    }
}

/// Request state for one entity type.
///
/// Each store owns its cells; two stores never share state. Concurrent runs
/// of the same kind are not serialized: whichever producer settles last
/// leaves its outcome in the cells.
pub struct EntityStore<E, Err> {
    entity: OperationState<E, Err>,
    entities: OperationState<Vec<E>, Err>,
    creating: OperationState<E, Err>,
    updating: OperationState<E, Err>,
    deleting: OperationState<E, Err>,
}

impl<E, Err> EntityStore<E, Err>
where
    E: Clone + Send + 'static,
    Err: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            entity: OperationState::new(),
            entities: OperationState::new(),
            creating: OperationState::new(),
            updating: OperationState::new(),
            deleting: OperationState::new(),
        }
    }

    pub fn fetch_entity<'a, F>(&'a self, producer: F) -> impl Future<Output = Result<E, Err>> + 'a
    where
        F: Future<Output = Result<E, Err>> + 'a,
    {
        self.entity.run(producer)
    }

    pub fn fetch_entities<'a, F>(&'a self, producer: F) -> impl Future<Output = Result<Vec<E>, Err>> + 'a
    where
        F: Future<Output = Result<Vec<E>, Err>> + 'a,
    {
        self.entities.run(producer)
    }

    pub fn create_entity<'a, F>(&'a self, producer: F) -> impl Future<Output = Result<E, Err>> + 'a
    where
        F: Future<Output = Result<E, Err>> + 'a,
    {
        self.creating.run(producer)
    }

    pub fn update_entity<'a, F>(&'a self, producer: F) -> impl Future<Output = Result<E, Err>> + 'a
    where
        F: Future<Output = Result<E, Err>> + 'a,
    {
        self.updating.run(producer)
    }

    pub fn delete_entity<'a, F>(&'a self, producer: F) -> impl Future<Output = Result<E, Err>> + 'a
    where
        F: Future<Output = Result<E, Err>> + 'a,
    {
        self.deleting.run(producer)
    }

    /// Untracked fan-out/fan-in; see [`join_parallel`].
    pub async fn fetch_parallel<K, T, I, F>(&self, producers: I) -> Result<HashMap<K, T>, Err>
    where
        K: Eq + Hash,
        I: IntoIterator<Item = (K, F)>,
        F: Future<Output = Result<T, Err>>,
    {
        join_parallel(producers).await
    }

    pub fn entity_state(&self) -> &OperationState<E, Err> {
        &self.entity
    }

    pub fn entities_state(&self) -> &OperationState<Vec<E>, Err> {
        &self.entities
    }

    pub fn creating_state(&self) -> &OperationState<E, Err> {
        &self.creating
    }

    pub fn updating_state(&self) -> &OperationState<E, Err> {
        &self.updating
    }

    pub fn deleting_state(&self) -> &OperationState<E, Err> {
        &self.deleting
    }

    pub fn is_fetching_entity(&self) -> &StateCell<bool> {
        self.entity.busy()
    }

    pub fn error_fetching_entity(&self) -> &StateCell<Option<Err>> {
        self.entity.last_error()
    }

    pub fn entity(&self) -> &StateCell<Option<E>> {
        self.entity.result()
    }

    pub fn is_fetching_entities(&self) -> &StateCell<bool> {
        self.entities.busy()
    }

    pub fn error_fetching_entities(&self) -> &StateCell<Option<Err>> {
        self.entities.last_error()
    }

    pub fn entities(&self) -> &StateCell<Option<Vec<E>>> {
        self.entities.result()
    }

    pub fn is_creating(&self) -> &StateCell<bool> {
        self.creating.busy()
    }

    pub fn error_creating(&self) -> &StateCell<Option<Err>> {
        self.creating.last_error()
    }

    pub fn entity_created(&self) -> &StateCell<Option<E>> {
        self.creating.result()
    }

    pub fn is_updating(&self) -> &StateCell<bool> {
        self.updating.busy()
    }

    pub fn error_updating(&self) -> &StateCell<Option<Err>> {
        self.updating.last_error()
    }

    pub fn entity_updated(&self) -> &StateCell<Option<E>> {
        self.updating.result()
    }

    pub fn is_deleting(&self) -> &StateCell<bool> {
        self.deleting.busy()
    }

    pub fn error_deleting(&self) -> &StateCell<Option<Err>> {
        self.deleting.last_error()
    }

    pub fn entity_deleted(&self) -> &StateCell<Option<E>> {
        self.deleting.result()
    }

    pub fn is_busy(&self, kind: OperationKind) -> bool {
        match kind {
            OperationKind::FetchEntity => self.entity.busy.read(),
            OperationKind::FetchEntities => self.entities.busy.read(),
            OperationKind::Create => self.creating.busy.read(),
            OperationKind::Update => self.updating.busy.read(),
            OperationKind::Delete => self.deleting.busy.read(),
        }
    }

    pub fn any_busy(&self) -> bool {
        OperationKind::ALL.into_iter().any(|kind| self.is_busy(kind))
    }

    // Manual overrides. Each touches a single cell unless noted.

    pub fn set_entity(&self, entity: E) {
        self.entity.set_result(Some(entity));
    }

    pub fn set_entities(&self, entities: Vec<E>) {
        self.entities.set_result(Some(entities));
    }

    pub fn reset_entity(&self) {
        self.entity.set_result(None);
    }

    pub fn reset_entities(&self) {
        self.entities.set_result(None);
    }

    pub fn reset_entity_error(&self) {
        self.entity.clear_error();
    }

    pub fn reset_entities_error(&self) {
        self.entities.clear_error();
    }

    pub fn reset_entity_fetching(&self) {
        self.entity.clear_busy();
    }

    pub fn reset_entities_fetching(&self) {
        self.entities.clear_busy();
    }

    /// Clears `is_creating` and `error_creating` together.
    pub fn reset_creating(&self) {
        self.creating.reset_status();
    }

    /// Clears `is_updating` and `error_updating` together.
    pub fn reset_updating(&self) {
        self.updating.reset_status();
    }

    /// Clears `is_deleting` and `error_deleting` together.
    pub fn reset_deleting(&self) {
        self.deleting.reset_status();
    }

    pub fn reset_created(&self) {
        self.creating.set_result(None);
    }

    pub fn reset_updated(&self) {
        self.updating.set_result(None);
    }

    pub fn reset_deleted(&self) {
        self.deleting.set_result(None);
    }
}

impl<E, Err> Default for EntityStore<E, Err>
where
    E: Clone + Send + 'static,
    Err: Clone + Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/tracker_tests.rs"]
mod tests;
