//! Query services
//!
//! Build the specification for a criteria value and execute it in one of
//! three modes. Services are read-only and hold no per-request state.

use std::marker::PhantomData;
use std::sync::Arc;

use league_core::{Entity, LeagueResult, Page, PageRequest};
use league_db::{SpecificationExecutor, Store};
use league_queries::{create_specification, Criteria};
use tracing::debug;

/// Filtered reads over one entity type
pub struct QueryService<T: Entity, C> {
    store: Arc<dyn Store<T>>,
    criteria: PhantomData<fn(&C)>,
}

impl<T: Entity, C> Clone for QueryService<T, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            criteria: PhantomData,
        }
    }
}

impl<T: Entity, C: Criteria> QueryService<T, C> {
    pub fn new(store: Arc<dyn Store<T>>) -> Self {
        Self {
            store,
            criteria: PhantomData,
        }
    }

    /// Every entity matching `criteria`; `None` matches everything
    pub async fn find_by_criteria(&self, criteria: Option<&C>) -> LeagueResult<Vec<T>> {
        debug!(entity = T::ENTITY_NAME, ?criteria, "find by criteria");
        let spec = create_specification(criteria);
        Ok(self.store.find_all(&spec).await?)
    }

    /// One page of the entities matching `criteria`, plus the total
    pub async fn find_page_by_criteria(
        &self,
        criteria: Option<&C>,
        page: &PageRequest,
    ) -> LeagueResult<Page<T>> {
        debug!(entity = T::ENTITY_NAME, ?criteria, ?page, "find page by criteria");
        let spec = create_specification(criteria);
        Ok(self.store.find_page(&spec, page).await?)
    }

    /// Number of entities [`find_by_criteria`](Self::find_by_criteria) returns
    pub async fn count_by_criteria(&self, criteria: Option<&C>) -> LeagueResult<i64> {
        debug!(entity = T::ENTITY_NAME, ?criteria, "count by criteria");
        let spec = create_specification(criteria);
        Ok(self.store.count(&spec).await?)
    }
}
