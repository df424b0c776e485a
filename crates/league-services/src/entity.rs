//! Entity services
//!
//! Create, update, partial update, read and delete of a single entity, with
//! the identifier guards every mutation endpoint applies:
//!
//! - `idexists`: a new entity must not carry an id
//! - `idnull`: updates need an id in the body
//! - `idinvalid`: the body id must equal the path id
//! - `idnotfound`: updates only apply to stored entities

use std::sync::Arc;

use league_core::{Entity, Id, LeagueError, LeagueResult, ValidationErrors};
use league_db::{Repository, Store};
use tracing::debug;
use validator::Validate;

pub mod error_keys {
    pub const ID_EXISTS: &str = "idexists";
    pub const ID_NULL: &str = "idnull";
    pub const ID_INVALID: &str = "idinvalid";
    pub const ID_NOT_FOUND: &str = "idnotfound";
}

/// Single-entity reads and writes for one entity type
pub struct EntityService<T: Entity> {
    store: Arc<dyn Store<T>>,
}

impl<T: Entity> Clone for EntityService<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: Entity + Validate + std::fmt::Debug> EntityService<T> {
    pub fn new(store: Arc<dyn Store<T>>) -> Self {
        Self { store }
    }

    pub async fn create(&self, entity: T) -> LeagueResult<T> {
        debug!(entity_name = T::ENTITY_NAME, ?entity, "save");
        if entity.is_persisted() {
            return Err(LeagueError::bad_request_alert(
                format!("A new {} cannot already have an ID", T::ENTITY_NAME),
                T::ENTITY_NAME,
                error_keys::ID_EXISTS,
            ));
        }

        validate(&entity)?;
        Ok(self.store.save(entity).await?)
    }

    /// Replace the stored entity `id` with `entity`
    pub async fn update(&self, id: Id, entity: T) -> LeagueResult<T> {
        debug!(entity_name = T::ENTITY_NAME, id, ?entity, "update");
        self.check_identity(id, &entity).await?;

        validate(&entity)?;
        Ok(self.store.save(entity).await?)
    }

    /// Copy the non-null fields of `patch` onto the stored entity `id`.
    ///
    /// Returns `None` when the entity disappeared after the guards passed.
    pub async fn partial_update(&self, id: Id, patch: T) -> LeagueResult<Option<T>> {
        debug!(entity_name = T::ENTITY_NAME, id, ?patch, "partial update");
        self.check_identity(id, &patch).await?;

        let Some(mut existing) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };
        existing.merge(patch);

        validate(&existing)?;
        Ok(Some(self.store.save(existing).await?))
    }

    pub async fn find_one(&self, id: Id) -> LeagueResult<Option<T>> {
        debug!(entity_name = T::ENTITY_NAME, id, "find one");
        Ok(self.store.find_by_id(id).await?)
    }

    /// Deleting an unknown id succeeds
    pub async fn delete(&self, id: Id) -> LeagueResult<()> {
        debug!(entity_name = T::ENTITY_NAME, id, "delete");
        Ok(self.store.delete(id).await?)
    }

    async fn check_identity(&self, id: Id, entity: &T) -> LeagueResult<()> {
        let Some(body_id) = entity.id() else {
            return Err(alert::<T>("Invalid id", error_keys::ID_NULL));
        };
        if body_id != id {
            return Err(alert::<T>("Invalid ID", error_keys::ID_INVALID));
        }
        if !self.store.exists(id).await? {
            return Err(alert::<T>("Entity not found", error_keys::ID_NOT_FOUND));
        }
        Ok(())
    }
}

fn alert<T: Entity>(message: &str, error_key: &'static str) -> LeagueError {
    LeagueError::bad_request_alert(message, T::ENTITY_NAME, error_key)
}

fn validate<T: Validate>(entity: &T) -> LeagueResult<()> {
    entity.validate().map_err(|errors| {
        let mut converted = ValidationErrors::new();
        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("is invalid ({})", error.code));
                converted.add(field, message);
            }
        }
        LeagueError::Validation(converted)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use league_db::MemoryStore;
    use league_models::{Player, Team};

    fn services() -> (EntityService<Player>, EntityService<Team>) {
        let store = MemoryStore::new();
        (
            EntityService::new(Arc::new(store.clone())),
            EntityService::new(Arc::new(store)),
        )
    }

    fn error_key(err: &LeagueError) -> &'static str {
        match err {
            LeagueError::BadRequestAlert { error_key, .. } => *error_key,
            other => panic!("expected an alert, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let (_, teams) = services();
        let team = teams.create(Team::new("Bulls", "Chicago")).await.unwrap();
        assert!(team.id.is_some());
        assert_eq!(teams.find_one(team.id.unwrap()).await.unwrap(), Some(team));
    }

    #[tokio::test]
    async fn test_create_with_id_is_rejected() {
        let (players, _) = services();
        let mut player = Player::new("John");
        player.id = Some(3);

        let err = players.create(player).await.unwrap_err();
        assert_eq!(error_key(&err), "idexists");
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_string(), "A new player cannot already have an ID");
    }

    #[tokio::test]
    async fn test_update_guards() {
        let (_, teams) = services();
        let stored = teams.create(Team::new("Bulls", "Chicago")).await.unwrap();
        let id = stored.id.unwrap();

        let err = teams.update(id, Team::new("x", "y")).await.unwrap_err();
        assert_eq!(error_key(&err), "idnull");

        let err = teams.update(id + 1, stored.clone()).await.unwrap_err();
        assert_eq!(error_key(&err), "idinvalid");

        let mut unknown = stored.clone();
        unknown.id = Some(404);
        let err = teams.update(404, unknown).await.unwrap_err();
        assert_eq!(error_key(&err), "idnotfound");

        let mut renamed = stored;
        renamed.name = Some("Chicago Bulls".to_string());
        let updated = teams.update(id, renamed).await.unwrap();
        assert_eq!(updated.name.as_deref(), Some("Chicago Bulls"));
    }

    #[tokio::test]
    async fn test_partial_update_merges() {
        let (players, teams) = services();
        let team = teams.create(Team::new("Bulls", "Chicago")).await.unwrap();
        let stored = players
            .create(Player {
                baskets: Some(3),
                ..Player::new("John")
            })
            .await
            .unwrap();
        let id = stored.id.unwrap();

        let patch = Player {
            id: Some(id),
            assists: Some(9),
            ..Default::default()
        }
        .with_team(team.id.unwrap());

        let merged = players.partial_update(id, patch).await.unwrap().unwrap();
        assert_eq!(merged.name.as_deref(), Some("John"));
        assert_eq!(merged.baskets, Some(3));
        assert_eq!(merged.assists, Some(9));
        assert_eq!(
            merged.team.and_then(|t| t.name).as_deref(),
            Some("Bulls")
        );
    }

    #[tokio::test]
    async fn test_validation_failure() {
        let (_, teams) = services();
        let err = teams
            .create(Team::new("x".repeat(300), "Chicago"))
            .await
            .unwrap_err();

        match err {
            LeagueError::Validation(errors) => assert!(errors.has_error("name")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (players, _) = services();
        let player = players.create(Player::new("John")).await.unwrap();
        let id = player.id.unwrap();

        players.delete(id).await.unwrap();
        players.delete(id).await.unwrap();
        assert_eq!(players.find_one(id).await.unwrap(), None);
    }
}
