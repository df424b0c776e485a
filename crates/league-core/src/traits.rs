//! Core traits shared by the domain entities

/// Primary key type
pub type Id = i64;

/// Trait for entities that have a primary key
pub trait Identifiable {
    fn id(&self) -> Option<Id>;

    fn is_persisted(&self) -> bool {
        self.id().is_some()
    }
}

/// Base trait for all domain entities
pub trait Entity: Identifiable + Clone + Send + Sync + 'static {
    /// Name used in client error payloads (`"player"`)
    const ENTITY_NAME: &'static str;

    /// Copy every non-null field of `patch` onto `self`
    fn merge(&mut self, patch: Self);
}
