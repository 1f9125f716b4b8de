//! Common ID Types
//!
//! Type-safe ID wrappers for domain entities.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Generic typed ID wrapper
///
/// Each domain declares its own marker type so ids of different entities
/// cannot be mixed up at compile time:
/// ```
/// use kernel::id::Id;
///
/// struct UserMarker;
/// type UserId = Id<UserMarker>;
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: uuid::Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Create a new random ID (UUID v4)
    pub fn new() -> Self {
        Self {
            value: Uuid::new_v4(),
            _marker: PhantomData,
        }
    }

    /// Create from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self {
            value: uuid,
            _marker: PhantomData,
        }
    }

    /// Get the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    /// Convert to UUID
    pub fn into_uuid(self) -> Uuid {
        self.value
    }
}

impl<T> Default for Id<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> From<Uuid> for Id<T> {
    fn from(uuid: Uuid) -> Self {
        Self::from_uuid(uuid)
    }
}

impl<T> From<Id<T>> for Uuid {
    fn from(id: Id<T>) -> Self {
        id.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct UserMarker;
    struct SessionMarker;

    type UserId = Id<UserMarker>;
    type SessionId = Id<SessionMarker>;

    #[test]
    fn test_id_type_safety() {
        let user_id: UserId = Id::new();
        let session_id: SessionId = Id::new();

        // These are different types, cannot be mixed
        let _u: Uuid = user_id.into_uuid();
        let _s: Uuid = session_id.into_uuid();
    }

    #[test]
    fn test_id_from_uuid() {
        let uuid = Uuid::new_v4();
        let id: UserId = Id::from_uuid(uuid);
        assert_eq!(id.as_uuid(), &uuid);
    }

    #[test]
    fn test_id_is_v4() {
        let id: UserId = Id::new();
        assert_eq!(id.as_uuid().get_version_num(), 4);
    }
}
