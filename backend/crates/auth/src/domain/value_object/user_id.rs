//! Internal user identifier (UUID v4, never exposed outside the service)

use kernel::id::Id;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserMarker;
pub type UserId = Id<UserMarker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_new() {
        let user_id = UserId::new();
        let uuid = user_id.as_uuid();
        assert_eq!(uuid.get_version_num(), 4); // UUIDv4
    }

    #[test]
    fn test_from_uuid() {
        let uuid = uuid::Uuid::new_v4();
        let user_id = UserId::from_uuid(uuid);
        assert_eq!(user_id.as_uuid(), &uuid);
    }

    #[test]
    fn test_distinct_per_user() {
        assert_ne!(UserId::new(), UserId::new());
    }
}
