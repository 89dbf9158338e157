// Helper for generating UUIDv7 (timestamp-sortable UUIDs)
//
// Account ids are generated app-side so the Postgres and in-memory stores
// hand out the same kind of identifier, and so ids sort by creation time.

use uuid::Uuid;

/// Generate a new UUIDv7 (timestamp-sortable).
pub fn uuidv7() -> Uuid {
    Uuid::now_v7()
}

/// Parse an account id, returning `None` for anything that is not a UUID.
pub fn parse_id(id: &str) -> Option<Uuid> {
    Uuid::parse_str(id).ok()
}
