use uuid::Uuid;

/// Generate a fresh identifier for a project, category, term or template.
/// Random v4 UUIDs, so an id is never handed out twice.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
