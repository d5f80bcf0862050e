use sea_orm::DatabaseConnection;

/// Application state containing shared resources
#[derive(Debug, Clone)]
pub struct AppState {
    /// Database connection (absent in tests that never touch the DB)
    db: Option<DatabaseConnection>,
}

impl AppState {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Some(db) }
    }

    pub fn new_without_db() -> Self {
        Self { db: None }
    }

    /// Borrow the database connection, if one is configured.
    ///
    /// Application code should go through [`crate::db::require_db`].
    pub fn db(&self) -> Option<&DatabaseConnection> {
        self.db.as_ref()
    }
}
