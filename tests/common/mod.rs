//! Helpers for integration tests.

use pushkind_catalog::db::{DbPool, establish_connection_pool, run_migrations};

/// Temporary database used in integration tests.
pub struct TestDb {
    filename: String,
    pool: Option<DbPool>,
}

impl TestDb {
    pub fn new(filename: &str) -> Self {
        std::fs::remove_file(filename).ok(); // Clean up old DB

        let pool =
            establish_connection_pool(filename).expect("Failed to establish SQLite connection.");
        run_migrations(&pool).expect("Migrations failed");
        TestDb {
            filename: filename.to_string(),
            pool: Some(pool),
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone().expect("pool is available until drop")
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        // Close pooled connections before removing the files.
        drop(self.pool.take());
        std::fs::remove_file(&self.filename).ok();
        std::fs::remove_file(format!("{}-shm", &self.filename)).ok();
        std::fs::remove_file(format!("{}-wal", &self.filename)).ok();
    }
}
