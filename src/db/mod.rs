mod models;
mod task_repository;
mod user_repository;

use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel::RunQueryDsl;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use std::sync::Arc;

use crate::errors::Error;

pub use models::*;
pub use task_repository::*;
pub use user_repository::*;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Sqlite serializes writers per database; the busy timeout makes concurrent
/// updates to unrelated records wait instead of erroring.
#[derive(Debug)]
struct ConnectionOptions;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        diesel::sql_query("PRAGMA busy_timeout = 5000;")
            .execute(conn)
            .map_err(diesel::r2d2::Error::QueryError)?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct Database {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl Database {
    pub fn new(db_path: &str) -> Self {
        let manager = ConnectionManager::<SqliteConnection>::new(db_path);
        let mut builder = Pool::builder().connection_customizer(Box::new(ConnectionOptions));
        // Each sqlite ":memory:" connection is its own database; a single
        // pooled connection keeps the schema visible to every caller.
        if db_path == ":memory:" {
            builder = builder.max_size(1);
        }
        let pool = builder.build(manager).expect("Failed to create pool.");

        let database = Database {
            pool: Arc::new(pool),
        };
        database.run_migrations();
        database
    }

    fn run_migrations(&self) {
        let mut conn = self.pool.get().expect("Failed to get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Failed to run migrations");
    }

    pub fn get_conn(
        &self,
    ) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>, Error> {
        Ok(self.pool.get()?)
    }
}
