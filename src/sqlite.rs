//! Production connection factory for SQLite over sqlx

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tracing::debug;

use crate::factory::ConnectionFactory;

/// Opens [`SqliteConnection`]s for a single database file.
///
/// The path (or full connect options) comes from the application's settings
/// provider, resolved once at startup. Liveness is probed with a ping and
/// reset rolls back any transaction a holder left open, so connections
/// always re-enter the pool in auto-commit mode.
#[derive(Debug, Clone)]
pub struct SqliteConnectionFactory {
   options: SqliteConnectOptions,
}

impl SqliteConnectionFactory {
   /// Create a factory for the database file at `path`.
   ///
   /// The file is created on first connect if it does not exist.
   pub fn new(path: impl AsRef<Path>) -> Self {
      Self {
         options: SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true),
      }
   }

   /// Create a factory from explicit connect options, for callers that need
   /// pragmas or flags beyond the defaults.
   pub fn from_options(options: SqliteConnectOptions) -> Self {
      Self { options }
   }
}

#[async_trait]
impl ConnectionFactory for SqliteConnectionFactory {
   type Connection = SqliteConnection;
   type Error = sqlx::Error;

   async fn create(&self) -> Result<SqliteConnection, sqlx::Error> {
      let conn = self.options.connect().await?;
      debug!("opened sqlite connection");
      Ok(conn)
   }

   async fn is_alive(&self, conn: &mut SqliteConnection) -> bool {
      conn.ping().await.is_ok()
   }

   async fn reset(&self, conn: &mut SqliteConnection) -> Result<(), sqlx::Error> {
      match sqlx::query("ROLLBACK").execute(&mut *conn).await {
         Ok(_) => {
            debug!("rolled back transaction left open by holder");
            Ok(())
         }
         // Nothing to roll back: the connection was already in auto-commit.
         Err(sqlx::Error::Database(e)) if e.message().contains("no transaction") => Ok(()),
         Err(e) => Err(e),
      }
   }

   async fn close(&self, conn: SqliteConnection) {
      if let Err(e) = conn.close().await {
         debug!(error = %e, "error while closing sqlite connection");
      }
   }
}
