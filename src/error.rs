//! Error types for sqlx-sqlite-conn-pool

use std::time::Duration;

use thiserror::Error;

/// Boxed source error produced by a [`ConnectionFactory`](crate::ConnectionFactory).
pub type FactoryError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that may occur when working with the connection pool
#[derive(Error, Debug)]
pub enum Error {
   /// One of the eagerly created startup connections could not be opened.
   /// Construction is all-or-nothing; connections opened before the failure
   /// are closed again.
   #[error("failed to initialize connection pool: {0}")]
   PoolInit(#[source] FactoryError),

   /// A dead connection was discarded during acquire and the factory could
   /// not produce a replacement. Recoverable; callers may retry after a
   /// backoff.
   #[error("no connection available: {0}")]
   ConnectionUnavailable(#[source] FactoryError),

   /// The acquire deadline elapsed before a connection became available.
   /// No capacity reservation is left behind.
   #[error("timed out after {timeout:?} waiting for a connection")]
   AcquireTimeout {
      /// The deadline that elapsed
      timeout: Duration,
   },

   /// The pool has been closed and cannot hand out connections
   #[error("connection pool has been closed")]
   PoolClosed,
}

/// A type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
