//! Factory trait for opening and maintaining physical connections

use async_trait::async_trait;

/// Knows how to open, probe, reset, and close physical connections.
///
/// The pool is generic over this trait; it never touches the wire itself.
/// [`SqliteConnectionFactory`](crate::SqliteConnectionFactory) is the
/// production implementation for SQLite over sqlx.
#[async_trait]
pub trait ConnectionFactory: Send + Sync + 'static {
   /// The opaque connection handle managed by the pool
   type Connection: Send + 'static;

   /// Error produced when opening or resetting a connection fails
   type Error: std::error::Error + Send + Sync + 'static;

   /// Open a fresh physical connection
   async fn create(&self) -> Result<Self::Connection, Self::Error>;

   /// Cheap liveness probe run before a pooled connection is handed out.
   ///
   /// Must report `false` for a dead connection rather than fail.
   /// Default implementation considers every connection alive.
   async fn is_alive(&self, _conn: &mut Self::Connection) -> bool {
      true
   }

   /// Restore session-level state a holder may have changed (for example a
   /// transaction left open) before the connection is pooled again.
   ///
   /// A failure causes the pool to discard the connection and open a
   /// replacement; it is never surfaced to the releasing caller.
   async fn reset(&self, _conn: &mut Self::Connection) -> Result<(), Self::Error> {
      Ok(())
   }

   /// Close a connection. Default implementation just drops it.
   async fn close(&self, conn: Self::Connection) {
      drop(conn);
   }
}
