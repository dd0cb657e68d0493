//! RAII guard for a checked-out connection

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tokio::sync::OwnedSemaphorePermit;
use tracing::warn;

use crate::factory::ConnectionFactory;
use crate::pool::PoolInner;

/// A connection checked out from a [`ConnectionPool`](crate::ConnectionPool).
///
/// The holder has exclusive ownership of the underlying connection until it
/// is returned. Call [`release`](Self::release) to return it explicitly;
/// dropping the guard returns it too, by spawning the return path onto the
/// current tokio runtime. Either way the connection's session state is reset
/// before it is pooled again, and a suspended acquirer is woken once the
/// connection is available.
#[must_use = "if unused, the connection is immediately returned to the pool"]
pub struct PooledConnection<F: ConnectionFactory> {
   conn: Option<F::Connection>,
   pool: Arc<PoolInner<F>>,
   permit: Option<OwnedSemaphorePermit>,
}

impl<F: ConnectionFactory> PooledConnection<F> {
   pub(crate) fn new(
      conn: F::Connection,
      pool: Arc<PoolInner<F>>,
      permit: OwnedSemaphorePermit,
   ) -> Self {
      Self {
         conn: Some(conn),
         pool,
         permit: Some(permit),
      }
   }

   /// Return the connection to the pool.
   ///
   /// Safe to call after the pool has been closed: the connection is simply
   /// closed instead of pooled. Never fails the caller — reset problems are
   /// recovered inside the pool and only logged.
   pub async fn release(mut self) {
      if let Some(conn) = self.conn.take() {
         let permit = self.permit.take();
         self.pool.give_back(conn).await;
         // Waking a waiter only after give_back keeps the handoff atomic:
         // the permit becomes free once the connection is idle again.
         drop(permit);
      }
   }
}

impl<F: ConnectionFactory> fmt::Debug for PooledConnection<F> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("PooledConnection")
         .field("released", &self.conn.is_none())
         .finish_non_exhaustive()
   }
}

impl<F: ConnectionFactory> Deref for PooledConnection<F> {
   type Target = F::Connection;

   fn deref(&self) -> &Self::Target {
      self.conn.as_ref().expect("connection already released")
   }
}

impl<F: ConnectionFactory> DerefMut for PooledConnection<F> {
   fn deref_mut(&mut self) -> &mut Self::Target {
      self.conn.as_mut().expect("connection already released")
   }
}

impl<F: ConnectionFactory> Drop for PooledConnection<F> {
   fn drop(&mut self) {
      let (Some(conn), Some(permit)) = (self.conn.take(), self.permit.take()) else {
         return;
      };

      let pool = Arc::clone(&self.pool);
      match tokio::runtime::Handle::try_current() {
         // Same return path as release(), floated onto the runtime the way
         // sqlx returns its own pool connections on drop.
         Ok(handle) => {
            handle.spawn(async move {
               pool.give_back(conn).await;
               drop(permit);
            });
         }
         Err(_) => {
            warn!("pooled connection dropped outside a runtime, returned without reset");
            pool.give_back_sync(conn);
            drop(permit);
         }
      }
   }
}
