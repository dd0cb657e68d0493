//! Bounded connection pool with validation and clean shutdown

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::PoolConfig;
use crate::error::{Error, Result};
use crate::factory::ConnectionFactory;
use crate::pooled::PooledConnection;
use crate::stats::PoolStats;

/// A capacity-bounded pool of reusable connections.
///
/// The pool opens `min_idle` connections eagerly, grows lazily up to
/// `capacity` under load, and suspends acquirers once capacity is reached.
/// Idle connections are probed for liveness before they are handed out and
/// replaced when dead. Cloning the pool is cheap; all clones share state.
///
/// ## Lifecycle
///
/// ```text
/// 1. ConnectionPool::new  — eager startup connections, all-or-nothing
/// 2. acquire / release    — exclusive checkout via PooledConnection guards
/// 3. close                — idempotent; wakes blocked acquirers, closes
///                           idle now and outstanding as they return
/// ```
pub struct ConnectionPool<F: ConnectionFactory> {
   inner: Arc<PoolInner<F>>,
}

pub(crate) struct PoolInner<F: ConnectionFactory> {
   config: PoolConfig,
   factory: F,

   /// Connections available for checkout, oldest return served first
   idle: Mutex<VecDeque<F::Connection>>,

   /// One permit per capacity slot; holding a permit is the reservation
   /// that keeps `idle + outstanding` within capacity
   semaphore: Arc<Semaphore>,

   /// Connections currently checked out
   outstanding: AtomicUsize,

   /// Acquire calls currently suspended
   waiting: AtomicUsize,

   /// Set once by `close`; no transition back
   closed: AtomicBool,
}

impl<F: ConnectionFactory> ConnectionPool<F> {
   /// Create a pool and eagerly open `min_idle` connections.
   ///
   /// Construction is all-or-nothing: if any startup connection fails,
   /// the ones already opened are closed and [`Error::PoolInit`] is
   /// returned.
   pub async fn new(config: PoolConfig, factory: F) -> Result<Self> {
      let mut initial = Vec::with_capacity(config.min_idle());
      for _ in 0..config.min_idle() {
         match factory.create().await {
            Ok(conn) => initial.push(conn),
            Err(e) => {
               for conn in initial {
                  factory.close(conn).await;
               }
               return Err(Error::PoolInit(Box::new(e)));
            }
         }
      }

      info!(
         min_idle = config.min_idle(),
         capacity = config.capacity(),
         "connection pool initialized"
      );

      let semaphore = Arc::new(Semaphore::new(config.capacity()));
      Ok(Self {
         inner: Arc::new(PoolInner {
            config,
            factory,
            idle: Mutex::new(VecDeque::from(initial)),
            semaphore,
            outstanding: AtomicUsize::new(0),
            waiting: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
         }),
      })
   }

   /// Acquire a live connection, suspending if the pool is at capacity.
   ///
   /// Applies the configured default deadline, if any. Returns
   /// [`Error::PoolClosed`] once [`close`](Self::close) has been called,
   /// including for acquirers already suspended when close begins.
   pub async fn acquire(&self) -> Result<PooledConnection<F>> {
      self.acquire_inner(self.inner.config.acquire_timeout()).await
   }

   /// Acquire with an explicit deadline, overriding the configured default.
   ///
   /// On expiry returns [`Error::AcquireTimeout`] without holding on to any
   /// capacity reservation.
   pub async fn acquire_timeout(&self, timeout: Duration) -> Result<PooledConnection<F>> {
      self.acquire_inner(Some(timeout)).await
   }

   async fn acquire_inner(&self, deadline: Option<Duration>) -> Result<PooledConnection<F>> {
      if self.inner.closed.load(Ordering::SeqCst) {
         warn!("acquire called on a closed connection pool");
         return Err(Error::PoolClosed);
      }

      let _waiting = WaitingGuard::enter(&self.inner.waiting);
      match deadline {
         Some(timeout) => tokio::time::timeout(timeout, self.checkout())
            .await
            .map_err(|_| Error::AcquireTimeout { timeout })?,
         None => self.checkout().await,
      }
   }

   async fn checkout(&self) -> Result<PooledConnection<F>> {
      // The permit is the capacity reservation. The semaphore is closed on
      // shutdown, which both fails this acquire and wakes suspended ones.
      let permit = Arc::clone(&self.inner.semaphore)
         .acquire_owned()
         .await
         .map_err(|_| Error::PoolClosed)?;

      if self.inner.closed.load(Ordering::SeqCst) {
         return Err(Error::PoolClosed);
      }

      // Reuse the first idle connection that passes its liveness probe.
      // Dead ones are discarded; the permit keeps the slot reserved while
      // a replacement is opened, so capacity bookkeeping stays consistent.
      let reused = loop {
         let candidate = self.inner.idle.lock().pop_front();
         match candidate {
            Some(mut conn) => {
               if self.inner.factory.is_alive(&mut conn).await {
                  break Some(conn);
               }
               debug!("idle connection failed its liveness probe, discarding");
               self.inner.factory.close(conn).await;
            }
            None => break None,
         }
      };

      let conn = match reused {
         Some(conn) => conn,
         // Lazy growth, or replacement for a discarded dead connection.
         // The factory call runs outside the idle lock so a slow open
         // cannot stall unrelated acquire/release traffic.
         None => self
            .inner
            .factory
            .create()
            .await
            .map_err(|e| Error::ConnectionUnavailable(Box::new(e)))?,
      };

      self.inner.outstanding.fetch_add(1, Ordering::SeqCst);
      Ok(PooledConnection::new(conn, Arc::clone(&self.inner), permit))
   }

   /// Shut the pool down.
   ///
   /// Subsequent acquires fail fast with [`Error::PoolClosed`] and already
   /// suspended acquirers are woken with the same error. Idle connections
   /// are closed immediately; outstanding connections are closed as their
   /// guards return. Holders must not use a connection once close begins.
   ///
   /// Idempotent: further calls have no effect.
   pub async fn close(&self) {
      if self.inner.closed.swap(true, Ordering::SeqCst) {
         return;
      }

      self.inner.semaphore.close();

      let drained: Vec<F::Connection> = {
         let mut idle = self.inner.idle.lock();
         idle.drain(..).collect()
      };

      let closed = drained.len();
      for conn in drained {
         self.inner.factory.close(conn).await;
      }

      info!(
         closed,
         outstanding = self.inner.outstanding.load(Ordering::SeqCst),
         "connection pool shut down"
      );
   }

   /// Whether [`close`](Self::close) has been called
   pub fn is_closed(&self) -> bool {
      self.inner.closed.load(Ordering::SeqCst)
   }

   /// Get the pool configuration
   pub fn config(&self) -> &PoolConfig {
      &self.inner.config
   }

   /// Take a point-in-time occupancy snapshot
   pub fn stats(&self) -> PoolStats {
      let idle = self.inner.idle.lock().len();
      PoolStats::new(
         idle,
         self.inner.outstanding.load(Ordering::SeqCst),
         self.inner.waiting.load(Ordering::SeqCst),
      )
   }
}

impl<F: ConnectionFactory> Clone for ConnectionPool<F> {
   fn clone(&self) -> Self {
      Self {
         inner: Arc::clone(&self.inner),
      }
   }
}

impl<F: ConnectionFactory> PoolInner<F> {
   /// Return a checked-out connection, resetting its session state first.
   ///
   /// Reset failures are recovered locally: the connection is closed and a
   /// replacement opened so the pool size stays stable. Nothing here is
   /// surfaced to the releasing caller. The guard drops its permit after
   /// this completes, so a suspended acquirer is woken exactly once per
   /// return and only once the connection is actually available.
   pub(crate) async fn give_back(&self, mut conn: F::Connection) {
      self.outstanding.fetch_sub(1, Ordering::SeqCst);

      if self.closed.load(Ordering::SeqCst) {
         debug!("pool is closed, closing returned connection");
         self.factory.close(conn).await;
         return;
      }

      if let Err(e) = self.factory.reset(&mut conn).await {
         warn!(error = %e, "failed to reset returned connection, replacing it");
         self.factory.close(conn).await;
         match self.factory.create().await {
            Ok(fresh) => conn = fresh,
            Err(e) => {
               error!(error = %e, "failed to open a replacement connection");
               return;
            }
         }
      }

      // The closed check shares the idle lock with close()'s drain, so a
      // connection is either drained there or closed here, never leaked.
      let leftover = {
         let mut idle = self.idle.lock();
         if self.closed.load(Ordering::SeqCst) {
            Some(conn)
         } else {
            idle.push_back(conn);
            None
         }
      };

      if let Some(conn) = leftover {
         self.factory.close(conn).await;
      }
   }

   /// Synchronous fallback return used when a guard is dropped outside a
   /// tokio runtime. Skips reset and factory close; the connection is
   /// pooled as-is (or dropped if the pool is closed).
   pub(crate) fn give_back_sync(&self, conn: F::Connection) {
      self.outstanding.fetch_sub(1, Ordering::SeqCst);

      let mut idle = self.idle.lock();
      if !self.closed.load(Ordering::SeqCst) {
         idle.push_back(conn);
      }
   }
}

/// Tracks a suspended acquire for stats; decrements on drop so a timed-out
/// or cancelled acquire never leaves a phantom waiter behind.
struct WaitingGuard<'a> {
   counter: &'a AtomicUsize,
}

impl<'a> WaitingGuard<'a> {
   fn enter(counter: &'a AtomicUsize) -> Self {
      counter.fetch_add(1, Ordering::SeqCst);
      Self { counter }
   }
}

impl Drop for WaitingGuard<'_> {
   fn drop(&mut self) {
      self.counter.fetch_sub(1, Ordering::SeqCst);
   }
}
