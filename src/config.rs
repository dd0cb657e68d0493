//! Configuration for the connection pool

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for [`ConnectionPool`](crate::ConnectionPool)
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use sqlx_sqlite_conn_pool::PoolConfig;
///
/// // Use defaults (capacity 10, min_idle 5, no acquire timeout)
/// let config = PoolConfig::default();
///
/// // Customize
/// let config = PoolConfig::new(4, 1)
///     .with_acquire_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
   /// Maximum number of simultaneously live connections (idle + checked out)
   ///
   /// Once this many connections exist, further acquires suspend until a
   /// connection is returned.
   capacity: usize,

   /// Number of connections opened eagerly when the pool is constructed
   ///
   /// Must not exceed `capacity`. The pool grows lazily from `min_idle` up
   /// to `capacity` under load.
   min_idle: usize,

   /// Default deadline applied to [`acquire`](crate::ConnectionPool::acquire)
   ///
   /// `None` means acquire waits indefinitely for a free connection.
   /// [`acquire_timeout`](crate::ConnectionPool::acquire_timeout) overrides
   /// this per call.
   acquire_timeout: Option<Duration>,
}

impl PoolConfig {
   /// Create a new pool configuration with the given capacity and eager size
   ///
   /// # Panics
   ///
   /// Panics if `capacity` is 0 or if `min_idle > capacity`.
   pub fn new(capacity: usize, min_idle: usize) -> Self {
      assert!(capacity > 0, "capacity must be greater than 0");
      assert!(
         min_idle <= capacity,
         "min_idle ({min_idle}) cannot exceed capacity ({capacity})"
      );

      Self {
         capacity,
         min_idle,
         acquire_timeout: None,
      }
   }

   /// Set the default acquire deadline
   pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
      self.acquire_timeout = Some(timeout);
      self
   }

   /// Get the maximum number of simultaneously live connections
   pub fn capacity(&self) -> usize {
      self.capacity
   }

   /// Get the number of eagerly created startup connections
   pub fn min_idle(&self) -> usize {
      self.min_idle
   }

   /// Get the default acquire deadline, if one is configured
   pub fn acquire_timeout(&self) -> Option<Duration> {
      self.acquire_timeout
   }
}

impl Default for PoolConfig {
   /// Default configuration: capacity 10, min_idle 5, no acquire deadline
   fn default() -> Self {
      Self::new(10, 5)
   }
}

#[cfg(test)]
mod tests {
   use super::*;

   #[test]
   fn defaults() {
      let config = PoolConfig::default();
      assert_eq!(config.capacity(), 10);
      assert_eq!(config.min_idle(), 5);
      assert!(config.acquire_timeout().is_none());
   }

   #[test]
   #[should_panic(expected = "cannot exceed capacity")]
   fn min_idle_above_capacity_panics() {
      let _ = PoolConfig::new(2, 3);
   }

   #[test]
   #[should_panic(expected = "greater than 0")]
   fn zero_capacity_panics() {
      let _ = PoolConfig::new(0, 0);
   }
}
