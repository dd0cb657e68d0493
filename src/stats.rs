//! Point-in-time pool occupancy snapshot

/// Snapshot of pool occupancy, taken by
/// [`ConnectionPool::stats`](crate::ConnectionPool::stats).
///
/// `idle + outstanding` never exceeds the configured capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolStats {
   /// Total live connections (idle + outstanding)
   pub total: usize,
   /// Connections sitting in the pool, available for acquisition
   pub idle: usize,
   /// Connections currently checked out by a holder
   pub outstanding: usize,
   /// Acquire calls currently suspended waiting for a connection
   pub waiting: usize,
}

impl PoolStats {
   pub(crate) fn new(idle: usize, outstanding: usize, waiting: usize) -> Self {
      Self {
         total: idle + outstanding,
         idle,
         outstanding,
         waiting,
      }
   }
}
