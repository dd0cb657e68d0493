//! # sqlx-sqlite-conn-pool
//!
//! A bounded async connection pool for desktop applications that work
//! against a single embedded SQLite database file.
//!
//! ## Core Types
//!
//! - **[`ConnectionPool`]**: Capacity-bounded pool serving acquire/release
//! - **[`PooledConnection`]**: RAII guard giving exclusive ownership of a
//!   checked-out connection
//! - **[`ConnectionFactory`]**: Trait for opening, probing, resetting, and
//!   closing physical connections
//! - **[`SqliteConnectionFactory`]**: Production factory over sqlx
//! - **[`PoolConfig`]**: Capacity, eager size, and acquire deadline
//! - **[`Error`]**: Error type for pool operations
//!
//! ## Architecture
//!
//! - **Bounded capacity**: A semaphore permit per slot keeps
//!   `idle + outstanding` within capacity; acquirers suspend once it is
//!   reached, never silently exceeding it
//! - **Validated handout**: Idle connections are probed before checkout and
//!   dead ones replaced through the factory
//! - **Exclusive ownership**: A connection belongs to exactly one holder
//!   between acquire and release
//! - **Clean shutdown**: Close wakes suspended acquirers with
//!   [`Error::PoolClosed`], closes idle connections immediately and
//!   outstanding ones as they return

mod config;
mod error;
mod factory;
mod pool;
mod pooled;
mod sqlite;
mod stats;

// Re-export public types
pub use config::PoolConfig;
pub use error::{Error, FactoryError, Result};
pub use factory::ConnectionFactory;
pub use pool::ConnectionPool;
pub use pooled::PooledConnection;
pub use sqlite::SqliteConnectionFactory;
pub use stats::PoolStats;
