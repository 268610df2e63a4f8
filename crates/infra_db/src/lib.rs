//! Infrastructure Database Layer
//!
//! This crate provides PostgreSQL persistence for the expense tracker using
//! SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern:
//!
//! - **Repositories** own the SQL and map rows to plain row structs
//! - **Adapters** implement the domain port traits on top of the repositories,
//!   translating rows into domain records and database errors into port
//!   outcomes
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig};
//! use infra_db::adapters::PostgresExpenseGroupAdapter;
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/expenses")).await?;
//! run_migrations(&pool).await?;
//! let adapter = PostgresExpenseGroupAdapter::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;
pub mod adapters;

pub use pool::{DatabasePool, create_pool, run_migrations, DatabaseConfig};
pub use error::DatabaseError;
