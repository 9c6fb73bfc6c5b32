//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows and their public views
//! - `schema.rs`: SQL DDL for initializing and dropping the database (SQLite-first)
//! - `sqlite.rs`: the storage handle wrapping the connection pool
//! - `seed.rs`: fixture data for the admin seed command

pub mod models;
pub mod schema;
pub mod seed;
pub mod sqlite;

pub use models::{NewPlanet, NewUser, Planet, PlanetPatch, User, UserProfile};
pub use schema::{SQLITE_DROP, SQLITE_INIT};
pub use sqlite::{SqlitePool, Storage};
