//! SQL DDL for the catalog storage.
//! SQLite-first design; can be adapted for other RDBMS.

/// SQLite schema with:
/// - `users.email` UNIQUE so duplicate registration is rejected by the
///   storage layer, not only by the handler's pre-check
/// - `planets.planet_name` UNIQUE for the same reason
/// - `password_resets.token_hash` holding a SHA-256 digest; the raw reset
///   token never touches the database
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS planets (
    planet_id INTEGER PRIMARY KEY AUTOINCREMENT,
    planet_name TEXT NOT NULL UNIQUE,
    planet_type TEXT NOT NULL,
    home_star TEXT NOT NULL,
    mass REAL NOT NULL,
    radius REAL NOT NULL,
    distance REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS password_resets (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    token_hash TEXT NOT NULL UNIQUE,
    expires_at INTEGER NOT NULL,
    used INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_password_resets_user_id ON password_resets(user_id);
"#;

/// Teardown DDL for the `db-drop` admin command.
pub const SQLITE_DROP: &str = r#"
DROP TABLE IF EXISTS password_resets;
DROP TABLE IF EXISTS planets;
DROP TABLE IF EXISTS users;
"#;
