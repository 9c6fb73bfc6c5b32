use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::db::models::{NewPlanet, NewUser, Planet, PlanetPatch, User};
use crate::db::schema::{SQLITE_DROP, SQLITE_INIT};
use crate::error::OrreryError;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, OrreryError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), OrreryError> {
        self.run_ddl(SQLITE_INIT).await
    }

    /// Drop all tables; used by the `db-drop` admin command.
    pub async fn drop_schema(&self) -> Result<(), OrreryError> {
        self.run_ddl(SQLITE_DROP).await
    }

    async fn run_ddl(&self, ddl: &str) -> Result<(), OrreryError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in ddl.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    // planets

    pub async fn planet_by_id(&self, planet_id: i64) -> Result<Option<Planet>, OrreryError> {
        let planet = sqlx::query_as::<_, Planet>(
            r#"SELECT planet_id, planet_name, planet_type, home_star, mass, radius, distance
               FROM planets WHERE planet_id = ?"#,
        )
        .bind(planet_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(planet)
    }

    pub async fn planet_by_name(&self, planet_name: &str) -> Result<Option<Planet>, OrreryError> {
        let planet = sqlx::query_as::<_, Planet>(
            r#"SELECT planet_id, planet_name, planet_type, home_star, mass, radius, distance
               FROM planets WHERE planet_name = ?"#,
        )
        .bind(planet_name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(planet)
    }

    /// All planets in stable `planet_id` order.
    pub async fn list_planets(&self) -> Result<Vec<Planet>, OrreryError> {
        let planets = sqlx::query_as::<_, Planet>(
            r#"SELECT planet_id, planet_name, planet_type, home_star, mass, radius, distance
               FROM planets ORDER BY planet_id"#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(planets)
    }

    /// Insert a planet and return its generated id. A `planet_name` clash
    /// that slips past the handler's pre-check is caught here by the UNIQUE
    /// constraint and reported as a conflict.
    pub async fn insert_planet(&self, planet: &NewPlanet) -> Result<i64, OrreryError> {
        let result = sqlx::query(
            r#"INSERT INTO planets (planet_name, planet_type, home_star, mass, radius, distance)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&planet.planet_name)
        .bind(&planet.planet_type)
        .bind(&planet.home_star)
        .bind(planet.mass)
        .bind(planet.radius)
        .bind(planet.distance)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                format!("planet '{}' already exists", planet.planet_name)
            })
        })?;
        Ok(result.last_insert_rowid())
    }

    /// Patch a planet in place. `COALESCE` keeps every column whose patch
    /// field is `None` untouched.
    pub async fn update_planet(
        &self,
        planet_id: i64,
        patch: &PlanetPatch,
    ) -> Result<(), OrreryError> {
        sqlx::query(
            r#"UPDATE planets SET
                planet_name = COALESCE(?, planet_name),
                planet_type = COALESCE(?, planet_type),
                home_star = COALESCE(?, home_star),
                mass = COALESCE(?, mass),
                radius = COALESCE(?, radius),
                distance = COALESCE(?, distance)
              WHERE planet_id = ?"#,
        )
        .bind(&patch.planet_name)
        .bind(&patch.planet_type)
        .bind(&patch.home_star)
        .bind(patch.mass)
        .bind(patch.radius)
        .bind(patch.distance)
        .bind(planet_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(e, || {
                format!(
                    "planet '{}' already exists",
                    patch.planet_name.as_deref().unwrap_or_default()
                )
            })
        })?;
        Ok(())
    }

    // users

    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>, OrreryError> {
        let user = sqlx::query_as::<_, User>(
            r#"SELECT id, first_name, last_name, email, password_hash
               FROM users WHERE email = ?"#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn insert_user(&self, user: &NewUser) -> Result<i64, OrreryError> {
        let result = sqlx::query(
            r#"INSERT INTO users (first_name, last_name, email, password_hash)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || format!("email '{}' already registered", user.email)))?;
        Ok(result.last_insert_rowid())
    }

    pub async fn count_users(&self) -> Result<i64, OrreryError> {
        let rec: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(rec.0)
    }

    pub async fn update_user_password(
        &self,
        user_id: i64,
        password_hash: &str,
    ) -> Result<(), OrreryError> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // password resets

    pub async fn create_password_reset(
        &self,
        user_id: i64,
        token_hash: &str,
        expires_at: i64,
    ) -> Result<(), OrreryError> {
        sqlx::query(
            r#"INSERT INTO password_resets (user_id, token_hash, expires_at)
               VALUES (?, ?, ?)"#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(expires_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Consume a reset token: marks the row used and returns its `user_id`,
    /// or `None` when no live row matches. Single UPDATE, so two concurrent
    /// confirmations cannot both succeed.
    pub async fn take_password_reset(
        &self,
        token_hash: &str,
        now: i64,
    ) -> Result<Option<i64>, OrreryError> {
        let rec: Option<(i64,)> = sqlx::query_as(
            r#"UPDATE password_resets SET used = 1
               WHERE token_hash = ? AND used = 0 AND expires_at > ?
               RETURNING user_id"#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec.map(|(user_id,)| user_id))
    }

    /// Insert the fixture set inside a single transaction, so a half-seeded
    /// catalog cannot be left behind.
    pub async fn seed_fixtures(
        &self,
        planets: &[NewPlanet],
        user: &NewUser,
    ) -> Result<(), OrreryError> {
        let mut tx = self.pool.begin().await?;

        for planet in planets {
            sqlx::query(
                r#"INSERT INTO planets (planet_name, planet_type, home_star, mass, radius, distance)
                   VALUES (?, ?, ?, ?, ?, ?)"#,
            )
            .bind(&planet.planet_name)
            .bind(&planet.planet_type)
            .bind(&planet.home_star)
            .bind(planet.mass)
            .bind(planet.radius)
            .bind(planet.distance)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                map_unique_violation(e, || {
                    format!("planet '{}' already seeded", planet.planet_name)
                })
            })?;
        }

        sqlx::query(
            r#"INSERT INTO users (first_name, last_name, email, password_hash)
               VALUES (?, ?, ?, ?)"#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_unique_violation(e, || format!("user '{}' already seeded", user.email)))?;

        tx.commit().await?;
        Ok(())
    }
}

/// SQLite signals UNIQUE violations with extended result codes 2067
/// (unique index) and 1555 (primary key).
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db)
            if matches!(db.code().as_deref(), Some("2067") | Some("1555"))
    )
}

fn map_unique_violation(err: sqlx::Error, message: impl FnOnce() -> String) -> OrreryError {
    if is_unique_violation(&err) {
        OrreryError::Conflict(message())
    } else {
        err.into()
    }
}
