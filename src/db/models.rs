use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A catalog row. The `Serialize` derive is the transport whitelist: exactly
/// these seven fields, in this order, on every planet response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, FromRow)]
pub struct Planet {
    pub planet_id: i64,
    pub planet_name: String,
    pub planet_type: String,
    pub home_star: String,
    pub mass: f64,
    pub radius: f64,
    pub distance: f64,
}

/// Body of POST /planets; every field is required.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPlanet {
    pub planet_name: String,
    pub planet_type: String,
    pub home_star: String,
    pub mass: f64,
    pub radius: f64,
    pub distance: f64,
}

/// Body of PUT /planet/{planet_id}. A field is applied iff its key is
/// present, so a caller can set `mass` to exactly `0.0` or blank out
/// `home_star` by supplying the value explicitly.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlanetPatch {
    pub planet_name: Option<String>,
    pub planet_type: Option<String>,
    pub home_star: Option<String>,
    pub mass: Option<f64>,
    pub radius: Option<f64>,
    pub distance: Option<f64>,
}

/// Account row. Not `Serialize`: the argon2 hash must never reach a response
/// body, so the public view below is the only way out.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
}

/// Public view of a user account for response bodies.
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name,
            last_name: u.last_name,
            email: u.email,
        }
    }
}
