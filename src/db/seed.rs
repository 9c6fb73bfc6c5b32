//! Fixture data for the `db-seed` admin command.

use crate::db::models::{NewPlanet, NewUser};
use crate::db::sqlite::Storage;
use crate::error::OrreryError;
use crate::service::password;

pub const SEED_USER_EMAIL: &str = "aarav@yopmail.com";
pub const SEED_USER_PASSWORD: &str = "password";

pub fn seed_planets() -> Vec<NewPlanet> {
    vec![
        NewPlanet {
            planet_name: "Mercury".to_string(),
            planet_type: "Class D".to_string(),
            home_star: "Sol".to_string(),
            mass: 3.258e23,
            radius: 1516.0,
            distance: 35.98e6,
        },
        NewPlanet {
            planet_name: "Venus".to_string(),
            planet_type: "Class E".to_string(),
            home_star: "Sol".to_string(),
            mass: 3.258e23,
            radius: 2516.0,
            distance: 35.98e6,
        },
        NewPlanet {
            planet_name: "Earth".to_string(),
            planet_type: "Class A".to_string(),
            home_star: "Sol".to_string(),
            mass: 4.258e23,
            radius: 3516.0,
            distance: 45.98e6,
        },
    ]
}

/// Seed the three fixture planets and the fixture user. The user's password
/// is stored argon2-hashed like any registered account.
pub async fn run(storage: &Storage) -> Result<(), OrreryError> {
    let user = NewUser {
        first_name: "Aarav".to_string(),
        last_name: "K".to_string(),
        email: SEED_USER_EMAIL.to_string(),
        password_hash: password::hash_password(SEED_USER_PASSWORD)?,
    };
    storage.seed_fixtures(&seed_planets(), &user).await
}
