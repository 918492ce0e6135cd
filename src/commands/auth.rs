use tracing::{info, warn};

use crate::db::{Collection, Database, CURRENT_USER_KEY};
use crate::error::{PosError, Result};
use crate::models::User;

/// Plaintext match against the stored users. On success the user becomes
/// the current session user.
pub fn login(db: &Database, email: &str, password: &str) -> Result<Option<User>> {
    let users: Vec<User> = db.load(Collection::Users)?;
    let email = email.trim();

    match users
        .into_iter()
        .find(|u| u.email == email && u.password == password)
    {
        Some(user) => {
            db.set_value(CURRENT_USER_KEY, &user)?;
            info!(email = %user.email, "user logged in");
            Ok(Some(user))
        }
        None => {
            warn!(email, "login failed");
            Ok(None)
        }
    }
}

pub fn logout(db: &Database) -> Result<()> {
    db.remove_value(CURRENT_USER_KEY)?;
    info!("user logged out");
    Ok(())
}

pub fn current_user(db: &Database) -> Result<Option<User>> {
    db.get_value(CURRENT_USER_KEY)
}

pub fn require_user(db: &Database) -> Result<User> {
    current_user(db)?.ok_or(PosError::NotAuthenticated)
}
