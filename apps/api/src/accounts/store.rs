use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::accounts::password::{burn_verification, hash_password, verify_password};
use crate::errors::AppError;
use crate::models::user::User;

/// Registers a new user with a freshly salted password hash.
///
/// Fails with `AlreadyExists` if the username is taken. The UNIQUE constraint
/// is the final arbiter; the pre-check only gives the common case a clean path.
pub async fn register(
    pool: &SqlitePool,
    username: &str,
    password: &str,
    role: &str,
) -> Result<User, AppError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(AppError::Validation("username cannot be empty".to_string()));
    }
    if password.is_empty() {
        return Err(AppError::Validation("password cannot be empty".to_string()));
    }

    if get_user_by_username(pool, username).await?.is_some() {
        return Err(AppError::AlreadyExists(format!(
            "Username '{username}' already exists"
        )));
    }

    let password_hash = hash_in_background(password).await?;

    let user = sqlx::query_as::<_, User>(
        "INSERT INTO users (username, password_hash, role) VALUES (?, ?, ?) RETURNING *",
    )
    .bind(username)
    .bind(&password_hash)
    .bind(role)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            AppError::AlreadyExists(format!("Username '{username}' already exists"))
        }
        other => AppError::Database(other),
    })?;

    info!("Registered user {} ({}) with role {}", user.id, user.username, user.role);
    Ok(user)
}

/// Checks a username/password pair and returns the matching user.
///
/// Unknown usernames and wrong passwords both yield `InvalidCredentials`.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, AppError> {
    let user = get_user_by_username(pool, username.trim()).await?;
    let stored_hash = user.as_ref().map(|u| u.password_hash.clone());
    let verified = verify_in_background(password, stored_hash).await?;

    let Some(user) = user.filter(|_| verified) else {
        warn!("Login failed for user: {username}");
        return Err(AppError::InvalidCredentials);
    };

    info!("Login successful for user: {username}");
    Ok(user)
}

/// Re-hashes and overwrites a user's password.
pub async fn change_password(
    pool: &SqlitePool,
    user_id: i64,
    new_password: &str,
) -> Result<(), AppError> {
    if new_password.is_empty() {
        return Err(AppError::Validation("password cannot be empty".to_string()));
    }

    let password_hash = hash_in_background(new_password).await?;

    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(&password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    info!("Password changed for user {user_id}");
    Ok(())
}

/// Argon2 is deliberately slow; it runs on the blocking pool, not an async worker.
async fn hash_in_background(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| {
            AppError::Internal(anyhow::anyhow!("spawn_blocking failed in hashing: {e}"))
        })?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verifies against `stored_hash`, or burns an equivalent verification when
/// there is no such user.
async fn verify_in_background(
    password: &str,
    stored_hash: Option<String>,
) -> Result<bool, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || match stored_hash {
        Some(hash) => verify_password(&password, &hash),
        None => {
            burn_verification(&password);
            false
        }
    })
    .await
    .map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in verification: {e}"))
    })
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, AppError> {
    Ok(
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn get_user_by_id(pool: &SqlitePool, user_id: i64) -> Result<Option<User>, AppError> {
    Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await?)
}

/// Returns the role of a user, or `None` if the user does not exist.
pub async fn get_user_role(pool: &SqlitePool, user_id: i64) -> Result<Option<String>, AppError> {
    Ok(get_user_by_id(pool, user_id).await?.map(|u| u.role))
}

/// Deletes a user. Their resumes and applications go with them.
pub async fn delete_user(pool: &SqlitePool, user_id: i64) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(user_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(format!("User {user_id} not found")));
    }

    info!("Deleted user {user_id}");
    Ok(())
}
