use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, SaltString},
    Argon2, PasswordHasher, PasswordVerifier,
};
use rusqlite::{params, OptionalExtension, Row};

use crate::{ctx::BaseParams, identity::normalize_email, Error, Result};

use super::{LoginResponse, LoginUser, RegisterUser, UserResponse};

impl<'a> TryFrom<&Row<'a>> for UserResponse {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'a>) -> std::result::Result<Self, Self::Error> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            email: row.get(2)?,
        })
    }
}

pub async fn register(args: RegisterUser, BaseParams { db, .. }: BaseParams) -> Result<UserResponse> {
    let email = normalize_email(&args.email);
    let password_hash = hash_password(&args.password)?;
    let name = args.name;

    db.call(move |conn| {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM users WHERE email = ?)",
            params![email],
            |row| row.get(0),
        )?;

        if exists {
            return Err(Error::BadRequest("Email is already registered".into()).into());
        }

        conn.query_row(
            "INSERT INTO users (name, email, password_hash) VALUES (?, ?, ?) RETURNING id, name, email",
            params![name, email, password_hash],
            |row| UserResponse::try_from(row),
        )
        .map_err(|e| e.into())
    })
    .await
    .map_err(Error::from)
}

/// Always responds 200; a wrong email and a wrong password are
/// indistinguishable to the caller. No session or token is issued, and
/// note ownership never consults this table.
pub async fn login(args: LoginUser, BaseParams { db, .. }: BaseParams) -> Result<LoginResponse> {
    let email = normalize_email(&args.email);

    let row = db
        .call(move |conn| {
            let row = conn
                .query_row(
                    "SELECT id, name, email, password_hash FROM users WHERE email = ?",
                    params![email],
                    |row| Ok((UserResponse::try_from(row)?, row.get::<_, String>(3)?)),
                )
                .optional()?;
            Ok(row)
        })
        .await
        .map_err(Error::from)?;

    let response = match row {
        Some((user, hash)) if verify_password(&args.password, &hash) => LoginResponse {
            success: true,
            message: "Login successful".into(),
            user: Some(user),
        },
        _ => LoginResponse {
            success: false,
            message: "Invalid credentials".into(),
            user: None,
        },
    };

    Ok(response)
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Unexpected(e.to_string()))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_roundtrip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("hunter2", "not-a-phc-string"));
    }
}
