use crate::entities::{prelude::Users, users};
use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tracing::info;
use uuid::Uuid;

/// Create the demo accounts on first boot so a fresh install can be
/// logged into immediately.
pub async fn seed_demo_users(db: &DatabaseConnection) -> anyhow::Result<()> {
    seed_user(db, "Demo User", "demo@septalyze.com", "password123").await?;
    seed_user(db, "Admin", "admin@septalyze.com", "admin123").await?;
    Ok(())
}

async fn seed_user(
    db: &DatabaseConnection,
    name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let existing = Users::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?;
    if existing.is_some() {
        return Ok(());
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();

    let user = users::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        password_hash: Set(password_hash),
        created_at: Set(Utc::now()),
    };
    user.insert(db).await?;

    info!("🌱 Seeded account {email}");
    Ok(())
}
