//! User management command handlers

use crate::config::Config;
use crate::db::Store;
use crate::domain::UserRoleType;
use crate::models::user::{NewUser, User};

async fn find_user(store: &Store, email: &str) -> anyhow::Result<Option<User>> {
    let user = store.get_user_by_email(&email.trim().to_lowercase()).await?;
    if user.is_none() {
        println!("No user with email {email}.");
    }
    Ok(user)
}

pub async fn cmd_user_create(
    config: &Config,
    email: &str,
    firstname: &str,
    lastname: &str,
    password: &str,
    roles: Vec<UserRoleType>,
) -> anyhow::Result<()> {
    let state = crate::state::SharedState::new(config.clone()).await?;

    let created = state
        .identity_service
        .register(NewUser {
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            roles,
        })
        .await?;

    let roles: Vec<String> = created.roles.iter().map(ToString::to_string).collect();
    println!(
        "✓ Created user {} (ID: {}) with roles: {}",
        created.user.email,
        created.user.id,
        roles.join(", ")
    );

    Ok(())
}

pub async fn cmd_user_list(config: &Config) -> anyhow::Result<()> {
    let store = Store::from_config(&config.database).await?;
    let users = store.list_users().await?;

    if users.is_empty() {
        println!("No users.");
        println!();
        println!("Create one with: across user create <email> --firstname .. --lastname .. --password ..");
        return Ok(());
    }

    println!("Users ({} total)", users.len());
    println!("{:-<70}", "");

    for user in users {
        let roles = store.user_roles(user.id).await?;
        let roles: Vec<String> = roles.iter().map(ToString::to_string).collect();
        let verified = if user.verified { "✓" } else { "•" };

        println!(
            "{} {} {} <{}>",
            verified, user.firstname, user.lastname, user.email
        );
        println!("  ID: {} | Roles: {}", user.id, roles.join(", "));
    }

    println!();
    println!("Legend: ✓ Verified | • Unverified");

    Ok(())
}

pub async fn cmd_user_grant(config: &Config, email: &str, role: UserRoleType) -> anyhow::Result<()> {
    let store = Store::from_config(&config.database).await?;
    let Some(user) = find_user(&store, email).await? else {
        return Ok(());
    };

    store.grant_role(user.id, role).await?;
    println!("✓ Granted {role} to {}", user.email);
    Ok(())
}

pub async fn cmd_user_revoke(
    config: &Config,
    email: &str,
    role: UserRoleType,
) -> anyhow::Result<()> {
    let store = Store::from_config(&config.database).await?;
    let Some(user) = find_user(&store, email).await? else {
        return Ok(());
    };

    if store.revoke_role(user.id, role).await? {
        println!("✓ Revoked {role} from {}", user.email);
    } else {
        println!("{} does not hold {role}.", user.email);
    }
    Ok(())
}

pub async fn cmd_user_token(config: &Config, email: &str) -> anyhow::Result<()> {
    let store = Store::from_config(&config.database).await?;
    let Some(user) = find_user(&store, email).await? else {
        return Ok(());
    };

    let token = store.set_api_token(user.id).await?;
    println!("API token for {}:", user.email);
    println!("{token}");
    Ok(())
}

pub async fn cmd_user_reset_token(
    config: &Config,
    email: &str,
    expires_in: Option<u64>,
) -> anyhow::Result<()> {
    let state = crate::state::SharedState::new(config.clone()).await?;
    let Some(user) = find_user(&state.store, email).await? else {
        return Ok(());
    };

    let token = state
        .identity_service
        .get_reset_password_token(user.id, expires_in)
        .await?;
    let expires_in = expires_in.unwrap_or(config.security.reset_token_expiry_seconds);

    println!("Password reset token for {} (valid {expires_in}s):", user.email);
    println!("{token}");
    Ok(())
}

pub async fn cmd_user_delete(config: &Config, email: &str) -> anyhow::Result<()> {
    let store = Store::from_config(&config.database).await?;
    let Some(user) = find_user(&store, email).await? else {
        return Ok(());
    };

    if store.delete_user(user.id).await? {
        println!("✓ Deleted {}", user.email);
    } else {
        println!("{} was already gone.", user.email);
    }
    Ok(())
}
