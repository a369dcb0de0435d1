//! Grants a role to a registered user.
//!
//! Registration only hands out `viewer`; editors are provisioned here.
//! Reads the same configuration as the server. Usage:
//!   grant-role <email> <editor|viewer>

use std::sync::Arc;

use anyhow::{Context, bail};
use fxcalc_core::auth::{AuthService, Role};
use fxcalc_core::token::{TokenPolicy, TokenService};
use fxcalc_db::{RefreshTokenRepository, UserRepository};
use fxcalc_shared::{AppConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (Some(email), Some(tag), None) = (args.next(), args.next(), args.next()) else {
        bail!("usage: grant-role <email> <editor|viewer>");
    };
    let role = Role::from_tag(&tag).with_context(|| format!("unknown role '{tag}'"))?;

    let config = AppConfig::load()?;
    if config.database.is_memory() {
        bail!("database.url is 'memory'; roles can only be granted in a persistent store");
    }

    let db = fxcalc_db::connect(&config.database).await?;
    let jwt = Arc::new(JwtService::new(config.jwt_config()?));
    let tokens = Arc::new(TokenService::new(
        Arc::new(RefreshTokenRepository::new(db.clone())),
        jwt,
        TokenPolicy::try_from(&config.tokens)?,
    ));
    let auth = AuthService::new(Arc::new(UserRepository::new(db)), tokens);

    let user = auth.grant_role(&email, role).await?;
    println!("{} now holds: {}", user.email, user.roles.join(", "));
    Ok(())
}
