//! Sign-in state commands.

use anyhow::{bail, Context as _, Result};
use serde_json::json;
use shop_api::{handle_response, user_from_login, EmailCredentials, NameCredentials};
use shop_router::{Navigator, HOME_PATH, REDIRECT_PARAM};

use super::LoginArgs;
use crate::context::Context;
use crate::output::role_badge;

/// Run the login command.
pub async fn login(args: LoginArgs, ctx: &Context) -> Result<()> {
    let auth = ctx.client.auth();
    let result = match (args.name, args.email) {
        (Some(nickname), _) => {
            auth.login_by_name(&NameCredentials {
                nickname,
                password: args.password,
            })
            .await
        }
        (None, Some(email)) => {
            auth.login_by_email(&EmailCredentials {
                email,
                password: args.password,
            })
            .await
        }
        (None, None) => bail!("Pass --name or --email"),
    };

    let envelope = result.context("Login failed")?;
    handle_response(&envelope).context("Login failed")?;
    let user = user_from_login(&envelope).context("Login response carried no user")?;
    ctx.cache
        .write(Some(&user))
        .context("Failed to cache signed-in user")?;

    // Finish the trip that sent us to the login page.
    let location = ctx.navigator.location();
    let navigation = if location.is_login_page() {
        let target = location
            .query(REDIRECT_PARAM)
            .unwrap_or_else(|| HOME_PATH.to_string());
        Some(ctx.router.push(&target)?)
    } else {
        None
    };

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "user": user,
            "location": ctx.navigator.location().full_path(),
        }));
        return Ok(());
    }

    ctx.output.success(&format!(
        "Signed in as {}",
        user.nickname().unwrap_or("(unnamed)")
    ));
    ctx.output.kv("role", &role_badge(user.role()));
    if let Some(navigation) = navigation {
        ctx.output.kv("location", &navigation.target.full_path());
    }

    Ok(())
}

/// Run the logout command.
pub async fn logout(ctx: &Context) -> Result<()> {
    if let Err(rejection) = ctx.client.auth().logout().await {
        ctx.output
            .warn(&format!("Backend logout failed: {}", rejection.message));
    }

    ctx.cache.clear().context("Failed to clear cached user")?;
    ctx.cookies.clear();

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "signedIn": false }));
    } else {
        ctx.output.success("Signed out");
    }
    Ok(())
}

/// Run the whoami command.
pub async fn whoami(ctx: &Context) -> Result<()> {
    let Some(user) = ctx.cache.signed_in_user() else {
        if ctx.output.is_json() {
            ctx.output.json(&json!({ "user": null, "session": false }));
        } else {
            ctx.output.info("Not signed in");
        }
        return Ok(());
    };

    let session = ctx.client.check_login_status().await;

    if ctx.output.is_json() {
        ctx.output.json(&json!({ "user": user, "session": session }));
        return Ok(());
    }

    ctx.output.header("Current user");
    if let Some(uid) = user.uid {
        ctx.output.kv("uid", &uid.to_string());
    }
    ctx.output
        .kv("nickname", user.nickname().unwrap_or("(unnamed)"));
    ctx.output.kv("role", &role_badge(user.role()));
    ctx.output.kv("location", &ctx.navigator.location().full_path());

    if session {
        ctx.output.success("Backend session is active");
    } else {
        ctx.output.warn("Backend session has ended; run `shop login`");
    }
    Ok(())
}
