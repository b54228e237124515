//! Guarded navigation.

use anyhow::{Context as _, Result};

use super::NavigateArgs;
use crate::context::Context;
use crate::output::access_badge;

/// Run the navigate command.
pub fn run(args: NavigateArgs, ctx: &Context) -> Result<()> {
    let navigation = ctx
        .router
        .push(&args.path)
        .with_context(|| format!("Failed to navigate to {}", args.path))?;

    if ctx.output.is_json() {
        ctx.output.json(&navigation);
        return Ok(());
    }

    for href in &navigation.redirects {
        ctx.output.warn(&format!("Redirected to {}", href));
    }

    let target = &navigation.target;
    ctx.output.success(&format!("Now at {}", target.full_path()));
    match target.route {
        Some(route) => {
            ctx.output.kv("route", route.name.as_str());
            ctx.output.kv("component", route.component);
            ctx.output.kv("access", &access_badge(route.meta));
        }
        None => ctx.output.kv("route", "(none)"),
    }
    for (key, value) in &target.params {
        ctx.output.kv(key, value);
    }

    Ok(())
}
