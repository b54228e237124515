//! Route table listing.

use anyhow::Result;

use crate::context::Context;
use crate::output::access_badge;

/// Run the routes command.
pub fn run(ctx: &Context) -> Result<()> {
    let entries = ctx.router.registry().entries();

    if ctx.output.is_json() {
        ctx.output.json(&entries);
        return Ok(());
    }

    ctx.output.header("Storefront routes");
    ctx.output
        .table_row(&["PATH", "NAME", "COMPONENT", "ACCESS"], &[24, 18, 22, 8]);
    for entry in entries {
        let badge = access_badge(entry.meta);
        ctx.output.table_row(
            &[entry.path, entry.name.as_str(), entry.component, badge.as_str()],
            &[24, 18, 22, 8],
        );
    }

    Ok(())
}
