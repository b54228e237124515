//! Raw API calls.

use anyhow::{anyhow, bail, Context as _, Result};
use serde_json::Value;
use shop_api::{ApiRequest, Method};

use super::CallArgs;
use crate::context::Context;

/// Run the call command.
pub async fn run(args: CallArgs, ctx: &Context) -> Result<()> {
    let request = build_request(&args)?;

    match ctx.client.execute(request).await {
        Ok(envelope) => {
            ctx.output.json(&envelope);
            Ok(())
        }
        Err(rejection) => {
            if !ctx.output.is_json() && rejection.is_auth_failure() {
                ctx.output.warn("Session ended; sign in again with `shop login`");
            }
            ctx.output.json(&rejection);
            Err(anyhow!(rejection))
        }
    }
}

fn build_request(args: &CallArgs) -> Result<ApiRequest> {
    let method: Method = args.method.parse()?;
    let mut request = ApiRequest::new(method, args.path.clone());

    for pair in &args.query {
        let (key, value) = parse_pair(pair)?;
        request = request.query(key, value);
    }

    if let Some(data) = &args.data {
        let body: Value =
            serde_json::from_str(data).context("Request body is not valid JSON")?;
        request = request.json(&body)?;
    }

    Ok(request)
}

fn parse_pair(pair: &str) -> Result<(&str, &str)> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key, value)),
        _ => bail!("Query parameter must be KEY=VALUE: {}", pair),
    }
}
