//! CLI command implementations.

pub mod call;
pub mod navigate;
pub mod routes;
pub mod session;

use clap::{ArgGroup, Args};

/// Arguments for the navigate command.
#[derive(Args)]
pub struct NavigateArgs {
    /// Full path, e.g. `/cart?x=1`.
    pub path: String,
}

/// Arguments for the call command.
#[derive(Args)]
pub struct CallArgs {
    /// HTTP method.
    pub method: String,

    /// Path below the API base URL, e.g. `/goods/1`.
    pub path: String,

    /// JSON request body.
    #[arg(short, long)]
    pub data: Option<String>,

    /// Query parameter as `key=value`; repeatable.
    #[arg(short, long = "query", value_name = "KEY=VALUE")]
    pub query: Vec<String>,
}

/// Arguments for the login command.
#[derive(Args)]
#[command(group(ArgGroup::new("identity").required(true).args(["name", "email"])))]
pub struct LoginArgs {
    /// Nickname to sign in with.
    #[arg(long)]
    pub name: Option<String>,

    /// Email address to sign in with.
    #[arg(long)]
    pub email: Option<String>,

    /// Password.
    #[arg(short, long)]
    pub password: String,
}
