use chrono::Local;
use clap::Args;

use crate::auth::Authenticator;
use crate::cli::{utils, OutputFormat};
use crate::config::AppConfig;

#[derive(Args, Debug, Clone)]
pub struct TokenArgs {
    #[arg(long, help = "Login to issue the token for")]
    pub login: String,

    #[arg(long, default_value = "", help = "Account the login belongs to")]
    pub account: String,
}

pub fn handle(args: TokenArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let auth = Authenticator::new(config.auth.clone());
    let token = auth.expected_token(&args.account, &args.login, Local::now());
    utils::output_value(&output_format, "token", &token)
}
