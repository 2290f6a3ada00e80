use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Local};
use clap::Args;
use serde_json::{json, Value};

use crate::auth::Authenticator;
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Args, Debug, Clone)]
pub struct CallArgs {
    #[arg(long, default_value = "http://127.0.0.1:8080/method", help = "Method endpoint URL")]
    pub url: String,

    #[arg(long, help = "Login to call as")]
    pub login: String,

    #[arg(long, default_value = "", help = "Account the login belongs to")]
    pub account: String,

    #[arg(long, help = "Method name, e.g. online_score")]
    pub method: String,

    #[arg(long, default_value = "{}", help = "Method arguments as a JSON object")]
    pub arguments: String,
}

/// Build a signed method envelope for the given arguments
pub fn build_envelope(args: &CallArgs, auth: &Authenticator, now: DateTime<Local>) -> anyhow::Result<Value> {
    let arguments: Value = serde_json::from_str(&args.arguments).context("--arguments must be valid JSON")?;
    if !arguments.is_object() {
        anyhow::bail!("--arguments must be a JSON object");
    }

    Ok(json!({
        "account": args.account,
        "login": args.login,
        "method": args.method,
        "token": auth.expected_token(&args.account, &args.login, now),
        "arguments": arguments,
    }))
}

pub async fn handle(args: CallArgs, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let auth = Authenticator::new(config.auth.clone());
    let envelope = build_envelope(&args, &auth, Local::now())?;

    tracing::debug!("POST {} {}", args.url, envelope);
    let response = reqwest::Client::new()
        .post(&args.url)
        .timeout(Duration::from_secs(10))
        .json(&envelope)
        .send()
        .await
        .with_context(|| format!("failed to reach {}", args.url))?;

    let status = response.status();
    let body: Value = response.json().await.context("server returned a non-JSON body")?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&body)?),
        OutputFormat::Text => {
            println!("HTTP {}", status);
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    if !status.is_success() {
        anyhow::bail!("method call failed with status {}", status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use chrono::TimeZone;

    fn args(login: &str, arguments: &str) -> CallArgs {
        CallArgs {
            url: "http://localhost/method".into(),
            login: login.into(),
            account: "horns&hoofs".into(),
            method: "online_score".into(),
            arguments: arguments.into(),
        }
    }

    #[test]
    fn envelope_carries_a_valid_token() {
        let auth = Authenticator::new(AuthConfig::default());
        let now = Local.with_ymd_and_hms(2024, 5, 1, 13, 0, 0).unwrap();

        let envelope = build_envelope(&args("h&f", r#"{"phone": "79175002040"}"#), &auth, now).unwrap();
        assert_eq!(envelope["method"], "online_score");
        assert_eq!(envelope["arguments"]["phone"], "79175002040");
        assert_eq!(envelope["token"], auth.user_token("horns&hoofs", "h&f"));

        let admin = build_envelope(&args("admin", "{}"), &auth, now).unwrap();
        assert_eq!(admin["token"], auth.admin_token(now));
    }

    #[test]
    fn arguments_must_be_an_object() {
        let auth = Authenticator::new(AuthConfig::default());
        assert!(build_envelope(&args("h&f", "[1, 2]"), &auth, Local::now()).is_err());
        assert!(build_envelope(&args("h&f", "{"), &auth, Local::now()).is_err());
    }
}
