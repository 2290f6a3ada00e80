use chrono::{DateTime, Local};
use sha2::{Digest, Sha512};

use crate::config::AuthConfig;
use crate::method::MethodEnvelope;

/// Hour-granularity stamp the admin token is derived from
const ADMIN_STAMP_FORMAT: &str = "%Y%m%d%H";

/// Checks envelope tokens against digests derived from the configured salts.
///
/// Tokens are compared with plain string equality, which is not constant
/// time and leaks timing information about the expected digest.
#[derive(Debug, Clone)]
pub struct Authenticator {
    config: AuthConfig,
}

impl Authenticator {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn is_admin(&self, login: &str) -> bool {
        login == self.config.admin_login
    }

    /// Token an ordinary user must present
    pub fn user_token(&self, account: &str, login: &str) -> String {
        sha512_hex(&[account, login, &self.config.salt])
    }

    /// Token an admin must present during the hour containing `now`
    pub fn admin_token(&self, now: DateTime<Local>) -> String {
        let stamp = now.format(ADMIN_STAMP_FORMAT).to_string();
        sha512_hex(&[&stamp, &self.config.admin_salt])
    }

    /// Expected token for the given credentials at `now`
    pub fn expected_token(&self, account: &str, login: &str, now: DateTime<Local>) -> String {
        if self.is_admin(login) {
            self.admin_token(now)
        } else {
            self.user_token(account, login)
        }
    }

    pub fn check_at(&self, envelope: &MethodEnvelope, now: DateTime<Local>) -> bool {
        let expected = self.expected_token(envelope.account(), envelope.login(), now);
        expected == envelope.token()
    }
}

fn sha512_hex(parts: &[&str]) -> String {
    let mut hasher = Sha512::new();
    for part in parts {
        hasher.update(part.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidatedRequest;
    use chrono::TimeZone;
    use serde_json::json;

    fn authenticator() -> Authenticator {
        Authenticator::new(AuthConfig::default())
    }

    fn at(hour: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 5, hour, 30, 0).unwrap()
    }

    fn envelope_check(body: serde_json::Value, now: DateTime<Local>) -> bool {
        let mut request = ValidatedRequest::new(&crate::method::METHOD_SCHEMA, body);
        assert!(request.is_valid(), "{}", request.error_message());
        let envelope = MethodEnvelope::new(request, "admin");
        authenticator().check_at(&envelope, now)
    }

    #[test]
    fn user_token_is_sha512_of_account_login_salt() {
        let expected = format!("{:x}", Sha512::digest(b"h&fh&fOtus"));
        assert_eq!(authenticator().user_token("h&f", "h&f"), expected);
        assert_eq!(expected.len(), 128);
    }

    #[test]
    fn admin_token_depends_on_hour() {
        let auth = authenticator();
        let expected = format!("{:x}", Sha512::digest(b"202403051042"));
        assert_eq!(auth.admin_token(at(10)), expected);
        assert_ne!(auth.admin_token(at(10)), auth.admin_token(at(11)));
    }

    #[test]
    fn admin_authenticates_only_with_current_hour_token() {
        let auth = authenticator();
        let body = |token: String| {
            json!({"account": "", "login": "admin", "method": "online_score", "token": token, "arguments": {}})
        };
        assert!(envelope_check(body(auth.admin_token(at(10))), at(10)));
        assert!(!envelope_check(body(auth.admin_token(at(9))), at(10)));
        assert!(!envelope_check(body(auth.user_token("", "admin")), at(10)));
    }

    #[test]
    fn user_token_comparison_is_case_sensitive() {
        let auth = authenticator();
        let token = auth.user_token("h&f", "h&f");
        let body = |token: String| {
            json!({"account": "h&f", "login": "h&f", "method": "online_score", "token": token, "arguments": {}})
        };
        assert!(envelope_check(body(token.clone()), at(10)));
        assert!(!envelope_check(body(token.to_uppercase()), at(10)));
        assert!(!envelope_check(body(String::new()), at(10)));
    }
}
