/*
 * Responsibility
 * - 環境変数の読み込み (PORT, 認証スキーム, フォワーダー設定など)
 * - 設定値のバリデーション (不正なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::services::auth::selector::{DEFAULT_INTROSPECTION_SCHEME, DEFAULT_SCHEME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Which built-in selector decides the scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorKind {
    /// Default scheme, plus reference-token forwarding when enabled.
    Default,
    /// `JwtOrIntrospectionSelector` over the default and introspection schemes.
    JwtOrIntrospection,
}

impl FromStr for SelectorKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(Self::Default),
            "jwt-or-introspection" => Ok(Self::JwtOrIntrospection),
            _ => Err(ConfigError::Invalid("AUTH_SELECTOR")),
        }
    }
}

pub struct AuthConfig {
    pub default_scheme: String,
    /// `Some` when the forwarder is installed.
    pub forward_scheme: Option<String>,
    pub selector: SelectorKind,
    pub introspection_scheme: String,

    pub static_tokens: Vec<(String, String)>,
    pub allow_anonymous: bool,
    /// Registered under the forward/introspection scheme when present.
    pub forward_static_tokens: Option<Vec<(String, String)>>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print token material
        f.debug_struct("AuthConfig")
            .field("default_scheme", &self.default_scheme)
            .field("forward_scheme", &self.forward_scheme)
            .field("selector", &self.selector)
            .field("introspection_scheme", &self.introspection_scheme)
            .field("static_tokens", &self.static_tokens.len())
            .field("allow_anonymous", &self.allow_anonymous)
            .field(
                "forward_static_tokens",
                &self.forward_static_tokens.as_ref().map(Vec::len),
            )
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            default_scheme: DEFAULT_SCHEME.to_string(),
            forward_scheme: None,
            selector: SelectorKind::Default,
            introspection_scheme: DEFAULT_INTROSPECTION_SCHEME.to_string(),
            static_tokens: Vec::new(),
            allow_anonymous: true,
            forward_static_tokens: None,
        }
    }
}

#[derive(Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub request_timeout: Duration,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let request_timeout = std::env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let auth = AuthConfig::from_env()?;

        Ok(Self {
            addr,
            app_env,
            request_timeout,
            auth,
        })
    }
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading keys through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let default_scheme =
            non_empty("AUTH_DEFAULT_SCHEME").unwrap_or_else(|| DEFAULT_SCHEME.to_string());

        let forwarder = match lookup("AUTH_FORWARDER") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("AUTH_FORWARDER"))?,
            None => false,
        };

        let forward_scheme = forwarder.then(|| {
            non_empty("AUTH_FORWARD_SCHEME")
                .unwrap_or_else(|| DEFAULT_INTROSPECTION_SCHEME.to_string())
        });

        let selector = lookup("AUTH_SELECTOR")
            .unwrap_or_default()
            .parse::<SelectorKind>()?;

        // The selector would take over and the forward scheme would never be used
        if forward_scheme.is_some() && selector != SelectorKind::Default {
            return Err(ConfigError::Invalid("AUTH_SELECTOR"));
        }

        let introspection_scheme = non_empty("AUTH_INTROSPECTION_SCHEME")
            .unwrap_or_else(|| DEFAULT_INTROSPECTION_SCHEME.to_string());

        let static_tokens = parse_token_list(&lookup("AUTH_STATIC_TOKENS").unwrap_or_default())
            .ok_or(ConfigError::Invalid("AUTH_STATIC_TOKENS"))?;

        let allow_anonymous = match lookup("AUTH_ALLOW_ANONYMOUS") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("AUTH_ALLOW_ANONYMOUS"))?,
            None => true,
        };

        let forward_static_tokens = match lookup("AUTH_FORWARD_STATIC_TOKENS") {
            Some(v) => Some(
                parse_token_list(&v).ok_or(ConfigError::Invalid("AUTH_FORWARD_STATIC_TOKENS"))?,
            ),
            None => None,
        };

        Ok(Self {
            default_scheme,
            forward_scheme,
            selector,
            introspection_scheme,
            static_tokens,
            allow_anonymous,
            forward_static_tokens,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `token=subject,token=subject`; `None` when an entry is malformed.
fn parse_token_list(value: &str) -> Option<Vec<(String, String)>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|entry| {
            let (token, subject) = entry.split_once('=')?;
            let (token, subject) = (token.trim(), subject.trim());
            (!token.is_empty() && !subject.is_empty())
                .then(|| (token.to_string(), subject.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_kind_parses() {
        assert_eq!("".parse::<SelectorKind>(), Ok(SelectorKind::Default));
        assert_eq!("Default".parse::<SelectorKind>(), Ok(SelectorKind::Default));
        assert_eq!(
            "jwt-or-introspection".parse::<SelectorKind>(),
            Ok(SelectorKind::JwtOrIntrospection)
        );
        assert_eq!(
            "random".parse::<SelectorKind>(),
            Err(ConfigError::Invalid("AUTH_SELECTOR"))
        );
    }

    #[test]
    fn bool_values() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn token_list_parses_pairs() {
        let tokens = parse_token_list("t-1=alice, t-2 = bob ,").unwrap();
        assert_eq!(
            tokens,
            vec![
                ("t-1".to_string(), "alice".to_string()),
                ("t-2".to_string(), "bob".to_string()),
            ]
        );
        assert_eq!(parse_token_list(""), Some(Vec::new()));
    }

    #[test]
    fn token_list_rejects_malformed_entries() {
        assert_eq!(parse_token_list("t-1"), None);
        assert_eq!(parse_token_list("=alice"), None);
        assert_eq!(parse_token_list("t-1=alice,t-2="), None);
    }

    #[test]
    fn auth_defaults() {
        let auth = AuthConfig::default();
        assert_eq!(auth.default_scheme, "Bearer");
        assert_eq!(auth.forward_scheme, None);
        assert_eq!(auth.introspection_scheme, "Introspection");
        assert!(auth.allow_anonymous);
    }

    fn auth_from(vars: &[(&str, &str)]) -> Result<AuthConfig, ConfigError> {
        AuthConfig::from_lookup(|key| {
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        })
    }

    #[test]
    fn empty_env_matches_defaults() {
        let auth = auth_from(&[]).unwrap();
        assert_eq!(auth.default_scheme, "Bearer");
        assert_eq!(auth.forward_scheme, None);
        assert_eq!(auth.selector, SelectorKind::Default);
        assert!(auth.allow_anonymous);
        assert!(auth.static_tokens.is_empty());
        assert_eq!(auth.forward_static_tokens, None);
    }

    #[test]
    fn forwarder_defaults_to_introspection_scheme() {
        let auth = auth_from(&[("AUTH_FORWARDER", "true")]).unwrap();
        assert_eq!(auth.forward_scheme.as_deref(), Some("Introspection"));
    }

    #[test]
    fn forward_scheme_can_be_renamed() {
        let auth = auth_from(&[("AUTH_FORWARDER", "yes"), ("AUTH_FORWARD_SCHEME", " foo ")]).unwrap();
        assert_eq!(auth.forward_scheme.as_deref(), Some("foo"));
    }

    #[test]
    fn forward_scheme_is_ignored_without_forwarder() {
        let auth = auth_from(&[("AUTH_FORWARDER", "off"), ("AUTH_FORWARD_SCHEME", "foo")]).unwrap();
        assert_eq!(auth.forward_scheme, None);
    }

    #[test]
    fn token_lists_are_read() {
        let auth = auth_from(&[
            ("AUTH_STATIC_TOKENS", "t-1=alice"),
            ("AUTH_FORWARD_STATIC_TOKENS", "ref-1=carol"),
            ("AUTH_ALLOW_ANONYMOUS", "false"),
        ])
        .unwrap();
        assert_eq!(auth.static_tokens, vec![("t-1".to_string(), "alice".to_string())]);
        assert_eq!(
            auth.forward_static_tokens,
            Some(vec![("ref-1".to_string(), "carol".to_string())])
        );
        assert!(!auth.allow_anonymous);
    }

    #[test]
    fn bad_booleans_are_rejected() {
        assert_eq!(
            auth_from(&[("AUTH_FORWARDER", "maybe")]).unwrap_err(),
            ConfigError::Invalid("AUTH_FORWARDER")
        );
        assert_eq!(
            auth_from(&[("AUTH_ALLOW_ANONYMOUS", "sometimes")]).unwrap_err(),
            ConfigError::Invalid("AUTH_ALLOW_ANONYMOUS")
        );
    }

    #[test]
    fn malformed_token_list_is_rejected() {
        assert_eq!(
            auth_from(&[("AUTH_FORWARD_STATIC_TOKENS", "ref-1")]).unwrap_err(),
            ConfigError::Invalid("AUTH_FORWARD_STATIC_TOKENS")
        );
    }

    #[test]
    fn forwarder_conflicts_with_custom_selector() {
        assert_eq!(
            auth_from(&[
                ("AUTH_FORWARDER", "true"),
                ("AUTH_SELECTOR", "jwt-or-introspection"),
            ])
            .unwrap_err(),
            ConfigError::Invalid("AUTH_SELECTOR")
        );

        let auth = auth_from(&[("AUTH_SELECTOR", "jwt-or-introspection")]).unwrap();
        assert_eq!(auth.selector, SelectorKind::JwtOrIntrospection);
        assert_eq!(auth.forward_scheme, None);
    }
}
