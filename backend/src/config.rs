//! Identity-provider configuration.
//!
//! Settings are read once from the environment through [`mockable::Env`] so
//! they can be validated consistently and tested without touching the
//! process environment.

use mockable::Env;
use tracing::warn;
use url::Url;

/// Tenant domain of the identity provider, e.g. `example.eu.auth0.com`.
pub const DOMAIN_ENV: &str = "AUTH0_DOMAIN";
/// Public client identifier registered with the provider.
pub const CLIENT_ID_ENV: &str = "AUTH0_CLIENT_ID";
/// Optional API audience requested with each token.
pub const AUDIENCE_ENV: &str = "AUTH0_AUDIENCE";
/// Callback URL the provider redirects to after login.
pub const REDIRECT_URI_ENV: &str = "AUTH0_REDIRECT_URI";

const REDIRECT_URI_DEFAULT: &str = "http://localhost:3000/callback";
const REDIRECT_URI_EXPECTED: &str = "an absolute http:// or https:// URL";
const DOMAIN_EXPECTED: &str = "a bare host name such as example.auth0.com";

/// Scope requested at login. Fixed so profile data stays minimal.
pub const LOGIN_SCOPE: &str = "openid profile email";

/// Errors raised while validating identity-provider configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// One or more required variables are unset or blank.
    #[error("missing required environment variables: {}", names.join(", "))]
    MissingEnv { names: Vec<&'static str> },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        expected: &'static str,
    },
}

/// Identity-provider settings derived from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityProviderConfig {
    domain: String,
    client_id: String,
    audience: Option<String>,
    redirect_uri: String,
}

/// Build identity-provider settings from environment variables.
///
/// Blank values count as unset. Construction never fails; call
/// [`IdentityProviderConfig::validate`] before relying on the result.
///
/// # Examples
///
/// ```rust
/// use companion::config::identity_provider_from_env;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "AUTH0_DOMAIN" => Some("example.auth0.com".to_string()),
///     "AUTH0_CLIENT_ID" => Some("client-123".to_string()),
///     _ => None,
/// });
///
/// let config = identity_provider_from_env(&env);
/// assert!(config.is_configured());
/// assert_eq!(config.redirect_uri(), "http://localhost:3000/callback");
/// ```
pub fn identity_provider_from_env<E: Env>(env: &E) -> IdentityProviderConfig {
    let redirect_uri = non_blank(env, REDIRECT_URI_ENV).unwrap_or_else(|| {
        warn!(
            default = REDIRECT_URI_DEFAULT,
            "AUTH0_REDIRECT_URI not set; using default"
        );
        REDIRECT_URI_DEFAULT.to_owned()
    });

    IdentityProviderConfig {
        domain: non_blank(env, DOMAIN_ENV).unwrap_or_default(),
        client_id: non_blank(env, CLIENT_ID_ENV).unwrap_or_default(),
        audience: non_blank(env, AUDIENCE_ENV),
        redirect_uri,
    }
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

impl IdentityProviderConfig {
    /// Whether the required variables are present.
    pub fn is_configured(&self) -> bool {
        !self.domain.is_empty() && !self.client_id.is_empty()
    }

    /// Check required variables, the tenant domain, and the redirect URI.
    /// Every missing variable is named at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names: Vec<&'static str> = [
            (DOMAIN_ENV, &self.domain),
            (CLIENT_ID_ENV, &self.client_id),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect();
        if !names.is_empty() {
            return Err(ConfigError::MissingEnv { names });
        }

        self.issuer_url()?;
        self.redirect_url()?;
        Ok(())
    }

    /// Parsed redirect URI; must be an `http` or `https` URL with a host.
    pub fn redirect_url(&self) -> Result<Url, ConfigError> {
        let invalid = || ConfigError::InvalidEnv {
            name: REDIRECT_URI_ENV,
            expected: REDIRECT_URI_EXPECTED,
        };
        let url = Url::parse(&self.redirect_uri).map_err(|_| invalid())?;
        let web_scheme = matches!(url.scheme(), "http" | "https");
        if web_scheme && url.host_str().is_some_and(|host| !host.is_empty()) {
            Ok(url)
        } else {
            Err(invalid())
        }
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }

    pub fn scope(&self) -> &'static str {
        LOGIN_SCOPE
    }

    /// Token issuer derived from the tenant domain, e.g.
    /// `https://example.auth0.com/`.
    pub fn issuer_url(&self) -> Result<Url, ConfigError> {
        let invalid = || ConfigError::InvalidEnv {
            name: DOMAIN_ENV,
            expected: DOMAIN_EXPECTED,
        };
        let domain = self.domain.trim_end_matches('/');
        if domain.contains("://") {
            return Err(invalid());
        }
        let url = Url::parse(&format!("https://{domain}")).map_err(|_| invalid())?;
        let bare_host = url.host_str().is_some()
            && url.path() == "/"
            && url.port().is_none()
            && url.query().is_none()
            && url.fragment().is_none()
            && url.username().is_empty();
        if bare_host { Ok(url) } else { Err(invalid()) }
    }
}
