use std::env;
use std::fmt::Display;
use std::str::FromStr;

/// Auth0 tenant settings used to verify ID tokens on user sync
#[derive(Debug, Clone)]
pub struct Auth0Config {
    pub domain: String,
    pub client_id: String,
    pub client_secret: String,
}

impl Auth0Config {
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain.trim_end_matches('/'))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub mongo_uri: String,
    pub users_db: String,
    pub purchases_db: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
    pub cookie_secure: bool,
    pub frontend_origins: Vec<String>,
    pub auth0: Option<Auth0Config>,
}

impl Config {
    /// Reads the service configuration from the environment.
    /// Only `MONGO_URI` is mandatory.
    pub fn from_env() -> Result<Self, String> {
        let mongo_uri = env::var("MONGO_URI").map_err(|_| "MONGO_URI is not set".to_string())?;

        let auth0 = match (
            env::var("AUTH0_DOMAIN"),
            env::var("AUTH0_CLIENT_ID"),
            env::var("AUTH0_CLIENT_SECRET"),
        ) {
            (Ok(domain), Ok(client_id), Ok(client_secret)) => Some(Auth0Config {
                domain,
                client_id,
                client_secret,
            }),
            _ => {
                log::warn!("⚠️  AUTH0_* not fully configured, /api/auth/sync-user will reject requests");
                None
            }
        };

        let frontend_origins = env::var("FRONTEND_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_or("PORT", 5000)?,
            mongo_uri,
            users_db: var_or("USERS_DB", "Users"),
            purchases_db: var_or("PURCHASES_DB", "Purchases"),
            jwt_secret: var_or("JWT_SECRET", "dev-secret-change-me"),
            jwt_issuer: var_or("JWT_ISSUER", "vitalbox-service"),
            jwt_audience: var_or("JWT_AUDIENCE", "vitalbox-web"),
            access_ttl_secs: parse_or("JWT_ACCESS_TTL_SECS", 3600)?,
            refresh_ttl_secs: parse_or("JWT_REFRESH_TTL_SECS", 7 * 24 * 3600)?,
            cookie_secure: parse_or("COOKIE_SECURE", false)?,
            frontend_origins,
            auth0,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        log::debug!("{} not set, using default: {}", key, default);
        default.to_string()
    })
}

fn parse_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {} value '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            mongo_uri: "mongodb://localhost:27017".into(),
            users_db: "Users".into(),
            purchases_db: "Purchases".into(),
            jwt_secret: "test-secret".into(),
            jwt_issuer: "vitalbox-service".into(),
            jwt_audience: "vitalbox-web".into(),
            access_ttl_secs: 3600,
            refresh_ttl_secs: 7 * 24 * 3600,
            cookie_secure: false,
            frontend_origins: vec!["http://localhost:3000".into()],
            auth0: Some(Auth0Config {
                domain: "vitalbox.test.auth0.com".into(),
                client_id: "test-client".into(),
                client_secret: "test-auth0-secret".into(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth0_issuer_has_trailing_slash() {
        let cfg = Auth0Config {
            domain: "tenant.eu.auth0.com/".into(),
            client_id: "id".into(),
            client_secret: "secret".into(),
        };
        assert_eq!(cfg.issuer(), "https://tenant.eu.auth0.com/");
    }
}
