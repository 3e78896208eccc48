use std::net::SocketAddr;

use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Empty means any origin is allowed.
    pub cors_origins: Vec<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([0, 0, 0, 0], 8080)),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Read `MUSICMANAGER_BIND` and `CORS_ORIGINS`.
    pub fn from_env() -> Self {
        let bind = std::env::var("MUSICMANAGER_BIND").unwrap_or_else(|_| DEFAULT_BIND.to_string());
        let origins = std::env::var("CORS_ORIGINS").unwrap_or_default();
        Self::parse(&bind, &origins)
    }

    fn parse(bind: &str, origins: &str) -> Self {
        let bind = bind.parse().unwrap_or_else(|e| {
            tracing::warn!(value = bind, error = %e, "invalid MUSICMANAGER_BIND, using {DEFAULT_BIND}");
            Self::default().bind
        });
        let cors_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        Self { bind, cors_origins }
    }

    pub fn cors_layer(&self) -> CorsLayer {
        let origin = if self.cors_origins.is_empty() {
            AllowOrigin::any()
        } else {
            tracing::info!("CORS allowed origins: {:?}", self.cors_origins);
            AllowOrigin::list(self.cors_origins.clone())
        };
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
            .expose_headers(Any)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() {
        let cfg = ServerConfig::parse(DEFAULT_BIND, "");
        assert_eq!(cfg.bind.port(), 8080);
        assert!(cfg.cors_origins.is_empty());
    }

    #[test]
    fn test_parse_origins() {
        let cfg = ServerConfig::parse(
            "127.0.0.1:3000",
            "http://localhost:5173, https://music.example.com,,",
        );
        assert_eq!(cfg.bind, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(cfg.cors_origins.len(), 2);
        assert_eq!(cfg.cors_origins[1], "https://music.example.com");
    }

    #[test]
    fn test_parse_bad_bind_falls_back() {
        let cfg = ServerConfig::parse("not an address", "");
        assert_eq!(cfg.bind, ServerConfig::default().bind);
    }
}
