use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub uploads: UploadConfig,
    pub mail: MailConfig,
    pub content: ContentConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// `memory://` selects the in-process store.
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub allow_registration: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_file_bytes: usize,
    pub serverless: bool,
    pub cloudinary: Option<CloudinaryConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    #[serde(skip_serializing)]
    pub api_secret: String,
    pub folder: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub admin_email: Option<String>,
    pub hr_email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    pub default_team_image: String,
    pub default_site_image: String,
}

const DEV_JWT_SECRET: &str = "javelin-secret-key";

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").or_else(|_| env::var("NODE_ENV")).as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("CLIENT_URL") {
            self.server.cors_origins = vec![v.trim().to_string()];
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.server.cors_origins = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.server.max_request_size_bytes = v.parse().unwrap_or(self.server.max_request_size_bytes);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            if !v.trim().is_empty() {
                self.security.jwt_secret = v;
            }
        }
        if let Ok(v) = env::var("JWT_EXPIRE_DAYS") {
            if let Ok(days) = v.trim_end_matches('d').parse::<u64>() {
                self.security.jwt_expiry_hours = days.saturating_mul(24);
            }
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        self.security.jwt_expiry_hours = clamp_token_expiry(self.security.jwt_expiry_hours);
        if let Ok(v) = env::var("ALLOW_REGISTRATION") {
            self.security.allow_registration = v.parse().unwrap_or(self.security.allow_registration);
        }

        // Upload overrides
        if let Ok(v) = env::var("UPLOADS_DIR") {
            self.uploads.dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("UPLOAD_MAX_FILE_BYTES") {
            self.uploads.max_file_bytes = v.parse().unwrap_or(self.uploads.max_file_bytes);
        }
        self.uploads.serverless = env::var("NETLIFY").as_deref() == Ok("true")
            || env::var("AWS_LAMBDA_FUNCTION_NAME").map(|v| !v.is_empty()).unwrap_or(false);
        self.uploads.cloudinary = match (
            non_empty_var("CLOUDINARY_CLOUD_NAME"),
            non_empty_var("CLOUDINARY_API_KEY"),
            non_empty_var("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                folder: non_empty_var("CLOUDINARY_FOLDER").unwrap_or_else(|| "javelin-security".to_string()),
            }),
            _ => None,
        };

        // Mail overrides
        if let Ok(v) = env::var("EMAIL_HOST") {
            self.mail.host = v;
        }
        if let Ok(v) = env::var("EMAIL_PORT") {
            self.mail.port = v.parse().unwrap_or(self.mail.port);
        }
        self.mail.user = non_empty_var("EMAIL_USER");
        self.mail.password = non_empty_var("EMAIL_PASS");
        self.mail.admin_email = non_empty_var("ADMIN_EMAIL");
        self.mail.hr_email = non_empty_var("HR_EMAIL").or_else(|| self.mail.admin_email.clone());

        // Content overrides
        if let Some(v) = non_empty_var("DEFAULT_TEAM_IMAGE") {
            self.content.default_team_image = v;
        }
        if let Some(v) = non_empty_var("DEFAULT_SITE_IMAGE") {
            self.content.default_site_image = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 5000,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5000".to_string()],
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/javelin_security".to_string(),
                max_connections: 10,
                connection_timeout: 30,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 30,
                allow_registration: true,
            },
            uploads: UploadConfig::default(),
            mail: MailConfig::default(),
            content: ContentConfig::default(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 5000,
                cors_origins: vec!["https://staging.javelinassociates.org".to_string()],
                max_request_size_bytes: 10 * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/javelin_security".to_string(),
                max_connections: 20,
                connection_timeout: 10,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7,
                allow_registration: true,
            },
            uploads: UploadConfig::default(),
            mail: MailConfig::default(),
            content: ContentConfig::default(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 5000,
                cors_origins: vec![
                    "https://www.javelinassociates.org".to_string(),
                    "https://javelinassociates.org".to_string(),
                ],
                max_request_size_bytes: 10 * 1024 * 1024,
            },
            database: DatabaseConfig {
                url: "postgres://localhost:5432/javelin_security".to_string(),
                max_connections: 50,
                connection_timeout: 5,
            },
            security: SecurityConfig {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                jwt_expiry_hours: 24 * 7,
                allow_registration: false,
            },
            uploads: UploadConfig::default(),
            mail: MailConfig::default(),
            content: ContentConfig::default(),
        }
    }

    pub fn uses_default_jwt_secret(&self) -> bool {
        self.security.jwt_secret == DEV_JWT_SECRET
    }

    /// Configuration for in-process tests: memory store, local uploads under `dir`.
    pub fn for_tests(uploads_dir: impl Into<PathBuf>) -> Self {
        let mut config = Self::development();
        config.database.url = "memory://".to_string();
        config.security.jwt_secret = "test-secret".to_string();
        config.uploads.dir = uploads_dir.into();
        config
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            max_file_bytes: 5 * 1024 * 1024, // 5MB
            serverless: false,
            cloudinary: None,
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            host: "smtp.gmail.com".to_string(),
            port: 587,
            user: None,
            password: None,
            admin_email: None,
            hr_email: None,
        }
    }
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            default_team_image: "/assets/images/placeholders/guard-placeholder.jpg".to_string(),
            default_site_image: "/assets/images/placeholders/security-placeholder.jpg".to_string(),
        }
    }
}

/// Longest token lifetime accepted from the environment: ten years.
pub const MAX_JWT_EXPIRY_HOURS: u64 = 24 * 365 * 10;

fn clamp_token_expiry(hours: u64) -> u64 {
    if hours > MAX_JWT_EXPIRY_HOURS {
        tracing::warn!(hours, max = MAX_JWT_EXPIRY_HOURS, "JWT expiry too long; clamping");
        MAX_JWT_EXPIRY_HOURS
    } else {
        hours
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
