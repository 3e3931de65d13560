use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Path of the JSON store file.
    pub data_file: PathBuf,
    pub session_secret: String,
    pub super_admin_username: String,
    pub super_admin_password: String,
    /// Remote activation validator; local rules apply when unset.
    pub activation_api_url: Option<String>,
    /// One-time-code dispatch endpoint; codes stay cache-only when unset.
    pub code_sender_url: Option<String>,
    pub cors_origin: String,
    pub bind_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let session_secret =
            env::var("SESSION_SECRET").map_err(|_| "SESSION_SECRET must be set".to_string())?;

        let super_admin_password = env::var("SUPER_ADMIN_PASSWORD")
            .map_err(|_| "SUPER_ADMIN_PASSWORD must be set".to_string())?;

        let super_admin_username =
            env::var("SUPER_ADMIN_USERNAME").unwrap_or_else(|_| "superadmin".to_string());

        let data_file = env::var("DATA_FILE")
            .unwrap_or_else(|_| "data/morakhasi.json".to_string())
            .into();

        Ok(Self {
            data_file,
            session_secret,
            super_admin_username,
            super_admin_password,
            activation_api_url: env::var("ACTIVATION_API_URL").ok(),
            code_sender_url: env::var("CODE_SENDER_URL").ok(),
            cors_origin: env::var("CORS_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        })
    }
}
