use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub login_email: String,
    pub login_password: String,
    pub region_id: Option<i64>,
    pub poll_interval: Duration,
    pub pause_safety: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let api_base_url = env::var("DISPATCH_API_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string());

        let geocoder_url = env::var("GEOCODER_URL")
            .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string());

        // The geocoding service rejects anonymous clients.
        let geocoder_user_agent = env::var("GEOCODER_USER_AGENT")
            .unwrap_or_else(|_| "fielddesk/0.1 (dispatch@fielddesk.example)".to_string());

        let login_email = env::var("DISPATCH_EMAIL").map_err(|_| ConfigError::MissingEmail)?;

        let login_password =
            env::var("DISPATCH_PASSWORD").map_err(|_| ConfigError::MissingPassword)?;

        let region_id = match env::var("DISPATCH_REGION_ID") {
            Ok(value) => Some(value.parse().map_err(|_| ConfigError::InvalidRegionId)?),
            Err(_) => None,
        };

        let poll_interval = env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let pause_safety = env::var("PAUSE_SAFETY_SECS")
            .unwrap_or_else(|_| "300".to_string())
            .parse()
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(300));

        Ok(Config {
            api_base_url,
            geocoder_url,
            geocoder_user_agent,
            login_email,
            login_password,
            region_id,
            poll_interval,
            pause_safety,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("DISPATCH_EMAIL environment variable not set")]
    MissingEmail,

    #[error("DISPATCH_PASSWORD environment variable not set")]
    MissingPassword,

    #[error("DISPATCH_REGION_ID must be an integer")]
    InvalidRegionId,
}
