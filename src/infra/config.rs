use std::net::SocketAddr;

use axum::http::HeaderValue;
use env_helpers::{get_env, get_env_default};
use secrecy::SecretString;
use time::Duration;

pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub database_url: String,
    pub jwt_secret: SecretString,
    pub access_token_ttl: Duration,
    pub cors_origin: HeaderValue,
    pub resend_api_key: SecretString,
    /// From-address on every outbound mail.
    pub email_from: String,
    /// Recipient of lead-created notifications. None disables them.
    pub lead_notify_email: Option<String>,
    /// Temporary credential given to newly provisioned agents. Injected
    /// here so it never lives in code.
    pub agent_temp_password: SecretString,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let jwt_secret: SecretString = SecretString::new(get_env::<String>("JWT_SECRET").into());
        let access_token_ttl_secs: i64 = get_env_default("ACCESS_TOKEN_TTL_SECS", 86_400);
        let cors_origin: HeaderValue =
            get_env_default("CORS_ORIGIN", String::from("http://localhost:3000"))
                .parse()
                .expect("CORS_ORIGIN must be a valid header value");
        let bind_addr: SocketAddr = get_env_default("BIND_ADDR", "127.0.0.1:3001".parse().unwrap());
        let database_url: String = get_env("DATABASE_URL");
        let resend_api_key: SecretString =
            SecretString::new(get_env::<String>("RESEND_API_KEY").into());
        let email_from: String = get_env("EMAIL_FROM");
        let lead_notify_email: Option<String> = std::env::var("LEAD_NOTIFY_EMAIL").ok();
        let agent_temp_password: SecretString =
            SecretString::new(get_env::<String>("AGENT_TEMP_PASSWORD").into());

        Self {
            bind_addr,
            database_url,
            jwt_secret,
            access_token_ttl: Duration::seconds(access_token_ttl_secs),
            cors_origin,
            resend_api_key,
            email_from,
            lead_notify_email,
            agent_temp_password,
        }
    }
}
