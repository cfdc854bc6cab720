use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

pub const DEFAULT_SMTP_PORT: u16 = 587;
pub const DEFAULT_SUBJECT: &str = "Message from Go Server";
pub const DEFAULT_SMTP_RELAY: &str = "smtp.gmail.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub sender: String,
    pub smtp_pass: String,
    pub smtp_relay: String,
    pub smtp_username: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_subject")]
    pub default_subject: String,
    pub port: u16,
}

fn default_smtp_port() -> u16 {
    DEFAULT_SMTP_PORT
}

fn default_subject() -> String {
    DEFAULT_SUBJECT.to_string()
}

fn validate(config: Config) -> Result<Config, Box<dyn std::error::Error>> {
    if config.sender.is_empty() || config.smtp_username.is_empty() || config.smtp_pass.is_empty() {
        return Err("'sender', 'smtp_username' and 'smtp_pass' must be set".into());
    }
    Ok(config)
}

fn load_from_env() -> Result<Config, Box<dyn std::error::Error>> {
    let sender =
        env::var("MAIL_SENDER").map_err(|_| "MAIL_SENDER environment variable is required")?;
    let smtp_username =
        env::var("SMTP_USERNAME").map_err(|_| "SMTP_USERNAME environment variable is required")?;
    let smtp_pass =
        env::var("SMTP_PASSWORD").map_err(|_| "SMTP_PASSWORD environment variable is required")?;
    let smtp_relay = env::var("SMTP_RELAY").unwrap_or_else(|_| DEFAULT_SMTP_RELAY.to_string());

    let smtp_port = match env::var("SMTP_PORT") {
        Ok(value) => value
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse SMTP_PORT: {}", e))?,
        Err(_) => DEFAULT_SMTP_PORT,
    };

    let default_subject =
        env::var("MAIL_DEFAULT_SUBJECT").unwrap_or_else(|_| DEFAULT_SUBJECT.to_string());

    let port = env::var("PORT")
        .map_err(|_| "PORT environment variable is required")?
        .parse::<u16>()
        .map_err(|e| format!("Failed to parse PORT: {}", e))?;

    Ok(Config {
        sender,
        smtp_pass,
        smtp_relay,
        smtp_username,
        smtp_port,
        default_subject,
        port,
    })
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    // Retrieve env variable
    let config_path = env::var("MAIL_RELAY_CONFIG").unwrap_or_else(|_| "config.yaml".to_string());

    // Try env path
    if Path::new(&config_path).exists() {
        let contents = fs::read_to_string(&config_path)?;
        return validate(serde_yaml::from_str(&contents)?);
    }

    // Fallback to config.yaml
    if Path::new("config.yaml").exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        let contents = fs::read_to_string("config.yaml")?;
        return validate(serde_yaml::from_str(&contents)?);
    }

    // Fallback to config.example.yaml
    if Path::new("config.example.yaml").exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'\
             \n This file should not be used and should be replaced with actual data",
            config_path
        );
        let contents = fs::read_to_string("config.example.yaml")?;
        return validate(serde_yaml::from_str(&contents)?);
    }

    // Fallback to environment variables
    tracing::info!(
        "No config file found, attempting to load configuration from environment variables"
    );
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Successfully loaded configuration from environment variables");
            validate(config)
        }
        Err(e) => Err(format!(
            "Config file not found and environment variables are incomplete. \
             Tried: '{}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {}",
            config_path, e
        )
        .into()),
    }
}
