use crate::session::StoredSession;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File as ConfigFile, FileFormat};
use eyre::{eyre, Context, Result};
use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;

const EXAMPLE_CONFIG: &str = include_str!("../config.toml");
const DEVICE_ID_FILENAME: &str = "device_id";

#[derive(Debug, Clone, serde::Deserialize, serde::Serialize)]
pub struct Settings {
    pub db_path: String,
    pub session_path: String,
    pub server_address: String,
    /// Forces every reachability probe to report offline. Useful on metered
    /// connections and in tests.
    pub offline: bool,
}

impl Settings {
    fn read_from_data_dir(filename: &str) -> Option<String> {
        let data_dir = brewlog_common::utils::data_dir();
        let path = data_dir.join(filename);

        if !path.exists() {
            return None;
        }

        let value = fs_err::read_to_string(path);
        value.ok()
    }

    fn save_to_data_dir(filename: &str, value: &str) -> Result<()> {
        let data_dir = brewlog_common::utils::data_dir();
        let path = data_dir.join(filename);
        fs_err::write(path, value)?;
        Ok(())
    }

    /// Stable anonymous id for this device. Generated once and reused so an
    /// unauthenticated cache stays addressable across restarts.
    pub fn device_id() -> String {
        if let Some(id) = Settings::read_from_data_dir(DEVICE_ID_FILENAME) {
            return id.trim().to_string();
        }

        let id = format!("{}@{}", get_username(), get_hostname());
        Settings::save_to_data_dir(DEVICE_ID_FILENAME, &id).expect("Failed to write device id");
        id
    }

    pub fn session(&self) -> Option<StoredSession> {
        let path = PathBuf::from(&self.session_path);

        if !path.exists() {
            return None;
        }

        let value = fs_err::read_to_string(path).ok()?;
        serde_json::from_str(&value).ok()
    }

    pub fn save_session(&self, session: &StoredSession) -> Result<()> {
        let value = serde_json::to_string(session)?;
        fs_err::write(&self.session_path, value.as_bytes())
            .wrap_err("Failed to write session file")?;
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        let path = PathBuf::from(&self.session_path);
        if path.exists() {
            fs_err::remove_file(path)?;
        }
        Ok(())
    }

    pub fn builder() -> Result<ConfigBuilder<DefaultState>> {
        let data_dir = brewlog_common::utils::data_dir();
        let db_path = data_dir.join("recipes.db");
        let session_path = data_dir.join("session");

        Ok(Config::builder()
            .set_default("db_path", db_path.to_str())?
            .set_default("session_path", session_path.to_str())?
            .set_default("server_address", "http://127.0.0.1:8090")?
            .set_default("offline", false)?
            .add_source(
                Environment::with_prefix("brewlog")
                    .prefix_separator("_")
                    .separator("__"),
            ))
    }

    pub fn new() -> Result<Self> {
        let config_dir = brewlog_common::utils::config_dir();
        let data_dir = brewlog_common::utils::data_dir();

        create_dir_all(&config_dir)
            .wrap_err_with(|| format!("Failed to create dir {config_dir:?}"))?;
        create_dir_all(&data_dir).wrap_err_with(|| format!("Failed to create dir {data_dir:?}"))?;

        let mut config_file = if let Ok(p) = std::env::var("BREWLOG_CONFIG_DIR") {
            PathBuf::from(p)
        } else {
            let mut config_file = PathBuf::new();
            config_file.push(config_dir);
            config_file
        };

        config_file.push("config.toml");

        let mut config_builder = Self::builder()?;
        config_builder = if config_file.exists() {
            config_builder.add_source(ConfigFile::new(
                config_file.to_str().unwrap(),
                FileFormat::Toml,
            ))
        } else {
            let mut file = File::create(config_file).wrap_err("Failed to create config file")?;
            file.write_all(EXAMPLE_CONFIG.as_bytes())
                .wrap_err("Failed to write default config file")?;
            config_builder
        };

        let mut settings: Settings = config_builder
            .build()?
            .try_deserialize()
            .map_err(|e| eyre!("Failed to deserialize {}", e))?;

        settings.db_path = expand_shell(&settings.db_path)?;
        settings.session_path = expand_shell(&settings.session_path)?;

        Ok(settings)
    }
}

fn expand_shell(value: &str) -> Result<String> {
    Ok(shellexpand::full(value)?.to_string())
}

fn get_hostname() -> String {
    whoami::fallible::hostname().unwrap_or_else(|_| "unknown".to_string())
}

fn get_username() -> String {
    whoami::username()
}
