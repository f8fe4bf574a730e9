use brewlog_client::settings::Settings;
use std::path::PathBuf;

use crate::VERSION;

pub fn run(settings: &Settings) {
    let env_config_dir = std::env::var("BREWLOG_CONFIG_DIR");

    let config_dir = if let Ok(config_dir) = &env_config_dir {
        PathBuf::from(config_dir)
    } else {
        brewlog_common::utils::config_dir()
    };

    let mut config_file = config_dir.clone();
    config_file.push("config.toml");

    println!("PATHS:");
    println!("config_path: {config_file:?}");
    println!("db_path: {:?}", settings.db_path);
    println!("session_path: {:?}", settings.session_path);
    println!();

    println!("ACCOUNT:");
    println!("Device id: {}", Settings::device_id());
    match settings.session() {
        Some(session) => println!("User: {}", session.user_id),
        None => println!("User: Unauthenticated"),
    }
    println!("Server: {}", settings.server_address);

    println!();
    println!("Version: {VERSION}");
}
