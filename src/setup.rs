// SPDX-License-Identifier: MIT
// Copyright (c) 2025 Jesof

//! Interactive first-run setup wizard (`fritzbox-exporter setup`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use dialoguer::{Confirm, Input, Password};

use crate::config::duration::{format_duration, parse_duration};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::fritzbox::FritzBoxClient;

/// Shortest accepted device polling interval
const MIN_DEVICE_INTERVAL: Duration = Duration::from_secs(10);

/// Run the interactive setup wizard
///
/// # Errors
///
/// Returns error if user input fails, the user declines to overwrite an
/// existing file, or the config cannot be written.
pub async fn run_setup() -> Result<()> {
    println!("~~ FRITZ!Box Exporter Setup ~~");
    println!("This wizard creates a configuration file so the exporter can access");
    println!("your FRITZ!Box. Defaults are shown in brackets. Abort at any time");
    println!("with Ctrl+C without side effects.\n");

    let path: String = Input::new()
        .with_prompt("Where do you want to store your configuration file?")
        .default(Config::default_path().display().to_string())
        .interact_text()?;
    let config_path = expand_home(&path);

    let mut config = if config_path.exists() {
        println!("  ✘ There is already a file at {}", config_path.display());
        let existing = existing_config(&config_path);
        match existing.as_ref().map(Config::validate) {
            Ok(Ok(())) => println!("  ✔ The existing config file is valid"),
            Ok(Err(e)) => println!("  ✘ The existing config file has issues: {e}"),
            Err(e) => println!("  ✘ The file cannot be loaded as configuration: {e}"),
        }
        let overwrite = Confirm::new()
            .with_prompt("Do you want to overwrite this file?")
            .default(false)
            .interact()?;
        if !overwrite {
            return Err(AppError::Setup(format!(
                "refusing to overwrite {}",
                config_path.display()
            )));
        }
        existing.unwrap_or_default()
    } else {
        println!("  ✔ No file found at {}", config_path.display());
        Config::default()
    };

    config.listen_addr = Input::new()
        .with_prompt("At which address should the exporter serve metrics?")
        .default(config.listen_addr.clone())
        .validate_with(|addr: &String| check_listen_addr(addr))
        .interact_text()?;
    println!("  ✔ The listen address is valid and can be used");

    let interval: String = Input::new()
        .with_prompt("At which interval should smart home devices be polled?")
        .default(format_duration(config.device_monitoring_interval))
        .validate_with(|text: &String| check_device_interval(text).map(|_| ()))
        .interact_text()?;
    config.device_monitoring_interval =
        check_device_interval(&interval).map_err(AppError::Setup)?;
    println!("  ✔ The interval is valid and can be used");

    config.fritzbox.base_url = Input::new()
        .with_prompt("What is the URL of your FRITZ!Box?")
        .default(config.fritzbox.base_url.clone())
        .validate_with(|url: &String| check_base_url(url))
        .interact_text()?;

    let mut username = Input::<String>::new()
        .with_prompt("Which FRITZ!Box user should the exporter use?")
        .validate_with(|name: &String| {
            if name.trim().is_empty() {
                Err("The username cannot be empty and there is no sensible default")
            } else {
                Ok(())
            }
        });
    if !config.fritzbox.username.is_empty() {
        username = username.default(config.fritzbox.username.clone());
    }
    config.fritzbox.username = username.interact_text()?;

    config.fritzbox.password = Password::new()
        .with_prompt("What is the password for this user? It is stored in plaintext")
        .interact()?;

    println!("  Checking connection to FRITZ!Box by listing smart home devices...");
    let client = FritzBoxClient::new(&config.fritzbox)?;
    match client.devices().await {
        Ok(devices) => println!(
            "  ✔ Connection to FRITZ!Box API is working (found {} smart home devices)",
            devices.len()
        ),
        Err(e) => println!("  ✘ Failed to list devices: {e}"),
    }
    if let Err(e) = client.close().await {
        tracing::debug!("Logout after connection check failed: {}", e);
    }

    println!("  Running final checks on configuration...");
    if let Err(e) = config.validate() {
        println!("  ✘ Issue found: {e}");
    }

    write_config(&config_path, &config)?;

    println!("\nYour configuration file has been saved to {}", config_path.display());
    println!("The exporter reads it once at startup, restart it to apply changes.");
    println!("\nStart the exporter with:\n");
    println!("  fritzbox-exporter --config {}\n", config_path.display());
    println!("Please review the file permissions if you are on a multi-user system!");
    Ok(())
}

/// Reads an existing file as wizard defaults
///
/// Environment overrides are not applied and validation problems do not
/// discard the parsed values.
fn existing_config(path: &Path) -> Result<Config> {
    Config::from_yaml(&std::fs::read_to_string(path)?)
}

/// Expands a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), std::env::var_os("HOME")) {
        (Some(rest), Some(home)) => PathBuf::from(home).join(rest),
        _ => PathBuf::from(path),
    }
}

/// Accepts `HOST:PORT` addresses that can be bound right now
fn check_listen_addr(addr: &str) -> std::result::Result<(), String> {
    let listener = std::net::TcpListener::bind(addr.trim()).map_err(|e| {
        format!("Cannot open an HTTP server at {addr:?} ({e}). Use HOST:PORT, e.g. localhost:3000")
    })?;
    drop(listener);
    Ok(())
}

fn check_device_interval(text: &str) -> std::result::Result<Duration, String> {
    let interval = parse_duration(text).ok_or_else(|| {
        format!("Invalid interval {text:?}. Use a duration such as \"5m\" or \"30s\"")
    })?;
    if interval < MIN_DEVICE_INTERVAL {
        return Err(format!(
            "The interval {text:?} is too short, choose at least {}",
            format_duration(MIN_DEVICE_INTERVAL)
        ));
    }
    Ok(interval)
}

/// Accepts plain `http` URLs only
fn check_base_url(text: &str) -> std::result::Result<(), String> {
    let url = url::Url::parse(text.trim()).map_err(|e| format!("This is not a valid URL: {e}"))?;
    match url.scheme() {
        "http" => Ok(()),
        "https" => Err("Connecting via HTTPS to the FRITZ!Box is not supported, use http".into()),
        scheme => Err(format!("Unsupported URL scheme {scheme:?}, use http")),
    }
}

fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = config.to_yaml()?;
    std::fs::write(path, yaml).map_err(|e| {
        AppError::Setup(format!("failed to write {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_device_interval() {
        assert_eq!(check_device_interval("5m"), Ok(Duration::from_secs(300)));
        assert_eq!(check_device_interval("10s"), Ok(Duration::from_secs(10)));
        assert!(check_device_interval("9s").unwrap_err().contains("too short"));
        assert!(check_device_interval("soon").unwrap_err().contains("Invalid interval"));
    }

    #[test]
    fn test_check_base_url() {
        assert!(check_base_url("http://fritz.box").is_ok());
        assert!(check_base_url("http://192.168.178.1/").is_ok());
        assert!(check_base_url("https://fritz.box").unwrap_err().contains("HTTPS"));
        assert!(check_base_url("fritz box").is_err());
    }

    #[test]
    fn test_check_listen_addr() {
        assert!(check_listen_addr("127.0.0.1:0").is_ok());
        assert!(check_listen_addr("not an address").is_err());

        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = taken.local_addr().unwrap().to_string();
        assert!(check_listen_addr(&addr).is_err());
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/etc/fritz.yml"), PathBuf::from("/etc/fritz.yml"));
        assert_eq!(expand_home("fritz.yml"), PathBuf::from("fritz.yml"));
        if let Some(home) = std::env::var_os("HOME") {
            assert_eq!(
                expand_home("~/fritz.yml"),
                PathBuf::from(home).join("fritz.yml")
            );
        }
    }

    #[test]
    fn test_existing_config_keeps_values_that_fail_validation() {
        let path = std::env::temp_dir().join(format!(
            "fritzbox-exporter-existing-{}.yml",
            std::process::id()
        ));
        std::fs::write(
            &path,
            "listen_addr: 127.0.0.1:9100\nfritzbox:\n  base_url: http://192.168.178.1\n  username: monitor\n",
        )
        .unwrap();

        let config = existing_config(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(config.validate().is_err());
        assert_eq!(config.listen_addr, "127.0.0.1:9100");
        assert_eq!(config.fritzbox.base_url, "http://192.168.178.1");
        assert_eq!(config.fritzbox.username, "monitor");
        assert!(config.fritzbox.password.is_empty());
    }

    #[test]
    fn test_existing_config_rejects_unparsable_file() {
        let path = std::env::temp_dir().join(format!(
            "fritzbox-exporter-garbage-{}.yml",
            std::process::id()
        ));
        std::fs::write(&path, "listen_addr: [unclosed\n").unwrap();

        let result = existing_config(&path);
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(AppError::Config(_))));
        assert!(existing_config(&path).is_err());
    }

    #[test]
    fn test_write_config_roundtrip() {
        let path = std::env::temp_dir().join(format!(
            "fritzbox-exporter-setup-{}.yml",
            std::process::id()
        ));
        let mut config = Config::default();
        config.fritzbox.username = "monitor".to_string();
        config.fritzbox.password = "secret".to_string();

        write_config(&path, &config).unwrap();
        let loaded = Config::from_yaml(&std::fs::read_to_string(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded.fritzbox.username, "monitor");
        assert_eq!(loaded.device_monitoring_interval, config.device_monitoring_interval);
    }
}
