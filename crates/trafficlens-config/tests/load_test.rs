#![allow(clippy::unwrap_used)]
// Layered loading: defaults → TOML file → environment.
//
// Every test runs inside a figment `Jail` so environment overrides set by
// one test never leak into another.

use std::path::Path;

use figment::Jail;
use pretty_assertions::assert_eq;

use trafficlens_config::{Config, ConfigError, load_config};

#[test]
fn test_missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let config = load_config(Path::new("absent.toml"), None).unwrap();
        assert_eq!(config, Config::default());
        Ok(())
    });
}

#[test]
fn test_file_overrides_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
url = "https://ids.example.com"

[server.reconnect]
enabled = true
max_retries = 3

[display]
traffic_capacity = 25
alert_duration_secs = 5
"#,
        )?;

        let config = load_config(Path::new("config.toml"), None).unwrap();
        assert_eq!(config.server.url, "https://ids.example.com");
        assert!(config.server.reconnect.enabled);
        assert_eq!(config.server.reconnect.max_retries, Some(3));
        assert_eq!(config.server.reconnect.initial_delay_ms, 1_000);
        assert_eq!(config.display.traffic_capacity, 25);
        assert_eq!(config.display.chart_points, 20);

        let channel = config.to_channel_config().unwrap();
        assert_eq!(channel.endpoint.scheme(), "wss");
        Ok(())
    });
}

#[test]
fn test_invalid_file_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[display]\nchart_points = 0\n")?;

        let err = load_config(Path::new("config.toml"), None).unwrap_err();
        assert!(
            matches!(&err, ConfigError::Validation { field, .. } if field == "display.chart_points")
        );
        assert_eq!(
            err.to_string(),
            "invalid display.chart_points: must be at least 1"
        );
        Ok(())
    });
}

#[test]
fn test_malformed_toml_is_a_figment_error() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[server\nurl = 1\n")?;
        assert!(matches!(
            load_config(Path::new("config.toml"), None),
            Err(ConfigError::Figment(_))
        ));
        Ok(())
    });
}

#[test]
fn test_environment_wins_over_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[server]
url = "http://10.0.0.1:5000"
"#,
        )?;
        jail.set_env("TRAFFICLENS_SERVER__URL", "http://10.0.0.2:5000");
        jail.set_env("TRAFFICLENS_DISPLAY__TRAFFIC_CAPACITY", "75");

        let config = load_config(Path::new("config.toml"), None).unwrap();
        assert_eq!(config.server.url, "http://10.0.0.2:5000");
        assert_eq!(config.display.traffic_capacity, 75);
        Ok(())
    });
}

#[test]
fn test_printed_config_loads_back() {
    Jail::expect_with(|jail| {
        let mut config = Config::default();
        config.server.url = "http://sensor:5000".into();
        config.display.frame_rate_ms = 50;

        jail.create_file("printed.toml", &config.to_toml().unwrap())?;
        assert_eq!(load_config(Path::new("printed.toml"), None).unwrap(), config);
        Ok(())
    });
}

#[test]
fn test_url_override_replaces_invalid_file_url() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[server]\nurl = \"ftp://nowhere\"\n")?;
        jail.set_env("TRAFFICLENS_SERVER__URL", "ftp://still-wrong");

        assert!(load_config(Path::new("config.toml"), None).is_err());

        let config =
            load_config(Path::new("config.toml"), Some("http://sensor.local:5000")).unwrap();
        assert_eq!(config.server.url, "http://sensor.local:5000");
        Ok(())
    });
}

#[test]
fn test_invalid_url_override_is_rejected() {
    Jail::expect_with(|_jail| {
        let err = load_config(Path::new("absent.toml"), Some("gopher://sensor")).unwrap_err();
        assert!(matches!(&err, ConfigError::Validation { field, .. } if field == "server.url"));
        Ok(())
    });
}
