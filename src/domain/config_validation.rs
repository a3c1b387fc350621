//! Configuration validation and the resolved application settings.
//!
//! Validates every config field before the ledger or web server is built.

use crate::domain::error::HeliosError;
use crate::domain::portfolio::MAX_AMOUNT;
use crate::ports::config_port::ConfigPort;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_STARTING_CASH: f64 = 100_000.0;
pub const DEFAULT_LISTEN: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub starting_cash: f64,
    /// `None` uses the knowledge base embedded in the binary.
    pub graph_path: Option<PathBuf>,
    pub listen: SocketAddr,
    pub symbols: Vec<(String, String)>,
}

pub fn validate_app_config(config: &dyn ConfigPort) -> Result<(), HeliosError> {
    validate_starting_cash(config)?;
    validate_graph_path(config)?;
    validate_listen(config)?;
    validate_symbols(config)?;
    Ok(())
}

/// Validate, then resolve defaults into an [`AppConfig`].
pub fn build_app_config(config: &dyn ConfigPort) -> Result<AppConfig, HeliosError> {
    validate_app_config(config)?;
    Ok(AppConfig {
        starting_cash: config.get_double("ledger", "starting_cash", DEFAULT_STARTING_CASH),
        graph_path: config
            .get_string("knowledge", "graph_path")
            .map(|p| PathBuf::from(p.trim())),
        listen: parse_listen(config)?,
        symbols: config.get_section("symbols"),
    })
}

fn invalid(section: &str, key: &str, reason: &str) -> HeliosError {
    HeliosError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

fn validate_starting_cash(config: &dyn ConfigPort) -> Result<(), HeliosError> {
    let Some(raw) = config.get_string("ledger", "starting_cash") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 && value <= MAX_AMOUNT => Ok(()),
        Ok(_) => Err(invalid(
            "ledger",
            "starting_cash",
            "starting_cash must be positive and at most 1e15",
        )),
        Err(_) => Err(invalid("ledger", "starting_cash", "starting_cash must be a number")),
    }
}

fn validate_graph_path(config: &dyn ConfigPort) -> Result<(), HeliosError> {
    match config.get_string("knowledge", "graph_path") {
        Some(path) if path.trim().is_empty() => {
            Err(invalid("knowledge", "graph_path", "graph_path must not be empty"))
        }
        _ => Ok(()),
    }
}

fn validate_listen(config: &dyn ConfigPort) -> Result<(), HeliosError> {
    parse_listen(config).map(|_| ())
}

fn parse_listen(config: &dyn ConfigPort) -> Result<SocketAddr, HeliosError> {
    let raw = config
        .get_string("web", "listen")
        .unwrap_or_else(|| DEFAULT_LISTEN.to_string());
    raw.trim()
        .parse()
        .map_err(|_| invalid("web", "listen", "listen must be host:port"))
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), HeliosError> {
    for (entity, ticker) in config.get_section("symbols") {
        if ticker.trim().is_empty() {
            return Err(invalid("symbols", &entity, "ticker must not be empty"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn adapter(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    fn invalid_key(err: HeliosError) -> String {
        match err {
            HeliosError::ConfigInvalid { key, .. } => key,
            other => panic!("expected ConfigInvalid, got {other:?}"),
        }
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config = build_app_config(&FileConfigAdapter::empty()).unwrap();
        assert!((config.starting_cash - DEFAULT_STARTING_CASH).abs() < f64::EPSILON);
        assert_eq!(config.graph_path, None);
        assert_eq!(config.listen, DEFAULT_LISTEN.parse::<SocketAddr>().unwrap());
        assert!(config.symbols.is_empty());
    }

    #[test]
    fn full_config_resolves_every_field() {
        let config = build_app_config(&adapter(concat!(
            "[ledger]\nstarting_cash = 5000\n",
            "[knowledge]\ngraph_path = kb.json\n",
            "[web]\nlisten = 0.0.0.0:9000\n",
            "[symbols]\nBanks = LLOY.L\n",
        )))
        .unwrap();
        assert!((config.starting_cash - 5000.0).abs() < f64::EPSILON);
        assert_eq!(config.graph_path, Some(PathBuf::from("kb.json")));
        assert_eq!(config.listen.port(), 9000);
        assert_eq!(config.symbols, vec![("banks".to_string(), "LLOY.L".to_string())]);
    }

    #[test]
    fn rejects_non_positive_starting_cash() {
        for value in ["0", "-10", "abc", "inf", "1e308"] {
            let err = validate_app_config(&adapter(&format!("[ledger]\nstarting_cash = {value}\n")))
                .unwrap_err();
            assert_eq!(invalid_key(err), "starting_cash");
        }
    }

    #[test]
    fn rejects_bad_listen_address() {
        let err = validate_app_config(&adapter("[web]\nlisten = localhost\n")).unwrap_err();
        assert_eq!(invalid_key(err), "listen");
    }

    struct BlankTicker;

    impl ConfigPort for BlankTicker {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
            default
        }
        fn get_section(&self, section: &str) -> Vec<(String, String)> {
            match section {
                "symbols" => vec![("banks".to_string(), "  ".to_string())],
                _ => Vec::new(),
            }
        }
    }

    #[test]
    fn rejects_blank_ticker() {
        let err = validate_app_config(&BlankTicker).unwrap_err();
        assert_eq!(invalid_key(err), "banks");
    }
}
