//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración vía argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./http_file_server --port 4221 --directory /tmp/files
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=4221 HTTP_HOST=0.0.0.0 ./http_file_server
//! ```

use clap::Parser;
use log::LevelFilter;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "http_file_server")]
#[command(about = "Servidor HTTP/1.1 concurrente con rutas de echo y archivos")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "4221", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz servido por las rutas /files/*
    #[arg(long, default_value = "./data", env = "HTTP_DIRECTORY")]
    pub directory: String,

    /// Nivel de log (off, error, warn, info, debug, trace)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use http_file_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:4221");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Traduce el nivel de log configurado a un `LevelFilter`
    pub fn log_level_filter(&self) -> LevelFilter {
        match self.log_level.to_lowercase().as_str() {
            "off" => LevelFilter::Off,
            "error" => LevelFilter::Error,
            "warn" => LevelFilter::Warn,
            "debug" => LevelFilter::Debug,
            "trace" => LevelFilter::Trace,
            _ => LevelFilter::Info,
        }
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Host must not be empty".to_string());
        }
        if self.directory.is_empty() {
            return Err("Directory must not be empty".to_string());
        }

        let known_levels = ["off", "error", "warn", "info", "debug", "trace"];
        if !known_levels.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(format!("Unknown log level: {}", self.log_level));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 4221,
            host: "127.0.0.1".to_string(),
            directory: "./data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.port, 4221);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.directory, "./data");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_address() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 8080,
            ..Config::default()
        };

        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_log_level_filter() {
        let mut config = Config::default();
        assert_eq!(config.log_level_filter(), LevelFilter::Info);

        config.log_level = "debug".to_string();
        assert_eq!(config.log_level_filter(), LevelFilter::Debug);

        config.log_level = "WARN".to_string();
        assert_eq!(config.log_level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn test_validate_rejects_empty_directory() {
        let config = Config {
            directory: String::new(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_log_level() {
        let config = Config {
            log_level: "verbose".to_string(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }
}
