//! # Logging
//! src/logger.rs
//!
//! Inicialización del logger de terminal y log de acceso por request.

use crate::http::{Request, Response};
use std::time::Duration;

use log::{info, LevelFilter};
use simplelog::{ColorChoice, TermLogger, TerminalMode};

/// Inicializa el logger de terminal
///
/// Idempotente: si ya hay un logger global instalado (por ejemplo en
/// tests que inicializan más de una vez) la segunda llamada se ignora.
pub fn init(level: LevelFilter) {
    let _ = TermLogger::init(
        level,
        prepare_logger_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}

fn prepare_logger_config() -> simplelog::Config {
    simplelog::ConfigBuilder::new()
        .set_time_format_custom(simplelog::format_description!(
            "[day]/[month]/[year] [hour]:[minute]:[second]"
        ))
        .build()
}

/// Escribe la línea de acceso de un request atendido
///
/// Formato: `status método path peer - user-agent (latencia)`
pub fn log_request(peer: &str, request: &Request, response: &Response, latency: Duration) {
    info!(
        "{} {} {} {} - {} ({:.2}ms)",
        response.status().as_u16(),
        request.method().as_str(),
        request.path(),
        peer,
        request.user_agent(),
        latency.as_secs_f64() * 1000.0
    );
}
