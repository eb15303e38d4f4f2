//! # Contexto del Servidor
//! src/server/context.rs
//!
//! Estado compartido de solo lectura entre todos los workers de
//! conexión. Se construye una vez a partir de la configuración y no se
//! muta después de que el servidor arranca.

use crate::config::Config;

/// Contexto compartido por todos los handlers
#[derive(Debug, Clone)]
pub struct ServerContext {
    /// Host en el que escucha el servidor
    pub host: String,

    /// Puerto en el que escucha el servidor
    pub port: u16,

    /// Directorio raíz servido por las rutas /files/*
    pub directory: String,
}

impl ServerContext {
    /// Construye el contexto desde la configuración
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            directory: config.directory.clone(),
        }
    }
}
