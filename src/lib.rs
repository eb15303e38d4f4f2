//! # HTTP File Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 concurrente implementado desde cero: parsea los
//! requests a mano, despacha contra una tabla de rutas ordenada y
//! serializa las responses, opcionalmente comprimidas con gzip.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: Parsing de requests y serialización de responses HTTP/1.1
//! - `router`: Tabla de rutas con despacho first-match-wins
//! - `handlers`: Los cinco handlers (index, echo, user-agent, archivos)
//! - `server`: Loop de accept TCP y manejo de conexiones (thread por conexión)
//! - `config`: Configuración vía CLI y variables de entorno
//! - `logger`: Logging de acceso por request
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use http_file_server::config::Config;
//! use http_file_server::server::Server;
//!
//! let config = Config::default();
//! let mut server = Server::new(config);
//! server.run().expect("Error al iniciar servidor");
//! ```

pub mod config;
pub mod handlers;
pub mod http;
pub mod logger;
pub mod router;
pub mod server;
