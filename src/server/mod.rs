//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto (con SO_REUSEADDR)
//! 2. Acepta conexiones entrantes
//! 3. Lanza un thread por conexión que parsea, despacha y responde
//! 4. Cierra cada conexión exactamente una vez (sin keep-alive)

pub mod context;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use context::ServerContext;
pub use tcp::Server;
