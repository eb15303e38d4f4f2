//! # HTTP File Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor: parsea la configuración, inicializa
//! el logger y corre el loop de accept hasta que el proceso muera.

use http_file_server::config::Config;
use http_file_server::logger;
use http_file_server::server::Server;

fn main() {
    let config = Config::new();

    if let Err(e) = config.validate() {
        eprintln!("Configuración inválida: {}", e);
        std::process::exit(1);
    }

    logger::init(config.log_level_filter());

    println!("Welcome to the HTTP server!");
    println!("Listening on {}...", config.address());
    println!("Serving files from {}", config.directory);
    println!("Press Ctrl+C to quit.\n");
    println!("HTTP Compression is enabled: gzip\n");
    println!("Available endpoints:");
    println!("GET /");
    println!("GET /echo/<message>");
    println!("GET /user-agent");
    println!("GET /files/<filename>");
    println!("POST /files/<filename>");
    println!();

    let mut server = Server::new(config);

    // Esto bloquea el thread principal indefinidamente
    if let Err(e) = server.run() {
        eprintln!("Error fatal: {}", e);
        std::process::exit(1);
    }
}
