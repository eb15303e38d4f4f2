//! # Handlers de Rutas
//! src/handlers.rs
//!
//! Los cinco handlers del servidor. Cada uno es una función pura de
//! (contexto, request) a Response; ninguno muta el contexto.
//!
//! | Ruta                 | Comportamiento                          |
//! |----------------------|-----------------------------------------|
//! | GET  /               | 200 con body vacío                      |
//! | GET  /echo/*         | devuelve el sufijo del path             |
//! | GET  /user-agent     | devuelve el header User-Agent           |
//! | GET  /files/*        | sirve un archivo del directorio raíz    |
//! | POST /files/*        | escribe el body en un archivo           |

use crate::http::{Request, Response, StatusCode};
use crate::server::ServerContext;
use std::fs;
use std::path::Path;

/// Handler para GET /
///
/// Mensaje de bienvenida: 200 con body vacío.
pub fn index_handler(_ctx: &ServerContext, _req: &Request) -> Response {
    Response::new(StatusCode::Ok)
}

/// Handler para GET /echo/*
///
/// El body es el sufijo del path después de `/echo/`, tal cual llegó
/// (sin URL-decode). Si el request negoció una codificación, se
/// establece para que `encode()` comprima el body.
pub fn echo_handler(_ctx: &ServerContext, req: &Request) -> Response {
    let message = req.path().strip_prefix("/echo/").unwrap_or("");

    Response::new(StatusCode::Ok)
        .with_body(message)
        .with_content_encoding(req.accept_encoding())
}

/// Handler para GET /user-agent
///
/// Devuelve el User-Agent del request, verbatim.
pub fn user_agent_handler(_ctx: &ServerContext, req: &Request) -> Response {
    Response::new(StatusCode::Ok).with_body(req.user_agent())
}

/// Handler para GET /files/*
///
/// Resuelve el sufijo después de `/files/` bajo el directorio raíz y
/// devuelve su contenido completo como `application/octet-stream`.
/// Archivo inexistente (o ilegible, o path con `..`): 404 sin body.
pub fn read_file_handler(ctx: &ServerContext, req: &Request) -> Response {
    let file_path = match resolve_file_path(ctx, req.path()) {
        Some(p) => p,
        None => return Response::new(StatusCode::NotFound),
    };

    match fs::read(&file_path) {
        Ok(contents) => Response::new(StatusCode::Ok)
            .with_content_type("application/octet-stream")
            .with_body_bytes(contents),
        Err(_) => Response::new(StatusCode::NotFound),
    }
}

/// Handler para POST /files/*
///
/// Escribe el body del request en el archivo resuelto bajo el
/// directorio raíz, sobreescribiendo si existe. Responde 201 sin
/// body; un fallo de escritura responde 500.
pub fn upload_file_handler(ctx: &ServerContext, req: &Request) -> Response {
    let file_path = match resolve_file_path(ctx, req.path()) {
        Some(p) => p,
        None => return Response::new(StatusCode::NotFound),
    };

    // Crear el directorio raíz si no existe
    if fs::create_dir_all(&ctx.directory).is_err() {
        return Response::new(StatusCode::InternalServerError);
    }

    match fs::write(&file_path, req.body()) {
        Ok(()) => Response::new(StatusCode::Created),
        Err(_) => Response::new(StatusCode::InternalServerError),
    }
}

/// Resuelve el sufijo de un path `/files/*` bajo el directorio raíz
///
/// Rechaza sufijos vacíos o con componentes `..` (traversal fuera del
/// directorio servido).
fn resolve_file_path(ctx: &ServerContext, request_path: &str) -> Option<String> {
    let suffix = request_path.strip_prefix("/files/")?;

    if suffix.is_empty() {
        return None;
    }

    // Validación de traversal
    if Path::new(suffix).components().any(|c| c.as_os_str() == "..") {
        return None;
    }

    Some(format!("{}/{}", ctx.directory, suffix))
}
