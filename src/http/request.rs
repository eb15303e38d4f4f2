//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Este módulo implementa un parser HTTP/1.1 desde cero.
//!
//! ## Formato de un Request HTTP/1.1
//!
//! ```text
//! GET /echo/hola HTTP/1.1\r\n
//! User-Agent: curl/7.68.0\r\n
//! Accept-Encoding: gzip\r\n
//! \r\n
//! ```
//!
//! ## Componentes
//!
//! 1. **Request Line**: `METHOD /path HTTP/1.1`
//! 2. **Headers**: Pares `Name: Value` (uno por línea)
//! 3. **Empty Line**: `\r\n` que separa headers del body
//! 4. **Body**: bytes crudos, tomados verbatim (binario-seguro)
//!
//! Los headers se guardan en un mapa con claves únicas normalizadas a
//! minúsculas, en vez de extraerlos por posición de línea.

use std::collections::HashMap;

/// Codificaciones de contenido que el servidor sabe aplicar
const SUPPORTED_ENCODINGS: &[&str] = &["gzip"];

/// Métodos HTTP soportados
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// POST - Enviar datos a un recurso
    POST,

    /// PUT - Reemplazar un recurso
    PUT,

    /// DELETE - Eliminar un recurso
    DELETE,

    /// OPTIONS - Consultar capacidades
    OPTIONS,

    /// HEAD - Como GET pero solo retorna headers
    HEAD,
}

impl Method {
    /// Parsea un método HTTP desde un string
    ///
    /// # Errores
    ///
    /// Retorna error si el método no pertenece al conjunto enumerado
    fn from_str(s: &str) -> Result<Self, ParseError> {
        match s {
            "GET" => Ok(Method::GET),
            "POST" => Ok(Method::POST),
            "PUT" => Ok(Method::PUT),
            "DELETE" => Ok(Method::DELETE),
            "OPTIONS" => Ok(Method::OPTIONS),
            "HEAD" => Ok(Method::HEAD),
            _ => Err(ParseError::UnknownMethod(s.to_string())),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::HEAD => "HEAD",
        }
    }
}

/// Errores que pueden ocurrir durante el parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Request line sin los tres tokens METHOD PATH VERSION
    MalformedRequest,

    /// Método HTTP fuera del conjunto enumerado
    UnknownMethod(String),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::MalformedRequest => write!(f, "Malformed request line"),
            ParseError::UnknownMethod(m) => write!(f, "Unknown HTTP method: {}", m),
        }
    }
}

impl std::error::Error for ParseError {}

/// Representa un request HTTP/1.1 parseado
///
/// Inmutable después de la construcción: se crea una vez por conexión
/// a partir de los bytes crudos y se descarta al cerrar la conexión.
#[derive(Debug, Clone)]
pub struct Request {
    /// Método HTTP (GET, POST, ...)
    method: Method,

    /// Path de la petición (ej: "/echo/hola")
    path: String,

    /// Versión HTTP (ej: "HTTP/1.1")
    version: String,

    /// Headers con claves únicas en minúsculas
    headers: HashMap<String, String>,

    /// Codificación negociada contra la lista soportada ("" = identidad)
    accept_encoding: String,

    /// Body del request, bytes verbatim
    body: Vec<u8>,
}

impl Request {
    /// Parsea un request HTTP desde bytes
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use http_file_server::http::Request;
    ///
    /// let raw = b"GET /echo/hola HTTP/1.1\r\n\r\n";
    /// let request = Request::parse(raw).unwrap();
    ///
    /// assert_eq!(request.path(), "/echo/hola");
    /// ```
    pub fn parse(buffer: &[u8]) -> Result<Self, ParseError> {
        // Separar headers del body en el primer \r\n\r\n.
        // El body se conserva como bytes crudos: solo la parte de
        // headers necesita ser UTF-8 válido.
        let (head, body) = match find_header_end(buffer) {
            Some(pos) => (&buffer[..pos], buffer[pos + 4..].to_vec()),
            None => (buffer, Vec::new()),
        };

        let head_str =
            std::str::from_utf8(head).map_err(|_| ParseError::MalformedRequest)?;

        let mut lines = head_str.split("\r\n");

        // 1. Request line (primera línea)
        let request_line = lines.next().unwrap_or("");
        let (method, path, version) = Self::parse_request_line(request_line)?;

        // 2. Headers (resto de líneas)
        let headers = Self::parse_headers(lines);

        // 3. Negociar la codificación contra la lista soportada
        let accept_encoding = negotiate_encoding(
            headers.get("accept-encoding").map(String::as_str).unwrap_or(""),
        );

        Ok(Request {
            method,
            path,
            version,
            headers,
            accept_encoding,
            body,
        })
    }

    /// Parsea la request line (primera línea del request)
    ///
    /// Formato: `GET /path HTTP/1.1`
    fn parse_request_line(line: &str) -> Result<(Method, String, String), ParseError> {
        let parts: Vec<&str> = line.split_whitespace().collect();

        // Debe tener exactamente 3 partes: METHOD PATH VERSION
        if parts.len() != 3 {
            return Err(ParseError::MalformedRequest);
        }

        let method = Method::from_str(parts[0])?;
        let path = parts[1].to_string();
        let version = parts[2].to_string();

        Ok((method, path, version))
    }

    /// Parsea los headers HTTP en un mapa de claves únicas
    ///
    /// Cada header tiene formato `Name: Value`; el split ocurre en el
    /// primer ':'. Los nombres se normalizan a minúsculas. Las líneas
    /// sin ':' se ignoran.
    fn parse_headers<'a>(lines: impl Iterator<Item = &'a str>) -> HashMap<String, String> {
        let mut headers = HashMap::new();

        for line in lines {
            if line.trim().is_empty() {
                break;
            }

            if let Some(colon_pos) = line.find(':') {
                let name = line[..colon_pos].trim().to_lowercase();
                let value = line[colon_pos + 1..].trim().to_string();
                headers.insert(name, value);
            }
        }

        headers
    }

    // === Métodos públicos para acceder a los campos ===

    /// Obtiene el método HTTP del request
    pub fn method(&self) -> Method {
        self.method
    }

    /// Obtiene el path del request
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Obtiene la versión HTTP
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Obtiene un header por nombre (insensible a mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    /// Obtiene el User-Agent ("" si no vino)
    pub fn user_agent(&self) -> &str {
        self.header("User-Agent").unwrap_or("")
    }

    /// Obtiene el header Accept ("" si no vino)
    pub fn accept(&self) -> &str {
        self.header("Accept").unwrap_or("")
    }

    /// Obtiene la codificación ya negociada ("" = sin compresión)
    pub fn accept_encoding(&self) -> &str {
        &self.accept_encoding
    }

    /// Obtiene el body del request
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Busca el separador `\r\n\r\n` entre headers y body
fn find_header_end(buffer: &[u8]) -> Option<usize> {
    buffer.windows(4).position(|w| w == b"\r\n\r\n")
}

/// Negocia la codificación de contenido contra la lista soportada
///
/// El cliente puede ofrecer una lista separada por comas; gana el
/// primer token presente en el conjunto soportado ({"gzip"}). Si
/// ninguno está soportado, se resuelve a "" (sin compresión). No se
/// manejan q-values.
fn negotiate_encoding(offered: &str) -> String {
    for token in offered.split(',') {
        let token = token.trim();
        if SUPPORTED_ENCODINGS.contains(&token) {
            return token.to_string();
        }
    }
    String::new()
}
