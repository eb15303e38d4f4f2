//! # Construcción de Respuestas HTTP
//!
//! Este módulo proporciona una API estilo builder para construir
//! respuestas HTTP/1.1 y serializarlas a los bytes exactos del wire.
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Encoding: gzip\r\n        (solo si hay compresión)
//! Content-Type: text/plain\r\n
//! Content-Length: 5\r\n
//! \r\n
//! hola!
//! ```
//!
//! La compresión es perezosa: se aplica recién en `encode()`, y
//! `Content-Length` se calcula sobre los bytes ya comprimidos.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use http_file_server::http::{Response, StatusCode};
//!
//! let response = Response::new(StatusCode::Ok).with_body("hola");
//! let bytes = response.encode().unwrap();
//! // Ahora puedes enviar `bytes` por el socket
//! ```

use super::StatusCode;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;

/// Representa una respuesta HTTP completa
#[derive(Debug, Clone)]
pub struct Response {
    /// Versión HTTP de la status line
    version: String,

    /// Código de estado HTTP (200, 201, 404, ...)
    status: StatusCode,

    /// Valor del header Content-Type
    content_type: String,

    /// Codificación del body (None = identidad, sin header)
    content_encoding: Option<String>,

    /// Cuerpo de la respuesta (None = sin body, Content-Length: 0)
    body: Option<Vec<u8>>,
}

impl Response {
    /// Crea una nueva respuesta con el código de estado especificado
    ///
    /// Por defecto: versión HTTP/1.1, Content-Type text/plain, sin
    /// body y sin codificación.
    ///
    /// # Ejemplo
    /// ```
    /// use http_file_server::http::{Response, StatusCode};
    ///
    /// let response = Response::new(StatusCode::NotFound);
    /// ```
    pub fn new(status: StatusCode) -> Self {
        Self {
            version: "HTTP/1.1".to_string(),
            status,
            content_type: "text/plain".to_string(),
            content_encoding: None,
            body: None,
        }
    }

    /// Establece el cuerpo de la respuesta desde un string
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = Some(body.as_bytes().to_vec());
        self
    }

    /// Establece el cuerpo de la respuesta desde bytes
    ///
    /// Útil para respuestas binarias (contenido de archivos).
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.body = Some(body);
        self
    }

    /// Establece el Content-Type de la respuesta
    pub fn with_content_type(mut self, content_type: &str) -> Self {
        self.content_type = content_type.to_string();
        self
    }

    /// Establece la codificación del body (ej: "gzip")
    ///
    /// Una codificación vacía equivale a no establecer ninguna.
    pub fn with_content_encoding(mut self, encoding: &str) -> Self {
        if !encoding.is_empty() {
            self.content_encoding = Some(encoding.to_string());
        }
        self
    }

    /// Serializa la respuesta a los bytes exactos a enviar
    ///
    /// Orden de emisión: status line, Content-Encoding (si aplica),
    /// Content-Type, Content-Length, línea vacía, body. Si hay
    /// codificación gzip se comprime el body en este momento y
    /// `Content-Length` refleja el tamaño comprimido.
    ///
    /// # Errores
    ///
    /// Un fallo del compresor aborta el request completo.
    pub fn encode(&self) -> std::io::Result<Vec<u8>> {
        // Aplicar la compresión ahora, no antes
        let body = match (&self.content_encoding, &self.body) {
            (Some(encoding), Some(bytes)) if encoding == "gzip" => {
                Some(gzip_compress(bytes)?)
            }
            (_, Some(bytes)) => Some(bytes.clone()),
            (_, None) => None,
        };

        let content_length = body.as_ref().map(|b| b.len()).unwrap_or(0);

        let mut result = Vec::new();

        // 1. Status line: HTTP/1.1 200 OK\r\n
        let status_line = format!("{} {}\r\n", self.version, self.status);
        result.extend_from_slice(status_line.as_bytes());

        // 2. Headers, en orden fijo
        if let Some(encoding) = &self.content_encoding {
            let header = format!("Content-Encoding: {}\r\n", encoding);
            result.extend_from_slice(header.as_bytes());
        }
        let header = format!("Content-Type: {}\r\n", self.content_type);
        result.extend_from_slice(header.as_bytes());
        let header = format!("Content-Length: {}\r\n", content_length);
        result.extend_from_slice(header.as_bytes());

        // 3. Línea vacía que separa headers del body
        result.extend_from_slice(b"\r\n");

        // 4. Body (binario, verbatim)
        if let Some(bytes) = body {
            result.extend_from_slice(&bytes);
        }

        Ok(result)
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Obtiene el Content-Type de la respuesta
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Obtiene la codificación del body, si hay
    pub fn content_encoding(&self) -> Option<&str> {
        self.content_encoding.as_deref()
    }

    /// Obtiene el body sin codificar, si hay
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

/// Comprime bytes en memoria con gzip
fn gzip_compress(input: &[u8]) -> std::io::Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(input)?;
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    #[test]
    fn test_new_response_defaults() {
        let response = Response::new(StatusCode::Ok);

        assert_eq!(response.status(), StatusCode::Ok);
        assert_eq!(response.content_type(), "text/plain");
        assert!(response.content_encoding().is_none());
        assert!(response.body().is_none());
    }

    #[test]
    fn test_encode_empty_body() {
        let response = Response::new(StatusCode::Ok);
        let bytes = response.encode().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert_eq!(
            text,
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[test]
    fn test_encode_with_body() {
        let response = Response::new(StatusCode::Ok).with_body("hola!");
        let bytes = response.encode().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Content-Length: 5\r\n"));
        assert!(text.ends_with("\r\n\r\nhola!"));
    }

    #[test]
    fn test_encode_not_found() {
        let response = Response::new(StatusCode::NotFound);
        let bytes = response.encode().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn test_encode_octet_stream() {
        let data = vec![0x00, 0x01, 0x02, 0xFF];
        let response = Response::new(StatusCode::Ok)
            .with_content_type("application/octet-stream")
            .with_body_bytes(data.clone());

        let bytes = response.encode().unwrap();

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Content-Type: application/octet-stream\r\n"));
        assert!(text.contains("Content-Length: 4\r\n"));
        assert!(bytes.ends_with(&data));
    }

    #[test]
    fn test_encode_gzip_body_roundtrip() {
        let response = Response::new(StatusCode::Ok)
            .with_body("abc")
            .with_content_encoding("gzip");

        let bytes = response.encode().unwrap();
        let text = String::from_utf8_lossy(&bytes);

        assert!(text.contains("Content-Encoding: gzip\r\n"));

        // El body comprimido debe descomprimir al original
        let body_start = bytes.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
        let mut decoder = GzDecoder::new(&bytes[body_start..]);
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).unwrap();

        assert_eq!(decompressed, "abc");
    }

    #[test]
    fn test_gzip_content_length_is_compressed_length() {
        let response = Response::new(StatusCode::Ok)
            .with_body("hola hola hola")
            .with_content_encoding("gzip");

        let bytes = response.encode().unwrap();
        let text = String::from_utf8_lossy(&bytes);

        let body_start = bytes.windows(4).position(|w| w == b"\r\n\r\n").unwrap() + 4;
        let compressed_len = bytes.len() - body_start;

        let expected = format!("Content-Length: {}\r\n", compressed_len);
        assert!(text.contains(&expected));
        // Y no el largo original
        assert_ne!(compressed_len, "hola hola hola".len());
    }

    #[test]
    fn test_empty_encoding_is_identity() {
        let response = Response::new(StatusCode::Ok)
            .with_body("tal cual")
            .with_content_encoding("");

        let bytes = response.encode().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        assert!(!text.contains("Content-Encoding"));
        assert!(text.ends_with("tal cual"));
    }
}
