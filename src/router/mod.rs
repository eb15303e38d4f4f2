//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Este módulo implementa el router que mapea (método, patrón de path)
//! a handlers específicos.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router → Handler → Response
//! ```
//!
//! Los patrones son strings exactos, o prefijos marcados con un `*`
//! final (ej: `/echo/*`). El despacho recorre las rutas en orden de
//! registro y gana la primera que matchea; si ninguna matchea se
//! retorna un 404 sintético sin invocar ningún handler.

use crate::http::{Method, Request, Response, StatusCode};
use crate::server::ServerContext;

/// Tipo de función handler
///
/// Un handler recibe el contexto del servidor (solo lectura) y el
/// Request, y retorna una Response.
pub type Handler = fn(&ServerContext, &Request) -> Response;

/// Una ruta registrada: método + patrón + handler
///
/// Configuración estática: se crea al inicio del servidor y no se
/// muta ni se remueve en runtime.
pub struct Route {
    method: Method,
    pattern: String,
    handler: Handler,
}

impl Route {
    /// Verifica si la ruta matchea el request
    ///
    /// El método debe coincidir y el path debe matchear: igualdad
    /// exacta si el patrón no tiene wildcard, o comparación de prefijo
    /// (con el `*` final removido) si lo tiene.
    pub fn matches(&self, request: &Request) -> bool {
        let match_path = match self.pattern.strip_suffix('*') {
            Some(prefix) => request.path().starts_with(prefix),
            None => self.pattern == request.path(),
        };
        self.method == request.method() && match_path
    }
}

/// Router con lista ordenada de rutas
pub struct Router {
    /// Las rutas, en orden de registro. El orden es significativo:
    /// el despacho es first-match-wins.
    routes: Vec<Route>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registra una ruta con su handler
    ///
    /// # Ejemplo
    /// ```
    /// use http_file_server::router::Router;
    /// use http_file_server::http::{Method, Request, Response, StatusCode};
    /// use http_file_server::server::ServerContext;
    ///
    /// fn hola_handler(_ctx: &ServerContext, _req: &Request) -> Response {
    ///     Response::new(StatusCode::Ok).with_body("hola")
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/hola", hola_handler);
    /// ```
    pub fn register(&mut self, method: Method, pattern: &str, handler: Handler) {
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            handler,
        });
    }

    /// Despacha un request al handler de la primera ruta que matchea
    ///
    /// Si ninguna ruta matchea, retorna un 404 sintético con body
    /// vacío.
    pub fn dispatch(&self, context: &ServerContext, request: &Request) -> Response {
        for route in &self.routes {
            if route.matches(request) {
                return (route.handler)(context, request);
            }
        }

        Response::new(StatusCode::NotFound)
    }

    /// Cantidad de rutas registradas
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Verifica si no hay rutas registradas
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
