//! # Servidor TCP Concurrente
//! src/server/tcp.rs
//!
//! Implementación del servidor TCP que maneja múltiples conexiones
//! simultáneas usando threads. Cada conexión se procesa en su propio
//! thread; el loop de accept nunca bloquea esperando un request.
//!
//! Ciclo de vida de una conexión:
//!
//! ```text
//! accept → read → parse → dispatch → encode → write → close
//! ```
//!
//! La conexión se cierra exactamente una vez por socket aceptado, sin
//! keep-alive, incluso si el write falla a mitad de camino.

use crate::config::Config;
use crate::handlers;
use crate::http::{Method, Request, Response, StatusCode};
use crate::logger;
use crate::router::Router;
use crate::server::ServerContext;
use std::io::{self, Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::os::unix::io::FromRawFd;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, warn};

/// Tamaño del buffer de lectura por conexión
///
/// Se hace una única lectura bloqueante: un request más grande que el
/// buffer queda truncado (limitación conocida).
const READ_BUFFER_SIZE: usize = 8192;

/// Deadline de lectura/escritura por conexión, para que un cliente
/// lento o mudo no retenga su worker indefinidamente
const SOCKET_TIMEOUT: Duration = Duration::from_secs(10);

/// Servidor HTTP/1.1 concurrente
pub struct Server {
    context: Arc<ServerContext>,
    router: Arc<Router>,
    listener: Option<TcpListener>,
}

impl Server {
    /// Crea el servidor y registra la tabla de rutas
    ///
    /// El orden de registro es significativo (first-match-wins).
    pub fn new(config: Config) -> Self {
        let mut router = Router::new();

        router.register(Method::GET, "/", handlers::index_handler);
        router.register(Method::GET, "/echo/*", handlers::echo_handler);
        router.register(Method::GET, "/user-agent", handlers::user_agent_handler);
        router.register(Method::GET, "/files/*", handlers::read_file_handler);
        router.register(Method::POST, "/files/*", handlers::upload_file_handler);

        Self {
            context: Arc::new(ServerContext::from_config(&config)),
            router: Arc::new(router),
            listener: None,
        }
    }

    /// Hace bind del listener y retorna la dirección local
    ///
    /// Separado de `run()` para poder hacer bind en el puerto 0 (un
    /// puerto efímero) y conocer la dirección real antes de servir.
    pub fn bind(&mut self) -> io::Result<SocketAddr> {
        let address = format!("{}:{}", self.context.host, self.context.port);
        let listener = bind_reuse(&address)?;
        let local_addr = listener.local_addr()?;
        self.listener = Some(listener);
        Ok(local_addr)
    }

    /// Corre el loop de accept indefinidamente
    ///
    /// Cada conexión aceptada se mueve a su propio thread; un error en
    /// un worker nunca termina el loop. Solo termina si el listener
    /// falla de forma irrecuperable o el proceso recibe una señal.
    pub fn run(&mut self) -> io::Result<()> {
        if self.listener.is_none() {
            let addr = self.bind()?;
            info!("Servidor escuchando en {}", addr);
        }
        let listener = self.listener.as_ref().expect("listener ya inicializado");

        info!("Modo concurrente: un thread por conexión");

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let context = Arc::clone(&self.context);
                    let router = Arc::clone(&self.router);

                    thread::spawn(move || {
                        if let Err(e) = Self::handle_connection_static(stream, context, router) {
                            error!("Error en conexión: {}", e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error al aceptar conexión: {}", e);
                }
            }
        }

        Ok(())
    }

    /// Maneja una conexión completa: read → parse → dispatch → write
    ///
    /// Un fallo de parseo produce un 404 bien formado en vez de
    /// propagar; los errores de I/O se propagan y terminan solo este
    /// worker. El socket se cierra al salir (drop del stream).
    fn handle_connection_static(
        mut stream: TcpStream,
        context: Arc<ServerContext>,
        router: Arc<Router>,
    ) -> io::Result<()> {
        let start = Instant::now();

        stream.set_read_timeout(Some(SOCKET_TIMEOUT))?;
        stream.set_write_timeout(Some(SOCKET_TIMEOUT))?;

        let peer = stream
            .peer_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Una única lectura bloqueante del buffer completo
        let mut buffer = [0u8; READ_BUFFER_SIZE];
        let bytes_read = stream.read(&mut buffer)?;

        if bytes_read == 0 {
            // El peer cerró sin enviar nada
            return Ok(());
        }

        let (request, response) = match Request::parse(&buffer[..bytes_read]) {
            Ok(request) => {
                let response = router.dispatch(&context, &request);
                (Some(request), response)
            }
            Err(e) => {
                warn!("{} - Request inválido: {}", peer, e);
                (None, Response::new(StatusCode::NotFound))
            }
        };

        let response_bytes = response.encode()?;
        stream.write_all(&response_bytes)?;
        stream.flush()?;

        if let Some(request) = &request {
            logger::log_request(&peer, request, &response, start.elapsed());
        }

        Ok(())
    }
}

/// Crea un listener TCP con SO_REUSEADDR activado antes del bind
///
/// std no permite setear opciones de socket antes del bind, así que el
/// socket se arma con libc y recién después se envuelve en un
/// `TcpListener`. Con esto un restart no falla por una dirección que
/// quedó en TIME_WAIT. Solo IPv4.
fn bind_reuse(address: &str) -> io::Result<TcpListener> {
    let sockaddr = address
        .to_socket_addrs()?
        .find_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(v4),
            SocketAddr::V6(_) => None,
        })
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                format!("no IPv4 address for {}", address),
            )
        })?;

    unsafe {
        let fd = libc::socket(libc::AF_INET, libc::SOCK_STREAM | libc::SOCK_CLOEXEC, 0);
        if fd < 0 {
            return Err(io::Error::last_os_error());
        }

        let opt: libc::c_int = 1;
        if libc::setsockopt(
            fd,
            libc::SOL_SOCKET,
            libc::SO_REUSEADDR,
            &opt as *const _ as *const libc::c_void,
            std::mem::size_of::<libc::c_int>() as libc::socklen_t,
        ) != 0
        {
            let err = io::Error::last_os_error();
            libc::close(fd);
            return Err(err);
        }

        let mut sin: libc::sockaddr_in = std::mem::zeroed();
        sin.sin_family = libc::AF_INET as libc::sa_family_t;
        sin.sin_port = sockaddr.port().to_be();
        // Los octetos ya están en orden de red
        sin.sin_addr.s_addr = u32::from_ne_bytes(sockaddr.ip().octets());

        if libc::bind(
            fd,
            &sin as *const _ as *const libc::sockaddr,
            std::mem::size_of::<libc::sockaddr_in>() as libc::socklen_t,
        ) != 0
        {
            let err = io::Error::last_os_error();
            libc::close(fd);
            return Err(err);
        }

        if libc::listen(fd, 128) != 0 {
            let err = io::Error::last_os_error();
            libc::close(fd);
            return Err(err);
        }

        Ok(TcpListener::from_raw_fd(fd))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::fs;
    use std::sync::atomic::{AtomicU32, Ordering};

    static DIR_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn temp_dir() -> String {
        let dir = std::env::temp_dir().join(format!(
            "http_file_server_tcp_test_{}_{}",
            std::process::id(),
            DIR_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        fs::create_dir_all(&dir).unwrap();
        dir.to_string_lossy().into_owned()
    }

    fn test_setup(directory: &str) -> (Arc<ServerContext>, Arc<Router>) {
        let context = Arc::new(ServerContext {
            host: "127.0.0.1".to_string(),
            port: 0,
            directory: directory.to_string(),
        });

        let mut router = Router::new();
        router.register(Method::GET, "/", handlers::index_handler);
        router.register(Method::GET, "/echo/*", handlers::echo_handler);
        router.register(Method::GET, "/user-agent", handlers::user_agent_handler);
        router.register(Method::GET, "/files/*", handlers::read_file_handler);
        router.register(Method::POST, "/files/*", handlers::upload_file_handler);

        (context, router.into())
    }

    /// Atiende una conexión en un thread y retorna los bytes de la
    /// respuesta que recibió el cliente
    fn roundtrip(
        context: &Arc<ServerContext>,
        router: &Arc<Router>,
        raw_request: &[u8],
    ) -> Vec<u8> {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn({
            let context = Arc::clone(context);
            let router = Arc::clone(router);
            move || {
                let (stream, _) = listener.accept().unwrap();
                Server::handle_connection_static(stream, context, router).unwrap();
            }
        });

        let mut client = TcpStream::connect(addr).unwrap();
        client.write_all(raw_request).unwrap();
        client.shutdown(std::net::Shutdown::Write).unwrap();

        let mut response = Vec::new();
        client.read_to_end(&mut response).unwrap();

        server.join().unwrap();
        response
    }

    fn body_of(response: &[u8]) -> &[u8] {
        let pos = response
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("separador de headers");
        &response[pos + 4..]
    }

    #[test]
    fn test_root_returns_200_empty() {
        let (context, router) = test_setup(&temp_dir());
        let response = roundtrip(&context, &router, b"GET / HTTP/1.1\r\n\r\n");
        let text = String::from_utf8_lossy(&response);

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Length: 0\r\n"));
        assert!(body_of(&response).is_empty());
    }

    #[test]
    fn test_echo_gzip_roundtrip() {
        let (context, router) = test_setup(&temp_dir());
        let response = roundtrip(
            &context,
            &router,
            b"GET /echo/abc HTTP/1.1\r\nAccept-Encoding: gzip\r\n\r\n",
        );
        let text = String::from_utf8_lossy(&response);

        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Encoding: gzip\r\n"));

        let mut decoder = GzDecoder::new(body_of(&response));
        let mut decompressed = String::new();
        decoder.read_to_string(&mut decompressed).unwrap();
        assert_eq!(decompressed, "abc");
    }

    #[test]
    fn test_upload_then_read_file() {
        let dir = temp_dir();
        let (context, router) = test_setup(&dir);

        let upload = roundtrip(
            &context,
            &router,
            b"POST /files/nota.txt HTTP/1.1\r\nContent-Length: 2\r\n\r\nhi",
        );
        assert!(String::from_utf8_lossy(&upload).starts_with("HTTP/1.1 201 Created\r\n"));

        let read = roundtrip(&context, &router, b"GET /files/nota.txt HTTP/1.1\r\n\r\n");
        let text = String::from_utf8_lossy(&read);
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: application/octet-stream\r\n"));
        assert_eq!(body_of(&read), b"hi");
    }

    #[test]
    fn test_missing_file_404_empty() {
        let (context, router) = test_setup(&temp_dir());
        let response = roundtrip(
            &context,
            &router,
            b"GET /files/doesnotexist HTTP/1.1\r\n\r\n",
        );
        let text = String::from_utf8_lossy(&response);

        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Content-Length: 0\r\n"));
        assert!(body_of(&response).is_empty());
    }

    #[test]
    fn test_garbage_bytes_get_wellformed_404() {
        let (context, router) = test_setup(&temp_dir());
        let response = roundtrip(&context, &router, b"\x00\x01\x02\x03garbage");
        let text = String::from_utf8_lossy(&response);

        assert!(text.starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(text.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn test_peer_closed_immediately() {
        // Cubre la rama bytes_read == 0
        let (context, router) = test_setup(&temp_dir());

        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().unwrap();

        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            Server::handle_connection_static(stream, context, router).unwrap();
        });

        drop(TcpStream::connect(addr).unwrap());
        server.join().unwrap();
    }

    #[test]
    fn test_bind_reuse_ephemeral_port() {
        let listener = bind_reuse("127.0.0.1:0").expect("bind con SO_REUSEADDR");
        let addr = listener.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        // El listener acepta conexiones normalmente
        let client = TcpStream::connect(addr).unwrap();
        let (_, peer) = listener.accept().unwrap();
        assert_eq!(peer.ip(), client.local_addr().unwrap().ip());
    }

    #[test]
    fn test_bind_reuse_same_port_after_drop() {
        let listener = bind_reuse("127.0.0.1:0").expect("primer bind");
        let addr = listener.local_addr().unwrap();
        drop(listener);

        // Re-bind inmediato en el mismo puerto: no debe fallar
        let again = bind_reuse(&addr.to_string()).expect("re-bind");
        assert_eq!(again.local_addr().unwrap().port(), addr.port());
    }
}
