//! HTTP gateway
//!
//! A `tiny_http` server shared by a fixed pool of worker threads. Each
//! worker blocks in `recv`, routes the request through `led::route` and
//! writes the reply. `shutdown` wakes every worker and joins them.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use tiny_http::{Header, Response, Server};

use crate::dispatcher::Dispatcher;
use crate::domain::{LedError, LedResult};

use super::led;

pub struct Gateway {
    server: Arc<Server>,
    stopping: Arc<AtomicBool>,
    workers: Vec<JoinHandle<()>>,
}

impl Gateway {
    /// Bind `address` and start `workers` request threads.
    pub fn start(address: &str, workers: usize, dispatcher: Dispatcher) -> LedResult<Self> {
        let server = Server::http(address)
            .map_err(|e| LedError::Gateway(format!("Failed to bind {address}: {e}")))?;
        let server = Arc::new(server);
        let stopping = Arc::new(AtomicBool::new(false));
        let content_type = Header::from_bytes(&b"Content-Type"[..], &b"text/plain; charset=utf-8"[..])
            .map_err(|()| LedError::Gateway("Invalid Content-Type header".to_string()))?;

        let mut gateway = Self {
            server,
            stopping,
            workers: Vec::with_capacity(workers),
        };
        for n in 0..workers {
            let server = Arc::clone(&gateway.server);
            let stopping = Arc::clone(&gateway.stopping);
            let dispatcher = dispatcher.clone();
            let content_type = content_type.clone();
            let spawned = std::thread::Builder::new()
                .name(format!("http-worker-{n}"))
                .spawn(move || worker_loop(&server, &stopping, &dispatcher, &content_type));
            match spawned {
                Ok(handle) => gateway.workers.push(handle),
                Err(e) => {
                    // Workers already running would otherwise block in `recv` forever.
                    gateway.shutdown();
                    return Err(LedError::Gateway(format!("Failed to spawn worker: {e}")));
                }
            }
        }

        log::info!("HTTP gateway listening on {address} with {workers} workers");
        Ok(gateway)
    }

    /// The bound socket address (useful when binding port 0)
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Stop accepting requests and wait for every worker to exit.
    pub fn shutdown(self) {
        self.stopping.store(true, Ordering::SeqCst);
        for _ in &self.workers {
            self.server.unblock();
        }
        for handle in self.workers {
            if handle.join().is_err() {
                log::error!("HTTP worker panicked during shutdown");
            }
        }
        log::info!("HTTP gateway stopped");
    }
}

fn worker_loop(server: &Server, stopping: &AtomicBool, dispatcher: &Dispatcher, content_type: &Header) {
    loop {
        let request = match server.recv() {
            Ok(rq) => rq,
            Err(_) if stopping.load(Ordering::SeqCst) => break,
            Err(e) => {
                log::warn!("HTTP accept error: {e}");
                continue;
            }
        };

        let reply = led::route(dispatcher, request.method(), request.url());
        log::debug!("{} {} → {}", request.method(), request.url(), reply.status);

        let response = Response::from_string(reply.body)
            .with_status_code(reply.status)
            .with_header(content_type.clone());
        if let Err(e) = request.respond(response) {
            log::warn!("Failed to write HTTP response: {e}");
        }
    }
}
