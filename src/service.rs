//! Worker-pool front for a shared [`Transliterator`].
//!
//! Requests go through one queue; each worker pulls the next request, runs
//! the (pure) translation and replies on the request's own channel. A caller
//! that stops waiting simply drops its ticket and the reply is discarded.

use std::sync::{mpsc, Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use singlish_core::Transliterator;
use tracing::{debug, debug_span};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("translation service is shut down")]
    ShutDown,
    #[error("translation timed out after {0:?}")]
    Timeout(Duration),
    #[error("worker exited before replying")]
    WorkerLost,
    #[error("failed to spawn worker: {0}")]
    Spawn(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Request / Ticket
// ---------------------------------------------------------------------------

struct Request {
    id: u64,
    text: String,
    reply: mpsc::Sender<String>,
}

/// Handle for one submitted request.
pub struct Ticket {
    id: u64,
    rx: mpsc::Receiver<String>,
}

impl Ticket {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Block until the translation is ready.
    pub fn wait(self) -> Result<String, ServiceError> {
        self.rx.recv().map_err(|_| ServiceError::WorkerLost)
    }

    /// Block for at most `timeout`. On timeout the result is discarded.
    pub fn wait_timeout(self, timeout: Duration) -> Result<String, ServiceError> {
        self.rx.recv_timeout(timeout).map_err(|e| match e {
            mpsc::RecvTimeoutError::Timeout => ServiceError::Timeout(timeout),
            mpsc::RecvTimeoutError::Disconnected => ServiceError::WorkerLost,
        })
    }
}

// ---------------------------------------------------------------------------
// TranslationService
// ---------------------------------------------------------------------------

pub struct TranslationService {
    engine: Arc<Transliterator>,
    tx: Option<mpsc::Sender<Request>>,
    workers: Vec<JoinHandle<()>>,
    next_id: u64,
    default_timeout: Option<Duration>,
}

impl TranslationService {
    /// Start `workers` threads (at least one) sharing `engine`.
    pub fn new(engine: Transliterator, workers: usize) -> Result<Self, ServiceError> {
        let engine = Arc::new(engine);
        let (tx, rx) = mpsc::channel::<Request>();
        let rx = Arc::new(Mutex::new(rx));

        let mut handles = Vec::with_capacity(workers.max(1));
        for i in 0..workers.max(1) {
            let engine = Arc::clone(&engine);
            let rx = Arc::clone(&rx);
            let handle = thread::Builder::new()
                .name(format!("singlish-worker-{i}"))
                .spawn(move || worker(i, engine, rx))?;
            handles.push(handle);
        }

        Ok(Self {
            engine,
            tx: Some(tx),
            workers: handles,
            next_id: 0,
            default_timeout: None,
        })
    }

    /// Size the pool and default timeout from the engine's `[service]`
    /// settings.
    pub fn from_settings(engine: Transliterator) -> Result<Self, ServiceError> {
        Self::with_workers(engine, None)
    }

    /// Like [`Self::from_settings`], with `workers` overriding the
    /// configured pool size. The configured timeout still applies.
    pub fn with_workers(
        engine: Transliterator,
        workers: Option<usize>,
    ) -> Result<Self, ServiceError> {
        let service = &engine.settings().service;
        let workers = workers.unwrap_or(service.workers);
        let timeout = match service.request_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        let mut this = Self::new(engine, workers)?;
        this.default_timeout = timeout;
        Ok(this)
    }

    pub fn engine(&self) -> &Transliterator {
        &self.engine
    }

    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout
    }

    pub fn submit(&mut self, text: impl Into<String>) -> Result<Ticket, ServiceError> {
        let tx = self.tx.as_ref().ok_or(ServiceError::ShutDown)?;
        let (reply, rx) = mpsc::channel();
        let id = self.next_id;
        self.next_id += 1;
        tx.send(Request {
            id,
            text: text.into(),
            reply,
        })
        .map_err(|_| ServiceError::ShutDown)?;
        Ok(Ticket { id, rx })
    }

    /// Translate and wait, honouring the configured default timeout.
    pub fn translate(&mut self, text: impl Into<String>) -> Result<String, ServiceError> {
        let ticket = self.submit(text)?;
        match self.default_timeout {
            Some(timeout) => ticket.wait_timeout(timeout),
            None => ticket.wait(),
        }
    }

    pub fn translate_timeout(
        &mut self,
        text: impl Into<String>,
        timeout: Duration,
    ) -> Result<String, ServiceError> {
        self.submit(text)?.wait_timeout(timeout)
    }

    /// Close the queue and join every worker. Requests already queued are
    /// still answered.
    pub fn shutdown(&mut self) {
        self.tx = None;
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }
}

impl Drop for TranslationService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker(index: usize, engine: Arc<Transliterator>, rx: Arc<Mutex<mpsc::Receiver<Request>>>) {
    loop {
        let request = {
            let Ok(queue) = rx.lock() else { return };
            match queue.recv() {
                Ok(request) => request,
                Err(_) => return,
            }
        };
        let _span = debug_span!("service_request", worker = index, id = request.id).entered();
        let output = engine.translate(&request.text);
        if request.reply.send(output).is_err() {
            debug!("caller stopped waiting; result discarded");
        }
    }
}
