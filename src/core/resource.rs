//! Loading/failed/ready state for data a screen fetches when it opens.

use std::future::Future;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, PartialEq)]
pub enum Resource<T> {
    Loading,
    Failed(String),
    Ready(T),
}

impl<T> Default for Resource<T> {
    fn default() -> Self {
        Resource::Loading
    }
}

impl<T> Resource<T> {
    pub fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(value) => Resource::Ready(value),
            Err(err) => Resource::Failed(err.to_string()),
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Resource::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Resource::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Resource::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Resource::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Handed to a spawned load; results must quote `generation` back.
#[derive(Debug, Clone)]
pub struct LoadTicket {
    pub generation: u64,
    pub token: CancellationToken,
}

/// Tracks the in-flight load of one screen. Starting a new load or leaving
/// the screen cancels the previous token and bumps the generation, so late
/// results from an abandoned load are rejected by [`Loader::finish`].
#[derive(Debug, Default)]
pub struct Loader {
    generation: u64,
    cancel: Option<CancellationToken>,
}

impl Loader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&mut self) -> LoadTicket {
        self.cancel();
        let token = CancellationToken::new();
        self.cancel = Some(token.clone());
        LoadTicket {
            generation: self.generation,
            token,
        }
    }

    pub fn cancel(&mut self) {
        if let Some(token) = self.cancel.take() {
            token.cancel();
        }
        self.generation += 1;
    }

    pub fn in_flight(&self) -> bool {
        self.cancel.is_some()
    }

    /// Whether a result tagged with `generation` is current. Accepting it
    /// ends the load.
    pub fn finish(&mut self, generation: u64) -> bool {
        if self.cancel.is_some() && generation == self.generation {
            self.cancel = None;
            true
        } else {
            false
        }
    }
}

/// Run `load` on the runtime and deliver its output through `tx`, unless the
/// ticket is cancelled first. The caller never waits on the task.
pub fn spawn_load<T, A, F, W>(ticket: LoadTicket, tx: mpsc::UnboundedSender<A>, load: F, wrap: W)
where
    T: Send + 'static,
    A: Send + 'static,
    F: Future<Output = T> + Send + 'static,
    W: FnOnce(u64, T) -> A + Send + 'static,
{
    tokio::spawn(async move {
        tokio::select! {
            _ = ticket.token.cancelled() => {}
            output = load => {
                let _ = tx.send(wrap(ticket.generation, output));
            }
        }
    });
}
