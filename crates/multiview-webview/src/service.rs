//! Serialized front end for the manager.
//!
//! `WebviewService::run` is the one place manager state is mutated. Callers
//! hold a cloneable `WebviewClient` and submit commands over a channel; each
//! command runs to completion before the next one starts, and its outcome is
//! sent back on a oneshot. Surface callbacks are queued on a second channel
//! and take priority over pending commands.

use std::sync::Arc;

use multiview_common::{new_correlation_id, Color, Rect, WebviewError};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, Instrument};

use crate::events::EventSink;
use crate::manager::{
    notification_channel, CreateOptions, MultiWebviewManager, NotificationReceiver, PendingScript,
    WebviewInfo,
};
use crate::surface::SurfaceFactory;

type Reply<T> = oneshot::Sender<Result<T, WebviewError>>;

/// One command waiting for the serialized context.
pub(crate) enum Command {
    Create {
        id: String,
        options: CreateOptions,
        reply: Reply<()>,
    },
    Focus {
        id: String,
        reply: Reply<()>,
    },
    GetFocused {
        reply: Reply<Option<String>>,
    },
    Hide {
        id: String,
        reply: Reply<()>,
    },
    Show {
        id: String,
        reply: Reply<()>,
    },
    Destroy {
        id: String,
        reply: Reply<()>,
    },
    Navigate {
        id: String,
        url: String,
        reply: Reply<()>,
    },
    List {
        reply: Reply<Vec<String>>,
    },
    Info {
        id: String,
        reply: Reply<WebviewInfo>,
    },
    InfoAll {
        reply: Reply<Vec<WebviewInfo>>,
    },
    FindByUrl {
        query: String,
        exact: bool,
        reply: Reply<Vec<String>>,
    },
    SetFrame {
        id: String,
        frame: Rect,
        reply: Reply<()>,
    },
    EvaluateScript {
        id: String,
        code: String,
        reply: Reply<PendingScript>,
    },
    SendMessage {
        id: String,
        payload: Value,
        reply: Reply<()>,
    },
}

/// A command plus the span it was submitted under.
pub(crate) struct Envelope {
    span: tracing::Span,
    command: Command,
}

// =============================================================================
// SERVICE
// =============================================================================

/// Owns the manager and runs the serialized execution context.
pub struct WebviewService<F: SurfaceFactory> {
    manager: MultiWebviewManager<F>,
    commands: mpsc::UnboundedReceiver<Envelope>,
    notifications: NotificationReceiver,
}

impl<F: SurfaceFactory> WebviewService<F> {
    /// Build a service and the first client handle for it.
    pub fn new(factory: F, events: Arc<dyn EventSink>) -> (Self, WebviewClient) {
        let (notify_tx, notify_rx) = notification_channel();
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let service = Self {
            manager: MultiWebviewManager::new(factory, events, notify_tx),
            commands: cmd_rx,
            notifications: notify_rx,
        };
        (service, WebviewClient { tx: cmd_tx })
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.manager = self.manager.with_background(color);
        self
    }

    /// Direct access before `run`, e.g. to register external surfaces that
    /// cannot cross threads.
    pub fn manager_mut(&mut self) -> &mut MultiWebviewManager<F> {
        &mut self.manager
    }

    /// Process notifications and commands until every client is dropped,
    /// then destroy whatever is still alive.
    pub async fn run(mut self) {
        info!("webview service started");
        loop {
            tokio::select! {
                biased;

                Some(notification) = self.notifications.recv() => {
                    self.manager.apply_notification(notification);
                }
                envelope = self.commands.recv() => match envelope {
                    Some(envelope) => self.handle(envelope),
                    None => break,
                },
            }
        }

        // Let callbacks that raced the last command land before teardown.
        while let Ok(notification) = self.notifications.try_recv() {
            self.manager.apply_notification(notification);
        }
        self.manager.destroy_all();
        info!("webview service stopped");
    }

    fn handle(&mut self, envelope: Envelope) {
        let Envelope { span, command } = envelope;
        let _entered = span.enter();
        let m = &mut self.manager;

        // A send error only means the caller stopped waiting.
        match command {
            Command::Create { id, options, reply } => {
                let _ = reply.send(m.create(&id, options));
            }
            Command::Focus { id, reply } => {
                let _ = reply.send(m.focus(&id));
            }
            Command::GetFocused { reply } => {
                let _ = reply.send(Ok(m.focused().map(str::to_string)));
            }
            Command::Hide { id, reply } => {
                let _ = reply.send(m.hide(&id));
            }
            Command::Show { id, reply } => {
                let _ = reply.send(m.show(&id));
            }
            Command::Destroy { id, reply } => {
                let _ = reply.send(m.destroy(&id));
            }
            Command::Navigate { id, url, reply } => {
                let _ = reply.send(m.navigate(&id, &url));
            }
            Command::List { reply } => {
                let _ = reply.send(Ok(m.list()));
            }
            Command::Info { id, reply } => {
                let _ = reply.send(m.info(&id));
            }
            Command::InfoAll { reply } => {
                let _ = reply.send(Ok(m.info_all()));
            }
            Command::FindByUrl {
                query,
                exact,
                reply,
            } => {
                let _ = reply.send(Ok(m.find_by_url(&query, exact)));
            }
            Command::SetFrame { id, frame, reply } => {
                let _ = reply.send(m.set_frame(&id, frame));
            }
            Command::EvaluateScript { id, code, reply } => {
                let _ = reply.send(m.evaluate_script(&id, &code));
            }
            Command::SendMessage { id, payload, reply } => {
                let _ = reply.send(m.send_message(&id, &payload));
            }
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Cheap, cloneable handle for submitting commands from any task or thread.
#[derive(Clone)]
pub struct WebviewClient {
    tx: mpsc::UnboundedSender<Envelope>,
}

impl WebviewClient {
    /// True once the service loop has exited.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    async fn request<T>(
        &self,
        name: &'static str,
        build: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, WebviewError> {
        let (reply, rx) = oneshot::channel();
        let cid = new_correlation_id();
        let span = tracing::debug_span!("webview_command", command = name, cid = %cid);
        span.in_scope(|| debug!("command submitted"));

        self.tx
            .send(Envelope {
                span: span.clone(),
                command: build(reply),
            })
            .map_err(|_| WebviewError::Unavailable("service has stopped".into()))?;

        rx.instrument(span)
            .await
            .map_err(|_| WebviewError::Unavailable("command was dropped".into()))?
    }

    pub async fn create(
        &self,
        id: impl Into<String>,
        options: CreateOptions,
    ) -> Result<(), WebviewError> {
        let id = id.into();
        self.request("create", |reply| Command::Create { id, options, reply })
            .await
    }

    pub async fn focus(&self, id: impl Into<String>) -> Result<(), WebviewError> {
        let id = id.into();
        self.request("focus", |reply| Command::Focus { id, reply })
            .await
    }

    pub async fn focused(&self) -> Result<Option<String>, WebviewError> {
        self.request("getFocused", |reply| Command::GetFocused { reply })
            .await
    }

    pub async fn hide(&self, id: impl Into<String>) -> Result<(), WebviewError> {
        let id = id.into();
        self.request("hide", |reply| Command::Hide { id, reply }).await
    }

    pub async fn show(&self, id: impl Into<String>) -> Result<(), WebviewError> {
        let id = id.into();
        self.request("show", |reply| Command::Show { id, reply }).await
    }

    pub async fn destroy(&self, id: impl Into<String>) -> Result<(), WebviewError> {
        let id = id.into();
        self.request("destroy", |reply| Command::Destroy { id, reply })
            .await
    }

    pub async fn navigate(
        &self,
        id: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<(), WebviewError> {
        let (id, url) = (id.into(), url.into());
        self.request("navigate", |reply| Command::Navigate { id, url, reply })
            .await
    }

    pub async fn list(&self) -> Result<Vec<String>, WebviewError> {
        self.request("list", |reply| Command::List { reply }).await
    }

    pub async fn info(&self, id: impl Into<String>) -> Result<WebviewInfo, WebviewError> {
        let id = id.into();
        self.request("info", |reply| Command::Info { id, reply }).await
    }

    pub async fn info_all(&self) -> Result<Vec<WebviewInfo>, WebviewError> {
        self.request("infoAll", |reply| Command::InfoAll { reply })
            .await
    }

    pub async fn find_by_url(
        &self,
        query: impl Into<String>,
        exact: bool,
    ) -> Result<Vec<String>, WebviewError> {
        let query = query.into();
        self.request("findByUrl", |reply| Command::FindByUrl {
            query,
            exact,
            reply,
        })
        .await
    }

    pub async fn set_frame(&self, id: impl Into<String>, frame: Rect) -> Result<(), WebviewError> {
        let id = id.into();
        self.request("setFrame", |reply| Command::SetFrame { id, frame, reply })
            .await
    }

    /// Start the script inside the service, then wait for the result outside
    /// it so other commands keep flowing.
    pub async fn evaluate_script(
        &self,
        id: impl Into<String>,
        code: impl Into<String>,
    ) -> Result<String, WebviewError> {
        let (id, code) = (id.into(), code.into());
        let pending = self
            .request("evaluateScript", |reply| Command::EvaluateScript {
                id,
                code,
                reply,
            })
            .await?;
        pending.await
    }

    pub async fn send_message(
        &self,
        id: impl Into<String>,
        payload: Value,
    ) -> Result<(), WebviewError> {
        let id = id.into();
        self.request("sendMessage", |reply| Command::SendMessage {
            id,
            payload,
            reply,
        })
        .await
    }
}
