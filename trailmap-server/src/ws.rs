//! Progressive roadmap delivery over a WebSocket.
//!
//! Each connection owns one [`JobTracker`], playing the part of a single
//! browser tab: every submission issues a new job, and events belonging to
//! a superseded job are dropped before they reach the socket.

use std::sync::Arc;

use anyhow::Result;
use axum::extract::ws::{Message, WebSocket};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};
use trailmap_core::{JobId, JobTracker, LearnerProfile, Revealer, Surface};

use crate::auth::SessionUser;
use crate::server::AppState;

/// Messages sent to the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    Started { job: JobId },
    /// Full HTML of the roadmap revealed so far
    Frame { job: JobId, html: String },
    Done { job: JobId, markdown: String },
    Error { job: Option<JobId>, message: String },
}

impl ServerEvent {
    fn job(&self) -> Option<JobId> {
        match self {
            ServerEvent::Started { job }
            | ServerEvent::Frame { job, .. }
            | ServerEvent::Done { job, .. } => Some(*job),
            ServerEvent::Error { job, .. } => *job,
        }
    }
}

/// Messages received from the browser.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Submit { profile: LearnerProfile },
}

struct ChannelSurface {
    job: JobId,
    tx: UnboundedSender<ServerEvent>,
}

impl Surface for ChannelSurface {
    fn paint(&self, html: String) {
        let _ = self.tx.send(ServerEvent::Frame { job: self.job, html });
    }
}

/// Render jobs and outbound events for one connection.
pub struct RoadmapSession {
    state: AppState,
    user: Option<SessionUser>,
    tracker: Arc<JobTracker>,
    revealer: Revealer,
    tx: UnboundedSender<ServerEvent>,
}

impl RoadmapSession {
    pub fn new(state: AppState, user: Option<SessionUser>) -> (Self, UnboundedReceiver<ServerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tracker = Arc::new(JobTracker::new());
        let revealer = Revealer::new(Arc::clone(&tracker), state.config.pacing);
        let session = Self {
            state,
            user,
            tracker,
            revealer,
            tx,
        };
        (session, rx)
    }

    /// Start a new job for `profile`, superseding any job still running.
    pub fn submit(&self, profile: LearnerProfile) -> JobId {
        let job = self.tracker.issue();
        debug!(%job, "roadmap submitted");
        let _ = self.tx.send(ServerEvent::Started { job });

        if let Err(err) = self.state.admit(self.user.as_ref(), &profile) {
            let _ = self.tx.send(ServerEvent::Error {
                job: Some(job),
                message: err.to_string(),
            });
            return job;
        }

        let generator = Arc::clone(&self.state.generator);
        let revealer = self.revealer.clone();
        let tracker = Arc::clone(&self.tracker);
        let tx = self.tx.clone();

        tokio::spawn(async move {
            match generator.generate(&profile).await {
                Ok(markdown) => {
                    let surface = ChannelSurface {
                        job,
                        tx: tx.clone(),
                    };
                    if revealer.reveal(&markdown, job, &surface).await {
                        let _ = tx.send(ServerEvent::Done { job, markdown });
                    }
                }
                Err(err) if tracker.is_current(job) => {
                    warn!(%job, status = ?err.status, message = %err.message, "generation failed");
                    let _ = tx.send(ServerEvent::Error {
                        job: Some(job),
                        message: err.to_string(),
                    });
                }
                Err(err) => debug!(%job, %err, "superseded job failed"),
            }
        });

        job
    }

    /// Whether `event` may still be shown: it has no job or its job is current.
    pub fn forwardable(&self, event: &ServerEvent) -> bool {
        event.job().map_or(true, |job| self.tracker.is_current(job))
    }

    fn reject(&self, message: impl Into<String>) {
        let _ = self.tx.send(ServerEvent::Error {
            job: None,
            message: message.into(),
        });
    }

    /// Stop every running job.
    pub fn close(&self) {
        self.tracker.issue();
    }
}

pub async fn handle_ws(
    mut socket: WebSocket,
    state: AppState,
    user: Option<SessionUser>,
) -> Result<()> {
    let (session, mut events) = RoadmapSession::new(state, user);

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                if !session.forwardable(&event) {
                    continue;
                }
                let text = serde_json::to_string(&event)?;
                if socket.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ClientMessage>(text.as_str()) {
                            Ok(ClientMessage::Submit { profile }) => {
                                session.submit(profile);
                            }
                            Err(err) => {
                                warn!(%err, "ignoring malformed websocket message");
                                session.reject("unrecognized message");
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    _ => {}
                }
            }
        }
    }

    session.close();
    Ok(())
}
