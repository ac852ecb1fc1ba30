use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_channel::{Receiver, Sender};
use async_trait::async_trait;
use log::{error, info};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::config::Config;

/// An authenticated session as the auth service reports it. The engine
/// only ever consumes the owner identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
}

/// The ambient authentication context: one query for the current session
/// plus a stream of later session changes.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn current_session(&self) -> Result<Option<Session>>;

    /// Notifications of subsequent session changes. `None` means the
    /// session was lost (signed out or expired).
    fn subscribe(&self) -> Receiver<Option<Session>>;
}

#[derive(Debug, Deserialize)]
struct SessionUser {
    uid: String,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    user: Option<SessionUser>,
}

async fn fetch_session(client: &reqwest::Client, config: &Config) -> Result<Option<Session>> {
    let url = format!("{}/v1/session", config.auth_service_url);
    let response = client.get(&url).bearer_auth(&config.api_key).send().await?;

    if response.status() == StatusCode::UNAUTHORIZED {
        return Ok(None);
    }

    let body: SessionResponse = response.error_for_status()?.json().await?;
    Ok(body.user.map(|user| Session { user_id: user.uid }))
}

/// Auth over plain HTTP. Session changes are detected by polling the
/// session endpoint and pushing transitions into a channel.
pub struct HttpAuthClient {
    client: reqwest::Client,
    config: Arc<Config>,
    sender: Sender<Option<Session>>,
    receiver: Receiver<Option<Session>>,
    polling: AtomicBool,
}

impl HttpAuthClient {
    pub fn new(config: Arc<Config>) -> HttpAuthClient {
        let (sender, receiver) = async_channel::unbounded();
        HttpAuthClient {
            client: reqwest::Client::new(),
            config,
            sender,
            receiver,
            polling: AtomicBool::new(false),
        }
    }

    fn spawn_poller(&self) {
        // Only one poll loop per client, no matter how often subscribe()
        // is called.
        if self.polling.swap(true, Ordering::SeqCst) {
            return;
        }

        let client = self.client.clone();
        let config = self.config.clone();
        let sender = self.sender.clone();
        let interval = Duration::from_secs(config.session_poll_seconds);

        tokio::task::spawn(async move {
            let mut last = match fetch_session(&client, &config).await {
                Ok(session) => session,
                Err(err) => {
                    error!("initial session poll failed: {:?}", err);
                    None
                }
            };

            loop {
                tokio::time::sleep(interval).await;
                match fetch_session(&client, &config).await {
                    Ok(session) if session != last => {
                        info!("session changed: signed_in={}", session.is_some());
                        if sender.send(session.clone()).await.is_err() {
                            break;
                        }
                        last = session;
                    }
                    Ok(_) => {}
                    Err(err) => error!("session poll failed: {:?}", err),
                }
            }
        });
    }
}

#[async_trait]
impl AuthProvider for HttpAuthClient {
    async fn current_session(&self) -> Result<Option<Session>> {
        fetch_session(&self.client, &self.config).await
    }

    fn subscribe(&self) -> Receiver<Option<Session>> {
        self.spawn_poller();
        self.receiver.clone()
    }
}
