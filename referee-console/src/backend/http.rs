use super::{Backend, BackendCall, BackendError};
use log::{debug, warn};
use reqwest::{Client, ClientBuilder, Response};
use rsk_common::{
    constants::Constants,
    game_snapshot::GameState,
    geometry::FieldPoint,
    vision::{VideoFrame, VisionState},
};
use serde::de::DeserializeOwned;
use std::{future::Future, time::Duration};

/// Talks to the backend's JSON bridge: queries are `GET <base>/api/<method>`,
/// commands are `POST <base>/api/<method>` with the positional arguments as a
/// JSON array.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    client: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, BackendError> {
        let client = ClientBuilder::new().timeout(timeout).build()?;

        let base_url = base_url.trim_end_matches('/').to_string();

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, method: &str) -> String {
        format!("{}/api/{method}", self.base_url)
    }

    fn query<T: DeserializeOwned>(
        &self,
        method: &'static str,
    ) -> impl Future<Output = Result<T, BackendError>> + Send + use<T> {
        let request = self.client.get(self.url(method)).send();

        async move {
            let body = checked_body(method, request.await?).await?;
            serde_json::from_str(&body).map_err(|source| BackendError::Decode { method, source })
        }
    }
}

async fn checked_body(method: &'static str, response: Response) -> Result<String, BackendError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        warn!("Backend call {method} failed, status: {status}");
        Err(BackendError::Status {
            method,
            status,
            body,
        })
    }
}

impl Backend for HttpBackend {
    fn constants(&self) -> impl Future<Output = Result<Constants, BackendError>> + Send {
        self.query("constants")
    }

    fn get_game_state(&self) -> impl Future<Output = Result<GameState, BackendError>> + Send {
        self.query("get_game_state")
    }

    fn get_state(&self) -> impl Future<Output = Result<VisionState, BackendError>> + Send {
        self.query("get_state")
    }

    fn get_video(&self) -> impl Future<Output = Result<VideoFrame, BackendError>> + Send {
        self.query("get_video")
    }

    fn get_wait_ball_position(
        &self,
    ) -> impl Future<Output = Result<Option<FieldPoint>, BackendError>> + Send {
        self.query("get_wait_ball_position")
    }

    fn is_simulated(&self) -> impl Future<Output = Result<bool, BackendError>> + Send {
        self.query("is_simulated")
    }

    fn call(&self, call: BackendCall) -> impl Future<Output = Result<(), BackendError>> + Send {
        let method = call.method();
        debug!("Sending {call}");
        let request = self.client.post(self.url(method)).json(&call.args()).send();

        async move {
            checked_body(method, request.await?).await?;
            Ok(())
        }
    }
}
