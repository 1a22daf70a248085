//! Recording in-memory `BitableApi` for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use super::api::{ApiResponse, BitableApi};
use super::error::ClientError;
use super::request::BitableRequest;

/// Replays queued responses in order and records every request it sees.
/// Once the queue is empty it answers with an empty success.
#[derive(Default)]
pub struct StubBitable {
    responses: Mutex<VecDeque<Result<ApiResponse, ClientError>>>,
    calls: Mutex<Vec<(BitableRequest, Option<String>)>>,
}

impl StubBitable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: ApiResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, error: ClientError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<BitableRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    pub fn user_tokens(&self) -> Vec<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, token)| token.clone())
            .collect()
    }
}

#[async_trait]
impl BitableApi for StubBitable {
    async fn execute(
        &self,
        request: &BitableRequest,
        user_token: Option<&str>,
    ) -> Result<ApiResponse, ClientError> {
        self.calls
            .lock()
            .unwrap()
            .push((request.clone(), user_token.map(str::to_string)));

        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(ApiResponse::success(json!({}))))
    }
}
