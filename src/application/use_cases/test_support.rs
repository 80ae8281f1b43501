//! Shared fakes for use-case tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::error::{AppError, Result};
use crate::infrastructure::http::Fetcher;

/// Scripted fetcher. Each URL replays its queued responses in order and
/// keeps repeating the last one; unknown URLs answer with a 503.
#[derive(Default)]
pub struct FakeFetcher {
    responses: Mutex<HashMap<String, VecDeque<Result<Vec<u8>>>>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_body(self, url: &str, body: String) -> Self {
        self.push(url, Ok(body.into_bytes()));
        self
    }

    pub fn with_failures(self, url: &str, count: usize) -> Self {
        for _ in 0..count {
            self.push(url, Err(unavailable(url)));
        }
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    fn push(&self, url: &str, response: Result<Vec<u8>>) {
        self.responses
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }
}

fn unavailable(url: &str) -> AppError {
    AppError::Transport(format!("HTTP error 503: {}", url))
}

fn replay(response: &Result<Vec<u8>>) -> Result<Vec<u8>> {
    match response {
        Ok(bytes) => Ok(bytes.clone()),
        Err(AppError::Transport(msg)) => Err(AppError::Transport(msg.clone())),
        Err(e) => Err(AppError::System(e.to_string())),
    }
}

#[async_trait]
impl Fetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        *self.calls.lock().unwrap().entry(url.to_string()).or_default() += 1;

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(url) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().map(replay).unwrap_or_else(|| Err(unavailable(url))),
            None => Err(unavailable(url)),
        }
    }
}

/// Labor-announcement CSV body from (date, company, authority, amount) rows
pub fn labor_csv(rows: &[(&str, &str, &str, &str)]) -> String {
    let mut body = String::from("處分日期,事業單位名稱或負責人,主管機關,違反法規內容,罰鍰金額\n");
    for (date, company, authority, amount) in rows {
        body.push_str(&format!(
            "{},\"{}\",{},\"未依規定給付工資\",\"{}\"\n",
            date, company, authority, amount
        ));
    }
    body
}
