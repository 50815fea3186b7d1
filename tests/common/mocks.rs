//! Mock executors.
//!
//! Stand in for the network so batches can be flushed against canned
//! `execute` bodies.

use anyhow::{anyhow, Result};
use execute_packer::{ExecuteResponse, Executor};
use parking_lot::Mutex;
use std::collections::VecDeque;

/// What the mock does for one `execute` call.
pub enum Reply {
    /// Decode this body as the server's answer.
    Body(String),
    /// Fail at the transport level with this message.
    Fail(String),
}

/// Executor that replays scripted replies and records every script it saw.
#[derive(Default)]
pub struct ScriptedExecutor {
    replies: Mutex<VecDeque<Reply>>,
    scripts: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, body: &str) -> Self {
        self.replies.lock().push_back(Reply::Body(body.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies.lock().push_back(Reply::Fail(message.to_string()));
        self
    }

    /// Scripts received so far, in order.
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().clone()
    }
}

impl Executor for ScriptedExecutor {
    fn execute(&self, code: &str) -> Result<ExecuteResponse> {
        self.scripts.lock().push(code.to_string());
        match self.replies.lock().pop_front() {
            Some(Reply::Body(body)) => ExecuteResponse::from_json(&body),
            Some(Reply::Fail(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no scripted reply left")),
        }
    }
}
