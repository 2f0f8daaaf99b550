//! Scripted completion client shared by the workflow tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use triage_assist::error::AssistError;
use triage_assist::traits::{
    CompletionClient, CompletionConfig, CompletionResponse, Message, Usage,
};

/// Completion client that replays a fixed script, one entry per call.
///
/// Calls past the end of the script fail as if the API were down. Clones
/// share the script and the recorded prompts.
#[derive(Clone)]
pub struct ScriptedClient {
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedClient {
    pub fn new(script: Vec<Result<&str, &str>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(
                script
                    .into_iter()
                    .map(|r| r.map(str::to_string).map_err(str::to_string))
                    .collect(),
            )),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// User prompts received so far.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        messages: Vec<Message>,
        _config: CompletionConfig,
    ) -> Result<CompletionResponse, AssistError> {
        let prompt = messages
            .into_iter()
            .map(|m| m.content)
            .collect::<Vec<_>>()
            .join("\n");
        self.prompts.lock().unwrap().push(prompt);

        match self.script.lock().unwrap().pop_front() {
            Some(Ok(text)) => Ok(CompletionResponse::new(text, Usage::new(500, 200))),
            Some(Err(message)) => Err(AssistError::ApiUnavailable { message }),
            None => Err(AssistError::ApiUnavailable {
                message: "script exhausted".to_string(),
            }),
        }
    }
}

