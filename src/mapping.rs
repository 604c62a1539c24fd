//! Conversions between the OpenAI-compatible surface and the Horde job
//! shapes. All four are free of I/O; response ids come from the injected
//! generator.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::{
    config::GatewayConfig,
    error::GatewayError,
    horde::{JobParams, JobSpec, JobStatus},
    ids::IdGenerator,
    openai::{
        ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, CompletionChoice,
        CompletionRequest, CompletionResponse, Usage,
    },
};

const CHAT_OBJECT: &str = "chat.completion";
const COMPLETION_OBJECT: &str = "text.completion";

// Completion responses always report this model, whatever was requested.
const COMPLETION_MODEL_TAG: &str = "davinci-codex";

pub fn chat_to_job(request: &ChatCompletionRequest, config: &GatewayConfig) -> JobSpec {
    let mut prompt = String::new();
    for message in &request.messages {
        prompt.push_str(&message.role);
        prompt.push_str(": ");
        prompt.push_str(&message.content);
        prompt.push('\n');
    }

    JobSpec {
        prompt,
        models: vec![request.model.clone()],
        trusted_workers: false,
        params: JobParams {
            max_context_length: config.max_context_length,
            // Chat requests carry no length parameter of their own; the
            // configured constant stands in.
            max_length: config.chat_max_length,
        },
    }
}

pub fn completion_to_job(request: &CompletionRequest, config: &GatewayConfig) -> JobSpec {
    JobSpec {
        prompt: request.prompt.clone(),
        models: vec![request.model.clone()],
        trusted_workers: false,
        params: JobParams {
            max_context_length: config.max_context_length,
            max_length: request.max_tokens,
        },
    }
}

pub fn job_to_chat(
    status: &JobStatus,
    ids: &dyn IdGenerator,
) -> Result<ChatCompletionResponse, GatewayError> {
    let text = status.first_generation()?.text.clone();
    // Byte length stands in for a token count; no tokenizer is involved.
    let length = text.len();

    Ok(ChatCompletionResponse {
        id: ids.generate(),
        object: CHAT_OBJECT.to_string(),
        created: unix_now(),
        choices: vec![ChatChoice {
            index: 0,
            message: ChatMessage {
                role: "assistant".to_string(),
                content: text,
            },
            finish_reason: "stop".to_string(),
        }],
        usage: Usage {
            prompt_tokens: length,
            completion_tokens: length,
            total_tokens: length * 2,
        },
    })
}

pub fn job_to_completion(
    status: &JobStatus,
    ids: &dyn IdGenerator,
) -> Result<CompletionResponse, GatewayError> {
    let text = status.first_generation()?.text.clone();

    Ok(CompletionResponse {
        id: ids.generate(),
        object: COMPLETION_OBJECT.to_string(),
        created: unix_now(),
        model: COMPLETION_MODEL_TAG.to_string(),
        choices: vec![CompletionChoice {
            text,
            index: 0,
            logprobs: None,
            finish_reason: "stop".to_string(),
        }],
        usage: Usage::default(),
    })
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
