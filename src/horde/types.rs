use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JobSpec {
    pub prompt: String,
    pub models: Vec<String>,
    pub trusted_workers: bool,
    pub params: JobParams,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JobParams {
    pub max_context_length: u32,
    pub max_length: u32,
}

/// Returned immediately on submission; `id` is the opaque job handle polled
/// afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobSubmitAck {
    pub id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobStatus {
    pub finished: u32,
    pub processing: u32,
    pub restarted: u32,
    pub waiting: u32,
    pub done: bool,
    pub faulted: bool,
    pub wait_time: u32,
    pub queue_position: u32,
    pub kudos: f32,
    pub is_possible: bool,
    pub generations: Vec<Generation>,
}

impl JobStatus {
    /// Completed jobs normally carry at least one generation, but the
    /// service does not guarantee it.
    pub fn first_generation(&self) -> Result<&Generation, GatewayError> {
        self.generations.first().ok_or(GatewayError::EmptyResult)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Generation {
    pub worker_id: String,
    pub worker_name: String,
    pub model: String,
    pub state: String,
    pub text: String,
    pub seed: i64,
}
