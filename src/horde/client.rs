use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::header;
use tracing::{debug, info, warn};

use crate::{
    config::GatewayConfig,
    error::GatewayError,
    horde::types::{JobSpec, JobStatus, JobSubmitAck},
};

/// Timed-wait seam for the poll loop. Tests swap in an instant
/// implementation so many poll iterations run without real delay.
#[async_trait]
pub trait Sleep: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

#[derive(Debug, Default)]
pub struct TokioSleep;

#[async_trait]
impl Sleep for TokioSleep {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Lifecycle of one submitted job as reported by the status endpoint.
/// Transport and decode failures have no phase of their own; they surface
/// as the `Err` channel of `submit_and_await`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Submitted,
    Polling,
    Completed,
    Faulted,
}

impl JobPhase {
    pub fn of(status: &JobStatus) -> JobPhase {
        // A faulted job may also read done; faulted wins so it is never
        // mistaken for a usable result.
        if status.faulted {
            JobPhase::Faulted
        } else if status.done {
            JobPhase::Completed
        } else {
            JobPhase::Polling
        }
    }
}

pub struct HordeClient {
    http: reqwest::Client,
    submit_url: String,
    status_url: String,
    poll_interval: Duration,
    poll_timeout: Duration,
    sleep: Arc<dyn Sleep>,
}

impl HordeClient {
    pub fn new(config: &GatewayConfig) -> anyhow::Result<Self> {
        Self::with_sleep(config, Arc::new(TokioSleep))
    }

    pub fn with_sleep(config: &GatewayConfig, sleep: Arc<dyn Sleep>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            submit_url: config.submit_url.clone(),
            status_url: config.status_url.clone(),
            poll_interval: config.poll_interval,
            poll_timeout: config.poll_timeout,
            sleep,
        })
    }

    /// Submits a job and waits until the downstream service reports it done.
    /// The call holds its task for the job's full queue-plus-generation
    /// time; dropping the future cancels the wait and the in-flight poll.
    pub async fn submit_and_await(
        &self,
        spec: &JobSpec,
        api_key: &str,
    ) -> Result<JobStatus, GatewayError> {
        let body =
            serde_json::to_vec(spec).map_err(|err| GatewayError::Serialize(err.to_string()))?;

        debug!(models = ?spec.models, max_length = spec.params.max_length, "submitting job");
        let response = self
            .http
            .post(&self.submit_url)
            .header("apikey", api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| GatewayError::Submit(err.to_string()))?;

        let http_status = response.status();
        if !http_status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Submit(format!("{http_status}: {detail}")));
        }

        let ack: JobSubmitAck = response
            .json()
            .await
            .map_err(|err| GatewayError::Submit(err.to_string()))?;
        debug!(
            job_id = %ack.id,
            phase = ?JobPhase::Submitted,
            message = %ack.message,
            "job accepted"
        );

        self.await_completion(&ack.id).await
    }

    async fn await_completion(&self, job_id: &str) -> Result<JobStatus, GatewayError> {
        let url = format!("{}/{}", self.status_url, job_id);
        let max_attempts = self.max_attempts();

        for attempt in 1..=max_attempts {
            self.sleep.sleep(self.poll_interval).await;

            let status = self.fetch_status(&url).await?;
            match JobPhase::of(&status) {
                JobPhase::Completed => {
                    info!(
                        job_id,
                        attempt,
                        kudos = status.kudos as f64,
                        generations = status.generations.len(),
                        "job completed"
                    );
                    return Ok(status);
                }
                JobPhase::Faulted => {
                    warn!(job_id, attempt, "job reported faulted");
                    return Err(GatewayError::Faulted {
                        job_id: job_id.to_string(),
                    });
                }
                JobPhase::Submitted | JobPhase::Polling => {
                    debug!(
                        job_id,
                        attempt,
                        queue_position = status.queue_position,
                        wait_time = status.wait_time,
                        is_possible = status.is_possible,
                        "job pending"
                    );
                }
            }
        }

        Err(GatewayError::Timeout {
            job_id: job_id.to_string(),
            waited: self.poll_timeout,
        })
    }

    // Attempt cap derived from the configured ceiling; a job that never
    // reports done cannot pin its task forever.
    fn max_attempts(&self) -> u64 {
        let interval = self.poll_interval.as_millis().max(1);
        (self.poll_timeout.as_millis() / interval).max(1) as u64
    }

    async fn fetch_status(&self, url: &str) -> Result<JobStatus, GatewayError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|err| GatewayError::Poll(err.to_string()))?;

        let http_status = response.status();
        if !http_status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(GatewayError::Poll(format!("{http_status}: {detail}")));
        }

        response
            .json()
            .await
            .map_err(|err| GatewayError::Poll(err.to_string()))
    }
}
