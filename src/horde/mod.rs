mod client;
mod types;

pub use client::{HordeClient, JobPhase, Sleep, TokioSleep};
pub use types::{Generation, JobParams, JobSpec, JobStatus, JobSubmitAck};
