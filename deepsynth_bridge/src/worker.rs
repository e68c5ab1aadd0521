use crate::protocol::{Completion, ErrorCode, Job, PatchResponse, RequestKind};
use brain_core::claude::ClaudeClient;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// One background thread per request. The thread owns a current-thread
/// runtime for the duration of the HTTP call and reports back over the
/// completion channel.
pub struct RequestWorker {
    request_id: u64,
    join_handle: Option<JoinHandle<()>>,
}

impl RequestWorker {
    pub fn spawn(
        client: Arc<ClaudeClient>,
        job: Job,
        completion_tx: Sender<Completion>,
    ) -> Result<Self, String> {
        let request_id = job.request_id;
        let join_handle = thread::Builder::new()
            .name(format!("deepsynth-request-{request_id}"))
            .spawn(move || run_job(client, job, completion_tx))
            .map_err(|e| format!("failed to spawn request worker: {e}"))?;

        Ok(Self {
            request_id,
            join_handle: Some(join_handle),
        })
    }

    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn is_finished(&self) -> bool {
        self.join_handle.as_ref().map_or(true, |h| h.is_finished())
    }

    pub fn join(mut self) {
        if let Some(h) = self.join_handle.take() {
            if h.join().is_err() {
                log::error!("request worker {} panicked", self.request_id);
            }
        }
    }
}

fn run_job(client: Arc<ClaudeClient>, job: Job, completion_tx: Sender<Completion>) {
    let response = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt.block_on(execute(&client, &job)),
        Err(e) => PatchResponse::failure(
            ErrorCode::Internal,
            format!("failed to start async runtime: {e}"),
        ),
    };

    let completion = Completion {
        request_id: job.request_id,
        response,
    };
    if completion_tx.send(completion).is_err() {
        log::debug!("request {} finished after the main loop went away", job.request_id);
    }
}

async fn execute(client: &ClaudeClient, job: &Job) -> PatchResponse {
    let result = match job.kind {
        RequestKind::Generate => client.generate_patch(&job.prompt).await,
        RequestKind::Modify => {
            client
                .modify_patch(&job.prompt, &job.current_patch_info)
                .await
        }
    };

    match result {
        Ok(reply) => {
            log::info!(
                "request {}: {} modifications parsed",
                job.request_id,
                reply.modifications.len()
            );
            reply.into_response()
        }
        Err(e) => {
            log::warn!("request {} failed: {e}", job.request_id);
            e.into()
        }
    }
}
