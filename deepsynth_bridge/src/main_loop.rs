use crate::host::SynthHost;
use crate::mapper::{export_current_patch_info, ParameterMapper};
use crate::protocol::{
    Completion, ErrorCode, Job, PatchResponse, RequestKind, RequestOutcome, COMPLETION_CAP,
};
use crate::worker::RequestWorker;
use brain_core::claude::{ClaudeClient, ClaudeError};
use brain_core::sanitizer::sanitize_modifications;
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

const SHUTDOWN_POLL: Duration = Duration::from_millis(10);

pub type OutcomeCallback = Box<dyn FnOnce(RequestOutcome)>;

#[derive(Debug, Clone)]
pub struct PatchRequest {
    pub kind: RequestKind,
    pub prompt: String,
    /// When false the reply is only reported, never written to the host.
    pub apply: bool,
}

impl PatchRequest {
    pub fn generate(prompt: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Generate,
            prompt: prompt.into(),
            apply: true,
        }
    }

    pub fn modify(prompt: impl Into<String>) -> Self {
        Self {
            kind: RequestKind::Modify,
            prompt: prompt.into(),
            apply: true,
        }
    }

    pub fn preview_only(mut self) -> Self {
        self.apply = false;
        self
    }
}

struct Pending {
    kind: RequestKind,
    apply: bool,
    callback: OutcomeCallback,
}

/// Owned by the UI thread. Requests run on worker threads; their results
/// are applied to the host and handed to callbacks only from `tick`.
pub struct MainLoop {
    client: Arc<ClaudeClient>,
    mapper: ParameterMapper,

    completion_tx: Sender<Completion>,
    completion_rx: Receiver<Completion>,
    /// Failures decided at submit time, delivered on the next tick.
    ready: VecDeque<Completion>,

    pending: HashMap<u64, Pending>,
    workers: Vec<RequestWorker>,
    next_request_id: u64,
}

impl MainLoop {
    pub fn new(client: Arc<ClaudeClient>, host: &dyn SynthHost) -> Self {
        let (completion_tx, completion_rx) = bounded(COMPLETION_CAP);
        Self {
            client,
            mapper: ParameterMapper::new(host),
            completion_tx,
            completion_rx,
            ready: VecDeque::new(),
            pending: HashMap::new(),
            workers: Vec::new(),
            next_request_id: 1,
        }
    }

    pub fn client(&self) -> &Arc<ClaudeClient> {
        &self.client
    }

    pub fn mapper(&self) -> &ParameterMapper {
        &self.mapper
    }

    pub fn rebuild_maps(&mut self, host: &dyn SynthHost) {
        self.mapper.rebuild(host);
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn submit(
        &mut self,
        host: &dyn SynthHost,
        request: PatchRequest,
        callback: impl FnOnce(RequestOutcome) + 'static,
    ) -> u64 {
        let request_id = self.next_request_id;
        self.next_request_id += 1;

        self.pending.insert(
            request_id,
            Pending {
                kind: request.kind,
                apply: request.apply,
                callback: Box::new(callback),
            },
        );

        if !self.client.is_api_key_valid() {
            self.ready.push_back(Completion {
                request_id,
                response: ClaudeError::InvalidApiKey.into(),
            });
            return request_id;
        }

        let current_patch_info = match request.kind {
            RequestKind::Modify => export_current_patch_info(host),
            RequestKind::Generate => String::new(),
        };
        let job = Job {
            request_id,
            kind: request.kind,
            prompt: request.prompt,
            current_patch_info,
        };

        match RequestWorker::spawn(
            Arc::clone(&self.client),
            job,
            self.completion_tx.clone(),
        ) {
            Ok(worker) => {
                log::debug!("request {request_id} started");
                self.workers.push(worker);
            }
            Err(msg) => {
                log::error!("{msg}");
                self.ready.push_back(Completion {
                    request_id,
                    response: PatchResponse::failure(ErrorCode::Internal, msg),
                });
            }
        }
        request_id
    }

    /// Delivers every finished request. Returns how many callbacks ran.
    pub fn tick(&mut self, host: &mut dyn SynthHost) -> usize {
        let mut completions: Vec<Completion> = self.ready.drain(..).collect();
        loop {
            match self.completion_rx.try_recv() {
                Ok(c) => completions.push(c),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }

        let mut delivered = 0;
        for completion in completions {
            if self.finish(host, completion) {
                delivered += 1;
            }
        }

        self.reap_workers();
        delivered
    }

    fn finish(&mut self, host: &mut dyn SynthHost, completion: Completion) -> bool {
        let Some(pending) = self.pending.remove(&completion.request_id) else {
            log::warn!("completion for unknown request {}", completion.request_id);
            return false;
        };

        let applied = match &completion.response {
            PatchResponse::Success { modifications, .. } if pending.apply => {
                let cleaned = sanitize_modifications(modifications.clone());
                Some(self.mapper.apply_modifications(host, &cleaned))
            }
            _ => None,
        };

        (pending.callback)(RequestOutcome {
            request_id: completion.request_id,
            kind: pending.kind,
            response: completion.response,
            applied,
        });
        true
    }

    /// Joins finished workers and returns how many are still running.
    fn reap_workers(&mut self) -> usize {
        let (done, running): (Vec<_>, Vec<_>) = self
            .workers
            .drain(..)
            .partition(RequestWorker::is_finished);
        self.workers = running;
        for worker in done {
            worker.join();
        }
        self.workers.len()
    }

    /// Blocks until every running request has finished. Their completions
    /// stay queued for a later `tick`.
    pub fn shutdown(&mut self) {
        // Workers block on a full completion channel, so keep draining it
        // into `ready` while waiting for them.
        while self.reap_workers() > 0 {
            match self.completion_rx.recv_timeout(SHUTDOWN_POLL) {
                Ok(c) => self.ready.push_back(c),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        self.ready.extend(self.completion_rx.try_iter());
    }
}
