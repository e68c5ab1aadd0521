pub const COMPLETION_CAP: usize = 256;

/// Work handed to a request worker. The patch dump is captured on the UI
/// thread before the worker starts.
#[derive(Debug, Clone)]
pub struct Job {
    pub request_id: u64,
    pub kind: RequestKind,
    pub prompt: String,
    pub current_patch_info: String,
}

#[derive(Debug, Clone)]
pub struct Completion {
    pub request_id: u64,
    pub response: PatchResponse,
}

pub use deepsynth_protocol::{
    AppliedParam, ApplyReport, ErrorCode, FailedParam, ParameterModification, PatchResponse,
    RequestKind, RequestOutcome,
};
