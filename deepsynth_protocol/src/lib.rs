use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ParameterModification {
    pub name: String,
    pub value: f32,
    #[serde(default)]
    pub description: String,
}

impl ParameterModification {
    pub fn new(name: impl Into<String>, value: f32) -> Self {
        Self {
            name: name.into(),
            value,
            description: String::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    Generate,
    Modify,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidApiKey,
    Network,
    Api,
    Parse,
    Internal,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum PatchResponse {
    Success {
        response_text: String,
        modifications: Vec<ParameterModification>,
    },
    Failure {
        msg: String,
        code: ErrorCode,
    },
}

impl PatchResponse {
    pub fn failure(code: ErrorCode, msg: impl Into<String>) -> Self {
        PatchResponse::Failure {
            msg: msg.into(),
            code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PatchResponse::Success { .. })
    }

    pub fn modifications(&self) -> &[ParameterModification] {
        match self {
            PatchResponse::Success { modifications, .. } => modifications,
            PatchResponse::Failure { .. } => &[],
        }
    }
}

/// One parameter write. Values are normalized to `[0, 1]`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AppliedParam {
    pub requested: String,
    pub resolved: String,
    pub index: usize,
    pub old_value: f32,
    pub new_value: f32,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FailedParam {
    pub name: String,
    pub value: f32,
    pub reason: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ApplyReport {
    pub applied: Vec<AppliedParam>,
    pub failed: Vec<FailedParam>,
}

impl ApplyReport {
    pub fn all_applied(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn applied_count(&self) -> usize {
        self.applied.len()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RequestOutcome {
    pub request_id: u64,
    pub kind: RequestKind,
    pub response: PatchResponse,
    #[serde(default)]
    pub applied: Option<ApplyReport>,
}
