pub mod modules {
    pub mod claude;
    pub mod enhancer;
    pub mod extractor;
    pub mod features;
    pub mod preset_scan;
    pub mod sanitizer;
    pub mod system_prompt;
    pub mod vector_db;

    pub mod protocol {
        pub use deepsynth_protocol::{
            AppliedParam, ApplyReport, ErrorCode, FailedParam, ParameterModification,
            PatchResponse, RequestKind, RequestOutcome,
        };
    }
}

pub use modules::{
    claude, enhancer, extractor, features, preset_scan, protocol, sanitizer, system_prompt,
    vector_db,
};
