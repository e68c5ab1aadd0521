pub mod aliases;
pub mod host;
pub mod main_loop;
pub mod mapper;
pub mod protocol;
pub mod resolver;
pub mod snapshot;
pub mod validator;
pub mod worker;

pub use host::{InMemorySynth, ParamGroup, ParamInfo, SynthHost, ValueType};
pub use main_loop::{MainLoop, PatchRequest};
pub use mapper::{export_current_patch_info, ApplyError, ParameterMapper};
pub use resolver::ParameterResolver;
