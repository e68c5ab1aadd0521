use crate::host::{ParamGroup, ParamInfo, SynthHost, ValueType};
use crate::protocol::{AppliedParam, ApplyReport, FailedParam, ParameterModification};
use crate::resolver::ParameterResolver;
use std::fmt::Write as _;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: f32 },
    #[error("host rejected {name}: {msg}")]
    Host { name: String, msg: String },
}

pub struct ParameterMapper {
    resolver: ParameterResolver,
}

impl ParameterMapper {
    pub fn new(host: &dyn SynthHost) -> Self {
        Self {
            resolver: ParameterResolver::build(host),
        }
    }

    pub fn rebuild(&mut self, host: &dyn SynthHost) {
        self.resolver = ParameterResolver::build(host);
    }

    pub fn resolver(&self) -> &ParameterResolver {
        &self.resolver
    }

    pub fn set_parameter_from_name(
        &self,
        host: &mut dyn SynthHost,
        name: &str,
        value: f32,
    ) -> Result<AppliedParam, ApplyError> {
        if !value.is_finite() {
            return Err(ApplyError::InvalidValue {
                name: name.to_string(),
                value,
            });
        }
        let index = self
            .resolver
            .find_with_variations(name)
            .ok_or_else(|| ApplyError::UnknownParameter(name.to_string()))?;
        let info = host
            .param_info(index)
            .ok_or_else(|| ApplyError::UnknownParameter(name.to_string()))?;

        let old_value = host.get_value01(index).unwrap_or(0.0);
        let target = target_value01(&info, name, value);
        host.set_value01(index, target)
            .map_err(|msg| ApplyError::Host {
                name: info.display_name.clone(),
                msg,
            })?;
        host.mark_dirty();
        let new_value = host.get_value01(index).unwrap_or(target);

        log::debug!(
            "{name} -> {} [{index}]: {old_value:.3} -> {new_value:.3}",
            info.display_name
        );
        Ok(AppliedParam {
            requested: name.to_string(),
            resolved: info.display_name,
            index,
            old_value,
            new_value,
        })
    }

    pub fn apply_modifications(
        &self,
        host: &mut dyn SynthHost,
        mods: &[ParameterModification],
    ) -> ApplyReport {
        let mut report = ApplyReport::default();

        for m in mods {
            match self.set_parameter_from_name(host, &m.name, m.value) {
                Ok(applied) => report.applied.push(applied),
                Err(e) => {
                    log::warn!("failed to apply {} = {}: {e}", m.name, m.value);
                    report.failed.push(FailedParam {
                        name: m.name.clone(),
                        value: m.value,
                        reason: e.to_string(),
                    });
                }
            }
        }

        if !report.applied.is_empty() {
            host.mark_dirty();
        }
        log::info!(
            "applied {}/{} modifications",
            report.applied_count(),
            mods.len()
        );
        report
    }

    pub fn export_current_patch_info(&self, host: &dyn SynthHost) -> String {
        export_current_patch_info(host)
    }
}

fn target_value01(info: &ParamInfo, requested: &str, value: f32) -> f32 {
    let discrete =
        info.value_type.is_discrete() || requested.to_ascii_lowercase().contains("_type");

    if discrete {
        let mut step = value.trunc();
        if let ValueType::Int { min, max } = info.value_type {
            if max > min {
                step = step.clamp(min as f32, max as f32);
            }
        }
        return info.value_type.value_to_normalized(step).clamp(0.0, 1.0);
    }

    let v01 = if (0.0..=1.0).contains(&value) {
        value
    } else {
        info.value_type.value_to_normalized(value)
    };
    v01.clamp(0.0, 1.0)
}

/// Plain-text dump of the current patch grouped by section, for the modify
/// prompt.
pub fn export_current_patch_info(host: &dyn SynthHost) -> String {
    let params: Vec<(ParamInfo, f32)> = (0..host.param_count())
        .filter_map(|i| Some((host.param_info(i)?, host.get_value01(i)?)))
        .collect();

    let mut out = String::from("Current Patch Parameters:\n\n");
    for group in ParamGroup::EXPORT_ORDER {
        let _ = writeln!(out, "=== {} ===", group.label());
        for (info, value) in params.iter().filter(|(p, _)| p.group == group) {
            let _ = writeln!(out, "- {}: {value:.3}", info.display_name);
        }
        out.push('\n');
    }
    out
}
