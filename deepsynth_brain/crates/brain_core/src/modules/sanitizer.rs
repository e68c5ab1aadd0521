use crate::modules::protocol::ParameterModification;
use std::collections::HashSet;

/// Local QC before modifications reach the synth.
///
/// Drops entries with an empty name or a non-finite value and keeps only the
/// last write for each (case-insensitive) name. Survivors keep their
/// relative order.
pub fn sanitize_modifications(mods: Vec<ParameterModification>) -> Vec<ParameterModification> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for m in mods.into_iter().rev() {
        let name = m.name.trim();
        if name.is_empty() {
            log::debug!("dropping modification with empty name");
            continue;
        }
        if !m.value.is_finite() {
            log::warn!("dropping non-finite value for {name}");
            continue;
        }
        if !seen.insert(name.to_ascii_lowercase()) {
            continue;
        }
        out.push(ParameterModification {
            name: name.to_string(),
            value: m.value,
            description: m.description,
        });
    }
    out.reverse();
    out
}
