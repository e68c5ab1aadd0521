use crate::aliases::PARAMETER_ALIASES;
use crate::resolver::ParameterResolver;
use std::collections::BTreeMap;

/// One line per alias describing where it landed in the live layout.
pub fn validate_alias_map(resolver: &ParameterResolver) -> BTreeMap<String, String> {
    let mut report = BTreeMap::new();

    for &(alias, target) in PARAMETER_ALIASES {
        let line = match resolver.alias_index(alias) {
            Some(index) => {
                let name = resolver.display_name(index).unwrap_or_default();
                format!("mapped to '{name}' at {index}")
            }
            None => format!("missing (wanted '{target}')"),
        };
        report.insert(alias.to_string(), line);
    }

    report
}

pub fn missing_aliases(report: &BTreeMap<String, String>) -> usize {
    report.values().filter(|v| v.starts_with("missing")).count()
}
