use crate::modules::protocol::ParameterModification;
use regex::Regex;
use std::sync::OnceLock;

const MARKER: &str = "PARAMETERS:";

static DASHED: OnceLock<Regex> = OnceLock::new();
static BARE: OnceLock<Regex> = OnceLock::new();

fn dashed_line() -> &'static Regex {
    DASHED.get_or_init(|| {
        Regex::new(
            r"-\s*([a-zA-Z0-9_\s]+):\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)(?:\s*\(([^)]*)\))?",
        )
        .expect("invalid regex pattern")
    })
}

fn bare_line() -> &'static Regex {
    BARE.get_or_init(|| {
        Regex::new(
            r"([a-zA-Z0-9_\s]+):\s*([-+]?[0-9]*\.?[0-9]+(?:[eE][-+]?[0-9]+)?)(?:\s*\(([^)]*)\))?",
        )
        .expect("invalid regex pattern")
    })
}

/// Pulls `name: value (description)` triples out of a model reply.
///
/// Only text after the `PARAMETERS:` marker is considered (matched
/// case-insensitively when the exact marker is missing). Dashed list items
/// are preferred; bare `name: value` lines are used only when no dashed
/// item parses. Each line is matched on its own, and a line whose value
/// does not parse is skipped without affecting the rest.
pub fn extract_modifications(text: &str) -> Vec<ParameterModification> {
    let Some(section) = parameters_section(text) else {
        log::debug!("no PARAMETERS marker in reply");
        return Vec::new();
    };

    let dashed = scan_lines(section, dashed_line(), false);
    if !dashed.is_empty() {
        return dashed;
    }

    log::debug!("no dashed parameter lines; trying bare `name: value` lines");
    scan_lines(section, bare_line(), true)
}

fn parameters_section(text: &str) -> Option<&str> {
    if let Some(pos) = text.find(MARKER) {
        return Some(&text[pos..]);
    }
    // ASCII lowercasing keeps byte offsets aligned with `text`.
    let pos = text.to_ascii_lowercase().find("parameters:")?;
    Some(&text[pos..])
}

fn scan_lines(section: &str, re: &Regex, skip_header: bool) -> Vec<ParameterModification> {
    let mut out = Vec::new();
    for line in section.lines() {
        for caps in re.captures_iter(line) {
            let name = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
            if name.is_empty() || (skip_header && name.eq_ignore_ascii_case("parameters")) {
                continue;
            }
            let Some(value) = caps.get(2).and_then(|m| m.as_str().parse::<f32>().ok()) else {
                continue;
            };
            let description = caps
                .get(3)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            out.push(ParameterModification {
                name: name.to_string(),
                value,
                description,
            });
        }
    }
    out
}
