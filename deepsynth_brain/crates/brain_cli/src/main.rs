use anyhow::Context;
use brain_core::claude::{ClaudeClient, ClaudeConfig};
use brain_core::protocol::{ApplyReport, ParameterModification, PatchResponse, RequestOutcome};
use brain_core::sanitizer::sanitize_modifications;
use brain_core::vector_db::{PresetVector, VectorDatabase};
use clap::Parser;
use deepsynth_bridge::snapshot::snapshot_features;
use deepsynth_bridge::validator::{missing_aliases, validate_alias_map};
use deepsynth_bridge::{InMemorySynth, MainLoop, PatchRequest};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const TICK_INTERVAL: Duration = Duration::from_millis(30);
const SIMILAR_RESULTS: usize = 5;

#[derive(Parser, Debug)]
#[command(name = "brain_cli")]
struct Args {
    #[arg(long, required_unless_present = "prompt_file")]
    prompt: Option<String>,

    /// Read prompt content from a file (useful for long prompts).
    #[arg(long, value_name = "PATH", conflicts_with = "prompt")]
    prompt_file: Option<PathBuf>,

    /// Modify the loaded patch instead of generating a new one.
    #[arg(long, default_value_t = false)]
    modify: bool,

    #[arg(long)]
    api_key_file: Option<PathBuf>,

    #[arg(long)]
    model: Option<String>,

    /// Directory of JSON presets used as reference material. Repeatable.
    #[arg(long = "preset-dir", value_name = "DIR")]
    preset_dirs: Vec<PathBuf>,

    #[arg(long, default_value_t = false)]
    preview_only: bool,

    /// Print where every alias lands in the parameter layout.
    #[arg(long, default_value_t = false)]
    validate: bool,

    /// List library presets closest to the loaded patch.
    #[arg(long, default_value_t = false)]
    similar: bool,

    /// Print the request outcome as JSON on stdout.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let prompt = read_prompt(&args)?;

    let mut config = ClaudeConfig::from_env();
    if let Some(path) = args.api_key_file.as_deref() {
        config.api_key = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read api key file {}", path.display()))?
            .trim()
            .to_string();
    }
    if let Some(model) = args.model.as_deref() {
        config.model = model.trim().to_string();
    }
    tracing::debug!(?config, "claude config");

    let mut db = VectorDatabase::new();
    if !args.preset_dirs.is_empty() {
        let loaded = db.build_from_dirs(args.preset_dirs.as_slice());
        tracing::info!(presets = loaded, "preset library loaded");
    }
    let db = Arc::new(db);

    let mut client = ClaudeClient::new(config)?;
    if !db.is_empty() {
        client = client.with_vector_database(Arc::clone(&db));
    }

    let mut synth = InMemorySynth::with_default_layout();
    let mut main_loop = MainLoop::new(Arc::new(client), &synth);

    if args.validate {
        let report = validate_alias_map(main_loop.mapper().resolver());
        eprintln!("validator:");
        for (alias, line) in report.iter() {
            eprintln!("  {alias}: {line}");
        }
        eprintln!("  missing: {}", missing_aliases(&report));
    }

    if args.similar {
        print_similar(&db, &synth, &main_loop);
    }

    let mut request = if args.modify {
        PatchRequest::modify(prompt)
    } else {
        PatchRequest::generate(prompt)
    };
    if args.preview_only {
        request = request.preview_only();
    }

    let slot: Rc<RefCell<Option<RequestOutcome>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&slot);
    let request_id = main_loop.submit(&synth, request, move |outcome| {
        *sink.borrow_mut() = Some(outcome);
    });
    tracing::info!(request_id, "request submitted");

    let outcome = loop {
        main_loop.tick(&mut synth);
        if let Some(outcome) = slot.borrow_mut().take() {
            break outcome;
        }
        tokio::time::sleep(TICK_INTERVAL).await;
    };
    main_loop.shutdown();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    let (response_text, modifications) = match &outcome.response {
        PatchResponse::Success {
            response_text,
            modifications,
        } => (response_text, modifications),
        PatchResponse::Failure { msg, code } => {
            return Err(anyhow::anyhow!("request failed ({code:?}): {msg}"));
        }
    };

    eprintln!("\nresponse:\n{}\n", response_text.trim_end());

    let sanitized = sanitize_modifications(modifications.clone());
    eprintln!("qc:");
    print_qc(modifications, &sanitized);

    match outcome.applied.as_ref() {
        Some(report) => print_report(report),
        None => {
            eprintln!("preview_only=true (not applying to synth)");
            for m in &sanitized {
                eprintln!("  {:<28} = {:.3}", m.name, m.value);
            }
        }
    }

    Ok(())
}

fn read_prompt(args: &Args) -> anyhow::Result<String> {
    if let Some(p) = args.prompt.clone() {
        return Ok(p);
    }
    let path = args
        .prompt_file
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("missing --prompt or --prompt-file"))?;
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read prompt file {}", path.display()))
}

fn print_similar(db: &VectorDatabase, synth: &InMemorySynth, main_loop: &MainLoop) {
    if db.is_empty() {
        eprintln!("similar: no preset library loaded (use --preset-dir)");
        return;
    }
    let features = snapshot_features(synth, main_loop.mapper().resolver());
    let query = PresetVector::from_features(&features, None);
    eprintln!("similar to loaded patch:");
    for hit in db.find_similar_patches(&query, SIMILAR_RESULTS) {
        eprintln!(
            "  {:.3}  {} ({})",
            hit.cosine_similarity(&query),
            hit.name,
            hit.category
        );
    }
}

fn print_qc(raw: &[ParameterModification], sanitized: &[ParameterModification]) {
    let mut warnings: Vec<String> = Vec::new();

    if raw.is_empty() {
        warnings.push("model reply contained no PARAMETERS block".to_string());
    }
    if raw.len() != sanitized.len() {
        warnings.push(format!(
            "sanitize changed model param count: raw={} sanitized={}",
            raw.len(),
            sanitized.len()
        ));
    }

    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    for m in raw {
        *seen.entry(m.name.trim().to_lowercase()).or_default() += 1;
    }
    for (name, count) in seen.iter().filter(|(_, c)| **c > 1) {
        warnings.push(format!("'{name}' set {count} times (last value kept)"));
    }

    for m in sanitized {
        if !(0.0..=1.0).contains(&m.value) && !m.name.to_ascii_lowercase().contains("_type") {
            warnings.push(format!(
                "{} = {} is outside [0, 1] (read as a plain value)",
                m.name, m.value
            ));
        }
    }

    eprintln!("  raw={} sanitized={}", raw.len(), sanitized.len());
    if warnings.is_empty() {
        eprintln!("  warnings: none");
    } else {
        eprintln!("  warnings:");
        for w in warnings {
            eprintln!("    - {w}");
        }
    }
}

fn print_report(report: &ApplyReport) {
    eprintln!(
        "applied {} of {}:",
        report.applied_count(),
        report.applied_count() + report.failed.len()
    );
    for a in &report.applied {
        eprintln!(
            "  {:<24} -> {:<24} {:.3} -> {:.3}",
            a.requested, a.resolved, a.old_value, a.new_value
        );
    }
    if !report.failed.is_empty() {
        eprintln!("unapplied:");
        for f in &report.failed {
            eprintln!("  {} = {} ({})", f.name, f.value, f.reason);
        }
    }
}
