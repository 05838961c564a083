mod constants;

use std::collections::BTreeSet;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser};
use scanmap_core::analytics::{AnalysisSummary, GroupCount};
use scanmap_core::{filter_by_cutoff, Config, ConfigError, FilterCriteria, GeoPoint, RadioType, SecurityFlags, TimeRange};
use scanmap_ingest::{IngestStats, LoadStatus, Progress, Session, SqliteSource};
use serde::Serialize;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use constants::*;

#[derive(Parser, Debug)]
#[command(about = "Load a WiGLE-format wardriving database and summarize what was seen")]
struct Args {
    #[arg(long)]
    db: PathBuf,

    #[arg(long)]
    config: Option<PathBuf>,

    /// Radio type codes to show, e.g. `WB` for WiFi and Bluetooth.
    #[arg(long)]
    types: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    min_signal: Option<i32>,

    #[arg(long)]
    search: Option<String>,

    /// Security classes to hide: open, wep, wpa, wpa3, hidden.
    #[arg(long, value_delimiter = ',')]
    hide: Vec<String>,

    #[arg(long)]
    cutoff_ms: Option<i64>,

    #[arg(long)]
    top: Option<usize>,

    #[arg(long)]
    chunk_size: Option<usize>,

    #[arg(long)]
    ceiling: Option<usize>,

    #[arg(long)]
    json: bool,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    fingerprint: String,
    loaded_at_ms: i64,
    stride: usize,
    stats: IngestStats,
    time_range: TimeRange,
    cutoff_ms: i64,
    visible_networks: usize,
    visible_observations: usize,
    filtered_networks: usize,
    focus: Option<GeoPoint>,
    summary: AnalysisSummary,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let cfg = match build_config(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    let criteria = match build_criteria(&args) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let source = match SqliteSource::open(&args.db) {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, db = %args.db.display(), "open failed");
            eprintln!("Failed to load database.");
            return ExitCode::FAILURE;
        }
    };

    let mut session = Session::new(cfg);
    {
        let handle = session.start_load(source);
        let cancel = handle.cancel_flag();
        if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
            warn!(error = %e, "Ctrl-C handler not installed");
        }
        for p in handle.progress().iter() {
            print_progress(&p);
        }
        eprintln!();
    }

    match session.finish_load() {
        Ok(LoadStatus::Loaded) => {}
        Ok(LoadStatus::Cancelled) => return ExitCode::from(EXIT_CANCELLED),
        Err(e) => {
            error!(error = %e, "load failed");
            eprintln!("Failed to load database.");
            return ExitCode::FAILURE;
        }
    }

    let Some(report) = build_report(&session, &criteria, args.cutoff_ms) else {
        eprintln!("Failed to load database.");
        return ExitCode::FAILURE;
    };
    info!(fingerprint = %report.fingerprint, "report ready");

    if args.json {
        let text = serde_json::to_string_pretty(&report)
            .unwrap_or_else(|_| "{\"error\":\"failed to serialize\"}".to_string());
        println!("{text}");
        return ExitCode::SUCCESS;
    }

    println!("Database: {}", args.db.display());
    print_report(&report);
    ExitCode::SUCCESS
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn build_config(args: &Args) -> Result<Config, ConfigError> {
    let mut cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(n) = args.chunk_size {
        cfg.chunk_size = n;
    }
    if let Some(n) = args.ceiling {
        cfg.observation_ceiling = n;
    }
    if let Some(n) = args.top {
        cfg.top_n = n;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn build_criteria(args: &Args) -> Result<FilterCriteria, String> {
    let mut criteria = FilterCriteria::default().with_security(parse_hidden(&args.hide)?);
    if let Some(codes) = &args.types {
        criteria = criteria.with_types(parse_types(codes)?);
    }
    if let Some(level) = args.min_signal {
        criteria = criteria.with_min_signal(level);
    }
    if let Some(text) = &args.search {
        criteria = criteria.with_search(text.as_str());
    }
    Ok(criteria)
}

fn parse_types(codes: &str) -> Result<BTreeSet<RadioType>, String> {
    codes
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .map(|c| {
            let code = c.to_ascii_uppercase().to_string();
            RadioType::from_code(&code).ok_or_else(|| format!("unknown radio type code `{c}`"))
        })
        .collect()
}

fn parse_hidden(tokens: &[String]) -> Result<SecurityFlags, String> {
    let mut flags = SecurityFlags::default();
    for token in tokens {
        match token.trim().to_ascii_lowercase().as_str() {
            "" => {}
            "open" => flags.open = false,
            "wep" => flags.wep = false,
            "wpa" => flags.wpa = false,
            "wpa3" => flags.wpa3 = false,
            "hidden" => flags.hidden = false,
            other => {
                return Err(format!(
                    "unknown security class `{other}` (expected {})",
                    SECURITY_TOKENS.join(", ")
                ))
            }
        }
    }
    Ok(flags)
}

fn build_report(session: &Session, criteria: &FilterCriteria, cutoff_ms: Option<i64>) -> Option<Report> {
    let ds = session.dataset()?;
    let cutoff = cutoff_ms.unwrap_or(ds.time_range.max);
    let filtered = session.filtered(criteria);
    let visible = filter_by_cutoff(&filtered, cutoff);
    let snapshot = session.snapshot(cutoff)?;
    Some(Report {
        fingerprint: ds.fingerprint.clone(),
        loaded_at_ms: ds.loaded_at_ms,
        stride: ds.plan.stride,
        stats: ds.stats,
        time_range: ds.time_range,
        cutoff_ms: cutoff,
        visible_networks: visible.len(),
        visible_observations: snapshot.observations.len(),
        filtered_networks: filtered.len(),
        focus: session.focus_point(),
        summary: session.summary()?,
    })
}

fn progress_bar(percent: u8) -> String {
    let filled = PROGRESS_BAR_WIDTH * percent.min(100) as usize / 100;
    format!("{}{}", "#".repeat(filled), "-".repeat(PROGRESS_BAR_WIDTH - filled))
}

fn print_progress(p: &Progress) {
    eprint!("\r[{}] {:>3}% {:<40}", progress_bar(p.percent), p.percent, p.message);
}

fn print_report(r: &Report) {
    let s = &r.summary;
    println!(
        "Loaded {} networks, {} observations ({} skipped rows)",
        s.totals.networks, s.totals.observations, r.stats.skipped_rows
    );
    if r.stride > 1 {
        println!(
            "Note: observations sampled 1 in {} of {} rows",
            r.stride, r.stats.observation_rows_total
        );
    }
    if r.time_range.is_empty() {
        println!("Time range: none");
    } else {
        println!(
            "Time range: {} .. {} ({:.1} h)",
            r.time_range.min,
            r.time_range.max,
            r.time_range.span_ms() as f64 / 3_600_000.0
        );
    }
    println!(
        "Cutoff {}: {} of {} filtered networks visible, {} observations",
        r.cutoff_ms, r.visible_networks, r.filtered_networks, r.visible_observations
    );
    match r.focus {
        Some(p) => println!("Focus: {:.4}, {:.4}", p.lat, p.lon),
        None => println!("Focus: no data"),
    }

    println!(
        "\nWiFi: {} ({} hidden, {} unique names)",
        s.totals.wifi, s.totals.hidden, s.totals.unique_ssids
    );
    print_groups("By type", &s.by_type);
    print_groups("By security (WiFi)", &s.by_security);
    print_groups("By band (WiFi)", &s.by_band);

    if !s.strongest.is_empty() {
        println!("\nStrongest:");
        for e in &s.strongest {
            println!("  {:>4} dBm  {:<32} {} ({})", e.level, e.ssid, e.bssid, e.radio_type.label());
        }
    }
    if !s.most_sighted.is_empty() {
        println!("\nMost sighted ({} observations unmatched):", s.unmatched_observations);
        for a in &s.most_sighted {
            println!("  {:>5}x  {:<32} {} ({})", a.sighting_count, a.ssid, a.bssid, a.radio_type.label());
        }
    }
    println!(
        "\nCoverage: {:.2} km2 ({})",
        s.coverage.area_km2, s.coverage.label
    );
    if !s.name_patterns.is_empty() {
        println!("\nName patterns:");
        for g in &s.name_patterns {
            println!("  {:<16} {:>5}  e.g. {}", g.label, g.count, g.examples.join(", "));
        }
    }
    if !s.findings.is_empty() {
        println!("\nFindings:");
        for f in &s.findings {
            println!("  - {}", f.message);
        }
    }
}

fn print_groups(title: &str, groups: &[GroupCount]) {
    if groups.is_empty() {
        return;
    }
    println!("\n{title}:");
    for g in groups {
        println!("  {:<14} {:>7} {:>6.1}%", g.label, g.count, g.percent);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanmap_ingest::{CancelFlag, MemorySource, NetworkRow, ObservationRow};

    const TEST_DB: &str = "scan.sqlite";

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["scanmap", "--db", TEST_DB];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    fn net(bssid: &str, t: &str, level: i32, caps: &str, last_seen: i64) -> NetworkRow {
        NetworkRow {
            radio_type: t.to_string(),
            lat: 48.8566,
            lon: 2.3522,
            level,
            ssid: Some(format!("cafe-{bssid}")),
            bssid: bssid.to_string(),
            last_seen,
            frequency: Some(2437),
            capabilities: Some(caps.to_string()),
        }
    }

    #[test]
    fn parses_type_codes() {
        let types = parse_types("wB,e").unwrap();
        assert_eq!(
            types,
            BTreeSet::from([RadioType::Wifi, RadioType::Bluetooth, RadioType::BluetoothLe])
        );
        assert!(parse_types("WX").is_err());
        assert!(parse_types("").unwrap().is_empty());
    }

    #[test]
    fn parses_hidden_classes() {
        let flags = parse_hidden(&["open".to_string(), " WPA3 ".to_string()]).unwrap();
        assert!(!flags.open && !flags.wpa3);
        assert!(flags.wep && flags.wpa && flags.hidden);
        assert!(parse_hidden(&["wpa2".to_string()]).is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let a = args(&["--top", "3", "--ceiling", "0", "--chunk-size", "50"]);
        let cfg = build_config(&a).unwrap();
        assert_eq!(cfg.top_n, 3);
        assert_eq!(cfg.observation_ceiling, 0);
        assert_eq!(cfg.chunk_size, 50);
        assert!(build_config(&args(&["--chunk-size", "0"])).is_err());
    }

    #[test]
    fn criteria_from_flags() {
        let a = args(&["--types", "W", "--min-signal", "-70", "--hide", "open,hidden", "--search", "Cafe"]);
        let c = build_criteria(&a).unwrap();
        assert_eq!(c.active_types, BTreeSet::from([RadioType::Wifi]));
        assert_eq!(c.min_signal, -70);
        assert_eq!(c.search_text, "Cafe");
        assert!(!c.security.open && !c.security.hidden && c.security.wpa);
    }

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0), "-".repeat(PROGRESS_BAR_WIDTH));
        assert_eq!(progress_bar(100), "#".repeat(PROGRESS_BAR_WIDTH));
        assert_eq!(progress_bar(50).matches('#').count(), PROGRESS_BAR_WIDTH / 2);
    }

    #[test]
    fn report_applies_filter_and_cutoff() {
        let mut session = Session::new(Config::default());
        let mut source = MemorySource::new(
            vec![
                net("01", "W", -50, "[WPA2-PSK-CCMP]", 100),
                net("02", "W", -80, "[ESS]", 200),
                net("03", "B", -60, "", 300),
            ],
            vec![ObservationRow {
                ordinal: 1,
                lat: 48.8566,
                lon: 2.3522,
                level: -55,
                radio_type: "W".to_string(),
                time: 150,
            }],
        );
        session.load(&mut source, &CancelFlag::new(), &mut |_| {}).unwrap();

        let a = args(&["--types", "W", "--min-signal", "-70"]);
        let criteria = build_criteria(&a).unwrap();
        let report = build_report(&session, &criteria, None).unwrap();
        assert_eq!(report.cutoff_ms, 300);
        assert_eq!(report.filtered_networks, 1);
        assert_eq!(report.visible_networks, 1);
        assert_eq!(report.summary.totals.networks, 3);

        let early = build_report(&session, &FilterCriteria::default(), Some(120)).unwrap();
        assert_eq!(early.visible_networks, 1);
        assert_eq!(early.visible_observations, 0);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["filteredNetworks"], 1);
        assert!(json["summary"]["byType"].is_array());
    }

    #[test]
    fn report_needs_a_dataset() {
        let session = Session::new(Config::default());
        assert!(build_report(&session, &FilterCriteria::default(), None).is_none());
    }
}
