use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chart_config::api::{ChartConfigResolver, ChartSpecification, TransformOutcome};
use chart_config::core::{FileBoundaryLoader, RegionCompleter};

const USAGE: &str = "usage: resolve_chart_spec --spec <path> [--geo-dir <dir>] [--contract]";

#[derive(Debug)]
struct CliArgs {
    spec: PathBuf,
    geo_dir: Option<PathBuf>,
    contract: bool,
}

fn main() {
    let _ = chart_config::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let input = fs::read_to_string(&args.spec)
        .map_err(|e| format!("failed to read `{}`: {e}", args.spec.display()))?;
    let spec = ChartSpecification::from_json_compat_str(&input).map_err(|e| e.to_string())?;

    let mut resolver = ChartConfigResolver::default();
    if let Some(geo_dir) = &args.geo_dir {
        let loader = Arc::new(FileBoundaryLoader::new(geo_dir));
        resolver = resolver.with_region_completer(Arc::new(RegionCompleter::new(loader)));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .map_err(|e| format!("failed to start runtime: {e}"))?;
    let config = match runtime.block_on(resolver.resolve(&spec)) {
        TransformOutcome::Resolved(config) => config,
        TransformOutcome::Failed { error, .. } => return Err(error.to_string()),
    };

    let output = if args.contract {
        config.to_json_contract_v1_pretty()
    } else {
        config.to_json_pretty()
    }
    .map_err(|e| e.to_string())?;
    println!("{output}");
    Ok(())
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut spec = None::<PathBuf>;
    let mut geo_dir = None::<PathBuf>;
    let mut contract = false;

    while let Some(flag) = args.next() {
        match flag.as_str() {
            "--spec" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --spec".to_owned())?;
                spec = Some(PathBuf::from(value));
            }
            "--geo-dir" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --geo-dir".to_owned())?;
                geo_dir = Some(PathBuf::from(value));
            }
            "--contract" => contract = true,
            "--help" | "-h" => return Err(USAGE.to_owned()),
            _ => return Err(format!("unknown argument `{flag}`")),
        }
    }

    Ok(CliArgs {
        spec: spec.ok_or_else(|| format!("missing --spec\n{USAGE}"))?,
        geo_dir,
        contract,
    })
}
