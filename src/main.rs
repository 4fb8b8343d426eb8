//! balcony-advisor entry point: CLI wiring around the recommendation engine.

use std::fs;
use std::path::Path;
use std::process;

use anyhow::Context;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use balcony_advisor::catalog::{
    CatalogSource, JsonFileCatalog, LoadedCatalog, builtin_catalog, load_catalog,
};
use balcony_advisor::config::Assumptions;
use balcony_advisor::engine::RecommendationEngine;
use balcony_advisor::io::export::export_csv;
use balcony_advisor::irradiance::{FileIrradiance, IrradianceData};
use balcony_advisor::model::QuizAnswers;

/// Parsed CLI arguments.
struct CliArgs {
    profile_path: Option<String>,
    preset: Option<String>,
    assumptions_path: Option<String>,
    catalog_path: Option<String>,
    irradiance_path: Option<String>,
    csv_out: Option<String>,
    json: bool,
    #[cfg(feature = "api")]
    serve: bool,
    #[cfg(feature = "api")]
    port: u16,
}

fn print_help() {
    eprintln!("balcony-advisor: balcony solar product recommendations");
    eprintln!();
    eprintln!("Usage: balcony-advisor --profile <path> [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --profile <path>         Quiz answers (TOML, or JSON by extension)");
    eprintln!("  --preset <name>          Assumption preset ({})", Assumptions::PRESETS.join(", "));
    eprintln!("  --assumptions <path>     Load assumptions from TOML file");
    eprintln!("  --catalog <path>         Product catalog JSON (default: built-in)");
    eprintln!("  --irradiance <path>      Pre-fetched irradiance JSON (native or PVGIS)");
    eprintln!("  --csv-out <path>         Export rankings to CSV");
    eprintln!("  --json                   Print the full response as JSON");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server");
        eprintln!("  --port <u16>             API server port (default: 3000)");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --assumptions or --preset is given, the germany preset is used.");
    eprintln!("Log verbosity follows RUST_LOG (default: info).");
}

/// Returns the value following flag `args[*i]`, exiting if it is missing.
fn flag_value(args: &[String], i: &mut usize, what: &str) -> String {
    let flag = &args[*i];
    *i += 1;
    match args.get(*i) {
        Some(v) => v.clone(),
        None => {
            eprintln!("error: {flag} requires a {what} argument");
            process::exit(1);
        }
    }
}

fn parse_args() -> CliArgs {
    let args: Vec<String> = std::env::args().collect();
    let mut cli = CliArgs {
        profile_path: None,
        preset: None,
        assumptions_path: None,
        catalog_path: None,
        irradiance_path: None,
        csv_out: None,
        json: false,
        #[cfg(feature = "api")]
        serve: false,
        #[cfg(feature = "api")]
        port: 3000,
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                process::exit(0);
            }
            "--profile" => cli.profile_path = Some(flag_value(&args, &mut i, "path")),
            "--preset" => cli.preset = Some(flag_value(&args, &mut i, "name")),
            "--assumptions" => cli.assumptions_path = Some(flag_value(&args, &mut i, "path")),
            "--catalog" => cli.catalog_path = Some(flag_value(&args, &mut i, "path")),
            "--irradiance" => cli.irradiance_path = Some(flag_value(&args, &mut i, "path")),
            "--csv-out" => cli.csv_out = Some(flag_value(&args, &mut i, "path")),
            "--json" => cli.json = true,
            #[cfg(feature = "api")]
            "--serve" => cli.serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                let raw = flag_value(&args, &mut i, "u16");
                if let Ok(p) = raw.parse::<u16>() {
                    cli.port = p;
                } else {
                    eprintln!("error: --port value \"{raw}\" is not a valid u16");
                    process::exit(1);
                }
            }
            other => {
                eprintln!("error: unknown argument \"{other}\"");
                print_help();
                process::exit(1);
            }
        }
        i += 1;
    }

    cli
}

/// Loads assumptions: `--assumptions` takes priority, then `--preset`, then
/// the germany default. Exits on invalid input.
fn load_assumptions(cli: &CliArgs) -> Assumptions {
    let loaded = if let Some(ref path) = cli.assumptions_path {
        Assumptions::from_toml_file(Path::new(path))
    } else if let Some(ref name) = cli.preset {
        Assumptions::from_preset(name)
    } else {
        Ok(Assumptions::germany())
    };
    let assumptions = match loaded {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let errors = assumptions.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    assumptions
}

fn load_answers(path: &Path) -> anyhow::Result<QuizAnswers> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("cannot read profile \"{}\"", path.display()))?;
    let answers = if path.extension().is_some_and(|ext| ext == "json") {
        serde_json::from_str(&raw)
            .with_context(|| format!("malformed profile \"{}\"", path.display()))?
    } else {
        toml::from_str(&raw).with_context(|| format!("malformed profile \"{}\"", path.display()))?
    };
    Ok(answers)
}

fn load_products(cli: &CliArgs) -> LoadedCatalog {
    match cli.catalog_path {
        Some(ref path) => load_catalog(&JsonFileCatalog::new(path)),
        None => LoadedCatalog {
            products: builtin_catalog(),
            source: CatalogSource::Builtin,
        },
    }
}

/// Reads the irradiance payload if one was given. Failures fall back to the
/// static tables.
fn load_irradiance(cli: &CliArgs) -> Option<IrradianceData> {
    let path = cli.irradiance_path.as_ref()?;
    match FileIrradiance::new(path).load() {
        Ok(data) => Some(data),
        Err(e) => {
            warn!("{e}, using static factors");
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = parse_args();

    #[cfg(feature = "api")]
    let serving = cli.serve;
    #[cfg(not(feature = "api"))]
    let serving = false;

    if cli.profile_path.is_none() && !serving {
        eprintln!("error: --profile is required");
        print_help();
        process::exit(1);
    }

    let engine = RecommendationEngine::new(load_assumptions(&cli));
    let catalog = load_products(&cli);

    if let Some(ref path) = cli.profile_path {
        let answers = load_answers(Path::new(path))?;
        let irradiance = load_irradiance(&cli);
        let response = engine.recommend_answers(&answers, &catalog.products, irradiance.as_ref());

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&response)?);
        } else {
            println!("{response}");
        }

        if let Some(ref out) = cli.csv_out {
            export_csv(&response.rankings, Path::new(out))
                .with_context(|| format!("failed to write CSV \"{out}\""))?;
            eprintln!("Rankings written to {out}");
        }
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        use balcony_advisor::api::AppState;
        use balcony_advisor::irradiance::{IrradianceProvider, NoIrradiance};

        let irradiance: Box<dyn IrradianceProvider + Send + Sync> = match cli.irradiance_path {
            Some(ref path) => Box::new(FileIrradiance::new(path)),
            None => Box::new(NoIrradiance),
        };
        let state = Arc::new(AppState {
            engine,
            catalog,
            irradiance,
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
        rt.block_on(balcony_advisor::api::serve(state, addr))?;
    }

    Ok(())
}
