//! flowsmith command line
//!
//! Results go to stdout, logs to stderr.

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use flowsmith_artifact::ArtifactBundle;
use flowsmith_catalog::Complexity;
use flowsmith_classifier::{ClassificationHints, ClassifyError};
use flowsmith_composer::{ComposeError, ProjectSpec};
use flowsmith_core::{CoordinationController, ErrorKind, FlowsmithConfig, PipelineError};
use flowsmith_validator::ValidateError;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn cli() -> Command {
    Command::new("flowsmith")
        .version(flowsmith_core::VERSION)
        .about("Classify requirements, scaffold pattern bundles and validate them")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (TOML)"),
        )
        .arg(
            Arg::new("text")
                .long("text")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print plain text instead of JSON"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .default_value("info")
                .help("Log level when RUST_LOG is unset"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON"),
        )
        .subcommand(
            hint_args(requirement_arg(Command::new("classify")))
                .about("Recommend a pattern for a requirement"),
        )
        .subcommand(
            project_args(hint_args(requirement_arg(Command::new("compose"))))
                .about("Classify and compose a bundle")
                .arg(
                    Arg::new("out")
                        .long("out")
                        .value_parser(value_parser!(PathBuf))
                        .help("Also write the artifacts under this directory"),
                ),
        )
        .subcommand(
            Command::new("validate")
                .about("Validate a bundle read from a JSON file")
                .arg(
                    Arg::new("bundle")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Bundle file"),
                ),
        )
        .subcommand(
            project_args(hint_args(requirement_arg(Command::new("run"))))
                .about("Drive a full coordination run"),
        )
}

fn requirement_arg(command: Command) -> Command {
    command.arg(
        Arg::new("requirement")
            .required(true)
            .help("Requirement text"),
    )
}

fn hint_args(command: Command) -> Command {
    command
        .arg(Arg::new("force").long("force").help("Pattern to force"))
        .arg(
            Arg::new("exclude")
                .long("exclude")
                .action(ArgAction::Append)
                .help("Pattern to exclude (repeatable)"),
        )
        .arg(
            Arg::new("complexity")
                .long("complexity")
                .value_parser(value_parser!(Complexity))
                .help("Requested complexity: simple, enhanced or advanced"),
        )
}

fn project_args(command: Command) -> Command {
    command
        .arg(
            Arg::new("name")
                .long("name")
                .default_value("workflow")
                .help("Project name"),
        )
        .arg(
            Arg::new("description")
                .long("description")
                .default_value("")
                .help("Project description"),
        )
}

fn requirement(args: &ArgMatches) -> anyhow::Result<&str> {
    args.get_one::<String>("requirement")
        .map(String::as_str)
        .context("missing requirement text")
}

fn hints(args: &ArgMatches) -> ClassificationHints {
    ClassificationHints {
        forced_pattern: args.get_one::<String>("force").cloned(),
        excluded_patterns: args
            .get_many::<String>("exclude")
            .map(|values| values.cloned().collect())
            .unwrap_or_default(),
        complexity: args.get_one::<Complexity>("complexity").copied(),
    }
}

fn project(args: &ArgMatches) -> ProjectSpec {
    let text = |id: &str| args.get_one::<String>(id).cloned().unwrap_or_default();
    let project = ProjectSpec::new(text("name")).with_description(text("description"));
    match args.get_one::<Complexity>("complexity") {
        Some(&complexity) => project.with_complexity(complexity),
        None => project,
    }
}

fn main() -> ExitCode {
    let matches = cli().get_matches();
    let level = matches
        .get_one::<String>("log-level")
        .map_or("info", String::as_str);
    init_tracing(level, matches.get_flag("log-json"));

    match run(&matches) {
        Ok(code) => code,
        Err(err) => {
            match error_kind(&err) {
                Some(kind) => eprintln!("error[{kind}]: {err:#}"),
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn error_kind(err: &anyhow::Error) -> Option<ErrorKind> {
    if let Some(e) = err.downcast_ref::<PipelineError>() {
        return Some(e.kind());
    }
    if let Some(e) = err.downcast_ref::<ClassifyError>() {
        return Some(e.kind());
    }
    if let Some(e) = err.downcast_ref::<ComposeError>() {
        return Some(e.kind());
    }
    err.downcast_ref::<ValidateError>().map(ValidateError::kind)
}

fn init_tracing(level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<FlowsmithConfig> {
    match path {
        Some(path) => FlowsmithConfig::from_path(path)
            .with_context(|| format!("loading {}", path.display())),
        None => Ok(FlowsmithConfig::default()),
    }
}

fn run(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    let config = load_config(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    let text = matches.get_flag("text");

    match matches.subcommand() {
        Some(("classify", args)) => {
            let recommendation = config.classifier()?.classify(requirement(args)?, &hints(args))?;
            let route = recommendation.route(config.controller.confidence_threshold);
            if text {
                println!(
                    "{} confidence={:.2} ambiguous={} route={route:?}",
                    recommendation.primary(),
                    recommendation.confidence(),
                    recommendation.is_ambiguous()
                );
                for line in recommendation.rationale() {
                    println!("  {line}");
                }
            } else {
                print_json(&serde_json::json!({
                    "recommendation": recommendation,
                    "route": route,
                }))?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("compose", args)) => {
            let recommendation = config.classifier()?.classify(requirement(args)?, &hints(args))?;
            let composition = config.composer().compose(&recommendation, &project(args))?;
            if let Some(dir) = args.get_one::<PathBuf>("out") {
                write_bundle(&composition.bundle, dir)?;
            }
            if text {
                println!(
                    "{} {} ({} nodes, {} edges)",
                    composition.bundle.project(),
                    composition.bundle.fingerprint().short(),
                    composition.graph.node_count(),
                    composition.graph.edge_count()
                );
                for artifact in composition.bundle.iter() {
                    println!("  {}", artifact.path());
                }
            } else {
                print_json(&composition)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        Some(("validate", args)) => {
            let path = args
                .get_one::<PathBuf>("bundle")
                .context("missing bundle path")?;
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let bundle = ArtifactBundle::from_json(&json).context("bundle is not valid JSON")?;
            let result = config.validator().validate(&bundle)?;
            if text {
                for issue in result.issues() {
                    println!("{issue}");
                }
                println!("valid: {}", result.is_valid());
            } else {
                print_json(&result)?;
            }
            Ok(if result.is_valid() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Some(("run", args)) => {
            let controller = CoordinationController::from_config(&config)?;
            let run_id = controller.submit(requirement(args)?, hints(args), project(args))?;
            let status = controller.get_status(run_id)?;
            if text {
                println!("{run_id} {}", status.phase);
                if let Some(reason) = &status.blocked_reason {
                    println!("  {reason}");
                }
            } else {
                print_json(&status)?;
            }
            Ok(ExitCode::SUCCESS)
        }
        _ => {
            cli().print_help()?;
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn write_bundle(bundle: &ArtifactBundle, dir: &Path) -> anyhow::Result<()> {
    for artifact in bundle.iter() {
        let path = dir.join(artifact.path());
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, artifact.source())
            .with_context(|| format!("writing {}", path.display()))?;
    }
    let manifest: String = bundle
        .dependencies()
        .iter()
        .map(|d| format!("{}{}\n", d.name, d.version.as_deref().unwrap_or_default()))
        .collect();
    std::fs::write(dir.join("requirements.txt"), manifest)
        .with_context(|| format!("writing {}", dir.join("requirements.txt").display()))?;
    tracing::info!(dir = %dir.display(), artifacts = bundle.len(), "bundle written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn hint_flags_parse() {
        let matches = cli()
            .try_get_matches_from([
                "flowsmith",
                "run",
                "Summarize tickets",
                "--force",
                "workflow",
                "--exclude",
                "RAG",
                "--exclude",
                "AGENT",
                "--complexity",
                "advanced",
                "--text",
            ])
            .unwrap();
        assert!(matches.get_flag("text"));
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "run");
        assert_eq!(requirement(args).unwrap(), "Summarize tickets");

        let hints = hints(args);
        assert_eq!(hints.forced_pattern.as_deref(), Some("workflow"));
        assert_eq!(hints.excluded_patterns, vec!["RAG", "AGENT"]);
        assert_eq!(hints.complexity, Some(Complexity::Advanced));
        assert_eq!(project(args).complexity, Complexity::Advanced);
        assert_eq!(project(args).name, "workflow");
    }
}
