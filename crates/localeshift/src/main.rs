use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand, ValueEnum};
use localeshift_core::config::{LocaleshiftConfig, load_config};
use localeshift_core::discover::{
    derive_move_routes, discover_locale_folders, discover_wrap_folders,
};
use localeshift_core::inject::{InjectOptions, MARKET_RESEARCH_REPLACEMENTS, inject_logging};
use localeshift_core::mover::{MoveRoute, run_moves};
use localeshift_core::report::{BatchReport, MARK_FAIL, MARK_OK};
use localeshift_core::runtime::{
    InitOptions, PathOverrides, ResolutionContext, ResolvedPaths, init_layout,
    normalize_for_display, resolve_paths,
};
use localeshift_core::wrappers::{WrapperStrategy, run_wrappers};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "localeshift",
    version,
    about = "Maintenance passes for migrating en/ru page variants to [locale] routing"
)]
struct Cli {
    #[arg(long, global = true, value_name = "PATH")]
    project_root: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Print resolved runtime diagnostics")]
    diagnostics: bool,
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity")]
    verbose: u8,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
struct RuntimeOptions {
    project_root: Option<PathBuf>,
    config: Option<PathBuf>,
    diagnostics: bool,
    format: OutputFormat,
}

impl RuntimeOptions {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            project_root: cli.project_root.clone(),
            config: cli.config.clone(),
            diagnostics: cli.diagnostics,
            format: cli.format,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Write a commented .localeshift/config.toml with the built-in lists")]
    Init(InitArgs),
    #[command(about = "Print the effective folders, routes and injector target")]
    Plan,
    #[command(
        name = "inject-logging",
        about = "Insert [Market Research] console.log diagnostics into the page component"
    )]
    InjectLogging(InjectArgs),
    #[command(about = "Create page.tsx wrappers selecting page.en.tsx or page.ru.tsx")]
    Wrap(WrapArgs),
    #[command(about = "Move locale page variants under app/[locale]/")]
    Move(MoveArgs),
}

#[derive(Debug, Args)]
struct InitArgs {
    #[arg(long, help = "Overwrite an existing config file")]
    force: bool,
}

#[derive(Debug, Args)]
struct InjectArgs {
    #[arg(long, value_name = "PATH", help = "Target file (default from config)")]
    target: Option<PathBuf>,
    #[arg(long, help = "Abort without writing when any landmark is missing")]
    strict: bool,
}

#[derive(Debug, Args)]
struct WrapArgs {
    #[arg(long, value_enum, default_value_t = StrategyArg::Params)]
    strategy: StrategyArg,
    #[arg(long, help = "Scan app/ for folders with both locale variants")]
    discover: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Branch on params.locale; keep existing wrappers
    Params,
    /// Branch on usePathname(); always rewrite wrappers
    Pathname,
}

impl From<StrategyArg> for WrapperStrategy {
    fn from(value: StrategyArg) -> Self {
        match value {
            StrategyArg::Params => WrapperStrategy::Params,
            StrategyArg::Pathname => WrapperStrategy::Pathname,
        }
    }
}

#[derive(Debug, Args)]
struct MoveArgs {
    #[arg(long, help = "Derive routes from folders discovered under app/")]
    discover: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let runtime = RuntimeOptions::from_cli(&cli);

    match cli.command {
        Some(Commands::Init(args)) => run_init(&runtime, args),
        Some(Commands::Plan) => run_plan(&runtime),
        Some(Commands::InjectLogging(args)) => run_inject_logging(&runtime, args),
        Some(Commands::Wrap(args)) => run_wrap(&runtime, args),
        Some(Commands::Move(args)) => run_move(&runtime, args),
        None => {
            let mut command = Cli::command();
            command.print_help()?;
            println!();
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn run_init(runtime: &RuntimeOptions, args: InitArgs) -> Result<()> {
    let paths = resolve_runtime_paths(runtime)?;
    let report = init_layout(&paths, &InitOptions { force: args.force })?;

    println!("Initialized localeshift config");
    println!("project_root: {}", normalize_for_display(&paths.project_root));
    println!("config_path: {}", normalize_for_display(&paths.config_path));
    println!("created_dirs: {}", report.created_dirs.len());
    if report.wrote_config {
        println!("wrote_config: yes");
    } else {
        println!("wrote_config: no (already exists, use --force to overwrite)");
    }
    print_diagnostics(runtime, &paths);
    Ok(())
}

#[derive(Debug, Serialize)]
struct PlanView {
    project_root: String,
    config_path: String,
    config_exists: bool,
    inject_target: String,
    params_folders: Vec<String>,
    pathname_folders: Vec<String>,
    routes: Vec<MoveRoute>,
}

fn run_plan(runtime: &RuntimeOptions) -> Result<()> {
    let paths = resolve_runtime_paths(runtime)?;
    let config = load_runtime_config(&paths)?;
    let plan = PlanView {
        project_root: normalize_for_display(&paths.project_root),
        config_path: normalize_for_display(&paths.config_path),
        config_exists: paths.config_path.exists(),
        inject_target: config.inject_target().to_string(),
        params_folders: config.wrap_folders(WrapperStrategy::Params),
        pathname_folders: config.wrap_folders(WrapperStrategy::Pathname),
        routes: config.move_routes(),
    };

    if runtime.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    println!("plan");
    println!("project_root: {}", plan.project_root);
    println!(
        "config_path: {} ({})",
        plan.config_path,
        if plan.config_exists { "found" } else { "missing" }
    );
    println!("inject.target: {}", plan.inject_target);
    print_folder_list("wrap.params", &plan.params_folders);
    print_folder_list("wrap.pathname", &plan.pathname_folders);
    println!("move.routes.count: {}", plan.routes.len());
    for route in &plan.routes {
        println!("move.route: {} -> {}", route.from, route.to);
    }
    print_diagnostics(runtime, &paths);
    Ok(())
}

fn run_inject_logging(runtime: &RuntimeOptions, args: InjectArgs) -> Result<()> {
    let paths = resolve_runtime_paths(runtime)?;
    let config = load_runtime_config(&paths)?;
    let target = match args.target {
        Some(target) => paths.resolve(target),
        None => paths.resolve(config.inject_target()),
    };
    debug!(path = %target.display(), strict = args.strict, "injecting logging");

    let report = inject_logging(
        &target,
        MARKET_RESEARCH_REPLACEMENTS,
        &InjectOptions {
            strict: args.strict,
        },
    )?;

    if runtime.format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let unmatched = report.unmatched();
    for name in &unmatched {
        println!("{MARK_FAIL} Landmark not found: {name} (left unchanged)");
    }
    println!(
        "{MARK_OK} Applied {}/{} replacements to {} (+{} lines)",
        report.applied(),
        report.replacements.len(),
        paths.display(&report.target),
        report.inserted_lines
    );
    println!("{}", report.summary_line());
    print_diagnostics(runtime, &paths);
    Ok(())
}

fn run_wrap(runtime: &RuntimeOptions, args: WrapArgs) -> Result<()> {
    let paths = resolve_runtime_paths(runtime)?;
    let strategy = WrapperStrategy::from(args.strategy);
    let folders = if args.discover {
        discover_wrap_folders(&paths, strategy)?
    } else {
        load_runtime_config(&paths)?.wrap_folders(strategy)
    };
    debug!(
        strategy = strategy.as_str(),
        folders = folders.len(),
        "creating locale wrappers"
    );

    let report = run_wrappers(&paths, &folders, strategy);
    print_batch_report(runtime, &report)?;
    print_diagnostics(runtime, &paths);
    Ok(())
}

fn run_move(runtime: &RuntimeOptions, args: MoveArgs) -> Result<()> {
    let paths = resolve_runtime_paths(runtime)?;
    let routes = if args.discover {
        derive_move_routes(&discover_locale_folders(&paths)?)
    } else {
        load_runtime_config(&paths)?.move_routes()
    };
    debug!(routes = routes.len(), "moving locale pages");

    let report = run_moves(&paths, &routes);
    print_batch_report(runtime, &report)?;
    print_diagnostics(runtime, &paths);
    Ok(())
}

fn print_batch_report(runtime: &RuntimeOptions, report: &BatchReport) -> Result<()> {
    match runtime.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(report).context("failed to render report as JSON")?
        ),
    }
    Ok(())
}

fn print_folder_list(prefix: &str, folders: &[String]) {
    println!("{prefix}.count: {}", folders.len());
    for folder in folders {
        println!("{prefix}.folder: {folder}");
    }
}

fn print_diagnostics(runtime: &RuntimeOptions, paths: &ResolvedPaths) {
    if runtime.diagnostics && runtime.format == OutputFormat::Text {
        println!("\n[diagnostics]\n{}", paths.diagnostics());
    }
}

fn load_runtime_config(paths: &ResolvedPaths) -> Result<LocaleshiftConfig> {
    load_config(&paths.config_path)
}

fn resolve_runtime_paths(runtime: &RuntimeOptions) -> Result<ResolvedPaths> {
    dotenvy::dotenv().ok();

    let context = ResolutionContext::from_process()?;
    let overrides = PathOverrides {
        project_root: runtime.project_root.clone(),
        config: runtime.config.clone(),
    };

    let initial = resolve_paths(&context, &overrides)?;
    let project_env = initial.project_root.join(".env");
    if project_env.exists() {
        let _ = dotenvy::from_path_override(&project_env);
    }

    resolve_paths(&context, &overrides)
}
