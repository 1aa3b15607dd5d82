// crates/trip-planner-cli/src/main.rs
// ============================================================================
// Module: Trip Planner CLI Entry Point
// Description: Command dispatcher for the trip planner server and tools.
// Purpose: Serve the API, plan trips, and validate configuration locally.
// Dependencies: clap, tokio, trip-planner-core, trip-planner-server
// ============================================================================

//! ## Overview
//! `trip-planner` starts the HTTP API, plans a single trip against the
//! configured route service, simulates a trip from a saved route file, and
//! validates configuration. Every failure prints one line to stderr and exits
//! with a non-zero code.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use trip_planner_config::TripPlannerConfig;
use trip_planner_core::Coordinate;
use trip_planner_core::Route;
use trip_planner_core::RouteProvider;
use trip_planner_core::TripPlan;
use trip_planner_core::simulate_trip;
use trip_planner_routing::OsrmRouteProvider;
use trip_planner_routing::decode_route;
use trip_planner_server::TripPlannerServer;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum accepted route file size.
const MAX_ROUTE_FILE_BYTES: u64 = 64 * 1024 * 1024;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "trip-planner", version, disable_help_subcommand = true)]
struct Cli {
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the trip planner HTTP API.
    Serve(ServeCommand),
    /// Fetch a route and print the simulated trip plan.
    Plan(PlanCommand),
    /// Simulate a trip from a saved route file without network access.
    Simulate(SimulateCommand),
    /// Configuration utilities.
    Config {
        /// Selected config subcommand.
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Arguments for `serve`.
#[derive(Args, Debug)]
struct ServeCommand {
    /// Optional config file path (defaults to trip-planner.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `plan`.
#[derive(Args, Debug)]
struct PlanCommand {
    /// Current location as `lat,lon`.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, value_parser = parse_coordinate)]
    current: Coordinate,
    /// Pickup location as `lat,lon`.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, value_parser = parse_coordinate)]
    pickup: Coordinate,
    /// Dropoff location as `lat,lon`.
    #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true, value_parser = parse_coordinate)]
    dropoff: Coordinate,
    /// Hours already used in the current cycle.
    #[arg(long, value_name = "HOURS")]
    cycle_used: f64,
    /// Trip start (RFC 3339); defaults to now.
    #[arg(long, value_name = "RFC3339", value_parser = parse_start)]
    start: Option<OffsetDateTime>,
    /// Optional config file path (defaults to trip-planner.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Arguments for `simulate`.
#[derive(Args, Debug)]
struct SimulateCommand {
    /// Route JSON file (`geometry`, `distance` miles, `duration` hours).
    #[arg(long, value_name = "PATH")]
    route: PathBuf,
    /// Treat the route file as a raw OSRM `route` response.
    #[arg(long)]
    osrm: bool,
    /// Hours already used in the current cycle.
    #[arg(long, value_name = "HOURS")]
    cycle_used: f64,
    /// Trip start (RFC 3339); defaults to now.
    #[arg(long, value_name = "RFC3339", value_parser = parse_start)]
    start: Option<OffsetDateTime>,
    /// Optional config file path for HOS rule overrides.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Validate a trip planner configuration file.
    Validate(ConfigValidateCommand),
}

/// Arguments for `config validate`.
#[derive(Args, Debug)]
struct ConfigValidateCommand {
    /// Optional config file path (defaults to trip-planner.toml or env override).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// CLI error wrapper.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`].
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
async fn run() -> CliResult<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if !err.use_stderr() => {
            write_stdout_line(err.to_string().trim_end())
                .map_err(|err| CliError::new(output_error("stdout", &err)))?;
            return Ok(ExitCode::SUCCESS);
        }
        Err(err) => return Err(CliError::new(err.to_string().trim_end().to_string())),
    };

    match cli.command {
        Commands::Serve(command) => command_serve(command).await,
        Commands::Plan(command) => command_plan(command).await,
        Commands::Simulate(command) => command_simulate(&command),
        Commands::Config {
            command,
        } => command_config(&command),
    }
}

// ============================================================================
// SECTION: Serve Command
// ============================================================================

/// Executes the `serve` command.
async fn command_serve(command: ServeCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let server = tokio::task::spawn_blocking(move || TripPlannerServer::from_config(&config))
        .await
        .map_err(|err| CliError::new(format!("server init failed: init join failed: {err}")))?
        .map_err(|err| CliError::new(format!("server init failed: {err}")))?;
    write_stderr_line(&format!("trip-planner: listening on http://{}", server.bind_addr()))
        .map_err(|err| CliError::new(output_error("stderr", &err)))?;
    server.serve().await.map_err(|err| CliError::new(format!("server failed: {err}")))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Plan Commands
// ============================================================================

/// Executes the `plan` command.
async fn command_plan(command: PlanCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let limit = config.hos.cycle_limit_hours;
    if !(0.0..=limit).contains(&command.cycle_used) {
        return Err(CliError::new(format!("--cycle-used must be within [0, {limit}] hours")));
    }
    let start = command.start.unwrap_or_else(OffsetDateTime::now_utc);
    let waypoints = [command.current, command.pickup, command.dropoff];
    let routing = config.routing.clone();
    let route = tokio::task::spawn_blocking(move || {
        let provider = OsrmRouteProvider::new(routing)?;
        provider.route(&waypoints)
    })
    .await
    .map_err(|err| CliError::new(format!("route lookup join failed: {err}")))?
    .map_err(|err| CliError::new(format!("failed to get route: {err}")))?;
    let plan = simulate_trip(&route, command.cycle_used, start, &config.hos)
        .map_err(|err| CliError::new(err.to_string()))?;
    write_plan(&plan)?;
    Ok(ExitCode::SUCCESS)
}

/// Executes the `simulate` command.
fn command_simulate(command: &SimulateCommand) -> CliResult<ExitCode> {
    let config = load_config(command.config.as_deref())?;
    let bytes = read_route_file(&command.route)?;
    let route: Route = if command.osrm {
        decode_route(&bytes).map_err(|err| CliError::new(format!("invalid osrm response: {err}")))?
    } else {
        serde_json::from_slice(&bytes)
            .map_err(|err| CliError::new(format!("invalid route file: {err}")))?
    };
    let start = command.start.unwrap_or_else(OffsetDateTime::now_utc);
    let plan = simulate_trip(&route, command.cycle_used, start, &config.hos)
        .map_err(|err| CliError::new(err.to_string()))?;
    write_plan(&plan)?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Config Commands
// ============================================================================

/// Dispatches config subcommands.
fn command_config(command: &ConfigCommand) -> CliResult<ExitCode> {
    match command {
        ConfigCommand::Validate(command) => command_config_validate(command),
    }
}

/// Executes the config validation command.
fn command_config_validate(command: &ConfigValidateCommand) -> CliResult<ExitCode> {
    let _config = load_config(command.config.as_deref())?;
    write_stdout_line("config ok").map_err(|err| CliError::new(output_error("stdout", &err)))?;
    Ok(ExitCode::SUCCESS)
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Loads and validates configuration.
fn load_config(path: Option<&Path>) -> CliResult<TripPlannerConfig> {
    TripPlannerConfig::load(path).map_err(|err| CliError::new(format!("config load failed: {err}")))
}

/// Reads a route file with a size limit.
fn read_route_file(path: &Path) -> CliResult<Vec<u8>> {
    let metadata = fs::metadata(path).map_err(|err| {
        CliError::new(format!("failed to read route file {}: {err}", path.display()))
    })?;
    if metadata.len() > MAX_ROUTE_FILE_BYTES {
        return Err(CliError::new("route file exceeds size limit".to_string()));
    }
    fs::read(path).map_err(|err| {
        CliError::new(format!("failed to read route file {}: {err}", path.display()))
    })
}

/// Parses a `lat,lon` argument.
fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    Coordinate::parse_lat_lon(value).map_err(|err| err.to_string())
}

/// Parses an RFC 3339 start time argument.
fn parse_start(value: &str) -> Result<OffsetDateTime, String> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|err| format!("invalid RFC 3339 time: {err}"))
}

/// Writes a plan as pretty JSON to stdout.
fn write_plan(plan: &TripPlan) -> CliResult<()> {
    let payload = serde_json::to_string_pretty(plan)
        .map_err(|err| CliError::new(format!("plan serialization failed: {err}")))?;
    write_stdout_line(&payload).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes a line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    format!("failed to write {stream}: {error}")
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
