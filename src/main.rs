//! Gateway client entry point.
//!
//! Sets up logging and span export, then runs one command:
//!
//! - `gateway-client` or `gateway-client standalone [QUERY] [HISTORY]` -
//!   rewrite a question so it stands without the chat history
//! - `gateway-client generate PROMPT [MAX_TOKENS]` - raw generation
//! - `gateway-client config show|defaults` - print configuration

use std::process::ExitCode;

use llama_gateway_client::cli::{
    self, config_cmd, parse_max_tokens, run_generate, run_standalone, DEMO_QUERY, EXIT_USAGE,
};
use llama_gateway_client::client::{ClientConfig, ModelClient, DEFAULT_MAX_TOKENS};
use llama_gateway_client::config as gw_config;
use llama_gateway_client::prompt::STANDALONE_MAX_TOKENS;
use llama_gateway_client::telemetry::{init_metrics, init_observability};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(|s| s.as_str()).unwrap_or("standalone");

    match command {
        "standalone" | "generate" => run_request(command, &args),
        "config" => {
            let subcommand = args.get(2).map(|s| s.as_str()).unwrap_or("show");
            match subcommand {
                "show" => exit_code(config_cmd::run_show()),
                "defaults" => exit_code(config_cmd::run_defaults()),
                _ => {
                    eprintln!("Unknown config subcommand: {}", subcommand);
                    print_usage();
                    exit_code(EXIT_USAGE)
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
            ExitCode::SUCCESS
        }
        "version" | "--version" | "-V" => {
            println!("gateway-client {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            print_usage();
            exit_code(EXIT_USAGE)
        }
    }
}

/// Run a command that talks to the gateway.
///
/// Telemetry is initialized before the runtime exists: the span exporter
/// uses a blocking HTTP client on its own thread.
fn run_request(command: &str, args: &[String]) -> ExitCode {
    let env = gw_config::load();

    let tracer = match init_observability(&env.observability, &env.log) {
        Ok(handle) => handle,
        Err(e) => {
            eprintln!("Telemetry setup failed: {}", e);
            return exit_code(EXIT_USAGE);
        }
    };
    init_metrics();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return exit_code(EXIT_USAGE);
        }
    };

    let code = runtime.block_on(dispatch(command, args, env.client));
    drop(runtime);

    if let Err(e) = tracer.shutdown() {
        eprintln!("{}", e);
    }
    exit_code(code)
}

async fn dispatch(command: &str, args: &[String], config: ClientConfig) -> i32 {
    let client = match ModelClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{}", e);
            return EXIT_USAGE;
        }
    };
    let mut stdout = std::io::stdout();

    match command {
        "generate" => {
            let Some(prompt) = args.get(2) else {
                eprintln!("generate requires a PROMPT argument");
                return EXIT_USAGE;
            };
            let max_tokens_arg = args.get(3).map(String::as_str);
            let max_tokens = match parse_max_tokens(max_tokens_arg, DEFAULT_MAX_TOKENS) {
                Ok(n) => n,
                Err(msg) => {
                    eprintln!("{}", msg);
                    return EXIT_USAGE;
                }
            };
            run_generate(&client, prompt, max_tokens, &mut stdout).await
        }
        _ => {
            let query = args.get(2).map(String::as_str).unwrap_or(DEMO_QUERY);
            let history = args.get(3).map(String::as_str).unwrap_or("");
            run_standalone(&client, query, history, STANDALONE_MAX_TOKENS, &mut stdout).await
        }
    }
}

fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(code.clamp(0, 255) as u8)
}

fn print_usage() {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        "gateway-client v{}

USAGE:
    gateway-client [COMMAND] [ARGS]

COMMANDS:
    standalone [QUERY] [HISTORY]  Rewrite QUERY into a standalone question (default)
    generate PROMPT [MAX_TOKENS]  Generate text for PROMPT (default {} tokens)
    config show                   Show effective configuration
    config defaults               Show default configuration
    version                       Show version information
    help                          Show this help message

ENVIRONMENT:
    ASM_GATEWAY_IP              Model gateway host (default: localhost)
    MODEL_REQUEST_TIMEOUT_SECS  Request timeout in seconds (default: 30)
    JAEGER_AGENT_HOST           Span collector host
    JAEGER_AGENT_PORT           Span collector port (default: 6831)
    TRACING_ENABLED             Set to false to disable span export
    RUST_LOG                    Log filter (default: info)
    LOG_FORMAT                  json or pretty (default: json)

EXIT CODES:
    {}  Success
    {}  Request failed
    {}  Usage or configuration error
",
        version,
        DEFAULT_MAX_TOKENS,
        cli::EXIT_SUCCESS,
        cli::EXIT_REQUEST_FAILURE,
        EXIT_USAGE,
    );
}
