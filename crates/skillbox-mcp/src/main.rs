//! Skillbox MCP Server: entry point.

use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use serde_json::Value;

use skillbox_mcp::config::{resolve_log_filter, resolve_tool_filter};
use skillbox_mcp::protocol::ProtocolHandler;
use skillbox_mcp::tools::ToolRegistry;
use skillbox_mcp::transport::StdioTransport;

#[derive(Parser)]
#[command(
    name = "skillbox-mcp",
    about = "MCP server for Skillbox: small, self-contained skills over stdio",
    version
)]
struct Cli {
    /// Log filter (trace, debug, info, warn, error, or an EnvFilter directive).
    /// Also reads from SKILLBOX_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Comma-separated list of tools to enable (default: all).
    /// Also reads from SKILLBOX_TOOLS.
    #[arg(long, global = true)]
    tools: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Print server capabilities as JSON.
    Info,

    /// Invoke one tool and print its text output.
    ///
    /// Examples:
    ///   skillbox-mcp call calculate '{"expression": "2 ** 10"}'
    ///   skillbox-mcp call generate_logs '{"count": 3, "level": "error"}'
    Call {
        /// Tool name.
        tool: String,

        /// Tool arguments as a JSON object.
        arguments: Option<String>,
    },

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   skillbox-mcp completions bash > ~/.local/share/bash-completion/completions/skillbox-mcp
    ///   skillbox-mcp completions zsh > ~/.zfunc/_skillbox-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },

    /// Launch interactive REPL mode.
    Repl,
}

fn build_registry(tools: Option<&str>) -> anyhow::Result<ToolRegistry> {
    match resolve_tool_filter(tools) {
        Some(names) => Ok(ToolRegistry::builtin_filtered(&names)?),
        None => Ok(ToolRegistry::builtin()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(resolve_log_filter(cli.log_level.as_deref()))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            let registry = Arc::new(build_registry(cli.tools.as_deref())?);
            tracing::info!("Skillbox MCP server ({} tools)", registry.len());
            let handler = ProtocolHandler::new(registry);
            let transport = StdioTransport::new(handler);
            transport.run().await?;
        }

        Commands::Info => {
            let capabilities = skillbox_mcp::types::InitializeResult::default_result();
            let tools = build_registry(cli.tools.as_deref())?.list_tools();
            let info = serde_json::json!({
                "server": capabilities.server_info,
                "protocol_version": capabilities.protocol_version,
                "capabilities": capabilities.capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Call { tool, arguments } => {
            let registry = build_registry(cli.tools.as_deref())?;
            let arguments = match arguments {
                Some(raw) => Some(serde_json::from_str::<Value>(&raw)?),
                None => None,
            };
            let result = registry.call(&tool, arguments)?;
            println!("{}", result.joined_text());
            if result.is_error() {
                std::process::exit(1);
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "skillbox-mcp", &mut std::io::stdout());
        }

        Commands::Repl => {
            let registry = Arc::new(build_registry(cli.tools.as_deref())?);
            skillbox_mcp::repl::run(ProtocolHandler::new(registry))?;
        }
    }

    Ok(())
}
