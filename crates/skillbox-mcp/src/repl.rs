//! Interactive REPL for the Skillbox MCP server.
//!
//! Launch with `skillbox-mcp repl` to enter interactive mode.
//! Type `/help` for available commands, Tab for completion.

use rustyline::completion::{Completer, Pair};
use rustyline::config::CompletionType;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{
    Cmd, ConditionalEventHandler, Config, Editor, Event, EventContext, EventHandler, Helper,
    KeyEvent, RepeatCount,
};
use serde_json::Value;

use crate::protocol::ProtocolHandler;
use crate::transport::process_line;
use crate::types::McpError;

/// Available REPL commands.
const COMMANDS: &[(&str, &str)] = &[
    ("/info", "Show server capabilities and tools"),
    ("/tools", "List available MCP tools"),
    ("/call", "Call a tool: /call <tool> [json-arguments]"),
    ("/send", "Send a raw JSON-RPC line through the dispatcher"),
    ("/clear", "Clear the screen"),
    ("/help", "Show available commands"),
    ("/exit", "Quit the REPL"),
];

/// REPL helper for tab completion.
struct SkillHelper {
    tool_names: Vec<String>,
}

impl Completer for SkillHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        Ok(completions(&line[..pos], &self.tool_names).unwrap_or((pos, Vec::new())))
    }
}

/// Completion candidates for the text left of the cursor.
fn completions(input: &str, tool_names: &[String]) -> Option<(usize, Vec<Pair>)> {
    if !input.contains(' ') {
        let matches = COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| Pair {
                display: format!("{cmd:<16} {desc}"),
                replacement: format!("{cmd} "),
            })
            .collect();
        return Some((0, matches));
    }

    // Tool name completion
    let args = input.strip_prefix("/call ")?;
    if args.contains(' ') {
        return None;
    }
    let prefix_start = input.len() - args.len();
    let matches = tool_names
        .iter()
        .filter(|name| name.starts_with(args))
        .map(|name| Pair {
            display: name.clone(),
            replacement: format!("{name} "),
        })
        .collect();
    Some((prefix_start, matches))
}

impl Hinter for SkillHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        if pos < line.len() || line.is_empty() {
            return None;
        }
        if line.starts_with('/') && !line.contains(' ') {
            for (cmd, _) in COMMANDS {
                if cmd.starts_with(line) && *cmd != line {
                    return Some(cmd[line.len()..].to_string());
                }
            }
        }
        None
    }
}

impl Highlighter for SkillHelper {}
impl Validator for SkillHelper {}
impl Helper for SkillHelper {}

struct TabCompleteOrAcceptHint;

impl ConditionalEventHandler for TabCompleteOrAcceptHint {
    fn handle(
        &self,
        _evt: &Event,
        _n: RepeatCount,
        _positive: bool,
        ctx: &EventContext<'_>,
    ) -> Option<Cmd> {
        if ctx.has_hint() {
            Some(Cmd::CompleteHint)
        } else {
            Some(Cmd::Complete)
        }
    }
}

/// Run the interactive REPL against an already configured handler.
pub fn run(handler: ProtocolHandler) -> anyhow::Result<()> {
    eprintln!();
    eprintln!(
        "  \x1b[32m\u{25c9}\x1b[0m \x1b[1mskillbox-mcp v{}\x1b[0m \x1b[90m({} tools)\x1b[0m",
        env!("CARGO_PKG_VERSION"),
        handler.tools().len()
    );
    eprintln!();
    eprintln!(
        "    Press \x1b[36m/\x1b[0m to browse commands, \x1b[90mTab\x1b[0m to complete, \x1b[90m/exit\x1b[0m to quit."
    );
    eprintln!();

    let config = Config::builder()
        .history_ignore_space(true)
        .auto_add_history(true)
        .completion_type(CompletionType::List)
        .completion_prompt_limit(20)
        .build();

    let tool_names = handler.tools().list_tools().into_iter().map(|t| t.name).collect();
    let mut rl: Editor<SkillHelper, rustyline::history::DefaultHistory> =
        Editor::with_config(config)?;
    rl.set_helper(Some(SkillHelper { tool_names }));
    rl.bind_sequence(
        KeyEvent::from('\t'),
        EventHandler::Conditional(Box::new(TabCompleteOrAcceptHint)),
    );

    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    let hist_path = std::path::PathBuf::from(&home).join(".skillbox_mcp_history");
    if hist_path.exists() {
        let _ = rl.load_history(&hist_path);
    }

    let prompt = " \x1b[36mskillbox>\x1b[0m ";

    loop {
        match rl.readline(prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let input = line.strip_prefix('/').unwrap_or(line);
                if input.is_empty() {
                    cmd_help();
                    continue;
                }

                let mut parts = input.splitn(2, ' ');
                let cmd = parts.next().unwrap_or("");
                let args = parts.next().unwrap_or("").trim();

                match cmd {
                    "exit" | "quit" => {
                        eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                        break;
                    }
                    "help" | "h" | "?" => cmd_help(),
                    "clear" | "cls" => eprint!("\x1b[2J\x1b[H"),
                    "info" => cmd_info(&handler),
                    "tools" => cmd_tools(&handler),
                    "call" => eprintln!("{}", cmd_call(&handler, args)),
                    "send" => eprintln!("{}", cmd_send(&handler, args)),
                    _ => {
                        eprintln!("  Unknown command '/{cmd}'. Type /help for commands.");
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                eprintln!("  \x1b[90m(Ctrl+C)\x1b[0m Type \x1b[1m/exit\x1b[0m to quit.");
            }
            Err(ReadlineError::Eof) => {
                eprintln!("  \x1b[90m\u{2728}\x1b[0m Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("  Error: {err}");
                break;
            }
        }
    }

    let _ = rl.save_history(&hist_path);

    Ok(())
}

fn cmd_help() {
    eprintln!();
    eprintln!("  Commands:");
    eprintln!();
    for (cmd, desc) in COMMANDS {
        eprintln!("    {cmd:<18} {desc}");
    }
    eprintln!();
    eprintln!("  Tip: Tab completion works for commands and tool names after /call.");
    eprintln!();
}

fn cmd_info(handler: &ProtocolHandler) {
    let capabilities = crate::types::InitializeResult::default_result();
    eprintln!();
    eprintln!(
        "  Server:   {} v{}",
        capabilities.server_info.name, capabilities.server_info.version
    );
    eprintln!("  Protocol: {}", capabilities.protocol_version);
    eprintln!("  Tools:    {}", handler.tools().len());
    eprintln!();
}

fn cmd_tools(handler: &ProtocolHandler) {
    let tools = handler.tools().list_tools();
    eprintln!();
    eprintln!("  {} MCP tools available:", tools.len());
    eprintln!();
    for tool in &tools {
        eprintln!("    {:<16} {}", tool.name, tool.description);
    }
    eprintln!();
}

/// `/call <tool> [json]`, rendered as the text to print.
fn cmd_call(handler: &ProtocolHandler, args: &str) -> String {
    let mut parts = args.splitn(2, ' ');
    let name = parts.next().unwrap_or("");
    if name.is_empty() {
        return "  Usage: /call <tool> [json-arguments]".to_string();
    }

    let arguments = match parts.next().map(str::trim).filter(|a| !a.is_empty()) {
        Some(raw) => match serde_json::from_str::<Value>(raw) {
            Ok(value) => Some(value),
            Err(e) => return format!("  Invalid JSON arguments: {e}"),
        },
        None => None,
    };

    match handler.tools().call(name, arguments) {
        Ok(result) if result.is_error() => format!("  \x1b[31m{}\x1b[0m", result.joined_text()),
        Ok(result) => result.joined_text(),
        Err(McpError::ToolNotFound(name)) => format!("  Unknown tool '{name}'. Type /tools."),
        Err(e) => format!("  Tool failed: {e}"),
    }
}

/// `/send <line>`: the reply line the server would write, or `(no reply)`.
fn cmd_send(handler: &ProtocolHandler, args: &str) -> String {
    if args.is_empty() {
        return "  Usage: /send <json-rpc line>".to_string();
    }
    match process_line(handler, args) {
        Ok(Some(reply)) => reply.trim_end().to_string(),
        Ok(None) => "  (no reply)".to_string(),
        Err(e) => format!("  Failed to encode reply: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::tools::ToolRegistry;

    fn handler() -> ProtocolHandler {
        ProtocolHandler::new(Arc::new(ToolRegistry::builtin()))
    }

    fn names() -> Vec<String> {
        ToolRegistry::builtin()
            .list_tools()
            .into_iter()
            .map(|t| t.name)
            .collect()
    }

    #[test]
    fn test_command_completion() {
        let (start, pairs) = completions("/c", &names()).unwrap();
        assert_eq!(start, 0);
        let replacements: Vec<_> = pairs.iter().map(|p| p.replacement.as_str()).collect();
        assert_eq!(replacements, ["/call ", "/clear "]);
    }

    #[test]
    fn test_tool_name_completion_after_call() {
        let (start, pairs) = completions("/call ge", &names()).unwrap();
        assert_eq!(start, 6);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, "generate_logs ");
        assert!(completions("/call echo {", &names()).is_none());
    }

    #[test]
    fn test_call_command() {
        let h = handler();
        assert_eq!(cmd_call(&h, r#"echo {"text": "hi"}"#), "Echo: hi");
        assert_eq!(cmd_call(&h, "echo"), "Echo: ");
        assert!(cmd_call(&h, "nope").contains("Unknown tool 'nope'"));
        assert!(cmd_call(&h, "echo {bad").contains("Invalid JSON"));
    }

    #[test]
    fn test_send_command() {
        let h = handler();
        assert_eq!(
            cmd_send(&h, r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#),
            r#"{"jsonrpc":"2.0","id":1,"result":{}}"#
        );
        assert_eq!(
            cmd_send(&h, r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#),
            "  (no reply)"
        );
        assert_eq!(cmd_send(&h, "garbage"), "  (no reply)");
    }
}
