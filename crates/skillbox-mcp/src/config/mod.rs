//! Configuration loading and resolution.

/// Environment variable consulted for the log filter.
pub const LOG_ENV: &str = "SKILLBOX_LOG";

/// Environment variable consulted for the enabled tool list.
pub const TOOLS_ENV: &str = "SKILLBOX_TOOLS";

const DEFAULT_LOG_FILTER: &str = "info";

/// Resolve the log filter directive.
pub fn resolve_log_filter(explicit: Option<&str>) -> String {
    if let Some(filter) = explicit {
        return filter.to_string();
    }

    if let Ok(env_filter) = std::env::var(LOG_ENV) {
        if !env_filter.trim().is_empty() {
            return env_filter;
        }
    }

    DEFAULT_LOG_FILTER.to_string()
}

/// Resolve which built-in tools to enable. `None` means all of them.
pub fn resolve_tool_filter(explicit: Option<&str>) -> Option<Vec<String>> {
    if let Some(list) = explicit {
        return Some(split_tool_list(list));
    }

    std::env::var(TOOLS_ENV).ok().map(|list| split_tool_list(&list))
}

/// Split a comma-separated tool list, trimming whitespace and dropping empties.
pub fn split_tool_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_log_filter_wins() {
        assert_eq!(resolve_log_filter(Some("debug")), "debug");
        assert_eq!(
            resolve_log_filter(Some("skillbox_mcp=trace")),
            "skillbox_mcp=trace"
        );
    }

    #[test]
    fn test_explicit_tool_filter_wins() {
        assert_eq!(
            resolve_tool_filter(Some("echo, add")),
            Some(vec!["echo".to_string(), "add".to_string()])
        );
    }

    #[test]
    fn test_split_tool_list() {
        assert_eq!(split_tool_list(" echo ,,calculate, "), ["echo", "calculate"]);
        assert!(split_tool_list("").is_empty());
        assert!(split_tool_list(" , ").is_empty());
    }
}
