//! MCP capability negotiation during initialization.

use serde_json::Value;

use crate::types::{InitializeParams, InitializeResult, MCP_VERSION};

/// Build the `initialize` result. Client params are only logged; malformed or
/// missing params never fail the handshake.
pub fn negotiate(params: Option<Value>) -> InitializeResult {
    let params: InitializeParams = match params {
        Some(value) => serde_json::from_value(value).unwrap_or_else(|e| {
            tracing::debug!("Ignoring malformed initialize params: {e}");
            InitializeParams::default()
        }),
        None => InitializeParams::default(),
    };

    if let Some(version) = params.protocol_version.as_deref() {
        if version != MCP_VERSION {
            tracing::warn!(
                "Client requested protocol version {}, server supports {}. Proceeding with server version.",
                version,
                MCP_VERSION
            );
        }
    }

    match &params.client_info {
        Some(client) => tracing::info!(
            "Initialized with client: {} v{}",
            client.name,
            client.version
        ),
        None => tracing::info!("Initialized with anonymous client"),
    }

    InitializeResult::default_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_negotiate_without_params() {
        let result = negotiate(None);
        assert_eq!(result.protocol_version, MCP_VERSION);
    }

    #[test]
    fn test_negotiate_tolerates_bad_params() {
        let result = negotiate(Some(json!("not an object")));
        assert_eq!(result.protocol_version, MCP_VERSION);
        let result = negotiate(Some(json!({
            "protocolVersion": "1999-01-01",
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0" }
        })));
        assert_eq!(result.protocol_version, MCP_VERSION);
    }
}
