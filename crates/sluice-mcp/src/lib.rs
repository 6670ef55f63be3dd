//! # sluice-mcp
//!
//! Tool-result layer for MCP servers.
//!
//! Tool handlers produce raw JSON; before it goes back to the agent, a
//! [`ResponseGuard`] reduces it through one of two entry points, chosen per
//! tool:
//!
//! | Surface | Entry point | Tool result text |
//! |---------|-------------|------------------|
//! | `general` | chunking orchestrator | summary, warnings, data, metadata |
//! | `token_constrained` | simple limiter | header line and body |
//!
//! ## Example Usage
//!
//! ```ignore
//! use sluice_core::SluiceConfig;
//! use sluice_mcp::{CallToolResponse, ResponseGuard};
//!
//! let guard = ResponseGuard::new(SluiceConfig::from_file("sluice.yaml")?);
//! let rows = run_query(&sql).await?;
//! let response: CallToolResponse = guard.finish("list_orders", rows).into();
//! ```

pub mod error;
pub mod executor;
pub mod guard;
pub mod protocol;

pub use error::McpError;
pub use executor::ExecutionResult;
pub use guard::ResponseGuard;
pub use protocol::{CallToolResponse, ToolContent};
