//! # Casepath
//!
//! Library half of the `casepath` binary: the HTTP API, the CLI, the
//! configuration file and the store helpers. The binary in `main.rs` only
//! sets up tracing and dispatches to [`cli::execute`].
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 apps/casepath                   │
//! │                                                 │
//! │  ┌─────────────┐    ┌─────────────┐             │
//! │  │   CLI       │    │   HTTP API  │             │
//! │  │  (clap)     │    │   (axum)    │             │
//! │  └──────┬──────┘    └──────┬──────┘             │
//! │         └────────┬─────────┘                    │
//! │                  ▼                              │
//! │          ┌───────────────┐   ┌──────────────┐   │
//! │          │ casepath-core │◄──│ config.toml  │   │
//! │          └───────────────┘   └──────────────┘   │
//! └─────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod store;
