//! # Lectio
//!
//! Query routing and retrieval over scripture references, patristic
//! commentary, per-translation Bible databases, and a full-text index of
//! HTML documents.
//!
//! ## Architecture
//!
//! ```text
//!                 ┌──────────────┐
//!   query ──────▶ │ QueryRouter  │── contains ':' ──▶ references ─▶ verses + commentary
//!                 │ (lectio-core)│── otherwise ─────▶ FTS5 index ─▶ documents + contexts
//!                 └──────┬───────┘
//!                        │ adapter traits
//!        ┌───────────────┼────────────────┬──────────────┐
//!        ▼               ▼                ▼              ▼
//!   commentary.db   <CODE>.db x6     index.sqlite    static/*.htm
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! lectio search "John 3:16 KJV"
//! lectio search "grace AND \"total depravity\"" --json
//! lectio context --query grace --file-path fathers/0701.htm
//! lectio serve
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`db`] | Read-only SQLite connections |
//! | [`sqlite_store`] | SQLite commentary, verse, and FTS5 adapters |
//! | [`documents`] | Filesystem document source |
//! | [`engine`] | Adapter wiring and per-request lifecycle |
//! | [`search`] | `search` and `parse` commands |
//! | [`context`] | `context` command |
//! | [`server`] | HTTP server |

pub mod config;
pub mod context;
pub mod db;
pub mod documents;
pub mod engine;
pub mod search;
pub mod server;
pub mod sqlite_store;
