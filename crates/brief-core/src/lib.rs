//! # brief-core
//!
//! Core report-generation functionality for Brief.
//!
//! This crate provides:
//! - The ticket inventory the judge checks reports against
//! - Parsing of free-text judge responses into total verdicts
//! - The bounded draft/judge/regenerate validation loop
//! - The persona catalog and prompt assembly
//! - Configuration loading and validation
//! - Ticket snapshot loading and delivery metrics
//! - Report output and the manual-review queue

pub mod config;
pub mod inventory;
pub mod metrics;
pub mod persona_catalog;
pub mod prompt;
pub mod report_writer;
pub mod review_queue;
pub mod testing;
mod text;
pub mod ticket_source;
mod validation_loop;
pub mod verdict_parser;

pub use config::{
    BriefConfig, CONFIG_FILE_NAMES, ConfigError, LlmProvider, LlmSettings, PersonaOverride,
    ValidationSettings,
};
pub use inventory::{DEFAULT_DESCRIPTION_MAX_CHARS, InventoryFormatter, TicketInventory};
pub use metrics::ReportMetrics;
pub use persona_catalog::{PersonaCatalog, PersonaProfile};
pub use prompt::{Correction, NO_FABRICATION_POLICY, fill_template};
pub use report_writer::{ReportPaths, ReportWriter, trust_indicator};
pub use review_queue::ReviewQueue;
pub use text::truncate_with_ellipsis;
pub use ticket_source::{TicketSourceError, load_tickets, parse_tickets};
pub use validation_loop::{
    DEFAULT_MAX_ATTEMPTS, ExhaustReason, LoopPhase, LoopState, ValidationAttempt,
    ValidationError, ValidationLoop, ValidationOutcome, next_phase,
};
pub use verdict_parser::VerdictParser;
