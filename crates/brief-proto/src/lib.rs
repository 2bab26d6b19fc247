//! # brief-proto
//!
//! Shared types, error definitions, and traits for the Brief report generator.
//!
//! This crate provides the foundational abstractions used across all Brief crates,
//! including:
//! - Ticket records as supplied by the ticket source
//! - Persona identifiers and inventory detail levels
//! - Judge verdicts and their defaulting metadata
//! - Report tables and drafts
//! - The drafter and judge collaborator traits

mod collaborator;
mod persona;
mod table;
mod ticket;
mod verdict;

pub use collaborator::{CollaboratorError, JudgeInvoker, ReportDrafter};
pub use persona::{InventoryDetail, PersonaId};
pub use table::{Draft, ReportTable};
pub use ticket::{Ticket, TicketStatus};
pub use verdict::{
    JudgeVerdict, Recommendation, TrustLevel, ValidationStatus, VerdictField,
};
