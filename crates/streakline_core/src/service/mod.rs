//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into registry, ledger, streak and
//!   calendar APIs.
//! - Keep CLI/HTTP layers decoupled from storage details.
//!
//! # Invariants
//! - Every entry point takes an already-authenticated owner id; services
//!   never authenticate.
//! - "Today" comes from the injected `DayClock`, never the wall clock.

pub mod calendar_service;
pub mod completion_ledger;
pub mod habit_registry;
pub mod streak_service;
