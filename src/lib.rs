//! Record Intake - Conversational collection of asset, incident and risk records
//!
//! A fixed list of prompts per record kind walks the user through every
//! field, validates each answer, shows a summary and inserts the confirmed
//! record into the GRC store.

pub mod adapters;
pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
