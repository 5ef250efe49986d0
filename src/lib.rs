//! Promptcraft - form-driven video prompt generation
//!
//! This crate turns structured forms (topic, Veo 3, image, enhance,
//! optimize, batch) into prompt instructions, sends them to the selected AI
//! vendor and falls back to a deterministic offline template whenever the
//! vendor cannot answer.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Vendor ids and settings, form fields, fallback policy and prompt templates
//! - **Application**: Use cases, services and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (Gemini, OpenAI, built-in agent, file store, config)
//! - **CLI**: Command-line interface, argument parsing and output

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
