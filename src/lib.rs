//! Workflow Survey - Adaptive workflow survey backend
//!
//! This crate implements a stateless step-orchestration engine that walks a
//! respondent through a catalogue of survey steps, mixing fixed questions with
//! generated ones, and exposes it over a small JSON API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
