//! Homework status bot
//!
//! Polls the Practicum homework-status API on a fixed interval and relays
//! review status changes, and the first occurrence of each distinct failure,
//! to a Telegram chat.

pub mod config;
pub mod models;
pub mod services;
pub mod telemetry;
