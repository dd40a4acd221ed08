// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slack delivery for review messages.
//!
//! [`SlackClient`] posts one formatted review message per draft and maps
//! HTTP failures onto [`kansel_core::DeliveryError`]. [`RetryWorker`] drains
//! the persistent retry queue with rate-limit-aware rescheduling and
//! exponential backoff.

pub mod client;
pub mod queue;

pub use client::SlackClient;
pub use queue::{RetryConfig, RetryWorker};
