// SPDX-FileCopyrightText: 2026 Kansel Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted mock collaborators for tests.
//!
//! Mocks pop pre-queued outcomes in FIFO order and record every call, so
//! tests can script "fail twice, then succeed" sequences and assert on what
//! was sent.

pub mod mock_delivery;
pub mod mock_fallback;

pub use mock_delivery::MockDelivery;
pub use mock_fallback::MockFallback;
