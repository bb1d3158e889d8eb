// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Memento reminder service.
//!
//! Exposes list, create, delete, and clear operations over a
//! [`ReminderStore`](memento_core::ReminderStore), plus a health endpoint that
//! reports the scheduler's latest status.

pub mod handlers;
pub mod server;

pub use server::{bind, router, serve, start_server, GatewayState, HealthState, ServerConfig};
