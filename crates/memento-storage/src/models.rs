// SPDX-FileCopyrightText: 2026 Memento Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage entity types, re-exported from `memento-core` where they cross
//! adapter boundaries.

pub use memento_core::types::{NewReminder, Reminder, ReminderId};
