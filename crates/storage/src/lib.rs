// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The write-ahead log (C4): append-only, line-delimited session
//! checkpoints, with size/age-bounded rotation and a read-all recovery
//! iterator.

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod wal;

pub use wal::{LogEntry, Wal, WalConfig, WalError, END, INIT};
