// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subcommand handlers

pub mod ipc;
pub mod monitor;
pub mod query;
