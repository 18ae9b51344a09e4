// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::new_without_default)]

pub mod analysis;
pub mod bitnodes;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod errors;
pub mod fetcher;
pub mod getstate;
pub mod price;
pub mod signals;
pub mod storage;

#[cfg(test)]
mod signals_tests;
