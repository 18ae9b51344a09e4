// File: errors.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::fmt;

#[derive(Debug)]
pub enum FetchError {
    Client(reqwest::Error),
    Transport(reqwest::Error),
    Status(u16),
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Client(e) => write!(f, "HTTP client error: {}", e),
            Self::Transport(e) => write!(f, "Request failed: {}", e),
            Self::Status(code) => write!(f, "Unexpected status code: {}", code),
            Self::Decode(msg) => write!(f, "Invalid JSON body: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Client(e) => Some(e),
            Self::Transport(e) => Some(e),
            Self::Status(_) => None,
            Self::Decode(_) => None,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error.to_string())
        } else {
            Self::Transport(error)
        }
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
    Persist(tempfile::PersistError),
    InvalidPath(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {}", e),
            Self::Serialization(e) => write!(f, "Serialization error: {}", e),
            Self::Persist(e) => write!(f, "Failed to replace file: {}", e),
            Self::InvalidPath(path) => write!(f, "Invalid store path: {}", path),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialization(e) => Some(e),
            Self::Persist(e) => Some(e),
            Self::InvalidPath(_) => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error)
    }
}

impl From<tempfile::PersistError> for StoreError {
    fn from(error: tempfile::PersistError) -> Self {
        Self::Persist(error)
    }
}

pub type FetchResult<T> = Result<T, FetchError>;
pub type StoreResult<T> = Result<T, StoreError>;
