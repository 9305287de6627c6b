// SPDX-FileCopyrightText: 2026 Tribuna Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Upstream search client for the DataJud judicial-records API.
//!
//! The upstream is an Elasticsearch front: one index per tribunal, reached
//! at `POST <base>/api_publica_<tribunal>/_search` with an
//! `Authorization: APIKey <key>` header. This crate owns the query-document
//! mapping for each search kind and the normalization of upstream failures;
//! callers see [`tribuna_core::SearchOutcome`] or a typed error, never a raw
//! response.

pub mod client;
mod query;

pub use client::DatajudClient;
