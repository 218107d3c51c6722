// SPDX-License-Identifier: MPL-2.0
//! Query services (CQRS read-side).
//!
//! This module contains read-only views derived from gallery state.
//!
//! # Available Services
//!
//! - [`navigation`]: Viewer navigation flags (`NavigationInfo`)

pub mod navigation;

pub use navigation::NavigationInfo;
