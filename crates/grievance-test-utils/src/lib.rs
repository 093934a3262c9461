// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles and a router harness for grievance portal tests.

pub mod harness;
pub mod locators;
pub mod memory_store;

pub use harness::{TestHarness, TestHarnessBuilder};
pub use locators::{FailingLocator, StaticLocator};
pub use memory_store::MemoryGrievanceStore;
