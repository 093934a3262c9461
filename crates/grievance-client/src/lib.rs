// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Client side of the grievance portal.
//!
//! [`Portal`] is the UI-agnostic form flow: a passphrase gate, a form, and a
//! confirmation screen. Front-ends feed it events and render its state.

pub mod choice;
pub mod flow;
pub mod locate;
pub mod submit;

pub use choice::{Choice, MOOD_OPTIONS, SEVERITY_OPTIONS};
pub use flow::{FlowError, FormFields, INCOMPLETE_MESSAGE, LOCKED_MESSAGE, Portal, Stage};
pub use locate::{DeviceLocator, FixedLocation, NoDeviceLocation};
pub use submit::{HttpPortalClient, Submitter};
