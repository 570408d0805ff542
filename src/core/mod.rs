// Copyright 2025 the hotkey-router authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! src/core/mod.rs
//!
//! Core engine logic
//!
//! This module contains the pure logic of the hotkey engine:
//! - Canonical types (modifiers, modifier codes, parsed specs, events)
//! - Alias and symbol tables with key classification helpers
//! - The hotkey spec parser
//! - The binding store (two-level map with duplicate/missing detection)
//! - Keydown resolution with the implicit-shift fallback
//!
//! Nothing here touches an event source or performs I/O, so the whole
//! resolution pipeline is unit-testable with hand-built events.

pub mod dispatch;
pub mod error;
pub mod keys;
pub mod parser;
pub mod store;
pub mod types;

pub use error::HotkeyError;
pub use parser::parse_hotkey;
pub use store::BindingStore;
pub use types::*;

#[cfg(test)]
mod tests;
