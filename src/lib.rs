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

//! Hotkey Router
//!
//! A hotkey engine for keyboard-event streams: spec strings like
//! "ctrl-alt-k" become bindings, and each live keydown invokes at most
//! one handler.
//!
//! # Features
//!
//! - **Order-independent modifiers:** "ctrl-alt-k" and "alt-ctrl-k" are
//!   the same binding, however the keys are pressed
//! - **Exact matching:** extra held modifiers suppress a binding instead
//!   of loosely firing it
//! - **Shifted symbols:** "shift-2" and "@" both work, and the explicit
//!   spelling wins when both are bound
//! - **Fluent engine:** `&self` methods that chain, with a mount/unmount
//!   listener lifecycle and re-entrant handlers
//! - **Keymap files:** `bind = <spec>, <action>` lines with variable
//!   substitution and duplicate checking
//! - **Keyboard simulation:** drive an engine from tests or replay
//!   scripts without a real keyboard
//!
//! # Architecture
//!
//! - **`core`:** Business logic (types, spec parser, binding store, dispatch)
//! - **`engine`:** The public engine (bind/unbind, lifecycle, event source seam)
//! - **`config`:** Keymap file loading and validation
//! - **`simulator`:** In-process event bus and keyboard simulator
//!
//! # Examples
//!
//! ## Binding and dispatching
//!
//! ```
//! use std::rc::Rc;
//! use hotkey_router::engine::HotkeyEngine;
//! use hotkey_router::simulator::{EventBus, KeyboardSimulator};
//!
//! let bus = Rc::new(EventBus::new());
//! let engine = HotkeyEngine::new(bus.clone());
//!
//! engine
//!     .bind("ctrl-alt-k", |_| println!("palette"))?
//!     .bind("esc", |_| println!("dismiss"))?;
//! engine.mount();
//!
//! let keyboard = KeyboardSimulator::new(Rc::clone(&bus));
//! keyboard.chord(&["Control", "Alt", "k"])?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Parsing a spec by hand
//!
//! ```
//! use hotkey_router::core::parse_hotkey;
//!
//! let spec = parse_hotkey("ctrl-shift-a")?;
//! assert_eq!(spec.target_key, "a");
//! assert_eq!(spec.modifiers.as_str(), "CS");
//! # Ok::<(), hotkey_router::core::HotkeyError>(())
//! ```
//!
//! ## Checking a keymap for conflicts
//!
//! ```no_run
//! use std::path::Path;
//! use hotkey_router::config::{check_bindings, load_keymap};
//!
//! let entries = load_keymap(Path::new("keymap.conf"))?;
//! for (line, err) in check_bindings(&entries) {
//!     eprintln!("line {}: {}", line, err);
//! }
//! # Ok::<(), hotkey_router::config::KeymapError>(())
//! ```

pub mod config;
pub mod core;
pub mod engine;
pub mod simulator;

// Re-export commonly used types for convenience
pub use core::{parse_hotkey, HotkeyError, HotkeySpec, KeyboardEvent, Modifier, ModifierCode};
pub use engine::HotkeyEngine;
