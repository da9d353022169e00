// Copyright 2026 BadCompany
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

//! hornet: a black-box fuzzer for D-Bus style IPC interfaces.
//!
//! This library provides the core logic of the hornet fuzzer: it decodes an
//! interface's method signatures into type trees, generates adversarial
//! argument values for each method, invokes the calls through an externally
//! supplied proxy with a bounded wait, and watches the target process for
//! crashes, hangs and unbounded memory growth.
//!
//! Bus connection, introspection-document retrieval and signal delivery are
//! not part of this crate; they are consumed through the capability traits
//! in [`engine`] and [`runner`].

pub mod catalog;
pub mod config;
pub mod core;
pub mod engine;
pub mod generator;
pub mod health;
pub mod logging;
pub mod runner;
pub mod signature;
pub mod utils;
