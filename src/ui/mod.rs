// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the PostCraft application.

pub mod admin;
pub mod canvas;
pub mod login;
pub mod notices;
pub mod properties;
pub mod toolbar;
