// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chat presentation layer.
//!
//! Turns commands, button presses and inline queries into rendered
//! responses. Delivery to the chat network is the bridge's job.

pub mod action;
pub mod format;
pub mod handler;
pub mod keyboard;
pub mod response;

pub use handler::BotService;
pub use keyboard::{Button, ButtonAction, InlineKeyboard};
pub use response::{BotResponse, DeliveryMode, InlineAnswer, InlineArticle, Notice, OutgoingMessage};
