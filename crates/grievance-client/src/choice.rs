// SPDX-FileCopyrightText: 2026 Grievance Portal Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mood and severity selections: a fixed menu plus a free-text escape hatch.

pub const MOOD_OPTIONS: &[&str] = &[
    "Happy 😊",
    "Sad 😢",
    "Angry 😠",
    "Playful 😜",
    "Anxious 😟",
    "Loved 🥰",
];

pub const SEVERITY_OPTIONS: &[&str] = &[
    "Just a tiny whisper 🤏",
    "Needs a little attention 👀",
    "A chunky KitKat would fix this 🍫",
    "Code Red! Major meltdown! 🌋",
    "Send cuddles & snacks, stat! 🤗🍪",
    "I'm fine... (Narrator: She was not fine) 🥲",
];

/// One menu selection. Collapses to the string sent to the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice {
    #[default]
    Unset,
    Predefined(&'static str),
    /// "Other..." with whatever the user typed.
    Custom(String),
}

impl Choice {
    /// Pick the 1-based `index` from `options`. `options.len() + 1` is
    /// "Other..." and yields an empty custom choice.
    pub fn from_menu(options: &'static [&'static str], index: usize) -> Option<Self> {
        match index {
            0 => None,
            i if i <= options.len() => Some(Self::Predefined(options[i - 1])),
            i if i == options.len() + 1 => Some(Self::Custom(String::new())),
            _ => None,
        }
    }

    /// Value to submit, `None` when nothing (or only blank text) was chosen.
    pub fn value(&self) -> Option<String> {
        match self {
            Self::Unset => None,
            Self::Predefined(option) => Some((*option).to_string()),
            Self::Custom(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }
}
