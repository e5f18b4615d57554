//! Lookup table for the custom emojis used in replies.

use std::collections::HashMap;

/// Built-in emoji tokens.
const DEFAULTS: [(&str, &str); 11] = [
    ("check", "<a:checkmark:1471397294057197602>"),
    ("info", "<a:info:1471397338902823115>"),
    ("cross", "<a:cut:1471397383421034666>"),
    ("add", "<:tec_add:1471397427071422588>"),
    ("reset", "<a:reset:1471397471673520128>"),
    ("folder", "<a:Folder:1471397516233805987>"),
    ("openfolder", "<:Opened_Folder:1471397560328650812>"),
    ("music", "<a:white_music:1471397603571925043>"),
    ("right", "<a:Right:1471397647582498901>"),
    ("left", "<a:Left_white_arrow:1471397691580878974>"),
    ("loading", "<a:loading:1471397735352762502>"),
];

/// Maps symbolic names (`"check"`, `"loading"`, ...) to display tokens.
#[derive(Debug, Clone)]
pub struct Emojis {
    table: HashMap<String, String>,
}

impl Emojis {
    /// The built-in table with `overrides` layered on top.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut emojis = Self::default();
        emojis.table.extend(
            overrides
                .iter()
                .map(|(name, token)| (name.clone(), token.clone())),
        );
        emojis
    }

    /// Token for `name`, empty if unknown.
    pub fn get(&self, name: &str) -> &str {
        self.get_or(name, "")
    }

    /// Token for `name`, `fallback` if unknown.
    pub fn get_or<'a>(&'a self, name: &str, fallback: &'a str) -> &'a str {
        self.table.get(name).map_or(fallback, String::as_str)
    }
}

impl Default for Emojis {
    fn default() -> Self {
        let table = DEFAULTS
            .iter()
            .map(|(name, token)| (name.to_string(), token.to_string()))
            .collect();
        Self { table }
    }
}
