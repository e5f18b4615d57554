//! Turns what a command wants to say into a reply [Payload].
//!
//! Every reply is a card: a header line, a separator, then a body section
//! with an optional thumbnail. Rendering is pure, sending lives in
//! [reply](crate::reply).

mod emoji;
mod filter;
mod link;

use std::fmt::Display;
use std::time::Duration;

use itertools::Itertools;
use poise::CreateReply;
use serenity::CreateEmbed;

use crate::serenity;
use crate::setup::AssetConfig;
use crate::setup::ColorConfig;

pub use emoji::Emojis;
pub use filter::FilterView;
pub use link::LinkView;

/// Discord rejects embed descriptions longer than this.
const DESCRIPTION_LIMIT: usize = 4096;

/// Vertical space a separator takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spacing {
    Small,
    Large,
}

/// One layer of a [Payload].
#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Text(String),
    Separator(Spacing),
    Section {
        text: String,
        thumbnail: Option<String>,
    },
}

/// A rendered reply, ready to be sent or used to edit an earlier reply.
#[derive(Debug, Clone, PartialEq)]
pub struct Payload {
    accent: u32,
    components: Vec<Component>,
}

impl Payload {
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// The first text line.
    pub fn header(&self) -> Option<&str> {
        self.components.iter().find_map(|c| match c {
            Component::Text(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// The first section's thumbnail.
    pub fn thumbnail(&self) -> Option<&str> {
        self.components.iter().find_map(|c| match c {
            Component::Section { thumbnail, .. } => thumbnail.as_deref(),
            _ => None,
        })
    }

    /// Flatten into a single embed.
    /// Separators become blank lines, the first section thumbnail is used.
    pub fn embed(&self) -> CreateEmbed {
        let mut lines: Vec<&str> = Vec::new();
        for component in &self.components {
            match component {
                Component::Text(text) => lines.push(text),
                Component::Separator(Spacing::Small) => lines.push(""),
                Component::Separator(Spacing::Large) => lines.extend(["", ""]),
                Component::Section { text, .. } => lines.push(text),
            }
        }
        let description = clamp(lines.join("\n").trim_end(), DESCRIPTION_LIMIT);

        let embed = CreateEmbed::new()
            .description(description)
            .colour(self.accent);

        match self.thumbnail() {
            Some(url) => embed.thumbnail(url),
            None => embed,
        }
    }

    /// Wrap [Payload::embed] in a reply.
    pub fn reply(&self) -> CreateReply {
        CreateReply::default().embed(self.embed())
    }
}

/// Cut `text` to at most `limit` characters.
fn clamp(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(limit - 1).collect();
    cut.push('…');
    cut
}

/// Format items as a tree branch, one per line.
fn tree<I>(items: I) -> String
where
    I: IntoIterator,
    I::Item: Display,
{
    let items = items.into_iter().collect_vec();
    let last = items.len().saturating_sub(1);
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let branch = if i == last { "└─" } else { "├─" };
            format!("{branch} {item}")
        })
        .join("\n")
}

/// Format a track length as `[mm:ss]`, or `[hh:mm:ss]` past an hour.
pub fn format_duration(dur: &Duration) -> String {
    let total_secs = dur.as_secs();
    let total_mins = total_secs / 60;

    let hours = total_mins / 60;
    let mins = total_mins % 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("[{hours:02}:{mins:02}:{secs:02}]")
    } else {
        format!("[{mins:02}:{secs:02}]")
    }
}

/// The mood of a reply, picks the accent color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Error,
}

/// Accent colors for each [Tone].
#[derive(Debug, Clone, Copy)]
struct Palette {
    info: u32,
    success: u32,
    warning: u32,
    error: u32,
}

impl Palette {
    /// Parse `#rrggbb` colors, falling back to defaults on bad values.
    fn from_config(colors: &ColorConfig) -> Self {
        let defaults = ColorConfig::default();
        let parse = |name: &str, value: &str, default: &str| {
            parse_hex(value).unwrap_or_else(|| {
                tracing::warn!("Invalid {name} color '{value}', using {default}.");
                parse_hex(default).unwrap_or_default()
            })
        };
        Self {
            info: parse("info", &colors.info, &defaults.info),
            success: parse("success", &colors.success, &defaults.success),
            warning: parse("warning", &colors.warning, &defaults.warning),
            error: parse("error", &colors.error, &defaults.error),
        }
    }

    fn accent(&self, tone: Tone) -> u32 {
        match tone {
            Tone::Info => self.info,
            Tone::Success => self.success,
            Tone::Warning => self.warning,
            Tone::Error => self.error,
        }
    }
}

fn parse_hex(value: &str) -> Option<u32> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// Builder for the standard reply layout.
struct Card {
    tone: Tone,
    header: String,
    body: String,
    thumbnail: Option<String>,
    closed: bool,
}

impl Card {
    fn new(tone: Tone, header: String) -> Self {
        Self {
            tone,
            header,
            body: String::new(),
            thumbnail: None,
            closed: false,
        }
    }

    fn body(mut self, body: String) -> Self {
        self.body = body;
        self
    }

    fn thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }

    /// End with a separator as well.
    fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    fn build(self, palette: &Palette) -> Payload {
        let mut components = vec![
            Component::Text(self.header),
            Component::Separator(Spacing::Small),
            Component::Section {
                text: self.body,
                thumbnail: self.thumbnail,
            },
        ];
        if self.closed {
            components.push(Component::Separator(Spacing::Small));
        }
        Payload {
            accent: palette.accent(self.tone),
            components,
        }
    }
}

/// Renders views into payloads. Built once from the config.
#[derive(Debug, Clone)]
pub struct Renderer {
    emojis: Emojis,
    assets: AssetConfig,
    palette: Palette,
}

impl Renderer {
    pub fn new(emojis: Emojis, assets: AssetConfig, colors: &ColorConfig) -> Self {
        Self {
            emojis,
            assets,
            palette: Palette::from_config(colors),
        }
    }

    /// Pick a thumbnail: `contextual`, then the default thumbnail, then the
    /// default track artwork. Blank urls are skipped.
    pub fn thumbnail(&self, contextual: Option<&str>) -> Option<String> {
        [
            contextual,
            self.assets.default_thumbnail.as_deref(),
            self.assets.default_track_artwork.as_deref(),
        ]
        .into_iter()
        .flatten()
        .find(|url| !url.trim().is_empty())
        .map(str::to_string)
    }

    fn emoji(&self, name: &str) -> &str {
        self.emojis.get(name)
    }

    /// `"{glyph} **{title}**"`
    fn header(&self, glyph: &str, title: &str) -> String {
        format!("{} **{title}**", self.emoji(glyph))
    }

    /// A short, generic card.
    pub fn notice(
        &self,
        tone: Tone,
        title: &str,
        body: &str,
        thumbnail: Option<&str>,
    ) -> Payload {
        let glyph = match tone {
            Tone::Success => "check",
            Tone::Error => "cross",
            Tone::Info | Tone::Warning => "info",
        };
        Card::new(tone, self.header(glyph, title))
            .body(body.to_string())
            .thumbnail(self.thumbnail(thumbnail))
            .build(&self.palette)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;

    pub fn assets() -> AssetConfig {
        AssetConfig {
            default_thumbnail: Some("https://cdn.example/thumb.png".to_string()),
            default_track_artwork: Some("https://cdn.example/art.png".to_string()),
        }
    }

    pub fn renderer() -> Renderer {
        Renderer::new(Emojis::default(), assets(), &ColorConfig::default())
    }

    /// Exactly one header line and at least one section.
    pub fn assert_well_formed(payload: &Payload) {
        let texts = payload
            .components()
            .iter()
            .filter(|c| matches!(c, Component::Text(_)))
            .count();
        let sections = payload
            .components()
            .iter()
            .filter(|c| matches!(c, Component::Section { .. }))
            .count();
        assert_eq!(texts, 1, "{payload:#?}");
        assert!(sections >= 1, "{payload:#?}");
        assert!(matches!(payload.components()[0], Component::Text(_)));
    }

    #[test]
    fn thumbnail_priority() {
        let renderer = renderer();
        assert_eq!(
            renderer.thumbnail(Some("https://i.scdn.co/avatar.jpg")).as_deref(),
            Some("https://i.scdn.co/avatar.jpg")
        );
        assert_eq!(
            renderer.thumbnail(None).as_deref(),
            Some("https://cdn.example/thumb.png")
        );
        assert_eq!(
            renderer.thumbnail(Some("  ")).as_deref(),
            Some("https://cdn.example/thumb.png")
        );

        let artwork_only = Renderer::new(
            Emojis::default(),
            AssetConfig {
                default_thumbnail: None,
                default_track_artwork: Some("https://cdn.example/art.png".to_string()),
            },
            &ColorConfig::default(),
        );
        assert_eq!(
            artwork_only.thumbnail(None).as_deref(),
            Some("https://cdn.example/art.png")
        );
    }

    #[test]
    fn missing_assets_mean_no_thumbnail() {
        let bare = Renderer::new(
            Emojis::default(),
            AssetConfig::default(),
            &ColorConfig::default(),
        );
        let payload = bare.notice(Tone::Info, "Hello", "World", None);

        assert_well_formed(&payload);
        assert_eq!(payload.thumbnail(), None);
    }

    #[test]
    fn notice_layout() {
        let payload = renderer().notice(Tone::Success, "Queued", "Song", None);

        assert_well_formed(&payload);
        assert_eq!(
            payload.header(),
            Some("<a:checkmark:1471397294057197602> **Queued**")
        );
        assert_eq!(payload.accent, 0x2ecc71);
        assert_eq!(payload.components()[1], Component::Separator(Spacing::Small));
    }

    #[test]
    fn bad_colors_fall_back() {
        let colors = ColorConfig {
            error: "red".to_string(),
            info: "#12345".to_string(),
            ..ColorConfig::default()
        };
        let palette = Palette::from_config(&colors);

        assert_eq!(palette.error, 0xe74c3c);
        assert_eq!(palette.info, 0x3498db);
        assert_eq!(palette.success, 0x2ecc71);
    }

    #[test]
    fn tree_branches() {
        assert_eq!(tree(["a", "b", "c"]), "├─ a\n├─ b\n└─ c");
        assert_eq!(tree(["only"]), "└─ only");
        assert_eq!(tree(Vec::<String>::new()), "");
    }

    #[test]
    fn clamp_is_char_aware() {
        assert_eq!(clamp("héllo", 10), "héllo");
        assert_eq!(clamp("héllo", 3), "hé…");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(&Duration::from_secs(59)), "[00:59]");
        assert_eq!(format_duration(&Duration::from_secs(213)), "[03:33]");
        assert_eq!(format_duration(&Duration::from_secs(3723)), "[01:02:03]");
    }
}
