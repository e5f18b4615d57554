//! Static metadata for every command.
//!
//! Poise builds the commands themselves. The records here carry the parts
//! poise has no slot for (usage, examples, access gates) and are applied to
//! the poise commands when the framework is built.

use std::time::Duration;

use itertools::Itertools;

use super::Command;

/// Preconditions checked before a command runs, in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gates {
    /// The author must be in a voice channel.
    pub voice: bool,
    /// The author must be in the bot's voice channel.
    pub same_voice: bool,
    /// The guild must have a player.
    pub player: bool,
    /// The player must be playing something.
    pub playing: bool,
}

impl Gates {
    pub const NONE: Gates = Gates {
        voice: false,
        same_voice: false,
        player: false,
        playing: false,
    };

    pub const ALL: Gates = Gates {
        voice: true,
        same_voice: true,
        player: true,
        playing: true,
    };

    pub fn any(&self) -> bool {
        self.voice || self.same_voice || self.player || self.playing
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Music,
    Filters,
    Spotify,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Music => "Music",
            Category::Filters => "Filters",
            Category::Spotify => "Spotify",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SlashOption {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// How the command looks as a slash command.
#[derive(Debug, Clone, Copy)]
pub struct SlashDescriptor {
    /// Full path, `["spotify", "link"]` is `/spotify link`.
    pub path: &'static [&'static str],
    pub description: &'static str,
    pub options: &'static [SlashOption],
}

impl SlashDescriptor {
    pub fn qualified_name(&self) -> String {
        self.path.join(" ")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CommandDescriptor {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub category: Category,
    pub description: &'static str,
    /// Arguments after the command name, e.g. `<profile_url>`.
    pub usage: &'static str,
    /// Full invocations without the prefix.
    pub examples: &'static [&'static str],
    pub cooldown: Duration,
    pub gates: Gates,
    pub slash: Option<SlashDescriptor>,
}

impl CommandDescriptor {
    /// Does `name` refer to this command, by name, alias or slash path?
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name
            || self.aliases.contains(&name)
            || self.slash.is_some_and(|s| s.qualified_name() == name)
    }

    /// Every way to invoke the command, arguments included.
    pub fn forms(&self, prefix: &str) -> Vec<String> {
        let with_usage = |head: String| match self.usage {
            "" => head,
            usage => format!("{head} {usage}"),
        };

        let text = std::iter::once(self.name)
            .chain(self.aliases.iter().copied())
            .map(|name| with_usage(format!("{prefix}{name}")));
        let slash = self.slash.map(|s| {
            let args = s
                .options
                .iter()
                .map(|o| match o.required {
                    true => format!("<{}>", o.name),
                    false => format!("[{}]", o.name),
                })
                .join(" ");
            match args.as_str() {
                "" => format!("/{}", s.qualified_name()),
                args => format!("/{} {args}", s.qualified_name()),
            }
        });

        text.chain(slash).collect()
    }

    /// The first example, with the prefix.
    pub fn example(&self, prefix: &str) -> Option<String> {
        self.examples.first().map(|e| format!("{prefix}{e}"))
    }

    /// Copy this record onto its text command.
    pub fn apply(&self, command: &mut Command) {
        command.aliases = self.aliases.iter().map(|a| a.to_string()).collect();
        command.description = Some(self.description.to_string());
        let mut help = format!("Usage: {} {}", self.name, self.usage);
        for example in self.examples {
            help += &format!("\nExample: {example}");
        }
        command.help_text = Some(help.trim_end().to_string());
        self.apply_shared(command);
    }

    /// Copy this record onto the slash command at the end of its path.
    pub fn apply_slash(&self, command: &mut Command) {
        if let Some(slash) = self.slash {
            command.description = Some(slash.description.to_string());
        }
        self.apply_shared(command);
    }

    fn apply_shared(&self, command: &mut Command) {
        command.category = Some(self.category.as_str().to_string());
        if let Ok(cooldowns) = command.cooldown_config.get_mut() {
            cooldowns.user = Some(self.cooldown);
        }
        if self.gates.any() {
            command.checks.push(super::gates::check);
        }
    }
}

pub static LINK_SPOTIFY: CommandDescriptor = CommandDescriptor {
    name: "link-spotify",
    aliases: &["spotify-link", "connect-spotify"],
    category: Category::Spotify,
    description: "Link your Spotify profile to access your public playlists",
    usage: "<profile_url>",
    examples: &[
        "link-spotify https://open.spotify.com/user/your_username",
        "spotify-link https://open.spotify.com/user/123456789",
    ],
    cooldown: Duration::from_secs(5),
    gates: Gates::NONE,
    slash: Some(SlashDescriptor {
        path: &["spotify", "link"],
        description: "Link your Spotify profile to access playlists",
        options: &[SlashOption {
            name: "profile_url",
            description: "Your Spotify profile URL",
            required: true,
        }],
    }),
};

pub static BRIGHT: CommandDescriptor = CommandDescriptor {
    name: "bright",
    aliases: &[],
    category: Category::Filters,
    description: "Apply bright equalizer preset to the music",
    usage: "",
    examples: &["bright"],
    cooldown: Duration::from_secs(2),
    gates: Gates::ALL,
    slash: Some(SlashDescriptor {
        path: &["filter", "bright"],
        description: "Apply bright equalizer preset to the music",
        options: &[],
    }),
};

pub static PLAY: CommandDescriptor = CommandDescriptor {
    name: "play",
    aliases: &["p"],
    category: Category::Music,
    description: "Play a url or search YouTube",
    usage: "<query>",
    examples: &["play never gonna give you up"],
    cooldown: Duration::from_secs(2),
    gates: Gates {
        voice: true,
        ..Gates::NONE
    },
    slash: Some(SlashDescriptor {
        path: &["play"],
        description: "Play a url or search YouTube",
        options: &[SlashOption {
            name: "query",
            description: "Url or search terms",
            required: true,
        }],
    }),
};

pub static SKIP: CommandDescriptor = CommandDescriptor {
    name: "skip",
    aliases: &["s", "next"],
    category: Category::Music,
    description: "Skip the current track",
    usage: "",
    examples: &["skip"],
    cooldown: Duration::from_secs(2),
    gates: Gates::ALL,
    slash: Some(SlashDescriptor {
        path: &["skip"],
        description: "Skip the current track",
        options: &[],
    }),
};

pub static STOP: CommandDescriptor = CommandDescriptor {
    name: "stop",
    aliases: &["leave", "dc"],
    category: Category::Music,
    description: "Stop playback, clear the queue and leave voice",
    usage: "",
    examples: &["stop"],
    cooldown: Duration::from_secs(2),
    gates: Gates {
        voice: true,
        same_voice: true,
        player: true,
        playing: false,
    },
    slash: Some(SlashDescriptor {
        path: &["stop"],
        description: "Stop playback, clear the queue and leave voice",
        options: &[],
    }),
};

pub static ALL: [&CommandDescriptor; 5] = [&LINK_SPOTIFY, &BRIGHT, &PLAY, &SKIP, &STOP];

/// Find a descriptor by name, alias or slash path.
pub fn find(name: &str) -> Option<&'static CommandDescriptor> {
    ALL.iter().copied().find(|d| d.answers_to(name))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn find_by_name_alias_and_slash_path() {
        assert_eq!(find("link-spotify").map(|d| d.name), Some("link-spotify"));
        assert_eq!(find("connect-spotify").map(|d| d.name), Some("link-spotify"));
        assert_eq!(find("spotify link").map(|d| d.name), Some("link-spotify"));
        assert_eq!(find("filter bright").map(|d| d.name), Some("bright"));
        assert!(find("spotify").is_none());
    }

    #[test]
    fn names_are_unique() {
        let names = ALL
            .iter()
            .flat_map(|d| std::iter::once(d.name).chain(d.aliases.iter().copied()))
            .collect::<Vec<_>>();
        assert_eq!(names.len(), names.iter().unique().count());
    }

    #[test]
    fn link_forms_cover_text_and_slash() {
        assert_eq!(
            LINK_SPOTIFY.forms("."),
            [
                ".link-spotify <profile_url>",
                ".spotify-link <profile_url>",
                ".connect-spotify <profile_url>",
                "/spotify link <profile_url>",
            ]
        );
        assert_eq!(
            LINK_SPOTIFY.example("!").as_deref(),
            Some("!link-spotify https://open.spotify.com/user/your_username")
        );
    }

    #[test]
    fn bright_requires_every_gate() {
        assert_eq!(BRIGHT.gates, Gates::ALL);
        assert_eq!(BRIGHT.forms("."), [".bright", "/filter bright"]);
        assert_eq!(BRIGHT.cooldown, Duration::from_secs(2));
    }

    #[test]
    fn link_has_no_gates() {
        assert!(!LINK_SPOTIFY.gates.any());
    }
}
