//! Cards for the Spotify link command.

use chrono::NaiveDate;

use super::tree;
use super::Card;
use super::Payload;
use super::Renderer;
use super::Tone;
use crate::spotify::SpotifyUser;

/// Every state the link command can be in.
#[derive(Debug, Clone, Copy)]
pub enum LinkView<'a> {
    /// No url was given.
    Usage {
        /// Every way to invoke the command, arguments included.
        forms: &'a [String],
        example: Option<&'a str>,
    },
    Loading,
    InvalidUrl,
    NotFound,
    Success {
        profile: &'a SpotifyUser,
        playlist_count: usize,
        linked_on: NaiveDate,
    },
    Error {
        message: &'a str,
    },
}

impl Renderer {
    pub fn link(&self, view: LinkView<'_>) -> Payload {
        let e = |name| self.emoji(name);

        let card = match view {
            LinkView::Usage { forms, example } => {
                let mut body = format!(
                    "**Missing Profile URL**\n\n\
                     **{} Status:** URL Required\n\n\
                     Please provide your Spotify profile URL to link your account.\n\n\
                     **{} Usage:**\n{}\n\n",
                    e("cross"),
                    e("info"),
                    tree(forms.iter().map(|f| format!("`{f}`"))),
                );
                if let Some(example) = example {
                    body += &format!("**{} Example:**\n`{example}`\n\n", e("folder"));
                }
                body += "*Get your profile URL from the Spotify app or web player*";

                Card::new(Tone::Info, self.header("info", "Link Spotify Profile"))
                    .body(body)
                    .thumbnail(self.thumbnail(None))
            }
            LinkView::Loading => {
                let body = format!(
                    "**Verifying Spotify Profile**\n\n\
                     **{} Status:** Connecting\n\n\
                     Please wait while we verify your Spotify profile and fetch your data.\n\n\
                     *This may take a few seconds...*",
                    e("loading"),
                );
                Card::new(Tone::Info, self.header("loading", "Connecting to Spotify"))
                    .body(body)
                    .thumbnail(self.thumbnail(None))
            }
            LinkView::InvalidUrl => {
                let body = format!(
                    "**Invalid Profile URL Format**\n\n\
                     **{} Status:** URL Invalid\n\n\
                     Please provide a valid Spotify profile URL.\n\n\
                     **{} Valid Format:**\n{}\n\n\
                     **{} How to get your URL:**\n{}\n\n\
                     *Try again with a valid profile URL*",
                    e("cross"),
                    e("check"),
                    tree([
                        "`https://open.spotify.com/user/username`",
                        "`https://open.spotify.com/user/123456789`",
                        "Must be a user profile URL",
                    ]),
                    e("info"),
                    tree([
                        "Open Spotify app or web player",
                        "Go to your profile",
                        "Click the three dots (...)",
                        "Select \"Copy link to profile\"",
                    ]),
                );
                Card::new(Tone::Warning, self.header("cross", "Invalid Spotify URL"))
                    .body(body)
                    .thumbnail(self.thumbnail(None))
            }
            LinkView::NotFound => {
                let body = format!(
                    "**Spotify Profile Not Accessible**\n\n\
                     **{} Status:** Profile Not Found\n\n\
                     Could not access the Spotify profile at the provided URL.\n\n\
                     **{} Possible Issues:**\n{}\n\n\
                     **{} Solutions:**\n{}\n\n\
                     *Please verify your profile URL and try again*",
                    e("cross"),
                    e("info"),
                    tree([
                        "Profile URL is incorrect",
                        "Profile is set to private",
                        "Profile has been deleted",
                        "Temporary Spotify API issue",
                    ]),
                    e("reset"),
                    tree([
                        "Double-check your profile URL",
                        "Make sure your profile is public",
                        "Try again in a few minutes",
                    ]),
                );
                Card::new(Tone::Warning, self.header("cross", "Profile Not Found"))
                    .body(body)
                    .thumbnail(self.thumbnail(None))
            }
            LinkView::Success {
                profile,
                playlist_count,
                linked_on,
            } => {
                let playlists = if playlist_count > 0 {
                    format!(
                        "**{} Public Playlists:** {playlist_count} found\n\n\
                         **{} Next Steps:**\n{}\n\n",
                        e("folder"),
                        e("info"),
                        tree([
                            "Use `spotify-playlists` to view your playlists",
                            "Access enhanced Spotify features",
                        ]),
                    )
                } else {
                    format!(
                        "**{} Public Playlists:** None found\n\n\
                         **{} Note:**\n{}\n\n",
                        e("folder"),
                        e("info"),
                        tree([
                            "Make your playlists public to use them",
                            "You can still access other Spotify features",
                            "Re-link anytime to refresh playlist data",
                        ]),
                    )
                };
                let body = format!(
                    "**Spotify profile successfully linked**\n\n\
                     **{} Profile:** {}\n\
                     **{} Linked On:** {}\n\
                     {playlists}\
                     *Welcome to Spotify integration!*",
                    e("check"),
                    profile.display_name.as_deref().unwrap_or("Unknown"),
                    e("info"),
                    linked_on.format("%-m/%-d/%Y"),
                );
                Card::new(
                    Tone::Success,
                    self.header("check", "Profile Linked Successfully"),
                )
                .body(body)
                .thumbnail(self.thumbnail(profile.avatar()))
            }
            LinkView::Error { message } => Card::new(Tone::Error, self.header("cross", "Error"))
                .body(message.to_string())
                .thumbnail(self.thumbnail(None)),
        };

        card.closed().build(&self.palette)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::test::assert_well_formed;
    use crate::render::test::renderer;
    use crate::render::Component;
    use crate::spotify::SpotifyImage;

    fn profile(avatar: Option<&str>) -> SpotifyUser {
        SpotifyUser {
            id: "someone".to_string(),
            display_name: Some("Some One".to_string()),
            images: avatar
                .map(|url| SpotifyImage {
                    url: url.to_string(),
                })
                .into_iter()
                .collect(),
        }
    }

    fn body(payload: &Payload) -> &str {
        payload
            .components()
            .iter()
            .find_map(|c| match c {
                Component::Section { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    #[test]
    fn every_state_is_well_formed() {
        let renderer = renderer();
        let forms = ["link-spotify <profile_url>".to_string()];
        let user = profile(None);

        let views = [
            LinkView::Usage {
                forms: &forms,
                example: Some("link-spotify https://open.spotify.com/user/x"),
            },
            LinkView::Usage {
                forms: &[],
                example: None,
            },
            LinkView::Loading,
            LinkView::InvalidUrl,
            LinkView::NotFound,
            LinkView::Success {
                profile: &user,
                playlist_count: 0,
                linked_on: date(),
            },
            LinkView::Success {
                profile: &user,
                playlist_count: 3,
                linked_on: date(),
            },
            LinkView::Error { message: "nope" },
        ];

        for view in views {
            let payload = renderer.link(view);
            assert_well_formed(&payload);
            assert!(payload.thumbnail().is_some());
        }
    }

    #[test]
    fn usage_lists_every_form() {
        let forms = [
            "link-spotify <profile_url>".to_string(),
            "spotify-link <profile_url>".to_string(),
        ];
        let payload = renderer().link(LinkView::Usage {
            forms: &forms,
            example: None,
        });

        assert!(body(&payload).contains("├─ `link-spotify <profile_url>`"));
        assert!(body(&payload).contains("└─ `spotify-link <profile_url>`"));
        assert!(!body(&payload).contains("Example"));
    }

    #[test]
    fn success_prefers_the_profile_avatar() {
        let user = profile(Some("https://i.scdn.co/image/abc"));
        let payload = renderer().link(LinkView::Success {
            profile: &user,
            playlist_count: 2,
            linked_on: date(),
        });

        assert_eq!(payload.thumbnail(), Some("https://i.scdn.co/image/abc"));
        assert!(body(&payload).contains("Some One"));
        assert!(body(&payload).contains("3/9/2024"));
        assert!(body(&payload).contains("2 found"));
    }

    #[test]
    fn zero_playlists_is_still_a_success() {
        let user = SpotifyUser {
            display_name: None,
            ..profile(None)
        };
        let payload = renderer().link(LinkView::Success {
            profile: &user,
            playlist_count: 0,
            linked_on: date(),
        });

        assert!(payload.header().unwrap().contains("Profile Linked Successfully"));
        assert!(body(&payload).contains("None found"));
        assert!(body(&payload).contains("Unknown"));
        assert_eq!(payload.thumbnail(), Some("https://cdn.example/thumb.png"));
    }

    #[test]
    fn error_shows_only_the_given_message() {
        let payload = renderer().link(LinkView::Error {
            message: "Please try again later.",
        });

        assert_eq!(body(&payload), "Please try again later.");
    }
}
