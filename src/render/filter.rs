//! Cards for audio filter commands.

use super::tree;
use super::Card;
use super::Payload;
use super::Renderer;
use super::Tone;

#[derive(Debug, Clone, Copy)]
pub enum FilterView<'a> {
    Applied { name: &'a str, effect: &'a str },
    Failed { message: &'a str },
}

impl Renderer {
    pub fn filter(&self, view: FilterView<'_>) -> Payload {
        let card = match view {
            FilterView::Applied { name, effect } => {
                let body = format!(
                    "**Filter Information**\n\n{}\n\n\
                     *Filter has been applied to the current playback*",
                    tree([
                        format!("**{} Filter:** {name} Equalizer", self.emoji("music")),
                        format!("**{} Status:** Applied successfully", self.emoji("check")),
                        format!("**{} Effect:** {effect}", self.emoji("info")),
                    ]),
                );
                Card::new(Tone::Success, self.header("music", "Filter Applied")).body(body)
            }
            FilterView::Failed { message } => {
                let body = format!(
                    "**Something went wrong**\n\n{}\n\n\
                     *Please check your input and try again*",
                    tree([
                        format!("**{} Issue:** {message}", self.emoji("info")),
                        format!(
                            "**{} Action:** Try again or contact support",
                            self.emoji("reset")
                        ),
                    ]),
                );
                Card::new(Tone::Error, self.header("cross", "Error")).body(body)
            }
        };

        card.thumbnail(self.thumbnail(None)).build(&self.palette)
    }
}
