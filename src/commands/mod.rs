//! Bot commands.

pub mod descriptor;
mod filters;
mod gates;
mod play;
mod skip;
mod spotify_link;
mod stop;

use descriptor::CommandDescriptor;

use crate::Data;
use crate::YukihanaError;

/// Convenient type alias for [poise::Command].
pub type Command = poise::Command<Data, YukihanaError>;

/// Lists all the implemented commands, with their descriptors applied.
pub fn list() -> Vec<Command> {
    vec![
        text(spotify_link::link_spotify(), &descriptor::LINK_SPOTIFY),
        slash(spotify_link::spotify(), &descriptor::LINK_SPOTIFY),
        text(filters::bright(), &descriptor::BRIGHT),
        slash(filters::filter(), &descriptor::BRIGHT),
        text(play::play(), &descriptor::PLAY),
        text(skip::skip(), &descriptor::SKIP),
        text(stop::stop(), &descriptor::STOP),
    ]
}

fn text(mut command: Command, descriptor: &CommandDescriptor) -> Command {
    descriptor.apply(&mut command);
    command
}

/// Apply `descriptor` to the subcommand at the end of its slash path.
fn slash(mut command: Command, descriptor: &CommandDescriptor) -> Command {
    let path = descriptor.slash.map_or(&[][..], |s| s.path);
    command.category = Some(descriptor.category.as_str().to_string());

    match find_path(&mut command, path.get(1..).unwrap_or_default()) {
        Some(target) => descriptor.apply_slash(target),
        None => tracing::error!(
            "No slash command at '{}' for {}.",
            path.join(" "),
            descriptor.name
        ),
    }
    command
}

fn find_path<'a>(command: &'a mut Command, path: &[&str]) -> Option<&'a mut Command> {
    match path.split_first() {
        None => Some(command),
        Some((name, rest)) => command
            .subcommands
            .iter_mut()
            .find(|c| c.name == *name)
            .and_then(|sub| find_path(sub, rest)),
    }
}
