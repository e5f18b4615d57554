//! Logging functionality and error reporting.
//! The logging library of choice is [tracing].

use itertools::Itertools;
use poise::BoxFuture;
use poise::FrameworkError;
use serenity::CreateMessage;
use tracing::debug;
use tracing::error;
use tracing::level_filters::LevelFilter;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer,
};

use crate::commands::Command;
use crate::error::UserError;
use crate::render::Tone;
use crate::serenity;
use crate::Config;
use crate::Context;
use crate::Data;
use crate::YukihanaError;

/// The name of this crate, used to set filter target.
const THIS_CRATE: &str = env!("CARGO_CRATE_NAME");

/// Setup format layers, tracing subscribers, and installs tracing.
pub(super) fn install_tracing(config: &Config) -> Option<WorkerGuard> {
    let verbose = config.console_debug();
    // Uses local time.
    let timer = fmt::time::ChronoLocal::rfc_3339();

    // INFO and above everywhere, DEBUG for this crate when asked for.
    let mut targets = Targets::new().with_default(LevelFilter::INFO);
    if verbose {
        targets = targets.with_target(THIS_CRATE, LevelFilter::DEBUG);
    }

    let console_layer = fmt::layer()
        .with_ansi(true)
        .with_file(verbose)
        .with_line_number(verbose)
        .with_target(true)
        .with_timer(timer.clone())
        .pretty()
        .with_filter(targets.clone());

    // Files land in `log_dir` as "{THIS_CRATE}.log.{TIMESTAMP}", one per hour.
    let (file_layer, guard) = if config.logs_enabled() {
        let appender =
            tracing_appender::rolling::hourly(config.log_dir(), format!("{THIS_CRATE}.log"));
        let (writer, guard) = tracing_appender::non_blocking(appender);

        let layer = fmt::layer()
            .with_ansi(false)
            .with_file(verbose)
            .with_line_number(verbose)
            .with_target(true)
            .with_timer(timer)
            .with_writer(writer)
            .compact()
            .with_filter(targets);

        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

/// Shown when a command hits something unexpected.
const BUG_REPLY: &str = "Something went wrong... A bug report has been sent.";

/// Poise `on_error` hook.
///
/// Errors the invoker caused (see [user_error]) get a warning card and a debug log.
/// Everything else with a command context is a bug, which also triggers a [notify_bug].
/// Errors without a context are only logged.
pub fn handle_framework_error(err: FrameworkError<Data, YukihanaError>) -> BoxFuture<()> {
    Box::pin(async move {
        let Some(ctx) = err.ctx() else {
            log_without_context(err);
            return;
        };

        let response = match user_error(&err) {
            Some(reason) => Response::builder()
                .ctx(ctx)
                .reply(reason.to_string())
                .maybe_add_info(parse_failure(&err))
                .source(reason)
                .build(),
            None => {
                let (source, reply) = unexpected(err);
                Response::builder()
                    .ctx(ctx)
                    .reply(reply)
                    .source(source)
                    .notify(true)
                    .build()
            }
        };

        response.send().await;
    })
}

/// The [UserError] behind `err`, if the invoker can fix it themselves.
fn user_error(err: &FrameworkError<Data, YukihanaError>) -> Option<UserError> {
    let reason = match err {
        FrameworkError::Command {
            error: YukihanaError::UserError(reason),
            ..
        }
        | FrameworkError::CommandCheckFailed {
            error: Some(YukihanaError::UserError(reason)),
            ..
        } => reason.clone(),
        FrameworkError::CommandCheckFailed { error: None, .. } => UserError::NotAllowed,
        FrameworkError::SubcommandRequired { ctx } => UserError::MissingSubcommand {
            subcmds: subcommand_names(ctx.command()),
        },
        FrameworkError::ArgumentParse { input, .. } => UserError::BadArgs {
            input: input.clone(),
        },
        FrameworkError::CooldownHit {
            remaining_cooldown, ..
        } => UserError::OnCooldown {
            remaining_cooldown: *remaining_cooldown,
        },
        FrameworkError::MissingBotPermissions {
            missing_permissions,
            ..
        } => UserError::MissingBotPermissions {
            missing_permissions: *missing_permissions,
        },
        FrameworkError::MissingUserPermissions {
            missing_permissions,
            ..
        } => UserError::MissingUserPermissions {
            missing_permissions: *missing_permissions,
        },
        FrameworkError::NotAnOwner { .. } => UserError::NotOwner,
        FrameworkError::GuildOnly { .. } => UserError::GuildOnly,
        FrameworkError::DmOnly { .. } => UserError::DmOnly,
        FrameworkError::NsfwOnly { .. } => UserError::NsfwOnly,
        _ => return None,
    };
    Some(reason)
}

/// Why an argument didn't parse, for the log line.
fn parse_failure(err: &FrameworkError<Data, YukihanaError>) -> Option<String> {
    match err {
        FrameworkError::ArgumentParse { error, .. } => Some(error.to_string()),
        _ => None,
    }
}

/// Pull the cause and the reply text out of an error that is not the invoker's fault.
fn unexpected(err: FrameworkError<Data, YukihanaError>) -> (YukihanaError, &'static str) {
    match err {
        FrameworkError::Command { error, .. }
        | FrameworkError::CommandCheckFailed {
            error: Some(error), ..
        } => (error, BUG_REPLY),
        FrameworkError::CommandPanic { payload, .. } => (
            YukihanaError::Panic { payload },
            "Something went horribly wrong... A bug report has been sent.",
        ),
        FrameworkError::CommandStructureMismatch { description, .. } => (
            YukihanaError::CommandStructureMismatch {
                description: description.to_string(),
            },
            "Command structure mismatch. Please wait until discord catches up to a bot update.",
        ),
        other => (
            YukihanaError::Unhandled {
                description: other.to_string(),
            },
            BUG_REPLY,
        ),
    }
}

/// Errors that happen outside any command. Nobody to reply to.
fn log_without_context(err: FrameworkError<Data, YukihanaError>) {
    match err {
        FrameworkError::Setup { error, .. } => error!("Error during startup: {error}"),
        FrameworkError::EventHandler { error, event, .. } => {
            let name = event.snake_case_name();
            error!("Error while handling '{name}' event: {error}")
        }
        // Anyone can type the prefix, so unknown text commands are noise.
        FrameworkError::UnknownCommand { msg_content, .. } => {
            debug!("Ignoring unknown command: {msg_content}")
        }
        FrameworkError::UnknownInteraction { interaction, .. } => {
            let name = &interaction.data.name;
            error!("Received unknown interaction: {name}")
        }
        FrameworkError::DynamicPrefix { .. } => error!("Dynamic prefixes are not supported."),
        other => error!("Unhandled framework error: {other}"),
    }
}

/// Names of the subcommands of `command`, comma separated.
fn subcommand_names(command: &Command) -> String {
    command.subcommands.iter().map(|s| s.name.as_str()).join(", ")
}

/// Sends a notification (via private message) to users in the notify list.
/// If message fails, only log and don't retry.
async fn notify_bug(ctx: Context<'_>, content: impl Into<String>) {
    let message = CreateMessage::new().content(content);

    for user in &ctx.data().notify_list {
        if let Err(e) = user.direct_message(ctx, message.clone()).await {
            error!("Failed to send bug notification. {e}");
        }
    }
}

/// Helper function to create debug information from [Context]
fn debug_info(ctx: Context<'_>) -> String {
    let user = &ctx.author().name;
    let cmd = &ctx.command().name;
    let user_input = ctx.invocation_string();
    format!("{user} tried to use {cmd} with {user_input}.")
}

/// Log line for a failure, with any extra detail appended.
fn log_line(source: &YukihanaError, add_info: Option<&str>) -> String {
    match add_info {
        Some(info) => format!("{source} | {info}"),
        None => source.to_string(),
    }
}

/// Structured response to errors.
/// Logs at [debug level](tracing::debug), or at [error level](tracing::error) with
/// a bug notification when `notify` is set.
#[derive(bon::Builder)]
#[builder(on(String, into))]
struct Response<'a> {
    ctx: Context<'a>,
    /// The reason for this reply, usually the error causing the response.
    #[builder(into)]
    source: YukihanaError,
    /// Card text shown to the invoker.
    reply: String,
    /// Additional information to log
    add_info: Option<String>,
    /// Set to `true` for bugs.
    #[builder(default = false)]
    notify: bool,
}

impl Response<'_> {
    /// Execute the response
    async fn send(self) {
        let ctx = self.ctx;
        let log_message = log_line(&self.source, self.add_info.as_deref());

        let (tone, title) = if self.notify {
            error!("{log_message}");
            let content = format!("Debug Info: {}\n{log_message}", debug_info(ctx));
            notify_bug(ctx, content).await;
            (Tone::Error, "Error")
        } else {
            debug!("{log_message}");
            (Tone::Warning, "Can't do that")
        };

        // Text commands can't be ephemeral, those get a normal reply.
        let card = ctx.data().renderer.notice(tone, title, &self.reply, None);
        if let Err(e) = ctx.send(card.reply().ephemeral(true)).await {
            error!("Failed to send error reply. {e}")
        }
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;
    use crate::commands;

    #[test]
    fn log_line_appends_extra_detail() {
        let source = YukihanaError::from(UserError::OnCooldown {
            remaining_cooldown: Duration::from_millis(2500),
        });

        assert_eq!(log_line(&source, None), "Slow down! Try again in 2.5s.");
        assert_eq!(
            log_line(&source, Some("too fast")),
            "Slow down! Try again in 2.5s. | too fast"
        );
    }

    #[test]
    fn missing_subcommand_lists_every_choice() {
        let commands = commands::list();
        let spotify = commands.iter().find(|c| c.name == "spotify").unwrap();

        assert_eq!(subcommand_names(spotify), "link");
        let reason = UserError::MissingSubcommand {
            subcmds: subcommand_names(spotify),
        };
        assert_eq!(reason.to_string(), "Pick a subcommand: link");
    }
}
