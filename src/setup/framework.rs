//! Setup for [poise::Framework]

use crate::audio;
use crate::commands;
use crate::data::UserStore;
use crate::render::Emojis;
use crate::render::Renderer;
use crate::serenity;
use crate::spotify::SpotifyClient;
use crate::Config;
use crate::Data;
use crate::YukihanaError;

/// Convenient type alias, only this [poise::Framework] type is used.
type Framework = poise::Framework<Data, YukihanaError>;

/// Construct a [poise::Framework]
pub(super) fn framework(config: Config) -> Framework {
    poise::Framework::builder()
        .options(framework_options(&config))
        .setup(|ctx, rdy, fw| framework_setup(ctx, rdy, fw, config))
        .build()
}

/// Configure options for the [Framework]
fn framework_options(config: &Config) -> poise::FrameworkOptions<Data, YukihanaError> {
    poise::FrameworkOptions {
        // Add commands to the framework
        commands: commands::list(),
        // Text commands
        prefix_options: poise::PrefixFrameworkOptions {
            prefix: Some(config.prefix().to_string()),
            mention_as_prefix: true,
            case_insensitive_commands: true,
            ..Default::default()
        },
        // Handle framework errors
        on_error: |e| crate::log::handle_framework_error(e),
        // Log when commands start
        pre_command: |ctx| {
            Box::pin(async move {
                let cmd_name = &ctx.command().qualified_name;
                let user = &ctx.author();
                tracing::info!("Started '{cmd_name}' command from {user}.")
            })
        },
        // Log when finishing commands
        post_command: |ctx| {
            Box::pin(async move {
                let cmd_name = &ctx.command().qualified_name;
                let user = &ctx.author();
                tracing::info!("Finished '{cmd_name}' command from {user}.")
            })
        },
        ..Default::default()
    }
}

/// Construct future that runs on startup
fn framework_setup<'a>(
    ctx: &'a serenity::Context,
    rdy: &'a serenity::Ready,
    fw: &'a Framework,
    config: Config,
) -> poise::BoxFuture<'a, Result<Data, YukihanaError>> {
    Box::pin(async move {
        // Register the commands
        let commands = &fw.options().commands;
        let app_commands = poise::builtins::create_application_commands(commands);

        serenity::Command::set_global_commands(&ctx, app_commands.clone()).await?;
        if let Some(dev_guild) = config.dev_guild() {
            // This is faster than global registers, useful for development.
            tracing::info!("Registering commands on dev guild.");
            dev_guild.set_commands(ctx, app_commands).await?;
        }

        let lavalink = audio::connect(config.lavalink(), rdy.user.id).await;

        let users = UserStore::open(config.users_file()).await?;

        let spotify = SpotifyClient::new(reqwest::Client::new(), config.spotify_credentials());

        let emojis = Emojis::with_overrides(config.emoji_overrides());
        let renderer = Renderer::new(emojis, config.assets().clone(), config.colors());

        // Simple message that logs when the bot has initialized
        let bot_name = &rdy.user.name;
        tracing::info!("{bot_name} is ready!");

        let notify_list = config.notify_list(fw);

        let data = Data {
            notify_list,
            lavalink,
            spotify,
            users,
            renderer,
        };

        Ok(data)
    })
}
