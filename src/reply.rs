//! Sending [Payload]s, whether a command came from a message or an interaction.

use std::sync::atomic::Ordering;

use async_trait::async_trait;
use poise::ReplyHandle;
use serenity::ChannelId;
use serenity::CreateMessage;
use serenity::EditInteractionResponse;
use serenity::EditMessage;
use serenity::MessageId;

use crate::render::Payload;
use crate::serenity;
use crate::Context;
use crate::YukihanaError;

/// Where an invocation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    /// A prefixed text message.
    Text,
    /// A slash command interaction.
    Slash,
}

/// What a command can do to answer its invoker.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Refers to a sent reply so it can be edited later.
    type Handle: Send + Sync;

    /// Only [InvocationKind::Slash] invocations carry reply state that can be edited.
    fn kind(&self) -> InvocationKind;

    /// Has this invocation already been replied to or deferred?
    fn acknowledged(&self) -> bool;

    /// Can this invocation be replied to directly?
    fn can_reply(&self) -> bool {
        true
    }

    async fn reply(&self, payload: &Payload) -> Result<Self::Handle, YukihanaError>;

    /// Replace the response to an acknowledged invocation.
    async fn edit_reply(&self, payload: &Payload) -> Result<Self::Handle, YukihanaError>;

    /// Send a plain message to the invoking channel.
    async fn channel_send(&self, payload: &Payload) -> Result<Self::Handle, YukihanaError>;

    async fn edit(&self, handle: &Self::Handle, payload: &Payload) -> Result<(), YukihanaError>;
}

/// Answer the invocation: edit if an interaction was already acknowledged,
/// reply if possible, otherwise post in the channel.
pub async fn send<T: Transport>(transport: &T, payload: &Payload) -> Result<T::Handle, YukihanaError> {
    let editable = transport.kind() == InvocationKind::Slash && transport.acknowledged();
    if editable {
        transport.edit_reply(payload).await
    } else if transport.can_reply() {
        transport.reply(payload).await
    } else {
        transport.channel_send(payload).await
    }
}

/// Replace an earlier reply in place.
pub async fn edit_existing<T: Transport>(
    transport: &T,
    handle: &T::Handle,
    payload: &Payload,
) -> Result<(), YukihanaError> {
    transport.edit(handle, payload).await
}

/// [Transport] over a [poise::Context].
pub struct PoiseTransport<'a> {
    ctx: Context<'a>,
}

impl<'a> PoiseTransport<'a> {
    pub fn new(ctx: Context<'a>) -> Self {
        Self { ctx }
    }
}

/// A message sent through a [PoiseTransport].
pub enum PoiseHandle<'a> {
    Reply(ReplyHandle<'a>),
    Message {
        channel: ChannelId,
        message: MessageId,
    },
}

#[async_trait]
impl<'a> Transport for PoiseTransport<'a> {
    type Handle = PoiseHandle<'a>;

    fn kind(&self) -> InvocationKind {
        match self.ctx {
            poise::Context::Prefix(_) => InvocationKind::Text,
            poise::Context::Application(_) => InvocationKind::Slash,
        }
    }

    fn acknowledged(&self) -> bool {
        match self.ctx {
            poise::Context::Prefix(_) => false,
            poise::Context::Application(app) => {
                app.has_sent_initial_response.load(Ordering::SeqCst)
            }
        }
    }

    async fn reply(&self, payload: &Payload) -> Result<Self::Handle, YukihanaError> {
        let handle = self.ctx.send(payload.reply()).await?;
        Ok(PoiseHandle::Reply(handle))
    }

    async fn edit_reply(&self, payload: &Payload) -> Result<Self::Handle, YukihanaError> {
        match self.ctx {
            poise::Context::Application(app) => {
                let edit = EditInteractionResponse::new().embed(payload.embed());
                let message = app
                    .interaction
                    .edit_response(self.ctx.serenity_context(), edit)
                    .await?;
                Ok(PoiseHandle::Message {
                    channel: message.channel_id,
                    message: message.id,
                })
            }
            // Messages have no reply state to edit.
            poise::Context::Prefix(_) => self.reply(payload).await,
        }
    }

    async fn channel_send(&self, payload: &Payload) -> Result<Self::Handle, YukihanaError> {
        let message = self
            .ctx
            .channel_id()
            .send_message(self.ctx.serenity_context(), CreateMessage::new().embed(payload.embed()))
            .await?;
        Ok(PoiseHandle::Message {
            channel: message.channel_id,
            message: message.id,
        })
    }

    async fn edit(&self, handle: &Self::Handle, payload: &Payload) -> Result<(), YukihanaError> {
        match handle {
            PoiseHandle::Reply(reply) => reply.edit(self.ctx, payload.reply()).await?,
            PoiseHandle::Message { channel, message } => {
                channel
                    .edit_message(
                        self.ctx.serenity_context(),
                        *message,
                        EditMessage::new().embed(payload.embed()),
                    )
                    .await?;
            }
        }
        Ok(())
    }
}
