//! The chat-widget session runtime.
//!
//! Single-threaded cooperative model: `press` and `say` take `&mut self`, so
//! at most one bot reply is ever outstanding — the same contract the UI
//! enforces by disabling input while the bot is "typing". A session lives
//! from widget mount to unmount; opening and closing the panel in between
//! does not touch it, so a scheduled reply always lands in the transcript.
//! Dropping the session cancels any in-flight work along with the transcript
//! it would have landed in.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use kolzo_core::dialogue::engine::{DialogueEngine, DialogueError, StorefrontDialogue};
use kolzo_core::dialogue::replies::{self, BotReply, ButtonSpec};
use kolzo_core::dialogue::states::{ChatContext, ChatEffect, ChatEvent, ChatFlow};
use kolzo_core::newsletter::{NewsletterService, SubscribeRequest, SubscribeResolution};

use crate::capabilities::{
    Clock, ExternalLinks, InMemorySessionStore, Navigator, NoopLinks, NoopNavigator, SessionStore,
    SystemClock, RECENTLY_SUBSCRIBED_FLAG,
};
use crate::transcript::{Message, Transcript};

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error(transparent)]
    Dialogue(#[from] DialogueError),
}

#[derive(Clone)]
pub struct SessionCapabilities {
    pub navigator: Arc<dyn Navigator>,
    pub links: Arc<dyn ExternalLinks>,
    pub newsletter: Arc<dyn NewsletterService>,
    pub store: Arc<dyn SessionStore>,
    pub clock: Arc<dyn Clock>,
}

impl SessionCapabilities {
    /// Inert capabilities: navigation and links go nowhere, every subscribe
    /// succeeds. Useful for the CLI chat command and tests that only care
    /// about the dialogue itself.
    pub fn inert() -> Self {
        Self {
            navigator: Arc::new(NoopNavigator),
            links: Arc::new(NoopLinks),
            newsletter: Arc::new(kolzo_core::newsletter::NoopNewsletterService),
            store: Arc::new(InMemorySessionStore::default()),
            clock: Arc::new(SystemClock),
        }
    }
}

pub struct ChatSession {
    engine: DialogueEngine<StorefrontDialogue>,
    state: ChatFlow,
    context: ChatContext,
    transcript: Transcript,
    capabilities: SessionCapabilities,
    typing_delay: Duration,
}

impl ChatSession {
    pub fn new(capabilities: SessionCapabilities, typing_delay: Duration) -> Self {
        let engine = DialogueEngine::default();
        let state = engine.initial_state();
        Self {
            engine,
            state,
            context: ChatContext::default(),
            transcript: Transcript::default(),
            capabilities,
            typing_delay,
        }
    }

    /// Greets the visitor with the root menu. Called once when the widget
    /// mounts; the greeting is immediate, only replies to user turns carry
    /// the typing delay.
    pub fn open(&mut self) {
        let reply = replies::root_menu();
        self.append_bot(reply);
    }

    pub fn state(&self) -> &ChatFlow {
        &self.state
    }

    pub fn context(&self) -> &ChatContext {
        &self.context
    }

    pub fn transcript(&self) -> &[Message] {
        self.transcript.messages()
    }

    /// Handles a button click: the button's label is echoed as the user
    /// message and its event drives the engine.
    pub async fn press(&mut self, button: &ButtonSpec) -> Result<(), WidgetError> {
        self.append_user(button.label.clone());
        self.advance(button.event.clone()).await
    }

    /// Handles free-text input. Interpretation depends solely on the current
    /// flow; the engine decides between email capture, order-id capture and
    /// the canned fallback.
    pub async fn say(&mut self, text: &str) -> Result<(), WidgetError> {
        self.append_user(text.to_string());
        self.advance(ChatEvent::FreeText(text.to_string())).await
    }

    async fn advance(&mut self, event: ChatEvent) -> Result<(), WidgetError> {
        // A transition may produce an effect whose resolution is itself an
        // event (the subscribe round-trip), hence the loop instead of
        // recursion. External calls are awaited sequentially: there is never
        // more than one subscribe in flight per session.
        let mut next_event = Some(event);

        while let Some(event) = next_event.take() {
            let outcome = self.engine.apply(&self.state, &event, &mut self.context)?;
            debug!(
                event_name = "widget.dialogue.transition",
                from = ?outcome.from,
                to = ?outcome.to,
                "dialogue transition applied"
            );
            self.state = outcome.to.clone();

            if let Some(reply) = outcome.reply {
                self.typing_pause().await;
                self.append_bot(reply);
            }

            for effect in outcome.effects {
                match effect {
                    ChatEffect::Navigate { path } => {
                        self.capabilities.navigator.navigate_to(&path);
                    }
                    ChatEffect::OpenExternal { url } => {
                        self.capabilities.links.open(&url);
                    }
                    ChatEffect::Subscribe { email } => {
                        let resolution = self.resolve_subscribe(&email).await;
                        next_event = Some(ChatEvent::SubscribeResolved(resolution));
                    }
                }
            }
        }

        Ok(())
    }

    async fn resolve_subscribe(&mut self, email: &str) -> SubscribeResolution {
        let request = SubscribeRequest::from_widget(email);
        let result = self.capabilities.newsletter.subscribe(&request).await;

        if let Err(error) = &result {
            warn!(
                event_name = "widget.newsletter.subscribe_failed",
                error = %error,
                "newsletter subscription failed"
            );
        }

        let resolution = SubscribeResolution::from_result(&result);
        if resolution == SubscribeResolution::Subscribed {
            self.capabilities.store.set_flag(RECENTLY_SUBSCRIBED_FLAG, true);
        }
        resolution
    }

    async fn typing_pause(&self) {
        if !self.typing_delay.is_zero() {
            tokio::time::sleep(self.typing_delay).await;
        }
    }

    fn append_user(&mut self, text: String) {
        self.transcript.push(Message::user(text, self.capabilities.clock.now()));
    }

    fn append_bot(&mut self, reply: BotReply) {
        self.transcript
            .push(Message::bot(reply.text, reply.buttons, self.capabilities.clock.now()));
    }
}
