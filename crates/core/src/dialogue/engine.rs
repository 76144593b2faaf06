use thiserror::Error;

use crate::dialogue::replies::{self, WHATSAPP_URL};
use crate::dialogue::states::{
    ChatContext, ChatEffect, ChatEvent, ChatFlow, TransitionOutcome,
};
use crate::newsletter::{self, SubscribeResolution};

pub trait DialogueDefinition {
    fn initial_state(&self) -> ChatFlow;
    fn transition(
        &self,
        current: &ChatFlow,
        event: &ChatEvent,
        context: &mut ChatContext,
    ) -> Result<TransitionOutcome, DialogueError>;
}

/// The scripted KOLZO concierge dialogue.
#[derive(Clone, Debug, Default)]
pub struct StorefrontDialogue;

impl DialogueDefinition for StorefrontDialogue {
    fn initial_state(&self) -> ChatFlow {
        ChatFlow::Root
    }

    fn transition(
        &self,
        current: &ChatFlow,
        event: &ChatEvent,
        context: &mut ChatContext,
    ) -> Result<TransitionOutcome, DialogueError> {
        transition_storefront(current, event, context)
    }
}

pub struct DialogueEngine<D> {
    dialogue: D,
}

impl<D> DialogueEngine<D>
where
    D: DialogueDefinition,
{
    pub fn new(dialogue: D) -> Self {
        Self { dialogue }
    }

    pub fn initial_state(&self) -> ChatFlow {
        self.dialogue.initial_state()
    }

    pub fn apply(
        &self,
        current: &ChatFlow,
        event: &ChatEvent,
        context: &mut ChatContext,
    ) -> Result<TransitionOutcome, DialogueError> {
        self.dialogue.transition(current, event, context)
    }
}

impl Default for DialogueEngine<StorefrontDialogue> {
    fn default() -> Self {
        Self::new(StorefrontDialogue)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DialogueError {
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: ChatFlow, event: ChatEvent },
    #[error("missing context for transition from {state:?}: {field}")]
    MissingContext { state: ChatFlow, field: &'static str },
}

fn transition_storefront(
    current: &ChatFlow,
    event: &ChatEvent,
    context: &mut ChatContext,
) -> Result<TransitionOutcome, DialogueError> {
    use ChatEvent::{
        BackToMain, Faq, FaqTopic, FreeText, Newsletter, NewsletterSignup, OrderTracking,
        ProductGuidance, RedirectToCollection, SelectCategory, SelectGender, SizeGuide,
        SubscribeResolved, WhatsApp,
    };

    let from = current.clone();

    // Cross-state events first: these behave identically from every state.
    match event {
        BackToMain => {
            context.reset();
            return Ok(TransitionOutcome {
                from,
                to: ChatFlow::Root,
                reply: Some(replies::root_menu()),
                effects: Vec::new(),
            });
        }
        WhatsApp => {
            return Ok(TransitionOutcome {
                from,
                to: current.clone(),
                reply: None,
                effects: vec![ChatEffect::OpenExternal { url: WHATSAPP_URL.to_string() }],
            });
        }
        _ => {}
    }

    let (to, reply, effects) = match (current, event) {
        (ChatFlow::Root, ProductGuidance) => {
            (ChatFlow::ProductGuidance, Some(replies::gender_prompt()), Vec::new())
        }
        (ChatFlow::ProductGuidance, SelectGender(audience)) => {
            context.selected_audience = Some(*audience);
            (ChatFlow::GenderSelected, Some(replies::category_prompt(*audience)), Vec::new())
        }
        (ChatFlow::GenderSelected, SelectCategory(category)) => {
            context.selected_category = Some(category.clone());
            (ChatFlow::CategorySelected, Some(replies::collection_offer(category)), Vec::new())
        }
        (ChatFlow::CategorySelected, RedirectToCollection) => {
            // Terminal action: the widget navigates away, no further message.
            let audience = context.selected_audience.ok_or(DialogueError::MissingContext {
                state: from.clone(),
                field: "selected_audience",
            })?;
            let category =
                context.selected_category.clone().ok_or(DialogueError::MissingContext {
                    state: from.clone(),
                    field: "selected_category",
                })?;
            (
                ChatFlow::CategorySelected,
                None,
                vec![ChatEffect::Navigate {
                    path: replies::collection_path(audience, &category),
                }],
            )
        }
        (ChatFlow::Root | ChatFlow::FaqSubtopic, Faq) => {
            (ChatFlow::Faq, Some(replies::faq_menu()), Vec::new())
        }
        (ChatFlow::Faq | ChatFlow::FaqSubtopic, FaqTopic(topic)) => {
            (ChatFlow::FaqSubtopic, Some(replies::faq_answer(*topic)), Vec::new())
        }
        (ChatFlow::Faq | ChatFlow::FaqSubtopic, SizeGuide) => (
            current.clone(),
            None,
            vec![ChatEffect::Navigate { path: replies::SIZE_GUIDE_PATH.to_string() }],
        ),
        (ChatFlow::Root, Newsletter) => {
            (ChatFlow::Newsletter, Some(replies::newsletter_pitch()), Vec::new())
        }
        (ChatFlow::Newsletter, NewsletterSignup) => {
            (ChatFlow::NewsletterAwaitingEmail, Some(replies::email_prompt()), Vec::new())
        }
        (ChatFlow::NewsletterAwaitingEmail, FreeText(text)) => {
            let candidate = text.trim();
            if newsletter::is_valid_email(candidate) {
                context.user_email = Some(candidate.to_string());
                (
                    ChatFlow::NewsletterSubmitting,
                    None,
                    vec![ChatEffect::Subscribe { email: candidate.to_string() }],
                )
            } else {
                // Caught locally, nothing is dispatched upstream.
                (ChatFlow::NewsletterAwaitingEmail, Some(replies::email_invalid()), Vec::new())
            }
        }
        (ChatFlow::NewsletterSubmitting, SubscribeResolved(resolution)) => match resolution {
            SubscribeResolution::Subscribed => {
                (ChatFlow::Root, Some(replies::subscribe_welcome()), Vec::new())
            }
            SubscribeResolution::AlreadyRegistered => {
                (ChatFlow::Root, Some(replies::subscribe_already()), Vec::new())
            }
            SubscribeResolution::Failed => {
                (ChatFlow::Newsletter, Some(replies::subscribe_failed()), Vec::new())
            }
        },
        (ChatFlow::Root, OrderTracking) => {
            (ChatFlow::OrderTrackingAwaitingId, Some(replies::order_prompt()), Vec::new())
        }
        (ChatFlow::OrderTrackingAwaitingId, FreeText(text)) => {
            let order_id = text.trim().to_string();
            context.order_id = Some(order_id.clone());
            (ChatFlow::OrderTracking, Some(replies::order_received(&order_id)), Vec::new())
        }
        // Free text anywhere else gets the canned fallback; behavior depends
        // only on the current flow, never on the input content.
        (_, FreeText(_)) => (current.clone(), Some(replies::fallback()), Vec::new()),
        _ => {
            return Err(DialogueError::InvalidTransition {
                state: from,
                event: event.clone(),
            });
        }
    };

    Ok(TransitionOutcome { from, to, reply, effects })
}

#[cfg(test)]
mod tests {
    use crate::dialogue::engine::{DialogueEngine, DialogueError, StorefrontDialogue};
    use crate::dialogue::states::{
        Audience, ChatContext, ChatEffect, ChatEvent, ChatFlow, FaqTopic,
    };
    use crate::newsletter::SubscribeResolution;

    fn engine() -> DialogueEngine<StorefrontDialogue> {
        DialogueEngine::default()
    }

    #[test]
    fn product_guidance_offers_two_gender_buttons_plus_back() {
        let engine = engine();
        let mut context = ChatContext::default();

        let outcome = engine
            .apply(&ChatFlow::Root, &ChatEvent::ProductGuidance, &mut context)
            .expect("root -> product guidance");

        assert_eq!(outcome.to, ChatFlow::ProductGuidance);
        let reply = outcome.reply.expect("gender prompt");
        assert_eq!(reply.buttons.len(), 3);
        assert_eq!(reply.buttons[0].event, ChatEvent::SelectGender(Audience::Women));
        assert_eq!(reply.buttons[1].event, ChatEvent::SelectGender(Audience::Men));
        assert_eq!(reply.buttons[2].event, ChatEvent::BackToMain);
    }

    #[test]
    fn selecting_women_lists_the_fixed_category_menu() {
        let engine = engine();
        let mut context = ChatContext::default();

        let outcome = engine
            .apply(
                &ChatFlow::ProductGuidance,
                &ChatEvent::SelectGender(Audience::Women),
                &mut context,
            )
            .expect("gender selection");

        assert_eq!(context.selected_audience, Some(Audience::Women));
        let reply = outcome.reply.expect("category menu");
        let labels: Vec<&str> = reply.buttons.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["Lipstick", "Handbag", "Dress", "Shoes", "Jewelry", "Back to menu"]);
    }

    #[test]
    fn collection_redirect_navigates_without_a_reply() {
        let engine = engine();
        let mut context = ChatContext {
            selected_audience: Some(Audience::Women),
            selected_category: Some("Jewelry".to_string()),
            ..ChatContext::default()
        };

        let outcome = engine
            .apply(&ChatFlow::CategorySelected, &ChatEvent::RedirectToCollection, &mut context)
            .expect("redirect");

        assert!(outcome.reply.is_none());
        assert_eq!(
            outcome.effects,
            vec![ChatEffect::Navigate { path: "/women/jewelry".to_string() }]
        );
    }

    #[test]
    fn collection_redirect_without_context_is_rejected() {
        let engine = engine();
        let mut context = ChatContext::default();

        let error = engine
            .apply(&ChatFlow::CategorySelected, &ChatEvent::RedirectToCollection, &mut context)
            .expect_err("missing context must be rejected");

        assert!(matches!(error, DialogueError::MissingContext { field: "selected_audience", .. }));
    }

    #[test]
    fn invalid_email_stays_awaiting_and_issues_no_effect() {
        let engine = engine();
        let mut context = ChatContext::default();

        let outcome = engine
            .apply(
                &ChatFlow::NewsletterAwaitingEmail,
                &ChatEvent::FreeText("not-an-email".to_string()),
                &mut context,
            )
            .expect("invalid email is not an error");

        assert_eq!(outcome.to, ChatFlow::NewsletterAwaitingEmail);
        assert!(outcome.effects.is_empty());
        assert!(context.user_email.is_none());
        let reply = outcome.reply.expect("re-prompt");
        assert!(reply.expects_free_text());
    }

    #[test]
    fn valid_email_moves_to_submitting_with_a_subscribe_effect() {
        let engine = engine();
        let mut context = ChatContext::default();

        let outcome = engine
            .apply(
                &ChatFlow::NewsletterAwaitingEmail,
                &ChatEvent::FreeText("  a@b.com ".to_string()),
                &mut context,
            )
            .expect("valid email");

        assert_eq!(outcome.to, ChatFlow::NewsletterSubmitting);
        assert!(outcome.reply.is_none());
        assert_eq!(
            outcome.effects,
            vec![ChatEffect::Subscribe { email: "a@b.com".to_string() }]
        );
        assert_eq!(context.user_email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn subscribe_success_returns_to_root_with_a_single_main_menu_button() {
        let engine = engine();
        let mut context = ChatContext::default();

        let outcome = engine
            .apply(
                &ChatFlow::NewsletterSubmitting,
                &ChatEvent::SubscribeResolved(SubscribeResolution::Subscribed),
                &mut context,
            )
            .expect("resolution");

        assert_eq!(outcome.to, ChatFlow::Root);
        let reply = outcome.reply.expect("welcome message");
        assert_eq!(reply.buttons.len(), 1);
        assert_eq!(reply.buttons[0].label, "Main Menu");
        assert_eq!(reply.buttons[0].event, ChatEvent::BackToMain);
    }

    #[test]
    fn subscribe_failure_offers_a_retry_path() {
        let engine = engine();
        let mut context = ChatContext::default();

        let outcome = engine
            .apply(
                &ChatFlow::NewsletterSubmitting,
                &ChatEvent::SubscribeResolved(SubscribeResolution::Failed),
                &mut context,
            )
            .expect("resolution");

        assert_eq!(outcome.to, ChatFlow::Newsletter);
        let reply = outcome.reply.expect("failure message");
        assert_eq!(reply.buttons[0].event, ChatEvent::NewsletterSignup);
    }

    #[test]
    fn back_to_main_resets_context_from_any_state() {
        let engine = engine();
        let states = [
            ChatFlow::ProductGuidance,
            ChatFlow::GenderSelected,
            ChatFlow::CategorySelected,
            ChatFlow::Faq,
            ChatFlow::FaqSubtopic,
            ChatFlow::Newsletter,
            ChatFlow::NewsletterAwaitingEmail,
            ChatFlow::OrderTrackingAwaitingId,
            ChatFlow::OrderTracking,
        ];

        for state in states {
            let mut context = ChatContext {
                selected_audience: Some(Audience::Men),
                selected_category: Some("Watch".to_string()),
                user_email: Some("a@b.com".to_string()),
                order_id: Some("KZ-1001".to_string()),
            };

            let outcome = engine
                .apply(&state, &ChatEvent::BackToMain, &mut context)
                .expect("back to main is always valid");

            assert_eq!(outcome.to, ChatFlow::Root);
            assert_eq!(context, ChatContext::default());
            assert_eq!(outcome.reply.expect("root menu").buttons.len(), 5);
        }
    }

    #[test]
    fn whatsapp_opens_a_link_without_changing_state_or_context() {
        let engine = engine();
        let mut context =
            ChatContext { order_id: Some("KZ-1001".to_string()), ..ChatContext::default() };

        let outcome = engine
            .apply(&ChatFlow::Faq, &ChatEvent::WhatsApp, &mut context)
            .expect("whatsapp");

        assert_eq!(outcome.to, ChatFlow::Faq);
        assert!(outcome.reply.is_none());
        assert!(matches!(outcome.effects.as_slice(), [ChatEffect::OpenExternal { .. }]));
        assert_eq!(context.order_id.as_deref(), Some("KZ-1001"));
    }

    #[test]
    fn free_text_outside_capture_states_gets_the_fallback() {
        let engine = engine();
        let mut context = ChatContext::default();

        for state in [ChatFlow::Root, ChatFlow::Faq, ChatFlow::CategorySelected] {
            let outcome = engine
                .apply(&state, &ChatEvent::FreeText("where is my order".to_string()), &mut context)
                .expect("fallback");

            assert_eq!(outcome.to, state);
            let reply = outcome.reply.expect("fallback reply");
            assert_eq!(reply.buttons.len(), 5);
        }
    }

    #[test]
    fn order_id_submission_is_stored_and_awaits_back_to_main() {
        let engine = engine();
        let mut context = ChatContext::default();

        let prompted = engine
            .apply(&ChatFlow::Root, &ChatEvent::OrderTracking, &mut context)
            .expect("root -> order tracking");
        assert_eq!(prompted.to, ChatFlow::OrderTrackingAwaitingId);
        assert!(prompted.reply.expect("prompt").expects_free_text());

        let outcome = engine
            .apply(&prompted.to, &ChatEvent::FreeText(" KZ-2024-77 ".to_string()), &mut context)
            .expect("order id");

        assert_eq!(outcome.to, ChatFlow::OrderTracking);
        assert_eq!(context.order_id.as_deref(), Some("KZ-2024-77"));
        let reply = outcome.reply.expect("placeholder");
        assert!(reply.text.contains("KZ-2024-77"));
        assert_eq!(reply.buttons.len(), 1);
    }

    #[test]
    fn faq_loop_can_revisit_topics() {
        let engine = engine();
        let mut context = ChatContext::default();

        let menu = engine
            .apply(&ChatFlow::Root, &ChatEvent::Faq, &mut context)
            .expect("root -> faq");
        let first = engine
            .apply(&menu.to, &ChatEvent::FaqTopic(FaqTopic::Returns), &mut context)
            .expect("faq -> subtopic");
        assert_eq!(first.to, ChatFlow::FaqSubtopic);

        let second = engine
            .apply(&first.to, &ChatEvent::FaqTopic(FaqTopic::Shipping), &mut context)
            .expect("subtopic -> subtopic");
        assert_eq!(second.to, ChatFlow::FaqSubtopic);

        let back = engine.apply(&second.to, &ChatEvent::Faq, &mut context).expect("back to menu");
        assert_eq!(back.to, ChatFlow::Faq);
    }

    #[test]
    fn nonsensical_transitions_are_rejected() {
        let engine = engine();
        let mut context = ChatContext::default();

        let error = engine
            .apply(&ChatFlow::Faq, &ChatEvent::SelectGender(Audience::Men), &mut context)
            .expect_err("gender selection is not valid inside faq");

        assert!(matches!(error, DialogueError::InvalidTransition { state: ChatFlow::Faq, .. }));
    }

    #[test]
    fn replay_is_deterministic_for_the_same_event_sequence() {
        let engine = engine();
        let events = [
            ChatEvent::ProductGuidance,
            ChatEvent::SelectGender(Audience::Men),
            ChatEvent::SelectCategory("Watch".to_string()),
            ChatEvent::BackToMain,
            ChatEvent::Newsletter,
            ChatEvent::NewsletterSignup,
            ChatEvent::FreeText("a@b.com".to_string()),
            ChatEvent::SubscribeResolved(SubscribeResolution::Subscribed),
        ];

        let run = |engine: &DialogueEngine<StorefrontDialogue>| {
            let mut state = engine.initial_state();
            let mut context = ChatContext::default();
            let mut outcomes = Vec::new();
            for event in &events {
                let outcome =
                    engine.apply(&state, event, &mut context).expect("deterministic run");
                state = outcome.to.clone();
                outcomes.push(outcome);
            }
            (state, context, outcomes)
        };

        assert_eq!(run(&engine), run(&engine));
    }
}
