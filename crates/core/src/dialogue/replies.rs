//! Bot reply templates for the storefront concierge.
//!
//! Every prompt the widget can show is built here, so the wording and the
//! button sets live in one place and the engine stays a pure transition
//! table.

use serde::{Deserialize, Serialize};

use crate::dialogue::states::{Audience, ChatEvent, FaqTopic};

pub const WHATSAPP_URL: &str = "https://wa.me/33140000000";
pub const SIZE_GUIDE_PATH: &str = "/size-guide";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ButtonSpec {
    pub label: String,
    pub event: ChatEvent,
}

impl ButtonSpec {
    pub fn new(label: impl Into<String>, event: ChatEvent) -> Self {
        Self { label: label.into(), event }
    }
}

/// One bot message: text plus the button set offered for the next input.
/// An empty button set means free text is expected next, or the flow is a
/// dead end awaiting explicit navigation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotReply {
    pub text: String,
    pub buttons: Vec<ButtonSpec>,
}

impl BotReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), buttons: Vec::new() }
    }

    pub fn with_buttons(text: impl Into<String>, buttons: Vec<ButtonSpec>) -> Self {
        Self { text: text.into(), buttons }
    }

    pub fn expects_free_text(&self) -> bool {
        self.buttons.is_empty()
    }
}

fn back_button() -> ButtonSpec {
    ButtonSpec::new("Back to menu", ChatEvent::BackToMain)
}

pub fn root_menu_buttons() -> Vec<ButtonSpec> {
    vec![
        ButtonSpec::new("Product Guidance", ChatEvent::ProductGuidance),
        ButtonSpec::new("FAQ", ChatEvent::Faq),
        ButtonSpec::new("Newsletter", ChatEvent::Newsletter),
        ButtonSpec::new("Order Tracking", ChatEvent::OrderTracking),
        ButtonSpec::new("WhatsApp Concierge", ChatEvent::WhatsApp),
    ]
}

pub fn root_menu() -> BotReply {
    BotReply::with_buttons(
        "Welcome to KOLZO. I am your personal concierge. How may I assist you today?",
        root_menu_buttons(),
    )
}

pub fn gender_prompt() -> BotReply {
    BotReply::with_buttons(
        "With pleasure. Who are you shopping for?",
        vec![
            ButtonSpec::new("Women", ChatEvent::SelectGender(Audience::Women)),
            ButtonSpec::new("Men", ChatEvent::SelectGender(Audience::Men)),
            back_button(),
        ],
    )
}

pub fn category_prompt(audience: Audience) -> BotReply {
    let mut buttons: Vec<ButtonSpec> = audience
        .categories()
        .iter()
        .map(|category| {
            ButtonSpec::new(*category, ChatEvent::SelectCategory((*category).to_string()))
        })
        .collect();
    buttons.push(back_button());

    BotReply::with_buttons(
        format!(
            "Our {} collections are at your fingertips. Which piece speaks to you?",
            audience.as_str()
        ),
        buttons,
    )
}

pub fn collection_offer(category: &str) -> BotReply {
    BotReply::with_buttons(
        format!(
            "An exquisite choice. Shall I take you to our {category} bestsellers, \
             hand-picked by the maison?"
        ),
        vec![
            ButtonSpec::new("View the collection", ChatEvent::RedirectToCollection),
            back_button(),
        ],
    )
}

pub fn faq_menu() -> BotReply {
    BotReply::with_buttons(
        "Of course. What would you like to know?",
        vec![
            ButtonSpec::new("Returns & Exchanges", ChatEvent::FaqTopic(FaqTopic::Returns)),
            ButtonSpec::new("Shipping", ChatEvent::FaqTopic(FaqTopic::Shipping)),
            ButtonSpec::new("Payment", ChatEvent::FaqTopic(FaqTopic::Payment)),
            ButtonSpec::new("Size Guide", ChatEvent::SizeGuide),
            ButtonSpec::new("Contact Us", ChatEvent::FaqTopic(FaqTopic::Contact)),
            back_button(),
        ],
    )
}

pub fn faq_answer(topic: FaqTopic) -> BotReply {
    let text = match topic {
        FaqTopic::Returns => {
            "Returns and exchanges are complimentary within 30 days of delivery. \
             Pieces must be unworn, with the original packaging and certificate of \
             authenticity."
        }
        FaqTopic::Shipping => {
            "Every order ships with signature-required express courier, beautifully \
             wrapped. Delivery takes 2-4 business days worldwide, and shipping is on \
             the house for orders above 300."
        }
        FaqTopic::Payment => {
            "We accept all major cards, PayPal and Apple Pay. Payments are processed \
             over an encrypted connection and never stored by KOLZO."
        }
        FaqTopic::Contact => {
            "Our client advisors are available Monday through Saturday, 9:00-19:00 CET, \
             at concierge@kolzo.com or through the WhatsApp concierge."
        }
    };

    BotReply::with_buttons(
        text,
        vec![ButtonSpec::new("Other questions", ChatEvent::Faq), back_button()],
    )
}

pub fn newsletter_pitch() -> BotReply {
    BotReply::with_buttons(
        "Join the KOLZO circle: private previews of new collections, invitations to \
         maison events, and a welcome gift with your first order.",
        vec![ButtonSpec::new("Sign me up", ChatEvent::NewsletterSignup), back_button()],
    )
}

pub fn email_prompt() -> BotReply {
    BotReply::text("Wonderful. May I have your email address?")
}

pub fn email_invalid() -> BotReply {
    BotReply::text(
        "That address does not look quite right. Could you type it again, e.g. \
         name@example.com?",
    )
}

pub fn subscribe_welcome() -> BotReply {
    BotReply::with_buttons(
        "Welcome to the circle. Your invitation to our next private preview is on \
         its way.",
        vec![ButtonSpec::new("Main Menu", ChatEvent::BackToMain)],
    )
}

pub fn subscribe_already() -> BotReply {
    BotReply::with_buttons(
        "You are already part of the KOLZO circle — we look forward to seeing you at \
         the next preview.",
        vec![ButtonSpec::new("Main Menu", ChatEvent::BackToMain)],
    )
}

pub fn subscribe_failed() -> BotReply {
    BotReply::with_buttons(
        "My apologies, I could not complete your subscription just now. Shall we try \
         again?",
        vec![ButtonSpec::new("Try again", ChatEvent::NewsletterSignup), back_button()],
    )
}

pub fn order_prompt() -> BotReply {
    BotReply::text(
        "Certainly. Please share your order number or the email address used at \
         checkout.",
    )
}

pub fn order_received(order_id: &str) -> BotReply {
    BotReply::with_buttons(
        format!(
            "Thank you. A client advisor is reviewing order {order_id} and will \
             reach out with the latest status shortly."
        ),
        vec![back_button()],
    )
}

pub fn fallback() -> BotReply {
    BotReply::with_buttons(
        "I am not certain I understood. Please choose one of the options below.",
        root_menu_buttons(),
    )
}

/// URL-safe slug for collection paths: lowercase, runs of non-alphanumerics
/// collapsed to single dashes.
pub fn slug(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_dash = false;
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

pub fn collection_path(audience: Audience, category: &str) -> String {
    format!("/{}/{}", audience.as_str(), slug(category))
}
