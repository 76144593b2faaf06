use serde::{Deserialize, Serialize};

use crate::newsletter::SubscribeResolution;

/// Shopper audience offered by the guidance flow. Distinct from
/// [`crate::domain::product::Gender`]: the widget only ever offers the two
/// gendered storefronts, `unisex` is a catalog property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audience {
    Women,
    Men,
}

impl Audience {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Women => "women",
            Self::Men => "men",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "women" => Some(Self::Women),
            "men" => Some(Self::Men),
            _ => None,
        }
    }

    /// Fixed category menu per audience. Not derived from catalog data.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Self::Women => &["Lipstick", "Handbag", "Dress", "Shoes", "Jewelry"],
            Self::Men => &["Shirt", "Pants", "Shoes", "Wallet", "Watch"],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaqTopic {
    Returns,
    Shipping,
    Payment,
    Contact,
}

/// Dialogue state, the `currentFlow` of a widget session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatFlow {
    Root,
    ProductGuidance,
    GenderSelected,
    CategorySelected,
    Faq,
    FaqSubtopic,
    Newsletter,
    NewsletterAwaitingEmail,
    NewsletterSubmitting,
    OrderTrackingAwaitingId,
    OrderTracking,
}

/// Everything a widget session can feed into the engine: button events,
/// free-text submissions, and the resolution of an in-flight subscribe call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatEvent {
    ProductGuidance,
    SelectGender(Audience),
    SelectCategory(String),
    RedirectToCollection,
    Faq,
    FaqTopic(FaqTopic),
    SizeGuide,
    Newsletter,
    NewsletterSignup,
    OrderTracking,
    BackToMain,
    WhatsApp,
    FreeText(String),
    SubscribeResolved(SubscribeResolution),
}

/// Session-scoped mutable context. Ephemeral: lives for the widget session
/// only, reset by the return-to-main transition.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatContext {
    pub selected_audience: Option<Audience>,
    pub selected_category: Option<String>,
    pub user_email: Option<String>,
    pub order_id: Option<String>,
}

impl ChatContext {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Side effects a transition requests from the surrounding runtime. The
/// engine never performs them itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatEffect {
    Navigate { path: String },
    OpenExternal { url: String },
    Subscribe { email: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: ChatFlow,
    pub to: ChatFlow,
    pub reply: Option<crate::dialogue::replies::BotReply>,
    pub effects: Vec<ChatEffect>,
}
