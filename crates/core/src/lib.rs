pub mod catalog;
pub mod config;
pub mod dialogue;
pub mod domain;
pub mod errors;
pub mod newsletter;

pub use catalog::{
    filter, related_products, search, sort, validate_product, CatalogSnapshot, FilterOptions,
    RejectedRecord, SortDirection, SortField, SortOptions, ValidationReport,
};
pub use dialogue::engine::{DialogueDefinition, DialogueEngine, DialogueError, StorefrontDialogue};
pub use dialogue::replies::{BotReply, ButtonSpec};
pub use dialogue::states::{
    Audience, ChatContext, ChatEffect, ChatEvent, ChatFlow, FaqTopic, TransitionOutcome,
};
pub use domain::product::{Gender, Product, ProductDraft, ProductId, ProductStatus};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use newsletter::{
    is_valid_email, NewsletterError, NewsletterService, NoopNewsletterService, SubscribeOutcome,
    SubscribeRequest, SubscribeResolution,
};
