pub mod capabilities;
pub mod session;
pub mod transcript;

pub use capabilities::{
    Clock, ExternalLinks, FixedClock, InMemorySessionStore, Navigator, NoopLinks, NoopNavigator,
    RecordingLinks, RecordingNavigator, SessionStore, SystemClock, RECENTLY_SUBSCRIBED_FLAG,
};
pub use session::{ChatSession, SessionCapabilities, WidgetError};
pub use transcript::{Message, MessageId, Sender, Transcript};
