//! Webhook source adapters.
//!
//! - `HttpWebhookSource` - Single GET against the configured endpoint
//! - `ScriptedWebhookSource` - Replays a scripted sequence of fetch results for tests

mod http_source;
mod scripted_source;

pub use http_source::HttpWebhookSource;
pub use scripted_source::ScriptedWebhookSource;
