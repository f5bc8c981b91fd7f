pub mod analyze;
pub mod chat;
pub mod health;

pub use analyze::analyze_image;
pub use chat::{ai_health_chat, ask};
pub use health::health_check;
