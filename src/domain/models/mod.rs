mod bridge_message;
mod editor;
mod language;
mod page;
mod preferences;
mod store;
mod submission;
mod template;

pub use bridge_message::*;
pub use editor::*;
pub use language::*;
pub use page::*;
pub use preferences::*;
pub use store::*;
pub use submission::*;
pub use template::*;
