mod auto_save;
mod editor_host;
mod editor_proxy;
mod preferences;
mod submission;
mod templates;
mod theme_detector;
mod theme_watch;
mod toolbar;
mod window;

pub use auto_save::*;
pub use editor_host::*;
pub use editor_proxy::*;
pub use preferences::*;
pub use submission::*;
pub use templates::*;
pub use theme_detector::*;
pub use theme_watch::*;
pub use toolbar::*;
pub use window::*;
