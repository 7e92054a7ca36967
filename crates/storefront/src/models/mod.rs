//! Domain models for storefront.
//!
//! Everything here is per-browser-session state: the cart, the logged-in
//! user, and queued toast notices. Each browser session owns its own
//! instances; nothing is shared across clients.

pub mod cart;
pub mod flash;
pub mod session;

pub use cart::{Cart, CartLine};
pub use flash::{Toast, ToastKind};
pub use session::CurrentUser;
pub use session::keys as session_keys;
