mod clipboard;
mod coordinator;
mod hub;
mod request;
mod selection;
mod store;
pub mod view;

pub use clipboard::{Clipboard, CopiedIndicator};
pub use coordinator::MutationCoordinator;
pub use hub::Hub;
pub use request::{DeleteTarget, PendingRequest, RequestOutcome};
pub use selection::reconcile;
pub use store::{StoreUpdate, SyncStore};
pub use view::SearchHit;
