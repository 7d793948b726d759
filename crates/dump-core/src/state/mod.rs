//! Client state containers shared by every front end.
//!
//! Each container keeps its snapshot in a `watch` channel. Guards are
//! checked and set inside a single `send_if_modified` call, so a second
//! caller racing an in-flight operation returns without doing anything.

mod browse;
mod debounce;
mod detail;
mod list;
mod onboarding;
mod subscription;
mod uploads;

#[cfg(test)]
mod test_support;

pub use browse::{BrowseSnapshot, BrowseState, FolderKind, FolderRow};
pub use debounce::Debouncer;
pub use detail::{NoteDetailSnapshot, NoteDetailState};
pub use list::{ListPhase, NotesListSnapshot, NotesListState};
pub use onboarding::{
    OnboardingSnapshot, OnboardingState, MAX_CATEGORIES, MAX_CATEGORY_NAME_CHARS, MIN_CATEGORIES,
};
pub use subscription::{
    PurchaseOutcome, PurchasePlatform, StoreError, SubscriptionSnapshot, SubscriptionState,
    SUBSCRIPTION_PRODUCT_ID,
};
pub use uploads::{UploadCapture, UploadSession};
