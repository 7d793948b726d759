//! Data models for The Dump

mod category;
mod filter;
mod note;
mod subscription;
mod upload;

pub use category::{
    CategoriesUpdateResponse, Category, CategoryDraft, SavedCategory, SubCategoryRequest,
    ONBOARDING_SOURCE,
};
pub(crate) use category::CategoriesUpdateRequest;
pub use filter::{
    date_group_range, Filter, NoteQuery, QueryContext, DATE_GROUP_ALL_TIME, DATE_GROUP_ORDER,
    DATE_GROUP_THIS_MONTH, DATE_GROUP_THIS_WEEK, DATE_GROUP_THIS_YEAR, DATE_GROUP_TODAY,
    DATE_GROUP_YESTERDAY,
};
pub use note::{
    EditNoteRequest, EditedNote, NoteCounts, NoteDetail, NotePage, NotePreview, PageCursor,
    MAX_NOTE_CONTENT_BYTES, MAX_SUB_CATEGORIES_PER_NOTE,
};
pub(crate) use note::{EditNoteResponse, NoteDetailResponse, NoteListResponse};
pub use subscription::{
    ProductInfo, SignedTransaction, SubscriptionStatus, SubscriptionTier, VerifyPurchaseResponse,
};
pub(crate) use subscription::VerifyPurchaseRequest;
pub use upload::{
    UploadKind, UploadMetadata, UploadRequest, UploadSessionItem, UploadStatus, UploadTicket,
    MAX_UPLOAD_BYTES,
};
