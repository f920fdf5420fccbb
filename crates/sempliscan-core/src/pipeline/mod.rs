//! Scan orchestration: recognition, classification, extraction, and the
//! merge into caller-held form state.

#[cfg(feature = "native")]
mod scan;
mod session;

#[cfg(feature = "native")]
pub use scan::{BillScan, DocumentPipeline, IdentityScan};
pub use session::{RecognitionTicket, UploadSession};
