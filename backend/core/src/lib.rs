pub mod error;
pub mod shutdown;
pub mod traits;
pub mod types;

pub use error::{DocumentError, RecognitionError};
pub use shutdown::{Shutdown, ShutdownHandle};
pub use traits::Recognizer;
pub use types::{AttachmentOutcome, DocumentOutcome, DocumentReport, RunSummary};
