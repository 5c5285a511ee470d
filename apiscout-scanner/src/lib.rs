pub mod classifier;
pub mod config;
pub mod error;
pub mod headers;
pub mod probe;
pub mod result;
pub mod scheduler;
pub mod shutdown;

pub use classifier::{Classifier, Verdict, Vocabulary};
pub use config::ScanConfig;
pub use error::ScanError;
pub use probe::{CdnPredicate, Prober, ResultCallback};
pub use result::{ApiKind, ProbeOutcome, ScanReport, ScanSummary, Scheme, Target};
pub use scheduler::{ProgressCallback, ScanProgress, Scanner};
pub use shutdown::{ShutdownListener, ShutdownTrigger};
