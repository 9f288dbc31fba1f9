//! Convert native security scanner reports into SARIF 2.1.0 documents.

pub mod convert;
pub mod defaults;
pub mod extract;
pub mod issue;
pub mod output;
pub mod sarif_report;
pub mod uri;

pub use convert::{convert_file, report};
pub use issue::{Issue, Metrics, Skip};
pub use output::Destination;
