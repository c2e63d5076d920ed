//! `[base]` section configuration.
//!
//! Contains basic site information used by the artifact preamble.

use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[base]` section in llms.toml - basic site metadata.
///
/// # Example
/// ```toml
/// [base]
/// title = "Dalfox"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title, used in the artifact preamble. Must not be blank.
    pub title: String,
}
