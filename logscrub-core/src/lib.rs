// logscrub-core/src/lib.rs
//! # logscrub Core Library
//!
//! `logscrub-core` removes personally identifiable fields from gzip-compressed,
//! newline-delimited JSON log objects. It decodes an object into a batch of generic
//! JSON trees, nulls the value of every field whose name matches a configured
//! sensitive key (at any depth), and re-encodes the batch for upload.
//!
//! The pure logic (decoding, redaction, encoding) never touches storage. The
//! invocation adapters reach storage only through the [`ObjectStore`] trait, which
//! keeps them testable with [`MemoryStore`].
//!
//! ## Modules
//!
//! * `codec`: gzip NDJSON decoding and encoding.
//! * `pattern`: case-insensitive sensitive-key matchers.
//! * `redactor`: iterative tree walks, `redact` and `search`.
//! * `batch`: the per-invocation `RecordBatch` and multi-key passes.
//! * `engine`: decode → redact → encode over one object body.
//! * `config`: YAML configuration with embedded defaults and env overrides.
//! * `invocation`: event-notification and batch-job payloads and results.
//! * `pipeline`: the adapters tying the engine to an `ObjectStore`.
//! * `store`: the `ObjectStore` trait plus in-memory and directory-backed stores.
//! * `scheduled`: the scheduled sample writer.
//!
//! ## Usage Example
//!
//! ```rust
//! use logscrub_core::{redact, SensitiveKeyPattern};
//! use serde_json::json;
//!
//! let pattern = SensitiveKeyPattern::substring("ip");
//! let record = json!({ "Source_IP": "10.0.0.1", "page": "/home" });
//! assert_eq!(redact(&pattern, record), json!({ "Source_IP": null, "page": "/home" }));
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`ScrubError`]. Configuration loading returns
//! `anyhow::Result` with file context attached.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod batch;
pub mod codec;
pub mod config;
pub mod engine;
pub mod errors;
pub mod invocation;
pub mod pattern;
pub mod pipeline;
pub mod redactor;
pub mod scheduled;
pub mod store;

/// The universal in-memory shape of one decoded record.
pub type GenericValue = serde_json::Value;

pub use batch::{BatchSearchHit, RecordBatch, RedactionSummaryItem};
pub use codec::{decode_batch, encode_batch, OutputFormat, MAX_NESTING_DEPTH};
pub use config::{ScrubConfig, SuffixRewrite};
pub use engine::{PatternHits, ScrubEngine, ScrubOutcome};
pub use errors::ScrubError;
pub use invocation::{
    BatchJobRequest, BatchJobResponse, BatchJobTask, InvocationEvent, InvocationResult, ObjectRef,
    ResultCode, TaskResult,
};
pub use pattern::{MatchMode, SensitiveKeyPattern, MAX_PATTERN_LENGTH};
pub use pipeline::{ScrubReport, Scrubber};
pub use redactor::{redact, redact_in_place, search, SearchHit};
pub use store::{FsStore, MemoryStore, ObjectStore};
