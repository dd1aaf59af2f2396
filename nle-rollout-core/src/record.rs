//! Records of rollouts.
//!
//! A [`Record`] is a set of named values. The rollout driver writes one record
//! per completed episode to a [`Recorder`].
//!
//! ```rust
//! use nle_rollout_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("length", RecordValue::Scalar(3.0));
//! record.insert("return", RecordValue::Scalar(5.0));
//! assert_eq!(record.get_scalar("return").unwrap(), 5.0);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
