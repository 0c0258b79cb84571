pub mod label;

pub use label::{bypass_flag, HookLabel, LabelError};
