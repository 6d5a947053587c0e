//! Error types shared by the control tree and the node editor.

use thiserror::Error;

use crate::data_structures::control::ControlId;

/// Failures surfaced to callers of structural operations.
///
/// Missing hover or drag targets during dispatch are not errors; they are
/// skipped silently. Only explicit add/remove requests report failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GuiError {
    /// A remove (or add) request referenced something that does not exist.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// The control id is stale or was never inserted into this tree.
    #[error("control {0:?} does not exist in this tree")]
    UnknownControl(ControlId),
    /// Attaching would make a control its own ancestor.
    #[error("attaching {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: ControlId, child: ControlId },
}

pub type Result<T> = std::result::Result<T, GuiError>;
