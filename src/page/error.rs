use thiserror::Error;

use super::dom::ElementId;

/// Errors raised while reacting to a page event
#[derive(Debug, Error)]
pub enum PageError {
    #[error("no element with key '{0}'")]
    UnknownKey(String),

    #[error("element {0:?} is not attached to the document")]
    Detached(ElementId),

    #[error("element {element:?} has no data-{attribute} attribute")]
    MissingData {
        element: ElementId,
        attribute: &'static str,
    },

    #[error("data-{attribute}='{value}' on {element:?} is not a valid number")]
    InvalidNumber {
        element: ElementId,
        attribute: &'static str,
        value: String,
    },
}

pub type Result<T> = std::result::Result<T, PageError>;
