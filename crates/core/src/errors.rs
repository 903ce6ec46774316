use thiserror::Error;

use crate::domain::price_book::PriceBookId;
use crate::domain::price_entry::{ProductId, VariantId};

/// Quote failures reported to the requester as values, never as transport
/// faults. Each variant has a stable wire code.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuoteError {
    #[error("quantity must be a positive whole number, got {given}")]
    InvalidQuantity { given: String },
    #[error("price book {} was not found", price_book_id.0)]
    PriceBookNotFound { price_book_id: PriceBookId },
    #[error("price book {} is not active", price_book_id.0)]
    PriceBookInactive { price_book_id: PriceBookId },
    #[error("no price entry covers quantity {quantity} for product {}", product_id.0)]
    NoPriceForQuantity { product_id: ProductId, variant_id: Option<VariantId>, quantity: u32 },
}

impl QuoteError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity { .. } => "InvalidQuantity",
            Self::PriceBookNotFound { .. } => "PriceBookNotFound",
            Self::PriceBookInactive { .. } => "PriceBookInactive",
            Self::NoPriceForQuantity { .. } => "NoPriceForQuantity",
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Quote(#[from] QuoteError),
    #[error("persistence failure: {0}")]
    Persistence(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please retry shortly."
            }
            Self::Internal { .. } => "An unexpected internal error occurred.",
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Quote(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Persistence(message) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}
