//! @ai:module:intent Email delivery provider access
//! @ai:module:layer infrastructure
//! @ai:module:public_api Mailer, EmailMessage, DeliveryReceipt, DeliveryError, HttpMailer, MockMailer

pub mod client;
pub mod mock;

pub use client::{DeliveryError, DeliveryReceipt, EmailMessage, HttpMailer, Mailer};
pub use mock::MockMailer;
