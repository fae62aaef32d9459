pub mod card;
pub mod event;
pub mod identity;
pub mod payment;
pub mod ports;
pub mod request;
