pub mod broker;
pub mod fulfiller;
pub mod requester;
