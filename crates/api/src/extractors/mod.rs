//! Request extractors.

pub mod client_info;
pub mod organizer;

pub use client_info::ClientInfo;
pub use organizer::OrganizerId;
