pub mod attachments;
pub mod clipboard;
pub mod countries;
pub mod replies;
pub mod scheduler;
pub mod validation;
