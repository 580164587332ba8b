pub mod mailer;
pub mod messaging;
pub mod storage;
