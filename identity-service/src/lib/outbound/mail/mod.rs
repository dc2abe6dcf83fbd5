pub mod dispatcher;
pub mod log;

pub use dispatcher::MailDispatcher;
pub use dispatcher::MailWorkers;
pub use log::LogMailer;
