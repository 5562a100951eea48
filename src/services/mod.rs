pub mod notifier;
pub mod poller;
pub mod practicum;
pub mod telegram;
pub mod validation;
pub mod verdict;
