mod common;
mod feedback;
mod notifier;
mod template;
