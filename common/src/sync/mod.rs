pub mod shutdown;
pub mod watch;
