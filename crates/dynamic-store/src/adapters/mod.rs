/// Dynamic store backend implementations

pub mod memory;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(unix)]
pub mod posix;

pub use memory::MemoryStore;
