#[cfg(feature = "fjall")]
pub mod fjall;
pub mod memory;

#[cfg(feature = "fjall")]
pub use self::fjall::FjallPageCache;
pub use self::memory::InMemoryPageCache;
