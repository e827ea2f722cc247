pub mod file;
pub mod memory;
pub mod traits;

// Re-export
pub use file::FileRecordStore;
pub use memory::MemoryRecordStore;
pub use traits::RecordStore;
