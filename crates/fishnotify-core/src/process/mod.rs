mod bytes;
mod handle;
pub mod pattern;
mod reader;

// Mock memory reader for testing (always available for unit and integration tests)
#[doc(hidden)]
pub mod mock;

pub use bytes::ByteBuffer;
pub use handle::{PROCESS_NAME, ProcessHandle};
pub use reader::{CodeRegion, MemoryReader, ReadMemory};

#[doc(hidden)]
pub use mock::{MockMemoryBuilder, MockMemoryReader};
