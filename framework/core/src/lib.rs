mod error;
mod shutdown;

pub mod prelude {
    pub use crate::error::{FilesystemError, ProcessError, ValidationError};
    pub use crate::shutdown::{DelegatedShutdownListener, ShutdownHandle};
}
