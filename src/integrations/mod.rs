//! External service integrations.

pub mod services {
    pub use crate::services::*;
}

pub mod regions {
    pub use crate::regions::*;
}
