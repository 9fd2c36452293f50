// Domain-layer modules and shared errors/models
pub mod guesser {
    pub use crate::guesser::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod session {
    pub use crate::session::*;
}

pub mod errors {
    pub use crate::errors::*;
}
