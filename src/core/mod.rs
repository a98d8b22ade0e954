// Domain-layer modules and shared errors/models
pub mod diagnostic {
    pub use crate::diagnostic::*;
}

pub mod recommendations {
    pub use crate::recommendations::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod errors {
    pub use crate::errors::*;
}
