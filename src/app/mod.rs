// Application layer - Use case interactors

pub mod container;
pub mod validate_interactor;

// Re-export interactors
pub use validate_interactor::ValidateInteractor;
