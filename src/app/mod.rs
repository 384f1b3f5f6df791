// Application layer - Use case interactors

pub mod cut_interactor;
pub mod workspace;

// Re-export interactors
pub use cut_interactor::{CutInteractor, CutReport, SegmentRecord};
pub use workspace::TempWorkspace;
