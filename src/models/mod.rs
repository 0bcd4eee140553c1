mod project;

pub use project::{Project, ProjectDraft};
