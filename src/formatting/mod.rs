//! Text-to-markup formatting for analysis narratives and rewritten resumes

pub mod markup;
pub mod narrative;
pub mod resume;

pub use narrative::format_narrative;
pub use resume::{format_resume, parse_resume, ResumeDocument};
