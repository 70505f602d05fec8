// Document Store (resumes, job applications), file import and text extraction.

pub mod applications;
pub mod extract;
pub mod handlers;
pub mod import;
pub mod resumes;
