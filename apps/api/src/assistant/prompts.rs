// Prompt text for the assistant. Templates are format! calls, so brace
// sequences inside document text are never expanded.

/// System instruction for chat, analysis and comparison requests.
pub const CHIEF_SYSTEM: &str =
    "You are Chief, a helpful AI assistant for job applications and resume analysis.";

/// System instruction for cover-letter requests.
pub const COVER_LETTER_SYSTEM: &str = "You are Chief, an AI assistant specialized in \
    generating cover letters based on resumes and job applications.";

pub const RESPOND_APOLOGY: &str = "I apologize, but I encountered an error while processing \
    your message. Please try again later or contact support if the issue persists.";

pub const COVER_LETTER_APOLOGY: &str = "I apologize, but I encountered an error while \
    generating the cover letter. Please try again later or contact support if the issue persists.";

pub const COVER_LETTER_BANNER: &str = "Here's the generated cover letter:";

pub fn resume_analysis_prompt(resume: &str) -> String {
    format!(
        "Analyze the following resume and provide a summary of key skills, experience, \
         and areas for improvement:\n\n{resume}"
    )
}

pub fn application_analysis_prompt(application: &str) -> String {
    format!(
        "Analyze the following job application and provide a summary of key requirements \
         and responsibilities:\n\n{application}"
    )
}

pub fn comparison_prompt(resume: &str, application: &str) -> String {
    format!(
        "Compare the following resume and job application. Identify matches, mismatches, \
         and provide recommendations:\n\nResume:\n{resume}\n\nJob Application:\n{application}"
    )
}

pub fn cover_letter_prompt(resume: &str, application: &str) -> String {
    format!(
        "Generate a cover letter based on this resume:\n\n{resume}\n\n\
         And this job application:\n\n{application}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders_inside_documents_are_left_alone() {
        let prompt = comparison_prompt("my {application} skills", "needs {resume}");
        assert!(prompt.contains("Resume:\nmy {application} skills"));
        assert!(prompt.ends_with("Job Application:\nneeds {resume}"));
    }

    #[test]
    fn test_analysis_prompt_ends_with_document() {
        assert!(resume_analysis_prompt("CV TEXT").ends_with("\n\nCV TEXT"));
        assert!(application_analysis_prompt("JD TEXT").ends_with("\n\nJD TEXT"));
    }
}
