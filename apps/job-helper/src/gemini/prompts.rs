// Prompt templates for the context-menu pipeline.
// Both templates take the stored resume and the selected job description verbatim.

/// Resume tailoring prompt. Replace `{base_resume}` and `{job_description}` before sending.
pub const RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert career coach and professional resume writer.

Rewrite the candidate's resume so it targets the job description below.

Rules:
1. Use ONLY facts present in the base resume. Do NOT invent employers, titles, dates, degrees or metrics.
2. Reorder and rephrase bullets so the most relevant experience for this role comes first.
3. Mirror the job description's terminology where the resume genuinely supports it; never keyword-stuff.
4. Keep the candidate's contact details and section structure.
5. Return plain text only, ready to paste. No commentary before or after the resume.

BASE RESUME:
{base_resume}

JOB DESCRIPTION:
{job_description}"#;

/// Cover letter prompt. Replace `{base_resume}` and `{job_description}` before sending.
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert career coach writing on behalf of a job applicant.

Draft a concise, professional cover letter for the job description below, based on the candidate's resume.

Rules:
1. Three to four short paragraphs, under 400 words.
2. Reference at most three concrete achievements from the resume that match the role's requirements.
3. Do NOT invent experience, employers or credentials that are not in the resume.
4. Use placeholders such as [Hiring Manager] or [Company Name] when the job description does not state them.
5. Return plain text only, ready to paste. No commentary before or after the letter.

CANDIDATE RESUME:
{base_resume}

JOB DESCRIPTION:
{job_description}"#;

pub fn build_resume_prompt(base_resume: &str, job_description: &str) -> String {
    fill(RESUME_PROMPT_TEMPLATE, base_resume, job_description)
}

pub fn build_cover_letter_prompt(base_resume: &str, job_description: &str) -> String {
    fill(COVER_LETTER_PROMPT_TEMPLATE, base_resume, job_description)
}

// Job description is substituted last so placeholder-looking text inside the
// resume is never expanded.
fn fill(template: &str, base_resume: &str, job_description: &str) -> String {
    let (head, tail) = template
        .split_once("{job_description}")
        .unwrap_or((template, ""));
    format!(
        "{}{}{}",
        head.replace("{base_resume}", base_resume),
        job_description,
        tail
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\nBackend engineer, 6 years Go and Rust.";
    const JD: &str = "Senior Backend Engineer, 5 years Go experience...";

    #[test]
    fn test_resume_prompt_contains_inputs() {
        let prompt = build_resume_prompt(RESUME, JD);
        assert!(prompt.contains(RESUME));
        assert!(prompt.contains(JD));
        assert!(!prompt.contains("{base_resume}"));
        assert!(!prompt.contains("{job_description}"));
    }

    #[test]
    fn test_cover_letter_prompt_contains_inputs() {
        let prompt = build_cover_letter_prompt(RESUME, JD);
        assert!(prompt.contains(RESUME));
        assert!(prompt.contains(JD));
        assert!(prompt.contains("cover letter"));
    }

    #[test]
    fn test_prompts_differ() {
        assert_ne!(build_resume_prompt(RESUME, JD), build_cover_letter_prompt(RESUME, JD));
    }

    #[test]
    fn test_placeholder_text_in_inputs_is_not_expanded() {
        let prompt = build_resume_prompt("see {job_description}", "JD {base_resume}");
        assert!(prompt.contains("see {job_description}"));
        assert!(prompt.contains("JD {base_resume}"));
    }
}
