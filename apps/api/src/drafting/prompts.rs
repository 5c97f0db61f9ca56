// All LLM prompt constants for the drafting module.

/// System prompt for recruiter email drafting.
pub const DRAFT_SYSTEM: &str = "You are an assistant that reads a job description and an \
    applicant's resume and drafts a very short, professional application email in HTML.";

/// Drafting prompt template.
/// Replace: {job_description}, {applicant_block}, {resume_text}
pub const DRAFT_PROMPT_TEMPLATE: &str = r#"Read the job description and the applicant's resume text and draft a very short, professional application email in HTML.

Return STRICT JSON only with keys: recruiterEmail, recruiterName, companyName, jobRole, jobLocation, subject, body.
- recruiterEmail: If an explicit recruiter/contact email is present in the job description, return it; otherwise null.
- recruiterName: The recruiter's or contact person's name if present; else null.
- companyName: The company name inferred from the job description; if not clearly present, return null.
- jobRole: The role/title being hired for; if not clearly present, return null.
- jobLocation: The location of the job if mentioned (city, region, or remote/hybrid); else null.
- subject: A concise subject line suitable for applying to this role.
- body: A short, courteous HTML email body following this structure:
  Hello,
  I am writing to apply for the <ROLE> role at <COMPANY>. <1-2 lines on fit/skills>.
  I have attached my resume for your review.
  Best regards,
  <APPLICANT NAME>
  <APPLICANT PHONE> | <APPLICANT EMAIL>
  <APPLICANT LINKS (GitHub, LinkedIn, Portfolio) if provided>

Output the body as minimal semantic HTML: wrap paragraphs in <p>, use <br/> only if needed, and for links output anchors whose visible text is exactly "GitHub", "LinkedIn" or "Portfolio" (only those available) with href set to the provided URL. No CSS. No markdown. No code fences.

Use the applicant object and resume text to fill in the name, email and phone, and to reference 1-2 relevant skills or achievements aligned with the job description. Only include fields that exist. Keep it to about 4-6 short lines. Avoid bullet lists.

Job description:
"""
{job_description}
"""

{applicant_block}

Resume text (may be empty if not provided):
"""
{resume_text}
""""#;

pub const NO_APPLICANT: &str = "No applicant object provided";
