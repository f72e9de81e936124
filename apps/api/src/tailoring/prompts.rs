// Prompt templates for the tailoring pipeline.
// Placeholders in `{braces}` are substituted by the builders in tailor.rs and
// cover_letter.rs before sending.

/// Replace `{experience}`.
pub const GENERATE_SUMMARY_TEMPLATE: &str = "\
Based on the following work experience, generate a compelling 2-3 sentence professional summary for a resume. Focus on key achievements and skills.

Experience:
{experience}

Return only the summary text, no additional formatting or labels.";

/// Replace `{additional_info}`, `{skills}`, `{experience}` and `{job_description}`.
pub const TAILOR_SUMMARY_TEMPLATE: &str = "\
Create a professional summary (2-3 sentences) tailored for this specific job.

Additional Information About the Candidate:
{additional_info}

Skills: {skills}

Work Experience Summary:
{experience}

Target Job Description:
{job_description}

Instructions:
1. Highlight the most relevant skills and experiences for THIS specific job
2. Use keywords from the job description naturally
3. Base the summary on the candidate's additional information and experience
4. Return ONLY the professional summary text, no extra commentary

{truthfulness}

Professional Summary:";

/// Replace `{experience}`, `{job_description}` and `{truthfulness}`.
pub const TAILOR_EXPERIENCE_TEMPLATE: &str = "\
Optimize these work experiences for the target job description.

Current Experiences:
{experience}

Target Job Description:
{job_description}

Instructions:
1. Rewrite bullet points to emphasize relevant skills and achievements
2. Use action verbs and quantify results only where the original already does
3. Incorporate keywords from the job description naturally
4. Keep the same structure (id, company, role, location, startDate, endDate)
5. Return a JSON array matching the exact input structure

{truthfulness}";

/// Replace `{skills}` and `{job_description}`.
pub const TAILOR_SKILLS_TEMPLATE: &str = r#"Optimize this skills section for the target job.

Current Skills:
{skills}

Target Job Description:
{job_description}

Instructions:
1. Reorder skills to prioritize those most relevant to the job
2. Keep all existing skills (don't remove any)
3. Return a JSON object with the exact structure: {"languages": [], "databases": [], "cloud": [], "tools": []}"#;

/// Replace `{projects}`, `{job_description}` and `{truthfulness}`.
pub const TAILOR_PROJECTS_TEMPLATE: &str = "\
Optimize these projects for the target job.

Current Projects:
{projects}

Target Job Description:
{job_description}

Instructions:
1. Rewrite project descriptions to highlight relevant technologies and outcomes
2. Emphasize aspects that match the job requirements
3. Keep descriptions concise and impactful
4. Return a JSON array matching the input structure

{truthfulness}";

/// Replace `{name}`, `{summary}`, `{experience}`, `{skills}`,
/// `{job_description}` and `{instructions}`.
pub const COVER_LETTER_TEMPLATE: &str = "\
Create a compelling, personalized cover letter body.

Candidate Information:
Name: {name}
Summary: {summary}
Experience: {experience}
Skills: {skills}

Job Description:
{job_description}

Additional Instructions:
{instructions}

Write 3-4 paragraphs that:
1. Address the company and position
2. Highlight relevant experience and skills
3. Show enthusiasm and cultural fit
4. Use a professional yet personable tone

Return ONLY the body paragraphs. Do NOT include a salutation, a closing or a signature.";
