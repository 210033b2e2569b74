//! Demo content for the "try a sample" action in the UI.

/// A realistic frontend job description exercising required and preferred sections.
pub const SAMPLE_JOB_DESCRIPTION: &str = "Senior Software Engineer - Frontend

We are seeking a Senior Software Engineer to join our dynamic team. The ideal candidate will have strong experience in modern web technologies and a passion for creating exceptional user experiences.

Key Responsibilities:
• Develop and maintain scalable frontend applications using React, TypeScript, and modern JavaScript
• Collaborate with UX/UI designers to implement responsive and accessible web interfaces
• Work with backend engineers to integrate APIs and optimize application performance
• Lead code reviews and mentor junior developers
• Implement automated testing strategies and maintain high code quality standards

Required Skills:
• 5+ years of experience in frontend development
• Expert knowledge of React, TypeScript, HTML5, CSS3, and JavaScript ES6+
• Experience with state management libraries (Redux, Zustand, or similar)
• Proficiency with modern build tools (Webpack, Vite, etc.)
• Strong understanding of responsive design and cross-browser compatibility
• Experience with version control systems (Git)
• Knowledge of automated testing frameworks (Jest, Cypress, etc.)

Preferred Qualifications:
• Experience with Node.js and full-stack development
• Familiarity with cloud platforms (AWS, Azure, or GCP)
• Knowledge of CI/CD pipelines
• Experience with Docker and containerization
• Understanding of accessibility standards (WCAG)
• Bachelor's degree in Computer Science or related field";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::document::{Document, DocumentKind, InputLimits};
    use crate::analysis::keywords::{extract_job_keywords, KeywordWeights, RequirementLevel};
    use crate::analysis::vocabulary::SkillVocabulary;

    #[test]
    fn test_sample_sections_drive_requirement_levels() {
        let job = Document::new(
            DocumentKind::JobDescription,
            SAMPLE_JOB_DESCRIPTION,
            &InputLimits::default(),
        )
        .unwrap();
        let set = extract_job_keywords(&job, &SkillVocabulary::builtin(), &KeywordWeights::default());

        assert_eq!(set.get("Zustand").unwrap().level, RequirementLevel::Required);
        assert_eq!(set.get("React").unwrap().level, RequirementLevel::Required);
        assert_eq!(set.get("Docker").unwrap().level, RequirementLevel::Preferred);
        assert_eq!(set.get("CI/CD").unwrap().level, RequirementLevel::Preferred);
        assert_eq!(set.get("Mentoring").unwrap().level, RequirementLevel::Neutral);
        assert!(set.get("React").unwrap().weight > set.get("Docker").unwrap().weight);
    }
}
