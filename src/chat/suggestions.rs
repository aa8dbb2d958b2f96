// src/chat/suggestions.rs
//! Personalized starter questions and greetings for the Job Finder chat

use crate::types::cv_data::CvData;

pub const MAX_SUGGESTIONS: usize = 8;

const GENERIC_QUESTIONS: [&str; 4] = [
    "What are the most in-demand skills in the job market?",
    "How can I improve my resume?",
    "What industries are hiring right now?",
    "How do I prepare for a technical interview?",
];

const LOW_SCORE_QUESTIONS: [&str; 2] = [
    "How can I improve my CV score to get above 70?",
    "What are the key missing elements in my CV?",
];

const MID_SCORE_QUESTIONS: [&str; 2] = [
    "How can I take my CV from good to great?",
    "What skills should I add to reach the 90+ range?",
];

const HIGH_SCORE_QUESTIONS: [&str; 2] = [
    "How can I maintain my competitive edge?",
    "What advanced skills should I consider learning?",
];

const SKILL_QUESTIONS: [&str; 3] = [
    "How should I highlight my skills on my resume?",
    "What certifications would complement my current skills?",
    "Which of my skills are most valuable to employers?",
];

const CAREER_QUESTIONS: [&str; 2] = [
    "How can I better describe my experience?",
    "What kind of projects should I work on to improve my profile?",
];

const GENERIC_WELCOME: &str = "Hello! I'm your AI career assistant. Upload your CV first to get personalized advice, or ask me general questions about career development, resume writing, and interview preparation.";

fn score_tier(score: f64) -> [&'static str; 2] {
    if score < 70.0 {
        LOW_SCORE_QUESTIONS
    } else if score < 85.0 {
        MID_SCORE_QUESTIONS
    } else {
        HIGH_SCORE_QUESTIONS
    }
}

/// Up to [`MAX_SUGGESTIONS`] questions in fixed priority order:
/// score tier, sector, skills, general career.
pub fn suggested_questions(cv_data: Option<&CvData>) -> Vec<String> {
    let Some(cv) = cv_data else {
        return GENERIC_QUESTIONS.iter().map(|q| q.to_string()).collect();
    };

    let mut questions: Vec<String> = score_tier(cv.score).iter().map(|q| q.to_string()).collect();

    if let Some(sector) = cv.extracted_data.sector() {
        questions.push(format!("What are the top skills for {} roles?", sector));
        questions.push(format!("How can I advance my career in {}?", sector));
        questions.push(format!("What companies are hiring {}s?", sector));
    }

    if cv.extracted_data.skills().is_some() {
        questions.extend(SKILL_QUESTIONS.iter().map(|q| q.to_string()));
    }

    questions.extend(CAREER_QUESTIONS.iter().map(|q| q.to_string()));
    questions.truncate(MAX_SUGGESTIONS);
    questions
}

/// First assistant turn of a Job Finder chat
pub fn welcome_message(cv_data: Option<&CvData>) -> String {
    let Some(cv) = cv_data else {
        return GENERIC_WELCOME.to_string();
    };

    let mut message =
        String::from("Hello! I can help you improve your CV and career prospects. I can see you've uploaded your CV");
    if cv.score > 0.0 {
        message.push_str(&format!(" with a score of {}/100", cv.score));
    }
    message.push('.');
    if let Some(sector) = cv.extracted_data.sector() {
        message.push_str(&format!(" You're in the {} sector.", sector));
    }
    message.push_str(" How can I assist you today?");
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::cv_data::ExtractedData;
    use chrono::Utc;
    use serde_json::json;

    fn cv(score: f64, sector: Option<&str>, skills: Option<Vec<&str>>) -> CvData {
        CvData {
            file_name: "cv.pdf".into(),
            score,
            analysis: json!({}),
            extracted_data: ExtractedData {
                sector: sector.map(str::to_string),
                skills: skills.map(|s| s.into_iter().map(str::to_string).collect()),
                ..Default::default()
            },
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_cv_gives_generic_list() {
        let questions = suggested_questions(None);
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[0], GENERIC_QUESTIONS[0]);
    }

    #[test]
    fn test_low_score_without_sector_or_skills() {
        let questions = suggested_questions(Some(&cv(50.0, None, None)));
        assert_eq!(questions[0], "How can I improve my CV score to get above 70?");
        assert_eq!(questions[1], "What are the key missing elements in my CV?");
        assert_eq!(questions.len(), 4);
        assert_eq!(questions[2], CAREER_QUESTIONS[0]);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(suggested_questions(Some(&cv(69.9, None, None)))[0], LOW_SCORE_QUESTIONS[0]);
        assert_eq!(suggested_questions(Some(&cv(70.0, None, None)))[0], MID_SCORE_QUESTIONS[0]);
        assert_eq!(suggested_questions(Some(&cv(84.0, None, None)))[0], MID_SCORE_QUESTIONS[0]);
        assert_eq!(suggested_questions(Some(&cv(85.0, None, None)))[0], HIGH_SCORE_QUESTIONS[0]);
    }

    #[test]
    fn test_high_score_with_sector_and_skills_is_capped() {
        let questions =
            suggested_questions(Some(&cv(95.0, Some("Engineering"), Some(vec!["Rust"]))));
        assert_eq!(questions.len(), MAX_SUGGESTIONS);
        assert_eq!(questions[0], HIGH_SCORE_QUESTIONS[0]);
        assert!(questions.contains(&"What are the top skills for Engineering roles?".to_string()));
        assert_eq!(questions[5], SKILL_QUESTIONS[0]);
        assert_eq!(questions[7], SKILL_QUESTIONS[2]);
        assert!(!questions.contains(&CAREER_QUESTIONS[0].to_string()));
    }

    #[test]
    fn test_empty_skills_and_blank_sector_are_ignored() {
        let questions = suggested_questions(Some(&cv(75.0, Some("  "), Some(vec![]))));
        assert_eq!(questions.len(), 4);
    }

    #[test]
    fn test_deterministic() {
        let data = cv(88.0, Some("Finance"), Some(vec!["Excel"]));
        assert_eq!(suggested_questions(Some(&data)), suggested_questions(Some(&data)));
    }

    #[test]
    fn test_welcome_messages() {
        assert_eq!(welcome_message(None), GENERIC_WELCOME);
        let message = welcome_message(Some(&cv(82.0, Some("Engineering"), None)));
        assert_eq!(
            message,
            "Hello! I can help you improve your CV and career prospects. I can see you've uploaded your CV with a score of 82/100. You're in the Engineering sector. How can I assist you today?"
        );
        let bare = welcome_message(Some(&cv(0.0, None, None)));
        assert_eq!(
            bare,
            "Hello! I can help you improve your CV and career prospects. I can see you've uploaded your CV. How can I assist you today?"
        );
    }
}
