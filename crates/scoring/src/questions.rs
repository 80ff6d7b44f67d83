use common::{IdeaDropResult, Language};
use tracing::warn;

use crate::models::SmartQuestion;

pub const QUESTION_COUNT: usize = 3;

/// Fixed questions shown when the generation service is unavailable.
pub fn fallback_questions(language: Language) -> Vec<SmartQuestion> {
    match language {
        Language::Ko => vec![
            SmartQuestion::new(
                "이 아이디어의 주요 타겟 고객은 누구인가요?",
                &["개인 소비자", "소상공인", "기업", "공공기관"],
            ),
            SmartQuestion::new(
                "어떤 방식으로 수익을 만들 계획인가요?",
                &["구독료", "판매 수수료", "광고", "일회성 판매"],
            ),
            SmartQuestion::new(
                "현재 아이디어는 어느 단계에 있나요?",
                &["아이디어 구상", "시장 검증 중", "프로토타입 개발", "이미 출시"],
            ),
        ],
        Language::En => vec![
            SmartQuestion::new(
                "Who is the main target customer for this idea?",
                &["Individual consumers", "Small businesses", "Enterprises", "Public sector"],
            ),
            SmartQuestion::new(
                "How do you plan to make money?",
                &["Subscription", "Commission", "Advertising", "One-time sales"],
            ),
            SmartQuestion::new(
                "What stage is the idea at right now?",
                &["Just an idea", "Validating the market", "Building a prototype", "Already launched"],
            ),
        ],
    }
}

/// Substitutes the fixed question set when generation failed.
pub fn questions_or_fallback(
    generated: IdeaDropResult<Vec<SmartQuestion>>,
    language: Language,
) -> Vec<SmartQuestion> {
    match generated {
        Ok(questions) => questions,
        Err(e) => {
            warn!("Smart question generation failed, using fallback set: {}", e);
            fallback_questions(language)
        }
    }
}
