use crate::models::domain::Question;

/// A quiz attempt passes at 70% or better.
pub const PASS_THRESHOLD: i32 = 70;

/// A student gets two attempts per lesson quiz.
pub const MAX_QUIZ_ATTEMPTS: i32 = 2;

/// Score an answer sheet against the lesson's questions. Answers are
/// index-aligned to question order; a missing or out-of-range answer counts
/// as incorrect. Returns the rounded percentage score and the number of
/// correct answers.
pub fn score_answers(questions: &[Question], answers: &[i32]) -> (i32, usize) {
    if questions.is_empty() {
        return (0, 0);
    }

    let correct_count = questions
        .iter()
        .enumerate()
        .filter(|(i, question)| answers.get(*i) == Some(&question.correct_answer))
        .count();

    let score = (100.0 * correct_count as f64 / questions.len() as f64).round() as i32;
    (score, correct_count)
}
