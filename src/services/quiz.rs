use rand::seq::{IndexedRandom, SliceRandom};
use rand::Rng;
use serde::Serialize;
use sqlx::SqlitePool;

use crate::services::vocabulary::{self, VocabularyError, VocabularyItem};

/// How many vocabulary items a question draws from.
pub const QUIZ_POOL_SIZE: i64 = 5;
/// Distractors per question, at most.
pub const MAX_DISTRACTORS: usize = 3;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub target_word: String,
    pub options: Vec<String>,
    /// Round-tripped by the caller with the chosen index; no per-user quiz
    /// state is held between question and answer.
    pub correct_index: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("not enough vocabulary for a quiz")]
    InsufficientVocabulary,
    #[error(transparent)]
    Vocabulary(#[from] VocabularyError),
}

/// Builds a multiple-choice question from the user's most recent words:
/// one uniformly chosen target plus up to three distractor translations
/// sampled without replacement, shuffled together.
pub async fn build_question(pool: &SqlitePool, user_id: &str) -> Result<Question, QuizError> {
    let items = vocabulary::list_words(pool, user_id, Some(QUIZ_POOL_SIZE), None).await?;
    assemble_question(&items, &mut rand::rng())
}

/// Pure equality check; the caller reports the outcome via
/// `stats::record_answer`.
pub fn score_answer(correct_index: usize, chosen_index: usize) -> bool {
    correct_index == chosen_index
}

/// The pure part of question generation, separated from the fetch so the
/// sampling invariants are testable with a plain item list.
pub fn assemble_question<R: Rng>(
    items: &[VocabularyItem],
    rng: &mut R,
) -> Result<Question, QuizError> {
    if items.len() < 2 {
        return Err(QuizError::InsufficientVocabulary);
    }

    let target = items.choose(rng).ok_or(QuizError::InsufficientVocabulary)?;
    let correct = target.translation.clone();

    // Translations equal to the correct one would impersonate a second
    // correct option; deduplicate the pool as well.
    let mut pool: Vec<&str> = Vec::new();
    for item in items {
        let t = item.translation.as_str();
        if t != correct && !pool.contains(&t) {
            pool.push(t);
        }
    }

    if pool.is_empty() {
        // Every fetched translation is textually identical to the target's.
        return Err(QuizError::InsufficientVocabulary);
    }

    let mut options: Vec<String> = pool
        .choose_multiple(rng, MAX_DISTRACTORS)
        .map(|t| t.to_string())
        .collect();
    options.push(correct.clone());
    options.shuffle(rng);

    let correct_index = options
        .iter()
        .position(|o| *o == correct)
        .ok_or(QuizError::InsufficientVocabulary)?;

    Ok(Question {
        target_word: target.word.clone(),
        options,
        correct_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, word: &str, translation: &str) -> VocabularyItem {
        VocabularyItem {
            id,
            word_id: format!("w-{id}"),
            word: word.to_string(),
            translation: translation.to_string(),
            transcription: None,
            part_of_speech: None,
            examples: Vec::new(),
            mastered: false,
            added_at_ms: id,
            last_reviewed_at_ms: None,
            review_count: 0,
        }
    }

    #[test]
    fn score_answer_is_plain_equality() {
        assert!(score_answer(2, 2));
        assert!(!score_answer(2, 0));
    }

    #[test]
    fn two_items_give_two_options() {
        let items = vec![item(1, "cat", "кошка"), item(2, "dog", "собака")];
        let q = assemble_question(&items, &mut rand::rng()).unwrap();
        assert_eq!(q.options.len(), 2);
        let correct = &q.options[q.correct_index];
        assert!(items.iter().any(|i| i.word == q.target_word && i.translation == *correct));
    }

    #[test]
    fn fewer_than_two_items_is_insufficient() {
        let mut rng = rand::rng();
        assert!(matches!(
            assemble_question(&[], &mut rng),
            Err(QuizError::InsufficientVocabulary)
        ));
        assert!(matches!(
            assemble_question(&[item(1, "cat", "кошка")], &mut rng),
            Err(QuizError::InsufficientVocabulary)
        ));
    }

    #[test]
    fn identical_translations_are_insufficient() {
        let items = vec![item(1, "begin", "начать"), item(2, "start", "начать")];
        assert!(matches!(
            assemble_question(&items, &mut rand::rng()),
            Err(QuizError::InsufficientVocabulary)
        ));
    }

    #[test]
    fn correct_translation_appears_exactly_once() {
        let items = vec![
            item(1, "run", "бежать"),
            item(2, "sprint", "бежать"),
            item(3, "cat", "кошка"),
            item(4, "dog", "собака"),
            item(5, "house", "дом"),
        ];
        for _ in 0..100 {
            let q = assemble_question(&items, &mut rand::rng()).unwrap();
            let correct = q.options[q.correct_index].clone();
            let occurrences = q.options.iter().filter(|o| **o == correct).count();
            assert_eq!(occurrences, 1, "duplicate correct option in {:?}", q.options);
            assert!(q.options.len() >= 2 && q.options.len() <= 1 + MAX_DISTRACTORS);
        }
    }
}
