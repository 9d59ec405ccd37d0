//! Uniform shuffling of question order and option order.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::bank::QuestionBank;
use crate::model::{Question, SessionQuestion, TopicSelection};

/// Uniform in-place permutation (Fisher–Yates).
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Returns a copy of `question` with its options permuted uniformly at random.
///
/// `correct_index` of the copy points at the same option text as before.
pub fn shuffle_options<R: Rng + ?Sized>(question: &Question, rng: &mut R) -> Question {
    let mut order: Vec<usize> = (0..question.option_count()).collect();
    shuffle_in_place(&mut order, rng);
    question.permuted(&order)
}

/// Builds a fresh session sequence from the selected topics.
///
/// Every question of every selected topic is copied with its options shuffled,
/// then the concatenated list is shuffled as a whole. Topics missing from the
/// bank contribute nothing.
pub fn build_sequence<R: Rng + ?Sized>(
    bank: &QuestionBank,
    selection: &TopicSelection,
    rng: &mut R,
) -> Vec<SessionQuestion> {
    let mut sequence = Vec::new();
    for topic in selection.iter() {
        for question in bank.questions(topic) {
            sequence.push(SessionQuestion {
                question: shuffle_options(question, rng),
                topic: topic.clone(),
            });
        }
    }
    shuffle_in_place(&mut sequence, rng);
    sequence
}
