//! Built-in question bank. Used whenever no TOML bank is configured.

use crate::domain::Question;

fn q(id: u32, question: &str, options: [&str; 4], correct: &str) -> Question {
  Question {
    id,
    question: question.into(),
    options: options.iter().map(|o| o.to_string()).collect(),
    correct_answer: correct.into(),
  }
}

/// Automatic-section signalling and traction questions.
pub fn seed_questions() -> Vec<Question> {
  vec![
    q(
      1,
      "Which marker identifies an automatic stop signal?",
      ["'A' marker", "'P' marker", "'G' marker", "'C' marker"],
      "'A' marker",
    ),
    q(
      2,
      "By day, how long must a train wait at an automatic stop signal showing 'ON' before proceeding?",
      ["1 minute", "2 minutes", "5 minutes", "It must not proceed"],
      "1 minute",
    ),
    q(
      3,
      "By night, how long must a train wait at an automatic stop signal showing 'ON' before proceeding?",
      ["1 minute", "2 minutes", "3 minutes", "10 minutes"],
      "2 minutes",
    ),
    q(
      4,
      "After passing an automatic signal at 'ON' with good visibility, what is the maximum permitted speed?",
      ["8 km/h", "15 km/h", "25 km/h", "30 km/h"],
      "15 km/h",
    ),
    q(
      5,
      "After passing an automatic signal at 'ON' with poor visibility, what is the maximum permitted speed?",
      ["8 km/h", "10 km/h", "15 km/h", "20 km/h"],
      "8 km/h",
    ),
    q(
      6,
      "Which device detects the presence of a train in an automatic block section?",
      ["Track circuit", "Point machine", "Level crossing gate", "Block instrument"],
      "Track circuit",
    ),
    q(
      7,
      "What is the nominal voltage of the overhead traction supply?",
      ["1.5 kV DC", "3 kV DC", "15 kV AC", "25 kV AC"],
      "25 kV AC",
    ),
    q(
      8,
      "What aspect does an automatic signal show when at least two block sections ahead are clear?",
      ["Red", "Yellow", "Double yellow", "Green"],
      "Green",
    ),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashSet;

  #[test]
  fn bank_is_well_formed() {
    let bank = seed_questions();
    let ids: HashSet<u32> = bank.iter().map(|q| q.id).collect();
    assert_eq!(ids.len(), bank.len(), "question ids must be unique");
    for q in &bank {
      assert!(q.options.contains(&q.correct_answer), "question {} has no correct option", q.id);
    }
  }
}
