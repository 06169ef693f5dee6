use std::{io::Write, process::ExitCode};

use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use timed_quiz_engine::{
    app_state::AppState,
    config::{Config, CountdownConfig},
    errors::AppResult,
    models::{
        domain::{QuestionRecord, SessionEvent, SessionOutcome},
        dto::{GenerateQuizRequest, GenerationStatus},
    },
    services::{QuizAttemptTally, SelectionTracker, SessionController},
};

type StdinLines = Lines<BufReader<Stdin>>;

fn print_usage() {
    println!("usage: timed-quiz <topic...>   generate and play a new quiz");
    println!("       timed-quiz --saved       play the last generated quiz");
    println!("       timed-quiz --clear       forget the saved quiz");
}

/// Map what the player typed to an option index: a label, a 1-based number
/// or the option text itself.
fn choose_option(record: &QuestionRecord, input: &str) -> Option<usize> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(number) = input.parse::<usize>() {
        return (1..=record.options.len()).contains(&number).then(|| number - 1);
    }
    if input.chars().count() == 1 {
        let wanted = input.chars().next()?.to_ascii_uppercase();
        if let Some(index) =
            (0..record.options.len()).find(|i| record.option_label(*i) == Some(wanted))
        {
            return Some(index);
        }
    }
    record
        .options
        .iter()
        .position(|o| o.trim().eq_ignore_ascii_case(input))
}

fn report(record: &QuestionRecord, outcome: &SessionOutcome) {
    println!();
    if outcome.timed_out {
        println!("  Time's up! The answer was: {}", outcome.correct_answer);
    } else if outcome.is_correct {
        println!("  Correct!");
    } else {
        println!("  Wrong. The answer was: {}", outcome.correct_answer);
    }
    if !record.explanation.trim().is_empty() {
        println!("  {}", record.explanation.trim());
    }
}

async fn play_question(
    number: usize,
    record: &QuestionRecord,
    countdown: CountdownConfig,
    lines: &mut StdinLines,
) -> AppResult<Option<SessionOutcome>> {
    println!("\nQuestion {}: {}", number, record.question_text);
    for (i, option) in record.options.iter().enumerate() {
        println!("  {}) {}", record.option_label(i).unwrap_or('?'), option);
    }

    let mut tracker = SelectionTracker::new(record.options.clone(), |index, text| {
        log::debug!("Selected option {} ({})", index, text)
    });
    let (mut controller, mut events) = SessionController::new(countdown);
    controller.start(record)?;

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(SessionEvent::Tick { remaining }) => {
                    print!("\r  {}s left > ", remaining);
                    let _ = std::io::stdout().flush();
                }
                Some(SessionEvent::Finished(outcome)) => {
                    report(record, &outcome);
                    return Ok(Some(outcome));
                }
                None => return Ok(controller.outcome()),
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    controller.cancel();
                    return Ok(None);
                };
                let Some(index) = choose_option(record, &line) else {
                    println!("  No option matches '{}'", line.trim());
                    continue;
                };
                tracker.select(index)?;
                if let Some(text) = tracker.selected_text() {
                    controller.submit_answer(text);
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let question_count = config.question_count;
    let state = AppState::new(config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let records = match args.first().map(String::as_str) {
        None | Some("--help") | Some("-h") => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Some("--clear") => {
            return match state.quiz_service.clear_saved() {
                Ok(()) => {
                    println!("Saved quiz cleared");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("{}", e);
                    ExitCode::FAILURE
                }
            };
        }
        Some("--saved") => {
            let records = state.quiz_service.load_saved();
            if records.is_empty() {
                println!("No saved quiz; generate one with a topic first");
                return ExitCode::FAILURE;
            }
            records
        }
        Some(_) => {
            let request = GenerateQuizRequest::new(args.join(" "), question_count);
            println!("Generating questions about '{}'...", request.topic);
            let status = state.quiz_service.generate_quiz(&request).await;
            println!("{}", status.user_message());
            match status {
                GenerationStatus::Ready(records) => records,
                GenerationStatus::Empty | GenerationStatus::Failed(_) => return ExitCode::FAILURE,
            }
        }
    };

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut tally = QuizAttemptTally::new();

    for (i, record) in records.iter().enumerate() {
        match play_question(i + 1, record, state.countdown, &mut lines).await {
            Ok(Some(outcome)) => tally.record(&outcome),
            Ok(None) => {
                tally.record_abandoned();
                break;
            }
            Err(e) => {
                log::error!("Question {} could not be played: {}", i + 1, e);
                tally.record_abandoned();
            }
        }
    }

    println!("\n{}", tally.summary());
    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> QuestionRecord {
        QuestionRecord::new(
            "Pick",
            vec!["Mercury".into(), "Venus".into()],
            "C",
            "",
        )
        .with_labels(vec!['A', 'C'])
    }

    #[test]
    fn test_chooses_by_label_number_or_text() {
        let record = record();

        assert_eq!(choose_option(&record, "c"), Some(1));
        assert_eq!(choose_option(&record, "1"), Some(0));
        assert_eq!(choose_option(&record, " venus "), Some(1));
    }

    #[test]
    fn test_rejects_unknown_input() {
        let record = record();

        assert_eq!(choose_option(&record, "B"), None);
        assert_eq!(choose_option(&record, "3"), None);
        assert_eq!(choose_option(&record, ""), None);
    }
}
