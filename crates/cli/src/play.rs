use anyhow::Result;
use spoiler_core::context::AppContext;
use spoiler_core::game::{FinalScore, QuizGame};
use spoiler_core::models::Answer;
use spoiler_core::questions::QuestionBoard;
use std::io::Write;
use storage::SCORE_KEY;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const NO_QUESTIONS: &str = "No questions available. Please check your connection.";

/// Runs the quiz on a line-based terminal until `rounds` games finish, the
/// player types `q`, or input ends. Returns the final score of each finished round.
pub async fn play<R: AsyncBufRead + Unpin, W: Write>(
    ctx: &AppContext,
    input: &mut R,
    out: &mut W,
    rounds: usize,
) -> Result<Vec<FinalScore>> {
    let supplier = ctx.question_supplier(QuestionBoard::new());
    let mut game = QuizGame::new(supplier.refresh().await);
    let mut finished = Vec::new();
    if game.is_empty() {
        writeln!(out, "{}", NO_QUESTIONS)?;
        return Ok(finished);
    }
    game.resume_score(storage::load_score(&ctx.pool).await?);

    let mut line = String::new();
    while let Some(question) = game.current() {
        writeln!(
            out,
            "Is this edible? ({}/{})  Score: {}/{}",
            game.position() + 1,
            game.total(),
            game.score(),
            game.total()
        )?;
        writeln!(out, "  image: {}", question.source)?;
        write!(out, "[e]dible / [n]ot edible / [q]uit > ")?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line).await? == 0 || line.trim().eq_ignore_ascii_case("q") {
            break;
        }
        let chosen: Answer = match line.parse() {
            Ok(a) => a,
            Err(e) => {
                writeln!(out, "{}", e)?;
                continue;
            }
        };

        let Some(outcome) = game.choose(chosen) else {
            break;
        };
        writeln!(
            out,
            "{} You selected: {}. The correct answer is {}.",
            if outcome.correct { "Correct!" } else { "Incorrect!" },
            outcome.chosen,
            outcome.expected
        )?;

        match outcome.game_over {
            None => {
                if outcome.correct {
                    storage::set_setting(&ctx.pool, SCORE_KEY, &game.score().to_string()).await?;
                }
            }
            Some(final_score) => {
                storage::delete_setting(&ctx.pool, SCORE_KEY).await?;
                writeln!(
                    out,
                    "Game Over. Your final score is {}/{}",
                    final_score.score, final_score.total
                )?;
                finished.push(final_score);
                if finished.len() >= rounds {
                    break;
                }
                debug!("starting round {}", finished.len() + 1);
                game.next_round(&supplier).await;
                if game.is_empty() {
                    writeln!(out, "{}", NO_QUESTIONS)?;
                    break;
                }
            }
        }
    }
    Ok(finished)
}
