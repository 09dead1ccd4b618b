//! Interactive stop handling for the record command

use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

/// How the user ended a recording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSignal {
    /// Enter pressed (or stdin closed): submit the recording
    Finish,
    /// Ctrl+C: discard the recording
    Discard,
}

/// Wait for Enter or Ctrl+C, calling `on_tick` at the given interval meanwhile
pub async fn wait_for_stop<F: FnMut()>(tick_every: Duration, mut on_tick: F) -> StopSignal {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(tick_every);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = ticker.tick() => on_tick(),
            line = lines.next_line() => {
                if let Err(e) = line {
                    tracing::debug!(error = %e, "stdin read failed; finishing recording");
                }
                return StopSignal::Finish;
            }
            result = &mut ctrl_c => {
                if let Err(e) = result {
                    tracing::warn!(error = %e, "failed to listen for Ctrl+C");
                    // Without a working interrupt handler only Enter can stop.
                    return wait_for_line(&mut lines).await;
                }
                return StopSignal::Discard;
            }
        }
    }
}

async fn wait_for_line<R>(lines: &mut tokio::io::Lines<R>) -> StopSignal
where
    R: tokio::io::AsyncBufRead + Unpin,
{
    let _ = lines.next_line().await;
    StopSignal::Finish
}

/// Ask a yes/no question on stdin; anything but "y"/"yes" is a no
pub async fn confirm() -> bool {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    match lines.next_line().await {
        Ok(Some(answer)) => is_yes(&answer),
        _ => false,
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_explicit_yes_confirms() {
        assert!(is_yes("y"));
        assert!(is_yes(" YES \n"));
        assert!(!is_yes(""));
        assert!(!is_yes("n"));
        assert!(!is_yes("yep"));
    }

    #[tokio::test]
    async fn line_reader_finishes_on_input() {
        let input: &[u8] = b"\n";
        let mut lines = BufReader::new(input).lines();
        assert_eq!(wait_for_line(&mut lines).await, StopSignal::Finish);
    }
}
