//! 终端操作员 - 基础设施层
//!
//! 持有唯一的终端输入输出，把选择门的请求展示给操作员并回传确认

use crate::error::{AppError, AppResult};
use crate::services::{ChoicePrompt, OperatorHandle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

/// 操作员输入的一行
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// 空行：确认预选项
    Default,
    /// 选择第几个候选（从0开始）
    Pick(usize),
    Invalid,
}

/// 解析操作员输入，编号从1开始
pub fn parse_answer(line: &str, candidate_count: usize) -> Answer {
    let line = line.trim();
    if line.is_empty() {
        return Answer::Default;
    }
    match line.parse::<usize>() {
        Ok(n) if (1..=candidate_count).contains(&n) => Answer::Pick(n - 1),
        _ => Answer::Invalid,
    }
}

/// 持续处理选择请求，直到选择门全部释放
///
/// 输入结束（EOF）时按预选项确认，保证挂起的流程总能继续。
pub async fn run_terminal_operator<R, W>(
    mut operator: OperatorHandle,
    mut input: R,
    mut output: W,
) -> AppResult<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    while let Some(prompt) = operator.next_prompt().await {
        write_out(&mut output, &render_prompt(&prompt)).await?;

        let answer = loop {
            write_out(&mut output, "> ").await?;
            let mut line = String::new();
            let read = input
                .read_line(&mut line)
                .await
                .map_err(|e| AppError::file_read_failed("<stdin>", e))?;
            if read == 0 {
                break Answer::Default;
            }
            match parse_answer(&line, prompt.candidates.len()) {
                Answer::Invalid => {
                    let hint = format!(
                        "Scelta non valida, inserisci un numero da 1 a {} (Invio = 1)\n",
                        prompt.candidates.len()
                    );
                    write_out(&mut output, &hint).await?;
                }
                answer => break answer,
            }
        };

        if let Answer::Pick(index) = answer {
            if let Err(e) = operator.select(prompt.invocation, index) {
                warn!("⚠️ 选择失败: {}", e);
                continue;
            }
        }
        match operator.confirm(prompt.invocation) {
            Ok(chosen) => write_out(&mut output, &format!("✓ {}\n\n", chosen)).await?,
            Err(e) => warn!("⚠️ 确认失败: {}", e),
        }
    }

    Ok(())
}

fn render_prompt(prompt: &ChoicePrompt) -> String {
    let mut text = String::from("\nPiù autori trovati, scegli quello corretto:\n");
    for (idx, candidate) in prompt.candidates.iter().enumerate() {
        let marker = if idx == ChoicePrompt::DEFAULT_INDEX { "(•)" } else { "( )" };
        text.push_str(&format!("  {} {}. {}\n", marker, idx + 1, candidate));
    }
    text
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> AppResult<()> {
    output
        .write_all(text.as_bytes())
        .await
        .map_err(|e| AppError::file_write_failed("<stdout>", e))?;
    output
        .flush()
        .await
        .map_err(|e| AppError::file_write_failed("<stdout>", e))
}
