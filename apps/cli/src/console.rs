//! Interactive line-oriented console.
//!
//! Grammar (whitespace-delimited, no quoting):
//! `search <keyword> [locale] [page] [per_page]`, `article <id> [locale]`,
//! `help`, `quit`.

use helpcenter_client::HelpCenterClient;
use helpcenter_shared::{
    ArticleParams, HelpCenterError, LenientNumber, Result, SearchParams,
};
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

pub(crate) const USAGE: &str = "\
commands:
  search <keyword> [locale] [page] [per_page]
  article <id> [locale]
  help
  quit";

const PROMPT: &str = "> ";

/// A parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ConsoleCommand {
    Search(SearchParams),
    Article(ArticleParams),
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub(crate) fn parse_command(line: &str) -> Result<Option<ConsoleCommand>> {
    let mut tokens = line.split_whitespace();
    let Some(verb) = tokens.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = tokens.collect();

    let command = match verb.to_ascii_lowercase().as_str() {
        "search" => {
            let (keyword, rest) = args
                .split_first()
                .ok_or_else(|| HelpCenterError::validation("search needs a keyword"))?;
            if rest.len() > 3 {
                return Err(HelpCenterError::validation("too many arguments for search"));
            }
            ConsoleCommand::Search(SearchParams {
                query: (*keyword).to_string(),
                locale: rest.first().map(|l| (*l).to_string()),
                page: rest.get(1).map(|p| LenientNumber::from(*p)),
                per_page: rest.get(2).map(|p| LenientNumber::from(*p)),
            })
        }
        "article" => {
            let (raw_id, rest) = args
                .split_first()
                .ok_or_else(|| HelpCenterError::validation("article needs an id"))?;
            if rest.len() > 1 {
                return Err(HelpCenterError::validation("too many arguments for article"));
            }
            let id = raw_id.parse::<u64>().map_err(|_| {
                HelpCenterError::validation(format!("article id must be a number, got '{raw_id}'"))
            })?;
            ConsoleCommand::Article(ArticleParams {
                id,
                locale: rest.first().map(|l| (*l).to_string()),
            })
        }
        "help" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        other => {
            return Err(HelpCenterError::validation(format!("unknown command '{other}'")));
        }
    };

    Ok(Some(command))
}

/// Run the console on stdin/stdout until `quit` or end of input.
pub(crate) async fn run(client: &HelpCenterClient) -> Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_with(client, stdin, stdout).await
}

/// Console loop over arbitrary input/output streams.
///
/// Operation failures are reported and the loop keeps reading.
pub(crate) async fn run_with<R, W>(client: &HelpCenterClient, input: R, mut output: W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    write_out(&mut output, &format!("{USAGE}\n")).await?;

    loop {
        write_out(&mut output, PROMPT).await?;

        let Some(line) = lines.next_line().await.map_err(|e| HelpCenterError::io("<stdin>", e))? else {
            debug!("console input closed");
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                write_out(&mut output, &format!("{e}\n{USAGE}\n")).await?;
                continue;
            }
        };

        let rendered = match command {
            ConsoleCommand::Quit => break,
            ConsoleCommand::Help => format!("{USAGE}\n"),
            ConsoleCommand::Search(params) => {
                if let Err(e) = params.validate() {
                    format!("{e}\n{USAGE}\n")
                } else {
                    render(client.search(&params).await)
                }
            }
            ConsoleCommand::Article(params) => render(client.get_article(&params).await),
        };
        write_out(&mut output, &rendered).await?;
    }

    Ok(())
}

fn render<T: Serialize>(result: Result<T>) -> String {
    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(json) => format!("{json}\n"),
            Err(e) => format!("error: failed to serialize result: {e}\n"),
        },
        Err(e) => {
            warn!(error = %e, "console operation failed");
            format!("error: {e}\n")
        }
    }
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<()> {
    output
        .write_all(text.as_bytes())
        .await
        .map_err(|e| HelpCenterError::io("<stdout>", e))?;
    output
        .flush()
        .await
        .map_err(|e| HelpCenterError::io("<stdout>", e))
}
