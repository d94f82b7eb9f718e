use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

const PROMPT: &str =
    "input problem ids to download(0 means all, use whitespace to split multiple problem ids): ";

/// Asks for the problem ids to archive and returns the raw answer line.
pub async fn read_selection<R, W>(mut reader: R, mut writer: W) -> Result<String>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    writer.write_all(PROMPT.as_bytes()).await?;
    writer.flush().await?;

    let mut line = String::new();
    reader.read_line(&mut line).await?;

    Ok(line.trim().to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn read_one_line_of_ids() {
        let input: &[u8] = b"1 3  15\nignored\n";
        let mut output: Vec<u8> = Vec::new();

        let selection = read_selection(input, &mut output).await.unwrap();

        assert_eq!(selection, "1 3  15");
        assert_eq!(String::from_utf8(output).unwrap(), PROMPT);
    }

    #[tokio::test]
    async fn empty_input_selects_nothing() {
        let input: &[u8] = b"";
        let selection = read_selection(input, Vec::new()).await.unwrap();

        assert!(selection.is_empty());
    }
}
