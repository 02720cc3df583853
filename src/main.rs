//! Interactive document Q&A session.
//!
//! Every path given on the command line forms one upload batch; questions are
//! read from stdin until the exit sentinel, then the transcript is exported
//! next to the working directory.

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use docchat::{
    export_transcript, AnswerEngine, AskOutcome, GeminiClient, GeminiConfig, SessionState,
    UploadedFile,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env so GEMINI_API_KEY can live next to the project.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,docchat=info")),
        )
        .init();

    let config = GeminiConfig::from_env()?;
    let engine = AnswerEngine::new(Arc::new(GeminiClient::new(config)?));
    let mut session = SessionState::new();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if !paths.is_empty() {
        let mut files = Vec::new();
        for path in &paths {
            let name = Path::new(path)
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.clone());
            files.push(UploadedFile::new(name, std::fs::read(path)?));
        }

        let report = session.upload(&files);
        for failure in &report.errors {
            eprintln!(
                "Failed to extract text from {}: {}",
                failure.file_name, failure.error
            );
        }
        println!("Loaded {} file(s).", report.files_processed);
    }

    let stdin = std::io::stdin();
    while session.chat_active {
        print!("Ask a question about the documents (type 'exit' to stop): ");
        std::io::stdout().flush()?;

        let Some(line) = stdin.lock().lines().next() else {
            break;
        };
        let question = line?;
        if question.trim().is_empty() {
            continue;
        }

        match engine.ask(&mut session, &question).await {
            Ok(AskOutcome::Answered(answer)) => println!("\n{answer}\n"),
            Ok(AskOutcome::ChatEnded) => println!("Chat ended."),
            Ok(AskOutcome::Rejected) => println!("The chat has ended; restart to ask again."),
            Err(e) => eprintln!("Model call failed: {e}"),
        }
    }

    if !session.conversation.is_empty() {
        let path = export_transcript(&session.conversation, Path::new("."))?;
        println!("Transcript exported to {}", path.display());
    }

    Ok(())
}
