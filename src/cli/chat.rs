use anyhow::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use uuid::Uuid;

use crate::api::AppState;
use crate::chat::converse;
use crate::core::{AppConfig, logging};

pub async fn run(session_id: Option<String>) -> Result<()> {
    logging::init(&format!("{}=warn", env!("CARGO_CRATE_NAME")));

    let config = AppConfig::from_env();
    let locale = config.locale;
    let state = AppState::new(config)?;
    let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let mut rl = DefaultEditor::new()?;

    println!("Session: {}", session_id);

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                let message = line.trim();
                if message.is_empty() {
                    continue;
                }
                rl.add_history_entry(message)?;

                match converse(&state, &session_id, message).await {
                    Ok(reply) => {
                        println!("{}", reply.reply);
                        if !reply.persisted {
                            println!("(transcript not saved)");
                        }
                    }
                    Err(e) => {
                        println!("{} ({})", e.kind().user_message(locale), e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    Ok(())
}
