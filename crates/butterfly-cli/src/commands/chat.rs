//! AI assistant

use super::prompt;
use anyhow::Result;
use butterfly_chat::{ChatTransport, ChatWidget, HttpChatTransport, Role};
use butterfly_core::AppConfig;
use std::io::{self, BufRead, Write};

pub fn run(config: &AppConfig, message: Option<&str>) -> Result<()> {
    let transport = HttpChatTransport::new(&config.chat_endpoint);
    let mut widget = ChatWidget::new();
    let stdout = io::stdout();

    match message {
        Some(text) => {
            if let Some(reply) = widget.send(&transport, text) {
                println!("{}", reply.content);
            }
            Ok(())
        }
        None => {
            let stdin = io::stdin();
            converse(&mut widget, &transport, &mut stdin.lock(), &mut stdout.lock())
        }
    }
}

/// Chat until an empty line or end of input
pub fn converse<R: BufRead, W: Write>(
    widget: &mut ChatWidget,
    transport: &dyn ChatTransport,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    for message in widget.transcript() {
        print_message(out, message.role, &message.content)?;
    }

    while let Some(line) = prompt(input, out, "you> ")? {
        if line.is_empty() {
            break;
        }
        if let Some(reply) = widget.send(transport, &line) {
            print_message(out, reply.role, &reply.content)?;
        }
    }
    widget.close();
    Ok(())
}

fn print_message<W: Write>(out: &mut W, role: Role, content: &str) -> Result<()> {
    match role {
        Role::User => writeln!(out, "you> {}", content)?,
        Role::Assistant => writeln!(out, "assistant> {}", content)?,
    }
    Ok(())
}
