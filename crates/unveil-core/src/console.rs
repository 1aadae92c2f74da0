//! The `:` console: a handful of fixed commands answered from tables.

use crate::chat;
use crate::prefs::Persona;

/// Words that unlock the truth persona.
pub const PASSPHRASES: &[&str] = &[
    "react",
    "makkauhijau",
    "bojio",
    "abuden",
    "potongstim",
    "syoksendiri",
    "kautim",
    "mantap",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    System,
    Echo,
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub tone: Tone,
    pub text: String,
}

impl ConsoleLine {
    fn new(tone: Tone, text: impl Into<String>) -> Self {
        Self {
            tone,
            text: text.into(),
        }
    }
}

/// Side effect the front-end should apply after printing the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    /// Replace the console history with the reply lines.
    Clear,
    /// Close the console.
    Exit,
    SetPersona(Persona),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleReply {
    pub lines: Vec<ConsoleLine>,
    pub action: Option<ConsoleAction>,
}

impl ConsoleReply {
    fn push(&mut self, tone: Tone, text: impl Into<String>) {
        self.lines.push(ConsoleLine::new(tone, text));
    }

    fn blank(&mut self) {
        self.push(Tone::System, "");
    }
}

/// Lines shown when the console opens.
pub fn banner() -> Vec<ConsoleLine> {
    vec![
        ConsoleLine::new(Tone::System, "🚀 UNVEIL CONSOLE"),
        ConsoleLine::new(Tone::System, "Type \"help\" for available commands."),
    ]
}

/// Answers one line of console input.
///
/// Empty input produces no reply at all (not even an echo).
pub fn interpret(input: &str, persona: Persona) -> ConsoleReply {
    let cmd = input.trim().to_lowercase();
    let mut reply = ConsoleReply::default();
    if cmd.is_empty() {
        return reply;
    }
    reply.push(Tone::Echo, format!("> {}", input.trim()));

    match cmd.as_str() {
        "help" => {
            reply.blank();
            reply.push(Tone::System, "Available commands:");
            for (name, about) in [
                ("help", "Show this help message"),
                ("about", "About the author"),
                ("skills", "List technical skills"),
                ("status", "Show the current persona"),
                ("toggle", "Switch truth/professional persona"),
                ("ask <q>", "Ask the chat assistant"),
                ("clear", "Clear the console"),
                ("exit", "Close the console"),
            ] {
                reply.push(Tone::System, format!("  {name:<9} - {about}"));
            }
            reply.blank();
            reply.push(Tone::Info, "💡 Hint: try entering the password...");
        }
        "about" => {
            reply.blank();
            reply.push(Tone::Success, "👋 Marketing Technologist | Revenue Systems Builder");
            reply.push(
                Tone::System,
                "Combining automation, APIs and code with marketing craft",
            );
            reply.push(Tone::System, "to build revenue-focused systems.");
        }
        "skills" => {
            reply.blank();
            reply.push(Tone::Success, "⚡ Technical skills:");
            for skill in [
                "n8n automation & API integration",
                "React, JavaScript, HTML/CSS",
                "Google Analytics 4 & marketing automation",
                "Adobe Creative Suite",
                "Social media growth engineering",
            ] {
                reply.push(Tone::System, format!("  • {skill}"));
            }
        }
        "status" => {
            reply.blank();
            push_persona_status(&mut reply, persona, "ACTIVE");
        }
        "toggle" => {
            let next = persona.toggled();
            reply.blank();
            push_persona_status(&mut reply, next, "SWITCHED");
            reply.action = Some(ConsoleAction::SetPersona(next));
        }
        "professional" => {
            reply.blank();
            push_persona_status(&mut reply, Persona::Professional, "SWITCHED");
            reply.action = Some(ConsoleAction::SetPersona(Persona::Professional));
        }
        "clear" => {
            reply.lines = vec![
                ConsoleLine::new(Tone::System, "🚀 UNVEIL CONSOLE"),
                ConsoleLine::new(Tone::System, "Console cleared. Type \"help\" for commands."),
            ];
            reply.action = Some(ConsoleAction::Clear);
        }
        "exit" => {
            reply.push(Tone::System, "👋 Goodbye! Closing console...");
            reply.action = Some(ConsoleAction::Exit);
        }
        word if PASSPHRASES.contains(&word) => {
            reply.blank();
            reply.push(Tone::Success, "✅ PASSWORD ACCEPTED!");
            reply.push(Tone::Success, "🔓 TRUTH MODE ACTIVATED");
            reply.push(Tone::System, "Use \"toggle\" to switch back to professional mode.");
            reply.action = Some(ConsoleAction::SetPersona(Persona::Truth));
        }
        _ => match cmd.strip_prefix("ask") {
            Some(question) if question.is_empty() || question.starts_with(' ') => {
                let answer = chat::respond(question.trim());
                reply.blank();
                for line in answer.text.lines() {
                    reply.push(Tone::Info, line);
                }
                for follow_up in answer.follow_ups {
                    reply.push(Tone::System, format!("  → {follow_up}"));
                }
            }
            _ => {
                reply.push(Tone::Error, format!("Command not found: \"{cmd}\""));
                reply.push(Tone::System, "Type \"help\" for available commands.");
            }
        },
    }
    reply
}

fn push_persona_status(reply: &mut ConsoleReply, persona: Persona, verb: &str) {
    match persona {
        Persona::Truth => {
            reply.push(Tone::Success, format!("🔓 TRUTH MODE: {verb}"));
            reply.push(Tone::System, "Showing honest, unfiltered content.");
        }
        Persona::Professional => {
            reply.push(Tone::Info, format!("🔒 PROFESSIONAL MODE: {verb}"));
            reply.push(Tone::System, "Showing employer-friendly content.");
        }
    }
}
