//! Renders transcript changes as terminal output.
//!
//! Replies of a targeted turn stream concurrently. The printer follows one
//! reply at a time and holds back the others until it finishes, so the
//! terminal shows whole replies one after another instead of interleaved
//! characters.

use metis_application::TranscriptView;
use metis_core::agent::Agent;
use metis_core::conversation::Message;
use std::collections::HashMap;
use std::time::{Duration, Instant};

const IDLE_AFTER: Duration = Duration::from_millis(250);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Header,
    User,
    Speaker,
    Text,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub style: Style,
    pub text: String,
}

impl Chunk {
    fn new(style: Style, text: impl Into<String>) -> Self {
        Self {
            style,
            text: text.into(),
        }
    }
}

enum Pending {
    Delta(String),
    Revised(String),
}

pub struct TranscriptPrinter {
    names: HashMap<String, String>,
    conversation_id: Option<String>,
    printed: HashMap<String, String>,
    current: Option<String>,
    last_growth: Option<Instant>,
    line_open: bool,
}

impl TranscriptPrinter {
    pub fn new(agents: &[Agent]) -> Self {
        let mut names: HashMap<String, String> = agents
            .iter()
            .map(|a| (a.id.clone(), a.name.clone()))
            .collect();
        let orchestrator = Agent::orchestrator();
        names.insert(orchestrator.id, orchestrator.name);

        Self {
            names,
            conversation_id: None,
            printed: HashMap::new(),
            current: None,
            last_growth: None,
            line_open: false,
        }
    }

    /// Returns what to print for the change that produced `view`.
    ///
    /// `settled` is true once no generation is responding; everything held
    /// back is flushed then.
    pub fn render(&mut self, view: &TranscriptView, settled: bool, now: Instant) -> Vec<Chunk> {
        let mut out = Vec::new();

        if view.conversation_id != self.conversation_id {
            self.switch_to(view, &mut out);
            return out;
        }

        for message in view.messages.iter().filter(|m| m.is_user()) {
            self.printed.insert(message.id.clone(), message.text.clone());
        }

        if let Some(current) = self.current.clone() {
            match view.messages.iter().find(|m| m.id == current) {
                Some(message) => {
                    if self.emit_pending(message, &mut out) {
                        self.last_growth = Some(now);
                    }
                }
                None => {
                    self.close_line(&mut out);
                    self.current = None;
                }
            }
        }

        let current_idle = self
            .last_growth
            .is_none_or(|at| now.duration_since(at) >= IDLE_AFTER);
        if self.current.is_none() || settled || current_idle {
            for message in view.messages.iter().filter(|m| m.is_agent()) {
                if Some(&message.id) == self.current.as_ref() || self.pending(message).is_none() {
                    continue;
                }
                self.close_line(&mut out);
                self.current = Some(message.id.clone());
                self.last_growth = Some(now);
                self.emit_pending(message, &mut out);
                if !settled {
                    break;
                }
            }
        }

        if settled {
            self.close_line(&mut out);
        }
        out
    }

    fn switch_to(&mut self, view: &TranscriptView, out: &mut Vec<Chunk>) {
        self.close_line(out);
        self.conversation_id = view.conversation_id.clone();
        self.printed.clear();
        self.current = None;
        self.last_growth = None;

        let title = view.conversation_id.as_deref().unwrap_or("new chat");
        out.push(Chunk::new(Style::Header, format!("── {title} ──\n")));
        for message in &view.messages {
            out.push(self.speaker(message));
            out.push(Chunk::new(Style::Text, format!("{}\n", message.text)));
            self.printed.insert(message.id.clone(), message.text.clone());
        }
    }

    fn pending(&self, message: &Message) -> Option<Pending> {
        match self.printed.get(&message.id) {
            None if message.text.is_empty() => None,
            None => Some(Pending::Delta(message.text.clone())),
            Some(printed) if *printed == message.text => None,
            Some(printed) => match message.text.strip_prefix(printed.as_str()) {
                Some(delta) => Some(Pending::Delta(delta.to_string())),
                None => Some(Pending::Revised(message.text.clone())),
            },
        }
    }

    /// Prints what `message` gained since last time. Returns true if
    /// anything was printed.
    fn emit_pending(&mut self, message: &Message, out: &mut Vec<Chunk>) -> bool {
        let Some(pending) = self.pending(message) else {
            return false;
        };
        let first = !self.printed.contains_key(&message.id);

        match pending {
            Pending::Delta(delta) => {
                if first || !self.line_open {
                    self.close_line(out);
                    out.push(self.speaker(message));
                }
                out.push(Chunk::new(Style::Text, delta));
            }
            Pending::Revised(text) => {
                self.close_line(out);
                out.push(self.speaker(message));
                out.push(Chunk::new(Style::Text, text));
            }
        }
        self.line_open = true;
        self.printed.insert(message.id.clone(), message.text.clone());
        true
    }

    fn close_line(&mut self, out: &mut Vec<Chunk>) {
        if self.line_open {
            out.push(Chunk::new(Style::Text, "\n"));
            self.line_open = false;
        }
    }

    fn speaker(&self, message: &Message) -> Chunk {
        if message.is_user() {
            return Chunk::new(Style::User, format!("[You] ({}) ", message.id));
        }
        let name = self
            .names
            .get(&message.sender_id)
            .map(String::as_str)
            .unwrap_or(message.sender_id.as_str());
        Chunk::new(Style::Speaker, format!("[{name}] "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metis_core::agent::get_default_agents;

    fn text_of(chunks: &[Chunk]) -> String {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    fn view(messages: &[Message]) -> TranscriptView {
        TranscriptView {
            conversation_id: Some("chat-1".to_string()),
            messages: messages.to_vec(),
        }
    }

    fn with_text(message: &Message, text: &str) -> Message {
        let mut message = message.clone();
        message.text = text.to_string();
        message
    }

    #[test]
    fn test_switch_prints_whole_history() {
        let mut printer = TranscriptPrinter::new(&get_default_agents());
        let user = Message::user("hi");
        let reply = with_text(&Message::agent("claude"), "hello");

        let out = printer.render(&view(&[user.clone(), reply]), true, Instant::now());
        assert_eq!(
            text_of(&out),
            format!("── chat-1 ──\n[You] ({}) hi\n[Claude] hello\n", user.id)
        );
    }

    #[test]
    fn test_streams_one_reply_and_holds_back_the_other() {
        let mut printer = TranscriptPrinter::new(&get_default_agents());
        let t0 = Instant::now();
        printer.render(&view(&[]), true, t0);

        let gemini = Message::agent("gemini");
        let claude = Message::agent("claude");

        let out = printer.render(&view(&[with_text(&gemini, "G")]), false, t0);
        assert_eq!(text_of(&out), "[Gemini] G");

        let t1 = t0 + Duration::from_millis(30);
        let both = [with_text(&gemini, "Go"), with_text(&claude, "C")];
        let out = printer.render(&view(&both), false, t1);
        assert_eq!(text_of(&out), "o");

        // Gemini went quiet: switch to Claude.
        let t2 = t1 + Duration::from_millis(300);
        let both = [with_text(&gemini, "Go"), with_text(&claude, "Cl")];
        let out = printer.render(&view(&both), false, t2);
        assert_eq!(text_of(&out), "\n[Claude] Cl");

        let out = printer.render(&view(&both), true, t2);
        assert_eq!(text_of(&out), "\n");
    }

    #[test]
    fn test_settling_flushes_held_back_replies() {
        let mut printer = TranscriptPrinter::new(&get_default_agents());
        let t0 = Instant::now();
        printer.render(&view(&[]), true, t0);

        let gemini = Message::agent("gemini");
        let grok = Message::agent("grok");
        printer.render(&view(&[with_text(&gemini, "G")]), false, t0);

        let done = [with_text(&gemini, "Gem"), with_text(&grok, "Grok")];
        let out = printer.render(&view(&done), true, t0);
        assert_eq!(text_of(&out), "em\n[Grok] Grok\n");
    }

    #[test]
    fn test_replaced_text_is_reprinted() {
        let mut printer = TranscriptPrinter::new(&get_default_agents());
        let t0 = Instant::now();
        printer.render(&view(&[]), true, t0);

        let live = Message::agent("metisium");
        printer.render(&view(&[with_text(&live, "Partial")]), false, t0);
        let out = printer.render(&view(&[with_text(&live, "Sorry.")]), true, t0);
        assert_eq!(text_of(&out), "\n[Metisium] Sorry.\n");
    }

    #[test]
    fn test_user_messages_are_not_echoed() {
        let mut printer = TranscriptPrinter::new(&get_default_agents());
        printer.render(&view(&[]), true, Instant::now());

        let out = printer.render(&view(&[Message::user("typed")]), false, Instant::now());
        assert!(out.is_empty());
    }
}
