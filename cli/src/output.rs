//! Terminal rendering of sessions and streamed replies.

use chatline_application::SendProgress;
use chatline_domain::{Role, Session};
use std::io::Write;

/// One line per session: index, active marker, id, title, size, thread.
pub fn format_session_list(sessions: &[Session], active_id: &str) -> String {
    let mut out = String::new();
    for (index, session) in sessions.iter().enumerate() {
        let marker = if session.id() == active_id { '*' } else { ' ' };
        out.push_str(&format!(
            "{marker} {:>2}  {}  {:<23}  {:>3} msgs  {}  thread: {}\n",
            index + 1,
            session.id(),
            session.title(),
            session.messages().len(),
            session
                .updated_at()
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M"),
            session.thread_id().unwrap_or("-"),
        ));
    }
    out
}

/// A session's transcript, one block per message.
pub fn format_transcript(session: &Session) -> String {
    let mut out = format!("# {}\n", session.title());
    for message in session.messages() {
        let speaker = match message.role {
            Role::User => "you",
            Role::Assistant => "assistant",
        };
        out.push_str(&format!("\n{speaker}: {}\n", message.content));
    }
    out
}

/// Prints reply deltas to stdout as they arrive.
pub struct StreamPrinter;

impl SendProgress for StreamPrinter {
    fn on_chunk(&self, _session_id: &str, delta: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = stdout.write_all(delta.as_bytes());
        let _ = stdout.flush();
    }

    fn on_stream_end(&self, _session_id: &str) {
        println!();
    }

    fn on_failed(&self, _session_id: &str, _error: &str) {
        println!();
    }
}
