//! Login redirect side effect fired when authentication is exhausted.

use std::io::IsTerminal;

/// Receives the "send the user to the login entry point" side effect.
///
/// The gateway client fires this at most once per failed request, after the
/// refresh-and-retry cycle is exhausted or a 403 arrives with no session.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Navigator for interactive CLI use. Only speaks up when stderr is a
/// terminal; in pipelines and scripts the error result is the whole story.
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect_to_login(&self) {
        if std::io::stderr().is_terminal() {
            eprintln!("Your session has expired. Run `reelrec login <email>` to sign in again.");
        }
    }
}
