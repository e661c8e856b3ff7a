//! Terminal front end for dashboard prompts and notices.

use dialoguer::theme::ColorfulTheme;
use dialoguer::Confirm;

use rollcall_core::{Confirmation, Interaction, Notice, NoticeLevel};

use super::context::UiContext;
use super::progress::Spinner;
use super::render::{badge, notice_line};
use super::theme::Badge;

/// Answers dashboard confirmations with dialoguer and prints notices.
///
/// With `assume_yes` every confirmation is accepted. Without a terminal and
/// without `assume_yes` every confirmation is declined, so guarded actions
/// never happen silently.
///
/// While a spinner from [`TerminalInteraction::spinning`] is active, prompts
/// and notices are drawn with the spinner suspended.
pub struct TerminalInteraction<'a> {
    ctx: &'a UiContext,
    assume_yes: bool,
    quiet: bool,
    notices: Vec<Notice>,
    spinner: Option<Spinner>,
}

impl<'a> TerminalInteraction<'a> {
    pub fn new(ctx: &'a UiContext, assume_yes: bool, quiet: bool) -> Self {
        Self {
            ctx,
            assume_yes,
            quiet,
            notices: Vec::new(),
            spinner: None,
        }
    }

    /// Run `f` behind a spinner labelled `message`.
    pub fn spinning<R>(&mut self, message: &str, f: impl FnOnce(&mut Self) -> R) -> R {
        let spinner = Spinner::start(self.ctx, message);
        let outer = self.spinner.replace(spinner.clone());
        let result = f(self);
        self.spinner = outer;
        spinner.finish();
        result
    }

    fn paused<R>(&self, f: impl FnOnce() -> R) -> R {
        match &self.spinner {
            Some(spinner) => spinner.suspend(f),
            None => f(),
        }
    }

    /// Notices reported so far.
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Ask a free-standing yes/no question (e.g. quitting with unsaved edits).
    pub fn ask(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        if !self.ctx.is_interactive() {
            tracing::warn!(prompt, "no terminal to confirm on, declining");
            let line = badge(self.ctx, Badge::Warn, &format!("{} (declined; pass --yes)", prompt));
            self.paused(|| eprintln!("{}", line));
            return false;
        }
        self.paused(|| {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(prompt)
                .default(false)
                .interact()
                .unwrap_or(false)
        })
    }
}

impl Interaction for TerminalInteraction<'_> {
    fn confirm(&mut self, question: &Confirmation) -> bool {
        self.ask(&question.to_string())
    }

    fn notify(&mut self, notice: &Notice) {
        self.notices.push(notice.clone());

        let routine = matches!(notice.level(), NoticeLevel::Info | NoticeLevel::Success);
        if self.quiet && routine {
            return;
        }
        let line = notice_line(self.ctx, notice);
        let to_stderr = self.ctx.mode.is_json() || !routine;
        self.paused(|| {
            if to_stderr {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        });
    }
}
