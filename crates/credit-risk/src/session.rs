//! Line-oriented terminal front end that drives the form and result screens.

use std::io::{self, BufRead, Write};

use tracing::{debug, info};

use crate::application::{Field, FieldKind};
use crate::controller::{Notifier, PredictionFailure, RootController, ViewState};
use crate::form::{DefaultsState, FormComponent};
use crate::result::{ResultAction, ResultView};
use crate::service::PredictionService;

/// Prints failure notifications to stderr; the session then waits for acknowledgement.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrNotifier;

impl Notifier for StderrNotifier {
    fn prediction_failed(&self, failure: &PredictionFailure) {
        eprintln!();
        eprintln!("!! Error getting prediction. Check that the backend is running.");
        eprintln!("!! {failure}");
    }
}

/// How the session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionExit {
    Quit,
    EndOfInput,
}

enum Step {
    Continue,
    Exit(SessionExit),
}

pub struct ConsoleSession<S, N, R, W> {
    controller: RootController<S, N>,
    form: FormComponent,
    input: R,
    output: W,
    color: bool,
}

impl<S, N, R, W> ConsoleSession<S, N, R, W>
where
    S: PredictionService,
    N: Notifier,
    R: BufRead,
    W: Write,
{
    pub fn new(controller: RootController<S, N>, input: R, output: W) -> Self {
        Self {
            controller,
            form: FormComponent::new(),
            input,
            output,
            color: false,
        }
    }

    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn controller(&self) -> &RootController<S, N> {
        &self.controller
    }

    pub fn form(&self) -> &FormComponent {
        &self.form
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub async fn run(&mut self) -> io::Result<SessionExit> {
        info!("console session started");
        loop {
            let step = if !self.form.is_ready() {
                self.initialise_form().await?
            } else if matches!(self.controller.view(), ViewState::Form) {
                self.form_screen().await?
            } else {
                self.result_screen()?
            };

            if let Step::Exit(exit) = step {
                info!(?exit, "console session finished");
                return Ok(exit);
            }
        }
    }

    async fn initialise_form(&mut self) -> io::Result<Step> {
        writeln!(self.output, "Loading defaults...")?;
        self.output.flush()?;

        let state = self.form.load(self.controller.service()).await;
        let DefaultsState::Failed(reason) = state else {
            return Ok(Step::Continue);
        };
        let reason = reason.clone();

        writeln!(self.output, "Could not load form defaults: {reason}")?;
        match self.prompt("[r]etry or [q]uit")? {
            None => Ok(Step::Exit(SessionExit::EndOfInput)),
            Some(answer) if answer.eq_ignore_ascii_case("q") => Ok(Step::Exit(SessionExit::Quit)),
            Some(_) => Ok(Step::Continue),
        }
    }

    async fn form_screen(&mut self) -> io::Result<Step> {
        self.render_form()?;
        let Some(command) = self.prompt("Field number to edit, [s]ubmit, or [q]uit")? else {
            return Ok(Step::Exit(SessionExit::EndOfInput));
        };

        if command.eq_ignore_ascii_case("q") {
            return Ok(Step::Exit(SessionExit::Quit));
        }
        if command.eq_ignore_ascii_case("s") {
            return self.submit().await;
        }

        let field = command
            .parse::<usize>()
            .ok()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| Field::ALL.get(index).copied());
        match field {
            Some(field) => self.edit_field(field),
            None => {
                writeln!(self.output, "Unknown command '{command}'.")?;
                Ok(Step::Continue)
            }
        }
    }

    fn edit_field(&mut self, field: Field) -> io::Result<Step> {
        let current = self.form.value(field).unwrap_or_default().to_string();
        let hint = match field.kind() {
            FieldKind::Numeric { min, max } => format!("{min} to {max}"),
            FieldKind::Categorical { options } => options.join(" | "),
        };
        let question = format!("{} ({hint}) [{current}]", field.label());

        let Some(answer) = self.prompt(&question)? else {
            return Ok(Step::Exit(SessionExit::EndOfInput));
        };
        if answer.is_empty() {
            return Ok(Step::Continue);
        }

        let value = match field.kind() {
            FieldKind::Categorical { .. } => answer.to_ascii_uppercase(),
            FieldKind::Numeric { .. } => answer,
        };
        debug!(field = %field, value = %value, "field edited");
        if let Err(err) = self.form.set_field(field, value) {
            writeln!(self.output, "{err}")?;
        }
        Ok(Step::Continue)
    }

    async fn submit(&mut self) -> io::Result<Step> {
        let record = match self.form.submit() {
            Ok(record) => record,
            Err(err) => {
                writeln!(self.output, "Cannot submit: {err}")?;
                return Ok(Step::Continue);
            }
        };

        writeln!(self.output, "Analyzing...")?;
        self.output.flush()?;

        if self.controller.predict(record).await.is_err() {
            // Notification already shown; block until the user dismisses it.
            if self.prompt("Press Enter to return to the form")?.is_none() {
                return Ok(Step::Exit(SessionExit::EndOfInput));
            }
        }
        Ok(Step::Continue)
    }

    fn result_screen(&mut self) -> io::Result<Step> {
        let ViewState::Result(result) = self.controller.view() else {
            return Ok(Step::Continue);
        };
        let rendered = ResultView::new(result).with_color(self.color).render();

        writeln!(self.output)?;
        write!(self.output, "{rendered}")?;
        writeln!(self.output)?;

        let Some(answer) = self.prompt("Press Enter to assess another application, or [q]uit")? else {
            return Ok(Step::Exit(SessionExit::EndOfInput));
        };
        match ResultAction::from_input(&answer) {
            ResultAction::Quit => Ok(Step::Exit(SessionExit::Quit)),
            ResultAction::Reset => {
                self.controller.reset();
                Ok(Step::Continue)
            }
        }
    }

    fn render_form(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "Applicant & Loan Details")?;
        for (index, field) in Field::ALL.into_iter().enumerate() {
            if field == Field::PersonHomeOwnership {
                writeln!(self.output, "Categorical Features")?;
            }
            let value = self.form.value(field).unwrap_or_default();
            writeln!(self.output, "  {:>2}. {:<32} {value}", index + 1, field.label())?;
        }
        Ok(())
    }

    /// Returns the trimmed answer, or `None` once input is exhausted.
    fn prompt(&mut self, question: &str) -> io::Result<Option<String>> {
        write!(self.output, "{question}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
