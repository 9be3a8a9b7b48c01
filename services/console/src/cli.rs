use crate::commands::{run_defaults, run_interactive, run_predict};
use clap::{Args, Parser, Subcommand};
use credit_risk::application::Field;
use credit_risk::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "credit-risk",
    about = "Assess the credit risk of a loan application against the prediction service",
    version
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill in the application form interactively (default command)
    Interactive,
    /// Print the service's default applicant as JSON
    Defaults,
    /// Submit the defaults, with optional overrides, and print the risk card
    Predict(PredictArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct GlobalArgs {
    /// Override the configured prediction service URL
    #[arg(long, global = true)]
    pub(crate) service_url: Option<String>,
    /// Disable colored output
    #[arg(long, global = true)]
    pub(crate) no_color: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct PredictArgs {
    /// Override a field, e.g. `--set loan_grade=C` (repeatable)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub(crate) overrides: Vec<(Field, String)>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Interactive);

    match command {
        Command::Interactive => run_interactive(cli.global).await,
        Command::Defaults => run_defaults(cli.global).await,
        Command::Predict(args) => run_predict(cli.global, args).await,
    }
}

pub(crate) fn parse_assignment(raw: &str) -> Result<(Field, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = Field::from_name(name).ok_or_else(|| {
        let known: Vec<&str> = Field::ALL.iter().map(|field| field.name()).collect();
        format!("unknown field '{}' (expected one of {})", name.trim(), known.join(", "))
    })?;
    Ok((field, value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_assignments() {
        assert_eq!(
            parse_assignment("loan_grade= C"),
            Ok((Field::LoanGrade, "C".to_string()))
        );
        assert!(parse_assignment("loan_grade").is_err());
        let err = parse_assignment("credit_score=700").expect_err("unknown field");
        assert!(err.contains("unknown field 'credit_score'"));
    }

    #[test]
    fn defaults_to_interactive_command() {
        let cli = Cli::try_parse_from(["credit-risk", "--no-color"]).expect("parses");
        assert!(cli.command.is_none());
        assert!(cli.global.no_color);
    }

    #[test]
    fn predict_accepts_repeated_overrides() {
        let cli = Cli::try_parse_from([
            "credit-risk",
            "predict",
            "--set",
            "person_age=41",
            "--set",
            "loan_intent=VENTURE",
            "--service-url",
            "http://10.0.0.5:5000",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Predict(args)) => assert_eq!(
                args.overrides,
                vec![
                    (Field::PersonAge, "41".to_string()),
                    (Field::LoanIntent, "VENTURE".to_string()),
                ]
            ),
            other => panic!("expected predict command, got {other:?}"),
        }
        assert_eq!(
            cli.global.service_url.as_deref(),
            Some("http://10.0.0.5:5000")
        );
    }
}
