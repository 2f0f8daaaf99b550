//! Command-line commands.
//!
//! Every command reads one JSON document from stdin and writes its result
//! to stdout. Parsing is kept separate from execution so both can be
//! tested without a process.

use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::assistant::DiagnosticAssistant;
use crate::error::AppError;
use crate::model::{Analysis, Answer, PatientData};
use crate::report::DiagnosticReport;
use crate::traits::CompletionClient;

/// Usage text printed by `help`.
pub const USAGE: &str = "\
Uso: triage-assist <comando> [opções] < entrada.json

Comandos:
  analyze            Lê PatientData e imprime a análise preliminar (JSON)
  refine             Lê { \"analysis\": ..., \"answers\": [...] } e imprime a análise refinada (JSON)
  report [--json]    Lê { \"patient\": ..., \"analysis\": ..., \"answers\": [...] } e imprime o relatório
  help               Mostra esta mensagem

Variáveis de ambiente:
  ANTHROPIC_API_KEY    Chave da API (opcional; sem ela apenas o motor local é usado)
  ANTHROPIC_MODEL      Modelo
  ANTHROPIC_BASE_URL   URL base da API
  LOG_LEVEL            Nível de log (padrão: info)
  REQUEST_TIMEOUT_MS   Tempo limite por requisição
  MAX_RETRIES          Número máximo de novas tentativas
";

/// A parsed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Preliminary analysis of a patient.
    Analyze,
    /// Refine an analysis with answers.
    Refine,
    /// Render the final report.
    Report {
        /// Emit JSON instead of text.
        json: bool,
    },
    /// Print usage.
    Help,
}

impl Command {
    /// Parse a command from arguments, program name excluded.
    ///
    /// # Errors
    ///
    /// Returns [`CommandParseError`] for a missing or unknown command or
    /// an unknown flag.
    pub fn parse(args: &[String]) -> Result<Self, CommandParseError> {
        let Some(first) = args.first() else {
            return Err(CommandParseError::MissingCommand);
        };
        let flags = &args[1..];

        let cmd = first.to_lowercase();
        let command = match cmd.as_str() {
            "analyze" => Self::Analyze,
            "refine" => Self::Refine,
            "report" => {
                let mut json = false;
                for flag in flags {
                    match flag.as_str() {
                        "--json" => json = true,
                        _ => return Err(CommandParseError::UnknownFlag(flag.clone())),
                    }
                }
                return Ok(Self::Report { json });
            }
            "help" | "--help" | "-h" => Self::Help,
            _ => return Err(CommandParseError::UnknownCommand(cmd)),
        };

        match flags.first() {
            Some(flag) => Err(CommandParseError::UnknownFlag(flag.clone())),
            None => Ok(command),
        }
    }

    /// Whether the command reads stdin.
    #[must_use]
    pub const fn reads_input(self) -> bool {
        !matches!(self, Self::Help)
    }
}

/// Error parsing CLI commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    /// No command provided.
    #[error("No command provided")]
    MissingCommand,
    /// Unknown command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    /// Unknown flag.
    #[error("Unknown flag: {0}")]
    UnknownFlag(String),
}

/// Input of the `refine` command.
#[derive(Debug, Clone, Deserialize)]
pub struct RefineInput {
    /// Analysis to refine.
    pub analysis: Analysis,
    /// Answers to its questions.
    #[serde(default)]
    pub answers: Vec<Answer>,
}

/// Input of the `report` command.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportInput {
    /// The patient.
    pub patient: PatientData,
    /// Final analysis.
    pub analysis: Analysis,
    /// Answers given.
    #[serde(default)]
    pub answers: Vec<Answer>,
}

fn parse_input<'a, T: Deserialize<'a>>(input: &'a str) -> Result<T, AppError> {
    serde_json::from_str(input).map_err(|e| AppError::InvalidInput {
        message: format!("Invalid JSON input: {e}"),
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::InvalidInput {
        message: format!("Failed to serialize output: {e}"),
    })
}

/// Read the whole command input.
///
/// # Errors
///
/// Returns [`AppError::Io`] if reading fails or the input is not UTF-8.
pub async fn read_input<R: AsyncRead + Unpin>(mut reader: R) -> Result<String, AppError> {
    let mut input = String::new();
    reader.read_to_string(&mut input).await?;
    Ok(input)
}

/// Write `output` followed by a newline and flush.
///
/// # Errors
///
/// Returns [`AppError::Io`] if writing fails.
pub async fn write_output<W: AsyncWrite + Unpin>(
    mut writer: W,
    output: &str,
) -> Result<(), AppError> {
    writer.write_all(output.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

/// Run `command` on `input`, returning what to print on stdout.
///
/// # Errors
///
/// Returns [`AppError::InvalidInput`] for malformed JSON and
/// [`AppError::Intake`] when the patient fails validation.
pub async fn run<C: CompletionClient>(
    command: Command,
    assistant: &DiagnosticAssistant<C>,
    input: &str,
) -> Result<String, AppError> {
    match command {
        Command::Analyze => {
            let patient: PatientData = parse_input(input)?;
            patient.validate()?;
            let analysis = assistant.analyze_symptoms(&patient).await;
            to_json(&analysis)
        }
        Command::Refine => {
            let RefineInput { analysis, answers } = parse_input(input)?;
            let refined = assistant.refine_diagnosis(&answers, &analysis).await;
            to_json(&refined)
        }
        Command::Report { json } => {
            let ReportInput {
                patient,
                analysis,
                answers,
            } = parse_input(input)?;
            let report = DiagnosticReport::build(&patient, &analysis, &answers);
            if json {
                to_json(&report)
            } else {
                Ok(report.to_string())
            }
        }
        Command::Help => Ok(USAGE.to_string()),
    }
}
