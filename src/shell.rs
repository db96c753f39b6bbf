use clap::{Parser, Subcommand};
use clinic_cli::commands::Commands;
use clinic_cli::handlers::{execute, Change};
use clinic_cli::render;
use clinic_core::{
    snapshot, AssignmentRejection, Clinic, CoreConfig, DoctorId, DoctorSelector, SelectionRequest,
};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

/// One line typed at the shell prompt.
#[derive(Parser, Debug)]
#[command(name = "clinic", no_binary_name = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: ShellCommand,
}

#[derive(Subcommand, Debug)]
pub enum ShellCommand {
    #[command(flatten)]
    Clinic(Commands),
    /// Write the snapshot now
    Save,
    /// Save and leave the shell
    #[command(alias = "quit")]
    Exit,
}

/// Parses a shell line. `Ok(None)` for a blank line.
pub fn parse_line(line: &str) -> anyhow::Result<Option<ShellCommand>> {
    let words =
        shlex::split(line).ok_or_else(|| anyhow::anyhow!("malformed input, check quoting"))?;
    if words.is_empty() {
        return Ok(None);
    }
    Ok(Some(ShellLine::try_parse_from(words)?.command))
}

/// Prompts for a doctor id on every attempt.
struct PromptSelector<'e> {
    editor: &'e mut DefaultEditor,
}

impl DoctorSelector for PromptSelector<'_> {
    fn select(&mut self, request: &SelectionRequest<'_>) -> Option<DoctorId> {
        let mut stdout = std::io::stdout().lock();
        if request.attempt == 1 {
            let candidates: Vec<_> = request.candidates.iter().collect();
            render::candidates(
                &mut stdout,
                request.patient,
                request.specialty,
                &candidates,
            )
            .ok()?;
        }
        drop(stdout);

        let prompt = format!(
            "Doctor ID [{}/{}] (blank to skip)> ",
            request.attempt, request.max_attempts
        );
        loop {
            let line = self.editor.readline(&prompt).ok()?;
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            match line.parse::<u32>() {
                Ok(id) => return Some(DoctorId(id)),
                Err(_) => println!("'{line}' is not a doctor id"),
            }
        }
    }

    fn rejected(&mut self, rejection: &AssignmentRejection) {
        println!("Rejected: {rejection}");
    }
}

pub struct Shell {
    config: CoreConfig,
    clinic: Clinic,
    editor: DefaultEditor,
    unsaved: bool,
}

impl Shell {
    pub fn new(config: CoreConfig, clinic: Clinic) -> anyhow::Result<Self> {
        Ok(Self {
            config,
            clinic,
            editor: DefaultEditor::new()?,
            unsaved: false,
        })
    }

    fn save(&mut self) -> anyhow::Result<()> {
        snapshot::save(&self.clinic, self.config.data_file())?;
        self.unsaved = false;
        Ok(())
    }

    fn run_command(&mut self, command: Commands) -> anyhow::Result<()> {
        let mut selector = PromptSelector {
            editor: &mut self.editor,
        };
        let mut stdout = std::io::stdout();
        let selector: &mut dyn DoctorSelector = &mut selector;
        if execute(&mut self.clinic, command, Some(selector), &mut stdout)?
            == Change::Modified
        {
            self.unsaved = true;
        }
        Ok(())
    }

    pub fn run(&mut self) -> anyhow::Result<()> {
        println!("Clinic shell. Type 'help' for commands, 'exit' to save and quit.");

        loop {
            let line = match self.editor.readline("clinic> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("Ctrl-C received. Type 'exit' to quit.");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Readline error: {err}");
                    break;
                }
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            self.editor.add_history_entry(line).ok();

            let command = match parse_line(line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    match e.downcast_ref::<clap::Error>() {
                        Some(clap_error) => {
                            clap_error.print().ok();
                        }
                        None => eprintln!("Error: {e}"),
                    }
                    continue;
                }
            };

            match command {
                ShellCommand::Exit => break,
                ShellCommand::Save => match self.save() {
                    Ok(()) => println!("Saved to {}.", self.config.data_file().display()),
                    Err(e) => eprintln!("Error: {e}"),
                },
                ShellCommand::Clinic(command) => {
                    if let Err(e) = self.run_command(command) {
                        eprintln!("Error: {e}");
                        tracing::debug!("full error: {e:?}");
                    }
                }
            }
        }

        if self.unsaved {
            self.save()?;
            println!("Saved to {}.", self.config.data_file().display());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clinic_cli::commands::{PatientCommand, QueueCommand};

    #[test]
    fn test_parse_line_quoted_words() {
        let command = parse_line(r#"patient add 110 "Ishaan Gupta" 19 'Chest Pain'"#)
            .unwrap()
            .unwrap();
        match command {
            ShellCommand::Clinic(Commands::Patient(PatientCommand::Add(add))) => {
                assert_eq!(add.name, "Ishaan Gupta");
                assert_eq!(add.disease, "Chest Pain");
            }
            _ => panic!("expected patient add"),
        }
    }

    #[test]
    fn test_parse_line_shell_commands() {
        assert!(matches!(parse_line("exit").unwrap(), Some(ShellCommand::Exit)));
        assert!(matches!(parse_line("quit").unwrap(), Some(ShellCommand::Exit)));
        assert!(matches!(parse_line("save").unwrap(), Some(ShellCommand::Save)));
        assert!(matches!(
            parse_line("queue next").unwrap(),
            Some(ShellCommand::Clinic(Commands::Queue(QueueCommand::Next { doctor: None })))
        ));
        assert!(parse_line("   ").unwrap().is_none());
        assert_eq!(format!("{:?}", parse_line("save").unwrap()), "Some(Save)");
    }

    #[test]
    fn test_parse_line_errors() {
        assert!(parse_line(r#"patient add 1 "unterminated"#).is_err());
        let err = parse_line("frobnicate").expect_err("unknown command");
        assert!(err.downcast_ref::<clap::Error>().is_some());
    }
}
