use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli_style;

use cli_style::{
    get_prompt, get_styles, print_error, print_goodbye, print_key_value, print_program,
    print_program_table, print_section_footer, print_section_header, print_success,
    print_violations, print_warning, print_welcome,
};
use program_catalog_server::view::{
    ActionOutcome, FormField, ProgramsClient, ProgramsController,
};

use rustyline::{
    completion::Completer, highlight::Highlighter, history::FileHistory, validate::Validator,
    CompletionType, Config, Editor, Helper,
};

#[derive(Parser, Debug)]
#[command(styles=get_styles())]
struct CliArgs {
    /// Root URL of the programs catalog server.
    #[clap(long, default_value = "http://localhost:3310")]
    pub server_url: String,

    /// Timeout of each request to the server, in seconds.
    #[clap(long, default_value_t = 10)]
    pub timeout_sec: u64,
}

#[derive(Parser)]
#[command(styles=get_styles(),name = "")]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Prints the programs as last fetched from the server.
    List,

    /// Fetches the programs list again.
    Refresh,

    /// Fetches a program from the server and shows every attribute.
    Show { id: i64 },

    /// Sets a field of the add form.
    Set { field: FormField, value: String },

    /// Prints the add form and its errors.
    Form,

    /// Sends the add form to the server.
    Submit,

    /// Empties the add form.
    ClearForm,

    /// Starts editing a listed program.
    Edit { id: i64 },

    /// Changes a field of the program being edited.
    Change { field: FormField, value: String },

    /// Saves the program being edited.
    Save,

    /// Drops the edit draft.
    Cancel,

    /// Deletes a program, after confirmation.
    Delete { id: i64 },

    /// Shows the server this CLI talks to.
    Where,

    /// Close this program.
    Exit,
}

enum CommandExecutionResult {
    Ok,
    Exit,
    Error(String),
}

type ProgramsEditor = Editor<ProgramsHelper, FileHistory>;

fn report(outcome: ActionOutcome, controller: &ProgramsController, done: &str) {
    match outcome {
        ActionOutcome::Done => print_success(done),
        ActionOutcome::Invalid => {
            print_warning("Some fields are invalid:");
            print_violations(controller.form_errors());
        }
        ActionOutcome::NotFound => print_error("Program not found"),
        ActionOutcome::Declined => print_warning("Cancelled"),
        ActionOutcome::Failed => print_error("Request failed, see the log for details"),
    }
}

fn confirm_delete(rl: &mut ProgramsEditor, id: i64) -> bool {
    match rl.readline(&format!("Delete program {}? [y/N] ", id)) {
        Ok(answer) => matches!(answer.trim(), "y" | "Y" | "yes"),
        Err(_) => false,
    }
}

fn execute_command(
    line: String,
    controller: &mut ProgramsController,
    runtime: &Runtime,
    rl: &mut ProgramsEditor,
) -> CommandExecutionResult {
    if line.trim().is_empty() {
        return CommandExecutionResult::Ok;
    }

    let args =
        shlex::split(&line).unwrap_or_else(|| line.split_whitespace().map(String::from).collect());

    let cli = InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

    let cli = match cli {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return CommandExecutionResult::Ok;
        }
    };

    match cli.command {
        InnerCommand::List => print_program_table(&controller.state().items),
        InnerCommand::Refresh => {
            let outcome = runtime.block_on(controller.refresh());
            report(outcome, controller, "Programs fetched");
            if outcome == ActionOutcome::Done {
                print_program_table(&controller.state().items);
            }
        }
        InnerCommand::Show { id } => match runtime.block_on(controller.client().read(id)) {
            Ok(Some(program)) => print_program(&format!("Program {}", id), &program),
            Ok(None) => return CommandExecutionResult::Error(format!("Program {} not found", id)),
            Err(err) => return CommandExecutionResult::Error(err.to_string()),
        },
        InnerCommand::Set { field, value } => controller.set_form_field(field, &value),
        InnerCommand::Form => {
            print_section_header("Add form");
            for field in FormField::ALL {
                print_key_value(field.key(), controller.form().get(field));
            }
            print_section_footer();
            print_violations(controller.form_errors());
        }
        InnerCommand::Submit => {
            let outcome = runtime.block_on(controller.submit_form());
            report(outcome, controller, "Program added");
        }
        InnerCommand::ClearForm => controller.clear_form(),
        InnerCommand::Edit { id } => {
            let outcome = controller.start_edit(id);
            report(outcome, controller, &format!("Editing program {}", id));
        }
        InnerCommand::Change { field, value } => {
            let outcome = controller.change_edit(field, &value);
            if outcome == ActionOutcome::NotFound {
                return CommandExecutionResult::Error("No program is being edited".to_string());
            }
            report(outcome, controller, &format!("{} changed", field));
            if let Some(draft) = controller.state().editing.as_ref() {
                print_program("Edit draft", draft);
            }
        }
        InnerCommand::Save => {
            if controller.state().editing.is_none() {
                return CommandExecutionResult::Error("No program is being edited".to_string());
            }
            let outcome = runtime.block_on(controller.save_edit());
            report(outcome, controller, "Program updated");
        }
        InnerCommand::Cancel => controller.cancel_edit(),
        InnerCommand::Delete { id } => {
            let outcome = runtime.block_on(controller.delete(id, |id| confirm_delete(rl, id)));
            report(outcome, controller, &format!("Program {} deleted", id));
        }
        InnerCommand::Where => print_key_value("Server", controller.client().base_url()),
        InnerCommand::Exit => return CommandExecutionResult::Exit,
    }

    CommandExecutionResult::Ok
}

#[derive(rustyline_derive::Hinter)]
struct ProgramsHelper {
    commands_names: Vec<String>,
}

impl ProgramsHelper {
    pub fn new() -> Self {
        let commands_names: Vec<String> = InnerCli::command()
            .get_subcommands()
            .map(|sc| sc.get_name().to_string())
            .collect();

        ProgramsHelper { commands_names }
    }
}

impl Completer for ProgramsHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        if line.contains(' ') {
            return Ok((0, Vec::with_capacity(0)));
        }
        let matches = self
            .commands_names
            .iter()
            .filter(|c| c.starts_with(line))
            .cloned()
            .collect::<Vec<_>>();

        Ok((0, matches))
    }
}

impl Highlighter for ProgramsHelper {}
impl Validator for ProgramsHelper {}
impl Helper for ProgramsHelper {}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .init();

    let cli_args = CliArgs::parse();
    let client = ProgramsClient::new(
        cli_args.server_url.clone(),
        Duration::from_secs(cli_args.timeout_sec),
    )
    .with_context(|| format!("Could not create a client for {}", cli_args.server_url))?;
    let mut controller = ProgramsController::new(client);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    print_welcome(&cli_args.server_url);
    if runtime.block_on(controller.mount()) == ActionOutcome::Done {
        print_program_table(&controller.state().items);
    } else {
        print_warning("Could not fetch the programs, use 'refresh' to retry");
    }

    let config = Config::builder()
        .completion_type(CompletionType::List)
        .build();

    let mut rl = ProgramsEditor::with_config(config)?;
    rl.set_helper(Some(ProgramsHelper::new()));

    let prompt = get_prompt();
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);
                match execute_command(line, &mut controller, &runtime, &mut rl) {
                    CommandExecutionResult::Ok => {}
                    CommandExecutionResult::Exit => break,
                    CommandExecutionResult::Error(err) => {
                        print_error(&err);
                        continue;
                    }
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(rustyline::error::ReadlineError::Eof) => {
                println!("CTRL-D: exiting.");
                break;
            }
            Err(e) => {
                print_error(&format!("{:?}", e));
                break;
            }
        }
    }
    print_goodbye();
    Ok(())
}
