use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

use just_begin::error::Result;
use just_begin::interfaces::plan_api::{PlanApi, PlanForm};
use just_begin::plan_flow::http::PlanApiClient;
use just_begin::plan_flow::{FlowState, PlanFlow};

const RESTART_COMMAND: &str = ":restart";

#[derive(Parser, Debug)]
#[command(name = "just-begin-cli")]
#[command(about = "Terminal client for the business plan server")]
struct Cli {
    #[arg(long, env = "JUST_BEGIN_URL", default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Skip the follow-up question and ask for a plan straight away.
    #[arg(long, default_value_t = false)]
    single_shot: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    just_begin::logging::init_tracing_with_default("warn");
    let cli = Cli::parse();

    let client = PlanApiClient::new(cli.server);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if cli.single_shot {
        if let Some(form) = read_form(&mut lines).await? {
            println!("creating plan...");
            match client.generate(&form).await {
                Ok(plan) => println!("\n{plan}\n"),
                Err(err) => eprintln!("error: {}", err.public_message()),
            }
        }
        return Ok(());
    }

    let mut flow = PlanFlow::new(client);
    let mut busy = flow.subscribe_busy();
    tokio::spawn(async move {
        while busy.changed().await.is_ok() {
            if *busy.borrow_and_update() {
                println!("creating plan...");
            }
        }
    });

    loop {
        match flow.state() {
            FlowState::CollectingInputs | FlowState::PlanGenerated => {
                let Some(form) = read_form(&mut lines).await? else {
                    break;
                };
                match flow.submit_inputs(form).await {
                    Ok(question) => println!("\n{question}\n"),
                    Err(err) => eprintln!("error: {}", err.public_message()),
                }
            }
            FlowState::PromptGenerated => {
                let prompt = format!("Your answer ({RESTART_COMMAND} to start over)");
                let Some(answer) = ask(&mut lines, &prompt).await? else {
                    break;
                };
                if answer.trim() == RESTART_COMMAND {
                    flow.restart()?;
                    continue;
                }
                match flow.submit_wildcard(&answer).await {
                    Ok(plan) => println!("\n{plan}\n"),
                    Err(err) => eprintln!("error: {}", err.public_message()),
                }
            }
        }
    }

    Ok(())
}

async fn read_form(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<PlanForm>> {
    let Some(description) = ask(
        lines,
        "Write a short description of the business you would like to create?",
    )
    .await?
    else {
        return Ok(None);
    };
    let Some(capital) = ask(lines, "How much capital do you currently have in euros?").await?
    else {
        return Ok(None);
    };
    let Some(steps) = ask(lines, "What steps have you already taken?").await? else {
        return Ok(None);
    };
    Ok(Some(PlanForm::new(capital, description, steps)))
}

async fn ask(lines: &mut Lines<BufReader<Stdin>>, prompt: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    let io_err = |e: std::io::Error| just_begin::error::JustBeginError::Runtime(e.to_string());
    stdout
        .write_all(format!("{prompt}\n> ").as_bytes())
        .await
        .map_err(io_err)?;
    stdout.flush().await.map_err(io_err)?;
    lines.next_line().await.map_err(io_err)
}
