use std::process::ExitCode;

use anyhow::{Context, Result, anyhow};
use tracing::{error, info};

use parrilla_bot::config::{AppConfig, DeliveryConfig};
use parrilla_bot::fixture::Scope;
use parrilla_bot::page_fetch::HttpFetcher;
use parrilla_bot::pipeline::Pipeline;
use parrilla_bot::telegram::{TelegramBot, deliver_scopes};

const USAGE: &str = "usage: parrilla [today|tomorrow|week|all|date YYYY-MM-DD|test [scope]|status]
  today, hoy          send today's fixtures
  tomorrow, manana    send tomorrow's fixtures
  week, semana        send the next seven days
  all, todo           send today and tomorrow
  date YYYY-MM-DD     send one calendar date
  test [scope]        print a scope to stdout instead of sending
  status              print source connectivity";

enum Command {
    Send(Vec<Scope>),
    Print(Scope),
    Status,
    Help,
}

fn main() -> ExitCode {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    let _ = dotenvy::from_filename("config/.env");

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let command = parse_command(&args)?;
    if let Command::Help = command {
        println!("{USAGE}");
        return Ok(ExitCode::SUCCESS);
    }

    let config = AppConfig::from_env().context("invalid configuration")?;
    let fetcher = HttpFetcher::new(config.timeout, &config.user_agent)
        .context("unable to build http client")?;
    let pipeline = Pipeline::new(config, Box::new(fetcher));

    match command {
        Command::Help => Ok(ExitCode::SUCCESS),
        Command::Print(scope) => {
            println!("{}", pipeline.run(scope));
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            println!("{}", pipeline.status_report());
            Ok(ExitCode::SUCCESS)
        }
        Command::Send(scopes) => {
            let delivery = DeliveryConfig::from_env().context("invalid delivery configuration")?;
            let bot = TelegramBot::new(&delivery).context("unable to build telegram client")?;
            let outcomes = deliver_scopes(&pipeline, &bot, &delivery.chat_id, &scopes);
            let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
            info!(scopes = outcomes.len(), failed, "run finished");
            if failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse_command(args: &[String]) -> Result<Command> {
    let Some(first) = args.first() else {
        return Ok(Command::Send(vec![Scope::Today]));
    };
    let word = first.trim().to_lowercase();
    match word.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "status" | "estado" => Ok(Command::Status),
        "all" | "todo" => Ok(Command::Send(vec![Scope::Today, Scope::Tomorrow])),
        "test" => {
            let scope = match args.get(1) {
                Some(raw) => raw.parse::<Scope>()?,
                None => Scope::Today,
            };
            Ok(Command::Print(scope))
        }
        "date" | "fecha" => {
            let raw = args
                .get(1)
                .ok_or_else(|| anyhow!("date needs a YYYY-MM-DD argument\n{USAGE}"))?;
            let scope = raw.parse::<Scope>()?;
            Ok(Command::Send(vec![scope]))
        }
        _ => {
            let scope = first
                .parse::<Scope>()
                .map_err(|err| anyhow!("{err}\n{USAGE}"))?;
            Ok(Command::Send(vec![scope]))
        }
    }
}
