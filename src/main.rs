use clap::Parser;
use colored::*;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

use neurotap::cli::{resolve_username, Args};
use neurotap::transport::{Backend, LoopbackTransport, RelayTransport};
use neurotap::{viz, EngineConfig, NeurotapEngine, NeurotapError, ToneVerdict};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(err) = run(args).await {
        eprintln!("{} {}", "error:".bright_red(), err);
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<(), NeurotapError> {
    let config = EngineConfig::load_or_default(args.config.as_deref())?;
    let engine = NeurotapEngine::new(config)?;

    if args.clear_history {
        engine.history().clear()?;
        println!("history cleared");
        return Ok(());
    }

    if let Some(text) = args.rephrase.as_deref() {
        println!("{}", engine.rephrase(text));
        return Ok(());
    }

    if args.history {
        for line in viz::render_history(&engine.history().recent_first()) {
            println!("{line}");
        }
        return Ok(());
    }

    let Some(message) = args.message.as_deref() else {
        eprintln!("nothing to do: pass a message, or one of --rephrase / --history");
        return Ok(());
    };

    if !args.send {
        let verdict = engine.process(message)?;
        print_verdict(&verdict, args.visual);
        return Ok(());
    }

    let username = resolve_username(&args.username);
    match args.backend {
        Backend::Loopback => {
            let transport = LoopbackTransport::default();
            let mut incoming = transport.subscribe();
            let (verdict, receipt) = engine
                .process_and_send(message, &username, &args.thread, &transport)
                .await?;
            print_verdict(&verdict, args.visual);
            if let Some(receipt) = receipt {
                println!("sent via loopback (id {})", receipt.id.dimmed());
                // The loopback echoes to every subscriber, sender included.
                if let Some(Ok(echo)) = incoming.next().await {
                    println!("{}: {}", echo.sender.bold(), echo.text);
                }
            }
        }
        Backend::Relay => {
            let transport = RelayTransport::new(&args.relay_url);
            let (verdict, receipt) = engine
                .process_and_send(message, &username, &args.thread, &transport)
                .await?;
            print_verdict(&verdict, args.visual);
            if let Some(receipt) = receipt {
                let status = if receipt.accepted { "accepted" } else { "rejected" };
                println!("relay {} message {}", status, receipt.id.dimmed());
            }
        }
    }

    Ok(())
}

fn print_verdict(verdict: &ToneVerdict, visual: bool) {
    for line in viz::render_verdict(verdict) {
        println!("{line}");
    }
    if visual {
        for line in viz::render_zone_map(verdict) {
            println!("{line}");
        }
    }
}
