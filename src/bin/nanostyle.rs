//! CLI for NanoStyle - edit photos with natural-language prompts.

use clap::{Args, Parser, Subcommand};
use nanostyle::{
    GeminiEditor, ImageEditor, RequestPhase, Session, SourceImage, DOWNLOAD_FILE_NAME,
    GEMINI_MODEL, SUGGESTED_PROMPTS,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nanostyle")]
#[command(about = "Edit photos with natural-language prompts via the Gemini image model")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Edit an image with a natural-language prompt
    Edit(EditArgs),

    /// List suggested prompts
    Prompts,

    /// Verify the Gemini service is reachable and the API key works
    Check,
}

#[derive(Args)]
struct EditArgs {
    /// Path to the original image
    input: PathBuf,

    /// How the image should be changed
    #[arg(short, long)]
    prompt: String,

    /// Output file path
    #[arg(short, long, default_value = DOWNLOAD_FILE_NAME)]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Edit(args) => edit_image(args, cli.json).await?,
        Commands::Prompts => list_prompts(cli.json)?,
        Commands::Check => check(cli.json).await?,
    }

    Ok(())
}

async fn edit_image(args: EditArgs, json_output: bool) -> anyhow::Result<()> {
    let editor = GeminiEditor::builder().build()?;

    let mut session = Session::new();
    session.load_image(SourceImage::from_file(&args.input)?);
    session.set_prompt(&args.prompt);

    if session.submit(&editor).await != RequestPhase::Succeeded {
        let message = session.error().unwrap_or("Failed to edit image.").to_string();
        if json_output {
            let result = serde_json::json!({
                "success": false,
                "error": message,
            });
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        anyhow::bail!("{message}");
    }

    let Some(result) = session.result() else {
        anyhow::bail!("edit succeeded but no result was recorded");
    };
    result.save(&args.output)?;

    if json_output {
        let out = serde_json::json!({
            "success": true,
            "output": args.output.display().to_string(),
            "size_bytes": result.bytes()?.len(),
            "model": GEMINI_MODEL,
            "prompt": result.source_prompt,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!(
            "Edited image saved to {} via {}",
            args.output.display(),
            GEMINI_MODEL
        );
    }

    Ok(())
}

fn list_prompts(json_output: bool) -> anyhow::Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(&SUGGESTED_PROMPTS)?);
    } else {
        println!("Suggested prompts:\n");
        for prompt in SUGGESTED_PROMPTS {
            println!("  - {prompt}");
        }
    }
    Ok(())
}

async fn check(json_output: bool) -> anyhow::Result<()> {
    let editor = GeminiEditor::builder().build()?;
    let outcome = editor.health_check().await;

    if json_output {
        let result = serde_json::json!({
            "model": GEMINI_MODEL,
            "ok": outcome.is_ok(),
            "error": outcome.as_ref().err().map(|e| e.to_string()),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match &outcome {
            Ok(()) => println!("{GEMINI_MODEL}: OK"),
            Err(e) => println!("{GEMINI_MODEL}: {e}"),
        }
    }

    outcome?;
    Ok(())
}
